use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{CaseError, Result};

pub const DEFAULT_CASES_DIR: &str = "causas_guardadas";
pub const DEFAULT_LOCALITY: &str = "Córdoba";
pub const DEFAULT_HIGHLIGHT_MS: u64 = 3000;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON file per saved case.
    pub cases_dir: PathBuf,
    /// Used when a case leaves its locality empty.
    pub default_locality: String,
    /// How long changed spans stay highlighted after a re-render.
    pub highlight_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cases_dir: PathBuf::from(DEFAULT_CASES_DIR),
            default_locality: DEFAULT_LOCALITY.to_string(),
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
        }
    }
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<Config> {
    toml::from_str::<Config>(contents).map_err(|source| CaseError::Config {
        path: origin.to_path_buf(),
        source,
    })
}

pub fn load_config_from_file(file_path: &str) -> Result<Config> {
    let path = Path::new(file_path);
    let contents = fs::read_to_string(path).map_err(|source| CaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded_config = parse_config(&contents, path)?;

    // A missing directory is fine (the store creates it), a file in its place is not.
    if loaded_config.cases_dir.exists() && !loaded_config.cases_dir.is_dir() {
        return Err(CaseError::NotADirectory(loaded_config.cases_dir));
    }

    info!(
        path = %path.display(),
        cases_dir = %loaded_config.cases_dir.display(),
        "loaded config"
    );
    Ok(loaded_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("", Path::new("inline.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_config("highlight_ms = 1500\n", Path::new("inline.toml")).unwrap();
        assert_eq!(config.highlight_ms, 1500);
        assert_eq!(config.default_locality, "Córdoba");
        assert_eq!(config.cases_dir, PathBuf::from("causas_guardadas"));
    }

    #[test]
    fn bad_types_are_reported() {
        let err = parse_config("highlight_ms = \"slow\"", Path::new("inline.toml")).unwrap_err();
        assert!(matches!(err, CaseError::Config { .. }));
    }
}
