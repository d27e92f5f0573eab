use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CaseError, Result};
use crate::types::case_record::CaseRecord;

const CASE_EXTENSION: &str = "json";

/// Saves a case as pretty-printed JSON.
pub fn save_case(record: &CaseRecord, file_path: &Path) -> Result<()> {
    let file = File::create(file_path).map_err(|source| CaseError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, record).map_err(|source| CaseError::Json {
        path: file_path.to_path_buf(),
        source,
    })?;

    info!(
        path = %file_path.display(),
        defendants = record.defendants.len(),
        facts = record.facts.len(),
        "saved case"
    );
    Ok(())
}

/// Loads a case saved by [`save_case`]. Keys missing from older files take
/// their defaults; unknown keys are ignored.
pub fn load_case(file_path: &Path) -> Result<CaseRecord> {
    if !file_path.exists() {
        return Err(CaseError::NotFound(file_path.to_path_buf()));
    }

    let file = File::open(file_path).map_err(|source| CaseError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let record: CaseRecord = serde_json::from_reader(reader).map_err(|source| CaseError::Json {
        path: file_path.to_path_buf(),
        source,
    })?;

    info!(
        path = %file_path.display(),
        defendants = record.defendants.len(),
        facts = record.facts.len(),
        "loaded case"
    );
    Ok(record)
}

/// A directory of saved cases, one `<name>.json` file per case.
#[derive(Debug, Clone)]
pub struct CaseStore {
    dir: PathBuf,
}

impl CaseStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn open(config: &Config) -> Self {
        Self::new(config.cases_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `name`. Names may not be empty or contain path separators.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        let forbidden = |c: char| c == '/' || c == '\\' || c == std::path::MAIN_SEPARATOR;
        if name.is_empty() || name == "." || name == ".." || name.contains(forbidden) {
            return Err(CaseError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.{CASE_EXTENSION}")))
    }

    /// Creates the directory on first use.
    pub fn save(&self, name: &str, record: &CaseRecord) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(CaseError::NotADirectory(self.dir.clone()));
        }
        fs::create_dir_all(&self.dir).map_err(|source| CaseError::Io {
            path: self.dir.clone(),
            source,
        })?;
        save_case(record, &path)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<CaseRecord> {
        load_case(&self.path_for(name)?)
    }

    /// Returns `false` when there was nothing to delete.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted case");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "case to delete does not exist");
                Ok(false)
            }
            Err(source) => Err(CaseError::Io { path, source }),
        }
    }

    /// Saved case names, sorted. A missing directory lists as empty.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            debug!(dir = %self.dir.display(), "case directory not created yet");
            return Ok(Vec::new());
        }
        if !self.dir.is_dir() {
            return Err(CaseError::NotADirectory(self.dir.clone()));
        }

        let entries = fs::read_dir(&self.dir).map_err(|source| CaseError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CaseError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == CASE_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        debug!(dir = %self.dir.display(), count = names.len(), "listed cases");
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_with_separators_are_refused() {
        let store = CaseStore::new("causas");
        assert!(matches!(store.path_for("a/b"), Err(CaseError::InvalidName(_))));
        assert!(matches!(store.path_for("  "), Err(CaseError::InvalidName(_))));
        assert!(matches!(store.path_for(".."), Err(CaseError::InvalidName(_))));
        assert_eq!(
            store.path_for("Pérez robo").unwrap(),
            Path::new("causas").join("Pérez robo.json")
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_case(Path::new("no/such/case.json")).unwrap_err();
        assert!(matches!(err, CaseError::NotFound(_)));
    }
}
