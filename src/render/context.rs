use chrono::NaiveDate;

use crate::config::Config;

/// Everything a render needs besides the case itself, so renders stay pure.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    /// Date printed on letters and certificates.
    pub today: NaiveDate,
    /// Used when the case leaves its locality blank.
    pub default_locality: String,
}

impl RenderContext {
    pub fn new(today: NaiveDate, default_locality: impl Into<String>) -> Self {
        Self {
            today,
            default_locality: default_locality.into(),
        }
    }

    pub fn from_config(config: &Config, today: NaiveDate) -> Self {
        Self::new(today, config.default_locality.clone())
    }
}
