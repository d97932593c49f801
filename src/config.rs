use std::path::PathBuf;

use crate::categorize::UnmatchedPolicy;
use crate::error::{Error, Result};
use crate::store::DEFAULT_DELIMITER;

pub const STORE_VAR: &str = "SPENDSORT_STORE";
pub const DELIMITER_VAR: &str = "SPENDSORT_DELIMITER";
pub const UNMATCHED_VAR: &str = "SPENDSORT_UNMATCHED";

const STORE_FILE: &str = "transactions.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub delimiter: u8,
    pub unmatched: UnmatchedPolicy,
}

impl Config {
    /// Defaults overridden by `SPENDSORT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_path = match lookup(STORE_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_store_path()?,
        };

        let delimiter = match lookup(DELIMITER_VAR) {
            Some(value) => parse_delimiter(&value)?,
            None => DEFAULT_DELIMITER,
        };

        let unmatched = match lookup(UNMATCHED_VAR) {
            Some(value) => UnmatchedPolicy::parse(&value).ok_or_else(|| Error::InvalidConfig {
                key: UNMATCHED_VAR,
                reason: "expected 'file' or 'return'".into(),
                value,
            })?,
            None => UnmatchedPolicy::default(),
        };

        Ok(Self {
            store_path,
            delimiter,
            unmatched,
        })
    }
}

pub fn default_store_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "spendsort").ok_or(Error::NoDataDir)?;
    Ok(dirs.data_dir().join(STORE_FILE))
}

fn parse_delimiter(value: &str) -> Result<u8> {
    let invalid = |reason: &str| Error::InvalidConfig {
        key: DELIMITER_VAR,
        value: value.to_string(),
        reason: reason.to_string(),
    };
    match value.as_bytes() {
        [b] if b.is_ascii() && !b.is_ascii_alphanumeric() && !matches!(*b, b'"' | b'\n' | b'\r') => {
            Ok(*b)
        }
        [_] => Err(invalid("letters, digits, quotes and line breaks cannot separate fields")),
        _ => Err(invalid("must be a single ASCII character")),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
