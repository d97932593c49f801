use std::path::PathBuf;

use thiserror::Error;

use crate::models::Transaction;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Transaction matched multiple categories ({}): {transaction}", .categories.join(", "))]
    AmbiguousClassification {
        transaction: Box<Transaction>,
        categories: Vec<String>,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("Category registered twice: {0}")]
    DuplicateCategory(String),

    #[error("Invalid rule /{pattern}/ in category {category}: {reason}")]
    InvalidRule {
        category: String,
        pattern: String,
        reason: String,
    },

    #[error("Malformed record{}: {reason}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    MalformedRecord { line: Option<u64>, reason: String },

    #[error("Store has no header row")]
    MissingHeader,

    #[error("Unexpected store header: expected '{expected}', found '{found}'")]
    HeaderMismatch { expected: String, found: String },

    #[error(
        "Re-classification changed category {category}: {} missing, {} unexpected{}",
        .missing.len(),
        .unexpected.len(),
        describe_first(.missing, .unexpected)
    )]
    ConsistencyViolation {
        category: String,
        missing: Vec<Transaction>,
        unexpected: Vec<Transaction>,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    InStore {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid {key} '{value}': {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Could not determine a data directory; set SPENDSORT_STORE")]
    NoDataDir,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn malformed(line: Option<u64>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_first(missing: &[Transaction], unexpected: &[Transaction]) -> String {
    let mut out = String::new();
    if let Some(tx) = missing.first() {
        out.push_str(&format!("; first missing: {tx}"));
    }
    if let Some(tx) = unexpected.first() {
        out.push_str(&format!("; first unexpected: {tx}"));
    }
    out
}

pub type Result<T> = std::result::Result<T, Error>;
