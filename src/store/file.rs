use std::fs;
use std::path::{Path, PathBuf};

use super::TableCodec;
use crate::categorize::GroupedTransactions;
use crate::error::{Error, Result};

/// `<path>.backup`, where the previous store is kept on every save.
pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, "backup")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// The flat-file store.
///
/// No locking: two writers racing on the same path lose one update (last
/// writer wins). Writes go through a temporary file and a rename so a crash
/// never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    codec: TableCodec,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>, codec: TableCodec) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store into `template`, which should hold the registered
    /// categories and no transactions. A missing file is an empty store.
    pub fn load(&self, template: GroupedTransactions) -> Result<GroupedTransactions> {
        let mut grouped = template;
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no store yet, starting empty");
                return Ok(grouped);
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let added = self
            .codec
            .deserialize(&text, &mut grouped)
            .map_err(|e| self.wrap(e))?;
        tracing::info!(path = %self.path.display(), transactions = added, "loaded store");
        Ok(grouped)
    }

    pub fn save(&self, grouped: &GroupedTransactions) -> Result<()> {
        let text = self.codec.serialize(grouped).map_err(|e| self.wrap(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        if self.path.exists() {
            let backup = backup_path(&self.path);
            fs::copy(&self.path, &backup).map_err(|e| Error::io(&backup, e))?;
            tracing::warn!(backup = %backup.display(), "existing store backed up");
        }

        let tmp = sibling(&self.path, "tmp");
        fs::write(&tmp, text).map_err(|e| Error::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::io(&self.path, e))?;

        tracing::info!(
            path = %self.path.display(),
            transactions = grouped.total_transactions(),
            "wrote grouped transactions"
        );
        Ok(())
    }

    fn wrap(&self, source: Error) -> Error {
        Error::InStore {
            path: self.path.clone(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
