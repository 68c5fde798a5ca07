//! File-backed key-value store.
//!
//! Every key is one `<key>.json` file in a directory. Writes go to a
//! temporary sibling first and are renamed into place.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

use super::KeyValueStore;

const EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// A [`KeyValueStore`] keeping one JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) a store directory.
    pub fn open(dir: impl Into<PathBuf>) -> LedgerResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| LedgerError::Storage {
            key: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", sanitize_key(key), EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        let path = self.path_for(key);
        let tmp = tmp_path(&path);
        write_file(&tmp, value).map_err(|e| storage_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| storage_error(key, e))?;
        debug!(key, path = %path.display(), bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(key, e)),
        }
    }
}

fn write_file(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

fn tmp_path(path: &Path) -> PathBuf {
    path.with_extension(format!("{}.{}", EXTENSION, TMP_SUFFIX))
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn storage_error(key: &str, error: std::io::Error) -> LedgerError {
    LedgerError::Storage {
        key: key.to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        JsonFileStore::open(dir.path())
            .unwrap()
            .set("shiftHistory", "[]")
            .unwrap();

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("shiftHistory").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("expenses").unwrap(), None);
        store.remove("expenses").unwrap();
    }

    #[test]
    fn test_no_temporary_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.set("expenses", "[1]").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["expenses.json"]);
    }

    #[test]
    fn test_keys_are_sanitized_into_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(
            store.path_for("../escape me"),
            dir.path().join("___escape_me.json")
        );
    }
}
