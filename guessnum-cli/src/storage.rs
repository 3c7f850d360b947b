//! JSON file standing in for browser key-value storage.
use guessnum_game::ProfileStorage;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Every key lives in one JSON object on disk, `{ key: text }`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// An unreadable envelope counts as corrupt data: it reads as empty and
    /// the next save replaces it.
    fn read_all(&self) -> io::Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text).unwrap_or_else(|err| {
                log::warn!(
                    "ignoring corrupt save file {}: {err}",
                    self.path.display()
                );
                BTreeMap::new()
            })),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(entries).map_err(io::Error::other)?;
        fs::write(&self.path, text)
    }
}

impl ProfileStorage for FileStorage {
    type Error = io::Error;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, text: &str) -> Result<(), Self::Error> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), text.to_string());
        self.write_all(&entries)?;
        log::debug!("saved {key} to {}", self.path.display());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), Self::Error> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
