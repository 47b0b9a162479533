// src/store.rs
//! Whole-document persistence. `load`/`save` is the only I/O the pipeline stages do;
//! tests swap in `MemoryStore`.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait Store<T> {
    fn load(&self) -> Result<T>;
    fn save(&self, value: &T) -> Result<()>;
}

/// JSON file on disk. An absent file loads as `T::default()`.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Store<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> Result<T> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "store file absent, using default");
            return Ok(T::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing {}", self.path.display()))
    }

    fn save(&self, value: &T) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("serializing {}", self.path.display()))?;

        // Write a sibling temp file, then rename over the target.
        let tmp = self.path.with_extension("json.tmp");
        let mut f =
            fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
        f.write_all(json.as_bytes())
            .and_then(|_| f.write_all(b"\n"))
            .with_context(|| format!("writing {}", tmp.display()))?;
        f.sync_all()
            .with_context(|| format!("syncing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

// --- Test helper ---
/// In-memory store holding a single value; counts saves.
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    value: Mutex<T>,
    saves: Mutex<usize>,
}

impl<T: Clone> MemoryStore<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            saves: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> T {
        self.value.lock().expect("memory store poisoned").clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().expect("memory store poisoned")
    }
}

impl<T: Clone> Store<T> for MemoryStore<T> {
    fn load(&self) -> Result<T> {
        Ok(self.snapshot())
    }

    fn save(&self, value: &T) -> Result<()> {
        *self.value.lock().expect("memory store poisoned") = value.clone();
        *self.saves.lock().expect("memory store poisoned") += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candidate, CandidateStore};

    #[test]
    fn absent_file_loads_default_and_save_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("candidates.json");
        let store: JsonFileStore<CandidateStore> = JsonFileStore::new(&path);

        assert!(store.load().unwrap().is_empty());

        let value = CandidateStore {
            candidates: vec![Candidate {
                id: "abc123def4".into(),
                title_suggested: "Perché sì".into(),
                url: "https://example.test/a".into(),
                ..Default::default()
            }],
        };
        store.save(&value).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Perché sì"), "non-ASCII kept verbatim: {raw}");
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(store.load().unwrap(), value);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numeri.json");
        fs::write(&path, "{ not json").unwrap();
        let store: JsonFileStore<CandidateStore> = JsonFileStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(format!("{err:#}").contains("numeri.json"));
    }
}
