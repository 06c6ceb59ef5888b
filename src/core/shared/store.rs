//! Flat JSON file collections
//!
//! Every collection is a single JSON array on disk. Reads load the whole
//! file, writes replace the whole file (pretty printed). The file is written
//! to a sibling `*.tmp` first and renamed over the target.
//!
//! A record that is valid JSON but does not fit the record type is skipped
//! with a warning and written back unchanged (after the readable records) on
//! the next modification, so it is never silently dropped.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::error::{CrmError, CrmResult};

/// How a collection reacts to a missing file or one that is not a JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Missing file reads as empty, malformed file is an error.
    Strict,
    /// Missing file is created as `[]`, malformed file reads as empty.
    SelfHealing,
}

struct Snapshot<T> {
    items: Vec<T>,
    unreadable: Vec<Value>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Record<'a, T> {
    Item(&'a T),
    Raw(&'a Value),
}

impl<T> Snapshot<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            unreadable: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct JsonCollection<T> {
    path: PathBuf,
    mode: ReadMode,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>, mode: ReadMode) -> Self {
        Self {
            path: path.into(),
            mode,
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order.
    pub fn load(&self) -> CrmResult<Vec<T>> {
        let _guard = self.guard();
        Ok(self.read_unlocked()?.items)
    }

    /// Run a read-modify-write cycle. The file is rewritten only when `f`
    /// returns `Ok`; an error leaves it untouched.
    pub fn modify<R>(&self, f: impl FnOnce(&mut Vec<T>) -> CrmResult<R>) -> CrmResult<R> {
        let _guard = self.guard();
        let mut snapshot = self.read_unlocked()?;
        let out = f(&mut snapshot.items)?;
        self.write_unlocked(&snapshot)?;
        Ok(out)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_unlocked(&self) -> CrmResult<Snapshot<T>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.mode == ReadMode::SelfHealing {
                    self.ensure_parent()?;
                    fs::write(&self.path, "[]")?;
                    info!("Created empty collection file {}", self.path.display());
                }
                return Ok(Snapshot::empty());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Snapshot::empty());
        }

        let records: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) if self.mode == ReadMode::SelfHealing => {
                warn!(
                    "Unreadable collection {}, treating as empty: {}",
                    self.path.display(),
                    e
                );
                return Ok(Snapshot::empty());
            }
            Err(e) => return Err(e.into()),
        };

        let mut snapshot = Snapshot::empty();
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<T>(record.clone()) {
                Ok(item) => snapshot.items.push(item),
                Err(e) => {
                    warn!(
                        "Skipping record {} in {}: {}",
                        index,
                        self.path.display(),
                        e
                    );
                    snapshot.unreadable.push(record);
                }
            }
        }
        Ok(snapshot)
    }

    fn write_unlocked(&self, snapshot: &Snapshot<T>) -> CrmResult<()> {
        let records: Vec<Record<'_, T>> = snapshot
            .items
            .iter()
            .map(Record::Item)
            .chain(snapshot.unreadable.iter().map(Record::Raw))
            .collect();

        let body = serde_json::to_string_pretty(&records)?;
        self.ensure_parent()?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn ensure_parent(&self) -> CrmResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Shallow merge of `patch` onto `record`, like an object spread. Keys in the
/// patch replace keys in the record; nested objects are not merged.
pub fn merge_patch<T>(record: &T, patch: &Map<String, Value>) -> CrmResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(record)?;
    let Value::Object(fields) = &mut value else {
        return Err(CrmError::Internal("record is not a JSON object".to_string()));
    };
    for (key, val) in patch {
        fields.insert(key.clone(), val.clone());
    }
    serde_json::from_value(value).map_err(|e| CrmError::validation(format!("Invalid update: {e}")))
}
