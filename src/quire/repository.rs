//! # Store Repository
//!
//! The single source of truth for durable state. The whole [`Store`] is kept
//! as one JSON document in one slot, read once at startup and rewritten in
//! full after every mutation.
//!
//! ## Load and Repair
//!
//! - **Absent slot**: first run. A store with one notebook named
//!   "My First Notebook" is created and persisted.
//! - **Corrupt slot**: the value is not JSON or has no top-level `notebooks`
//!   array. A store with one "Recovered Notebook" is persisted over it. No
//!   partial repair is attempted.
//!
//! Recovery is logged and reported through [`LoadOrigin::Recovered`] so the
//! caller can tell the user.
//!
//! Once the `notebooks` array is there the slot is never overwritten on load.
//! Odd inner records are read leniently (see [`crate::model`]); if one still
//! fails to decode, `load` returns the error and leaves the slot alone.

use crate::error::Result;
use crate::model::{Store, FIRST_NOTEBOOK_NAME, RECOVERED_NOTEBOOK_NAME};
use crate::slot::SlotBackend;
use log::{debug, error, info, warn};

/// Reported by [`StoreRepository::size_info`] when the slot cannot be read.
pub const SIZE_NOT_AVAILABLE: &str = "N/A";

/// How [`StoreRepository::load`] obtained the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Existing,
    Fresh,
    Recovered,
}

#[derive(Debug)]
pub struct Loaded {
    pub store: Store,
    pub origin: LoadOrigin,
}

pub struct StoreRepository<B: SlotBackend> {
    backend: B,
    key: String,
}

impl<B: SlotBackend> StoreRepository<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn location(&self) -> String {
        self.backend.location(&self.key)
    }

    pub fn load(&self) -> Result<Loaded> {
        let raw = self.backend.read(&self.key)?;

        let Some(raw) = raw else {
            info!("event=store_load module=repository status=fresh key={}", self.key);
            return self.reset(FIRST_NOTEBOOK_NAME, LoadOrigin::Fresh);
        };

        let decoded = decode(&raw).inspect_err(|e| {
            error!(
                "event=store_load module=repository status=error key={} error={}",
                self.key, e
            );
        })?;

        match decoded {
            Some(store) => {
                debug!(
                    "event=store_load module=repository status=ok key={} notebooks={}",
                    self.key,
                    store.notebooks.len()
                );
                Ok(Loaded {
                    store,
                    origin: LoadOrigin::Existing,
                })
            }
            None => {
                warn!(
                    "event=store_load module=repository status=recovered key={} bytes={}",
                    self.key,
                    raw.len()
                );
                self.reset(RECOVERED_NOTEBOOK_NAME, LoadOrigin::Recovered)
            }
        }
    }

    fn reset(&self, name: &str, origin: LoadOrigin) -> Result<Loaded> {
        let store = Store::with_notebook(name);
        self.persist(&store)?;
        Ok(Loaded { store, origin })
    }

    /// Serialize the whole store and write it. No batching.
    pub fn persist(&self, store: &Store) -> Result<()> {
        let json = serde_json::to_string(store)?;
        if let Err(e) = self.backend.write(&self.key, &json) {
            error!(
                "event=store_persist module=repository status=error key={} bytes={} error={}",
                self.key,
                json.len(),
                e
            );
            return Err(e);
        }
        debug!(
            "event=store_persist module=repository status=ok key={} bytes={}",
            self.key,
            json.len()
        );
        Ok(())
    }

    /// Size of the stored value in kilobytes (UTF-8 bytes / 1024, one decimal).
    pub fn size_info(&self) -> String {
        match self.backend.read(&self.key) {
            Ok(raw) => format_kb(raw.map(|s| s.len()).unwrap_or(0)),
            Err(e) => {
                warn!(
                    "event=store_size module=repository status=error key={} error={}",
                    self.key, e
                );
                SIZE_NOT_AVAILABLE.to_string()
            }
        }
    }
}

/// `Ok(None)` means the value is corrupt and may be replaced. Errors past the
/// top-level shape check are returned as they are.
fn decode(raw: &str) -> Result<Option<Store>> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Ok(None);
    };
    if !value.get("notebooks").is_some_and(|n| n.is_array()) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

fn format_kb(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
