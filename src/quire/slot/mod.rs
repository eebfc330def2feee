//! # Slot Layer
//!
//! Durable state lives in a single opaque slot: one string value addressed by a
//! fixed key. The [`SlotBackend`] trait is the only thing the rest of quire
//! knows about storage.
//!
//! ## Implementations
//!
//! - [`fs::FsSlot`]: one file per key, `<root>/<key>.json`, written atomically
//!   (temp file, then rename).
//! - [`memory::MemSlot`]: an in-memory map for tests. It can simulate write
//!   failures and a byte quota.
//!
//! The slot does not interpret its value. Parsing, repair and serialization
//! belong to [`crate::repository::StoreRepository`].

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Raw access to keyed string slots.
pub trait SlotBackend {
    /// Read a slot. Returns `Ok(None)` if the slot has never been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's whole value.
    /// Failures (quota, permissions, disk) surface as `QuireError::SlotWrite`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Human-readable location of the slot, for display only.
    fn location(&self, key: &str) -> String;
}
