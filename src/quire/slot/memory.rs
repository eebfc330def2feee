use super::SlotBackend;
use crate::error::{QuireError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory slot storage for testing.
///
/// Uses `RefCell` for interior mutability since quire is single-threaded,
/// which lets `SlotBackend` take `&self` everywhere.
#[derive(Default)]
pub struct MemSlot {
    slots: RefCell<HashMap<String, String>>,
    simulate_write_error: RefCell<bool>,
    simulate_read_error: RefCell<bool>,
    quota: Option<usize>,
    writes: RefCell<usize>,
}

impl MemSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose value exceeds `bytes`, the way a browser's
    /// storage quota does.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Seed a slot without counting it as a write.
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.borrow_mut() = simulate;
    }

    /// Current raw value of a slot.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl SlotBackend for MemSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        if *self.simulate_read_error.borrow() {
            return Err(QuireError::Io(std::io::Error::other(
                "Simulated read error",
            )));
        }
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(QuireError::SlotWrite {
                key: key.to_string(),
                reason: "Simulated write error".to_string(),
            });
        }
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(QuireError::SlotWrite {
                    key: key.to_string(),
                    reason: format!("quota exceeded ({} > {} bytes)", value.len(), quota),
                });
            }
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("memory://{}", key)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::config::DEFAULT_SLOT_KEY;
    use crate::model::{Notebook, Store};
    use chrono::Utc;

    /// Builds a `MemSlot` pre-loaded with a serialized store.
    pub struct SlotFixture {
        pub store: Store,
    }

    impl Default for SlotFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SlotFixture {
        pub fn new() -> Self {
            Self {
                store: Store::default(),
            }
        }

        pub fn with_notebook(mut self, name: &str) -> Self {
            let nb = Notebook::new(name);
            if self.store.selected_id.is_none() {
                self.store.selected_id = Some(nb.id.clone());
            }
            self.store.notebooks.push(nb);
            self
        }

        /// Fill a page (1-based) of the last added notebook and mark it saved.
        pub fn with_saved_page(mut self, page: usize, title: &str, content: &str) -> Self {
            let nb = self
                .store
                .notebooks
                .last_mut()
                .expect("add a notebook before its pages");
            let p = &mut nb.pages_mut()[page - 1];
            p.title = title.to_string();
            p.content = content.to_string();
            p.last_modified = Some(Utc::now());
            self
        }

        pub fn build(self) -> MemSlot {
            let json = serde_json::to_string(&self.store).expect("store serializes");
            MemSlot::new().with_value(DEFAULT_SLOT_KEY, &json)
        }
    }
}
