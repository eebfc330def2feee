//! # Page Editor
//!
//! A one-page-at-a-time view into the store. The editor remembers which
//! notebook and page it shows and keeps an editable [`PageBuffer`]. Nothing in
//! the buffer is durable until it is saved through
//! [`pages::save`](crate::commands::pages::save).
//!
//! The editor never holds a copy of the page itself, only the notebook id and
//! the index, so it cannot drift from the store.

use crate::commands::pages;
use crate::error::Result;
use crate::index::PageIndex;
use crate::model::{NotebookId, PageBuffer, Store};

#[derive(Debug, Clone, Default)]
pub struct PageEditor {
    notebook_id: Option<NotebookId>,
    page: PageIndex,
    buffer: PageBuffer,
}

impl PageEditor {
    /// Point at the current notebook, page 1.
    pub fn attach(store: &Store) -> Result<Self> {
        let mut editor = Self::default();
        editor.reset(store)?;
        Ok(editor)
    }

    /// Back to page 1 of whatever notebook is now current.
    pub fn reset(&mut self, store: &Store) -> Result<()> {
        self.page = PageIndex::FIRST;
        self.reload(store)
    }

    /// Refill the buffer from the store, discarding unsaved edits.
    pub fn reload(&mut self, store: &Store) -> Result<()> {
        self.notebook_id = store.current().map(|nb| nb.id.clone());
        self.buffer = if self.notebook_id.is_some() {
            pages::load(store, self.page)?
        } else {
            PageBuffer::default()
        };
        Ok(())
    }

    pub fn goto(&mut self, store: &Store, page: PageIndex) -> Result<()> {
        self.page = page;
        self.reload(store)
    }

    pub fn next(&mut self, store: &Store) -> Result<()> {
        self.goto(store, self.page.next())
    }

    pub fn prev(&mut self, store: &Store) -> Result<()> {
        self.goto(store, self.page.prev())
    }

    pub fn page(&self) -> PageIndex {
        self.page
    }

    pub fn notebook_id(&self) -> Option<&NotebookId> {
        self.notebook_id.as_ref()
    }

    pub fn buffer(&self) -> &PageBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PageBuffer {
        &mut self.buffer
    }

    /// Whether the buffer differs from the stored page.
    pub fn is_dirty(&self, store: &Store) -> bool {
        match store.current() {
            Some(nb) => PageBuffer::from(nb.page(self.page)) != self.buffer,
            None => false,
        }
    }
}
