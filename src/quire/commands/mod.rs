//! # Command Layer
//!
//! The core logic of quire. Each command is a plain function over the
//! in-memory [`Store`](crate::model::Store) and, when it mutates, the
//! [`StoreRepository`](crate::repository::StoreRepository) it persists through.
//!
//! ## Rules
//!
//! - Validate first, mutate second, persist last. A validation error leaves the
//!   store untouched.
//! - A persist failure is returned as an error but the in-memory mutation
//!   stays applied: memory is correct, the durable copy is stale.
//! - No I/O beyond the repository, no prompts. Destructive commands take a
//!   [`Confirmation`] that the caller obtained however it likes.
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`]: messages with a level for the UI to render,
//! the page or notebooks the command touched, and [`StoreEvent`]s telling
//! observers what changed.
//!
//! ## Command Modules
//!
//! - [`notebooks`]: create, select, resolve and list notebooks
//! - [`pages`]: load, save, clear and erase pages, plus the status line
//! - [`export`]: CSV (one notebook) and JSON (whole store)
//! - [`import`]: JSON restore

use crate::index::PageIndex;
use crate::model::{NotebookId, Page};
use serde::Serialize;

pub mod export;
pub mod import;
pub mod notebooks;
pub mod pages;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What changed in the store, for anything holding a view into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// `selected_id` was set. Views reset to page 1.
    SelectionChanged(NotebookId),
    /// The whole store was replaced by an import.
    StoreReplaced,
    /// One page was written (saved or cleared).
    PageChanged {
        notebook: NotebookId,
        page: PageIndex,
    },
    /// Every page of a notebook was reset.
    NotebookErased(NotebookId),
}

/// Answer to a destructive-action guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// The page as stored after the command, when a single page was touched.
    pub page: Option<(PageIndex, Page)>,
    pub notebook_id: Option<NotebookId>,
    pub events: Vec<StoreEvent>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn add_event(&mut self, event: StoreEvent) {
        self.events.push(event);
    }

    pub fn with_page(mut self, index: PageIndex, page: Page) -> Self {
        self.page = Some((index, page));
        self
    }

    pub fn with_notebook_id(mut self, id: NotebookId) -> Self {
        self.notebook_id = Some(id);
        self
    }

    /// Whether observers must reset their page cursor.
    pub fn resets_view(&self) -> bool {
        self.events.iter().any(|e| {
            matches!(
                e,
                StoreEvent::SelectionChanged(_) | StoreEvent::StoreReplaced
            )
        })
    }

    /// A declined destructive command.
    pub fn cancelled() -> Self {
        let mut res = CmdResult::default();
        res.add_message(CmdMessage::info("Operation cancelled."));
        res
    }
}
