//! # Data Model
//!
//! `Store` → `Notebook` → `Page`, serialized camelCase exactly as the storage
//! slot and the JSON export hold it.
//!
//! ## Lenient decoding
//!
//! Once a document has a top-level `notebooks` array, decoding it never fails.
//! Inner records are taken as they come:
//! - string fields that are missing or `null` become empty, other JSON types
//!   keep their JSON text
//! - ids and `selectedId` are kept verbatim, UUID or not
//! - `lastModified` that is neither RFC 3339 nor epoch milliseconds reads as
//!   never saved
//! - non-object pages are blank pages, non-object notebooks are skipped
//! - page arrays are padded or cut to `MAX_PAGES`

use crate::index::PageIndex;
use chrono::{DateTime, Utc};
use log::warn;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Every notebook holds exactly this many pages.
pub const MAX_PAGES: usize = 100;

/// Name given to the notebook created on a first run.
pub const FIRST_NOTEBOOK_NAME: &str = "My First Notebook";

/// Name given to the notebook created when the slot held unreadable data.
pub const RECOVERED_NOTEBOOK_NAME: &str = "Recovered Notebook";

/// One dated entry in a notebook. Pages have no identity beyond their position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    /// `None` until the page is explicitly saved.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Page {
    pub fn is_saved(&self) -> bool {
        self.last_modified.is_some()
    }
}

/// Notebook identifier. New notebooks get a v4 UUID; stored ids are kept
/// exactly as found, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NotebookId(String);

impl NotebookId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotebookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotebookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NotebookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<Uuid> for NotebookId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NotebookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Self(s),
            Value::Number(n) => Self(n.to_string()),
            // Nothing to keep; the notebook still needs to be addressable.
            _ => Self::generate(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default = "NotebookId::generate")]
    pub id: NotebookId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Always exactly `MAX_PAGES` long; only slices are handed out.
    #[serde(default = "blank_pages", deserialize_with = "deserialize_pages")]
    pages: Vec<Page>,
}

impl Notebook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NotebookId::generate(),
            name: name.into(),
            pages: blank_pages(),
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Mutable access to the pages. The slice cannot change the page count.
    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn page(&self, index: PageIndex) -> &Page {
        &self.pages[index.zero_based()]
    }

    pub fn page_mut(&mut self, index: PageIndex) -> &mut Page {
        &mut self.pages[index.zero_based()]
    }

    /// Reset every page to blank.
    pub fn clear_pages(&mut self) {
        self.pages.fill(Page::default());
    }

    /// Number of pages that have been saved at least once.
    pub fn saved_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_saved()).count()
    }

    /// Most recent save across all pages.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.pages.iter().filter_map(|p| p.last_modified).max()
    }
}

fn blank_pages() -> Vec<Page> {
    vec![Page::default(); MAX_PAGES]
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

fn deserialize_pages<'de, D>(deserializer: D) -> Result<Vec<Page>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut pages: Vec<Page> = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .take(MAX_PAGES)
            .map(|item| match item {
                Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
                _ => Page::default(),
            })
            .collect(),
        _ => Vec::new(),
    };
    pages.resize_with(MAX_PAGES, Page::default);
    Ok(pages)
}

fn deserialize_notebooks<'de, D>(deserializer: D) -> Result<Vec<Notebook>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    let total = items.len();
    let mut notebooks = Vec::with_capacity(total);
    for item in items {
        if item.is_object() {
            notebooks.push(serde_json::from_value(item).map_err(D::Error::custom)?);
        }
    }
    if notebooks.len() < total {
        warn!(
            "event=store_decode module=model status=skipped records={}",
            total - notebooks.len()
        );
    }
    Ok(notebooks)
}

fn lenient_selection<'de, D>(deserializer: D) -> Result<Option<NotebookId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(NotebookId(s)),
        Value::Number(n) => Some(NotebookId(n.to_string())),
        _ => None,
    })
}

/// The full durable state: all notebooks plus the selection pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(deserialize_with = "deserialize_notebooks")]
    pub notebooks: Vec<Notebook>,
    #[serde(default, deserialize_with = "lenient_selection")]
    pub selected_id: Option<NotebookId>,
}

impl Store {
    /// A store holding a single, selected notebook.
    pub fn with_notebook(name: impl Into<String>) -> Self {
        let notebook = Notebook::new(name);
        Self {
            selected_id: Some(notebook.id.clone()),
            notebooks: vec![notebook],
        }
    }

    /// Position of the current notebook: the selected one if it resolves,
    /// otherwise the first. The selection pointer itself is left untouched.
    pub fn current_index(&self) -> Option<usize> {
        if self.notebooks.is_empty() {
            return None;
        }
        let selected = self
            .selected_id
            .as_ref()
            .and_then(|id| self.notebooks.iter().position(|nb| &nb.id == id));
        Some(selected.unwrap_or(0))
    }

    pub fn current(&self) -> Option<&Notebook> {
        self.current_index().map(|i| &self.notebooks[i])
    }

    pub fn current_mut(&mut self) -> Option<&mut Notebook> {
        self.current_index().map(move |i| &mut self.notebooks[i])
    }

    /// Whether `selected_id` names a notebook in this store.
    pub fn selection_resolves(&self) -> bool {
        self.selected_id
            .as_ref()
            .is_some_and(|id| self.notebooks.iter().any(|nb| &nb.id == id))
    }
}

/// The four editable fields of a page, held apart from the store until saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageBuffer {
    pub date: String,
    pub time: String,
    pub title: String,
    pub content: String,
}

impl From<&Page> for PageBuffer {
    fn from(page: &Page) -> Self {
        Self {
            date: page.date.clone(),
            time: page.time.clone(),
            title: page.title.clone(),
            content: page.content.clone(),
        }
    }
}
