use crate::commands::{CmdMessage, CmdResult, StoreEvent};
use crate::error::{QuireError, Result};
use crate::model::{Notebook, NotebookId, Store};
use crate::repository::StoreRepository;
use crate::slot::SlotBackend;
use chrono::{DateTime, Utc};
use log::info;

/// One line of the notebook listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookSummary {
    /// 1-based position in the store.
    pub position: usize,
    pub id: NotebookId,
    pub name: String,
    pub saved_pages: usize,
    pub last_modified: Option<DateTime<Utc>>,
    pub is_current: bool,
}

pub fn create<B: SlotBackend>(
    repo: &StoreRepository<B>,
    store: &mut Store,
    name: &str,
) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(QuireError::Validation(
            "Notebook name cannot be empty".to_string(),
        ));
    }

    let notebook = Notebook::new(name);
    let id = notebook.id.clone();
    store.notebooks.push(notebook);
    store.selected_id = Some(id.clone());
    info!(
        "event=notebook_create module=notebooks status=ok id={} notebooks={}",
        id,
        store.notebooks.len()
    );
    repo.persist(store)?;

    let mut result = CmdResult::default().with_notebook_id(id.clone());
    result.add_event(StoreEvent::SelectionChanged(id));
    result.add_message(CmdMessage::success(format!("Notebook created: {}", name)));
    Ok(result)
}

/// Point the selection at `id`. The id is stored as given; readers fall back
/// to the first notebook if it does not resolve.
pub fn select<B: SlotBackend>(
    repo: &StoreRepository<B>,
    store: &mut Store,
    id: NotebookId,
) -> Result<CmdResult> {
    store.selected_id = Some(id.clone());
    repo.persist(store)?;

    let mut result = CmdResult::default().with_notebook_id(id.clone());
    if let Some(nb) = store.notebooks.iter().find(|nb| nb.id == id) {
        result.add_message(CmdMessage::success(format!("Switched to: {}", nb.name)));
    }
    result.add_event(StoreEvent::SelectionChanged(id));
    Ok(result)
}

pub fn current(store: &Store) -> Result<&Notebook> {
    store.current().ok_or(QuireError::NoNotebooks)
}

pub fn current_mut(store: &mut Store) -> Result<&mut Notebook> {
    store.current_mut().ok_or(QuireError::NoNotebooks)
}

pub fn list(store: &Store) -> Vec<NotebookSummary> {
    let current = store.current_index();
    store
        .notebooks
        .iter()
        .enumerate()
        .map(|(i, nb)| NotebookSummary {
            position: i + 1,
            id: nb.id.clone(),
            name: nb.name.clone(),
            saved_pages: nb.saved_pages(),
            last_modified: nb.last_modified(),
            is_current: current == Some(i),
        })
        .collect()
}

/// Resolve a user-typed selector: a 1-based position, an exact id, or an
/// exact (case-insensitive) name, tried in that order.
pub fn resolve(store: &Store, selector: &str) -> Option<NotebookId> {
    let selector = selector.trim();
    if let Ok(pos) = selector.parse::<usize>() {
        return pos
            .checked_sub(1)
            .and_then(|i| store.notebooks.get(i))
            .map(|nb| nb.id.clone());
    }
    store
        .notebooks
        .iter()
        .find(|nb| nb.id.as_str() == selector)
        .or_else(|| {
            store
                .notebooks
                .iter()
                .find(|nb| nb.name.eq_ignore_ascii_case(selector))
        })
        .map(|nb| nb.id.clone())
}
