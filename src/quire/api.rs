//! # API Facade
//!
//! [`QuireApi`] is the session handle: it owns the repository, the in-memory
//! [`Store`] and the [`PageEditor`] view, and every UI talks to quire through
//! it. There is no global state; whoever opens the API owns the session.
//!
//! ## Role and Responsibilities
//!
//! The API:
//! - **Dispatches** to the command functions in `commands/*.rs`
//! - **Keeps the editor consistent**: after a selection change or an import
//!   the editor goes back to page 1 of the current notebook; after a save or
//!   clear it reloads from the stored page
//! - **Returns structured types** (`Result<CmdResult>`, artifacts, strings)
//!
//! Business rules live in the commands, not here.
//!
//! ## Generic Over SlotBackend
//!
//! - Production: `QuireApi<FsSlot>`
//! - Testing: `QuireApi<MemSlot>`

use crate::commands::export::{self, ExportArtifact};
use crate::commands::notebooks::{self, NotebookSummary};
use crate::commands::pages::{self, DestructivePreview, STATUS_DATE_FORMAT};
use crate::commands::{import, CmdMessage, CmdResult, Confirmation};
use crate::editor::PageEditor;
use crate::error::{QuireError, Result};
use crate::index::PageIndex;
use crate::model::{Notebook, NotebookId, PageBuffer, Store};
use crate::repository::{LoadOrigin, StoreRepository};
use crate::slot::SlotBackend;

pub struct QuireApi<B: SlotBackend> {
    repo: StoreRepository<B>,
    store: Store,
    editor: PageEditor,
    origin: LoadOrigin,
    date_format: String,
}

impl<B: SlotBackend> QuireApi<B> {
    /// Load (and if needed repair) the store behind `key`.
    pub fn open(backend: B, key: impl Into<String>) -> Result<Self> {
        let repo = StoreRepository::new(backend, key);
        let loaded = repo.load()?;
        let editor = PageEditor::attach(&loaded.store)?;
        Ok(Self {
            repo,
            store: loaded.store,
            editor,
            origin: loaded.origin,
            date_format: STATUS_DATE_FORMAT.to_string(),
        })
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// How the store was obtained at open time.
    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    /// A message describing `origin`, if the user should hear about it.
    pub fn load_message(&self) -> Option<CmdMessage> {
        match self.origin {
            LoadOrigin::Existing => None,
            LoadOrigin::Fresh => Some(CmdMessage::info("Created a new notebook store.")),
            LoadOrigin::Recovered => Some(CmdMessage::warning(
                "Stored data was unreadable and has been replaced with a new notebook.",
            )),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn repository(&self) -> &StoreRepository<B> {
        &self.repo
    }

    pub fn persist(&self) -> Result<()> {
        self.repo.persist(&self.store)
    }

    // --- Notebooks ---

    pub fn create_notebook(&mut self, name: &str) -> Result<CmdResult> {
        let result = notebooks::create(&self.repo, &mut self.store, name)?;
        self.observe(&result)?;
        Ok(result)
    }

    pub fn select_notebook(&mut self, id: NotebookId) -> Result<CmdResult> {
        let result = notebooks::select(&self.repo, &mut self.store, id)?;
        self.observe(&result)?;
        Ok(result)
    }

    pub fn current_notebook(&self) -> Result<&Notebook> {
        notebooks::current(&self.store)
    }

    pub fn list_notebooks(&self) -> Vec<NotebookSummary> {
        notebooks::list(&self.store)
    }

    pub fn resolve_notebook(&self, selector: &str) -> Option<NotebookId> {
        notebooks::resolve(&self.store, selector)
    }

    // --- Page editor ---

    pub fn page(&self) -> PageIndex {
        self.editor.page()
    }

    pub fn buffer(&self) -> &PageBuffer {
        self.editor.buffer()
    }

    pub fn buffer_mut(&mut self) -> &mut PageBuffer {
        self.editor.buffer_mut()
    }

    pub fn goto(&mut self, page: PageIndex) -> Result<()> {
        self.editor.goto(&self.store, page)
    }

    pub fn next(&mut self) -> Result<()> {
        self.editor.next(&self.store)
    }

    pub fn prev(&mut self) -> Result<()> {
        self.editor.prev(&self.store)
    }

    /// Commit the buffer to the current page.
    pub fn save_page(&mut self) -> Result<CmdResult> {
        let buffer = self.editor.buffer().clone();
        let result = pages::save(&self.repo, &mut self.store, self.editor.page(), &buffer);
        // Memory holds the save even if the slot write failed.
        self.editor.reload(&self.store)?;
        result
    }

    pub fn preview_clear(&self) -> Result<DestructivePreview> {
        pages::preview_clear(&self.store, self.editor.page())
    }

    pub fn clear_page(&mut self, confirmation: Confirmation) -> Result<CmdResult> {
        let result = pages::clear(&self.repo, &mut self.store, self.editor.page(), confirmation);
        self.editor.reload(&self.store)?;
        result
    }

    pub fn preview_erase(&self) -> Result<DestructivePreview> {
        pages::preview_erase(&self.store)
    }

    pub fn erase_notebook(&mut self, confirmation: Confirmation) -> Result<CmdResult> {
        let result = pages::erase(&self.repo, &mut self.store, confirmation);
        self.editor.reload(&self.store)?;
        result
    }

    pub fn status_line(&self) -> Result<String> {
        let notebook = notebooks::current(&self.store)?;
        Ok(pages::status_line(
            notebook,
            self.editor.page(),
            &self.date_format,
        ))
    }

    // --- Export / import ---

    pub fn export_csv(&self) -> Result<ExportArtifact> {
        export::csv_artifact(notebooks::current(&self.store)?)
    }

    pub fn export_json(&self) -> Result<ExportArtifact> {
        export::json_artifact(&self.store)
    }

    pub fn import_json(&mut self, text: &str) -> Result<CmdResult> {
        let outcome = import::run(&self.repo, &mut self.store, text);
        match &outcome {
            Err(QuireError::Validation(_)) => {}
            // A failed slot write still replaced the in-memory store.
            _ => self.editor.reset(&self.store)?,
        }
        outcome
    }

    pub fn size_info(&self) -> String {
        self.repo.size_info()
    }

    fn observe(&mut self, result: &CmdResult) -> Result<()> {
        if result.resets_view() {
            self.editor.reset(&self.store)?;
        }
        Ok(())
    }
}
