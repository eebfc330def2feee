use crate::commands::notebooks::{current, current_mut};
use crate::commands::{CmdMessage, CmdResult, Confirmation, StoreEvent};
use crate::error::Result;
use crate::index::PageIndex;
use crate::model::{Notebook, Page, PageBuffer, Store, MAX_PAGES};
use crate::repository::StoreRepository;
use crate::slot::SlotBackend;
use chrono::{Local, Utc};
use log::info;

/// Default chrono format for the "last saved" part of the status line.
pub const STATUS_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a destructive command would reset.
/// Shown to the user before asking for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestructivePreview {
    pub notebook_name: String,
    pub pages: Vec<PageIndex>,
    /// How many of `pages` hold saved content that would be lost.
    pub saved_pages: usize,
}

/// Copy a page of the current notebook into a fresh buffer.
pub fn load(store: &Store, index: PageIndex) -> Result<PageBuffer> {
    let notebook = current(store)?;
    Ok(PageBuffer::from(notebook.page(index)))
}

pub fn save<B: SlotBackend>(
    repo: &StoreRepository<B>,
    store: &mut Store,
    index: PageIndex,
    buffer: &PageBuffer,
) -> Result<CmdResult> {
    let notebook = current_mut(store)?;
    let notebook_id = notebook.id.clone();
    let page = notebook.page_mut(index);
    page.date = buffer.date.clone();
    page.time = buffer.time.clone();
    page.title = buffer.title.trim().to_string();
    page.content = buffer.content.clone();
    page.last_modified = Some(Utc::now());
    let saved = page.clone();

    info!(
        "event=page_save module=pages status=ok notebook={} page={} bytes={}",
        notebook_id,
        index,
        saved.content.len()
    );
    repo.persist(store)?;

    let mut result = CmdResult::default()
        .with_notebook_id(notebook_id.clone())
        .with_page(index, saved);
    result.add_event(StoreEvent::PageChanged {
        notebook: notebook_id,
        page: index,
    });
    result.add_message(CmdMessage::success(format!("Saved page {}", index)));
    Ok(result)
}

pub fn preview_clear(store: &Store, index: PageIndex) -> Result<DestructivePreview> {
    let notebook = current(store)?;
    Ok(DestructivePreview {
        notebook_name: notebook.name.clone(),
        pages: vec![index],
        saved_pages: usize::from(notebook.page(index).is_saved()),
    })
}

/// Reset one page to blank. A declined confirmation changes nothing.
pub fn clear<B: SlotBackend>(
    repo: &StoreRepository<B>,
    store: &mut Store,
    index: PageIndex,
    confirmation: Confirmation,
) -> Result<CmdResult> {
    if confirmation == Confirmation::Declined {
        return Ok(CmdResult::cancelled());
    }

    let notebook = current_mut(store)?;
    let notebook_id = notebook.id.clone();
    *notebook.page_mut(index) = Page::default();

    info!(
        "event=page_clear module=pages status=ok notebook={} page={}",
        notebook_id, index
    );
    repo.persist(store)?;

    let mut result = CmdResult::default()
        .with_notebook_id(notebook_id.clone())
        .with_page(index, Page::default());
    result.add_event(StoreEvent::PageChanged {
        notebook: notebook_id,
        page: index,
    });
    result.add_message(CmdMessage::success(format!("Cleared page {}", index)));
    Ok(result)
}

pub fn preview_erase(store: &Store) -> Result<DestructivePreview> {
    let notebook = current(store)?;
    Ok(DestructivePreview {
        notebook_name: notebook.name.clone(),
        pages: PageIndex::all().collect(),
        saved_pages: notebook.saved_pages(),
    })
}

/// Reset every page of the current notebook. A declined confirmation changes
/// nothing.
pub fn erase<B: SlotBackend>(
    repo: &StoreRepository<B>,
    store: &mut Store,
    confirmation: Confirmation,
) -> Result<CmdResult> {
    if confirmation == Confirmation::Declined {
        return Ok(CmdResult::cancelled());
    }

    let notebook = current_mut(store)?;
    let notebook_id = notebook.id.clone();
    let name = notebook.name.clone();
    let lost = notebook.saved_pages();
    notebook.clear_pages();

    info!(
        "event=notebook_erase module=pages status=ok notebook={} saved_pages={}",
        notebook_id, lost
    );
    repo.persist(store)?;

    let mut result = CmdResult::default()
        .with_notebook_id(notebook_id.clone())
        .with_page(PageIndex::FIRST, Page::default());
    result.add_event(StoreEvent::NotebookErased(notebook_id));
    result.add_message(CmdMessage::success(format!("Erased all pages of {}", name)));
    Ok(result)
}

/// `"<name> | page X/100 | last saved <when>"`, or `never saved`.
pub fn status_line(notebook: &Notebook, index: PageIndex, date_format: &str) -> String {
    let saved = match notebook.page(index).last_modified {
        Some(ts) => format!(
            "last saved {}",
            ts.with_timezone(&Local).format(date_format)
        ),
        None => "never saved".to_string(),
    };
    format!(
        "{} | page {}/{} | {}",
        notebook.name, index, MAX_PAGES, saved
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SLOT_KEY;
    use crate::error::QuireError;
    use crate::slot::memory::fixtures::SlotFixture;
    use crate::slot::memory::MemSlot;

    fn setup() -> (StoreRepository<MemSlot>, Store) {
        let slot = SlotFixture::new()
            .with_notebook("A")
            .with_saved_page(2, "Two", "second")
            .with_saved_page(9, "Nine", "ninth")
            .build();
        let repo = StoreRepository::new(slot, DEFAULT_SLOT_KEY);
        let store = repo.load().unwrap().store;
        (repo, store)
    }

    fn persisted(repo: &StoreRepository<MemSlot>) -> Store {
        serde_json::from_str(&repo.backend().raw(DEFAULT_SLOT_KEY).unwrap()).unwrap()
    }

    fn buffer(title: &str, content: &str) -> PageBuffer {
        PageBuffer {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn load_copies_editable_fields() {
        let (_repo, store) = setup();
        let buf = load(&store, PageIndex::clamp(2)).unwrap();
        assert_eq!(buf.title, "Two");
        assert_eq!(buf.content, "second");
        assert_eq!(load(&store, PageIndex::clamp(3)).unwrap(), PageBuffer::default());
    }

    #[test]
    fn save_writes_only_target_page() {
        let (repo, mut store) = setup();
        let before = store.clone();
        let idx = PageIndex::clamp(5);

        let res = save(&repo, &mut store, idx, &buffer("Hi", "World")).unwrap();

        let page = &store.notebooks[0].pages()[4];
        assert_eq!(page.title, "Hi");
        assert_eq!(page.content, "World");
        assert!(page.last_modified.is_some());
        for i in (0..MAX_PAGES).filter(|i| *i != 4) {
            assert_eq!(store.notebooks[0].pages()[i], before.notebooks[0].pages()[i]);
        }
        assert_eq!(res.page.as_ref().unwrap().1, *page);
        assert_eq!(load(&store, idx).unwrap(), buffer("Hi", "World"));
        assert_eq!(persisted(&repo), store);
    }

    #[test]
    fn save_trims_title_only() {
        let (repo, mut store) = setup();
        let idx = PageIndex::clamp(1);
        let buf = PageBuffer {
            date: " 2024-01-01 ".into(),
            time: "09:00".into(),
            title: "  Padded  ".into(),
            content: "  body  ".into(),
        };
        let res = save(&repo, &mut store, idx, &buf).unwrap();
        let (_, page) = res.page.unwrap();
        assert_eq!(page.title, "Padded");
        assert_eq!(page.content, "  body  ");
        assert_eq!(page.date, " 2024-01-01 ");
        assert_eq!(page.time, "09:00");
    }

    #[test]
    fn saving_twice_only_moves_timestamp_forward() {
        let (repo, mut store) = setup();
        let idx = PageIndex::clamp(7);
        let buf = buffer("Same", "Same body");

        save(&repo, &mut store, idx, &buf).unwrap();
        let first = store.notebooks[0].pages()[6].clone();
        save(&repo, &mut store, idx, &buf).unwrap();
        let second = store.notebooks[0].pages()[6].clone();

        assert!(second.last_modified >= first.last_modified);
        assert_eq!(
            Page {
                last_modified: None,
                ..first
            },
            Page {
                last_modified: None,
                ..second
            }
        );
    }

    #[test]
    fn save_persist_failure_keeps_memory_state() {
        let (repo, mut store) = setup();
        repo.backend().set_simulate_write_error(true);
        let idx = PageIndex::clamp(5);
        let err = save(&repo, &mut store, idx, &buffer("Hi", "World")).unwrap_err();
        assert!(matches!(err, QuireError::SlotWrite { .. }));
        assert_eq!(store.notebooks[0].pages()[4].title, "Hi");
        assert_eq!(persisted(&repo).notebooks[0].pages()[4].title, "");
    }

    #[test]
    fn clear_confirmed_blanks_page() {
        let (repo, mut store) = setup();
        let idx = PageIndex::clamp(2);
        let preview = preview_clear(&store, idx).unwrap();
        assert_eq!(preview.saved_pages, 1);
        assert_eq!(preview.pages, vec![idx]);

        clear(&repo, &mut store, idx, Confirmation::Confirmed).unwrap();
        assert_eq!(store.notebooks[0].pages()[1], Page::default());
        assert_eq!(store.notebooks[0].pages()[8].title, "Nine");
        assert_eq!(persisted(&repo), store);
    }

    #[test]
    fn clear_declined_is_a_no_op() {
        let (repo, mut store) = setup();
        let before = store.clone();
        let raw_before = repo.backend().raw(DEFAULT_SLOT_KEY);
        let writes = repo.backend().write_count();

        let res = clear(&repo, &mut store, PageIndex::clamp(2), Confirmation::Declined).unwrap();
        assert!(res.events.is_empty());
        assert_eq!(store, before);
        assert_eq!(repo.backend().raw(DEFAULT_SLOT_KEY), raw_before);
        assert_eq!(repo.backend().write_count(), writes);
    }

    #[test]
    fn erase_confirmed_blanks_all_pages() {
        let (repo, mut store) = setup();
        let preview = preview_erase(&store).unwrap();
        assert_eq!(preview.pages.len(), MAX_PAGES);
        assert_eq!(preview.saved_pages, 2);
        assert_eq!(preview.notebook_name, "A");

        let res = erase(&repo, &mut store, Confirmation::Confirmed).unwrap();
        let nb = &store.notebooks[0];
        assert_eq!(nb.pages().len(), MAX_PAGES);
        assert!(nb.pages().iter().all(|p| *p == Page::default()));
        assert_eq!(res.events, vec![StoreEvent::NotebookErased(nb.id.clone())]);

        let on_disk = persisted(&repo);
        assert!(on_disk.notebooks[0]
            .pages()
            .iter()
            .all(|p| p.last_modified.is_none() && p.title.is_empty()));
    }

    #[test]
    fn erase_declined_is_a_no_op() {
        let (repo, mut store) = setup();
        let before = store.clone();
        let writes = repo.backend().write_count();
        erase(&repo, &mut store, Confirmation::Declined).unwrap();
        assert_eq!(store, before);
        assert_eq!(repo.backend().write_count(), writes);
    }

    #[test]
    fn status_line_formats() {
        let (_repo, store) = setup();
        let nb = &store.notebooks[0];
        assert_eq!(
            status_line(nb, PageIndex::clamp(3), STATUS_DATE_FORMAT),
            "A | page 3/100 | never saved"
        );
        let saved = status_line(nb, PageIndex::clamp(2), STATUS_DATE_FORMAT);
        assert!(saved.starts_with("A | page 2/100 | last saved "));
        assert!(!saved.contains("never"));
    }

    #[test]
    fn commands_need_a_notebook() {
        let repo = StoreRepository::new(MemSlot::new(), DEFAULT_SLOT_KEY);
        let mut store = Store::default();
        assert!(matches!(
            load(&store, PageIndex::FIRST),
            Err(QuireError::NoNotebooks)
        ));
        assert!(matches!(
            save(&repo, &mut store, PageIndex::FIRST, &PageBuffer::default()),
            Err(QuireError::NoNotebooks)
        ));
        assert!(matches!(
            erase(&repo, &mut store, Confirmation::Confirmed),
            Err(QuireError::NoNotebooks)
        ));
    }
}
