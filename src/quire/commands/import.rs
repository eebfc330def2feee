use crate::commands::{CmdMessage, CmdResult, StoreEvent};
use crate::error::{QuireError, Result};
use crate::model::Store;
use crate::repository::StoreRepository;
use crate::slot::SlotBackend;
use log::{info, warn};

const INVALID_FORMAT: &str = "Invalid file format: expected a quire JSON export";

/// Parse an exported document. Only the top-level shape is checked; inner
/// records are read leniently: missing or `null` fields get their defaults and
/// ids are kept as found.
pub fn parse(text: &str) -> Result<Store> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| QuireError::Validation(format!("{}: {}", INVALID_FORMAT, e)))?;

    if !value.get("notebooks").is_some_and(|n| n.is_array()) {
        return Err(QuireError::Validation(format!(
            "{}: missing notebooks list",
            INVALID_FORMAT
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| QuireError::Validation(format!("{}: {}", INVALID_FORMAT, e)))
}

/// Replace the whole store with an imported one.
///
/// `selectedId` is kept exactly as imported, even when it names no notebook
/// in the new set. Readers fall back to the first notebook and the stored
/// value stays until the user selects one.
pub fn run<B: SlotBackend>(
    repo: &StoreRepository<B>,
    store: &mut Store,
    text: &str,
) -> Result<CmdResult> {
    let imported = match parse(text) {
        Ok(imported) => imported,
        Err(e) => {
            warn!(
                "event=store_import module=import status=rejected bytes={} error={}",
                text.len(),
                e
            );
            return Err(e);
        }
    };

    *store = imported;
    info!(
        "event=store_import module=import status=ok notebooks={}",
        store.notebooks.len()
    );
    repo.persist(store)?;

    let mut result = CmdResult::default();
    result.add_event(StoreEvent::StoreReplaced);
    result.add_message(CmdMessage::success(format!(
        "Imported {} notebook(s)",
        store.notebooks.len()
    )));
    if store.notebooks.is_empty() {
        result.add_message(CmdMessage::warning(
            "The imported file has no notebooks. Create one to continue.",
        ));
    } else if !store.selection_resolves() {
        result.add_message(CmdMessage::warning(format!(
            "Selected notebook not found in import; showing {}",
            store.notebooks[0].name
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::export::to_json;
    use crate::commands::notebooks;
    use crate::commands::pages;
    use crate::config::DEFAULT_SLOT_KEY;
    use crate::index::PageIndex;
    use crate::model::{NotebookId, PageBuffer, MAX_PAGES};
    use crate::slot::memory::MemSlot;
    use serde_json::json;
    use uuid::Uuid;

    fn setup() -> (StoreRepository<MemSlot>, Store) {
        let repo = StoreRepository::new(MemSlot::new(), DEFAULT_SLOT_KEY);
        let store = repo.load().unwrap().store;
        (repo, store)
    }

    fn populated() -> Store {
        let (repo, mut store) = setup();
        notebooks::create(&repo, &mut store, "Travel, 2024").unwrap();
        let buf = PageBuffer {
            date: "2024-06-01".into(),
            time: "08:15".into(),
            title: "Lisbon".into(),
            content: "Tram 28\n\"pastéis\"".into(),
        };
        pages::save(&repo, &mut store, PageIndex::clamp(12), &buf).unwrap();
        store
    }

    #[test]
    fn export_then_import_round_trips() {
        let original = populated();
        let (repo, mut store) = setup();

        run(&repo, &mut store, &to_json(&original).unwrap()).unwrap();

        assert_eq!(store, original);
        let persisted: Store =
            serde_json::from_str(&repo.backend().raw(DEFAULT_SLOT_KEY).unwrap()).unwrap();
        assert_eq!(persisted, original);
    }

    #[test]
    fn import_emits_store_replaced() {
        let (repo, mut store) = setup();
        let res = run(&repo, &mut store, &to_json(&populated()).unwrap()).unwrap();
        assert_eq!(res.events, vec![StoreEvent::StoreReplaced]);
        assert!(res.resets_view());
    }

    #[test]
    fn rejects_non_json_without_mutation() {
        let (repo, mut store) = setup();
        let before = store.clone();
        let writes = repo.backend().write_count();

        let err = run(&repo, &mut store, "definitely not json").unwrap_err();
        assert!(matches!(err, QuireError::Validation(_)));
        assert_eq!(store, before);
        assert_eq!(repo.backend().write_count(), writes);
    }

    #[test]
    fn rejects_documents_without_notebooks_array() {
        let (repo, mut store) = setup();
        let before = store.clone();
        for doc in [
            json!({}),
            json!({ "notebooks": "nope" }),
            json!({ "notebooks": { "0": {} } }),
            json!([1, 2, 3]),
        ] {
            let err = run(&repo, &mut store, &doc.to_string()).unwrap_err();
            assert!(matches!(err, QuireError::Validation(_)), "doc: {}", doc);
        }
        assert_eq!(store, before);
    }

    #[test]
    fn records_with_odd_field_types_are_taken_as_text() {
        let (repo, mut store) = setup();
        let doc = json!({ "notebooks": [{ "id": 7, "name": 2024 }], "selectedId": 7 });
        run(&repo, &mut store, &doc.to_string()).unwrap();

        assert_eq!(store.notebooks[0].id.as_str(), "7");
        assert_eq!(store.notebooks[0].name, "2024");
        assert!(store.selection_resolves());
    }

    #[test]
    fn null_page_fields_import_as_empty() {
        let (repo, mut store) = setup();
        let doc = json!({
            "notebooks": [{
                "id": "nb-1",
                "name": "Diary",
                "pages": [{ "date": null, "time": null, "title": "Kept", "content": "precious", "lastModified": null }]
            }],
            "selectedId": "nb-1"
        });
        run(&repo, &mut store, &doc.to_string()).unwrap();

        let page = &store.notebooks[0].pages()[0];
        assert_eq!(page.time, "");
        assert_eq!(page.title, "Kept");
        assert_eq!(page.content, "precious");
        assert!(store.selection_resolves());
    }

    #[test]
    fn non_uuid_selection_is_kept_verbatim_with_warning() {
        let (repo, mut store) = setup();
        let mut doc: serde_json::Value =
            serde_json::from_str(&to_json(&populated()).unwrap()).unwrap();
        doc["selectedId"] = json!("abc");

        let res = run(&repo, &mut store, &doc.to_string()).unwrap();

        assert_eq!(store.selected_id, Some(NotebookId::from("abc")));
        assert_eq!(store.notebooks.len(), 2);
        assert_eq!(notebooks::current(&store).unwrap().name, "My First Notebook");
        assert!(res
            .messages
            .iter()
            .any(|m| m.level == crate::commands::MessageLevel::Warning));
        let persisted: Store =
            serde_json::from_str(&repo.backend().raw(DEFAULT_SLOT_KEY).unwrap()).unwrap();
        assert_eq!(persisted.selected_id, Some(NotebookId::from("abc")));
    }

    #[test]
    fn sparse_records_get_defaults() {
        let (repo, mut store) = setup();
        let id = Uuid::new_v4();
        let doc = json!({
            "notebooks": [{ "id": id, "pages": [{ "title": "kept" }] }],
            "selectedId": id
        });
        run(&repo, &mut store, &doc.to_string()).unwrap();

        let nb = &store.notebooks[0];
        assert_eq!(nb.name, "");
        assert_eq!(nb.pages().len(), MAX_PAGES);
        assert_eq!(nb.pages()[0].title, "kept");
        assert_eq!(nb.pages()[0].last_modified, None);
    }

    #[test]
    fn dangling_selection_is_kept_verbatim_with_warning() {
        let (repo, mut store) = setup();
        let mut doc: serde_json::Value =
            serde_json::from_str(&to_json(&populated()).unwrap()).unwrap();
        let dangling = Uuid::new_v4();
        doc["selectedId"] = json!(dangling);

        let res = run(&repo, &mut store, &doc.to_string()).unwrap();

        assert_eq!(store.selected_id, Some(NotebookId::from(dangling)));
        assert!(!store.selection_resolves());
        assert_eq!(
            notebooks::current(&store).unwrap().id,
            store.notebooks[0].id
        );
        assert!(res
            .messages
            .iter()
            .any(|m| m.level == crate::commands::MessageLevel::Warning));
    }

    #[test]
    fn missing_selection_imports_as_none() {
        let (repo, mut store) = setup();
        let doc = json!({ "notebooks": [{ "id": Uuid::new_v4(), "name": "Solo" }] });
        run(&repo, &mut store, &doc.to_string()).unwrap();
        assert_eq!(store.selected_id, None);
        assert_eq!(notebooks::current(&store).unwrap().name, "Solo");
    }

    #[test]
    fn empty_notebooks_list_is_accepted() {
        let (repo, mut store) = setup();
        let res = run(&repo, &mut store, r#"{"notebooks":[],"selectedId":null}"#).unwrap();
        assert!(store.notebooks.is_empty());
        assert!(res.messages.len() >= 2);
    }

    #[test]
    fn persist_failure_after_import_is_reported() {
        let (repo, mut store) = setup();
        let original = populated();
        repo.backend().set_simulate_write_error(true);
        let err = run(&repo, &mut store, &to_json(&original).unwrap()).unwrap_err();
        assert!(matches!(err, QuireError::SlotWrite { .. }));
        assert_eq!(store, original);
    }
}
