use std::sync::Arc;

use serde_json::json;
use tableview::engine::FilterControl;
use tableview::error::{GatewayError, ViewerError};
use tableview::gateway::{Gateway, StoreGateway};
use tableview::store::{MemoryStore, SnapshotStore};
use tableview::table::{FilterState, Snapshot};
use tableview::viewer::{LoadOutcome, NoticeKind, Role, Viewer};

const FRUIT: &[u8] = b"name,price\nApple,1\nBanana,2\nCherry,1\n";

// Gateway whose every request fails, like a server that is down
struct DownGateway;

impl Gateway for DownGateway {
    fn put(&self, _snapshot: &Snapshot) -> Result<(), GatewayError> {
        Err(GatewayError::Unavailable("connection refused".to_string()))
    }

    fn get(&self) -> Result<Option<Snapshot>, GatewayError> {
        Err(GatewayError::Unavailable("connection refused".to_string()))
    }
}

fn fresh_gateway() -> (Arc<MemoryStore>, StoreGateway) {
    let store = Arc::new(MemoryStore::new());
    let gateway = StoreGateway::new(store.clone());
    (store, gateway)
}

fn viewer_with_fruit() -> Viewer {
    let mut viewer = Viewer::default();
    viewer.upload(Some("fruit.csv"), FRUIT).unwrap();
    viewer
}

fn visible_names(viewer: &Viewer) -> Vec<String> {
    viewer
        .view()
        .rows
        .iter()
        .map(|row| row.get(0).to_string())
        .collect()
}

#[test]
fn test_upload_initialises_empty_filters() {
    let viewer = viewer_with_fruit();

    assert_eq!(viewer.dataset().len(), 3);
    let filters: Vec<_> = viewer.filters().iter().collect();
    assert_eq!(filters, [("name", ""), ("price", "")]);
    assert_eq!(visible_names(&viewer), ["Apple", "Banana", "Cherry"]);
    println!("✓ Upload shows every row with empty filters");
}

#[test]
fn test_failed_upload_keeps_previous_state() {
    let mut viewer = viewer_with_fruit();
    viewer.set_filter("price", "1").unwrap();

    let result = viewer.upload(Some("bad.csv"), b"name,price\nKiwi\n");
    assert!(matches!(result, Err(ViewerError::Parse(_))));
    assert_eq!(viewer.dataset().len(), 3);
    assert_eq!(viewer.filters().get("price"), "1");
    assert_eq!(visible_names(&viewer), ["Apple", "Cherry"]);
}

#[test]
fn test_filter_and_page_size_reset_page() {
    let mut viewer = viewer_with_fruit();

    viewer.set_page(4);
    viewer.set_filter("name", "a").unwrap();
    assert_eq!(viewer.window().page, 0);

    viewer.set_page(2);
    viewer.set_page_size(50).unwrap();
    assert_eq!(viewer.window().page, 0);
    assert_eq!(viewer.window().size, 50);

    viewer.set_page(1);
    assert_eq!(viewer.set_page_size(7), Err(ViewerError::PageSize(7)));
    assert_eq!(viewer.window().page, 1);
    assert_eq!(viewer.window().size, 50);
}

#[test]
fn test_unknown_filter_column_is_rejected() {
    let mut viewer = viewer_with_fruit();
    assert_eq!(
        viewer.set_filter("weight", "1"),
        Err(ViewerError::UnknownColumn("weight".to_string()))
    );
}

#[test]
fn test_pagination_over_filtered_rows() {
    let mut viewer = Viewer::new(10);
    let mut csv = String::from("id,parity\n");
    for i in 0..25 {
        csv.push_str(&format!("{},{}\n", i, if i % 2 == 0 { "even" } else { "odd" }));
    }
    viewer.upload(None, csv.as_bytes()).unwrap();
    viewer.set_filter("parity", "even").unwrap();

    let view = viewer.view();
    assert_eq!(view.total, 13);
    assert_eq!(view.page_count, 2);
    assert_eq!(view.rows.len(), 10);
    assert_eq!(view.range_label(), "1-10 of 13");

    viewer.set_page(1);
    let view = viewer.view();
    assert_eq!(view.rows.len(), 3);
    assert_eq!(view.range_label(), "11-13 of 13");

    viewer.set_page(9);
    assert!(viewer.view().rows.is_empty());
}

#[test]
fn test_range_label_past_the_end() {
    let mut viewer = Viewer::new(10);
    viewer.upload(None, FRUIT).unwrap();
    viewer.set_filter("price", "1").unwrap();

    viewer.set_page(5);
    let view = viewer.view();
    assert!(view.rows.is_empty());
    assert_eq!(view.range_label(), "0-0 of 2");
}

#[test]
fn test_huge_page_index_yields_empty_page() {
    let mut viewer = viewer_with_fruit();
    viewer.set_page(usize::MAX);

    let view = viewer.view();
    assert!(view.rows.is_empty());
    assert_eq!(view.range_label(), "0-0 of 3");
    println!("✓ Page index at usize::MAX renders an empty page");
}

#[test]
fn test_view_controls_follow_cardinality() {
    let mut viewer = Viewer::default();
    let mut csv = String::from("id,flag\n");
    for i in 0..12 {
        csv.push_str(&format!("{},{}\n", i, i % 2));
    }
    viewer.upload(None, csv.as_bytes()).unwrap();

    let view = viewer.view();
    assert!(view.has_data());
    assert_eq!(view.columns[0].control, FilterControl::Text);
    assert_eq!(
        view.columns[1].control,
        FilterControl::Select(vec!["0".to_string(), "1".to_string()])
    );
}

#[test]
fn test_empty_viewer_hides_table() {
    let viewer = Viewer::default();
    let view = viewer.view();
    assert!(!view.has_data());
    assert!(view.rows.is_empty());
    assert_eq!(view.range_label(), "0-0 of 0");
}

#[test]
fn test_role_only_toggles_upload_visibility() {
    let mut viewer = Viewer::default();
    assert_eq!(viewer.role(), Role::Retailers);
    assert!(!viewer.view().show_upload);

    viewer.set_role(Role::Suppliers);
    assert!(viewer.view().show_upload);

    // Not an authorization boundary
    viewer.set_role(Role::Retailers);
    viewer.upload(None, FRUIT).unwrap();
    assert_eq!(viewer.dataset().len(), 3);
}

#[test]
fn test_save_then_load_round_trip() {
    let (store, gateway) = fresh_gateway();
    let mut viewer = viewer_with_fruit();
    viewer.set_filter("price", "1").unwrap();
    viewer.save(&gateway).unwrap();

    let notice = viewer.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.text, "Data saved successfully!");
    assert!(viewer.take_notice().is_none());

    let saved = store.load().unwrap();
    let snapshot = Snapshot::from_payload(&saved);
    assert_eq!(snapshot.dataset.len(), 3);
    assert_eq!(snapshot.filter_state.get("price"), "1");

    let mut other = Viewer::default();
    assert_eq!(other.load(&gateway), Ok(LoadOutcome::Loaded { rows: 3 }));
    assert!(other.take_notice().is_some());
    assert_eq!(other.dataset(), viewer.dataset());
    assert_eq!(other.filters(), viewer.filters());
    assert_eq!(visible_names(&other), ["Apple", "Cherry"]);

    // load; save; load returns the same snapshot
    other.save(&gateway).unwrap();
    assert_eq!(store.load(), Some(saved));
    println!("✓ Snapshot survives a load/save/load cycle unchanged");
}

#[test]
fn test_load_before_any_save() {
    let (_, gateway) = fresh_gateway();
    let mut viewer = viewer_with_fruit();

    assert_eq!(viewer.load(&gateway), Ok(LoadOutcome::NeverSaved));
    assert!(viewer.dataset().is_empty());
    assert!(viewer.filters().is_unconstrained());
    assert!(!viewer.view().has_data());

    let notice = viewer.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.text, "No saved data found.");
}

#[test]
fn test_load_of_empty_snapshot_resets() {
    let (store, gateway) = fresh_gateway();
    store.save(json!({ "dataset": [], "filterState": { "name": "x" } }));

    let mut viewer = viewer_with_fruit();
    assert_eq!(viewer.load(&gateway), Ok(LoadOutcome::EmptyDataset));
    assert!(viewer.dataset().is_empty());
    assert_eq!(viewer.filters(), &FilterState::default());

    let notice = viewer.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.text, "The saved data is empty.");
}

#[test]
fn test_each_load_outcome_has_its_own_notice() {
    let (store, gateway) = fresh_gateway();
    let mut viewer = Viewer::default();
    let mut texts = Vec::new();

    viewer.load(&gateway).unwrap();
    texts.push(viewer.take_notice().unwrap().text);

    store.save(json!({ "dataset": [], "filterState": {} }));
    viewer.load(&gateway).unwrap();
    texts.push(viewer.take_notice().unwrap().text);

    viewer_with_fruit().save(&gateway).unwrap();
    viewer.load(&gateway).unwrap();
    texts.push(viewer.take_notice().unwrap().text);

    assert_eq!(
        texts,
        [
            "No saved data found.",
            "The saved data is empty.",
            "Data loaded successfully!"
        ]
    );
    println!("✓ Never saved, empty and loaded snapshots report different notices");
}

#[test]
fn test_load_stringifies_non_text_cells() {
    let (store, gateway) = fresh_gateway();
    store.save(json!({
        "dataset": [
            { "name": "Apple", "price": 1, "organic": true },
            { "name": "Banana", "price": 2.5, "organic": null }
        ],
        "filterState": { "price": "1" },
        "savedBy": "someone"
    }));

    let mut viewer = Viewer::default();
    assert_eq!(viewer.load(&gateway), Ok(LoadOutcome::Loaded { rows: 2 }));
    assert_eq!(viewer.filters().get("price"), "1");
    assert_eq!(visible_names(&viewer), ["Apple"]);

    assert_eq!(
        viewer.export_csv(),
        "name,price,organic\nApple,1,true\n"
    );
}

#[test]
fn test_transport_failures_leave_state_untouched() {
    let mut viewer = viewer_with_fruit();
    viewer.set_filter("name", "an").unwrap();

    assert!(matches!(viewer.save(&DownGateway), Err(ViewerError::Gateway(_))));
    let notice = viewer.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Failed to save data.");

    assert!(matches!(viewer.load(&DownGateway), Err(ViewerError::Gateway(_))));
    assert_eq!(viewer.take_notice().unwrap().kind, NoticeKind::Error);
    assert_eq!(viewer.dataset().len(), 3);
    assert_eq!(viewer.filters().get("name"), "an");
    assert_eq!(visible_names(&viewer), ["Banana"]);
}

#[test]
fn test_export_ignores_pagination() {
    let mut viewer = Viewer::new(10);
    viewer.upload(None, FRUIT).unwrap();
    viewer.set_filter("price", "1").unwrap();
    viewer.set_page(3);

    assert_eq!(viewer.export_csv(), "name,price\nApple,1\nCherry,1\n");
}
