//! Facade tests over in-memory collaborators

use super::*;
use crate::chain::{Chain, ChainId, TaskType};
use crate::color::{ColorConfig, ColorMode, Rgb};
use crate::config::InspectorConfig;
use crate::data::FetchOutcome;
use crate::filter::{FilterState, OutlierFilter, SelectionFilter, TaskTypeFilter};
use crate::grouping::GroupingStrategy;
use crate::repository::{InMemoryRepository, QueryCriteria};
use crate::selection::{KeyEvent, SelectionCommand, SelectionMode};
use crate::storage::{MemorySessionStore, SessionStore};
use std::sync::Arc;

fn chains() -> Vec<Chain> {
    vec![
        Chain::new("r1", "wheat", "PLS", TaskType::Regression).with_score("cv_score", 0.91),
        Chain::new("r2", "wheat", "SVR", TaskType::Regression).with_score("cv_score", 0.85),
        Chain::new("r3", "corn", "PLS", TaskType::Regression).with_score("cv_score", 0.78),
        Chain::new("c1", "corn", "RF", TaskType::BinaryClassification)
            .with_score("cv_score", 0.66),
        Chain::new("c2", "soy", "RF", TaskType::MulticlassClassification)
            .with_null_score("cv_score"),
    ]
}

fn ids(raw: &[&str]) -> Vec<ChainId> {
    raw.iter().map(|s| ChainId::new(*s)).collect()
}

fn inspector_with(store: Arc<MemorySessionStore>) -> (Arc<InMemoryRepository>, Inspector) {
    let repository = Arc::new(InMemoryRepository::new(chains()));
    let inspector = Inspector::new(repository.clone(), store, InspectorConfig::default());
    (repository, inspector)
}

async fn loaded() -> Inspector {
    let (_, inspector) = inspector_with(Arc::new(MemorySessionStore::new()));
    inspector.set_criteria(QueryCriteria::new()).await.unwrap();
    inspector
}

#[tokio::test]
async fn set_criteria_loads_chains() {
    let inspector = loaded().await;
    let view = inspector.view();
    assert_eq!(view.chains().len(), 5);
    assert_eq!(view.filtered_count(), 5);
    assert!(view.groups().is_empty());
    assert_eq!(inspector.data().datasets(), ["corn", "soy", "wheat"]);
}

#[tokio::test]
async fn narrowed_criteria_replace_chain_set() {
    let inspector = loaded().await;
    let outcome = inspector
        .set_criteria(QueryCriteria::new().with_dataset("wheat"))
        .await
        .unwrap();
    assert_eq!(outcome, FetchOutcome::Applied { chain_count: 2 });
    // Available values still describe the unfiltered export
    assert_eq!(inspector.data().available().datasets.len(), 3);
}

#[tokio::test]
async fn view_applies_filters_and_grouping() {
    let mut inspector = loaded().await;
    inspector.set_grouping(Some(GroupingStrategy::ByVariable {
        field: "dataset_name".into(),
    }));
    inspector.update_filters(|f| f.task_type = TaskTypeFilter::Regression);

    let view = inspector.view();
    assert_eq!(view.filtered_ids(), ids(&["r1", "r2", "r3"]).as_slice());
    assert_eq!(view.active_filter_count(), 1);
    // Grouping covers the whole chain set, not the filtered view
    let labels: Vec<&str> = view.groups().iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, ["corn", "wheat", "soy"]);
    assert_eq!(view.group_of(&ChainId::new("c2")).map(|g| g.label.as_str()), Some("soy"));
}

#[tokio::test]
async fn select_all_and_invert_use_filtered_chains() {
    let mut inspector = loaded().await;
    inspector.update_filters(|f| f.task_type = TaskTypeFilter::Classification);

    assert!(inspector.select_all_filtered());
    assert_eq!(inspector.selection().selected_ids(), ids(&["c1", "c2"]));

    inspector.apply(SelectionCommand::Select {
        ids: ids(&["c1"]),
        mode: Some(SelectionMode::Replace),
    });
    assert!(inspector.invert_filtered());
    assert_eq!(inspector.selection().selected_ids(), ids(&["c2"]));
}

#[tokio::test]
async fn selection_filter_narrows_view() {
    let mut inspector = loaded().await;
    inspector.set_filters(FilterState {
        selection: SelectionFilter::Selected,
        ..Default::default()
    });
    // Empty selection leaves the stage inactive
    assert_eq!(inspector.view().filtered_count(), 5);

    inspector.apply(SelectionCommand::Select {
        ids: ids(&["r2", "c1"]),
        mode: None,
    });
    assert_eq!(inspector.view().filtered_ids(), ids(&["r2", "c1"]).as_slice());
}

#[tokio::test]
async fn keyboard_drives_history() {
    let mut inspector = loaded().await;
    inspector.apply(SelectionCommand::Select {
        ids: ids(&["r1"]),
        mode: None,
    });
    inspector.apply(SelectionCommand::Select {
        ids: ids(&["r2"]),
        mode: Some(SelectionMode::Add),
    });

    assert!(inspector.handle_key(&KeyEvent::new("z").with_ctrl()));
    assert_eq!(inspector.selection().selected_ids(), ids(&["r1"]));

    assert!(inspector.handle_key(&KeyEvent::new("y").with_meta()));
    assert_eq!(inspector.selection().selected_ids(), ids(&["r1", "r2"]));

    assert!(!inspector.handle_key(&KeyEvent::new("Escape").in_text_input()));
    assert!(inspector.handle_key(&KeyEvent::new("Escape")));
    assert!(!inspector.selection().has_selection());
}

#[tokio::test]
async fn hover_and_selection_drive_opacity() {
    let mut inspector = loaded().await;
    let baseline = inspector.config().baseline_opacity;
    assert_eq!(inspector.view().opacity_of(&ChainId::new("r1")), baseline);

    inspector.apply(SelectionCommand::Select {
        ids: ids(&["r1"]),
        mode: None,
    });
    inspector.set_hovered(Some(ChainId::new("r3")));
    let view = inspector.view();
    let unselected = inspector.color_config().unselected_opacity;
    assert_eq!(view.opacity_of(&ChainId::new("r1")), 1.0);
    assert_eq!(view.opacity_of(&ChainId::new("r3")), 1.0);
    assert_eq!(view.opacity_of(&ChainId::new("r2")), unselected);
}

#[tokio::test]
async fn view_is_a_stable_snapshot() {
    let (repository, inspector) = inspector_with(Arc::new(MemorySessionStore::new()));
    inspector.set_criteria(QueryCriteria::new()).await.unwrap();
    let before = inspector.view();

    repository.replace(vec![Chain::new("new", "d", "m", TaskType::Regression)]);
    inspector.refresh().await.unwrap();

    assert_eq!(before.chains().len(), 5);
    assert_eq!(before.filtered_count(), 5);
    assert_eq!(inspector.view().chains().len(), 1);
}

#[tokio::test]
async fn session_round_trip() {
    let store = Arc::new(MemorySessionStore::new());
    let (_, mut first) = inspector_with(store.clone());
    first
        .set_criteria(QueryCriteria::new().with_dataset("corn"))
        .await
        .unwrap();
    first.set_filters(FilterState {
        outlier: OutlierFilter::Hide,
        ..Default::default()
    });
    first.set_grouping(Some(GroupingStrategy::ByBranch));
    first.set_color_config(ColorConfig {
        mode: ColorMode::Score,
        ..Default::default()
    });
    first.set_score_column("val_score");
    first.apply(SelectionCommand::Select {
        ids: ids(&["r3"]),
        mode: None,
    });
    first.apply(SelectionCommand::Pin { ids: ids(&["c1"]) });
    let saved_id = first.save_selection("corn pick", None).unwrap();
    first.flush_session();

    let (_, mut second) = inspector_with(store);
    let report = second.restore().await.unwrap();

    assert_eq!(report.restored.len(), 6);
    assert_eq!(report.fetch, Some(FetchOutcome::Applied { chain_count: 2 }));
    assert_eq!(second.filters().outlier, OutlierFilter::Hide);
    assert_eq!(second.grouping(), Some(&GroupingStrategy::ByBranch));
    assert_eq!(second.color_config().mode, ColorMode::Score);
    assert_eq!(second.score_column(), "val_score");
    assert_eq!(second.selection().selected_ids(), ids(&["r3"]));
    assert!(second.selection().is_pinned(&ChainId::new("c1")));
    assert_eq!(second.selection().saved_selections()[0].id, saved_id);
    // History is not persisted
    assert!(!second.selection().can_undo());
}

#[tokio::test]
async fn corrupt_session_falls_back_to_defaults() {
    let store = Arc::new(MemorySessionStore::new());
    store.set("inspector:filters", "garbage").unwrap();
    store.set("inspector:selection", r#"{"saved_at": 12}"#).unwrap();

    let (_, mut inspector) = inspector_with(store.clone());
    let report = inspector.restore().await.unwrap();

    assert!(report.restored.is_empty());
    assert!(report.fetch.is_none());
    assert!(inspector.filters().is_default());
    assert!(!inspector.selection().has_selection());
    assert!(store.is_empty());
}

#[tokio::test]
async fn clear_session_keeps_memory_state() {
    let store = Arc::new(MemorySessionStore::new());
    let (_, mut inspector) = inspector_with(store.clone());
    inspector.set_score_column("r2");
    inspector.flush_session();
    assert!(!store.is_empty());

    assert_eq!(inspector.clear_session().unwrap(), 1);
    assert!(store.is_empty());
    assert_eq!(inspector.score_column(), "r2");
}

#[tokio::test]
async fn saved_selection_keeps_explicit_color_and_is_persisted() {
    let store = Arc::new(MemorySessionStore::new());
    let (_, mut inspector) = inspector_with(store.clone());
    inspector.set_criteria(QueryCriteria::new()).await.unwrap();
    assert!(inspector.save_selection("empty", None).is_none());

    inspector.apply(SelectionCommand::Select {
        ids: ids(&["r1", "r2"]),
        mode: None,
    });
    let teal = Rgb::new(0x00, 0x80, 0x80);
    let id = inspector.save_selection("wheat pick", Some(teal)).unwrap();
    inspector.flush_session();

    let saved = &inspector.selection().saved_selections()[0];
    assert_eq!(saved.id, id);
    assert_eq!(saved.color, teal);
    let raw = store.get("inspector:selection").unwrap().unwrap();
    assert!(raw.contains(&id));
    assert!(raw.contains("#008080"));
}

#[tokio::test]
async fn color_config_opacity_is_normalized() {
    let store = Arc::new(MemorySessionStore::new());
    let (_, mut inspector) = inspector_with(store.clone());
    inspector.set_color_config(ColorConfig {
        unselected_opacity: f32::NAN,
        ..Default::default()
    });
    assert_eq!(inspector.color_config().unselected_opacity, 0.15);

    let envelope = serde_json::json!({
        "saved_at": chrono::Utc::now(),
        "data": {"mode": "score", "unselected_opacity": 4.0},
    });
    store.set("inspector:color", &envelope.to_string()).unwrap();
    let (_, mut restored) = inspector_with(store);
    restored.restore().await.unwrap();
    assert_eq!(restored.color_config().mode, ColorMode::Score);
    assert_eq!(restored.color_config().unselected_opacity, 1.0);
}
