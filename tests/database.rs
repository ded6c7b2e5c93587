use std::{sync::Arc, thread, time::Duration};

use resume_reactor_lib::{
    engine::ScoringConfig,
    models::{AnalysisResult, Document, RawSuggestion, Sections},
    session::{DocumentSnapshot, DocumentStore, SessionController, SessionState},
    Database,
};
use tempfile::TempDir;

fn open_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let database = Database::new(dir.path().join("nested").join("documents.sqlite3")).unwrap();
    (dir, database)
}

fn snapshot(revision: i64, summary: &str) -> DocumentSnapshot {
    let sections: Sections = vec![("skills", "SQL"), ("summary", summary)]
        .into_iter()
        .collect();
    DocumentSnapshot {
        document_id: "doc-1".into(),
        revision,
        document: Document::new(format!("{summary}\n\nSQL"), sections),
    }
}

#[tokio::test]
async fn upsert_then_load_round_trips_sections() {
    let (_dir, database) = open_database();

    assert!(database.upsert_document(&snapshot(5, "Built apps.")).await.unwrap());

    let stored = database.latest_document("doc-1").await.unwrap().unwrap();
    assert_eq!(stored.revision, 5);
    assert_eq!(stored.document.full_text(), "Built apps.\n\nSQL");
    assert_eq!(stored.document.section("summary"), Some("Built apps."));
    let keys: Vec<&str> = stored.document.sections().keys().collect();
    assert_eq!(keys, vec!["summary", "skills"]);
}

#[tokio::test]
async fn stale_revision_does_not_overwrite_newer_state() {
    let (_dir, database) = open_database();

    database.upsert_document(&snapshot(10, "Newer")).await.unwrap();
    let written = database.upsert_document(&snapshot(3, "Older")).await.unwrap();

    assert!(!written);
    let stored = database.latest_document("doc-1").await.unwrap().unwrap();
    assert_eq!(stored.revision, 10);
    assert_eq!(stored.document.section("summary"), Some("Newer"));
}

#[tokio::test]
async fn unknown_document_is_none() {
    let (_dir, database) = open_database();
    assert!(database.latest_document("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn documents_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("documents.sqlite3");

    {
        let database = Database::new(path.clone()).unwrap();
        database.upsert_document(&snapshot(1, "Kept")).await.unwrap();
    }

    let reopened = Database::new(path).unwrap();
    let stored = reopened.latest_document("doc-1").await.unwrap().unwrap();
    assert_eq!(stored.document.section("summary"), Some("Kept"));
}

#[tokio::test]
async fn controller_persists_through_the_database() {
    let (_dir, database) = open_database();
    let document = Document::new(
        "Built apps.",
        vec![("summary", "Built apps.")].into_iter().collect(),
    );
    let analysis = AnalysisResult {
        ats_score: 60,
        suggestions: vec![RawSuggestion {
            id: "1".into(),
            section: Some("summary".into()),
            original: Some("Built apps.".into()),
            suggested: Some("Built 3 scalable apps.".into()),
            impact_score: Some(0.5),
            ..RawSuggestion::default()
        }],
        ..AnalysisResult::default()
    };
    let state = SessionState::seed("doc-9", document, analysis, ScoringConfig::default());
    let controller = SessionController::new(state, Arc::new(database.clone()));

    controller.accept_suggestion("1").await.unwrap();
    controller.edit_full_text("Built 3 scalable apps.\n").await;

    let stored = database.latest_document("doc-9").await.unwrap().unwrap();
    assert_eq!(stored.document.full_text(), "Built 3 scalable apps.\n");
    assert_eq!(
        stored.document.section("summary"),
        Some("Built 3 scalable apps.")
    );
    assert_eq!(stored.revision, controller.get_view().await.snapshot.revision);
}

fn seeded_controller(database: &Database, full_text: &str) -> SessionController {
    let document = Document::new(
        full_text,
        vec![("summary", full_text)].into_iter().collect(),
    );
    let state = SessionState::seed(
        "doc",
        document,
        AnalysisResult::default(),
        ScoringConfig::default(),
    );
    SessionController::new(state, Arc::new(database.clone()))
}

#[tokio::test]
async fn export_from_a_reseeded_session_replaces_the_older_session() {
    let (_dir, database) = open_database();

    let earlier = seeded_controller(&database, "Old upload");
    let report = earlier.edit_full_text("Old edited").await;
    assert!(report.sync.as_ref().is_some_and(|status| status.is_synced()));

    thread::sleep(Duration::from_millis(2));
    let reseeded = seeded_controller(&database, "Fresh upload");
    let status = reseeded.sync_for_export().await;

    assert!(status.is_synced());
    let stored = database.latest_document("doc").await.unwrap().unwrap();
    assert_eq!(stored.document.full_text(), "Fresh upload");
}

#[tokio::test]
async fn resending_the_stored_revision_is_written() {
    let (_dir, database) = open_database();

    assert!(database.upsert_document(&snapshot(10, "Same")).await.unwrap());
    assert!(database.upsert_document(&snapshot(10, "Same")).await.unwrap());
    database.persist(&snapshot(10, "Same")).await.unwrap();
}

#[tokio::test]
async fn persisting_a_stale_snapshot_fails() {
    let (_dir, database) = open_database();
    database.upsert_document(&snapshot(10, "Newer")).await.unwrap();

    let err = database.persist(&snapshot(3, "Older")).await.unwrap_err();

    assert!(err.to_string().contains("newer revision"));
    let stored = database.latest_document("doc-1").await.unwrap().unwrap();
    assert_eq!(stored.document.section("summary"), Some("Newer"));
}
