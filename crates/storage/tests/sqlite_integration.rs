use quiz_core::model::{TopicCatalog, TopicKey};
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;
use storage::{QuestionStore, QuestionStoreError};

#[tokio::test]
async fn sqlite_values_round_trip() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("ranking_list").await.unwrap(), None);

    repo.set("ranking_list", "[]").await.unwrap();
    repo.set("ranking_list", r#"[{"score":90}]"#).await.unwrap();
    assert_eq!(
        repo.get("ranking_list").await.unwrap().as_deref(),
        Some(r#"[{"score":90}]"#)
    );

    repo.remove("ranking_list").await.unwrap();
    assert_eq!(repo.get("ranking_list").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("wrong_notebook", "[]").await.unwrap();
    repo.migrate().await.expect("second migrate");

    assert_eq!(
        repo.get("wrong_notebook").await.unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn sqlite_storage_reads_questions_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("capitals.json"),
        r#"[{"question": "Capital of Korea?", "options": ["Seoul", "Busan"], "answer": 0}]"#,
    )
    .unwrap();

    let storage = Storage::sqlite(
        "sqlite:file:memdb_storage_dir?mode=memory&cache=shared",
        dir.path(),
        TopicCatalog::builtin(),
    )
    .await
    .expect("storage");

    let store = QuestionStore::new(storage.questions.clone());
    let questions = store
        .load(&TopicKey::new("capitals").unwrap())
        .await
        .unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].option(0), Some("Seoul"));

    let err = store
        .load(&TopicKey::new("general").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, QuestionStoreError::NotFound(_)));

    storage.values.set("k", "v").await.unwrap();
    assert_eq!(storage.values.get("k").await.unwrap().as_deref(), Some("v"));
}
