use quiz_core::model::{Level, OptionPosition, QuestionRecord};
use storage::repository::{QuestionSource, Storage};
use storage::sqlite::SqliteRepository;

fn build_question(level: u32, text: &str, correct: OptionPosition) -> QuestionRecord {
    QuestionRecord::new(
        Level::new(level).unwrap(),
        text,
        ["one", "two", "three", "four"].map(String::from),
        correct,
        format!("Explanation for {text}."),
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_order_and_fields() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let records = vec![
        build_question(1, "First?", OptionPosition::A),
        build_question(2, "Second?", OptionPosition::D),
        build_question(1, "Third?", OptionPosition::C),
    ];
    let inserted = repo.insert_questions(&records, false).await.unwrap();
    assert_eq!(inserted, 3);

    let loaded = repo.load_all().await.unwrap();
    assert_eq!(loaded, records);
}

#[tokio::test]
async fn replace_clears_previous_questions() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.insert_questions(&[build_question(1, "Old?", OptionPosition::B)], false)
        .await
        .unwrap();
    repo.insert_questions(&[build_question(3, "New?", OptionPosition::A)], true)
        .await
        .unwrap();

    assert_eq!(repo.count_questions().await.unwrap(), 1);
    let loaded = repo.load_all().await.unwrap();
    assert_eq!(loaded[0].question(), "New?");
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.count_questions().await.unwrap(), 0);
}

#[tokio::test]
async fn storage_sqlite_exposes_question_source() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    let loaded = storage.questions.load_all().await.unwrap();
    assert!(loaded.is_empty());
}
