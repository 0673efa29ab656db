use std::io::Write;

use storage::repository::{Storage, StorageError};

const SAMPLE: &str = r#"[
    {
        "level": 1,
        "question": "What is the capital of France?",
        "answer1": "Paris",
        "answer2": "Rome",
        "answer3": "Berlin",
        "answer4": "Madrid",
        "correct": 1,
        "explanation": "Paris is the capital of France. It is large."
    },
    {
        "level": 2,
        "question": "Which gas do plants absorb?",
        "answer1": "Oxygen",
        "answer2": "Nitrogen",
        "answer3": "Carbon dioxide",
        "answer4": "Helium",
        "correct": 3,
        "explanation": "Plants take in carbon dioxide for photosynthesis."
    }
]"#;

#[tokio::test]
async fn loads_questions_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let storage = Storage::json_file(file.path());
    let records = storage.questions.load_all().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].level().value(), 2);
    assert_eq!(records[1].correct().value(), 3);
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::json_file(dir.path().join("absent.json"));
    let err = storage.questions.load_all().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn malformed_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();

    let storage = Storage::json_file(file.path());
    let err = storage.questions.load_all().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
