#![forbid(unsafe_code)]

pub mod json;
pub mod repository;
pub mod sqlite;

pub use json::JsonFileSource;
pub use repository::{InMemoryQuestionSource, QuestionRow, QuestionSource, Storage, StorageError};
