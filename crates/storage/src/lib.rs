#![forbid(unsafe_code)]

pub mod fs;
pub mod question_store;
pub mod records;
pub mod repository;
pub mod sqlite;

pub use question_store::{QuestionStore, QuestionStoreError};
pub use repository::{KeyValueStore, QuestionSource, Storage, StorageError};
