//! Infrastructure adapters: lesson storage backends.

pub mod store;

pub use store::{FileLessonStore, InMemoryLessonStore, LessonKey, LessonStore, StoreError};
