//! In-memory lesson store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{LessonKey, LessonStore, StoreError};

/// Simple in-memory store for development/testing.
#[derive(Debug, Default)]
pub struct InMemoryLessonStore {
    lessons: Mutex<BTreeMap<LessonKey, String>>,
}

impl InMemoryLessonStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored lesson.
    pub fn get(&self, key: &LessonKey) -> Option<String> {
        self.lessons.lock().get(key).cloned()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<LessonKey> {
        self.lessons.lock().keys().cloned().collect()
    }

    /// Number of stored lessons.
    pub fn len(&self) -> usize {
        self.lessons.lock().len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.lessons.lock().is_empty()
    }
}

#[async_trait]
impl LessonStore for InMemoryLessonStore {
    async fn store(&self, key: &LessonKey, content: &str) -> Result<(), StoreError> {
        self.lessons.lock().insert(key.clone(), content.to_string());
        Ok(())
    }
}
