//! Lesson storage backends.

pub mod file;
pub mod memory;

use std::fmt::Write as _;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileLessonStore;
pub use memory::InMemoryLessonStore;

/// Errors produced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Location of a lesson: its category and subtopic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonKey {
    /// Category the lesson belongs to.
    pub category: String,
    /// Subtopic the lesson covers.
    pub subtopic: String,
}

impl LessonKey {
    /// Key for `subtopic` within `category`.
    pub fn new(category: impl Into<String>, subtopic: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subtopic: subtopic.into(),
        }
    }

    /// `{category}/{subtopic}.txt` with each component made safe for the
    /// filesystem.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::from(sanitize_component(&self.category));
        path.push(format!("{}.txt", sanitize_component(&self.subtopic)));
        path
    }
}

/// Escape a name into a single directory entry.
///
/// Any character that could split or alias a path entry becomes `%XX`, and so
/// does `%` itself. Distinct names therefore never share a path. `.` and `..` are
/// escaped whole; the empty name becomes a lone `%`.
fn sanitize_component(raw: &str) -> String {
    match raw {
        "" => return "%".to_string(),
        "." => return "%2E".to_string(),
        ".." => return "%2E%2E".to_string(),
        _ => {}
    }
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        let reserved = matches!(c, '%' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
        if reserved || c.is_ascii_control() {
            let _ = write!(escaped, "%{:02X}", u32::from(c));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Abstraction for lesson persistence.
#[async_trait]
pub trait LessonStore: Send + Sync + 'static {
    /// Store `content` under `key`, replacing anything already there.
    async fn store(&self, key: &LessonKey, content: &str) -> Result<(), StoreError>;
}
