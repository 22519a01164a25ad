//! Filesystem lesson store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{LessonKey, LessonStore, StoreError};

/// Writes each lesson to `{root}/{category}/{subtopic}.txt`.
#[derive(Debug, Clone)]
pub struct FileLessonStore {
    root: PathBuf,
}

impl FileLessonStore {
    /// Store rooted at `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `key`.
    pub fn path_for(&self, key: &LessonKey) -> PathBuf {
        self.root.join(key.relative_path())
    }
}

#[async_trait]
impl LessonStore for FileLessonStore {
    async fn store(&self, key: &LessonKey, content: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StoreError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "lesson written");
        Ok(())
    }
}
