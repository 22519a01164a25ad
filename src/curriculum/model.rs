//! Generated curriculum records.

use serde::{Deserialize, Serialize};

/// One lesson and where it sits in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumEntry {
    /// Category line as generated.
    pub category: String,
    /// Subtopic line as generated.
    pub subtopic: String,
    /// Lesson text.
    pub lesson: String,
}

/// Every lesson generated for a topic, in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    /// Topic the curriculum covers.
    pub topic: String,
    /// Lessons, category by category.
    pub entries: Vec<CurriculumEntry>,
}

impl Curriculum {
    /// Empty curriculum for `topic`.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            entries: Vec::new(),
        }
    }

    /// Distinct categories in generation order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(&entry.category);
            }
        }
        seen
    }

    /// Number of lessons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no lesson was generated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
