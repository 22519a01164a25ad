//! Curriculum generation: categories, subtopics and lessons for a topic.

pub mod error;
pub mod generator;
pub mod model;
pub mod prompts;

pub use error::GenerationError;
pub use generator::CurriculumGenerator;
pub use model::{Curriculum, CurriculumEntry};
