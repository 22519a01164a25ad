//! Top-level curriculum run.

use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::core::CallScheduler;
use crate::curriculum::prompts;
use crate::curriculum::{Curriculum, CurriculumEntry, GenerationError};
use crate::generation::{CompletionClient, CompletionRequest};
use crate::infra::store::{LessonKey, LessonStore};

/// Generates categories, subtopics and lessons, persisting each lesson.
///
/// Every completion goes through the shared [`CallScheduler`], so the whole
/// run respects the configured rate limits and retry policy.
pub struct CurriculumGenerator<C, S> {
    scheduler: CallScheduler,
    client: Arc<C>,
    store: Arc<S>,
    config: GenerationConfig,
}

impl<C, S> CurriculumGenerator<C, S>
where
    C: CompletionClient,
    S: LessonStore,
{
    /// Create a generator.
    pub fn new(
        scheduler: CallScheduler,
        client: Arc<C>,
        store: Arc<S>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            scheduler,
            client,
            store,
            config,
        }
    }

    /// Generate and store a full curriculum for `topic`.
    ///
    /// Lessons are produced one at a time, category by category, and each is
    /// stored before the next is requested.
    ///
    /// # Errors
    ///
    /// Stops at the first completion that fails after its retries, the first
    /// empty completion, or the first storage failure.
    pub async fn generate(&self, topic: &str) -> Result<Curriculum, GenerationError> {
        let categories = self.generate_categories(topic).await?;
        tracing::info!(topic, categories = categories.len(), "generating curriculum");

        let mut curriculum = Curriculum::new(topic);
        for category in categories {
            let subtopics = self.generate_subtopics(&category).await?;
            for subtopic in subtopics {
                let lesson = self.generate_lesson(&subtopic).await?;

                let key = LessonKey::new(category.as_str(), subtopic.as_str());
                self.store
                    .store(&key, &prompts::lesson_document(&subtopic, &lesson))
                    .await?;

                curriculum.entries.push(CurriculumEntry {
                    category: category.clone(),
                    subtopic,
                    lesson,
                });
            }
        }

        tracing::info!(topic, lessons = curriculum.len(), "curriculum complete");
        Ok(curriculum)
    }

    /// Ask for the categories of `topic`.
    ///
    /// # Errors
    ///
    /// Returns the completion failure or `GenerationError::EmptyCompletion`.
    pub async fn generate_categories(&self, topic: &str) -> Result<Vec<String>, GenerationError> {
        let text = self
            .complete(prompts::categories_prompt(topic, self.config.category_count))
            .await?;
        Ok(prompts::parse_list(&text))
    }

    /// Ask for the subtopics of `category`.
    ///
    /// # Errors
    ///
    /// Returns the completion failure or `GenerationError::EmptyCompletion`.
    pub async fn generate_subtopics(&self, category: &str) -> Result<Vec<String>, GenerationError> {
        tracing::info!(category, "generating subtopics");
        let text = self
            .complete(prompts::subtopics_prompt(category, self.config.subtopic_count))
            .await?;
        Ok(prompts::parse_list(&text))
    }

    /// Ask for the lesson on `subtopic`.
    ///
    /// # Errors
    ///
    /// Returns the completion failure or `GenerationError::EmptyCompletion`.
    pub async fn generate_lesson(&self, subtopic: &str) -> Result<String, GenerationError> {
        tracing::info!(subtopic, "generating lesson");
        self.complete(prompts::lesson_prompt(subtopic)).await
    }

    /// Run one completion through the scheduler and return its trimmed text.
    async fn complete(&self, prompt: String) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt,
            max_tokens: self.config.max_tokens,
        };
        let client = Arc::clone(&self.client);
        let attempt_request = request.clone();

        let response = self
            .scheduler
            .call_with_retry(move || {
                let client = Arc::clone(&client);
                let request = attempt_request.clone();
                async move {
                    client
                        .create_completion(request)
                        .await
                        .map_err(GenerationError::from)
                }
            })
            .await?;

        response
            .first_text()
            .map(|text| text.trim().to_string())
            .ok_or(GenerationError::EmptyCompletion(request.prompt))
    }
}
