//! Content generation stage.
//!
//! Five generators turn the retrieved material into the parts of a
//! [`LearningMaterial`](crate::models::LearningMaterial): notes, an
//! explanation, code samples, worked examples and a quiz.
//!
//! Each generator has the shape `(data, topic) -> content`. The
//! `ContentGenerator` trait fixes that shape so the template implementation
//! here can later be replaced by model-backed generation without touching
//! the pipeline.

pub mod code;
pub mod examples;
pub mod explanation;
pub mod notes;
pub mod quiz;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::config::{simulate, SimulatedLatency};
use crate::models::{CodeSamples, Example, QuizQuestion};
use crate::retrieval::RetrievedData;

/// Errors that can occur during content generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A generator could not produce its content
    #[error("{0}")]
    Other(String),
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Trait for learning material generators.
///
/// The five methods are independent of each other: each one only needs the
/// retrieved data and the topic.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate Markdown study notes.
    async fn generate_notes(&self, data: &RetrievedData, topic: &str) -> GenerationResult<String>;

    /// Generate a Markdown plain-language explanation.
    async fn generate_explanation(&self, data: &RetrievedData, topic: &str) -> GenerationResult<String>;

    /// Generate code samples in Python, Java and JavaScript.
    async fn generate_code(&self, data: &RetrievedData, topic: &str) -> GenerationResult<CodeSamples>;

    /// Generate worked input/output examples.
    async fn generate_examples(&self, data: &RetrievedData, topic: &str) -> GenerationResult<Vec<Example>>;

    /// Generate quiz questions.
    async fn generate_quiz(&self, data: &RetrievedData, topic: &str) -> GenerationResult<Vec<QuizQuestion>>;
}

/// Generator that fills fixed templates with the topic.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    latency: SimulatedLatency,
}

impl TemplateGenerator {
    /// Create a template generator with the given simulated latencies.
    ///
    /// Only the generator stages (`notes_ms` .. `quiz_ms`) are used.
    pub fn new(latency: SimulatedLatency) -> Self {
        Self { latency }
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new(SimulatedLatency::default())
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    async fn generate_notes(&self, data: &RetrievedData, topic: &str) -> GenerationResult<String> {
        simulate(self.latency.notes_ms).await;
        debug!(topic, "Rendering notes");
        Ok(notes::render(data, topic))
    }

    async fn generate_explanation(&self, data: &RetrievedData, topic: &str) -> GenerationResult<String> {
        simulate(self.latency.explanation_ms).await;
        debug!(topic, "Rendering explanation");
        Ok(explanation::render(data, topic))
    }

    async fn generate_code(&self, data: &RetrievedData, topic: &str) -> GenerationResult<CodeSamples> {
        simulate(self.latency.code_ms).await;
        debug!(topic, class = %to_pascal_case(topic), "Rendering code samples");
        Ok(code::render(data, topic))
    }

    async fn generate_examples(&self, data: &RetrievedData, topic: &str) -> GenerationResult<Vec<Example>> {
        simulate(self.latency.examples_ms).await;
        debug!(topic, "Rendering examples");
        Ok(examples::render(data, topic))
    }

    async fn generate_quiz(&self, data: &RetrievedData, topic: &str) -> GenerationResult<Vec<QuizQuestion>> {
        simulate(self.latency.quiz_ms).await;
        debug!(topic, "Rendering quiz");
        Ok(quiz::render(data, topic))
    }
}

/// Convert a topic into a PascalCase identifier.
///
/// The topic is split on runs of whitespace, underscores and hyphens; each
/// token gets an upper-cased first character followed by the lower-cased
/// rest.
///
/// # Example
/// ```
/// use study_forge::generation::to_pascal_case;
///
/// assert_eq!(to_pascal_case("binary search trees"), "BinarySearchTrees");
/// assert_eq!(to_pascal_case("quick-sort"), "QuickSort");
/// assert_eq!(to_pascal_case(""), "");
/// ```
pub fn to_pascal_case(input: &str) -> String {
    input
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Upper-case the first character and keep the rest as is.
pub fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
