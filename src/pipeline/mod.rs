//! Learning material pipeline.
//!
//! This module orchestrates one generation run: the topic is embedded, the
//! embedding drives retrieval, and the five generators turn the retrieved
//! material into a [`LearningMaterial`].
//!
//! # Stages
//!
//! Progress is reported before each of eight stages, always in this order
//! and with these percentages:
//!
//! | stage       | progress |
//! |-------------|----------|
//! | embedding   | 0        |
//! | retrieval   | 14       |
//! | notes       | 29       |
//! | explanation | 43       |
//! | code        | 57       |
//! | examples    | 71       |
//! | quiz        | 86       |
//! | complete    | 100      |
//!
//! The generators are independent of each other but run one after another
//! so the progress sequence stays exactly as above.
//!
//! # Usage
//!
//! ```ignore
//! use study_forge::pipeline::{PipelineProgress, TemplatePipeline};
//! use study_forge::config::StudyConfig;
//!
//! let pipeline = TemplatePipeline::from_config(&StudyConfig::default());
//! let material = pipeline
//!     .run_with_progress("Recursion", &|p: &PipelineProgress| println!("{}% {}", p.progress, p.message))
//!     .await?;
//! println!("{}", material.notes);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

use crate::config::StudyConfig;
use crate::embedding::pseudo::PseudoEmbedder;
use crate::embedding::TopicEmbedder;
use crate::generation::{ContentGenerator, TemplateGenerator};
use crate::models::LearningMaterial;
use crate::retrieval::{Retriever, TemplateRetriever};

/// Errors that can occur during a pipeline run.
///
/// Every stage failure collapses into this single kind; the caller only
/// learns that the run failed and why.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A stage failed and the run was aborted
    #[error("Failed to generate learning materials: {0}")]
    Failed(String),
}

impl PipelineError {
    /// Wrap the message of an underlying error.
    ///
    /// An empty message is reported as `Unknown error`.
    pub fn from_source(source: impl std::fmt::Display) -> Self {
        let detail = source.to_string();
        if detail.trim().is_empty() {
            PipelineError::Failed("Unknown error".to_string())
        } else {
            PipelineError::Failed(detail)
        }
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// A named step of the pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Embedding,
    Retrieval,
    Notes,
    Explanation,
    Code,
    Examples,
    Quiz,
    Complete,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [PipelineStage; 8] = [
        PipelineStage::Embedding,
        PipelineStage::Retrieval,
        PipelineStage::Notes,
        PipelineStage::Explanation,
        PipelineStage::Code,
        PipelineStage::Examples,
        PipelineStage::Quiz,
        PipelineStage::Complete,
    ];

    /// Position of the stage in [`PipelineStage::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Stage name as reported in progress events.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Embedding => "embedding",
            PipelineStage::Retrieval => "retrieval",
            PipelineStage::Notes => "notes",
            PipelineStage::Explanation => "explanation",
            PipelineStage::Code => "code",
            PipelineStage::Examples => "examples",
            PipelineStage::Quiz => "quiz",
            PipelineStage::Complete => "complete",
        }
    }

    /// User-facing status message.
    pub fn message(&self) -> &'static str {
        match self {
            PipelineStage::Embedding => "Analyzing topic...",
            PipelineStage::Retrieval => "Retrieving relevant data...",
            PipelineStage::Notes => "Generating notes...",
            PipelineStage::Explanation => "Creating explanation...",
            PipelineStage::Code => "Writing code examples...",
            PipelineStage::Examples => "Preparing practical examples...",
            PipelineStage::Quiz => "Generating quiz questions...",
            PipelineStage::Complete => "Done!",
        }
    }

    /// Completion percentage reported when the stage starts.
    ///
    /// `round(index / (stages - 1) * 100)`, i.e. 0, 14, 29, 43, 57, 71, 86, 100.
    pub fn progress(&self) -> u8 {
        let last = (Self::ALL.len() - 1) as f64;
        ((self.index() as f64 / last) * 100.0).round() as u8
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One progress event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineProgress {
    /// Stage about to run
    pub stage: PipelineStage,

    /// Percentage, 0..=100
    pub progress: u8,

    /// User-facing status message
    pub message: String,
}

impl From<PipelineStage> for PipelineProgress {
    fn from(stage: PipelineStage) -> Self {
        Self {
            stage,
            progress: stage.progress(),
            message: stage.message().to_string(),
        }
    }
}

/// Receiver of progress events.
///
/// Implemented for closures, for unbounded channel senders, and by
/// [`NoProgress`].
pub trait ProgressReporter: Send + Sync {
    /// Called before each stage starts.
    fn report(&self, progress: &PipelineProgress);
}

impl<F> ProgressReporter for F
where
    F: Fn(&PipelineProgress) + Send + Sync,
{
    fn report(&self, progress: &PipelineProgress) {
        self(progress)
    }
}

impl ProgressReporter for UnboundedSender<PipelineProgress> {
    fn report(&self, progress: &PipelineProgress) {
        // A dropped receiver only means nobody is watching any more.
        let _ = self.send(progress.clone());
    }
}

/// Reporter that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _progress: &PipelineProgress) {}
}

/// Outcome of topic validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TopicValidation {
    fn ok() -> Self {
        Self { valid: true, message: None }
    }

    fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            message: Some(message.to_string()),
        }
    }
}

/// Minimum topic length in UTF-16 code units, after trimming.
pub const MIN_TOPIC_LEN: usize = 2;

/// Maximum topic length in UTF-16 code units, after trimming.
pub const MAX_TOPIC_LEN: usize = 100;

/// Validate a topic before running the pipeline.
///
/// A topic is valid when its trimmed length is between 2 and 100 inclusive.
/// Length is measured in UTF-16 code units, so characters outside the Basic
/// Multilingual Plane (most emoji) count twice.
///
/// # Example
/// ```
/// use study_forge::pipeline::validate_topic;
///
/// assert!(validate_topic("ab").valid);
/// assert!(!validate_topic("   ").valid);
/// ```
pub fn validate_topic(topic: &str) -> TopicValidation {
    let len = topic.trim().encode_utf16().count();

    if len == 0 {
        return TopicValidation::invalid("Please enter a topic");
    }
    if len < MIN_TOPIC_LEN {
        return TopicValidation::invalid("Topic must be at least 2 characters");
    }
    if len > MAX_TOPIC_LEN {
        return TopicValidation::invalid("Topic must be less than 100 characters");
    }

    TopicValidation::ok()
}

/// Names and shape of the services a pipeline was built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineComponents {
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub retriever: String,
}

/// Pipeline coordinator.
///
/// Owns one embedder, one retriever and one generator, and runs them in the
/// fixed stage order. The pipeline holds no per-run state, so a single
/// instance can serve any number of runs.
pub struct LearningPipeline<E, R, G>
where
    E: TopicEmbedder,
    R: Retriever,
    G: ContentGenerator,
{
    /// Topic embedder
    embedder: E,

    /// Reference material retriever
    retriever: R,

    /// Content generator
    generator: G,
}

/// The pipeline built from the template implementations.
pub type TemplatePipeline = LearningPipeline<PseudoEmbedder, TemplateRetriever, TemplateGenerator>;

impl TemplatePipeline {
    /// Build the template pipeline with the configured latencies.
    pub fn from_config(config: &StudyConfig) -> Self {
        let latency = config.latency;
        LearningPipeline::new(
            PseudoEmbedder::new(latency.embedding_ms),
            TemplateRetriever::new(latency.retrieval_ms),
            TemplateGenerator::new(latency),
        )
    }
}

impl<E, R, G> LearningPipeline<E, R, G>
where
    E: TopicEmbedder,
    R: Retriever,
    G: ContentGenerator,
{
    /// Create a new pipeline.
    ///
    /// # Arguments
    /// * `embedder` - Turns the topic into an embedding
    /// * `retriever` - Fetches reference material for the embedding
    /// * `generator` - Produces the learning material parts
    pub fn new(embedder: E, retriever: R, generator: G) -> Self {
        Self {
            embedder,
            retriever,
            generator,
        }
    }

    /// Describe the embedder and retriever this pipeline runs.
    pub fn describe(&self) -> PipelineComponents {
        PipelineComponents {
            embedding_model: self.embedder.model_name().to_string(),
            embedding_dimension: self.embedder.dimension(),
            retriever: self.retriever.name().to_string(),
        }
    }

    /// Run the pipeline without progress reporting.
    ///
    /// # Errors
    /// Returns `PipelineError::Failed` if any stage fails
    pub async fn run(&self, topic: &str) -> PipelineResult<LearningMaterial> {
        self.run_with_progress(topic, &NoProgress).await
    }

    /// Run the pipeline, reporting progress before each stage.
    ///
    /// The reporter sees all eight stages in order on success. On failure it
    /// sees the stages up to and including the one that failed, and no
    /// `complete` event.
    ///
    /// # Arguments
    /// * `topic` - The topic to generate material for
    /// * `progress` - Receiver of progress events
    ///
    /// # Errors
    /// Returns `PipelineError::Failed` wrapping the message of the first
    /// failing stage. No partial material is returned.
    pub async fn run_with_progress<P>(&self, topic: &str, progress: &P) -> PipelineResult<LearningMaterial>
    where
        P: ProgressReporter + ?Sized,
    {
        info!(
            topic,
            model = self.embedder.model_name(),
            dimension = self.embedder.dimension(),
            retriever = self.retriever.name(),
            "Starting learning material pipeline"
        );

        match self.run_stages(topic, progress).await {
            Ok(material) => {
                info!(
                    topic,
                    examples = material.examples.len(),
                    questions = material.quiz.len(),
                    "Learning material pipeline completed"
                );
                Ok(material)
            }
            Err((stage, err)) => {
                error!(topic, %stage, error = %err, "Pipeline error");
                Err(err)
            }
        }
    }

    async fn run_stages<P>(
        &self,
        topic: &str,
        progress: &P,
    ) -> Result<LearningMaterial, (PipelineStage, PipelineError)>
    where
        P: ProgressReporter + ?Sized,
    {
        let enter = |stage: PipelineStage| {
            debug!(%stage, progress = stage.progress(), "Entering stage");
            progress.report(&PipelineProgress::from(stage));
        };

        // 1. Embed the topic
        enter(PipelineStage::Embedding);
        let embedding = self
            .embedder
            .embed(topic)
            .await
            .map_err(|e| (PipelineStage::Embedding, PipelineError::from_source(e)))?;

        // 2. Retrieve reference material
        enter(PipelineStage::Retrieval);
        let data = self
            .retriever
            .retrieve(&embedding)
            .await
            .map_err(|e| (PipelineStage::Retrieval, PipelineError::from_source(e)))?;

        // 3-7. Generate each part in turn
        enter(PipelineStage::Notes);
        let notes = self
            .generator
            .generate_notes(&data, topic)
            .await
            .map_err(|e| (PipelineStage::Notes, PipelineError::from_source(e)))?;

        enter(PipelineStage::Explanation);
        let explanation = self
            .generator
            .generate_explanation(&data, topic)
            .await
            .map_err(|e| (PipelineStage::Explanation, PipelineError::from_source(e)))?;

        enter(PipelineStage::Code);
        let code = self
            .generator
            .generate_code(&data, topic)
            .await
            .map_err(|e| (PipelineStage::Code, PipelineError::from_source(e)))?;

        enter(PipelineStage::Examples);
        let examples = self
            .generator
            .generate_examples(&data, topic)
            .await
            .map_err(|e| (PipelineStage::Examples, PipelineError::from_source(e)))?;

        enter(PipelineStage::Quiz);
        let quiz = self
            .generator
            .generate_quiz(&data, topic)
            .await
            .map_err(|e| (PipelineStage::Quiz, PipelineError::from_source(e)))?;

        enter(PipelineStage::Complete);

        Ok(LearningMaterial {
            notes,
            explanation,
            code,
            examples,
            quiz,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatedLatency;
    use crate::embedding::{EmbedResult, EmbeddingError};
    use crate::generation::{GenerationError, GenerationResult};
    use crate::models::{CodeSamples, EmbeddingResult, Example, QuizQuestion};
    use crate::retrieval::{RetrievalError, RetrievalResult, RetrievedData};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    // ===== Mock Implementations =====

    /// Embedder that can be told to fail.
    struct MockEmbedder {
        fail_with: Option<String>,
    }

    #[async_trait]
    impl TopicEmbedder for MockEmbedder {
        async fn embed(&self, topic: &str) -> EmbedResult<EmbeddingResult> {
            if let Some(message) = &self.fail_with {
                return Err(EmbeddingError::ModelError(message.clone()));
            }
            Ok(EmbeddingResult {
                embedding: vec![1.0],
                topic: topic.to_string(),
                timestamp: 0,
            })
        }

        fn dimension(&self) -> usize {
            1
        }

        fn model_name(&self) -> &str {
            "mock"
        }
    }

    /// Retriever returning fixture data and recording the topics it saw.
    #[derive(Default)]
    struct FixtureRetriever {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Retriever for FixtureRetriever {
        async fn retrieve(&self, embedding: &EmbeddingResult) -> RetrievalResult<RetrievedData> {
            self.seen.lock().unwrap().push(embedding.topic.clone());
            if self.fail {
                return Err(RetrievalError::SourceUnavailable("fixture offline".to_string()));
            }
            Ok(RetrievedData {
                notes: vec!["fixture note".to_string()],
                ..Default::default()
            })
        }

        fn name(&self) -> &str {
            "fixture"
        }
    }

    /// Generator failing on one chosen stage with an optional message.
    struct FailingGenerator {
        inner: TemplateGenerator,
        fail_on: PipelineStage,
        message: String,
    }

    impl FailingGenerator {
        fn new(fail_on: PipelineStage, message: &str) -> Self {
            Self {
                inner: TemplateGenerator::new(SimulatedLatency::none()),
                fail_on,
                message: message.to_string(),
            }
        }

        fn check(&self, stage: PipelineStage) -> GenerationResult<()> {
            if stage == self.fail_on {
                Err(GenerationError::Other(self.message.clone()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ContentGenerator for FailingGenerator {
        async fn generate_notes(&self, data: &RetrievedData, topic: &str) -> GenerationResult<String> {
            self.check(PipelineStage::Notes)?;
            self.inner.generate_notes(data, topic).await
        }

        async fn generate_explanation(&self, data: &RetrievedData, topic: &str) -> GenerationResult<String> {
            self.check(PipelineStage::Explanation)?;
            self.inner.generate_explanation(data, topic).await
        }

        async fn generate_code(&self, data: &RetrievedData, topic: &str) -> GenerationResult<CodeSamples> {
            self.check(PipelineStage::Code)?;
            self.inner.generate_code(data, topic).await
        }

        async fn generate_examples(&self, data: &RetrievedData, topic: &str) -> GenerationResult<Vec<Example>> {
            self.check(PipelineStage::Examples)?;
            self.inner.generate_examples(data, topic).await
        }

        async fn generate_quiz(&self, data: &RetrievedData, topic: &str) -> GenerationResult<Vec<QuizQuestion>> {
            self.check(PipelineStage::Quiz)?;
            self.inner.generate_quiz(data, topic).await
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<PipelineProgress>>>, impl Fn(&PipelineProgress) + Send + Sync) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        (events, move |p: &PipelineProgress| sink.lock().unwrap().push(p.clone()))
    }

    // ===== Stage table =====

    #[test]
    fn test_stage_percentages() {
        let percentages: Vec<u8> = PipelineStage::ALL.iter().map(PipelineStage::progress).collect();
        assert_eq!(percentages, vec![0, 14, 29, 43, 57, 71, 86, 100]);
    }

    #[test]
    fn test_stage_names_and_serialization() {
        let names: Vec<&str> = PipelineStage::ALL.iter().map(PipelineStage::name).collect();
        assert_eq!(
            names,
            vec!["embedding", "retrieval", "notes", "explanation", "code", "examples", "quiz", "complete"]
        );
        assert_eq!(serde_json::to_value(PipelineStage::Explanation).unwrap(), "explanation");
        assert_eq!(PipelineStage::Complete.message(), "Done!");
    }

    // ===== Validation =====

    #[test]
    fn test_validate_topic_boundaries() {
        assert!(!validate_topic("").valid);
        assert!(!validate_topic("a").valid);
        assert!(validate_topic("ab").valid);
        assert!(!validate_topic(&" ".repeat(3)).valid);
        assert!(!validate_topic(&"x".repeat(101)).valid);
        assert!(validate_topic(&"x".repeat(100)).valid);
        assert!(validate_topic(&format!("  {}  ", "x".repeat(100))).valid);
    }

    #[test]
    fn test_validate_topic_counts_utf16_units() {
        // 60 emoji are 120 UTF-16 units
        assert!(!validate_topic(&"🦀".repeat(60)).valid);
        assert!(validate_topic(&"🦀".repeat(50)).valid);
        // A single astral character already reaches the minimum
        assert!(validate_topic("🦀").valid);
        assert!(validate_topic(&"é".repeat(100)).valid);
    }

    #[test]
    fn test_validate_topic_messages() {
        assert_eq!(validate_topic("  ").message.as_deref(), Some("Please enter a topic"));
        assert_eq!(validate_topic("a").message.as_deref(), Some("Topic must be at least 2 characters"));
        assert_eq!(
            validate_topic(&"y".repeat(101)).message.as_deref(),
            Some("Topic must be less than 100 characters")
        );
        assert_eq!(validate_topic("Recursion").message, None);
    }

    // ===== Runs =====

    #[tokio::test]
    async fn test_progress_sequence_on_success() {
        let pipeline = TemplatePipeline::from_config(&StudyConfig::instant());
        let (events, reporter) = recorder();

        pipeline.run_with_progress("Recursion", &reporter).await.unwrap();

        let events = events.lock().unwrap();
        let stages: Vec<PipelineStage> = events.iter().map(|p| p.stage).collect();
        assert_eq!(stages, PipelineStage::ALL.to_vec());
        assert!(events.windows(2).all(|w| w[0].progress <= w[1].progress));
        assert_eq!(events.last().map(|p| p.progress), Some(100));
        assert_eq!(events[1].message, "Retrieving relevant data...");
    }

    #[tokio::test]
    async fn test_progress_over_channel() {
        let pipeline = TemplatePipeline::from_config(&StudyConfig::instant());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        pipeline.run_with_progress("Hash Tables", &tx).await.unwrap();
        drop(tx);

        let mut received = Vec::new();
        while let Some(p) = rx.recv().await {
            received.push(p.progress);
        }
        assert_eq!(received, vec![0, 14, 29, 43, 57, 71, 86, 100]);
    }

    #[tokio::test]
    async fn test_recursion_end_to_end() {
        let pipeline = TemplatePipeline::from_config(&StudyConfig::instant());
        let material = pipeline.run("Recursion").await.unwrap();

        assert_eq!(material.quiz.len(), 6);
        assert_eq!(material.examples.len(), 5);
        assert!(material.code.python.contains("class Recursion"));
    }

    #[test]
    fn test_describe_reports_injected_components() {
        let pipeline = LearningPipeline::new(
            MockEmbedder { fail_with: None },
            FixtureRetriever::default(),
            TemplateGenerator::new(SimulatedLatency::none()),
        );

        assert_eq!(
            pipeline.describe(),
            PipelineComponents {
                embedding_model: "mock".to_string(),
                embedding_dimension: 1,
                retriever: "fixture".to_string(),
            }
        );

        let template = TemplatePipeline::from_config(&StudyConfig::instant()).describe();
        assert_eq!(template.embedding_model, "pseudo-minilm-384");
        assert_eq!(template.embedding_dimension, 384);
        assert_eq!(template.retriever, "template");
    }

    #[tokio::test]
    async fn test_retriever_is_injected() {
        let retriever = FixtureRetriever::default();
        let pipeline = LearningPipeline::new(
            MockEmbedder { fail_with: None },
            retriever,
            TemplateGenerator::new(SimulatedLatency::none()),
        );

        let material = pipeline.run("Tries").await.unwrap();

        assert!(material.notes.contains("1. fixture note"));
        assert_eq!(*pipeline.retriever.seen.lock().unwrap(), vec!["Tries".to_string()]);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_wrapped() {
        let pipeline = LearningPipeline::new(
            MockEmbedder {
                fail_with: Some("model not loaded".to_string()),
            },
            FixtureRetriever::default(),
            TemplateGenerator::new(SimulatedLatency::none()),
        );
        let (events, reporter) = recorder();

        let err = pipeline.run_with_progress("Tries", &reporter).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to generate learning materials: Model error: model not loaded"
        );
        // The retriever never ran and no further stages were reported.
        assert!(pipeline.retriever.seen.lock().unwrap().is_empty());
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retrieval_failure_is_wrapped() {
        let pipeline = LearningPipeline::new(
            MockEmbedder { fail_with: None },
            FixtureRetriever {
                fail: true,
                ..Default::default()
            },
            TemplateGenerator::new(SimulatedLatency::none()),
        );

        let err = pipeline.run("Tries").await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::Failed("Source unavailable: fixture offline".to_string())
        );
    }

    #[tokio::test]
    async fn test_generator_failure_aborts_without_complete() {
        let pipeline = LearningPipeline::new(
            MockEmbedder { fail_with: None },
            FixtureRetriever::default(),
            FailingGenerator::new(PipelineStage::Code, "template missing"),
        );
        let (events, reporter) = recorder();

        let err = pipeline.run_with_progress("Tries", &reporter).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to generate learning materials: template missing");
        let stages: Vec<PipelineStage> = events.lock().unwrap().iter().map(|p| p.stage).collect();
        assert_eq!(stages.last(), Some(&PipelineStage::Code));
        assert!(!stages.contains(&PipelineStage::Complete));
    }

    #[tokio::test]
    async fn test_empty_error_message_becomes_unknown_error() {
        let pipeline = LearningPipeline::new(
            MockEmbedder { fail_with: None },
            FixtureRetriever::default(),
            FailingGenerator::new(PipelineStage::Quiz, ""),
        );

        let err = pipeline.run("Tries").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate learning materials: Unknown error");
    }
}
