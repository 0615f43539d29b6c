//! Study Forge - Turns a study topic into a complete set of learning material.
//!
//! Given a topic such as "Binary Search Trees", the library produces study
//! notes, a conceptual explanation, code samples in Python, Java and
//! JavaScript, worked examples, and a short quiz, then lets a learner take
//! the quiz interactively.
//!
//! # Architecture
//!
//! - **models**: Core data structures (LearningMaterial, QuizQuestion, etc.)
//! - **embedding**: Deterministic topic embeddings
//! - **retrieval**: Reference material lookup and dataset catalog
//! - **generation**: Template-based content generators
//! - **pipeline**: Stage orchestration, progress events and topic validation
//! - **session**: Single-flight generation with one stored result
//! - **quiz**: Quiz state machine and scoring
//! - **config**: Simulated latency configuration
//!
//! # Workflow
//!
//! 1. Validate the topic
//! 2. Embed the topic
//! 3. Retrieve reference material for the embedding
//! 4. Generate notes, explanation, code, examples and quiz in order
//! 5. Hand the quiz to a [`quiz::QuizSession`]
//!
//! # Example
//!
//! ```ignore
//! use study_forge::{config::StudyConfig, quiz::QuizSession, session::TemplateSession};
//! use study_forge::pipeline::NoProgress;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = TemplateSession::from_config(&StudyConfig::default());
//!     let material = session.generate("Recursion", &NoProgress).await?;
//!
//!     let mut quiz = QuizSession::new(material.quiz.clone());
//!     quiz.select_option(0)?;
//!     quiz.next();
//!
//!     Ok(())
//! }
//! ```

// Public modules
pub mod config;
pub mod embedding;
pub mod generation;
pub mod models;
pub mod pipeline;
pub mod quiz;
pub mod retrieval;
pub mod session;

// Re-export commonly used types at the crate root
pub use config::{SimulatedLatency, StudyConfig};
pub use embedding::TopicEmbedder;
pub use generation::ContentGenerator;
pub use models::{CodeSamples, Example, LearningMaterial, QuestionKind, QuizQuestion};
pub use pipeline::{validate_topic, LearningPipeline, PipelineProgress, PipelineStage, TemplatePipeline};
pub use quiz::{QuizReport, QuizSession};
pub use retrieval::Retriever;
pub use session::{StudySession, TemplateSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dimension of the topic embeddings
pub const EMBEDDING_DIMENSION: usize = embedding::pseudo::PSEUDO_EMBEDDING_DIMENSION;
