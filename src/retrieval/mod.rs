//! Retrieval stage.
//!
//! This module defines the interface for fetching topic-relevant reference
//! material and the catalogue of dataset sources the material is meant to
//! come from.
//!
//! The `Retriever` trait abstracts the source of reference material, so the
//! pipeline works the same whether the data comes from templates, fixtures
//! in tests, or a real index built from the datasets below.

pub mod templated;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EmbeddingResult, Example};

pub use templated::TemplateRetriever;

/// Errors that can occur during retrieval.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The backing data source could not be reached
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Result type for retrieval operations.
pub type RetrievalResult<T> = Result<T, RetrievalError>;

/// Code snippet stubs per target language.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeSnippets {
    pub python: Vec<String>,
    pub java: Vec<String>,
    pub javascript: Vec<String>,
}

/// Question stems and supporting context for quiz generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizData {
    pub questions: Vec<String>,
    pub contexts: Vec<String>,
}

/// Reference material retrieved for a topic.
///
/// This is the only input the generators see besides the topic itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedData {
    /// Short factual notes
    pub notes: Vec<String>,

    /// Code stubs per language
    pub code_snippets: CodeSnippets,

    /// Plain-language explanation paragraphs
    pub explanations: Vec<String>,

    /// Input/output examples
    pub examples: Vec<Example>,

    /// Quiz stems and contexts
    pub quiz_data: QuizData,
}

/// Trait for retrieval services.
///
/// Implementations receive the full embedding so a real index can search by
/// vector; the template retriever only reads `embedding.topic`.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve reference material for an embedded topic.
    ///
    /// # Errors
    /// Returns `RetrievalError` if the material cannot be retrieved
    async fn retrieve(&self, embedding: &EmbeddingResult) -> RetrievalResult<RetrievedData>;

    /// Human-readable name of this retriever, used in logs.
    fn name(&self) -> &str;
}

/// Which kind of content a dataset feeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DatasetCategory {
    Code,
    Explanation,
    Quiz,
}

impl DatasetCategory {
    /// Every category, in catalogue order.
    pub const ALL: [DatasetCategory; 3] = [DatasetCategory::Code, DatasetCategory::Explanation, DatasetCategory::Quiz];

    pub fn label(&self) -> &'static str {
        match self {
            DatasetCategory::Code => "Code",
            DatasetCategory::Explanation => "Explanation",
            DatasetCategory::Quiz => "Quiz",
        }
    }
}

/// A public dataset the retrieval stage is designed to draw from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DatasetSource {
    pub category: DatasetCategory,
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

const DATASET_SOURCES: [DatasetSource; 8] = [
    DatasetSource {
        category: DatasetCategory::Code,
        name: "CodeXGLUE",
        url: "https://github.com/microsoft/CodeXGLUE",
        description: "General Language Understanding Evaluation benchmark for Code",
    },
    DatasetSource {
        category: DatasetCategory::Code,
        name: "The Stack",
        url: "https://huggingface.co/datasets/bigcode/the-stack",
        description: "Large-scale pretraining dataset for code",
    },
    DatasetSource {
        category: DatasetCategory::Explanation,
        name: "Wikipedia CS Articles",
        url: "https://huggingface.co/datasets/wikipedia",
        description: "Computer Science articles from Wikipedia",
    },
    DatasetSource {
        category: DatasetCategory::Explanation,
        name: "ELI5",
        url: "https://huggingface.co/datasets/eli5",
        description: "Explain Like I'm Five - Long form question answering",
    },
    DatasetSource {
        category: DatasetCategory::Explanation,
        name: "DS-NLP Notes",
        url: "https://huggingface.co/datasets/TalTechNLP/DS-NLP-Notes",
        description: "Data Science and NLP educational notes",
    },
    DatasetSource {
        category: DatasetCategory::Quiz,
        name: "OpenBookQA",
        url: "https://huggingface.co/datasets/openbookqa",
        description: "Open book question answering dataset",
    },
    DatasetSource {
        category: DatasetCategory::Quiz,
        name: "BoolQ",
        url: "https://huggingface.co/datasets/boolq",
        description: "Boolean Yes/No question answering",
    },
    DatasetSource {
        category: DatasetCategory::Quiz,
        name: "MCTest",
        url: "https://huggingface.co/datasets/mctest",
        description: "Machine Comprehension Test dataset",
    },
];

/// All dataset sources, grouped in category order.
pub fn dataset_sources() -> &'static [DatasetSource] {
    &DATASET_SOURCES
}

/// Dataset sources of a single category.
pub fn dataset_sources_for(category: DatasetCategory) -> impl Iterator<Item = &'static DatasetSource> {
    dataset_sources().iter().filter(move |s| s.category == category)
}
