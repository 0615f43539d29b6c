//! Template-backed retriever.
//!
//! Stands in for a dataset index: every field of [`RetrievedData`] is built
//! by substituting the lower-cased topic into fixed text. The output is a
//! pure function of the topic and always has the same shape.

use async_trait::async_trait;
use tracing::debug;

use super::{CodeSnippets, QuizData, RetrievalResult, RetrievedData, Retriever};
use crate::config::simulate;
use crate::models::{EmbeddingResult, Example};

/// Retriever producing canned, topic-interpolated material.
///
/// Constructed explicitly and handed to the pipeline, so tests can swap in
/// their own `Retriever` without touching shared state.
#[derive(Debug, Clone)]
pub struct TemplateRetriever {
    /// Simulated lookup latency in milliseconds
    latency_ms: u64,
}

impl TemplateRetriever {
    /// Create a new template retriever.
    ///
    /// # Arguments
    /// * `latency_ms` - Simulated lookup latency, 0 to disable
    pub fn new(latency_ms: u64) -> Self {
        Self { latency_ms }
    }

    /// Build the retrieved data for a topic without any latency.
    pub fn material_for(topic: &str) -> RetrievedData {
        let topic = topic.to_lowercase();

        RetrievedData {
            notes: notes(&topic),
            code_snippets: code_snippets(&topic),
            explanations: explanations(&topic),
            examples: examples(&topic),
            quiz_data: quiz_data(&topic),
        }
    }
}

impl Default for TemplateRetriever {
    fn default() -> Self {
        Self::new(800)
    }
}

#[async_trait]
impl Retriever for TemplateRetriever {
    async fn retrieve(&self, embedding: &EmbeddingResult) -> RetrievalResult<RetrievedData> {
        simulate(self.latency_ms).await;

        let data = Self::material_for(&embedding.topic);
        debug!(
            topic = %embedding.topic,
            notes = data.notes.len(),
            explanations = data.explanations.len(),
            "Retrieved templated material"
        );
        Ok(data)
    }

    fn name(&self) -> &str {
        "template"
    }
}

fn notes(topic: &str) -> Vec<String> {
    vec![
        format!("{topic} is a fundamental concept in computer science."),
        "Key characteristics include efficiency, scalability, and practical applications.".to_string(),
        format!("Understanding {topic} requires knowledge of basic data structures and algorithms."),
        "Common use cases involve optimization and problem-solving scenarios.".to_string(),
    ]
}

fn code_snippets(topic: &str) -> CodeSnippets {
    CodeSnippets {
        python: vec![format!("# Python implementation of {topic}\ndef example():\n    pass")],
        java: vec![format!(
            "// Java implementation of {topic}\npublic class Example {{\n    public static void main(String[] args) {{\n    }}\n}}"
        )],
        javascript: vec![format!(
            "// JavaScript implementation of {topic}\nfunction example() {{\n    // Implementation\n}}"
        )],
    }
}

fn explanations(topic: &str) -> Vec<String> {
    vec![
        format!("{topic} explained simply: Think of it as a systematic approach to solving problems."),
        format!("In everyday terms, {topic} works like organizing items for quick access."),
    ]
}

fn examples(topic: &str) -> Vec<Example> {
    vec![
        Example::new("Sample input 1", "Expected output 1", format!("Demonstrates basic {topic} operation")),
        Example::new("Sample input 2", "Expected output 2", format!("Shows advanced {topic} usage")),
    ]
}

fn quiz_data(topic: &str) -> QuizData {
    QuizData {
        questions: vec![
            format!("What is the primary purpose of {topic}?"),
            format!("Which of the following best describes {topic}?"),
            format!("True or False: {topic} has O(n) time complexity."),
        ],
        contexts: vec![
            format!("{topic} is used for efficient data management."),
            "The concept originated from mathematical optimization.".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn embedding_for(topic: &str) -> EmbeddingResult {
        EmbeddingResult {
            embedding: vec![],
            topic: topic.to_string(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_uses_lower_cased_topic() {
        let retriever = TemplateRetriever::new(0);
        let data = retriever.retrieve(&embedding_for("Hash Tables")).await.unwrap();

        assert_eq!(data.notes[0], "hash tables is a fundamental concept in computer science.");
        assert_eq!(data.quiz_data.questions[2], "True or False: hash tables has O(n) time complexity.");
        assert!(data.code_snippets.java[0].starts_with("// Java implementation of hash tables\n"));
    }

    #[tokio::test]
    async fn test_ignores_embedding_vector() {
        let retriever = TemplateRetriever::new(0);
        let mut a = embedding_for("Recursion");
        a.embedding = vec![1.0, 0.0];
        let b = embedding_for("recursion");

        assert_eq!(
            retriever.retrieve(&a).await.unwrap(),
            retriever.retrieve(&b).await.unwrap()
        );
    }

    #[test]
    fn test_shape_is_topic_independent() {
        for topic in ["", "x", "Object-Oriented Programming", "ünïcödé topic"] {
            let data = TemplateRetriever::material_for(topic);
            assert_eq!(data.notes.len(), 4);
            assert_eq!(data.explanations.len(), 2);
            assert_eq!(data.examples.len(), 2);
            assert_eq!(data.quiz_data.questions.len(), 3);
            assert_eq!(data.quiz_data.contexts.len(), 2);
            assert_eq!(data.code_snippets.python.len(), 1);
            assert_eq!(data.code_snippets.java.len(), 1);
            assert_eq!(data.code_snippets.javascript.len(), 1);
        }
    }
}
