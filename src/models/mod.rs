//! Core data models for the learning material generator.
//!
//! This module contains the data structures that flow through the pipeline:
//! the topic embedding, the generated learning material, and the quiz
//! questions handed to the quiz session.

use serde::{Deserialize, Serialize};

/// Output of the embedding stage for a single topic.
///
/// The embedding vector is L2-normalized and depends only on the lower-cased
/// topic. The timestamp records when the embedding was produced and is the
/// only field that differs between two embeddings of the same topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingResult {
    /// Normalized embedding vector
    pub embedding: Vec<f32>,

    /// The topic exactly as it was submitted
    pub topic: String,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// A worked input/output example shown alongside the notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Example {
    pub input: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Example {
    /// Create an example with an explanation.
    pub fn new(input: impl Into<String>, output: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            explanation: Some(explanation.into()),
        }
    }
}

/// Kind of quiz question.
///
/// Serialized as `mcq`, `true-false` and `short-answer`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Multiple choice with a list of options
    Mcq,

    /// Two options, "True" and "False"
    TrueFalse,

    /// Free-text answer compared against a reference string
    ShortAnswer,
}

impl QuestionKind {
    /// Whether questions of this kind are answered by picking an option.
    pub fn has_options(&self) -> bool {
        matches!(self, QuestionKind::Mcq | QuestionKind::TrueFalse)
    }

    /// Human-readable label, e.g. "true false".
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::TrueFalse => "true false",
            QuestionKind::ShortAnswer => "short answer",
        }
    }
}

/// The expected answer of a quiz question.
///
/// Option-based questions store the index of the correct option; short-answer
/// questions store a reference string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(usize),
    Text(String),
}

/// A single quiz question.
///
/// For `Mcq` and `TrueFalse` questions `correct_answer` is an
/// [`CorrectAnswer::Index`] into `options`. For `ShortAnswer` questions it is
/// a [`CorrectAnswer::Text`] reference and `options` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// Identifier, unique within one quiz
    pub id: String,

    /// Question kind
    #[serde(rename = "type")]
    pub kind: QuestionKind,

    /// Question text
    pub question: String,

    /// Answer options (option-based questions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Expected answer
    pub correct_answer: CorrectAnswer,

    /// Explanation revealed once the question is submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    /// Number of options, zero for short-answer questions.
    pub fn option_count(&self) -> usize {
        self.options.as_ref().map(Vec::len).unwrap_or(0)
    }

    /// Check the invariant between `kind`, `options` and `correct_answer`.
    ///
    /// # Returns
    /// `true` if option-based questions point at an existing option and
    /// short-answer questions carry a text reference
    pub fn is_well_formed(&self) -> bool {
        match (&self.kind, &self.correct_answer) {
            (kind, CorrectAnswer::Index(i)) if kind.has_options() => *i < self.option_count(),
            (QuestionKind::ShortAnswer, CorrectAnswer::Text(_)) => self.options.is_none(),
            _ => false,
        }
    }
}

/// Source code for the three target languages.
///
/// The code is opaque text; it is displayed, never executed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeSamples {
    pub python: String,
    pub java: String,
    pub javascript: String,
}

/// The complete output of one pipeline run.
///
/// Created once per run and never mutated afterwards. The session hands it
/// out behind an `Arc` so every consumer reads the same value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LearningMaterial {
    /// Markdown study notes
    pub notes: String,

    /// Markdown plain-language explanation
    pub explanation: String,

    /// Code samples in Python, Java and JavaScript
    pub code: CodeSamples,

    /// Worked examples
    pub examples: Vec<Example>,

    /// Quiz questions
    pub quiz: Vec<QuizQuestion>,
}

/// A suggested topic with its category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicSuggestion {
    pub topic: String,
    pub category: String,
}

const SUGGESTIONS: [(&str, &str); 12] = [
    ("Binary Search Trees", "Data Structures"),
    ("QuickSort", "Algorithms"),
    ("Operating System Threads", "Systems"),
    ("Hash Tables", "Data Structures"),
    ("Dynamic Programming", "Algorithms"),
    ("REST APIs", "Web Development"),
    ("Machine Learning Basics", "ML"),
    ("SQL Joins", "Databases"),
    ("Recursion", "Fundamentals"),
    ("Object-Oriented Programming", "Paradigms"),
    ("Graph Algorithms", "Algorithms"),
    ("Memory Management", "Systems"),
];

/// Number of suggestions returned for an empty query.
const DEFAULT_SUGGESTION_COUNT: usize = 6;

/// Suggest topics matching the partially typed input.
///
/// Matching is a case-insensitive substring check. An empty input returns
/// the first six suggestions.
///
/// # Example
/// ```
/// use study_forge::models::suggest_topics;
///
/// let found = suggest_topics("sort");
/// assert_eq!(found[0].topic, "QuickSort");
/// ```
pub fn suggest_topics(input: &str) -> Vec<TopicSuggestion> {
    let needle = input.to_lowercase();
    let all = SUGGESTIONS.iter().map(|(topic, category)| TopicSuggestion {
        topic: topic.to_string(),
        category: category.to_string(),
    });

    if needle.is_empty() {
        return all.take(DEFAULT_SUGGESTION_COUNT).collect();
    }

    all.filter(|s| s.topic.to_lowercase().contains(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mcq(correct: usize) -> QuizQuestion {
        QuizQuestion {
            id: "1".to_string(),
            kind: QuestionKind::Mcq,
            question: "Pick one".to_string(),
            options: Some(vec!["a".to_string(), "b".to_string()]),
            correct_answer: CorrectAnswer::Index(correct),
            explanation: None,
        }
    }

    #[test]
    fn test_question_well_formed() {
        assert!(mcq(1).is_well_formed());
        assert!(!mcq(2).is_well_formed());

        let short = QuizQuestion {
            id: "2".to_string(),
            kind: QuestionKind::ShortAnswer,
            question: "Say something".to_string(),
            options: None,
            correct_answer: CorrectAnswer::Text("something".to_string()),
            explanation: None,
        };
        assert!(short.is_well_formed());

        let mismatched = QuizQuestion {
            correct_answer: CorrectAnswer::Index(0),
            ..short
        };
        assert!(!mismatched.is_well_formed());
    }

    #[test]
    fn test_question_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(mcq(1)).unwrap();
        assert_eq!(json["type"], "mcq");
        assert_eq!(json["correctAnswer"], 1);
        assert!(json.get("explanation").is_none());

        let kind = serde_json::to_value(QuestionKind::TrueFalse).unwrap();
        assert_eq!(kind, "true-false");
    }

    #[test]
    fn test_correct_answer_deserializes_untagged() {
        let index: CorrectAnswer = serde_json::from_str("2").unwrap();
        assert_eq!(index, CorrectAnswer::Index(2));
        let text: CorrectAnswer = serde_json::from_str("\"returns false\"").unwrap();
        assert_eq!(text, CorrectAnswer::Text("returns false".to_string()));
    }

    #[test]
    fn test_suggest_topics() {
        assert_eq!(suggest_topics("").len(), 6);
        assert_eq!(suggest_topics("")[0].topic, "Binary Search Trees");

        let algorithms: Vec<String> = suggest_topics("ALGO").into_iter().map(|s| s.topic).collect();
        assert_eq!(algorithms, vec!["Graph Algorithms".to_string()]);

        assert!(suggest_topics("quantum").is_empty());
    }
}
