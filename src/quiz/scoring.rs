//! Quiz scoring and result reporting.

use serde::{Deserialize, Serialize};

use super::Answer;
use crate::models::{CorrectAnswer, QuestionKind, QuizQuestion};

/// Check a stored answer against a question.
///
/// Option-based questions are correct iff the chosen index equals the
/// expected index. Short-answer questions use [`short_answer_matches`].
/// A missing answer is never correct for option-based questions.
pub fn is_answer_correct(question: &QuizQuestion, answer: Option<&Answer>) -> bool {
    match question.kind {
        QuestionKind::ShortAnswer => {
            let reference = match &question.correct_answer {
                CorrectAnswer::Text(text) => text.clone(),
                CorrectAnswer::Index(i) => i.to_string(),
            };
            let given = match answer {
                Some(Answer::Text(text)) => text.as_str(),
                _ => "",
            };
            short_answer_matches(given, &reference)
        }
        QuestionKind::Mcq | QuestionKind::TrueFalse => match (answer, &question.correct_answer) {
            (Some(Answer::Choice(chosen)), CorrectAnswer::Index(expected)) => chosen == expected,
            _ => false,
        },
    }
}

/// Permissive short-answer comparison.
///
/// Both sides are lower-cased and trimmed; the answer is correct when either
/// one contains the other. An empty answer only matches an empty reference.
///
/// # Example
/// ```
/// use study_forge::quiz::short_answer_matches;
///
/// assert!(short_answer_matches("It Returns False", "returns false"));
/// assert!(short_answer_matches("false", "returns false"));
/// assert!(!short_answer_matches("true", "returns false"));
/// assert!(!short_answer_matches("", "returns false"));
/// ```
pub fn short_answer_matches(answer: &str, reference: &str) -> bool {
    let answer = answer.to_lowercase();
    let answer = answer.trim();
    let reference = reference.to_lowercase();
    let reference = reference.trim();

    if answer.is_empty() {
        return reference.is_empty();
    }

    answer.contains(reference) || reference.contains(answer)
}

/// Feedback band for a final percentage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Feedback {
    /// 80% and above
    Excellent,
    /// 60% to 79%
    Good,
    /// Below 60%
    KeepStudying,
}

impl Feedback {
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage >= 80 {
            Feedback::Excellent
        } else if percentage >= 60 {
            Feedback::Good
        } else {
            Feedback::KeepStudying
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent work! You've mastered this topic!",
            Feedback::Good => "Good job! Keep practicing to improve.",
            Feedback::KeepStudying => "Keep studying and try again!",
        }
    }
}

/// Per-question line of the results review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionReview {
    pub id: String,
    pub kind: QuestionKind,
    pub correct: bool,
    pub explanation: Option<String>,
}

/// Final results of a quiz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizReport {
    /// Number of correct answers
    pub score: usize,

    /// Number of questions
    pub total: usize,

    /// `round(score / total * 100)`, 0 for an empty quiz
    pub percentage: u8,

    pub feedback: Feedback,

    /// One entry per question, in quiz order
    pub review: Vec<QuestionReview>,
}

impl QuizReport {
    pub(crate) fn build<'a>(
        questions: &[QuizQuestion],
        answer_for: impl Fn(&QuizQuestion) -> Option<&'a Answer>,
    ) -> Self {
        let review: Vec<QuestionReview> = questions
            .iter()
            .map(|q| QuestionReview {
                id: q.id.clone(),
                kind: q.kind,
                correct: is_answer_correct(q, answer_for(q)),
                explanation: q.explanation.clone(),
            })
            .collect();

        let score = review.iter().filter(|r| r.correct).count();
        let total = questions.len();
        let percentage = if total == 0 {
            0
        } else {
            ((score as f64 / total as f64) * 100.0).round() as u8
        };

        Self {
            score,
            total,
            percentage,
            feedback: Feedback::from_percentage(percentage),
            review,
        }
    }
}
