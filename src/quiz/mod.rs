//! Interactive quiz state machine.
//!
//! A [`QuizSession`] walks a learner through the generated questions one at
//! a time. Each question moves from unanswered to answered to submitted;
//! once submitted it can no longer be changed. Advancing past the last
//! submitted question finishes the quiz, at which point a [`QuizReport`]
//! becomes available.
//!
//! Inert actions (selecting an option twice, advancing before submitting)
//! return `Ok(false)` rather than an error, mirroring buttons that are simply
//! disabled. Errors are reserved for requests that can never be valid, such
//! as an out-of-range question or option index.

mod scoring;

pub use scoring::{is_answer_correct, short_answer_matches, Feedback, QuestionReview, QuizReport};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{QuestionKind, QuizQuestion};

/// Errors raised by quiz actions
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("Question index {index} out of range (quiz has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("Option index {index} out of range (question has {len} options)")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("Question {id} is {actual}, not {expected}")]
    WrongQuestionKind {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Quiz has no current question")]
    NoCurrentQuestion,
}

/// Result type for quiz actions
pub type QuizResult<T> = Result<T, QuizError>;

/// A learner's answer to one question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Answer {
    /// Chosen option index (mcq, true-false)
    Choice(usize),
    /// Free text (short-answer)
    Text(String),
}

/// Overall phase of a quiz.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuizPhase {
    Answering,
    Finished,
}

/// Per-question progress, used for the index dots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Unanswered,
    Answered,
    Submitted,
}

/// Raw quiz state, keyed by question id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    pub current_question: usize,
    pub answers: BTreeMap<String, Answer>,
    pub submitted: BTreeMap<String, bool>,
    pub show_results: bool,
}

impl QuizState {
    fn is_submitted(&self, id: &str) -> bool {
        self.submitted.get(id).copied().unwrap_or(false)
    }
}

/// Quiz over an owned list of questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    state: QuizState,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            state: QuizState::default(),
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn phase(&self) -> QuizPhase {
        if self.state.show_results {
            QuizPhase::Finished
        } else {
            QuizPhase::Answering
        }
    }

    pub fn current_index(&self) -> usize {
        self.state.current_question
    }

    /// The question being shown, or `None` for an empty quiz.
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.state.current_question)
    }

    pub fn answer(&self, id: &str) -> Option<&Answer> {
        self.state.answers.get(id)
    }

    pub fn is_last(&self) -> bool {
        self.state.current_question + 1 >= self.questions.len()
    }

    /// Status of the question at `index`.
    ///
    /// # Errors
    /// Returns `QuestionOutOfRange` if `index` is not a valid question.
    pub fn question_status(&self, index: usize) -> QuizResult<QuestionStatus> {
        let question = self.question_at(index)?;
        let status = if self.state.is_submitted(&question.id) {
            QuestionStatus::Submitted
        } else if self.state.answers.contains_key(&question.id) {
            QuestionStatus::Answered
        } else {
            QuestionStatus::Unanswered
        };
        Ok(status)
    }

    /// Choose an option on the current mcq or true-false question.
    ///
    /// Selecting records the answer and submits it in one step.
    ///
    /// # Returns
    /// `Ok(true)` if the answer was recorded, `Ok(false)` if the question was
    /// already submitted or the quiz is finished.
    ///
    /// # Errors
    /// - `WrongQuestionKind` if the current question is short-answer
    /// - `OptionOutOfRange` if `index` is not one of its options
    pub fn select_option(&mut self, index: usize) -> QuizResult<bool> {
        if self.phase() == QuizPhase::Finished {
            return Ok(false);
        }

        let question = self.current_question()?;
        if !question.kind.has_options() {
            return Err(wrong_kind(question, "an option question"));
        }

        let len = question.option_count();
        if index >= len {
            return Err(QuizError::OptionOutOfRange { index, len });
        }

        let id = question.id.clone();
        if self.state.is_submitted(&id) {
            return Ok(false);
        }

        debug!("Question {} answered with option {}", id, index);
        self.state.answers.insert(id.clone(), Answer::Choice(index));
        self.state.submitted.insert(id, true);
        Ok(true)
    }

    /// Update the typed answer of the current short-answer question.
    ///
    /// # Returns
    /// `Ok(false)` once the question has been submitted.
    ///
    /// # Errors
    /// `WrongQuestionKind` if the current question has options.
    pub fn input_short_answer(&mut self, text: impl Into<String>) -> QuizResult<bool> {
        if self.phase() == QuizPhase::Finished {
            return Ok(false);
        }

        let question = self.current_question()?;
        if question.kind != QuestionKind::ShortAnswer {
            return Err(wrong_kind(question, QuestionKind::ShortAnswer.label()));
        }

        let id = question.id.clone();
        if self.state.is_submitted(&id) {
            return Ok(false);
        }

        self.state.answers.insert(id, Answer::Text(text.into()));
        Ok(true)
    }

    /// Submit the typed answer of the current short-answer question.
    ///
    /// # Returns
    /// `Ok(false)` while the answer is empty or after it was submitted.
    pub fn submit_short_answer(&mut self) -> QuizResult<bool> {
        if self.phase() == QuizPhase::Finished {
            return Ok(false);
        }

        let question = self.current_question()?;
        if question.kind != QuestionKind::ShortAnswer {
            return Err(wrong_kind(question, QuestionKind::ShortAnswer.label()));
        }

        let id = question.id.clone();
        if self.state.is_submitted(&id) {
            return Ok(false);
        }

        match self.state.answers.get(&id) {
            Some(Answer::Text(text)) if !text.is_empty() => {
                debug!("Question {} short answer submitted", id);
                self.state.submitted.insert(id, true);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn can_go_next(&self) -> bool {
        self.phase() == QuizPhase::Answering
            && self
                .current()
                .is_some_and(|q| self.state.is_submitted(&q.id))
    }

    pub fn can_go_previous(&self) -> bool {
        self.phase() == QuizPhase::Answering && self.state.current_question > 0
    }

    /// Advance to the next question, or finish on the last one.
    ///
    /// Inert (returns `false`) until the current question is submitted.
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }

        if self.is_last() {
            debug!("Quiz finished");
            self.state.show_results = true;
        } else {
            self.state.current_question += 1;
        }
        true
    }

    /// Go back one question. Inert on the first question.
    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.state.current_question -= 1;
        true
    }

    /// Jump directly to question `index`, regardless of submission state.
    ///
    /// # Errors
    /// Returns `QuestionOutOfRange` if `index` is not a valid question.
    pub fn jump_to(&mut self, index: usize) -> QuizResult<()> {
        self.question_at(index)?;
        self.state.current_question = index;
        Ok(())
    }

    /// Discard all answers and return to the first question.
    pub fn reset(&mut self) {
        self.state = QuizState::default();
    }

    /// Number of correct answers, available once the quiz is finished.
    pub fn score(&self) -> Option<usize> {
        self.report().map(|r| r.score)
    }

    /// Full results, available once the quiz is finished.
    pub fn report(&self) -> Option<QuizReport> {
        if self.phase() != QuizPhase::Finished {
            return None;
        }
        Some(QuizReport::build(&self.questions, |q| {
            self.state.answers.get(&q.id)
        }))
    }

    fn question_at(&self, index: usize) -> QuizResult<&QuizQuestion> {
        self.questions
            .get(index)
            .ok_or(QuizError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            })
    }

    fn current_question(&self) -> QuizResult<&QuizQuestion> {
        self.current().ok_or(QuizError::NoCurrentQuestion)
    }
}

fn wrong_kind(question: &QuizQuestion, expected: &'static str) -> QuizError {
    QuizError::WrongQuestionKind {
        id: question.id.clone(),
        expected,
        actual: question.kind.label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::quiz::render;
    use crate::retrieval::RetrievedData;
    use pretty_assertions::assert_eq;

    fn session() -> QuizSession {
        QuizSession::new(render(&RetrievedData::default(), "Stacks"))
    }

    /// Answer every question correctly and advance to the results.
    fn finish_perfectly(quiz: &mut QuizSession) {
        for (answer, is_text) in [
            (0, false),
            (1, false),
            (1, false),
            (2, false),
            (1, false),
            (0, true),
        ] {
            if is_text {
                assert_eq!(quiz.input_short_answer("It returns false").unwrap(), true);
                assert_eq!(quiz.submit_short_answer().unwrap(), true);
            } else {
                assert_eq!(quiz.select_option(answer).unwrap(), true);
            }
            assert!(quiz.next());
        }
    }

    #[test]
    fn test_initial_state() {
        let quiz = session();
        assert_eq!(quiz.phase(), QuizPhase::Answering);
        assert_eq!(quiz.current_index(), 0);
        assert_eq!(quiz.state(), &QuizState::default());
        assert!(quiz.report().is_none());
        assert!(!quiz.can_go_next());
        assert!(!quiz.can_go_previous());
    }

    #[test]
    fn test_select_option_submits_and_locks() {
        let mut quiz = session();
        assert_eq!(quiz.question_status(0).unwrap(), QuestionStatus::Unanswered);

        assert_eq!(quiz.select_option(2).unwrap(), true);
        assert_eq!(quiz.question_status(0).unwrap(), QuestionStatus::Submitted);
        assert_eq!(quiz.answer("1"), Some(&Answer::Choice(2)));

        // Locked after submission
        assert_eq!(quiz.select_option(0).unwrap(), false);
        assert_eq!(quiz.answer("1"), Some(&Answer::Choice(2)));
    }

    #[test]
    fn test_select_option_errors() {
        let mut quiz = session();
        assert_eq!(
            quiz.select_option(4),
            Err(QuizError::OptionOutOfRange { index: 4, len: 4 })
        );

        quiz.jump_to(5).unwrap();
        assert!(matches!(
            quiz.select_option(0),
            Err(QuizError::WrongQuestionKind { .. })
        ));
    }

    #[test]
    fn test_next_disabled_until_submitted() {
        let mut quiz = session();
        assert!(!quiz.next());
        assert_eq!(quiz.current_index(), 0);

        quiz.select_option(1).unwrap();
        assert!(quiz.next());
        assert_eq!(quiz.current_index(), 1);
        assert!(!quiz.next());
    }

    #[test]
    fn test_jump_always_allowed() {
        let mut quiz = session();
        quiz.jump_to(4).unwrap();
        assert_eq!(quiz.current_index(), 4);
        quiz.jump_to(0).unwrap();
        assert_eq!(quiz.current_index(), 0);

        assert_eq!(
            quiz.jump_to(6),
            Err(QuizError::QuestionOutOfRange { index: 6, len: 6 })
        );
        assert_eq!(quiz.current_index(), 0);
    }

    #[test]
    fn test_previous_floors_at_zero() {
        let mut quiz = session();
        assert!(!quiz.previous());
        assert_eq!(quiz.current_index(), 0);

        quiz.jump_to(2).unwrap();
        assert!(quiz.previous());
        assert_eq!(quiz.current_index(), 1);
    }

    #[test]
    fn test_short_answer_flow() {
        let mut quiz = session();
        quiz.jump_to(5).unwrap();

        // Empty answer cannot be submitted
        assert_eq!(quiz.submit_short_answer().unwrap(), false);
        quiz.input_short_answer("").unwrap();
        assert_eq!(quiz.submit_short_answer().unwrap(), false);
        assert_eq!(quiz.question_status(5).unwrap(), QuestionStatus::Answered);

        quiz.input_short_answer("returns false").unwrap();
        assert_eq!(quiz.submit_short_answer().unwrap(), true);
        assert_eq!(quiz.question_status(5).unwrap(), QuestionStatus::Submitted);

        // Locked after submission
        assert_eq!(quiz.input_short_answer("true").unwrap(), false);
        assert_eq!(quiz.answer("6"), Some(&Answer::Text("returns false".to_string())));
    }

    #[test]
    fn test_short_answer_rejects_option_question() {
        let mut quiz = session();
        assert!(matches!(
            quiz.input_short_answer("x"),
            Err(QuizError::WrongQuestionKind { .. })
        ));
    }

    #[test]
    fn test_finish_and_report() {
        let mut quiz = session();
        finish_perfectly(&mut quiz);

        assert_eq!(quiz.phase(), QuizPhase::Finished);
        let report = quiz.report().unwrap();
        assert_eq!(report.score, 6);
        assert_eq!(report.total, 6);
        assert_eq!(report.percentage, 100);
        assert_eq!(report.feedback, Feedback::Excellent);
        assert_eq!(quiz.score(), Some(6));

        // Finished quiz ignores further answering and navigation
        assert_eq!(quiz.select_option(0).unwrap(), false);
        assert!(!quiz.next());
        assert!(!quiz.previous());
    }

    #[test]
    fn test_report_partial_score() {
        let mut quiz = session();
        quiz.select_option(3).unwrap(); // wrong
        assert!(quiz.next());
        quiz.select_option(1).unwrap(); // right
        assert!(quiz.next());
        quiz.select_option(0).unwrap(); // wrong
        assert!(quiz.next());
        quiz.select_option(2).unwrap(); // right
        assert!(quiz.next());
        quiz.select_option(1).unwrap(); // right
        assert!(quiz.next());
        quiz.input_short_answer("true").unwrap(); // wrong
        quiz.submit_short_answer().unwrap();
        assert!(quiz.next());

        let report = quiz.report().unwrap();
        assert_eq!(report.score, 3);
        assert_eq!(report.percentage, 50);
        assert_eq!(report.feedback, Feedback::KeepStudying);
        assert_eq!(
            report.review.iter().map(|r| r.correct).collect::<Vec<_>>(),
            vec![false, true, false, true, true, false]
        );
    }

    #[test]
    fn test_reset_equals_initial_state() {
        let mut quiz = session();
        finish_perfectly(&mut quiz);
        quiz.reset();

        assert_eq!(quiz.state(), session().state());
        assert_eq!(quiz.phase(), QuizPhase::Answering);
        assert_eq!(quiz.question_status(0).unwrap(), QuestionStatus::Unanswered);
    }

    #[test]
    fn test_empty_quiz() {
        let mut quiz = QuizSession::new(Vec::new());
        assert!(quiz.is_empty());
        assert!(quiz.current().is_none());
        assert!(!quiz.next());
        assert_eq!(quiz.select_option(0), Err(QuizError::NoCurrentQuestion));
        assert!(quiz.jump_to(0).is_err());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let mut quiz = session();
        quiz.select_option(0).unwrap();
        let json = serde_json::to_value(quiz.state()).unwrap();
        assert_eq!(json["currentQuestion"], 0);
        assert_eq!(json["answers"]["1"], 0);
        assert_eq!(json["submitted"]["1"], true);
        assert_eq!(json["showResults"], false);
    }
}
