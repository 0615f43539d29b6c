//! Quiz template.

use crate::models::{CorrectAnswer, QuestionKind, QuizQuestion};
use crate::retrieval::RetrievedData;

fn options(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

fn true_false() -> Option<Vec<String>> {
    options(&["True", "False"])
}

/// Render the six quiz questions.
///
/// Answers are fixed; the topic is interpolated into the question and
/// explanation text only.
pub fn render(_data: &RetrievedData, topic: &str) -> Vec<QuizQuestion> {
    vec![
        QuizQuestion {
            id: "1".to_string(),
            kind: QuestionKind::Mcq,
            question: format!("What is the primary advantage of using {topic}?"),
            options: options(&[
                "Faster search operations",
                "Lower memory usage",
                "Simpler implementation",
                "Better code readability",
            ]),
            correct_answer: CorrectAnswer::Index(0),
            explanation: Some(format!(
                "{topic} is primarily designed to optimize search operations, making data retrieval more efficient."
            )),
        },
        QuizQuestion {
            id: "2".to_string(),
            kind: QuestionKind::Mcq,
            question: format!("Which operation has O(1) time complexity in {topic}?"),
            options: options(&["Search", "Insert (at end)", "Delete (from middle)", "Sort"]),
            correct_answer: CorrectAnswer::Index(1),
            explanation: Some(
                "Insertion at the end of the structure typically takes constant time O(1) as it doesn't require shifting elements."
                    .to_string(),
            ),
        },
        QuizQuestion {
            id: "3".to_string(),
            kind: QuestionKind::TrueFalse,
            question: format!("{topic} always maintains elements in sorted order."),
            options: true_false(),
            correct_answer: CorrectAnswer::Index(1),
            explanation: Some(format!(
                "This depends on the specific implementation. A basic {topic} doesn't guarantee sorted order unless specifically designed to do so."
            )),
        },
        QuizQuestion {
            id: "4".to_string(),
            kind: QuestionKind::Mcq,
            question: format!("What is the worst-case time complexity for searching in {topic}?"),
            options: options(&["O(1)", "O(log n)", "O(n)", "O(n²)"]),
            correct_answer: CorrectAnswer::Index(2),
            explanation: Some(
                "In the worst case, you may need to traverse all elements, resulting in O(n) time complexity.".to_string(),
            ),
        },
        QuizQuestion {
            id: "5".to_string(),
            kind: QuestionKind::TrueFalse,
            question: format!("{topic} is always the best choice for storing ordered data."),
            options: true_false(),
            correct_answer: CorrectAnswer::Index(1),
            explanation: Some(
                "The best data structure depends on your specific use case. Different structures excel at different operations."
                    .to_string(),
            ),
        },
        QuizQuestion {
            id: "6".to_string(),
            kind: QuestionKind::ShortAnswer,
            question: format!("What happens when you try to delete an element that doesn't exist in {topic}?"),
            options: None,
            correct_answer: CorrectAnswer::Text("returns false".to_string()),
            explanation: Some(
                "The delete operation typically returns false or throws an exception when the element is not found."
                    .to_string(),
            ),
        },
    ]
}
