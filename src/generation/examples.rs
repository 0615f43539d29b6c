//! Worked examples template.

use crate::models::Example;
use crate::retrieval::RetrievedData;

/// Render the five worked examples.
///
/// Inputs and outputs are literal strings; the topic only appears in the
/// explanations.
pub fn render(_data: &RetrievedData, topic: &str) -> Vec<Example> {
    vec![
        Example::new(
            "Insert values: 5, 3, 7, 1, 9",
            "[5, 3, 7, 1, 9]",
            format!("Sequential insertion into {topic}. Each element is added to the structure maintaining its properties."),
        ),
        Example::new(
            "Search for value: 7",
            "Found at index: 2",
            "Linear search through the structure. Returns the position where the element is located.",
        ),
        Example::new(
            "Delete value: 3",
            "[5, 7, 1, 9]",
            "Removes the specified element and maintains structure integrity.",
        ),
        Example::new(
            "Insert values: 100, 50, 150, 25, 75",
            "[100, 50, 150, 25, 75]",
            format!("Building a {topic} with a specific pattern. Note the order of insertion affects the final structure."),
        ),
        Example::new(
            "Check if empty after clearing",
            "true",
            "After removing all elements, the isEmpty() check returns true.",
        ),
    ]
}
