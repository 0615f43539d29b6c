//! Study notes template.

use super::capitalize_first;
use crate::retrieval::RetrievedData;

/// Render Markdown study notes.
///
/// The retrieved notes become the numbered "Key Concepts" list; every other
/// section is fixed text around the capitalized topic.
pub fn render(data: &RetrievedData, topic: &str) -> String {
    let title = capitalize_first(topic);
    let key_concepts = data
        .notes
        .iter()
        .enumerate()
        .map(|(i, note)| format!("{}. {}", i + 1, note))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# {title}

## Overview
{title} is a fundamental concept in computer science that plays a crucial role in efficient data processing and algorithm design.

## Key Concepts
{key_concepts}

## Important Points
- **Time Complexity**: Understanding the efficiency of operations
- **Space Complexity**: Memory usage considerations
- **Best Practices**: When and how to apply {title}

## Applications
- Software development and system design
- Database optimization
- Algorithm design and analysis
- Real-world problem solving

## Summary
Mastering {title} is essential for any programmer looking to write efficient and scalable code. The concepts covered here form the foundation for more advanced topics."
    )
}
