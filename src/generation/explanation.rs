//! Plain-language explanation template.

use crate::retrieval::RetrievedData;

/// Render a Markdown explanation.
///
/// Retrieved explanation paragraphs open the document, followed by a fixed
/// analogy / takeaways / misconceptions scaffold.
pub fn render(data: &RetrievedData, topic: &str) -> String {
    let paragraphs = data.explanations.join("\n\n");

    format!(
        "## Understanding {topic} in Simple Terms

{paragraphs}

### Why is this important?

Imagine you're organizing a library. You wouldn't just throw books randomly on shelves - you'd organize them so anyone can find what they need quickly. That's essentially what {topic} helps us do with data in computers.

### Real-World Analogy

Think of {topic} like a well-organized filing cabinet:
- Each drawer represents a category
- Files within are sorted for quick access
- You can find any document without searching through everything

### Key Takeaways

1. **Efficiency**: Operations complete faster with proper implementation
2. **Scalability**: Handles growing data volumes gracefully
3. **Reliability**: Consistent performance across different scenarios

### When to Use It

{topic} is particularly useful when:
- You need fast data access
- Memory efficiency is important
- The data has specific patterns or requirements

### Common Misconceptions

Many beginners think {topic} is always the best choice. However, the right approach depends on your specific use case. Always consider:
- The size of your data
- Types of operations needed
- Trade-offs between time and space"
    )
}
