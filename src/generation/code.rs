//! Code sample templates.
//!
//! Each language gets a class named after the topic with insert, search,
//! delete and display over a plain list, followed by a runnable example.
//! Placeholders are substituted textually so the templates can keep the
//! braces of the target languages as written.

use super::to_pascal_case;
use crate::models::CodeSamples;
use crate::retrieval::RetrievedData;

const TOPIC: &str = "{{TOPIC}}";
const CLASS: &str = "{{CLASS}}";
const VAR: &str = "{{VAR}}";

const PYTHON_TEMPLATE: &str = r#""""
{{TOPIC}} Implementation in Python
================================
This module provides a comprehensive implementation
with examples and best practices.
"""

class {{CLASS}}:
    """
    A class implementing {{TOPIC}} with common operations.

    Attributes:
        data: The underlying data structure
        size: Current number of elements
    """

    def __init__(self):
        """Initialize an empty {{TOPIC}} instance."""
        self.data = []
        self.size = 0

    def insert(self, value):
        """
        Insert a new value.

        Args:
            value: The value to insert

        Time Complexity: O(1) average case
        """
        self.data.append(value)
        self.size += 1

    def search(self, value):
        """
        Search for a value.

        Args:
            value: The value to find

        Returns:
            int: Index if found, -1 otherwise
        """
        for i, item in enumerate(self.data):
            if item == value:
                return i
        return -1

    def delete(self, value):
        """
        Delete a value if it exists.

        Args:
            value: The value to remove

        Returns:
            bool: True if deleted, False otherwise
        """
        try:
            self.data.remove(value)
            self.size -= 1
            return True
        except ValueError:
            return False

    def display(self):
        """Print all elements."""
        print(f"{{TOPIC}}: {self.data}")


# Example usage
if __name__ == "__main__":
    {{VAR}} = {{CLASS}}()

    # Insert elements
    {{VAR}}.insert(10)
    {{VAR}}.insert(20)
    {{VAR}}.insert(30)

    # Display
    {{VAR}}.display()

    # Search
    result = {{VAR}}.search(20)
    print(f"Found at index: {result}")

    # Delete
    {{VAR}}.delete(20)
    {{VAR}}.display()"#;

const JAVA_TEMPLATE: &str = r#"/**
 * {{TOPIC}} Implementation in Java
 * ================================
 * A comprehensive implementation with
 * proper documentation and examples.
 */

import java.util.ArrayList;
import java.util.List;

public class {{CLASS}} {
    private List<Integer> data;
    private int size;

    /**
     * Initialize an empty {{TOPIC}} instance.
     */
    public {{CLASS}}() {
        this.data = new ArrayList<>();
        this.size = 0;
    }

    /**
     * Insert a new value.
     * Time Complexity: O(1) amortized
     *
     * @param value The value to insert
     */
    public void insert(int value) {
        data.add(value);
        size++;
    }

    /**
     * Search for a value in the structure.
     * Time Complexity: O(n)
     *
     * @param value The value to find
     * @return Index if found, -1 otherwise
     */
    public int search(int value) {
        for (int i = 0; i < data.size(); i++) {
            if (data.get(i) == value) {
                return i;
            }
        }
        return -1;
    }

    /**
     * Delete a value if it exists.
     *
     * @param value The value to remove
     * @return true if deleted, false otherwise
     */
    public boolean delete(int value) {
        return data.remove(Integer.valueOf(value));
    }

    /**
     * Display all elements.
     */
    public void display() {
        System.out.println("{{TOPIC}}: " + data);
    }

    /**
     * Get current size.
     * @return Number of elements
     */
    public int getSize() {
        return size;
    }

    // Example usage
    public static void main(String[] args) {
        {{CLASS}} instance = new {{CLASS}}();

        // Insert elements
        instance.insert(10);
        instance.insert(20);
        instance.insert(30);

        // Display
        instance.display();

        // Search
        int result = instance.search(20);
        System.out.println("Found at index: " + result);

        // Delete
        instance.delete(20);
        instance.display();
    }
}"#;

const JAVASCRIPT_TEMPLATE: &str = r#"/**
 * {{TOPIC}} Implementation in JavaScript
 * =====================================
 * Modern ES6+ implementation with
 * comprehensive documentation.
 */

class {{CLASS}} {
  /**
   * Initialize an empty {{TOPIC}} instance.
   */
  constructor() {
    this.data = [];
    this.size = 0;
  }

  /**
   * Insert a new value.
   * Time Complexity: O(1)
   *
   * @param {*} value - The value to insert
   */
  insert(value) {
    this.data.push(value);
    this.size++;
  }

  /**
   * Search for a value.
   * Time Complexity: O(n)
   *
   * @param {*} value - The value to find
   * @returns {number} Index if found, -1 otherwise
   */
  search(value) {
    return this.data.findIndex(item => item === value);
  }

  /**
   * Delete a value if it exists.
   *
   * @param {*} value - The value to remove
   * @returns {boolean} True if deleted
   */
  delete(value) {
    const index = this.search(value);
    if (index !== -1) {
      this.data.splice(index, 1);
      this.size--;
      return true;
    }
    return false;
  }

  /**
   * Display all elements.
   */
  display() {
    console.log(`{{TOPIC}}: [${this.data.join(', ')}]`);
  }

  /**
   * Check if empty.
   * @returns {boolean}
   */
  isEmpty() {
    return this.size === 0;
  }

  /**
   * Get all elements as array.
   * @returns {Array}
   */
  toArray() {
    return [...this.data];
  }
}

// Example usage
const instance = new {{CLASS}}();

// Insert elements
instance.insert(10);
instance.insert(20);
instance.insert(30);

// Display
instance.display();

// Search
const result = instance.search(20);
console.log(`Found at index: ${result}`);

// Delete
instance.delete(20);
instance.display();

// Export for module usage
export default {{CLASS}};"#;

/// Render code samples for all three languages.
///
/// The retrieved snippet stubs are not used by the templates.
pub fn render(_data: &RetrievedData, topic: &str) -> CodeSamples {
    let class_name = to_pascal_case(topic);
    let variable = variable_name(topic);

    let fill = |template: &str| {
        template
            .replace(CLASS, &class_name)
            .replace(VAR, &variable)
            .replace(TOPIC, topic)
    };

    CodeSamples {
        python: fill(PYTHON_TEMPLATE),
        java: fill(JAVA_TEMPLATE),
        javascript: fill(JAVASCRIPT_TEMPLATE),
    }
}

/// Lower-cased topic with every whitespace run replaced by `_`.
fn variable_name(topic: &str) -> String {
    let lower = topic.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut in_space = false;

    for c in lower.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_name() {
        assert_eq!(variable_name("Binary  Search\tTrees"), "binary_search_trees");
        assert_eq!(variable_name("quick-sort"), "quick-sort");
    }

    #[test]
    fn test_class_named_after_topic_in_every_language() {
        let code = render(&RetrievedData::default(), "binary search trees");

        assert!(code.python.contains("class BinarySearchTrees:"));
        assert!(code.python.contains("    binary_search_trees = BinarySearchTrees()"));
        assert!(code.java.contains("public class BinarySearchTrees {"));
        assert!(code.java.contains("BinarySearchTrees instance = new BinarySearchTrees();"));
        assert!(code.javascript.contains("class BinarySearchTrees {"));
        assert!(code.javascript.ends_with("export default BinarySearchTrees;"));
    }

    #[test]
    fn test_no_placeholders_left() {
        let code = render(&RetrievedData::default(), "Recursion");
        for source in [&code.python, &code.java, &code.javascript] {
            assert!(!source.contains("{{"));
            assert!(source.contains("def insert") || source.contains("insert("));
        }
        assert!(code.python.starts_with("\"\"\"\nRecursion Implementation in Python"));
        assert!(code.javascript.contains("console.log(`Recursion: [${this.data.join(', ')}]`);"));
    }
}
