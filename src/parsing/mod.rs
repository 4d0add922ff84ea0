//! Stub source parsing.
//!
//! Wraps tree-sitter-python: stubs are plain Python syntax, so the same grammar
//! handles `.pyi` files.
//!
//! # Example
//!
//! ```ignore
//! use stubscan::parsing::parse_stub;
//! use std::path::Path;
//!
//! let tree = parse_stub(Path::new("radio.pyi"), "def on() -> None: ...\n")?;
//! assert_eq!(tree.root_node().kind(), "module");
//! ```

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::error::{Result, StubscanError};

/// Parse stub source into a syntax tree.
///
/// # Errors
///
/// Returns `StubscanError::ParseFailure` if:
/// - The grammar cannot be loaded
/// - The parser gives up on the source
/// - The tree contains syntax errors (stubs are expected to be valid Python)
pub fn parse_stub(file_path: &Path, source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| StubscanError::ParseFailure {
            path: file_path.to_path_buf(),
            message: format!("Failed to load Python grammar: {:?}", e),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| StubscanError::ParseFailure {
            path: file_path.to_path_buf(),
            message: "parser returned no tree".to_string(),
        })?;

    if tree.root_node().has_error() {
        let line = first_error_line(tree.root_node()).unwrap_or(0);
        return Err(StubscanError::ParseFailure {
            path: file_path.to_path_buf(),
            message: format!("syntax error near line {}", line),
        });
    }

    Ok(tree)
}

/// 1-indexed line of the first error or missing node
fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_line)
}

/// Get text content of a node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}
