//! Best-effort textual rendering of annotations, default values and docstrings
//!
//! Every function here returns `Result<_, RecoverableError>`; callers log the
//! error and leave the corresponding field absent.

use tree_sitter::Node;

use crate::error::RecoverableError;
use crate::parsing::node_text;

/// Text used for a default value that is not a literal
pub const NON_LITERAL_DEFAULT: &str = "...";

// ============================================================================
// Annotations
// ============================================================================

/// Render a type annotation the way an unparser would: tokens re-joined with
/// canonical spacing, independent of the source layout.
pub fn render_annotation(node: &Node, source: &str) -> Result<String, RecoverableError> {
    if node.has_error() {
        return Err(RecoverableError::Annotation {
            text: node_text(node, source).to_string(),
            reason: "syntax error in annotation".to_string(),
        });
    }

    let mut tokens = Vec::new();
    collect_tokens(node, source, &mut tokens);
    if tokens.is_empty() {
        return Err(RecoverableError::Annotation {
            text: node_text(node, source).to_string(),
            reason: "empty annotation".to_string(),
        });
    }
    Ok(join_tokens(&tokens))
}

fn collect_tokens<'a>(node: &Node, source: &'a str, out: &mut Vec<&'a str>) {
    match node.kind() {
        "comment" | "line_continuation" => {}
        "string" | "concatenated_string" => out.push(node_text(node, source)),
        _ if node.child_count() == 0 => {
            let text = node_text(node, source);
            if !text.trim().is_empty() {
                out.push(text);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_tokens(&child, source, out);
            }
        }
    }
}

fn join_tokens(tokens: &[&str]) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;
    let mut unary_sign = false;

    for (i, token) in tokens.iter().enumerate() {
        if let Some(p) = prev {
            if !unary_sign && needs_space(p, token) {
                out.push(' ');
            }
        }
        // A sign directly after an opener or separator binds to its operand
        unary_sign = (*token == "-" || *token == "+")
            && (i == 0 || matches!(prev, Some("(" | "[" | "{" | "," | ":" | "|" | "=")));
        out.push_str(token);
        prev = Some(token);
    }
    out
}

fn needs_space(prev: &str, next: &str) -> bool {
    if matches!(prev, "(" | "[" | "{" | "." | "**") {
        return false;
    }
    if matches!(next, ")" | "]" | "}" | "," | "." | ":") {
        return false;
    }
    if matches!(next, "(" | "[") {
        let prev_is_operand = prev
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == ')' || c == ']' || c == '\'' || c == '"');
        return !prev_is_operand;
    }
    true
}

// ============================================================================
// Default values
// ============================================================================

/// Render a default value expression.
///
/// Literals are rendered as Python would print them (strings re-quoted,
/// integers in decimal); names and dotted names are kept as written; any
/// other expression, including the stub placeholder `...`, renders as
/// [`NON_LITERAL_DEFAULT`].
pub fn render_default(node: &Node, source: &str) -> Result<String, RecoverableError> {
    if node.has_error() {
        return Err(RecoverableError::DefaultValue {
            text: node_text(node, source).to_string(),
            reason: "syntax error in default value".to_string(),
        });
    }
    if let Some(literal) = render_literal(node, source)? {
        return Ok(literal);
    }
    match node.kind() {
        "identifier" | "attribute" => Ok(node_text(node, source).to_string()),
        _ => Ok(NON_LITERAL_DEFAULT.to_string()),
    }
}

/// `Ok(None)` means "not a literal"; `Err` means "a literal we failed to decode"
fn render_literal(node: &Node, source: &str) -> Result<Option<String>, RecoverableError> {
    let text = node_text(node, source);
    let rendered = match node.kind() {
        "true" => "True".to_string(),
        "false" => "False".to_string(),
        "none" => "None".to_string(),
        "integer" => render_integer(text),
        "float" => text.replace('_', ""),
        "string" | "concatenated_string" => {
            let value = decode_string_node(node, source).map_err(|reason| {
                RecoverableError::DefaultValue {
                    text: text.to_string(),
                    reason,
                }
            })?;
            python_repr(&value)
        }
        "unary_operator" => {
            let operand = match node.child_by_field_name("argument") {
                Some(operand) => operand,
                None => return Ok(None),
            };
            let operator = node
                .child_by_field_name("operator")
                .map(|op| node_text(&op, source))
                .unwrap_or("");
            if !matches!(operand.kind(), "integer" | "float") || !matches!(operator, "-" | "+") {
                return Ok(None);
            }
            match render_literal(&operand, source)? {
                Some(value) if operator == "-" => format!("-{}", value),
                Some(value) => value,
                None => return Ok(None),
            }
        }
        "parenthesized_expression" => {
            return match node.named_child(0) {
                Some(inner) => render_literal(&inner, source),
                None => Ok(None),
            };
        }
        "tuple" | "list" | "set" => {
            let mut items = Vec::new();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match render_literal(&child, source)? {
                    Some(item) => items.push(item),
                    None => return Ok(None),
                }
            }
            match node.kind() {
                "tuple" if items.len() == 1 => format!("({},)", items[0]),
                "tuple" => format!("({})", items.join(", ")),
                "list" => format!("[{}]", items.join(", ")),
                _ => format!("{{{}}}", items.join(", ")),
            }
        }
        "dictionary" => {
            let mut items = Vec::new();
            let mut cursor = node.walk();
            for pair in node.named_children(&mut cursor) {
                if pair.kind() != "pair" {
                    return Ok(None);
                }
                let (Some(key), Some(value)) = (
                    pair.child_by_field_name("key"),
                    pair.child_by_field_name("value"),
                ) else {
                    return Ok(None);
                };
                match (render_literal(&key, source)?, render_literal(&value, source)?) {
                    (Some(k), Some(v)) => items.push(format!("{}: {}", k, v)),
                    _ => return Ok(None),
                }
            }
            format!("{{{}}}", items.join(", "))
        }
        _ => return Ok(None),
    };
    Ok(Some(rendered))
}

fn render_integer(text: &str) -> String {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        i128::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i128::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i128::from_str_radix(bin, 2).ok()
    } else {
        lower.parse::<i128>().ok()
    };
    parsed.map(|v| v.to_string()).unwrap_or(digits)
}

/// Quote a string the way Python's `repr` does
pub fn python_repr(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

// ============================================================================
// String literals and docstrings
// ============================================================================

/// Decode a `string` or `concatenated_string` node to its runtime value
pub fn decode_string_node(node: &Node, source: &str) -> Result<String, String> {
    if node.kind() == "concatenated_string" {
        let mut value = String::new();
        let mut cursor = node.walk();
        for part in node.named_children(&mut cursor) {
            value.push_str(&decode_string_literal(node_text(&part, source))?);
        }
        return Ok(value);
    }
    decode_string_literal(node_text(node, source))
}

/// Decode a single Python string literal, including prefix and quotes
pub fn decode_string_literal(literal: &str) -> Result<String, String> {
    let prefix_len = literal
        .find(|c| c == '"' || c == '\'')
        .ok_or_else(|| format!("not a string literal: {}", literal))?;
    let prefix = literal[..prefix_len].to_ascii_lowercase();
    if prefix.contains('f') {
        return Err("formatted string literals are not constant".to_string());
    }
    let raw = prefix.contains('r');
    let body = &literal[prefix_len..];

    let inner = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|q| {
            body.strip_prefix(q)
                .and_then(|rest| rest.strip_suffix(q))
                .filter(|_| body.len() >= q.len() * 2)
        })
        .ok_or_else(|| format!("unterminated string literal: {}", literal))?;

    if raw {
        Ok(inner.to_string())
    } else {
        Ok(unescape(inner))
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(code));
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = (0..width).filter_map(|_| chars.next()).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == width => out.push(decoded),
                    _ => {
                        out.push('\\');
                        out.push(next);
                        out.push_str(&hex);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Extract the docstring of a `module` or `block` node
pub fn docstring(body: &Node, source: &str) -> Option<Result<String, RecoverableError>> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let literal = first.named_child(0)?;
    if !matches!(literal.kind(), "string" | "concatenated_string") {
        return None;
    }
    Some(
        decode_string_node(&literal, source)
            .map(|raw| clean_doc(&raw))
            .map_err(|reason| RecoverableError::Docstring { reason }),
    )
}

/// Clean up docstring indentation (the `inspect.cleandoc` rules):
/// leading whitespace of the first line is removed, the common indentation of
/// the remaining lines is removed, and blank lines at both ends are dropped.
pub fn clean_doc(doc: &str) -> String {
    let expanded: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = expanded
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut lines: Vec<&str> = Vec::with_capacity(expanded.len());
    for (i, line) in expanded.iter().enumerate() {
        if i == 0 {
            lines.push(line.trim_start());
        } else if line.len() >= margin && line.is_char_boundary(margin) {
            lines.push(&line[margin..]);
        } else {
            lines.push(line.trim_start());
        }
    }

    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = 8 - column % 8;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}
