//! Reading keyword arguments out of a `setup.py` script
//!
//! Only module-level expression statements that are calls are looked at, e.g.
//! `setup(name="demo", dependency_links=[...])`. Nothing is evaluated: a value is
//! either a list display whose string-literal elements are decoded, or an opaque
//! expression.

use crate::error::ParseFailure;
use tree_sitter::{Node, Parser};

/// Value passed for a keyword argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordValue {
    /// A list display; `None` marks an element that is not a string literal
    List(Vec<Option<String>>),
    /// Anything else (names, calls, comprehensions, ...)
    Expression,
}

/// Collect the values passed as `keyword=` to every top-level call.
pub fn top_level_call_keywords(
    source: &str,
    keyword: &str,
) -> Result<Vec<KeywordValue>, ParseFailure> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseFailure::Python(format!("Failed to set Python language: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseFailure::Python("Failed to parse Python source".to_string()))?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseFailure::Python(syntax_error_message(root)));
    }

    let src = source.as_bytes();
    let mut values = Vec::new();
    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        let Some(call) = statement.named_child(0).filter(|n| n.kind() == "call") else {
            continue;
        };
        let Some(arguments) = call.child_by_field_name("arguments") else {
            continue;
        };

        let mut arg_cursor = arguments.walk();
        for argument in arguments.named_children(&mut arg_cursor) {
            if argument.kind() != "keyword_argument" {
                continue;
            }
            let name = argument
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(src).ok());
            if name != Some(keyword) {
                continue;
            }
            if let Some(value) = argument.child_by_field_name("value") {
                values.push(keyword_value(value, src));
            }
        }
    }

    Ok(values)
}

fn keyword_value(node: Node, src: &[u8]) -> KeywordValue {
    let node = unparenthesize(node);
    if node.kind() != "list" {
        return KeywordValue::Expression;
    }

    let mut cursor = node.walk();
    let elements = node
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| literal_string(n, src))
        .collect();
    KeywordValue::List(elements)
}

fn unparenthesize(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Decode a string literal, or implicitly concatenated literals.
fn literal_string(node: Node, src: &[u8]) -> Option<String> {
    let node = unparenthesize(node);
    match node.kind() {
        "string" => decode_string(node.utf8_text(src).ok()?),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let mut out = String::new();
            for part in node.named_children(&mut cursor) {
                if part.kind() == "comment" {
                    continue;
                }
                out.push_str(&decode_string(part.utf8_text(src).ok()?)?);
            }
            Some(out)
        }
        _ => None,
    }
}

/// Decode the source text of a single string literal.
///
/// Byte strings and f-/t-strings are not plain string constants and yield `None`.
fn decode_string(text: &str) -> Option<String> {
    let quote_at = text.find(['\'', '"'])?;
    let prefix = text[..quote_at].to_ascii_lowercase();
    if prefix.contains(['b', 'f', 't']) {
        return None;
    }

    let body = &text[quote_at..];
    let width = if body.starts_with("\"\"\"") || body.starts_with("'''") {
        3
    } else {
        1
    };
    if body.len() < width * 2 {
        return None;
    }
    let inner = &body[width..body.len() - width];

    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
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
        match chars.next() {
            Some('\n') => {}
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(kind @ ('x' | 'u' | 'U')) => {
                let len = match kind {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = (0..len).filter_map(|_| chars.next()).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if digits.len() == len => out.push(decoded),
                    _ => {
                        out.push('\\');
                        out.push(kind);
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn syntax_error_message(root: Node) -> String {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            return format!(
                "invalid syntax at line {}, column {}",
                pos.row + 1,
                pos.column + 1
            );
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    "invalid syntax".to_string()
}
