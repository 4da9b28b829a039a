//! Human-readable descriptions of call arguments
//!
//! Used to key dynamic data resources. Reconstruction of formatted strings is
//! lossy: each interpolated expression becomes a bracketed placeholder.

use tree_sitter::Node;

use crate::parser::node_text;

pub const CALL_RESULT: &str = "<CALL_RESULT>";
pub const DYNAMIC_PART: &str = "<DYNAMIC_PART>";
pub const COMPLEX_EXPR: &str = "<COMPLEX_EXPR>";
pub const DYNAMIC_ARGUMENT: &str = "<DYNAMIC_ARGUMENT>";

/// Placeholder for a bare name: `<NAME>` in upper case.
pub fn name_placeholder(name: &str) -> String {
    format!("<{}>", name.to_uppercase())
}

/// Value of a string literal with no interpolation, including implicit
/// concatenation of adjacent literals.
pub fn literal_string(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => {
            let parts = StringParts::read(node, source);
            (!parts.formatted).then_some(parts.text)
        }
        "concatenated_string" => {
            let mut value = String::new();
            let mut cursor = node.walk();
            for piece in node.named_children(&mut cursor) {
                value.push_str(&literal_string(piece, source)?);
            }
            Some(value)
        }
        _ => None,
    }
}

/// Describe a call's first positional argument.
pub fn describe_argument(node: Option<Node<'_>>, source: &[u8]) -> String {
    let Some(node) = node else {
        return DYNAMIC_ARGUMENT.to_string();
    };
    match node.kind() {
        "string" => StringParts::read(node, source).text,
        "concatenated_string" => {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .map(|piece| describe_argument(Some(piece), source))
                .collect()
        }
        "identifier" => name_placeholder(node_text(node, source)),
        _ => DYNAMIC_ARGUMENT.to_string(),
    }
}

/// The pieces of one `string` node.
struct StringParts {
    formatted: bool,
    text: String,
}

impl StringParts {
    fn read(node: Node<'_>, source: &[u8]) -> Self {
        let mut formatted = false;
        let mut raw = false;
        let mut text = String::new();
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            match child.kind() {
                "string_start" => {
                    let prefix = node_text(child, source).to_ascii_lowercase();
                    formatted = prefix.contains('f');
                    raw = prefix.contains('r');
                }
                "string_content" => {
                    let content = node_text(child, source);
                    let content = if raw { content.to_string() } else { unescape(content) };
                    if formatted {
                        text.push_str(&content.replace("{{", "{").replace("}}", "}"));
                    } else {
                        text.push_str(&content);
                    }
                }
                "interpolation" => text.push_str(&interpolation_placeholder(child, source)),
                "string_end" => {}
                _ if child.is_named() => text.push_str(COMPLEX_EXPR),
                _ => {}
            }
        }

        StringParts { formatted, text }
    }
}

fn interpolation_placeholder(node: Node<'_>, source: &[u8]) -> String {
    let expression = node
        .child_by_field_name("expression")
        .or_else(|| node.named_child(0));
    match expression {
        Some(expr) if expr.kind() == "identifier" => name_placeholder(node_text(expr, source)),
        Some(expr) if expr.kind() == "call" => CALL_RESULT.to_string(),
        Some(_) => DYNAMIC_PART.to_string(),
        None => COMPLEX_EXPR.to_string(),
    }
}

/// Resolve the common backslash escapes; anything else is kept verbatim.
fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
