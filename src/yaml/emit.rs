//! Renders a plain value tree back to YAML text.
//!
//! The output is deliberately narrow: two-space indentation, no line
//! wrapping, block literals for multi-line strings, and failsafe scalar
//! handling (no scalar is quoted just because it looks like a number or a
//! boolean). With sorted keys the output is byte-stable for a given tree
//! regardless of insertion order.

use std::fmt::Write;

use super::value::Value;

/// Options for [`emit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Sort mapping keys lexically instead of keeping insertion order.
    pub sort_keys: bool,
    /// Quote with JSON-compatible double-quoted escaping. When unset,
    /// single quotes are preferred for scalars that need quoting but
    /// contain no control characters.
    pub double_quoted_as_json: bool,
}

/// Renders `value` as a YAML document. An empty mapping renders as `{}`
/// plus a trailing newline.
pub fn emit(value: &Value, options: &EmitOptions) -> String {
    let mut out = String::new();
    match value {
        Value::Mapping(entries) if entries.is_empty() => out.push_str("{}\n"),
        Value::Sequence(items) if items.is_empty() => out.push_str("[]\n"),
        Value::Mapping(entries) => emit_mapping(entries, 0, options, &mut out),
        Value::Sequence(items) => emit_sequence(items, 0, options, &mut out),
        Value::String(s) if can_block(s) => {
            out.push_str(&block_scalar(s, 0));
        }
        scalar => {
            let repr = scalar_repr(scalar, options);
            out.push_str(&repr);
            out.push('\n');
        }
    }
    out
}

fn emit_mapping(entries: &[(String, Value)], indent: usize, options: &EmitOptions, out: &mut String) {
    let mut ordered: Vec<&(String, Value)> = entries.iter().collect();
    if options.sort_keys {
        ordered.sort_by(|a, b| a.0.cmp(&b.0));
    }
    let pad = " ".repeat(indent);
    for (key, value) in ordered {
        out.push_str(&pad);
        out.push_str(&key_repr(key, options));
        out.push(':');
        match value {
            Value::Mapping(nested) if nested.is_empty() => out.push_str(" {}\n"),
            Value::Mapping(nested) => {
                out.push('\n');
                emit_mapping(nested, indent + 2, options, out);
            }
            Value::Sequence(items) if items.is_empty() => out.push_str(" []\n"),
            Value::Sequence(items) => {
                out.push('\n');
                emit_sequence(items, indent + 2, options, out);
            }
            Value::String(s) if can_block(s) => {
                out.push(' ');
                out.push_str(&block_scalar(s, indent));
            }
            scalar => {
                let repr = scalar_repr(scalar, options);
                if !repr.is_empty() {
                    out.push(' ');
                    out.push_str(&repr);
                }
                out.push('\n');
            }
        }
    }
}

fn emit_sequence(items: &[Value], indent: usize, options: &EmitOptions, out: &mut String) {
    let pad = " ".repeat(indent);
    for item in items {
        out.push_str(&pad);
        out.push('-');
        match item {
            Value::Mapping(nested) if nested.is_empty() => out.push_str(" {}\n"),
            Value::Mapping(nested) => {
                out.push('\n');
                emit_mapping(nested, indent + 2, options, out);
            }
            Value::Sequence(nested) if nested.is_empty() => out.push_str(" []\n"),
            Value::Sequence(nested) => {
                out.push('\n');
                emit_sequence(nested, indent + 2, options, out);
            }
            Value::String(s) if can_block(s) => {
                out.push(' ');
                out.push_str(&block_scalar(s, indent));
            }
            scalar => {
                let repr = scalar_repr(scalar, options);
                if !repr.is_empty() {
                    out.push(' ');
                    out.push_str(&repr);
                }
                out.push('\n');
            }
        }
    }
}

/// A multi-line string renders as a block literal when its body survives
/// the trip: at least one non-newline character and no other controls.
fn can_block(s: &str) -> bool {
    s.contains('\n')
        && !s.trim_end_matches('\n').is_empty()
        && !s.chars().any(|c| c.is_control() && c != '\n')
}

/// Renders a literal block scalar: header plus indented body lines. The
/// chomping indicator preserves the exact count of trailing newlines.
fn block_scalar(s: &str, indent: usize) -> String {
    let body = s.trim_end_matches('\n');
    let trailing = s.len() - body.len();
    let mut out = String::from("|");
    if body.lines().next().is_some_and(|line| line.starts_with(' ')) {
        out.push('2');
    }
    match trailing {
        0 => out.push('-'),
        1 => {}
        _ => out.push('+'),
    }
    out.push('\n');
    let pad = " ".repeat(indent + 2);
    for line in body.lines() {
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
    for _ in 1..trailing {
        out.push('\n');
    }
    out
}

fn key_repr(key: &str, options: &EmitOptions) -> String {
    if needs_quote(key) {
        quote(key, options)
    } else {
        key.to_string()
    }
}

fn scalar_repr(value: &Value, options: &EmitOptions) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if needs_quote(s) {
                quote(s, options)
            } else {
                s.clone()
            }
        }
        Value::Sequence(_) | Value::Mapping(_) => String::new(),
    }
}

fn needs_quote(s: &str) -> bool {
    if s.is_empty() || s.starts_with(' ') || s.ends_with(' ') {
        return true;
    }
    if s.chars().any(char::is_control) {
        return true;
    }
    let first = s.as_bytes()[0];
    match first {
        b'!' | b'&' | b'*' | b'|' | b'>' | b'%' | b'@' | b'`' | b'"' | b'\'' | b'#' | b','
        | b'[' | b']' | b'{' | b'}' => return true,
        b'-' | b'?' | b':' => {
            if s.len() == 1 || s.as_bytes()[1] == b' ' {
                return true;
            }
        }
        _ => {}
    }
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return true;
    }
    s == "---" || s == "..." || s.starts_with("--- ") || s.starts_with("... ")
}

fn quote(s: &str, options: &EmitOptions) -> String {
    if options.double_quoted_as_json || s.chars().any(char::is_control) {
        json_quote(s)
    } else {
        format!("'{}'", s.replace('\'', "''"))
    }
}

fn json_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
