//! Plain value tree lowered from the parse tree: maps, arrays, scalars,
//! booleans, numbers, and nulls, with no comment metadata. Mapping entries
//! keep document order.

use serde_json::Number;

use crate::error::Error;

use super::parser::{self, Node, ScalarStyle};

/// A plain YAML value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Vec<(String, Value)>),
}

/// Parses YAML text straight into a plain value tree.
pub fn parse_value(text: &str) -> Result<Value, Error> {
    Ok(Value::from_node(&parser::parse_tree(text)?))
}

impl Value {
    /// Lowers a parse-tree node, resolving plain scalars to their core
    /// types. Quoted and block scalars always stay strings.
    pub fn from_node(node: &Node) -> Value {
        match node {
            Node::Scalar(scalar) => match scalar.style {
                ScalarStyle::Plain => resolve_plain(&scalar.text),
                _ => Value::String(scalar.text.clone()),
            },
            Node::Sequence(sequence) => {
                Value::Sequence(sequence.items.iter().map(Value::from_node).collect())
            }
            Node::Mapping(mapping) => Value::Mapping(
                mapping
                    .pairs
                    .iter()
                    .map(|pair| (pair.key.text.clone(), Value::from_node(&pair.value)))
                    .collect(),
            ),
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    pub fn as_mapping(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The text form of a scalar value; `None` for collections. Null maps
    /// to the empty string, the same text an empty YAML scalar carries.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }
}

fn resolve_plain(text: &str) -> Value {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => Value::Null,
        "true" | "True" | "TRUE" => Value::Bool(true),
        "false" | "False" | "FALSE" => Value::Bool(false),
        _ => match parse_number(text) {
            Some(number) => Value::Number(number),
            None => Value::String(text.to_string()),
        },
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    if unsigned.is_empty() {
        return None;
    }
    // leading zeros make it a string, not a number
    if unsigned.len() > 1 && unsigned.starts_with('0') && !unsigned.starts_with("0.") {
        return None;
    }
    let first = unsigned.as_bytes()[0];
    if !first.is_ascii_digit() && first != b'.' {
        return None;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    if unsigned.contains(['.', 'e', 'E']) {
        if let Ok(float) = text.parse::<f64>() {
            return Number::from_f64(float);
        }
    }
    None
}
