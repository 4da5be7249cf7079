//! The markup layer: a comment-preserving YAML parse tree, a plain value
//! tree, and a deterministic renderer.
//!
//! The rest of the crate consumes exactly three entry points from here:
//! [`parse_tree`] for comment extraction, [`parse_value`] for resource
//! mapping, and [`emit`] for serialization.

pub mod emit;
pub mod parser;
pub mod value;

pub use emit::{EmitOptions, emit};
pub use parser::{MappingNode, Node, PairNode, ScalarNode, ScalarStyle, SequenceNode, parse_tree};
pub use value::{Value, parse_value};
