#![forbid(unsafe_code)]
//! Convert YAML files into flat localization resources and back.
//!
//! Deserializing walks the document tree and produces one resource per
//! leaf string or array, keyed by its dot-joined path (literal dots are
//! escaped), with comments from the YAML attached as translator's
//! comments. Serializing rebuilds the nested tree from the resource keys
//! and renders it with sorted keys, so output is reproducible regardless
//! of the order resources were added.
//!
//! # Quick Start
//!
//! ```rust
//! use yamlres::Document;
//!
//! let mut doc = Document::builder()
//!     .path_name("i18n/en.yml")
//!     .project("webapp")
//!     .build();
//! doc.deserialize("greeting: Hello\n")?;
//!
//! assert_eq!(doc.get_resources().len(), 1);
//! assert_eq!(doc.serialize(), "greeting: Hello\n");
//! # Ok::<(), yamlres::Error>(())
//! ```
//!
//! Linking a companion source document pairs each translated value with
//! its original:
//!
//! ```rust
//! use std::rc::Rc;
//! use yamlres::Document;
//!
//! let mut source = Document::builder().locale("en-US").build();
//! source.deserialize("jobs: Jobs\n")?;
//!
//! let mut target = Document::builder()
//!     .locale("nl-NL")
//!     .source_yaml(Rc::new(source))
//!     .build();
//! target.deserialize("jobs: Banen\n")?;
//!
//! let resource = target.get_resource("jobs").expect("mapped resource");
//! assert_eq!(resource.source.as_ref().and_then(|v| v.as_str()), Some("Jobs"));
//! assert_eq!(resource.target.as_ref().and_then(|v| v.as_str()), Some("Banen"));
//! # Ok::<(), yamlres::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod types;
pub mod yaml;

mod comments;
mod key;

// Re-export the types most callers need
pub use crate::{
    document::{DEFAULT_LOCALE, Document, DocumentBuilder, ResourceFilter},
    error::Error,
    types::{ResType, Resource, ResourceValue, TranslationSet},
    yaml::Value,
};
