//! All error types for the yamlres crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed YAML input. Parsing stops at the first offending line;
    /// no recovery is attempted.
    #[error("YAML syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Failure while reading or writing the JSON resource cache.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let error = Error::Syntax {
            line: 3,
            message: "bad indentation in mapping".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "YAML syntax error at line 3: bad indentation in mapping"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }
}
