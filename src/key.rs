//! Canonical key-path construction and decomposition.
//!
//! A key path joins mapping keys and sequence indices with `.`, escaping any
//! literal dot inside a segment as `\.`. The same routines are used by the
//! comment extractor, the resource mapper, and the serializer, so a path
//! built on the way in splits back into identical segments on the way out.

/// Appends `segment` to `prefix`, escaping literal dots in the segment.
pub(crate) fn normalize_key(prefix: Option<&str>, segment: &str) -> String {
    let escaped = segment.replace('.', "\\.");
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}.{escaped}"),
        _ => escaped,
    }
}

/// Splits a key path on unescaped dots. Escaped dots stay in their segment,
/// still escaped; use [`unescape_segment`] to recover the literal text.
pub(crate) fn split_key(key: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut prev_backslash = false;
    for c in key.chars() {
        if c == '.' && !prev_backslash {
            parts.push(std::mem::take(&mut current));
            prev_backslash = false;
        } else {
            prev_backslash = c == '\\';
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

/// Turns `\.` back into a literal dot within one path segment.
pub(crate) fn unescape_segment(segment: &str) -> String {
    segment.replace("\\.", ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_plain() {
        assert_eq!(normalize_key(None, "foo"), "foo");
        assert_eq!(normalize_key(Some("foo"), "bar"), "foo.bar");
        assert_eq!(normalize_key(Some("foo.bar"), "baz"), "foo.bar.baz");
    }

    #[test]
    fn test_normalize_key_escapes_dots() {
        assert_eq!(
            normalize_key(None, "x.en-US.html.haml"),
            "x\\.en-US\\.html\\.haml"
        );
        assert_eq!(
            normalize_key(Some("foo"), "a.b"),
            "foo.a\\.b"
        );
    }

    #[test]
    fn test_split_key_plain() {
        assert_eq!(split_key("foo.bar.baz"), vec!["foo", "bar", "baz"]);
        assert_eq!(split_key("foo"), vec!["foo"]);
        assert_eq!(split_key(""), vec![""]);
    }

    #[test]
    fn test_split_key_keeps_escaped_dots() {
        assert_eq!(
            split_key("x\\.en-US\\.html\\.haml.r9834724545"),
            vec!["x\\.en-US\\.html\\.haml", "r9834724545"]
        );
    }

    #[test]
    fn test_unescape_segment() {
        assert_eq!(unescape_segment("x\\.en-US\\.html\\.haml"), "x.en-US.html.haml");
        assert_eq!(unescape_segment("plain"), "plain");
    }

    #[test]
    fn test_escape_split_unescape_identity() {
        for segment in ["simple", "a.b", "x.en-US.html.haml", "trailing.", ".leading"] {
            let key = normalize_key(Some("prefix"), segment);
            let parts = split_key(&key);
            assert_eq!(parts.len(), 2);
            assert_eq!(unescape_segment(&parts[1]), segment);
        }
    }
}
