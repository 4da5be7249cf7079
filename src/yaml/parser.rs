//! Comment-preserving parse tree for the YAML subset used by localization
//! files: block mappings and sequences, plain and quoted scalars, literal and
//! folded block scalars, one-line flow collections, and full-line comments.
//!
//! Comment runs attach to the next node that begins after them. When that
//! node is the first child of a block collection, the run attaches to the
//! collection node itself rather than the child — the same placement the
//! comment extractor compensates for when it threads a collection's comment
//! down to its first entry.

use crate::error::Error;

/// How a scalar was written in the source text.
///
/// Only plain scalars are resolved to booleans, numbers, or null when the
/// tree is lowered to a plain value tree; quoted and block scalars always
/// stay strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// A scalar node, either a mapping key or a leaf value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarNode {
    pub text: String,
    pub style: ScalarStyle,
    pub comment_before: Option<String>,
}

/// One `key: value` entry of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairNode {
    pub key: ScalarNode,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingNode {
    pub comment_before: Option<String>,
    pub pairs: Vec<PairNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceNode {
    pub comment_before: Option<String>,
    pub items: Vec<Node>,
}

/// A node of the parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(ScalarNode),
    Sequence(SequenceNode),
    Mapping(MappingNode),
}

impl Node {
    /// The comment attached immediately above this node, if any.
    pub fn comment_before(&self) -> Option<&str> {
        match self {
            Node::Scalar(scalar) => scalar.comment_before.as_deref(),
            Node::Sequence(sequence) => sequence.comment_before.as_deref(),
            Node::Mapping(mapping) => mapping.comment_before.as_deref(),
        }
    }

    fn set_comment_before(&mut self, comment: String) {
        let slot = match self {
            Node::Scalar(scalar) => &mut scalar.comment_before,
            Node::Sequence(sequence) => &mut sequence.comment_before,
            Node::Mapping(mapping) => &mut mapping.comment_before,
        };
        if slot.is_none() {
            *slot = Some(comment);
        }
    }

    fn null_scalar() -> Node {
        Node::Scalar(ScalarNode {
            text: String::new(),
            style: ScalarStyle::Plain,
            comment_before: None,
        })
    }
}

/// Parses YAML text into a comment-preserving parse tree.
///
/// An empty document parses to an empty mapping. Only the first document of
/// a multi-document stream is read.
pub fn parse_tree(text: &str) -> Result<Node, Error> {
    let mut parser = TreeParser::new(text);
    let node = parser.parse_root()?;
    if parser.peek_content()?.is_some() {
        return Err(parser.err("unexpected content after the document root"));
    }
    Ok(node)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomp {
    Clip,
    Strip,
    Keep,
}

struct TreeParser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    pending: Vec<String>,
    seen_content: bool,
}

impl<'a> TreeParser<'a> {
    fn new(text: &'a str) -> Self {
        TreeParser {
            lines: text.lines().collect(),
            pos: 0,
            pending: Vec::new(),
            seen_content: false,
        }
    }

    fn err(&self, message: &str) -> Error {
        Error::Syntax {
            line: (self.pos + 1).min(self.lines.len().max(1)),
            message: message.to_string(),
        }
    }

    fn indent_of(&self, line: &str) -> Result<usize, Error> {
        let trimmed = line.trim_start_matches(' ');
        if trimmed.starts_with('\t') {
            return Err(self.err("tab characters are not allowed in indentation"));
        }
        Ok(line.len() - trimmed.len())
    }

    /// Advances to the next content line without consuming it, eating blank
    /// lines, comment lines (collected into the pending run), and document
    /// markers along the way.
    fn peek_content(&mut self) -> Result<Option<(usize, &'a str)>, Error> {
        while self.pos < self.lines.len() {
            let raw = self.lines[self.pos];
            let stripped = raw.trim_start();
            let content = stripped.trim_end();
            if content.is_empty() {
                self.pos += 1;
                continue;
            }
            if let Some(comment) = content.strip_prefix('#') {
                self.pending.push(comment.to_string());
                self.pos += 1;
                continue;
            }
            if content == "---" {
                if self.seen_content {
                    // start of a second document; stop here
                    self.pos = self.lines.len();
                    return Ok(None);
                }
                self.pos += 1;
                continue;
            }
            if content == "..." {
                self.pos = self.lines.len();
                return Ok(None);
            }
            let indent = self.indent_of(raw)?;
            self.seen_content = true;
            return Ok(Some((indent, content)));
        }
        Ok(None)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn take_pending(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.drain(..).collect::<Vec<_>>().join("\n"))
        }
    }

    fn parse_root(&mut self) -> Result<Node, Error> {
        match self.peek_content()? {
            None => Ok(Node::Mapping(MappingNode {
                comment_before: self.take_pending(),
                pairs: Vec::new(),
            })),
            Some((indent, _)) => self.parse_block_node(indent),
        }
    }

    /// Parses whatever block construct begins at the current content line.
    fn parse_block_node(&mut self, indent: usize) -> Result<Node, Error> {
        let Some((_, line)) = self.peek_content()? else {
            return Ok(Node::null_scalar());
        };
        if is_sequence_entry(line) {
            return self.parse_block_sequence(indent);
        }
        if line.starts_with('[') || line.starts_with('{') {
            let comment = self.take_pending();
            self.advance();
            let mut node = self.parse_flow_line(line)?;
            if let Some(comment) = comment {
                node.set_comment_before(comment);
            }
            return Ok(node);
        }
        if line.starts_with('|') || line.starts_with('>') {
            let comment = self.take_pending();
            self.advance();
            let parent = indent as isize - 1;
            let mut node = self.parse_block_scalar(parent, line)?;
            if let Some(comment) = comment {
                node.set_comment_before(comment);
            }
            return Ok(node);
        }
        if self.split_key_line(line)?.is_some() {
            return self.parse_block_mapping(indent, None);
        }
        // a scalar standing on its own line
        let comment = self.take_pending();
        self.advance();
        let parent = indent as isize - 1;
        let mut node = self.parse_inline_scalar(parent, line)?;
        if let Some(comment) = comment {
            node.set_comment_before(comment);
        }
        Ok(node)
    }

    fn parse_block_mapping(
        &mut self,
        indent: usize,
        first: Option<(ScalarNode, &'a str)>,
    ) -> Result<Node, Error> {
        let comment_before = self.take_pending();
        let mut pairs = Vec::new();
        if let Some((key, rest)) = first {
            let value = self.parse_pair_value(indent, rest)?;
            pairs.push(PairNode { key, value });
        }
        loop {
            let Some((line_indent, line)) = self.peek_content()? else {
                break;
            };
            if line_indent < indent || is_sequence_entry(line) {
                break;
            }
            if line_indent > indent {
                return Err(self.err("bad indentation in mapping"));
            }
            let Some((mut key, rest)) = self.split_key_line(line)? else {
                return Err(self.err("expected a key-value pair"));
            };
            key.comment_before = self.take_pending();
            self.advance();
            let value = self.parse_pair_value(indent, rest)?;
            pairs.push(PairNode { key, value });
        }
        Ok(Node::Mapping(MappingNode {
            comment_before,
            pairs,
        }))
    }

    /// Parses the value of a pair whose key sits at `parent_indent`. `rest`
    /// is the remainder of the key line after the colon.
    fn parse_pair_value(&mut self, parent_indent: usize, rest: &str) -> Result<Node, Error> {
        let mut rest = rest.trim();
        if rest.starts_with('#') {
            rest = "";
        }
        if rest.is_empty() {
            return match self.peek_content()? {
                Some((indent, _)) if indent > parent_indent => self.parse_block_node(indent),
                Some((indent, line)) if indent == parent_indent && is_sequence_entry(line) => {
                    self.parse_block_sequence(indent)
                }
                _ => Ok(Node::null_scalar()),
            };
        }
        if rest.starts_with('|') || rest.starts_with('>') {
            return self.parse_block_scalar(parent_indent as isize, rest);
        }
        if rest.starts_with('[') || rest.starts_with('{') {
            return self.parse_flow_line(rest);
        }
        self.parse_inline_scalar(parent_indent as isize, rest)
    }

    fn parse_block_sequence(&mut self, indent: usize) -> Result<Node, Error> {
        let comment_before = self.take_pending();
        let mut items = Vec::new();
        loop {
            let Some((line_indent, line)) = self.peek_content()? else {
                break;
            };
            if line_indent != indent || !is_sequence_entry(line) {
                break;
            }
            let item_comment = self.take_pending();
            self.advance();
            let after_dash = &line[1..];
            let rest = after_dash.trim_start();
            let rest_column = indent + 1 + (after_dash.len() - rest.len());
            let mut node = if rest.is_empty() || rest.starts_with('#') {
                match self.peek_content()? {
                    Some((next_indent, _)) if next_indent > indent => {
                        self.parse_block_node(next_indent)?
                    }
                    _ => Node::null_scalar(),
                }
            } else if rest.starts_with('|') || rest.starts_with('>') {
                self.parse_block_scalar(indent as isize, rest)?
            } else if rest.starts_with('[') || rest.starts_with('{') {
                self.parse_flow_line(rest)?
            } else if let Some((key, pair_rest)) = self.split_key_line(rest)? {
                self.parse_block_mapping(rest_column, Some((key, pair_rest)))?
            } else {
                self.parse_inline_scalar(indent as isize, rest)?
            };
            if let Some(comment) = item_comment {
                node.set_comment_before(comment);
            }
            items.push(node);
        }
        Ok(Node::Sequence(SequenceNode {
            comment_before,
            items,
        }))
    }

    /// Splits a content line into a key scalar and the remainder after the
    /// colon, or returns `None` when the line is not a mapping entry.
    fn split_key_line<'l>(&self, line: &'l str) -> Result<Option<(ScalarNode, &'l str)>, Error> {
        if line.starts_with('"') || line.starts_with('\'') {
            let (text, consumed) = self.parse_quoted(line)?;
            let after = line[consumed..].trim_start();
            if let Some(rest) = strip_key_colon(after) {
                let style = if line.starts_with('"') {
                    ScalarStyle::DoubleQuoted
                } else {
                    ScalarStyle::SingleQuoted
                };
                return Ok(Some((
                    ScalarNode {
                        text,
                        style,
                        comment_before: None,
                    },
                    rest,
                )));
            }
            return Ok(None);
        }
        let bytes = line.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ' || bytes[i + 1] == b'\t')
            {
                let key_text = line[..i].trim_end();
                if key_text.is_empty() {
                    return Ok(None);
                }
                return Ok(Some((
                    ScalarNode {
                        text: key_text.to_string(),
                        style: ScalarStyle::Plain,
                        comment_before: None,
                    },
                    line[i + 1..].trim_start(),
                )));
            }
        }
        Ok(None)
    }

    /// Parses an inline scalar (the part after `key: ` or `- `), folding
    /// plain-scalar continuation lines that are indented deeper than
    /// `parent_indent`.
    fn parse_inline_scalar(&mut self, parent_indent: isize, rest: &str) -> Result<Node, Error> {
        if rest.starts_with('"') || rest.starts_with('\'') {
            let (text, consumed) = self.parse_quoted(rest)?;
            let after = rest[consumed..].trim();
            if !after.is_empty() && !after.starts_with('#') {
                return Err(self.err("unexpected content after quoted scalar"));
            }
            let style = if rest.starts_with('"') {
                ScalarStyle::DoubleQuoted
            } else {
                ScalarStyle::SingleQuoted
            };
            return Ok(Node::Scalar(ScalarNode {
                text,
                style,
                comment_before: None,
            }));
        }
        let mut text = strip_trailing_comment(rest).trim_end().to_string();
        // plain scalars fold onto following, deeper-indented lines
        while self.pos < self.lines.len() {
            let raw = self.lines[self.pos];
            let content = raw.trim_start().trim_end();
            if content.is_empty() || content.starts_with('#') {
                break;
            }
            let indent = self.indent_of(raw)? as isize;
            if indent <= parent_indent
                || is_sequence_entry(content)
                || self.split_key_line(content)?.is_some()
            {
                break;
            }
            text.push(' ');
            text.push_str(strip_trailing_comment(content).trim_end());
            self.pos += 1;
        }
        Ok(Node::Scalar(ScalarNode {
            text,
            style: ScalarStyle::Plain,
            comment_before: None,
        }))
    }

    /// Reads a `|` or `>` block scalar whose header (already consumed from
    /// its line) is in `header`.
    fn parse_block_scalar(&mut self, parent_indent: isize, header: &str) -> Result<Node, Error> {
        let folded = header.starts_with('>');
        let mut chomp = Chomp::Clip;
        let mut explicit_indent = None;
        for (i, c) in header[1..].char_indices() {
            match c {
                '-' => chomp = Chomp::Strip,
                '+' => chomp = Chomp::Keep,
                '1'..='9' => explicit_indent = Some(c as usize - '0' as usize),
                ' ' | '\t' => {
                    let tail = header[1 + i..].trim();
                    if !tail.is_empty() && !tail.starts_with('#') {
                        return Err(self.err("invalid block scalar header"));
                    }
                    break;
                }
                _ => return Err(self.err("invalid block scalar header")),
            }
        }

        let mut content_indent =
            explicit_indent.map(|extra| (parent_indent.max(0) as usize) + extra);
        let mut collected: Vec<String> = Vec::new();
        while self.pos < self.lines.len() {
            let raw = self.lines[self.pos];
            if raw.trim().is_empty() {
                collected.push(String::new());
                self.pos += 1;
                continue;
            }
            let indent = self.indent_of(raw)?;
            let block_indent = match content_indent {
                Some(block_indent) => block_indent,
                None => {
                    if (indent as isize) <= parent_indent {
                        break;
                    }
                    content_indent = Some(indent);
                    indent
                }
            };
            if indent < block_indent {
                break;
            }
            collected.push(raw[block_indent..].trim_end().to_string());
            self.pos += 1;
        }

        let trailing = collected.iter().rev().take_while(|l| l.is_empty()).count();
        collected.truncate(collected.len() - trailing);
        let body = if folded {
            fold_lines(&collected)
        } else {
            collected.join("\n")
        };
        let text = match chomp {
            Chomp::Strip => body,
            Chomp::Clip => {
                if body.is_empty() {
                    body
                } else {
                    body + "\n"
                }
            }
            Chomp::Keep => body + &"\n".repeat(trailing + 1),
        };
        Ok(Node::Scalar(ScalarNode {
            text,
            style: if folded {
                ScalarStyle::Folded
            } else {
                ScalarStyle::Literal
            },
            comment_before: None,
        }))
    }

    /// Parses a one-line flow collection (`[..]` or `{..}`).
    fn parse_flow_line(&mut self, line: &str) -> Result<Node, Error> {
        let (node, consumed) = self.parse_flow_node(line)?;
        let tail = line[consumed..].trim();
        if !tail.is_empty() && !tail.starts_with('#') {
            return Err(self.err("unexpected content after flow collection"));
        }
        Ok(node)
    }

    fn parse_flow_node(&self, s: &str) -> Result<(Node, usize), Error> {
        let mut i = skip_spaces(s, 0);
        let bytes = s.as_bytes();
        if i >= bytes.len() {
            return Err(self.err("unexpected end of flow collection"));
        }
        match bytes[i] {
            b'[' => {
                i += 1;
                let mut items = Vec::new();
                loop {
                    i = skip_spaces(s, i);
                    if i >= bytes.len() {
                        return Err(self.err("unterminated flow sequence"));
                    }
                    if bytes[i] == b']' {
                        return Ok((
                            Node::Sequence(SequenceNode {
                                comment_before: None,
                                items,
                            }),
                            i + 1,
                        ));
                    }
                    let (item, used) = self.parse_flow_node(&s[i..])?;
                    items.push(item);
                    i += used;
                    i = skip_spaces(s, i);
                    match bytes.get(i) {
                        Some(b',') => i += 1,
                        Some(b']') => {
                            return Ok((
                                Node::Sequence(SequenceNode {
                                    comment_before: None,
                                    items,
                                }),
                                i + 1,
                            ));
                        }
                        _ => return Err(self.err("expected `,` or `]` in flow sequence")),
                    }
                }
            }
            b'{' => {
                i += 1;
                let mut pairs = Vec::new();
                loop {
                    i = skip_spaces(s, i);
                    if i >= bytes.len() {
                        return Err(self.err("unterminated flow mapping"));
                    }
                    if bytes[i] == b'}' {
                        return Ok((
                            Node::Mapping(MappingNode {
                                comment_before: None,
                                pairs,
                            }),
                            i + 1,
                        ));
                    }
                    let (key, used) = self.parse_flow_scalar(&s[i..], true)?;
                    i += used;
                    i = skip_spaces(s, i);
                    if bytes.get(i) != Some(&b':') {
                        return Err(self.err("expected `:` in flow mapping"));
                    }
                    i += 1;
                    let (value, used) = self.parse_flow_node(&s[i..])?;
                    i += used;
                    pairs.push(PairNode { key, value });
                    i = skip_spaces(s, i);
                    match bytes.get(i) {
                        Some(b',') => i += 1,
                        Some(b'}') => {
                            return Ok((
                                Node::Mapping(MappingNode {
                                    comment_before: None,
                                    pairs,
                                }),
                                i + 1,
                            ));
                        }
                        _ => return Err(self.err("expected `,` or `}` in flow mapping")),
                    }
                }
            }
            _ => {
                let (scalar, used) = self.parse_flow_scalar(&s[i..], false)?;
                Ok((Node::Scalar(scalar), i + used))
            }
        }
    }

    /// Parses one scalar inside a flow collection. When `as_key` is set the
    /// scalar also terminates at a colon.
    fn parse_flow_scalar(&self, s: &str, as_key: bool) -> Result<(ScalarNode, usize), Error> {
        let start = skip_spaces(s, 0);
        let rest = &s[start..];
        if rest.starts_with('"') || rest.starts_with('\'') {
            let (text, consumed) = self.parse_quoted(rest)?;
            let style = if rest.starts_with('"') {
                ScalarStyle::DoubleQuoted
            } else {
                ScalarStyle::SingleQuoted
            };
            return Ok((
                ScalarNode {
                    text,
                    style,
                    comment_before: None,
                },
                start + consumed,
            ));
        }
        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            if c == ',' || c == ']' || c == '}' || (as_key && c == ':') {
                end = i;
                break;
            }
        }
        Ok((
            ScalarNode {
                text: rest[..end].trim().to_string(),
                style: ScalarStyle::Plain,
                comment_before: None,
            },
            start + end,
        ))
    }

    /// Parses a quoted scalar at the start of `s`, returning the unescaped
    /// text and the number of bytes consumed including both quotes.
    fn parse_quoted(&self, s: &str) -> Result<(String, usize), Error> {
        let mut chars = s.char_indices();
        let Some((_, quote)) = chars.next() else {
            return Err(self.err("expected a quoted scalar"));
        };
        let mut text = String::new();
        if quote == '\'' {
            while let Some((i, c)) = chars.next() {
                if c == '\'' {
                    // '' is an escaped single quote
                    if s[i + 1..].starts_with('\'') {
                        text.push('\'');
                        chars.next();
                    } else {
                        return Ok((text, i + 1));
                    }
                } else {
                    text.push(c);
                }
            }
            return Err(self.err("unterminated single-quoted scalar"));
        }
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Ok((text, i + 1)),
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        return Err(self.err("unterminated escape sequence"));
                    };
                    match escaped {
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        '0' => text.push('\0'),
                        'b' => text.push('\u{8}'),
                        'f' => text.push('\u{c}'),
                        '"' => text.push('"'),
                        '\\' => text.push('\\'),
                        '/' => text.push('/'),
                        'u' => {
                            let mut code = 0u32;
                            for _ in 0..4 {
                                let Some((_, h)) = chars.next() else {
                                    return Err(self.err("truncated \\u escape"));
                                };
                                let Some(digit) = h.to_digit(16) else {
                                    return Err(self.err("invalid \\u escape"));
                                };
                                code = code * 16 + digit;
                            }
                            match char::from_u32(code) {
                                Some(ch) => text.push(ch),
                                None => text.push(char::REPLACEMENT_CHARACTER),
                            }
                        }
                        other => {
                            // be lenient about unknown escapes
                            text.push(other);
                        }
                    }
                }
                _ => text.push(c),
            }
        }
        Err(self.err("unterminated double-quoted scalar"))
    }
}

fn is_sequence_entry(line: &str) -> bool {
    line == "-" || line.starts_with("- ")
}

fn strip_key_colon(after: &str) -> Option<&str> {
    let rest = after.strip_prefix(':')?;
    if rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t') {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn skip_spaces(s: &str, mut i: usize) -> usize {
    let bytes = s.as_bytes();
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    i
}

/// Cuts a ` #comment` suffix off a plain scalar.
fn strip_trailing_comment(s: &str) -> &str {
    let bytes = s.as_bytes();
    for i in 1..bytes.len() {
        if bytes[i] == b'#' && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            return &s[..i];
        }
    }
    s
}

/// Joins folded block-scalar lines: adjacent text lines fold with a space,
/// blank lines become line breaks, more-indented lines stay literal.
fn fold_lines(lines: &[String]) -> String {
    let mut out = String::new();
    let mut blanks = 0usize;
    let mut prev_indented = false;
    let mut first = true;
    for line in lines {
        if line.is_empty() {
            blanks += 1;
            continue;
        }
        let indented = line.starts_with(' ') || line.starts_with('\t');
        if first {
            first = false;
        } else if blanks > 0 {
            for _ in 0..blanks {
                out.push('\n');
            }
        } else if prev_indented || indented {
            out.push('\n');
        } else {
            out.push(' ');
        }
        out.push_str(line);
        blanks = 0;
        prev_indented = indented;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(node: &Node) -> &MappingNode {
        match node {
            Node::Mapping(m) => m,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    fn sequence(node: &Node) -> &SequenceNode {
        match node {
            Node::Sequence(s) => s,
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    fn scalar(node: &Node) -> &ScalarNode {
        match node {
            Node::Scalar(s) => s,
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_mapping() {
        let tree = parse_tree("foo: bar\nbaz: qux\n").unwrap();
        let map = mapping(&tree);
        assert_eq!(map.pairs.len(), 2);
        assert_eq!(map.pairs[0].key.text, "foo");
        assert_eq!(scalar(&map.pairs[0].value).text, "bar");
        assert_eq!(map.pairs[1].key.text, "baz");
        assert_eq!(scalar(&map.pairs[1].value).text, "qux");
    }

    #[test]
    fn test_parse_nested_mapping() {
        let tree = parse_tree("foo:\n  bar:\n    baz: deep\n").unwrap();
        let root = mapping(&tree);
        let foo = mapping(&root.pairs[0].value);
        let bar = mapping(&foo.pairs[0].value);
        assert_eq!(bar.pairs[0].key.text, "baz");
        assert_eq!(scalar(&bar.pairs[0].value).text, "deep");
    }

    #[test]
    fn test_parse_document_markers() {
        let tree = parse_tree("---\nfoo: bar\n...\nignored: yes\n").unwrap();
        let map = mapping(&tree);
        assert_eq!(map.pairs.len(), 1);
    }

    #[test]
    fn test_parse_quoted_scalars() {
        let tree = parse_tree("a: \"one \\\"two\\\"\"\nb: 'it''s'\n").unwrap();
        let map = mapping(&tree);
        let a = scalar(&map.pairs[0].value);
        assert_eq!(a.text, "one \"two\"");
        assert_eq!(a.style, ScalarStyle::DoubleQuoted);
        let b = scalar(&map.pairs[1].value);
        assert_eq!(b.text, "it's");
        assert_eq!(b.style, ScalarStyle::SingleQuoted);
    }

    #[test]
    fn test_parse_quoted_key() {
        let tree = parse_tree("'foo/bar/x.en-US.html.haml':\n  r1: Jobs\n").unwrap();
        let map = mapping(&tree);
        assert_eq!(map.pairs[0].key.text, "foo/bar/x.en-US.html.haml");
        assert_eq!(map.pairs[0].key.style, ScalarStyle::SingleQuoted);
    }

    #[test]
    fn test_parse_sequence() {
        let tree = parse_tree("Jobs:\n  - one and\n  - two and\n  - three\n").unwrap();
        let map = mapping(&tree);
        let seq = sequence(&map.pairs[0].value);
        assert_eq!(seq.items.len(), 3);
        assert_eq!(scalar(&seq.items[0]).text, "one and");
        assert_eq!(scalar(&seq.items[2]).text, "three");
    }

    #[test]
    fn test_parse_sequence_at_key_indent() {
        let tree = parse_tree("Jobs:\n- one\n- two\nnext: x\n").unwrap();
        let map = mapping(&tree);
        let seq = sequence(&map.pairs[0].value);
        assert_eq!(seq.items.len(), 2);
        assert_eq!(map.pairs[1].key.text, "next");
    }

    #[test]
    fn test_parse_compact_mapping_in_sequence() {
        let tree = parse_tree(concat!(
            "options:\n",
            "  - name: attention\n",
            "    color: reddish\n",
            "  - name: urgent\n",
        ))
        .unwrap();
        let map = mapping(&tree);
        let seq = sequence(&map.pairs[0].value);
        assert_eq!(seq.items.len(), 2);
        let first = mapping(&seq.items[0]);
        assert_eq!(first.pairs.len(), 2);
        assert_eq!(first.pairs[0].key.text, "name");
        assert_eq!(scalar(&first.pairs[1].value).text, "reddish");
    }

    #[test]
    fn test_parse_literal_block_scalar() {
        let tree = parse_tree("text: |\n  line one\n  line two\nafter: x\n").unwrap();
        let map = mapping(&tree);
        let text = scalar(&map.pairs[0].value);
        assert_eq!(text.text, "line one\nline two\n");
        assert_eq!(text.style, ScalarStyle::Literal);
        assert_eq!(map.pairs[1].key.text, "after");
    }

    #[test]
    fn test_parse_literal_block_scalar_strip() {
        let tree = parse_tree("text: |-\n  line one\n  line two\n").unwrap();
        let map = mapping(&tree);
        assert_eq!(scalar(&map.pairs[0].value).text, "line one\nline two");
    }

    #[test]
    fn test_parse_folded_block_scalar() {
        let tree = parse_tree("text: >\n  one\n  two\n\n  three\n").unwrap();
        let map = mapping(&tree);
        assert_eq!(scalar(&map.pairs[0].value).text, "one two\nthree\n");
    }

    #[test]
    fn test_parse_plain_continuation() {
        let tree = parse_tree("text: one\n  two\n  three\nafter: x\n").unwrap();
        let map = mapping(&tree);
        assert_eq!(scalar(&map.pairs[0].value).text, "one two three");
        assert_eq!(map.pairs[1].key.text, "after");
    }

    #[test]
    fn test_parse_flow_collections() {
        let tree = parse_tree("a: [one, two, 'three']\nb: {x: 1, y: 2}\n").unwrap();
        let map = mapping(&tree);
        let seq = sequence(&map.pairs[0].value);
        assert_eq!(seq.items.len(), 3);
        assert_eq!(scalar(&seq.items[2]).text, "three");
        let flow_map = mapping(&map.pairs[1].value);
        assert_eq!(flow_map.pairs[0].key.text, "x");
        assert_eq!(scalar(&flow_map.pairs[1].value).text, "2");
    }

    #[test]
    fn test_parse_empty_document() {
        let tree = parse_tree("").unwrap();
        assert!(mapping(&tree).pairs.is_empty());
        let tree = parse_tree("# only a comment\n").unwrap();
        let map = mapping(&tree);
        assert!(map.pairs.is_empty());
        assert_eq!(map.comment_before.as_deref(), Some(" only a comment"));
    }

    #[test]
    fn test_parse_null_values() {
        let tree = parse_tree("a:\nb: x\n").unwrap();
        let map = mapping(&tree);
        assert_eq!(scalar(&map.pairs[0].value).text, "");
    }

    #[test]
    fn test_comment_attaches_to_nested_collection() {
        let tree = parse_tree(concat!(
            "first_a:\n",
            "  #second_a comment\n",
            "  second_a: \"second a\"\n",
            "  #second_b comment\n",
            "  second_b: \"second b\"\n",
        ))
        .unwrap();
        let root = mapping(&tree);
        assert_eq!(root.comment_before, None);
        let nested = mapping(&root.pairs[0].value);
        // the run above the first child belongs to the collection node
        assert_eq!(nested.comment_before.as_deref(), Some("second_a comment"));
        assert_eq!(nested.pairs[0].key.comment_before, None);
        assert_eq!(
            nested.pairs[1].key.comment_before.as_deref(),
            Some("second_b comment")
        );
    }

    #[test]
    fn test_comment_before_first_root_key() {
        let tree = parse_tree("#doc comment\nfirst: x\nsecond: y\n").unwrap();
        let root = mapping(&tree);
        assert_eq!(root.comment_before.as_deref(), Some("doc comment"));
        assert_eq!(root.pairs[0].key.comment_before, None);
    }

    #[test]
    fn test_multiline_comment_run() {
        let tree = parse_tree("first: x\n# this is multiline\n# comment\nsecond: y\n").unwrap();
        let root = mapping(&tree);
        assert_eq!(
            root.pairs[1].key.comment_before.as_deref(),
            Some(" this is multiline\n comment")
        );
    }

    #[test]
    fn test_sequence_item_comments() {
        let tree = parse_tree(concat!(
            "Jobs:\n",
            "  - one and\n",
            "  #second level comment\n",
            "  - two and\n",
        ))
        .unwrap();
        let map = mapping(&tree);
        let seq = sequence(&map.pairs[0].value);
        assert_eq!(scalar(&seq.items[0]).comment_before, None);
        assert_eq!(
            scalar(&seq.items[1]).comment_before.as_deref(),
            Some("second level comment")
        );
    }

    #[test]
    fn test_trailing_comment_is_dropped() {
        let tree = parse_tree("a: value # note\n").unwrap();
        let map = mapping(&tree);
        assert_eq!(scalar(&map.pairs[0].value).text, "value");
    }

    #[test]
    fn test_error_on_tab_indentation() {
        assert!(parse_tree("a:\n\tb: x\n").is_err());
    }

    #[test]
    fn test_error_on_unterminated_quote() {
        assert!(parse_tree("a: \"unterminated\n").is_err());
    }

    #[test]
    fn test_error_on_bad_indentation() {
        assert!(parse_tree("a: 1\n    b: 2\n").is_err());
    }
}
