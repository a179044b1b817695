// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Recognize tags in logical lines.
//!
//! With the default `>>` prefix:
//! - `>>example<N>: <expr>` builds example N
//! - `>>error: <expr>` must raise
//! - `>>test: <expr>` must be truthy
//!
//! Markers may appear anywhere in the line. The expression is the text after
//! the last `:` on the line, so an expression with its own top-level colon
//! (a dict literal, for one) is cut short.

/// A classified logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Example { id: u64, expr: String },
    Test { expr: String },
    Error { expr: String },
    Plain,
}

impl Tag {
    /// The payload expression, if this is a tag.
    pub fn expr(&self) -> Option<&str> {
        match self {
            Tag::Example { expr, .. } | Tag::Test { expr } | Tag::Error { expr } => Some(expr),
            Tag::Plain => None,
        }
    }
}

/// Why an example marker could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("`{marker}` must be followed by an id and `:`")]
    MissingId { marker: String },

    #[error("example id `{digits}` is out of range")]
    IdOutOfRange { digits: String },
}

/// Classifies lines for one tag prefix.
#[derive(Debug, Clone)]
pub struct TagParser {
    example: String,
    error: String,
    test: String,
}

impl TagParser {
    pub fn new(prefix: &str) -> Self {
        Self {
            example: format!("{}example", prefix),
            error: format!("{}error:", prefix),
            test: format!("{}test:", prefix),
        }
    }

    /// Classify one logical line. Only a malformed example marker is an error.
    pub fn parse(&self, line: &str) -> Result<Tag, TagError> {
        if line.contains(&self.example) {
            let id = self.example_id(line)?;
            return Ok(Tag::Example {
                id,
                expr: payload(line),
            });
        }
        if line.contains(&self.error) {
            return Ok(Tag::Error { expr: payload(line) });
        }
        if line.contains(&self.test) {
            return Ok(Tag::Test { expr: payload(line) });
        }
        Ok(Tag::Plain)
    }

    /// Id of the first well-formed `<marker><digits>:` on the line. Earlier
    /// bare mentions of the marker (`>>examples`) are skipped.
    fn example_id(&self, line: &str) -> Result<u64, TagError> {
        let well_formed = line.match_indices(&self.example).find_map(|(pos, _)| {
            let rest = &line[pos + self.example.len()..];
            let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            (digits_len > 0 && rest[digits_len..].starts_with(':')).then(|| &rest[..digits_len])
        });
        let Some(digits) = well_formed else {
            return Err(TagError::MissingId {
                marker: self.example.clone(),
            });
        };
        digits.parse().map_err(|_| TagError::IdOutOfRange {
            digits: digits.to_string(),
        })
    }
}

impl Default for TagParser {
    fn default() -> Self {
        Self::new(">>")
    }
}

/// Text after the last colon, trimmed.
fn payload(line: &str) -> String {
    match line.rfind(':') {
        Some(pos) => line[pos + 1..].trim().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Tag {
        TagParser::default().parse(line).unwrap()
    }

    #[test]
    fn classifies_each_tag_kind() {
        assert_eq!(
            parse(r#">>example1: cls(2, 6, "hello")"#),
            Tag::Example { id: 1, expr: r#"cls(2, 6, "hello")"#.to_string() }
        );
        assert_eq!(parse(">>test: 1 == 1"), Tag::Test { expr: "1 == 1".to_string() });
        assert_eq!(parse(">>error: 10/0"), Tag::Error { expr: "10/0".to_string() });
        assert_eq!(parse("Just prose: nothing to see"), Tag::Plain);
    }

    #[test]
    fn markers_match_anywhere_in_line() {
        assert_eq!(
            parse("CHECK THIS >>test: 2 > 1"),
            Tag::Test { expr: "2 > 1".to_string() }
        );
    }

    #[test]
    fn bare_marker_mention_before_real_marker_is_skipped() {
        let tag = parse("see >>examples below >>example2: cls(1)");
        assert_eq!(tag, Tag::Example { id: 2, expr: "cls(1)".to_string() });
        let err = TagParser::default().parse("see >>examples below").unwrap_err();
        assert!(matches!(err, TagError::MissingId { .. }));
    }

    #[test]
    fn example_wins_over_error_and_test() {
        let tag = parse(">>example3: >>test: cls()");
        assert!(matches!(tag, Tag::Example { id: 3, .. }));
        let tag = parse(">>error: >>test: x");
        assert!(matches!(tag, Tag::Error { .. }));
    }

    #[test]
    fn payload_is_after_last_colon() {
        // a dict literal's colon cuts the expression short
        assert_eq!(
            parse(r#">>test: {"k": 1}["k"] == 1"#),
            Tag::Test { expr: r#"1}["k"] == 1"#.to_string() }
        );
    }

    #[test]
    fn malformed_example_ids() {
        let parser = TagParser::default();
        assert!(matches!(parser.parse(">>example: cls()"), Err(TagError::MissingId { .. })));
        assert!(matches!(parser.parse(">>exampleA: cls()"), Err(TagError::MissingId { .. })));
        assert!(matches!(parser.parse(">>example-1: cls()"), Err(TagError::MissingId { .. })));
        assert!(matches!(
            parser.parse(">>example99999999999999999999999: cls()"),
            Err(TagError::IdOutOfRange { .. })
        ));
    }

    #[test]
    fn custom_prefix() {
        let parser = TagParser::new("@@");
        assert_eq!(parser.parse("@@test: True").unwrap(), Tag::Test { expr: "True".to_string() });
        assert_eq!(parser.parse(">>test: True").unwrap(), Tag::Plain);
    }
}
