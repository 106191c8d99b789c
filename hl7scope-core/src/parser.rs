//! HL7 v2 structural validation and parsing.
//!
//! The quality engine never tokenizes raw text itself. It talks to a
//! [`MessageParser`], which answers two questions: is the text minimally
//! well-formed ([`MessageParser::validate_structure`]), and what segments and
//! fields does it contain ([`MessageParser::parse`]).
//!
//! [`Hl7Parser`] is the built-in implementation for pipe-delimited ER7
//! messages.
//!
//! # Example
//! ```rust
//! use hl7scope_core::parser::{Hl7Parser, MessageParser};
//!
//! let raw = "MSH|^~\\&|APP|FAC|RECV|RFAC|20240115103000||ADT^A01|MSG1|P|2.5\rPID|1||12345";
//! let parser = Hl7Parser::new();
//!
//! assert!(parser.validate_structure(raw).is_valid);
//! let message = parser.parse(raw).unwrap();
//! assert_eq!(message.message_type.as_deref(), Some("ADT^A01"));
//! assert_eq!(message.total_segments, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Hl7ScopeError;
use crate::models::{EncodingCharacters, HEADER_SEGMENT, ParsedMessage, Segment};
use crate::Result;

/// Minimum length of a usable header: `MSH` + field separator + 4 encoding characters.
const MIN_HEADER_LEN: usize = 8;

/// Outcome of the structural gate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructureValidation {
    /// True when no structural errors were found
    pub is_valid: bool,
    /// Human-readable structural errors, in discovery order
    pub errors: Vec<String>,
}

impl StructureValidation {
    /// Builds a validation result from collected errors.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Parser collaborator used by the quality analyzer.
///
/// Implementations must be side-effect free. A `false` structural result or
/// an `Err` from [`MessageParser::parse`] is mapped to a failure-shaped
/// report by the analyzer; neither aborts the caller.
pub trait MessageParser: Send + Sync {
    /// Checks that the text is minimally well-formed.
    fn validate_structure(&self, raw: &str) -> StructureValidation;

    /// Parses the text into the segment/field model.
    ///
    /// # Errors
    /// Returns `Hl7ScopeError::Parse` when the text cannot be modeled.
    fn parse(&self, raw: &str) -> Result<ParsedMessage>;
}

/// Built-in parser for pipe-delimited HL7 v2 messages.
///
/// Segments may be separated by `\r`, `\n`, or `\r\n`. Delimiters are taken
/// from the header, so messages with non-standard separators are supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hl7Parser;

impl Hl7Parser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }
}

/// Splits raw text into trimmed, non-empty segment lines.
fn segment_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Reads the field separator and MSH-2 from a header line.
///
/// Returns `None` when the line is not a header or has no separator.
fn header_delimiters(line: &str) -> Option<(char, &str)> {
    let rest = line.strip_prefix(HEADER_SEGMENT)?;
    let separator = rest.chars().next()?;
    if separator.is_alphanumeric() || separator.is_whitespace() {
        return None;
    }
    let after = &rest[separator.len_utf8()..];
    let declared = after.split(separator).next().unwrap_or("");
    Some((separator, declared))
}

/// Returns true for a well-formed segment tag (letter followed by two
/// uppercase letters or digits).
fn is_valid_segment_tag(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    bytes.len() == 3
        && bytes[0].is_ascii_uppercase()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

impl MessageParser for Hl7Parser {
    fn validate_structure(&self, raw: &str) -> StructureValidation {
        let lines: Vec<&str> = segment_lines(raw).collect();

        let Some(first) = lines.first() else {
            return StructureValidation::from_errors(vec!["Message is empty".to_string()]);
        };

        let mut errors = Vec::new();

        if !first.starts_with(HEADER_SEGMENT) {
            errors.push("Message must start with an MSH segment".to_string());
            return StructureValidation::from_errors(errors);
        }

        if first.len() < MIN_HEADER_LEN {
            errors.push("MSH segment is too short to declare delimiters".to_string());
        }

        let separator = match header_delimiters(first) {
            Some((separator, declared)) => {
                if declared.is_empty() {
                    errors.push("MSH-2 encoding characters are missing".to_string());
                }
                separator
            }
            None => {
                errors.push("MSH segment does not declare a field separator".to_string());
                return StructureValidation::from_errors(errors);
            }
        };

        for (index, line) in lines.iter().enumerate() {
            let tag = line.split(separator).next().unwrap_or("");
            if !is_valid_segment_tag(tag) {
                errors.push(format!("Segment {} has an invalid segment tag", index + 1));
            }
        }

        StructureValidation::from_errors(errors)
    }

    fn parse(&self, raw: &str) -> Result<ParsedMessage> {
        let lines: Vec<&str> = segment_lines(raw).collect();

        let first = lines
            .first()
            .ok_or_else(|| Hl7ScopeError::parse("message is empty"))?;

        let (separator, declared) = header_delimiters(first).ok_or_else(|| {
            Hl7ScopeError::parse_segment(0, None, "header does not declare a field separator")
        })?;
        let encoding = EncodingCharacters::from_declared(separator, declared);

        let mut segments = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            segments.push(parse_segment(index, line, &encoding)?);
        }

        tracing::trace!(segments = segments.len(), "Parsed HL7 message");

        Ok(ParsedMessage::new(segments, encoding))
    }
}

/// Parses one segment line into a [`Segment`].
fn parse_segment(index: usize, line: &str, encoding: &EncodingCharacters) -> Result<Segment> {
    let mut parts = line.split(encoding.field);
    let tag = parts.next().unwrap_or("").trim();

    if tag.is_empty() {
        return Err(Hl7ScopeError::parse_segment(index, None, "missing segment tag"));
    }

    let mut segment = Segment::new(tag);

    if tag == HEADER_SEGMENT {
        // MSH-1 is the separator itself, so the first split part is MSH-2.
        segment.set_field(1, encoding.field.to_string());
        for (offset, value) in parts.enumerate() {
            segment.set_field(offset.saturating_add(2), value);
        }
    } else {
        for (offset, value) in parts.enumerate() {
            segment.set_field(offset.saturating_add(1), value);
        }
    }

    Ok(segment)
}
