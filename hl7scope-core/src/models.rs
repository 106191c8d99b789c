//! HL7 v2 message model.
//!
//! A [`ParsedMessage`] is the read-only input of every quality check. It is
//! produced by a [`crate::parser::MessageParser`] and never mutated after
//! construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tag of the mandatory header segment.
pub const HEADER_SEGMENT: &str = "MSH";
/// Tag of the event type segment.
pub const EVENT_SEGMENT: &str = "EVN";
/// Tag of the patient identification segment.
pub const PATIENT_SEGMENT: &str = "PID";
/// Tag of the patient visit segment.
pub const VISIT_SEGMENT: &str = "PV1";

/// Delimiters declared by a message in MSH-1 and MSH-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingCharacters {
    /// Field separator (MSH-1)
    pub field: char,
    /// Component separator
    pub component: char,
    /// Repetition separator
    pub repetition: char,
    /// Escape character
    pub escape: char,
    /// Subcomponent separator
    pub subcomponent: char,
}

impl Default for EncodingCharacters {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl EncodingCharacters {
    /// Builds encoding characters from a field separator and the MSH-2 value.
    ///
    /// Missing positions in `declared` fall back to the standard delimiters.
    pub fn from_declared(field: char, declared: &str) -> Self {
        let defaults = Self::default();
        let mut chars = declared.chars();
        Self {
            field,
            component: chars.next().unwrap_or(defaults.component),
            repetition: chars.next().unwrap_or(defaults.repetition),
            escape: chars.next().unwrap_or(defaults.escape),
            subcomponent: chars.next().unwrap_or(defaults.subcomponent),
        }
    }
}

/// A single segment: a tag plus positional field values.
///
/// Field keys follow HL7 numbering, so `PID-5` is key `5`. For the header,
/// key `1` is the field separator and key `2` the encoding characters.
/// Empty fields are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Three-character segment tag (`MSH`, `PID`, `PV1`, ...)
    pub segment_type: String,
    /// Field number to raw field value
    pub fields: BTreeMap<usize, String>,
}

impl Segment {
    /// Creates a segment with no fields.
    pub fn new(segment_type: impl Into<String>) -> Self {
        Self {
            segment_type: segment_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder method to set a field. Empty values are dropped.
    pub fn with_field(mut self, number: usize, value: impl Into<String>) -> Self {
        self.set_field(number, value);
        self
    }

    /// Sets a field value. Empty values remove the field instead.
    pub fn set_field(&mut self, number: usize, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.fields.remove(&number);
        } else {
            self.fields.insert(number, value);
        }
    }

    /// Returns the raw value of a field, if present.
    pub fn field(&self, number: usize) -> Option<&str> {
        self.fields.get(&number).map(String::as_str)
    }

    /// Returns one component of a field (1-based), if present and non-empty.
    ///
    /// Only the first repetition is considered.
    pub fn component(
        &self,
        number: usize,
        component: usize,
        encoding: &EncodingCharacters,
    ) -> Option<&str> {
        let index = component.checked_sub(1)?;
        self.field(number)?
            .split(encoding.repetition)
            .next()?
            .split(encoding.component)
            .nth(index)
            .filter(|c| !c.is_empty())
    }

    /// Returns the highest populated field number, or 0 for an empty segment.
    pub fn field_count(&self) -> usize {
        self.fields.keys().next_back().copied().unwrap_or(0)
    }
}

/// A parsed HL7 v2 message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Message type from MSH-9 (e.g. `ADT^A01`), absent when MSH-9 is empty
    pub message_type: Option<String>,
    /// Number of segments in the message
    pub total_segments: usize,
    /// Delimiters declared by the header
    pub encoding: EncodingCharacters,
    /// Segments in wire order
    pub segments: Vec<Segment>,
}

impl ParsedMessage {
    /// Creates a message from segments in wire order.
    ///
    /// The message type is read from MSH-9 of the first header segment and
    /// normalized to use `^` between components.
    pub fn new(segments: Vec<Segment>, encoding: EncodingCharacters) -> Self {
        let message_type = segments
            .iter()
            .find(|s| s.segment_type == HEADER_SEGMENT)
            .and_then(|msh| msh.field(9))
            .map(|raw| {
                if encoding.component == '^' {
                    raw.to_string()
                } else {
                    raw.replace(encoding.component, "^")
                }
            });

        Self {
            message_type,
            total_segments: segments.len(),
            encoding,
            segments,
        }
    }

    /// Returns the first segment with the given tag.
    ///
    /// Later segments with the same tag are not visible through this lookup.
    pub fn segment(&self, segment_type: &str) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.segment_type == segment_type)
    }

    /// Iterates every segment with the given tag, in wire order.
    pub fn segments_of<'a>(&'a self, segment_type: &'a str) -> impl Iterator<Item = &'a Segment> {
        self.segments
            .iter()
            .filter(move |s| s.segment_type == segment_type)
    }

    /// Returns true if at least one segment with the given tag exists.
    pub fn has_segment(&self, segment_type: &str) -> bool {
        self.segment(segment_type).is_some()
    }

    /// Returns the header segment, if present.
    pub fn header(&self) -> Option<&Segment> {
        self.segment(HEADER_SEGMENT)
    }

    /// Returns true if the message type mentions the given code (e.g. `ADT`).
    pub fn is_message_type(&self, code: &str) -> bool {
        self.message_type
            .as_deref()
            .is_some_and(|t| t.contains(code))
    }
}
