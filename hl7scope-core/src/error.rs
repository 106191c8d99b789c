//! Error types for hl7scope operations.
//!
//! Errors never carry raw message content. HL7 messages contain patient
//! demographics, so parse failures describe *where* the message broke
//! (segment index, tag) and never echo field values.

use thiserror::Error;

/// Main error type for hl7scope operations.
#[derive(Debug, Error)]
pub enum Hl7ScopeError {
    /// Message could not be turned into the segment/field model
    #[error("Message parsing failed: {context}")]
    Parse { context: String },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with Hl7ScopeError
pub type Result<T> = std::result::Result<T, Hl7ScopeError>;

impl Hl7ScopeError {
    /// Creates a parse error with context
    pub fn parse(context: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
        }
    }

    /// Creates a parse error located at a specific segment.
    ///
    /// # Arguments
    /// * `index` - Zero-based segment position in wire order
    /// * `segment_type` - Segment tag if one could be read
    /// * `reason` - What went wrong
    pub fn parse_segment(index: usize, segment_type: Option<&str>, reason: &str) -> Self {
        let context = match segment_type {
            Some(tag) => format!("segment {} ({}): {}", index, tag, reason),
            None => format!("segment {}: {}", index, reason),
        };
        Self::Parse { context }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}
