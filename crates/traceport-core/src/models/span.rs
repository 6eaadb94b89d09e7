//! Finalized span records
//!
//! These are the immutable records a tracing SDK hands over once a span has
//! ended. The exporter never mutates or retains them; every export call maps
//! them freshly into wire shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a message event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageEventKind {
    /// Direction was not recorded
    #[default]
    Unspecified,
    /// Message sent by this process
    Sent,
    /// Message received by this process
    Received,
}

impl MessageEventKind {
    /// Symbolic name used as the `type` log field value
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Sent => "SENT",
            Self::Received => "RECEIVED",
        }
    }
}

/// A timed event recorded while a span was open
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TimeEvent {
    /// Free-form text annotation with attributes
    Annotation {
        /// When the annotation was recorded
        time: DateTime<Utc>,
        /// Annotation text
        description: String,
        /// Attributes attached to the annotation, in recording order
        attributes: Vec<(String, serde_json::Value)>,
    },
    /// A message sent or received over some transport
    Message {
        /// When the message crossed the boundary
        time: DateTime<Utc>,
        /// Direction of the message
        kind: MessageEventKind,
        /// Message identifier
        id: String,
        /// Size of the message before compression, in bytes
        uncompressed_size: u64,
        /// Size of the message after compression, in bytes
        compressed_size: u64,
    },
    /// An event kind with no wire mapping; converted spans carry no log for it
    Other,
}

/// A completed span as recorded by the tracing SDK
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanRecord {
    /// Name of the operation
    pub name: String,

    /// Trace ID as a hex string, up to 32 hex chars (128 bits)
    pub trace_id: String,

    /// Span ID as a hex string, up to 16 hex chars (64 bits)
    pub span_id: String,

    /// Parent span ID as a hex string; empty for root spans
    pub parent_span_id: String,

    /// When the operation started
    pub start_time: DateTime<Utc>,

    /// When the operation ended; never earlier than `start_time`
    pub end_time: DateTime<Utc>,

    /// Attributes in recording order
    pub attributes: Vec<(String, serde_json::Value)>,

    /// Time events in recording order
    pub time_events: Vec<TimeEvent>,
}

impl SpanRecord {
    /// Create a minimal record with the given name and identifiers
    pub fn new(
        name: impl Into<String>,
        trace_id: impl Into<String>,
        span_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            parent_span_id: String::new(),
            start_time: now,
            end_time: now,
            attributes: Vec::new(),
            time_events: Vec::new(),
        }
    }
}
