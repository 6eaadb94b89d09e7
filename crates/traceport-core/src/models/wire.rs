//! Jaeger Thrift wire shapes
//!
//! Field names, numbering, and types mirror `jaeger.thrift` and are a fixed
//! contract with the backend; the compact serializer in [`crate::wire`]
//! depends on them staying exactly as declared here.

/// Tag value discriminator (`TagType` in jaeger.thrift)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagType {
    /// UTF-8 string value; the only type this exporter produces
    #[default]
    String,
    /// IEEE 754 double value
    Double,
    /// Boolean value
    Bool,
    /// Signed 64-bit value
    Long,
    /// Opaque binary value
    Binary,
}

impl TagType {
    /// Thrift enum value sent on the wire
    pub fn code(self) -> i32 {
        match self {
            Self::String => 0,
            Self::Double => 1,
            Self::Bool => 2,
            Self::Long => 3,
            Self::Binary => 4,
        }
    }
}

/// One key/value pair attached to a span, process, or log
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Tag key
    pub key: String,
    /// Value type discriminator
    pub v_type: TagType,
    /// String value; always set since only string tags are produced
    pub v_str: String,
}

impl Tag {
    /// Create a string-typed tag
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            v_type: TagType::String,
            v_str: value.into(),
        }
    }
}

/// One time event converted to a wire log
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Microseconds since the Unix epoch
    pub timestamp: i64,
    /// Log fields in recording order
    pub fields: Vec<Tag>,
}

/// Reference to another span (`SpanRef` in jaeger.thrift)
///
/// Link semantics are not modeled by this exporter; the `references` list of
/// every emitted span is empty. The shape is kept so the wire layer encodes
/// the full contract.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanRef {
    /// Reference type enum value (0 = CHILD_OF, 1 = FOLLOWS_FROM)
    pub ref_type: i32,
    /// Low 64 bits of the referenced trace ID
    pub trace_id_low: i64,
    /// High 64 bits of the referenced trace ID
    pub trace_id_high: i64,
    /// Referenced span ID
    pub span_id: i64,
}

/// Export-ready span (`Span` in jaeger.thrift)
#[derive(Debug, Clone, PartialEq)]
pub struct WireSpan {
    /// Low 64 bits of the trace ID
    pub trace_id_low: i64,
    /// High 64 bits of the trace ID
    pub trace_id_high: i64,
    /// Span ID
    pub span_id: i64,
    /// Parent span ID; 0 for root spans
    pub parent_span_id: i64,
    /// Name of the operation
    pub operation_name: String,
    /// References to other spans; always empty
    pub references: Vec<SpanRef>,
    /// Trace flags; always 0
    pub flags: i32,
    /// Start time in microseconds since the Unix epoch
    pub start_time: i64,
    /// Duration in microseconds
    pub duration: i64,
    /// Span tags in recording order
    pub tags: Vec<Tag>,
    /// Span logs in recording order
    pub logs: Vec<LogRecord>,
}

/// Exported service identity (`Process` in jaeger.thrift)
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    /// Logical service name
    pub service_name: String,
    /// Static tags describing the process
    pub tags: Vec<Tag>,
}

/// Unit of transmission: one process identity plus its spans
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Service identity the spans belong to
    pub process: Process,
    /// Spans in export order
    pub spans: Vec<WireSpan>,
}
