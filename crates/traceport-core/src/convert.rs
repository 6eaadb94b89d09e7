//! Span record to wire span conversion

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::codec::{HexCodec, IdentifierCodec};
use crate::error::{Error, Result};
use crate::models::span::{SpanRecord, TimeEvent};
use crate::models::wire::{LogRecord, Tag, WireSpan};

/// Width of a full trace identifier in hex characters (128 bits)
const TRACE_ID_HEX_WIDTH: usize = 32;

/// Converts finalized span records into their Jaeger wire representation
pub trait ConvertSpan: Send + Sync {
    /// Convert one span record into a wire span
    fn convert_span(&self, span: &SpanRecord) -> Result<WireSpan>;
}

/// Default [`ConvertSpan`] implementation
///
/// A pure mapping with no state beyond the injected identifier codec;
/// converting the same record twice yields identical wire output.
pub struct SpanConverter {
    codec: Arc<dyn IdentifierCodec>,
}

impl SpanConverter {
    /// Create a converter using the canonical [`HexCodec`]
    pub fn new() -> Self {
        Self::with_codec(Arc::new(HexCodec))
    }

    /// Create a converter with an injected identifier codec
    pub fn with_codec(codec: Arc<dyn IdentifierCodec>) -> Self {
        Self { codec }
    }

    /// Convert an ordered attribute set into wire tags, preserving order
    ///
    /// Every value is coerced to its string representation; a JSON string
    /// keeps its inner text, any other value uses its compact rendering.
    pub fn convert_tags(attributes: &[(String, Value)]) -> Vec<Tag> {
        attributes
            .iter()
            .map(|(key, value)| Tag::string(key, stringify(value)))
            .collect()
    }

    fn convert_logs(&self, events: &[TimeEvent]) -> Vec<LogRecord> {
        events
            .iter()
            .filter_map(|event| self.convert_time_event(event))
            .collect()
    }

    /// Map one time event to a wire log; kinds with no wire mapping yield no log
    fn convert_time_event(&self, event: &TimeEvent) -> Option<LogRecord> {
        match event {
            TimeEvent::Annotation {
                time,
                description,
                attributes,
            } => {
                let mut fields = Self::convert_tags(attributes);
                fields.push(Tag::string("description", description));
                Some(LogRecord {
                    timestamp: convert_timestamp(*time),
                    fields,
                })
            }
            TimeEvent::Message {
                time,
                kind,
                id,
                uncompressed_size,
                compressed_size,
            } => Some(LogRecord {
                timestamp: convert_timestamp(*time),
                fields: vec![
                    Tag::string("type", kind.as_str()),
                    Tag::string("id", id),
                    Tag::string("uncompressedSize", uncompressed_size.to_string()),
                    Tag::string("compressedSize", compressed_size.to_string()),
                ],
            }),
            TimeEvent::Other => None,
        }
    }

    /// Split a trace identifier into its high and low 64-bit halves
    ///
    /// The identifier is left-padded with `'0'` to 32 hex characters and
    /// overlong input is truncated from the left, keeping the
    /// least-significant 128 bits.
    fn split_trace_id(&self, hex: &str) -> Result<(i64, i64)> {
        if !hex.is_ascii() {
            return Err(Error::invalid_identifier(hex));
        }
        let window = if hex.len() >= TRACE_ID_HEX_WIDTH {
            hex[hex.len() - TRACE_ID_HEX_WIDTH..].to_string()
        } else {
            let mut padded = "0".repeat(TRACE_ID_HEX_WIDTH - hex.len());
            padded.push_str(hex);
            padded
        };
        let (high, low) = window.split_at(TRACE_ID_HEX_WIDTH / 2);
        Ok((self.codec.convert(high)?, self.codec.convert(low)?))
    }
}

impl Default for SpanConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertSpan for SpanConverter {
    fn convert_span(&self, span: &SpanRecord) -> Result<WireSpan> {
        let start_time = convert_timestamp(span.start_time);
        let end_time = convert_timestamp(span.end_time);
        let (trace_id_high, trace_id_low) = self.split_trace_id(&span.trace_id)?;

        Ok(WireSpan {
            trace_id_low,
            trace_id_high,
            span_id: self.codec.convert(&span.span_id)?,
            parent_span_id: self.codec.convert(&span.parent_span_id)?,
            operation_name: span.name.clone(),
            references: Vec::new(),
            flags: 0,
            start_time,
            duration: end_time - start_time,
            tags: Self::convert_tags(&span.attributes),
            logs: self.convert_logs(&span.time_events),
        })
    }
}

/// Timestamp as whole microseconds since the Unix epoch, truncated toward zero
fn convert_timestamp(time: DateTime<Utc>) -> i64 {
    time.timestamp_micros()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
