//! Batch serialization for the agent wire protocol
//!
//! The agent consumes one-way `emitBatch(1: Batch batch)` calls encoded with
//! the Thrift compact protocol. The struct layouts below are fixed by
//! `jaeger.thrift`; changing a field id or type breaks backend
//! interoperability.

mod compact;

use crate::error::Result;
use crate::models::wire::{Batch, LogRecord, Process, SpanRef, Tag, WireSpan};

use compact::{ftype, CompactWriter, MESSAGE_TYPE_ONEWAY};

/// Serializes a wire batch into the byte payload of one datagram
pub trait SerializeBatch: Send + Sync {
    /// Produce the full message payload for one batch
    fn serialize(&self, batch: &Batch) -> Result<Vec<u8>>;
}

/// Thrift compact-protocol serializer for `agent.emitBatch`
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactSerializer;

impl SerializeBatch for CompactSerializer {
    fn serialize(&self, batch: &Batch) -> Result<Vec<u8>> {
        let mut writer = CompactWriter::new();
        writer.message_begin("emitBatch", MESSAGE_TYPE_ONEWAY, 0);

        // emitBatch_args { 1: Batch batch }
        writer.struct_begin();
        writer.field_begin(1, ftype::STRUCT);
        write_batch(&mut writer, batch);
        writer.struct_end();

        Ok(writer.into_bytes())
    }
}

/// Batch { 1: Process process, 2: list<Span> spans }
fn write_batch(writer: &mut CompactWriter, batch: &Batch) {
    writer.struct_begin();
    writer.field_begin(1, ftype::STRUCT);
    write_process(writer, &batch.process);
    writer.field_begin(2, ftype::LIST);
    writer.list_begin(ftype::STRUCT, batch.spans.len());
    for span in &batch.spans {
        write_span(writer, span);
    }
    writer.struct_end();
}

/// Process { 1: string serviceName, 2: list<Tag> tags }
fn write_process(writer: &mut CompactWriter, process: &Process) {
    writer.struct_begin();
    writer.field_begin(1, ftype::BINARY);
    writer.write_string(&process.service_name);
    writer.field_begin(2, ftype::LIST);
    writer.list_begin(ftype::STRUCT, process.tags.len());
    for tag in &process.tags {
        write_tag(writer, tag);
    }
    writer.struct_end();
}

/// Span, fields 1-11 per jaeger.thrift
fn write_span(writer: &mut CompactWriter, span: &WireSpan) {
    writer.struct_begin();
    writer.field_begin(1, ftype::I64);
    writer.write_i64(span.trace_id_low);
    writer.field_begin(2, ftype::I64);
    writer.write_i64(span.trace_id_high);
    writer.field_begin(3, ftype::I64);
    writer.write_i64(span.span_id);
    writer.field_begin(4, ftype::I64);
    writer.write_i64(span.parent_span_id);
    writer.field_begin(5, ftype::BINARY);
    writer.write_string(&span.operation_name);
    writer.field_begin(6, ftype::LIST);
    writer.list_begin(ftype::STRUCT, span.references.len());
    for reference in &span.references {
        write_span_ref(writer, reference);
    }
    writer.field_begin(7, ftype::I32);
    writer.write_i32(span.flags);
    writer.field_begin(8, ftype::I64);
    writer.write_i64(span.start_time);
    writer.field_begin(9, ftype::I64);
    writer.write_i64(span.duration);
    writer.field_begin(10, ftype::LIST);
    writer.list_begin(ftype::STRUCT, span.tags.len());
    for tag in &span.tags {
        write_tag(writer, tag);
    }
    writer.field_begin(11, ftype::LIST);
    writer.list_begin(ftype::STRUCT, span.logs.len());
    for log in &span.logs {
        write_log(writer, log);
    }
    writer.struct_end();
}

/// SpanRef { 1: SpanRefType refType, 2: i64 traceIdLow, 3: i64 traceIdHigh, 4: i64 spanId }
fn write_span_ref(writer: &mut CompactWriter, reference: &SpanRef) {
    writer.struct_begin();
    writer.field_begin(1, ftype::I32);
    writer.write_i32(reference.ref_type);
    writer.field_begin(2, ftype::I64);
    writer.write_i64(reference.trace_id_low);
    writer.field_begin(3, ftype::I64);
    writer.write_i64(reference.trace_id_high);
    writer.field_begin(4, ftype::I64);
    writer.write_i64(reference.span_id);
    writer.struct_end();
}

/// Tag { 1: string key, 2: TagType vType, 3: string vStr }
fn write_tag(writer: &mut CompactWriter, tag: &Tag) {
    writer.struct_begin();
    writer.field_begin(1, ftype::BINARY);
    writer.write_string(&tag.key);
    writer.field_begin(2, ftype::I32);
    writer.write_i32(tag.v_type.code());
    writer.field_begin(3, ftype::BINARY);
    writer.write_string(&tag.v_str);
    writer.struct_end();
}

/// Log { 1: i64 timestamp, 2: list<Tag> fields }
fn write_log(writer: &mut CompactWriter, log: &LogRecord) {
    writer.struct_begin();
    writer.field_begin(1, ftype::I64);
    writer.write_i64(log.timestamp);
    writer.field_begin(2, ftype::LIST);
    writer.list_begin(ftype::STRUCT, log.fields.len());
    for field in &log.fields {
        write_tag(writer, field);
    }
    writer.struct_end();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn empty_batch(service_name: &str) -> Batch {
        Batch {
            process: Process {
                service_name: service_name.to_string(),
                tags: Vec::new(),
            },
            spans: Vec::new(),
        }
    }

    #[test]
    fn test_empty_batch_golden_bytes() {
        let payload = CompactSerializer.serialize(&empty_batch("a")).unwrap();
        let expected: Vec<u8> = vec![
            0x82, 0x81, 0x00, // protocol id, version | oneway << 5, seq 0
            0x09, b'e', b'm', b'i', b't', b'B', b'a', b't', b'c', b'h',
            0x1C, // args field 1: struct (batch)
            0x1C, // batch field 1: struct (process)
            0x18, 0x01, b'a', // process field 1: serviceName "a"
            0x19, 0x0C, // process field 2: empty list<struct>
            0x00, // process stop
            0x19, 0x0C, // batch field 2: empty list<struct>
            0x00, // batch stop
            0x00, // args stop
        ];
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_tag_encoding() {
        let mut writer = CompactWriter::new();
        write_tag(&mut writer, &Tag::string("k", "v"));
        assert_eq!(
            writer.into_bytes(),
            vec![
                0x18, 0x01, b'k', // field 1: key
                0x15, 0x00, // field 2: vType STRING (0)
                0x18, 0x01, b'v', // field 3: vStr
                0x00, // stop
            ]
        );
    }

    #[test]
    fn test_span_ref_encoding() {
        let mut writer = CompactWriter::new();
        write_span_ref(
            &mut writer,
            &SpanRef {
                ref_type: 0,
                trace_id_low: 1,
                trace_id_high: 0,
                span_id: -1,
            },
        );
        assert_eq!(
            writer.into_bytes(),
            vec![0x15, 0x00, 0x16, 0x02, 0x16, 0x00, 0x16, 0x01, 0x00]
        );
    }

    #[test]
    fn test_span_fields_in_wire_order() {
        let span = WireSpan {
            trace_id_low: 5678,
            trace_id_high: 1234,
            span_id: 9012,
            parent_span_id: 3456,
            operation_name: "main".to_string(),
            references: Vec::new(),
            flags: 0,
            start_time: 0,
            duration: 1234,
            tags: Vec::new(),
            logs: Vec::new(),
        };
        let mut writer = CompactWriter::new();
        write_span(&mut writer, &span);
        let bytes = writer.into_bytes();

        // field 1 (traceIdLow) first, zigzag(5678) = 11356 = varint DC 58
        assert_eq!(&bytes[..3], &[0x16, 0xDC, 0x58]);
        // operation name appears length-prefixed after the four id fields
        let name_at = bytes
            .windows(5)
            .position(|w| w == [0x04, b'm', b'a', b'i', b'n'])
            .unwrap();
        assert_eq!(bytes[name_at - 1], 0x18); // field 5: binary
        assert_eq!(*bytes.last().unwrap(), 0x00);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let mut batch = empty_batch("svc");
        batch.process.tags.push(Tag::string("region", "eu"));
        let first = CompactSerializer.serialize(&batch).unwrap();
        let second = CompactSerializer.serialize(&batch).unwrap();
        assert_eq!(first, second);
    }
}
