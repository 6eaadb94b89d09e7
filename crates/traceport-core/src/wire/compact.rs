//! Thrift compact protocol writer
//!
//! Only the writer side, and only the subset the agent message needs: struct,
//! list, i32/i64, and binary fields. Field identifiers are delta-encoded
//! against the previous field of the enclosing struct; integers are
//! zigzag-encoded then written as LEB128 varints.

use bytes::{BufMut, BytesMut};

/// Compact protocol identifier, first byte of every message
const PROTOCOL_ID: u8 = 0x82;
/// Compact protocol version, low five bits of the second byte
const VERSION: u8 = 0x01;
/// Message type occupies the top three bits of the second byte
const TYPE_SHIFT: u8 = 5;
/// Marks the end of a struct's fields
const FIELD_STOP: u8 = 0x00;

/// Compact type codes used in field headers and list headers
pub(crate) mod ftype {
    /// Zigzag varint 32-bit integer
    pub const I32: u8 = 0x05;
    /// Zigzag varint 64-bit integer
    pub const I64: u8 = 0x06;
    /// Length-prefixed bytes
    pub const BINARY: u8 = 0x08;
    /// Length-and-type-prefixed list
    pub const LIST: u8 = 0x09;
    /// Nested struct
    pub const STRUCT: u8 = 0x0C;
}

/// Thrift message type for calls that expect no response
pub(crate) const MESSAGE_TYPE_ONEWAY: u8 = 4;

/// Incremental writer for one compact-protocol message
pub(crate) struct CompactWriter {
    buf: BytesMut,
    field_stack: Vec<i16>,
    last_field_id: i16,
}

impl CompactWriter {
    pub(crate) fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(512),
            field_stack: Vec::new(),
            last_field_id: 0,
        }
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf.freeze().to_vec()
    }

    /// Write the message envelope: protocol id, version/type, sequence id, name
    pub(crate) fn message_begin(&mut self, name: &str, message_type: u8, sequence_id: u32) {
        self.buf.put_u8(PROTOCOL_ID);
        self.buf.put_u8(VERSION | (message_type << TYPE_SHIFT));
        self.write_varint(u64::from(sequence_id));
        self.write_string(name);
    }

    pub(crate) fn struct_begin(&mut self) {
        self.field_stack.push(self.last_field_id);
        self.last_field_id = 0;
    }

    pub(crate) fn struct_end(&mut self) {
        self.buf.put_u8(FIELD_STOP);
        self.last_field_id = self.field_stack.pop().unwrap_or(0);
    }

    /// Write a field header; short form packs the id delta into the type byte
    pub(crate) fn field_begin(&mut self, id: i16, field_type: u8) {
        let delta = id - self.last_field_id;
        if (1..=15).contains(&delta) {
            #[allow(clippy::cast_sign_loss)]
            self.buf.put_u8(((delta as u8) << 4) | field_type);
        } else {
            self.buf.put_u8(field_type);
            self.write_varint(u64::from(zigzag32(i32::from(id))));
        }
        self.last_field_id = id;
    }

    pub(crate) fn write_i32(&mut self, value: i32) {
        self.write_varint(u64::from(zigzag32(value)));
    }

    pub(crate) fn write_i64(&mut self, value: i64) {
        self.write_varint(zigzag64(value));
    }

    pub(crate) fn write_string(&mut self, value: &str) {
        self.write_varint(value.len() as u64);
        self.buf.put_slice(value.as_bytes());
    }

    /// Write a list header; short form packs sizes below 15 into the type byte
    pub(crate) fn list_begin(&mut self, element_type: u8, size: usize) {
        if size < 15 {
            #[allow(clippy::cast_possible_truncation)]
            self.buf.put_u8(((size as u8) << 4) | element_type);
        } else {
            self.buf.put_u8(0xF0 | element_type);
            self.write_varint(size as u64);
        }
    }

    fn write_varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.put_u8(byte);
                break;
            }
            self.buf.put_u8(byte | 0x80);
        }
    }
}

fn zigzag32(value: i32) -> u32 {
    (value.wrapping_shl(1) ^ (value >> 31)) as u32
}

fn zigzag64(value: i64) -> u64 {
    (value.wrapping_shl(1) ^ (value >> 63)) as u64
}
