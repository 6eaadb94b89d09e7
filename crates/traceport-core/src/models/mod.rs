//! Data models
//!
//! [`span`] holds the finalized records handed over by the tracing SDK;
//! [`wire`] holds the Jaeger Thrift shapes they are converted into.

pub mod span;
pub mod wire;

pub use span::{MessageEventKind, SpanRecord, TimeEvent};
pub use wire::{Batch, LogRecord, Process, SpanRef, Tag, TagType, WireSpan};
