//! # Traceport
//!
//! UDP span exporter for Jaeger-compatible tracing backends.
//!
//! Traceport converts finalized, immutable span records into the agent's
//! Thrift-compact wire format and ships them over UDP, best effort, one
//! synchronous export per call.
//!
//! ## Architecture
//!
//! - **Codec**: hex identifier strings to signed 64-bit wire identifiers,
//!   with exact two's-complement wrap semantics
//! - **Converter**: span records to wire spans, tags, and logs
//! - **Router**: span-name prefix routing to per-service batches
//! - **Transport**: compact-protocol serialization and single-datagram sends
//!
//! ## Quick Start
//!
//! ```no_run
//! use traceport::{ExporterConfig, JaegerExporter};
//! use traceport::models::SpanRecord;
//!
//! let exporter = JaegerExporter::new(&ExporterConfig::new("my-service"))?;
//! let spans = vec![SpanRecord::new("handle_request", "aaa", "bbb")];
//! let delivered = exporter.export(&spans)?;
//! # Ok::<(), traceport::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod models;
pub mod route;
pub mod transport;
pub mod wire;

pub use config::ExporterConfig;
pub use error::{Error, Result};
pub use export::JaegerExporter;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::codec::{HexCodec, IdentifierCodec};
    pub use crate::config::{AgentConfig, ExporterConfig};
    pub use crate::convert::{ConvertSpan, SpanConverter};
    pub use crate::error::{Error, Result};
    pub use crate::export::JaegerExporter;
    pub use crate::models::*;
    pub use crate::route::ServiceRouter;
    pub use crate::transport::{EmitBatch, UdpTransport, MAX_DATAGRAM_BYTES};
    pub use crate::wire::{CompactSerializer, SerializeBatch};
}
