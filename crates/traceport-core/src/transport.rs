//! Best-effort UDP delivery to the agent
//!
//! One synchronous datagram send per batch, fire-and-forget: a true result
//! means "handed to the kernel socket buffer", never "received by the
//! backend". There is no retry, no acknowledgment, and no backpressure.

use std::net::UdpSocket;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::wire::Batch;
use crate::wire::{CompactSerializer, SerializeBatch};

/// Practical ceiling for a single IPv4 UDP payload, in bytes
pub const MAX_DATAGRAM_BYTES: usize = 65_507;

/// Hands a wire batch to a delivery mechanism
pub trait EmitBatch: Send + Sync {
    /// Deliver one batch; `Ok(true)` once the payload has been handed off
    fn emit_batch(&self, batch: &Batch) -> Result<bool>;
}

/// UDP datagram transport for serialized batches
///
/// Each call serializes the batch and sends it as a single datagram from a
/// socket scoped to that call; the socket is released on every exit path.
/// A batch that serializes past [`MAX_DATAGRAM_BYTES`] is rejected rather
/// than split: one compact-protocol message spread across datagrams cannot
/// be reassembled by a stateless receiver.
pub struct UdpTransport {
    host: String,
    port: u16,
    serializer: Box<dyn SerializeBatch>,
}

impl UdpTransport {
    /// Create a transport targeting `host:port` with the compact serializer
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_serializer(host, port, Box::new(CompactSerializer))
    }

    /// Create a transport with an injected serializer
    pub fn with_serializer(
        host: impl Into<String>,
        port: u16,
        serializer: Box<dyn SerializeBatch>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            serializer,
        }
    }
}

impl EmitBatch for UdpTransport {
    fn emit_batch(&self, batch: &Batch) -> Result<bool> {
        let payload = self.serializer.serialize(batch)?;
        if payload.len() > MAX_DATAGRAM_BYTES {
            return Err(Error::OversizedPayload {
                size: payload.len(),
                max: MAX_DATAGRAM_BYTES,
            });
        }

        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        let sent = socket.send_to(&payload, (self.host.as_str(), self.port))?;
        if sent != payload.len() {
            return Err(Error::PartialSend {
                sent,
                expected: payload.len(),
            });
        }

        debug!(
            "Sent {} byte batch for service {} to {}:{}",
            sent, batch.process.service_name, self.host, self.port
        );
        Ok(true)
    }
}
