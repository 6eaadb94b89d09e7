//! Export entry point
//!
//! Ties the router, converter, and transport together: one synchronous,
//! independent export per call, no queue, no retained state beyond the
//! static configuration captured at construction.

use tracing::{debug, warn};

use crate::config::ExporterConfig;
use crate::convert::{ConvertSpan, SpanConverter};
use crate::error::Result;
use crate::models::span::SpanRecord;
use crate::models::wire::{Batch, Process, Tag};
use crate::route::ServiceRouter;
use crate::transport::{EmitBatch, UdpTransport};

/// Exports finalized spans to a Jaeger-compatible agent over UDP
pub struct JaegerExporter {
    router: ServiceRouter,
    converter: Box<dyn ConvertSpan>,
    transport: Box<dyn EmitBatch>,
    process_tags: Vec<Tag>,
}

impl JaegerExporter {
    /// Create an exporter from configuration
    pub fn new(config: &ExporterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            router: ServiceRouter::new(&config.service_name, &config.routing),
            converter: Box::new(SpanConverter::new()),
            transport: Box::new(UdpTransport::new(
                config.agent.host.clone(),
                config.agent.port,
            )),
            process_tags: SpanConverter::convert_tags(&config.tags),
        })
    }

    /// Replace the transport (testing, alternative delivery)
    #[must_use]
    pub fn with_transport(mut self, transport: Box<dyn EmitBatch>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the span converter (testing, alternative codecs)
    #[must_use]
    pub fn with_converter(mut self, converter: Box<dyn ConvertSpan>) -> Self {
        self.converter = converter;
        self
    }

    /// Export a list of finalized spans
    ///
    /// Spans are partitioned into per-service batches and each batch is
    /// emitted independently. Returns `Ok(false)` without touching the
    /// transport when `spans` is empty, `Ok(true)` once every batch has been
    /// handed off. Transport and conversion failures surface as errors; no
    /// retry is attempted and failed spans are discarded.
    pub fn export(&self, spans: &[SpanRecord]) -> Result<bool> {
        if spans.is_empty() {
            debug!("No spans to export");
            return Ok(false);
        }

        let mut all_delivered = true;
        for (service_name, bucket) in self.router.route(spans) {
            let wire_spans = bucket
                .iter()
                .map(|span| self.converter.convert_span(span))
                .collect::<Result<Vec<_>>>()?;

            let batch = Batch {
                process: Process {
                    service_name: service_name.clone(),
                    tags: self.process_tags.clone(),
                },
                spans: wire_spans,
            };

            debug!(
                "Exporting {} spans for service {}",
                batch.spans.len(),
                service_name
            );
            if !self.transport.emit_batch(&batch)? {
                warn!("Batch for service {} was not delivered", service_name);
                all_delivered = false;
            }
        }
        Ok(all_delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Transport double recording every batch it is handed
    struct RecordingTransport {
        batches: Mutex<Vec<Batch>>,
        fail_with_partial_send: bool,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                fail_with_partial_send: false,
            }
        }

        fn failing() -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                fail_with_partial_send: true,
            }
        }
    }

    impl EmitBatch for RecordingTransport {
        fn emit_batch(&self, batch: &Batch) -> Result<bool> {
            self.batches.lock().unwrap().push(batch.clone());
            if self.fail_with_partial_send {
                return Err(Error::PartialSend {
                    sent: 1,
                    expected: 2,
                });
            }
            Ok(true)
        }
    }

    fn exporter_with(config: ExporterConfig, transport: &std::sync::Arc<SharedTransport>) -> JaegerExporter {
        JaegerExporter::new(&config)
            .unwrap()
            .with_transport(Box::new(std::sync::Arc::clone(transport)))
    }

    /// Arc wrapper so tests can keep a handle on the transport double
    type SharedTransport = RecordingTransport;

    impl EmitBatch for std::sync::Arc<SharedTransport> {
        fn emit_batch(&self, batch: &Batch) -> Result<bool> {
            self.as_ref().emit_batch(batch)
        }
    }

    #[test]
    fn test_empty_export_reports_false_without_sending() {
        let transport = std::sync::Arc::new(RecordingTransport::new());
        let exporter = exporter_with(ExporterConfig::new("test-agent"), &transport);

        assert_eq!(exporter.export(&[]).unwrap(), false);
        assert!(transport.batches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_exports_single_batch() {
        let transport = std::sync::Arc::new(RecordingTransport::new());
        let mut config = ExporterConfig::new("test-agent");
        config.tags = vec![("asdf".to_string(), serde_json::json!("qwer"))];
        let exporter = exporter_with(config, &transport);

        let spans = vec![SpanRecord::new("span-name", "aaa", "bbb")];
        assert!(exporter.export(&spans).unwrap());

        let batches = transport.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].process.service_name, "test-agent");
        assert_eq!(batches[0].process.tags, vec![Tag::string("asdf", "qwer")]);
        assert_eq!(batches[0].spans.len(), 1);
        assert_eq!(batches[0].spans[0].span_id, 3003);
    }

    #[test]
    fn test_routing_produces_one_batch_per_service() {
        let transport = std::sync::Arc::new(RecordingTransport::new());
        let mut config = ExporterConfig::new("app");
        config.routing = vec![
            ("PDO".to_string(), "app_db".to_string()),
            ("Predis".to_string(), "app_redis".to_string()),
        ];
        let exporter = exporter_with(config, &transport);

        let spans = vec![
            SpanRecord::new("PDO::query", "aaa", "b1"),
            SpanRecord::new("Mongo::find", "aaa", "b2"),
            SpanRecord::new("PDO::exec", "aaa", "b3"),
        ];
        assert!(exporter.export(&spans).unwrap());

        let batches = transport.batches.lock().unwrap();
        let services: Vec<&str> = batches
            .iter()
            .map(|b| b.process.service_name.as_str())
            .collect();
        assert_eq!(services, vec!["app_db", "app"]);
        assert_eq!(batches[0].spans.len(), 2);
        assert_eq!(batches[1].spans.len(), 1);
    }

    #[test]
    fn test_send_failure_surfaces_and_stops() {
        let transport = std::sync::Arc::new(RecordingTransport::failing());
        let mut config = ExporterConfig::new("app");
        config.routing = vec![("PDO".to_string(), "app_db".to_string())];
        let exporter = exporter_with(config, &transport);

        let spans = vec![
            SpanRecord::new("PDO::query", "aaa", "b1"),
            SpanRecord::new("Mongo::find", "aaa", "b2"),
        ];
        let result = exporter.export(&spans);
        assert!(matches!(result, Err(Error::PartialSend { .. })));
        // The failing bucket was attempted exactly once; nothing is retried.
        assert_eq!(transport.batches.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_identifier_surfaces() {
        let transport = std::sync::Arc::new(RecordingTransport::new());
        let exporter = exporter_with(ExporterConfig::new("app"), &transport);

        let spans = vec![SpanRecord::new("span-name", "not-hex!", "bbb")];
        assert!(matches!(
            exporter.export(&spans),
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(transport.batches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_empty_service_name() {
        assert!(JaegerExporter::new(&ExporterConfig::default()).is_err());
    }
}
