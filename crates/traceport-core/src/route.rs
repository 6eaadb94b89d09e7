//! Prefix-based routing of spans to logical service names
//!
//! Large applications often want database or cache spans attributed to a
//! separate logical service. The router partitions spans by span-name prefix;
//! matching is strictly first-match-wins in configuration order, never
//! longest-prefix-first.

use crate::models::span::SpanRecord;

/// Reserved routing key naming the fallback service
///
/// The entry under this key carries the fallback service name; it never
/// participates in prefix matching.
pub const DEFAULT_PREFIX_KEY: &str = "_default_";

/// Partitions spans into per-service buckets by span-name prefix
#[derive(Debug, Clone)]
pub struct ServiceRouter {
    default_service: String,
    prefixes: Vec<(String, String)>,
}

impl ServiceRouter {
    /// Create a router for the given fallback service
    ///
    /// `routing` is an ordered list of `(prefix, service name)` pairs. An
    /// entry keyed [`DEFAULT_PREFIX_KEY`] overrides the fallback service name
    /// instead of acting as a prefix.
    pub fn new(default_service: impl Into<String>, routing: &[(String, String)]) -> Self {
        let mut default_service = default_service.into();
        let mut prefixes = Vec::with_capacity(routing.len());
        for (prefix, service) in routing {
            if prefix == DEFAULT_PREFIX_KEY {
                default_service = service.clone();
            } else {
                prefixes.push((prefix.clone(), service.clone()));
            }
        }
        Self {
            default_service,
            prefixes,
        }
    }

    /// Logical service name for a span name
    ///
    /// The first configured prefix that matches wins (byte-wise,
    /// case-sensitive); unmatched names go to the fallback service.
    pub fn service_for(&self, span_name: &str) -> &str {
        self.prefixes
            .iter()
            .find(|(prefix, _)| span_name.starts_with(prefix.as_str()))
            .map_or(self.default_service.as_str(), |(_, service)| service)
    }

    /// Partition spans into per-service buckets
    ///
    /// Buckets appear in first-use order and empty buckets are omitted; with
    /// no configured prefixes this degenerates to a single fallback bucket.
    pub fn route<'a>(&self, spans: &'a [SpanRecord]) -> Vec<(String, Vec<&'a SpanRecord>)> {
        let mut buckets: Vec<(String, Vec<&'a SpanRecord>)> = Vec::new();
        for span in spans {
            let service = self.service_for(&span.name);
            match buckets.iter_mut().find(|(name, _)| name == service) {
                Some((_, bucket)) => bucket.push(span),
                None => buckets.push((service.to_string(), vec![span])),
            }
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn routing(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(p, s)| (p.to_string(), s.to_string()))
            .collect()
    }

    fn named_spans(names: &[&str]) -> Vec<SpanRecord> {
        names
            .iter()
            .map(|name| SpanRecord::new(*name, "aaa", "bbb"))
            .collect()
    }

    fn bucket_names<'a>(buckets: &'a [(String, Vec<&SpanRecord>)]) -> Vec<&'a str> {
        buckets.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_prefix_routing() {
        let router = ServiceRouter::new(
            "app",
            &routing(&[("PDO", "app_db"), ("Predis", "app_redis")]),
        );
        let spans = named_spans(&["PDO::query", "Mongo::find", "Predis::get"]);

        let buckets = router.route(&spans);
        assert_eq!(bucket_names(&buckets), vec!["app_db", "app", "app_redis"]);
        assert_eq!(buckets[0].1[0].name, "PDO::query");
        assert_eq!(buckets[1].1[0].name, "Mongo::find");
        assert_eq!(buckets[2].1[0].name, "Predis::get");
    }

    #[test]
    fn test_empty_buckets_omitted() {
        let router = ServiceRouter::new("app", &routing(&[("PDO", "app_db")]));
        let spans = named_spans(&["Mongo::find"]);

        let buckets = router.route(&spans);
        assert_eq!(bucket_names(&buckets), vec!["app"]);
    }

    #[test]
    fn test_first_match_wins_in_configuration_order() {
        let router = ServiceRouter::new(
            "app",
            &routing(&[("PDO", "app_db"), ("PDO::query", "app_queries")]),
        );
        // Configuration order decides, not longest prefix.
        assert_eq!(router.service_for("PDO::query"), "app_db");
    }

    #[test]
    fn test_no_routing_degenerates_to_single_bucket() {
        let router = ServiceRouter::new("app", &[]);
        let spans = named_spans(&["PDO::query", "Mongo::find"]);

        let buckets = router.route(&spans);
        assert_eq!(bucket_names(&buckets), vec!["app"]);
        assert_eq!(buckets[0].1.len(), 2);
    }

    #[test]
    fn test_reserved_key_overrides_fallback_but_never_matches() {
        let router = ServiceRouter::new(
            "app",
            &routing(&[(DEFAULT_PREFIX_KEY, "app_fallback"), ("PDO", "app_db")]),
        );
        // A span whose name literally starts with the reserved key still
        // falls through to the fallback service.
        assert_eq!(router.service_for("_default_op"), "app_fallback");
        assert_eq!(router.service_for("Mongo::find"), "app_fallback");
        assert_eq!(router.service_for("PDO::query"), "app_db");
    }

    #[test]
    fn test_two_prefixes_sharing_a_service_merge() {
        let router = ServiceRouter::new(
            "app",
            &routing(&[("PDO", "app_db"), ("Doctrine", "app_db")]),
        );
        let spans = named_spans(&["PDO::query", "Doctrine::flush"]);

        let buckets = router.route(&spans);
        assert_eq!(bucket_names(&buckets), vec!["app_db"]);
        assert_eq!(buckets[0].1.len(), 2);
    }
}
