//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Database connection pool stats
//! - Publication counters (listings published, import row outcomes)

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace("mercado_server"),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace("mercado_server")
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Publications counter by type (listing, property, menu_item)
pub static PUBLICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("publications_total", "Publications created, by type")
            .namespace("mercado_server"),
        &["type"],
    )
    .expect("Failed to create PUBLICATIONS_TOTAL metric")
});

/// Bulk import row counter by outcome (imported, skipped)
pub static IMPORT_ROWS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("import_rows_total", "Bulk import rows processed, by outcome")
            .namespace("mercado_server"),
        &["outcome"],
    )
    .expect("Failed to create IMPORT_ROWS_TOTAL metric")
});

/// Database connection pool stats
pub static DB_POOL_CONNECTIONS: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new("db_pool_connections", "Database connection pool statistics")
            .namespace("mercado_server"),
        &["state"], // "idle", "active", "max"
    )
    .expect("Failed to create DB_POOL_CONNECTIONS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(PUBLICATIONS_TOTAL.clone()))
        .expect("Failed to register PUBLICATIONS_TOTAL");
    registry
        .register(Box::new(IMPORT_ROWS_TOTAL.clone()))
        .expect("Failed to register IMPORT_ROWS_TOTAL");
    registry
        .register(Box::new(DB_POOL_CONNECTIONS.clone()))
        .expect("Failed to register DB_POOL_CONNECTIONS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to count a created publication
pub fn record_publication(publication_type: &str) {
    PUBLICATIONS_TOTAL
        .with_label_values(&[publication_type])
        .inc();
}

/// Helper to count bulk import row outcomes
pub fn record_import_rows(imported: u64, skipped: u64) {
    IMPORT_ROWS_TOTAL
        .with_label_values(&["imported"])
        .inc_by(imported);
    IMPORT_ROWS_TOTAL
        .with_label_values(&["skipped"])
        .inc_by(skipped);
}

/// Helper to update database pool stats
pub fn update_db_pool_stats(idle: u32, active: u32, max: u32) {
    DB_POOL_CONNECTIONS
        .with_label_values(&["idle"])
        .set(idle as f64);
    DB_POOL_CONNECTIONS
        .with_label_values(&["active"])
        .set(active as f64);
    DB_POOL_CONNECTIONS
        .with_label_values(&["max"])
        .set(max as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Force lazy initialization
        let _ = &*REGISTRY;
        let _ = &*HTTP_REQUESTS_TOTAL;
        let _ = &*HTTP_REQUEST_DURATION_SECONDS;
        let _ = &*PUBLICATIONS_TOTAL;
        let _ = &*IMPORT_ROWS_TOTAL;
    }

    #[test]
    fn test_gather_metrics() {
        let metrics = gather_metrics();
        assert!(!metrics.is_empty());
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/health", 200, 0.001);
        let metrics = gather_metrics();
        assert!(metrics.contains("http_requests_total"));
    }

    #[test]
    fn test_record_import_rows() {
        record_import_rows(3, 1);
        let metrics = gather_metrics();
        assert!(metrics.contains("import_rows_total"));
    }
}
