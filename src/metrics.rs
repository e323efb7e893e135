//! Prometheus metrics registry and instruments

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: Gauge,
    pub http_request_duration_seconds: Histogram,
    pub scripts_generated_total: IntCounter,
    pub pseudocode_generated_total: IntCounter,
    pub exports_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounter::new(
            "http_requests_total",
            "Total number of HTTP requests handled",
        )?;
        let http_requests_in_flight = Gauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being handled",
        )?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let scripts_generated_total = IntCounter::new(
            "scripts_generated_total",
            "Total number of strategy scripts generated",
        )?;
        let pseudocode_generated_total = IntCounter::new(
            "pseudocode_generated_total",
            "Total number of pseudocode documents generated",
        )?;
        let exports_total =
            IntCounter::new("exports_total", "Total number of strategy JSON exports")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(scripts_generated_total.clone()))?;
        registry.register(Box::new(pseudocode_generated_total.clone()))?;
        registry.register(Box::new(exports_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            scripts_generated_total,
            pseudocode_generated_total,
            exports_total,
        })
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
