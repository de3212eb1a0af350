//! Prometheus request metrics.
//!
//! - `pix_http_requests_total{method,path,status}`
//! - `pix_http_request_duration_seconds{method,path}`

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("pix_http_requests_total", "Total HTTP requests received"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "pix_http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self { registry, requests_total, request_duration })
    }

    pub fn observe(&self, method: &str, path: &str, status: u16, seconds: f64) {
        self.requests_total
            .with_label_values(&[method, path, &status.to_string()])
            .inc();
        self.request_duration
            .with_label_values(&[method, path])
            .observe(seconds);
    }

    /// Text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_requests_are_exported() {
        let metrics = Metrics::new().unwrap();
        metrics.observe("POST", "/api/generate", 200, 0.012);
        metrics.observe("POST", "/api/generate", 200, 0.020);
        metrics.observe("GET", "/health", 200, 0.001);

        let text = metrics.export().unwrap();
        assert!(text.contains(
            r#"pix_http_requests_total{method="POST",path="/api/generate",status="200"} 2"#
        ));
        assert!(text.contains("pix_http_request_duration_seconds_bucket"));
    }
}
