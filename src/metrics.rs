//! Prometheus exposition over the default registry. The counters themselves
//! live next to the code they count, in the services.

use prometheus::{Encoder, TextEncoder};

/// Renders all registered metrics in the Prometheus text format.
pub async fn metrics_handler() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
