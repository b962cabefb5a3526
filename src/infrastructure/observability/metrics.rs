//! Prometheus metrics for HTTP traffic and registration outcomes

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

pub const REGISTRATIONS_TOTAL: &str = "registrations_total";
pub const REGISTRATION_DURATION: &str = "registration_duration_seconds";
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Route label for requests that matched no route
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Rendered by the `/metrics` endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the global Prometheus recorder
///
/// Returns `None` when metrics are disabled or a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let installed = builder(config).and_then(|builder| builder.install_recorder());

    match installed {
        Ok(handle) => {
            gauge!("matcha_accounts_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn builder(config: &MetricsConfig) -> Result<PrometheusBuilder, BuildError> {
    let builder = PrometheusBuilder::new();

    if config.registration_buckets.is_empty() {
        return Ok(builder);
    }

    builder.set_buckets_for_metric(
        Matcher::Full(REGISTRATION_DURATION.to_string()),
        &config.registration_buckets,
    )
}

pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Count and time one HTTP exchange, labelled by route pattern
pub fn record_http_request(method: &str, route: Option<&str>, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.unwrap_or(UNMATCHED_ROUTE).to_string()),
        ("status", status.to_string()),
    ];

    counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(HTTP_REQUEST_DURATION, &labels).record(duration.as_secs_f64());
}

/// Count and time the terminal outcome of a registration attempt
pub fn record_registration(outcome: &'static str, duration: Duration) {
    counter!(REGISTRATIONS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(REGISTRATION_DURATION, "outcome" => outcome).record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_metrics_install_nothing() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };

        assert!(init_metrics(&config).is_none());
    }

    #[test]
    fn test_builder_accepts_default_and_empty_buckets() {
        assert!(builder(&MetricsConfig::default()).is_ok());

        let config = MetricsConfig {
            registration_buckets: Vec::new(),
            ..MetricsConfig::default()
        };
        assert!(builder(&config).is_ok());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_http_request("POST", Some("/auth/register"), 200, Duration::from_millis(3));
        record_http_request("GET", None, 404, Duration::from_millis(1));
        record_registration("success", Duration::from_millis(3));
    }
}
