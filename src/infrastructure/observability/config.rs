use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// `[observability.metrics]`
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Route serving the Prometheus exposition
    #[serde(default = "default_path")]
    pub path: String,
    /// Histogram buckets, in seconds, for registration latency
    ///
    /// An empty list keeps the exporter's default summaries.
    #[serde(default = "default_registration_buckets")]
    pub registration_buckets: Vec<f64>,
}

fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/metrics".to_string()
}

fn default_registration_buckets() -> Vec<f64> {
    vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_path(),
            registration_buckets: default_registration_buckets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ObservabilityConfig::default();

        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.path, "/metrics");
        assert_eq!(config.metrics.registration_buckets.len(), 9);
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: MetricsConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();

        assert!(!config.enabled);
        assert_eq!(config.path, "/metrics");
        assert!(!config.registration_buckets.is_empty());
    }
}
