// Application config: TOML file, validated on load.

use crate::convert::MetricScaling;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub docker: DockerConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub metrics: MetricScaling,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DockerConfig {
    /// Reported as the "Docker host" property. Falls back to $HOSTNAME.
    pub host: Option<String>,
}

impl DockerConfig {
    pub fn host_name(&self) -> String {
        self.host
            .clone()
            .or_else(|| std::env::var("HOSTNAME").ok())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "localhost".into())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub report_interval_secs: u64,
    /// Per-container cap on buffered samples between reports; oldest are dropped first.
    pub max_window_samples: usize,
    /// How often to log collector stats at INFO level.
    pub stats_log_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// JSON-lines file to append metrics to. Stdout when unset.
    pub path: Option<String>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path.as_ref())?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.docker.host.as_deref().is_none_or(|h| !h.is_empty()),
            "docker.host must be non-empty when set"
        );
        anyhow::ensure!(
            self.monitoring.report_interval_secs > 0,
            "monitoring.report_interval_secs must be > 0, got {}",
            self.monitoring.report_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.max_window_samples >= 2,
            "monitoring.max_window_samples must be >= 2, got {}",
            self.monitoring.max_window_samples
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.metrics.cpu_core_multiplier.is_finite() && self.metrics.cpu_core_multiplier > 0.0,
            "metrics.cpu_core_multiplier must be > 0, got {}",
            self.metrics.cpu_core_multiplier
        );
        anyhow::ensure!(
            self.metrics.byte_rate_divisor.is_finite() && self.metrics.byte_rate_divisor > 0.0,
            "metrics.byte_rate_divisor must be > 0, got {}",
            self.metrics.byte_rate_divisor
        );
        anyhow::ensure!(
            self.output.path.as_deref().is_none_or(|p| !p.is_empty()),
            "output.path must be non-empty when set"
        );
        Ok(())
    }
}
