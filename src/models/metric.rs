// Aggregated metric records, the unit handed to a telemetry sink.

use serde::{Deserialize, Serialize};

use super::ContainerProperties;

/// Summary of one metric over a sample window.
///
/// `value` is the mean. For rate metrics `count` is the number of intervals
/// (samples - 1); for snapshot metrics it is the number of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub std: f64,
}

/// All metrics of one container for one report window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerMetrics {
    /// RFC 3339 time the batch was produced.
    pub timestamp: String,
    pub properties: ContainerProperties,
    pub metrics: Vec<MetricRecord>,
}
