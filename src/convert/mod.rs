// Docker stats -> telemetry metrics.
// Pure functions over already-collected samples; no I/O, no shared state.

mod error;
mod summary;

pub use error::PreconditionViolation;

use crate::models::{ContainerProperties, InspectRecord, MetricRecord, RawStat, Sample};
use serde::{Deserialize, Serialize};
use summary::Summary;

pub const CPU_METRIC: &str = "% Processor Time";
pub const AVAILABLE_MEMORY_METRIC: &str = "Available Bytes";
pub const RX_BYTES_METRIC: &str = "Docker RX Bytes";
pub const TX_BYTES_METRIC: &str = "Docker TX Bytes";
pub const BLKIO_BYTES_METRIC: &str = "Docker Blkio Bytes";

/// Blkio op whose value is the sum over all read/write/sync/async ops.
const BLKIO_TOTAL_OP: &str = "Total";

const MIN_RATE_SAMPLES: usize = 2;
const MIN_SNAPSHOT_SAMPLES: usize = 2;

/// Unit constants applied on top of the raw counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricScaling {
    /// Multiplies CPU percent (Docker's `online_cpus` factor). 1.0 reports share of the host.
    pub cpu_core_multiplier: f64,
    /// Divides byte rates. 1.0 reports bytes per second.
    pub byte_rate_divisor: f64,
}

impl Default for MetricScaling {
    fn default() -> Self {
        Self {
            cpu_core_multiplier: 1.0,
            byte_rate_divisor: 1.0,
        }
    }
}

/// Value of the `"Total"` entry of `blkio_stats.io_service_bytes_recursive`, or 0 if absent.
pub fn get_total_blkio(stat: &RawStat) -> u64 {
    stat.blkio_stats
        .io_service_bytes_recursive
        .iter()
        .find(|e| e.op == BLKIO_TOTAL_OP)
        .map_or(0, |e| e.value)
}

/// Mean/min/max/std of the per-second rate of `value_fn` between consecutive samples.
/// Needs at least two samples; `count` is the number of intervals.
///
/// Timestamps must be strictly increasing. Equal timestamps yield non-finite rates.
pub fn get_per_second_metric<T, F>(
    name: &str,
    value_fn: F,
    samples: &[Sample<T>],
) -> Result<MetricRecord, PreconditionViolation>
where
    F: Fn(&T) -> f64,
{
    interval_metric(name, samples, |prev, cur| {
        (value_fn(&cur.stat) - value_fn(&prev.stat)) / (cur.timestamp - prev.timestamp)
    })
}

/// Mean/min/max/std of `value_fn` applied to each sample; `count` is the number of samples.
pub fn get_simple_metric<T, F>(
    name: &str,
    value_fn: F,
    samples: &[Sample<T>],
) -> Result<MetricRecord, PreconditionViolation>
where
    F: Fn(&T) -> f64,
{
    check_name(name)?;
    check_len(name, samples.len(), MIN_SNAPSHOT_SAMPLES)?;
    let values: Vec<f64> = samples.iter().map(|s| value_fn(&s.stat)).collect();
    to_record(name, &values, MIN_SNAPSHOT_SAMPLES)
}

/// CPU busy percent per interval: Δtotal_usage / Δsystem_cpu_usage * 100.
pub fn get_cpu_metric(samples: &[Sample<RawStat>]) -> Result<MetricRecord, PreconditionViolation> {
    get_cpu_metric_scaled(samples, MetricScaling::default().cpu_core_multiplier)
}

/// Same as [`get_cpu_metric`] with an explicit core multiplier.
pub fn get_cpu_metric_scaled(
    samples: &[Sample<RawStat>],
    cpu_core_multiplier: f64,
) -> Result<MetricRecord, PreconditionViolation> {
    interval_metric(CPU_METRIC, samples, |prev, cur| {
        let (prev, cur) = (&prev.stat.cpu_stats, &cur.stat.cpu_stats);
        let cpu_delta = counter_delta(prev.cpu_usage.total_usage, cur.cpu_usage.total_usage);
        let system_delta = counter_delta(prev.system_cpu_usage, cur.system_cpu_usage);
        cpu_delta / system_delta * 100.0 * cpu_core_multiplier
    })
}

/// The five standard container metrics over one sample window, with default scaling.
pub fn convert_to_metrics(
    samples: &[Sample<RawStat>],
) -> Result<Vec<MetricRecord>, PreconditionViolation> {
    convert_to_metrics_with(samples, &MetricScaling::default())
}

/// The five standard container metrics, in a fixed order:
/// CPU, available memory, RX rate, TX rate, blkio rate.
pub fn convert_to_metrics_with(
    samples: &[Sample<RawStat>],
    scaling: &MetricScaling,
) -> Result<Vec<MetricRecord>, PreconditionViolation> {
    let divisor = scaling.byte_rate_divisor;
    let metrics = vec![
        get_cpu_metric_scaled(samples, scaling.cpu_core_multiplier)?,
        get_simple_metric(AVAILABLE_MEMORY_METRIC, available_memory, samples)?,
        get_per_second_metric(
            RX_BYTES_METRIC,
            |s: &RawStat| s.network.rx_bytes as f64 / divisor,
            samples,
        )?,
        get_per_second_metric(
            TX_BYTES_METRIC,
            |s: &RawStat| s.network.tx_bytes as f64 / divisor,
            samples,
        )?,
        get_per_second_metric(
            BLKIO_BYTES_METRIC,
            |s: &RawStat| get_total_blkio(s) as f64 / divisor,
            samples,
        )?,
    ];
    tracing::debug!(
        samples = samples.len(),
        metrics = metrics.len(),
        "converted sample window"
    );
    Ok(metrics)
}

/// Identifying properties of a container as reported alongside its metrics.
pub fn get_container_properties_from_inspect(
    inspect: &InspectRecord,
    host: &str,
) -> ContainerProperties {
    ContainerProperties {
        host: host.to_string(),
        image: inspect.config.image.clone(),
        container_id: inspect.id.clone(),
        container_name: inspect.name.clone(),
    }
}

fn available_memory(stat: &RawStat) -> f64 {
    stat.memory_stats.limit as f64 - stat.memory_stats.usage as f64
}

/// Signed difference; a counter reset shows up as a negative delta instead of wrapping.
fn counter_delta(prev: u64, cur: u64) -> f64 {
    cur as f64 - prev as f64
}

/// Applies `interval_fn` to every consecutive pair and summarizes the results.
fn interval_metric<T, F>(
    name: &str,
    samples: &[Sample<T>],
    interval_fn: F,
) -> Result<MetricRecord, PreconditionViolation>
where
    F: Fn(&Sample<T>, &Sample<T>) -> f64,
{
    check_name(name)?;
    check_len(name, samples.len(), MIN_RATE_SAMPLES)?;
    let values: Vec<f64> = samples
        .windows(2)
        .map(|pair| interval_fn(&pair[0], &pair[1]))
        .collect();
    to_record(name, &values, MIN_RATE_SAMPLES)
}

fn check_name(name: &str) -> Result<(), PreconditionViolation> {
    if name.is_empty() {
        return Err(PreconditionViolation::EmptyName);
    }
    Ok(())
}

fn check_len(name: &str, actual: usize, required: usize) -> Result<(), PreconditionViolation> {
    if actual < required {
        return Err(PreconditionViolation::TooFewSamples {
            metric: name.to_string(),
            required,
            actual,
        });
    }
    Ok(())
}

fn to_record(
    name: &str,
    values: &[f64],
    required: usize,
) -> Result<MetricRecord, PreconditionViolation> {
    let summary = Summary::of(values).ok_or_else(|| PreconditionViolation::TooFewSamples {
        metric: name.to_string(),
        required,
        actual: 0,
    })?;
    Ok(MetricRecord {
        name: name.to_string(),
        value: summary.mean,
        min: summary.min,
        max: summary.max,
        count: summary.count,
        std: summary.std,
    })
}
