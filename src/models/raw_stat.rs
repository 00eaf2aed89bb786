// Docker stats record, reduced to the counters the converter reads.
// Field names follow the Docker stats JSON so raw API payloads deserialize directly.

use serde::{Deserialize, Serialize};

/// One timestamped reading. `timestamp` is in seconds; rates are per second of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    pub timestamp: f64,
    pub stat: T,
}

impl<T> Sample<T> {
    pub fn new(timestamp: f64, stat: T) -> Self {
        Self { timestamp, stat }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStat {
    pub cpu_stats: CpuStats,
    pub memory_stats: MemoryStats,
    pub network: NetworkStats,
    pub blkio_stats: BlkioStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub cpu_usage: CpuUsage,
    /// Host-wide cumulative CPU time, same unit as `cpu_usage.total_usage`.
    pub system_cpu_usage: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuUsage {
    pub total_usage: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    pub limit: u64,
    pub usage: u64,
}

/// Cumulative byte counters, summed over all interfaces of the container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStats {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlkioStats {
    pub io_service_bytes_recursive: Vec<BlkioEntry>,
}

/// One `{op, value}` pair, e.g. `{"op": "Read", "value": 4096}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlkioEntry {
    pub op: String,
    pub value: u64,
}
