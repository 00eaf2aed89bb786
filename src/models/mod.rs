// Domain models

mod container;
mod metric;
mod raw_stat;

pub use container::{ContainerProperties, InspectConfig, InspectRecord};
pub use metric::{ContainerMetrics, MetricRecord};
pub use raw_stat::{
    BlkioEntry, BlkioStats, CpuStats, CpuUsage, MemoryStats, NetworkStats, RawStat, Sample,
};
