// Reduce a raw Docker stats API response to the counters the converter reads.

use crate::models::{
    BlkioEntry, BlkioStats, CpuStats, CpuUsage, MemoryStats, NetworkStats, RawStat,
};
use bollard::models::ContainerStatsResponse;

/// Converts one bollard stats response. Missing sections read as zero; per-interface
/// network counters are summed.
pub(crate) fn to_raw_stat(s: &ContainerStatsResponse) -> RawStat {
    let cpu_stats = s
        .cpu_stats
        .as_ref()
        .map(|c| CpuStats {
            cpu_usage: CpuUsage {
                total_usage: c.cpu_usage.as_ref().and_then(|u| u.total_usage).unwrap_or(0),
            },
            system_cpu_usage: c.system_cpu_usage.unwrap_or(0),
        })
        .unwrap_or_default();

    let memory_stats = s
        .memory_stats
        .as_ref()
        .map(|m| MemoryStats {
            limit: m.limit.unwrap_or(0),
            usage: m.usage.unwrap_or(0),
        })
        .unwrap_or_default();

    let network = s
        .networks
        .as_ref()
        .map(|n| {
            n.values().fold(NetworkStats::default(), |acc, v| NetworkStats {
                rx_bytes: acc.rx_bytes.saturating_add(v.rx_bytes.unwrap_or(0)),
                tx_bytes: acc.tx_bytes.saturating_add(v.tx_bytes.unwrap_or(0)),
            })
        })
        .unwrap_or_default();

    let io_service_bytes_recursive = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
        .map(|entries| {
            entries
                .iter()
                .map(|e| BlkioEntry {
                    op: e.op.clone().unwrap_or_default(),
                    value: e.value.unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default();

    RawStat {
        cpu_stats,
        memory_stats,
        network,
        blkio_stats: BlkioStats {
            io_service_bytes_recursive,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{
        ContainerBlkioStatEntry, ContainerBlkioStats, ContainerCpuStats, ContainerCpuUsage,
        ContainerMemoryStats, ContainerNetworkStats, ContainerStatsResponse,
    };
    use std::collections::HashMap;

    fn minimal_cpu_stats(total_usage: u64, system_cpu_usage: u64) -> ContainerCpuStats {
        ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(total_usage),
                ..Default::default()
            }),
            system_cpu_usage: Some(system_cpu_usage),
            online_cpus: Some(2),
            throttling_data: None,
        }
    }

    #[test]
    fn to_raw_stat_empty_response_is_all_zero() {
        let out = to_raw_stat(&ContainerStatsResponse::default());
        assert_eq!(out, RawStat::default());
    }

    #[test]
    fn to_raw_stat_copies_cpu_and_memory() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100_000_000, 1_000_000_000)),
            memory_stats: Some(ContainerMemoryStats {
                usage: Some(256 * 1024 * 1024),
                limit: Some(512 * 1024 * 1024),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = to_raw_stat(&s);
        assert_eq!(out.cpu_stats.cpu_usage.total_usage, 100_000_000);
        assert_eq!(out.cpu_stats.system_cpu_usage, 1_000_000_000);
        assert_eq!(out.memory_stats.usage, 256 * 1024 * 1024);
        assert_eq!(out.memory_stats.limit, 512 * 1024 * 1024);
    }

    #[test]
    fn to_raw_stat_sums_network_interfaces() {
        let mut networks = HashMap::new();
        networks.insert(
            "eth0".to_string(),
            ContainerNetworkStats {
                rx_bytes: Some(1000),
                tx_bytes: Some(2000),
                ..Default::default()
            },
        );
        networks.insert(
            "eth1".to_string(),
            ContainerNetworkStats {
                rx_bytes: Some(10),
                tx_bytes: None,
                ..Default::default()
            },
        );
        let s = ContainerStatsResponse {
            networks: Some(networks),
            ..Default::default()
        };
        let out = to_raw_stat(&s);
        assert_eq!(out.network.rx_bytes, 1010);
        assert_eq!(out.network.tx_bytes, 2000);
    }

    #[test]
    fn to_raw_stat_network_sum_saturates() {
        let mut networks = HashMap::new();
        for name in ["eth0", "eth1"] {
            networks.insert(
                name.to_string(),
                ContainerNetworkStats {
                    rx_bytes: Some(u64::MAX - 1),
                    tx_bytes: Some(1),
                    ..Default::default()
                },
            );
        }
        let s = ContainerStatsResponse {
            networks: Some(networks),
            ..Default::default()
        };
        let out = to_raw_stat(&s);
        assert_eq!(out.network.rx_bytes, u64::MAX);
        assert_eq!(out.network.tx_bytes, 2);
    }

    #[test]
    fn to_raw_stat_keeps_blkio_entries_in_order() {
        let s = ContainerStatsResponse {
            blkio_stats: Some(ContainerBlkioStats {
                io_service_bytes_recursive: Some(vec![
                    ContainerBlkioStatEntry {
                        op: Some("Read".to_string()),
                        value: Some(100),
                        ..Default::default()
                    },
                    ContainerBlkioStatEntry {
                        op: Some("Total".to_string()),
                        value: Some(300),
                        ..Default::default()
                    },
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = to_raw_stat(&s);
        let entries = &out.blkio_stats.io_service_bytes_recursive;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].op, "Read");
        assert_eq!(entries[1].op, "Total");
        assert_eq!(crate::convert::get_total_blkio(&out), 300);
    }
}
