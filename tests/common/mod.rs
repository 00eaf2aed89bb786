// Shared test helpers
#![allow(dead_code)]

use docker_insights::models::*;

pub fn cpu_stat(total_usage: u64, system_cpu_usage: u64) -> RawStat {
    RawStat {
        cpu_stats: CpuStats {
            cpu_usage: CpuUsage { total_usage },
            system_cpu_usage,
        },
        ..Default::default()
    }
}

pub fn blkio_stat(entries: &[(&str, u64)]) -> RawStat {
    RawStat {
        blkio_stats: BlkioStats {
            io_service_bytes_recursive: entries
                .iter()
                .map(|(op, value)| BlkioEntry {
                    op: op.to_string(),
                    value: *value,
                })
                .collect(),
        },
        ..Default::default()
    }
}

pub fn full_stat(cpu: u64, system: u64, blkio: u64, rx: u64, tx: u64, usage: u64, limit: u64) -> RawStat {
    RawStat {
        cpu_stats: CpuStats {
            cpu_usage: CpuUsage { total_usage: cpu },
            system_cpu_usage: system,
        },
        memory_stats: MemoryStats { limit, usage },
        network: NetworkStats {
            rx_bytes: rx,
            tx_bytes: tx,
        },
        blkio_stats: BlkioStats {
            io_service_bytes_recursive: vec![BlkioEntry {
                op: "Total".into(),
                value: blkio,
            }],
        },
    }
}

/// Seven samples, 10 s apart, with every counter moving.
pub fn seven_sample_fixture() -> Vec<Sample<RawStat>> {
    let time = [0, 10, 20, 30, 40, 50, 60];
    let cpu = [0, 1, 2, 5, 9, 19, 22];
    let system = [0, 10, 20, 30, 40, 50, 60];
    let blkio = [0, 1, 20, 30, 200, 350, 700];
    let rx = [0, 0, 0, 101, 120, 120, 230];
    let tx = [0, 0, 10, 10, 200, 250, 260];
    let memory = [
        1_000_000, 1_000_000, 2_000_000, 2_020_000, 3_000_000, 2_000_000, 1_000_000,
    ];
    let limit = 8_000_000;
    (0..time.len())
        .map(|i| {
            Sample::new(
                time[i] as f64,
                full_stat(cpu[i], system[i], blkio[i], rx[i], tx[i], memory[i], limit),
            )
        })
        .collect()
}

/// Samples whose stat is the plain value, for identity projections.
pub fn scalar_samples(pairs: &[(f64, f64)]) -> Vec<Sample<f64>> {
    pairs.iter().map(|&(t, v)| Sample::new(t, v)).collect()
}

pub fn assert_close(expected: f64, actual: f64, delta: f64) {
    assert!(
        (expected - actual).abs() <= delta,
        "expected {} +/- {}, got {}",
        expected,
        delta,
        actual
    );
}

pub fn assert_metric(
    actual: &MetricRecord,
    name: &str,
    count: usize,
    value: f64,
    min: f64,
    max: f64,
    std: f64,
    delta: f64,
) {
    assert_eq!(actual.name, name);
    assert_eq!(actual.count, count, "count of {}", name);
    assert_close(value, actual.value, delta);
    assert_close(min, actual.min, delta);
    assert_close(max, actual.max, delta);
    assert_close(std, actual.std, delta);
}
