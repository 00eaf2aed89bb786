// Background report worker: every report interval, drain the per-container sample
// windows, convert them to metrics and hand the batches to the sink.

use crate::convert::{MetricScaling, convert_to_metrics_with};
use crate::docker_repo::DockerRepo;
use crate::models::{ContainerMetrics, ContainerProperties, RawStat, Sample};
use crate::sink::MetricSink;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::Instrument;

pub struct WorkerDeps {
    pub docker_repo: Arc<DockerRepo>,
    pub sink: Arc<dyn MetricSink>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub report_interval_secs: u64,
    /// How often to log collector stats (real seconds).
    pub stats_log_interval_secs: u64,
    pub scaling: MetricScaling,
}

/// Builds the report batch for one container, or None when the window is too short
/// to yield rates (e.g. a container that just started).
pub fn build_report(
    properties: ContainerProperties,
    samples: &[Sample<RawStat>],
    scaling: &MetricScaling,
) -> Option<ContainerMetrics> {
    match convert_to_metrics_with(samples, scaling) {
        Ok(metrics) => Some(ContainerMetrics {
            timestamp: chrono::Utc::now().to_rfc3339(),
            properties,
            metrics,
        }),
        Err(e) => {
            tracing::debug!(
                error = %e,
                container_name = %properties.container_name,
                "Skipping report"
            );
            None
        }
    }
}

/// Converts and emits every batch, then flushes the sink once; returns the number emitted.
/// Does blocking sink I/O; the worker runs it on a blocking thread.
pub fn report_windows(
    windows: Vec<(ContainerProperties, Vec<Sample<RawStat>>)>,
    sink: &dyn MetricSink,
    scaling: &MetricScaling,
) -> u64 {
    let mut emitted = 0;
    for (properties, samples) in windows {
        let Some(batch) = build_report(properties, &samples, scaling) else {
            continue;
        };
        match sink.emit(&batch) {
            Ok(()) => emitted += 1,
            Err(e) => tracing::warn!(
                error = %e,
                operation = "emit",
                container_name = %batch.properties.container_name,
                "Failed to emit metrics"
            ),
        }
    }
    if let Err(e) = sink.flush() {
        tracing::warn!(error = %e, operation = "flush", "Failed to flush metrics");
    }
    emitted
}

async fn report_off_thread(
    windows: Vec<(ContainerProperties, Vec<Sample<RawStat>>)>,
    sink: &Arc<dyn MetricSink>,
    scaling: MetricScaling,
) -> u64 {
    let sink = sink.clone();
    match tokio::task::spawn_blocking(move || report_windows(windows, sink.as_ref(), &scaling))
        .await
    {
        Ok(emitted) => emitted,
        Err(e) => {
            tracing::warn!(error = %e, operation = "report", "Report task failed");
            0
        }
    }
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        docker_repo,
        sink,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        report_interval_secs,
        stats_log_interval_secs,
        scaling,
    } = config;

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", report_interval_secs);

    let task = async move {
        let mut report_tick = interval(Duration::from_secs(report_interval_secs));
        report_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut batches_emitted_total: u64 = 0;

        loop {
            tokio::select! {
                _ = report_tick.tick() => {
                    // Drain before refreshing so a stopped container still gets its last report.
                    let windows = docker_repo.drain_windows().await;
                    batches_emitted_total += report_off_thread(windows, &sink, scaling).await;

                    if let Err(e) = docker_repo.refresh_containers().await {
                        tracing::warn!(
                            error = %e,
                            operation = "refresh_containers",
                            "Docker container refresh failed"
                        );
                    }
                }
                _ = &mut shutdown_rx => {
                    let windows = docker_repo.drain_windows().await;
                    batches_emitted_total += report_off_thread(windows, &sink, scaling).await;
                    tracing::debug!(batches_emitted_total, "Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    let containers_tracked = docker_repo.tracked_count().await;
                    tracing::info!(containers_tracked, batches_emitted_total, "collector stats");
                }
            }
        }
    };
    tokio::spawn(task.instrument(worker_span))
}
