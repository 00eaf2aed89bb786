use anyhow::Result;
use docker_insights::sink::{JsonLinesSink, MetricSink};
use docker_insights::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Metrics may go to stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    let host = app_config.docker.host_name();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        docker_host = %host,
        "Starting {}",
        env!("CARGO_PKG_NAME")
    );

    let sink: Arc<dyn MetricSink> = match &app_config.output.path {
        Some(path) => Arc::new(JsonLinesSink::append_to(path)?),
        None => Arc::new(JsonLinesSink::stdout()),
    };
    let docker_repo = Arc::new(docker_repo::DockerRepo::connect(
        host,
        app_config.monitoring.max_window_samples,
    )?);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            docker_repo,
            sink,
            shutdown_rx,
        },
        worker::WorkerConfig {
            report_interval_secs: app_config.monitoring.report_interval_secs,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
            scaling: app_config.metrics,
        },
    );

    shutdown_signal().await;
    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    worker_handle.await?;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
