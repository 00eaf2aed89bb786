// Docker container stats: one stats stream per running container, each feeding a
// bounded sample window that the worker drains on every report.

mod source;
mod stats;
mod window;

pub use source::{BollardSource, ContainerSource};
pub use window::SampleWindow;

use crate::convert::get_container_properties_from_inspect;
use crate::models::{ContainerProperties, RawStat, Sample};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::warn;

const STATS_CHANNEL_CAPACITY: usize = 16;

struct TrackedContainer {
    properties: ContainerProperties,
    window: SampleWindow,
}

pub struct DockerRepo<S: ContainerSource = BollardSource> {
    source: Arc<S>,
    host: String,
    max_window_samples: usize,
    tracked: Arc<RwLock<HashMap<String, TrackedContainer>>>,
    active_streams: Arc<RwLock<HashMap<String, JoinHandle<()>>>>,
}

impl DockerRepo<BollardSource> {
    /// `host` is reported as the "Docker host" property of every container.
    pub fn connect(host: impl Into<String>, max_window_samples: usize) -> anyhow::Result<Self> {
        Ok(Self::with_source(
            BollardSource::connect()?,
            host,
            max_window_samples,
        ))
    }
}

impl<S: ContainerSource> DockerRepo<S> {
    pub fn with_source(source: S, host: impl Into<String>, max_window_samples: usize) -> Self {
        Self {
            source: Arc::new(source),
            host: host.into(),
            max_window_samples,
            tracked: Arc::new(RwLock::new(HashMap::new())),
            active_streams: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Starts monitoring newly running containers (and restarts ended streams),
    /// stops and forgets containers that are no longer running.
    pub async fn refresh_containers(&self) -> anyhow::Result<()> {
        let running: HashSet<String> = self.source.list_running().await?.into_iter().collect();

        let streaming: HashSet<String> = {
            let r = self.active_streams.read().await;
            r.keys().cloned().collect()
        };
        let known: HashSet<String> = {
            let r = self.tracked.read().await;
            r.keys().cloned().collect()
        };

        for id in running.iter().filter(|id| !streaming.contains(*id)) {
            if !known.contains(id) {
                let properties = match self.inspect(id).await {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(
                            error = %e,
                            operation = "inspect_container",
                            container_id = %id,
                            "Docker inspect failed"
                        );
                        continue;
                    }
                };
                tracing::info!(
                    container_name = %properties.container_name,
                    image = %properties.image,
                    "Monitoring container"
                );
                self.tracked.write().await.insert(
                    id.clone(),
                    TrackedContainer {
                        properties,
                        window: SampleWindow::new(self.max_window_samples),
                    },
                );
            }
            // Register under the lock: the task's own removal must come after the insert.
            let mut streams = self.active_streams.write().await;
            let handle = self.start_monitoring(id.clone());
            streams.insert(id.clone(), handle);
        }

        let gone: Vec<String> = known
            .into_iter()
            .filter(|id| !running.contains(id))
            .collect();
        if !gone.is_empty() {
            let mut streams = self.active_streams.write().await;
            let mut tracked = self.tracked.write().await;
            for id in &gone {
                if let Some(handle) = streams.remove(id) {
                    handle.abort();
                }
                if let Some(t) = tracked.remove(id) {
                    tracing::info!(container_name = %t.properties.container_name, "Container stopped");
                }
            }
        }
        Ok(())
    }

    /// Takes the buffered samples of every tracked container.
    pub async fn drain_windows(&self) -> Vec<(ContainerProperties, Vec<Sample<RawStat>>)> {
        let mut tracked = self.tracked.write().await;
        tracked
            .values_mut()
            .map(|t| (t.properties.clone(), t.window.take_for_report()))
            .collect()
    }

    pub async fn tracked_count(&self) -> usize {
        self.tracked.read().await.len()
    }

    /// Whether a stats stream is currently registered for `id`.
    pub async fn is_streaming(&self, id: &str) -> bool {
        self.active_streams.read().await.contains_key(id)
    }

    async fn inspect(&self, id: &str) -> anyhow::Result<ContainerProperties> {
        let record = self.source.inspect(id).await?;
        Ok(get_container_properties_from_inspect(&record, &self.host))
    }

    fn start_monitoring(&self, id: String) -> JoinHandle<()> {
        let source = self.source.clone();
        let tracked = self.tracked.clone();
        let active_streams = self.active_streams.clone();

        tokio::spawn(async move {
            let (tx, mut rx) = mpsc::channel(STATS_CHANNEL_CAPACITY);
            let producer = source.stream_stats(&id, tx);
            let consumer = async {
                while let Some(stat) = rx.recv().await {
                    let sample = Sample::new(now_secs(), stat);
                    if let Some(t) = tracked.write().await.get_mut(&id) {
                        t.window.push(sample);
                    }
                }
            };
            let (result, ()) = tokio::join!(producer, consumer);
            if let Err(e) = result {
                warn!(error = %e, container_id = %id, "Stats stream error");
            }
            tracing::debug!(container_id = %id, "Stats stream ended");

            // A newer stream may already be registered under the same id.
            let me = tokio::task::id();
            let mut streams = active_streams.write().await;
            if streams.get(&id).is_some_and(|h| h.id() == me) {
                streams.remove(&id);
            }
        })
    }
}

/// Wall-clock seconds with microsecond resolution.
fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
