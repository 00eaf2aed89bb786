// Where container lists, inspect records and stats streams come from.
// Bollard in production; the repo only sees this trait.

use super::stats;
use crate::models::{InspectConfig, InspectRecord, RawStat};
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{InspectContainerOptions, ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use std::collections::HashMap;
use tokio::sync::mpsc;

#[async_trait]
pub trait ContainerSource: Send + Sync + 'static {
    /// Ids of the containers currently running.
    async fn list_running(&self) -> anyhow::Result<Vec<String>>;

    async fn inspect(&self, id: &str) -> anyhow::Result<InspectRecord>;

    /// Streams stats of one container into `samples` until the stream ends, errors,
    /// or the receiver is dropped.
    async fn stream_stats(&self, id: &str, samples: mpsc::Sender<RawStat>) -> anyhow::Result<()>;
}

pub struct BollardSource {
    docker: Docker,
}

impl BollardSource {
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerSource for BollardSource {
    async fn list_running(&self) -> anyhow::Result<Vec<String>> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let options = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }

    async fn inspect(&self, id: &str) -> anyhow::Result<InspectRecord> {
        let r = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        Ok(InspectRecord {
            id: r.id.unwrap_or_else(|| id.to_string()),
            name: r.name.unwrap_or_default(),
            config: InspectConfig {
                image: r.config.and_then(|c| c.image).unwrap_or_default(),
            },
        })
    }

    async fn stream_stats(&self, id: &str, samples: mpsc::Sender<RawStat>) -> anyhow::Result<()> {
        let options = StatsOptions {
            stream: true,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        while let Some(result) = stream.next().await {
            let s = result?;
            if samples.send(stats::to_raw_stat(&s)).await.is_err() {
                break;
            }
        }
        Ok(())
    }
}
