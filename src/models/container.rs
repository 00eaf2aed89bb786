// Docker container identity: the inspect fields we read and the properties we report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Subset of `docker inspect` output. Keys keep Docker's PascalCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub config: InspectConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectConfig {
    pub image: String,
}

/// Dimensions attached to every metric of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerProperties {
    #[serde(rename = "Docker host")]
    pub host: String,
    #[serde(rename = "Docker image")]
    pub image: String,
    #[serde(rename = "Docker container id")]
    pub container_id: String,
    #[serde(rename = "Docker container name")]
    pub container_name: String,
}

impl ContainerProperties {
    /// Flat key/value view, keyed by the reported property names.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Docker host".to_string(), self.host.clone()),
            ("Docker image".to_string(), self.image.clone()),
            ("Docker container id".to_string(), self.container_id.clone()),
            ("Docker container name".to_string(), self.container_name.clone()),
        ])
    }
}
