use crate::error::StageError;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";
pub const DEFAULT_CLUSTER_NAME: &str = "elasticsearch_szednik";
pub const DEFAULT_INDEX: &str = "zen";
pub const DEFAULT_DOC_TYPE: &str = "abstract";
pub const DEFAULT_HIT_LIST_SIZE: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    #[serde(default = "default_hit_list_size")]
    pub hit_list_size: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            cluster_name: default_cluster_name(),
            index: default_index(),
            doc_type: default_doc_type(),
            hit_list_size: default_hit_list_size(),
        }
    }
}

impl StageConfig {
    pub fn validate(&self) -> Result<(), StageError> {
        if self.hit_list_size == 0 {
            return Err(StageError::InvalidConfig(
                "hit list size must be at least 1".to_string(),
            ));
        }
        if self.index.trim().is_empty() {
            return Err(StageError::InvalidConfig("index name is empty".to_string()));
        }
        Url::parse(&self.endpoint).map_err(|error| {
            StageError::InvalidConfig(format!("endpoint `{}`: {error}", self.endpoint))
        })?;
        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_cluster_name() -> String {
    DEFAULT_CLUSTER_NAME.to_string()
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_doc_type() -> String {
    DEFAULT_DOC_TYPE.to_string()
}

fn default_hit_list_size() -> usize {
    DEFAULT_HIT_LIST_SIZE
}
