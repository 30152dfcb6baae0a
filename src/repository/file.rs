//! Chain repository reading a JSON export from disk

use super::memory::respond;
use super::traits::{ChainRepository, QueryCriteria, QueryResponse, RepositoryResult};
use crate::chain::Chain;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Accepted export layouts: a bare array or an object with a `chains` field
#[derive(Deserialize)]
#[serde(untagged)]
enum ChainExport {
    List(Vec<Chain>),
    Wrapped { chains: Vec<Chain> },
}

impl ChainExport {
    fn into_chains(self) -> Vec<Chain> {
        match self {
            Self::List(chains) | Self::Wrapped { chains } => chains,
        }
    }
}

/// Repository serving chains from a JSON file.
///
/// The file is re-read on every query so an updated export is picked up
/// by the next refetch.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse every chain in the export
    pub async fn load_all(&self) -> RepositoryResult<Vec<Chain>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let export: ChainExport = serde_json::from_str(&raw)?;
        Ok(export.into_chains())
    }
}

#[async_trait]
impl ChainRepository for JsonFileRepository {
    async fn query(&self, criteria: &QueryCriteria) -> RepositoryResult<QueryResponse> {
        let chains = self.load_all().await?;
        tracing::debug!(path = %self.path.display(), count = chains.len(), "loaded chain export");
        Ok(respond(&chains, criteria))
    }
}
