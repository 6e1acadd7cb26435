//! Shared handles for the commands that talk to the backend or the local
//! database.

use anyhow::{Context, Result};
use mostrador_client::{ApiClient, CatalogSession, ClientConfig};
use mostrador_db::{Database, DbConfig};
use std::path::PathBuf;
use tracing::debug;

pub struct AppState {
    pub config: ClientConfig,
    pub client: ApiClient,
}

impl AppState {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = ClientConfig::load(config_path).context("loading configuration")?;
        let client = ApiClient::new(&config).context("building API client")?;
        debug!(api_url = %client.base_url(), "Client ready");
        Ok(AppState { config, client })
    }

    /// Catalog and ranges, with the configured band rule.
    pub async fn session(&self) -> Result<CatalogSession> {
        CatalogSession::load(&self.client, self.config.band_rule)
            .await
            .context("loading the catalog")
    }

    /// Opens (and migrates) the local database.
    pub async fn db(&self) -> Result<Database> {
        let path = self.config.database_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        Database::new(DbConfig::new(&path))
            .await
            .with_context(|| format!("opening local database {}", path.display()))
    }
}
