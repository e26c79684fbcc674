pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::session::SessionToken;
use anyhow::Result;
use async_trait::async_trait;
use disk::DiskTokenStore;
use std::sync::Arc;

/// Well-known key the session token lives under.
pub const TOKEN_KEY: &str = "token";

/// Local persistence for the single session credential.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<SessionToken>>;

    async fn save(&self, token: &SessionToken) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}

/// Opens the on-disk token store under the configured data directory.
pub fn open_token_store(config: &AppConfig) -> Result<Arc<dyn TokenStore>> {
    let path = config.default_data_path()?.join("session");
    Ok(Arc::new(DiskTokenStore::open(&path)?))
}
