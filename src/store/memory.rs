use super::TokenStore;
use crate::core::session::SessionToken;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// Token store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &SessionToken) -> Result<()> {
        debug!("Stored session token in memory");
        *self.token.lock().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        debug!("Cleared in-memory session token");
        *self.token.lock().await = None;
        Ok(())
    }
}
