use super::{TOKEN_KEY, TokenStore};
use crate::core::session::SessionToken;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

/// Token store backed by a fjall keyspace on disk.
pub struct DiskTokenStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskTokenStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open token store at {}", path.display()))?;
        let partition = keyspace
            .open_partition("session", PartitionCreateOptions::default())
            .context("Failed to open session partition")?;
        debug!("Opened token store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl TokenStore for DiskTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>> {
        let Some(raw) = self
            .partition
            .get(TOKEN_KEY)
            .context("Failed to read session token")?
        else {
            debug!("No stored session token");
            return Ok(None);
        };
        let raw = std::str::from_utf8(&raw).context("Stored session token is not UTF-8")?;
        // A blank entry counts as logged out.
        Ok(SessionToken::new(raw).ok())
    }

    async fn save(&self, token: &SessionToken) -> Result<()> {
        self.partition
            .insert(TOKEN_KEY, token.expose())
            .context("Failed to write session token")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush token store")?;
        debug!("Stored session token");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.partition
            .remove(TOKEN_KEY)
            .context("Failed to remove session token")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush token store")?;
        debug!("Removed session token");
        Ok(())
    }
}
