use async_trait::async_trait;
use bookstore_kernel::{InitCtx, Module};

use crate::Database;

/// Core module owning the store handle's lifecycle.
pub struct DbModule {
    db: Database,
}

impl DbModule {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for DbModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            path = %ctx.settings.database.path.display(),
            collections = ?self.db.collection_names(),
            "database module initialized"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let flushed = self.db.flush().await?;
        tracing::info!(module = self.name(), flushed, "database flushed");
        Ok(())
    }
}
