use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization and start
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Lifecycle contract every service module implements
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module, also its mount point
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context
    /// Called during application startup before any module is started
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes
    /// Routes will be mounted under `/api/{module_name}`
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return OpenAPI specification fragment for this module as JSON
    /// Paths are relative to the module mount point
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Called once every module is initialized
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release resources; called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
