use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use sea_orm::DatabaseConnection;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a DatabaseConnection,
}

/// A single idempotent schema change.
///
/// Steps run on every process start, so implementations must tolerate being
/// applied to a database that is already up to date.
#[async_trait]
pub trait MigrationStep: Send + Sync {
    async fn up(&self, db: &DatabaseConnection) -> anyhow::Result<()>;
}

/// Migration definition for modules
#[derive(Clone)]
pub struct Migration {
    pub id: &'static str,
    pub step: Arc<dyn MigrationStep>,
}

impl Migration {
    pub fn new(id: &'static str, step: impl MigrationStep + 'static) -> Self {
        Self {
            id,
            step: Arc::new(step),
        }
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration").field("id", &self.id).finish()
    }
}

/// Core module trait that all Stacks modules must implement
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Path prefix the module's routes are mounted under.
    /// An empty string mounts them at the server root.
    fn base_path(&self) -> String {
        format!("/api/{}", self.name())
    }

    /// Initialize the module with the provided context
    /// Called during application startup after migrations
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes, if it serves any
    fn routes(&self) -> Option<Router> {
        None
    }

    /// Return OpenAPI specification fragment for this module as JSON
    /// Paths are relative to [`Module::base_path`]
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Return migrations contributed by this module
    /// Migrations are executed in the order returned
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Start background tasks for this module
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources
    /// Called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
