//! Bootstrap sequence shared by the `stacks-app` binary and the CLI.

use std::sync::Arc;

use anyhow::Context;
use sea_orm::DatabaseConnection;
use stacks_db::DbModule;
use stacks_kernel::settings::Settings;
use stacks_kernel::{InitCtx, ModuleRegistry};

use crate::modules;

/// Register the core `db` module and every project module against `db`.
pub fn build_registry(db: &DatabaseConnection) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_core(Arc::new(DbModule::new(db.clone())));
    modules::register_all(&mut registry, db);
    registry
}

async fn connect_and_migrate(
    settings: &Settings,
) -> anyhow::Result<(DatabaseConnection, ModuleRegistry)> {
    let db = stacks_db::connect(&settings.database).await?;
    let registry = build_registry(&db);

    stacks_db::run_migrations(&db, &registry.collect_migrations())
        .await
        .context("schema synchronisation failed")?;

    Ok((db, registry))
}

/// Bring the schema up to date, then release the connection.
pub async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let (_db, registry) = connect_and_migrate(settings).await?;
    tracing::info!("migrations complete");
    registry.stop_core_modules().await
}

/// Run the service until a shutdown signal arrives.
///
/// A database that cannot be reached at startup is fatal.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let (db, registry) = connect_and_migrate(settings).await?;

    let ctx = InitCtx {
        settings,
        db: &db,
    };
    registry.init_core_modules(&ctx).await?;
    registry.init_custom_modules(&ctx).await?;
    registry.start_core_modules(&ctx).await?;
    registry.start_custom_modules(&ctx).await?;

    tracing::info!("stacks-app bootstrap complete");

    let served = stacks_http::start_server(&registry, settings).await;

    registry.stop_custom_modules().await?;
    registry.stop_core_modules().await?;

    served
}
