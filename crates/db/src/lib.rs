//! Database crate: connection factory, entity schema synchronisation, and the
//! core `db` module that owns the connection's lifetime.

use std::marker::PhantomData;

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::sea_query::{ColumnDef, Table};
use sea_orm::{
    ColumnTrait, ColumnType, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbBackend, EntityName, EntityTrait, IdenStatic, Iterable, Schema, Statement,
};
use stacks_kernel::settings::DatabaseSettings;
use stacks_kernel::{InitCtx, Migration, MigrationStep, Module};

/// Open the process-wide connection described by `settings`.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.connection_url());
    options.sqlx_logging(settings.sql_logging);
    if let Some(max) = settings.max_connections {
        options.max_connections(max);
    }

    tracing::info!(target: "stacks-db", url = %settings.redacted_url(), "connecting to database");

    Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to {}", settings.redacted_url()))
}

/// Apply collected migrations in order.
pub async fn run_migrations(
    db: &DatabaseConnection,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    tracing::info!(target: "stacks-db", count = migrations.len(), "applying migrations");

    for (module, migration) in migrations {
        tracing::info!(
            target: "stacks-db",
            module = %module,
            migration = migration.id,
            "applying migration"
        );
        migration
            .step
            .up(db)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;
    }

    Ok(())
}

/// Brings a table in line with an entity definition.
///
/// Creates the table when it is missing, otherwise adds every entity column
/// the live table lacks. Added columns are nullable; text columns get an
/// empty-string default so existing rows stay decodable. Nothing is dropped
/// or retyped.
pub struct SyncEntity<E> {
    entity: PhantomData<fn() -> E>,
}

impl<E> SyncEntity<E> {
    pub fn new() -> Self {
        Self {
            entity: PhantomData,
        }
    }
}

impl<E> Default for SyncEntity<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> MigrationStep for SyncEntity<E>
where
    E: EntityTrait + Default,
{
    async fn up(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        let backend = db.get_database_backend();
        let entity = E::default();
        let table = entity.table_name().to_string();

        let mut create = Schema::new(backend).create_table_from_entity(entity);
        create.if_not_exists();
        db.execute(backend.build(&create))
            .await
            .with_context(|| format!("failed to create table '{}'", table))?;

        let existing = table_columns(db, &table).await?;
        // The column iterator is not `Send`; it must not live across an await.
        let columns: Vec<E::Column> = E::Column::iter().collect();
        for column in columns {
            let name = column.as_str();
            if existing.iter().any(|c| c.eq_ignore_ascii_case(name)) {
                continue;
            }

            let column_type = column.def().get_column_type().clone();
            let is_text = matches!(column_type, ColumnType::Text | ColumnType::String(_));
            let mut def = ColumnDef::new_with_type(column, column_type);
            if is_text {
                def.default("");
            }

            let alter = Table::alter()
                .table(entity)
                .add_column(&mut def)
                .to_owned();
            db.execute(backend.build(&alter))
                .await
                .with_context(|| format!("failed to add column '{}.{}'", table, name))?;

            tracing::info!(target: "stacks-db", table = %table, column = name, "added missing column");
        }

        Ok(())
    }
}

async fn table_columns(db: &DatabaseConnection, table: &str) -> anyhow::Result<Vec<String>> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => {
            "SELECT column_name::text AS name FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1"
        }
        DbBackend::MySql => {
            "SELECT column_name AS name FROM information_schema.columns \
             WHERE table_schema = DATABASE() AND table_name = ?"
        }
        DbBackend::Sqlite => "SELECT name FROM pragma_table_info(?)",
    };

    let rows = db
        .query_all(Statement::from_sql_and_values(backend, sql, [table.into()]))
        .await
        .with_context(|| format!("failed to inspect columns of '{}'", table))?;

    rows.iter()
        .map(|row| row.try_get::<String>("", "name").map_err(anyhow::Error::from))
        .collect()
}

/// Core module holding the shared connection; closes it on shutdown.
pub struct DbModule {
    db: DatabaseConnection,
}

impl DbModule {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for DbModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        ctx.db.ping().await.context("database did not answer ping")?;
        tracing::info!(
            module = self.name(),
            backend = ?ctx.db.get_database_backend(),
            "database reachable"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.db
            .clone()
            .close()
            .await
            .context("failed to close database connection")?;
        tracing::info!(module = self.name(), "database connection closed");
        Ok(())
    }
}
