//! Book accessor: every read and write against the `books` table goes through here.

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use thiserror::Error;

use super::models::{ActiveModel, Book, Column, Entity, NewBook};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] DbErr),
}

/// Handle onto the shared connection. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct BookStore {
    db: DatabaseConnection,
}

impl BookStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Rows that have not been soft-deleted.
    fn live() -> Select<Entity> {
        Entity::find().filter(Column::DeletedAt.is_null())
    }

    /// Lower-case `raw` the same way the backend's `lower()` folds a column.
    ///
    /// SQLite's `lower()` only folds ASCII, so non-ASCII letters are left alone
    /// there; PostgreSQL folds the full Unicode range.
    fn fold(&self, raw: &str) -> String {
        match self.db.get_database_backend() {
            DbBackend::Sqlite => raw.to_ascii_lowercase(),
            DbBackend::Postgres | DbBackend::MySql => raw.to_lowercase(),
        }
    }

    pub async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let now = Utc::now();
        let model = ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            title: Set(book.title),
            author: Set(book.author),
            description: Set(book.description),
            genre: Set(book.genre),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(model)
    }

    pub async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(Self::live()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Case-insensitive substring match on title or author.
    ///
    /// An empty query matches every live row. On SQLite only ASCII letters
    /// compare case-insensitively; other characters must match exactly.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>, StoreError> {
        let pattern = format!("%{}%", escape_like(&self.fold(query)));
        let matches = Condition::any()
            .add(lowered(Column::Title).like(LikeExpr::new(pattern.clone()).escape('\\')))
            .add(lowered(Column::Author).like(LikeExpr::new(pattern).escape('\\')));

        Ok(Self::live()
            .filter(matches)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Book, StoreError> {
        Self::live()
            .filter(Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Soft-delete. Unknown or already deleted ids are not an error.
    pub async fn delete_by_id(&self, id: i32) -> Result<(), StoreError> {
        let result = Entity::update_many()
            .col_expr(Column::DeletedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        tracing::debug!(book_id = id, rows = result.rows_affected, "soft delete applied");
        Ok(())
    }

    /// Case-insensitive exact match on genre, folded like [`search`](Self::search).
    pub async fn list_by_genre(&self, genre: &str) -> Result<Vec<Book>, StoreError> {
        Ok(Self::live()
            .filter(lowered(Column::Genre).eq(self.fold(genre)))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Distinct genres of live rows, ascending.
    pub async fn list_genres(&self) -> Result<Vec<String>, StoreError> {
        Ok(Self::live()
            .select_only()
            .column(Column::Genre)
            .distinct()
            .order_by_asc(Column::Genre)
            .into_tuple::<String>()
            .all(&self.db)
            .await?)
    }
}

fn lowered(column: Column) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
pub(crate) async fn memory_store() -> BookStore {
    use stacks_db::SyncEntity;
    use stacks_kernel::settings::DatabaseSettings;
    use stacks_kernel::MigrationStep;

    let settings = DatabaseSettings {
        url: Some("sqlite::memory:".to_string()),
        max_connections: Some(1),
        ..DatabaseSettings::default()
    };
    let db = stacks_db::connect(&settings).await.unwrap();
    SyncEntity::<Entity>::new().up(&db).await.unwrap();
    BookStore::new(db)
}

/// A store whose table has been dropped, so every query fails in the driver.
#[cfg(test)]
pub(crate) async fn broken_store() -> BookStore {
    let store = memory_store().await;
    store.db.execute_unprepared("DROP TABLE books").await.unwrap();
    store
}
