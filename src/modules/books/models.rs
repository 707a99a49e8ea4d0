use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Persisted book record.
///
/// `deleted_at` marks a soft-deleted row; it is never serialized because
/// deleted rows are not returned by any read.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    /// Unique identifier, assigned by the database
    #[sea_orm(primary_key)]
    pub id: i32,
    /// When the book was stored
    pub created_at: DateTimeUtc,
    /// When the book was last written
    pub updated_at: DateTimeUtc,
    /// Set when the book is deleted
    #[serde(skip)]
    pub deleted_at: Option<DateTimeUtc>,
    /// Title of the book
    #[sea_orm(column_type = "Text")]
    pub title: String,
    /// Author of the book
    #[sea_orm(column_type = "Text")]
    pub author: String,
    /// Free-form description
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Genre label, matched case-insensitively
    #[sea_orm(column_type = "Text")]
    pub genre: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub type Book = Model;

/// Request model for creating a new book. Missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBook {
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Free-form description
    pub description: String,
    /// Genre label
    pub genre: String,
}
