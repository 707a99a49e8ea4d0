pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use stacks_db::SyncEntity;
use stacks_kernel::{InitCtx, Migration, Module};

use store::BookStore;

/// Books module: the book catalogue's routes, schema, and accessor
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(store: BookStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn base_path(&self) -> String {
        String::new()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        Some(routes::router(self.store.clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration::new("001_books", SyncEntity::<models::Entity>::new())]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: BookStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_list_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Book" }
                }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int32" }
    });

    json!({
        "paths": {
            "/books": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": book_list_response("All books that have not been deleted"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/book": {
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/NewBook" }
                            }
                        }
                    },
                    "responses": {
                        "200": book_response("The stored book with its assigned id"),
                        "400": error_response("Body is not a valid book"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/book/{id}": {
                "get": {
                    "summary": "Fetch a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": book_response("The book"),
                        "400": error_response("Id is not an integer"),
                        "404": error_response("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param],
                    "responses": {
                        "200": { "description": "Deleted, or already absent" },
                        "400": error_response("Id is not an integer"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/genres": {
                "get": {
                    "summary": "List genres in use",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "Distinct genres, sorted",
                            "content": {
                                "application/json": {
                                    "schema": { "type": "array", "items": { "type": "string" } }
                                }
                            }
                        },
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/books/genre/{genre}": {
                "get": {
                    "summary": "List books of a genre",
                    "tags": ["Books"],
                    "parameters": [{
                        "name": "genre",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": book_list_response("Books whose genre matches, ignoring case"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/books/search": {
                "get": {
                    "summary": "Search books by title or author",
                    "tags": ["Books"],
                    "parameters": [{
                        "name": "q",
                        "in": "query",
                        "required": true,
                        "schema": { "type": "string", "minLength": 1 }
                    }],
                    "responses": {
                        "200": book_list_response("Books whose title or author contains q"),
                        "400": error_response("q is missing or empty"),
                        "500": error_response("Internal server error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int32" },
                        "created_at": { "type": "string", "format": "date-time" },
                        "updated_at": { "type": "string", "format": "date-time" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "description": { "type": "string" },
                        "genre": { "type": "string" }
                    },
                    "required": [
                        "id", "created_at", "updated_at", "title", "author", "description", "genre"
                    ]
                },
                "NewBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "description": { "type": "string" },
                        "genre": { "type": "string" }
                    }
                }
            }
        }
    })
}
