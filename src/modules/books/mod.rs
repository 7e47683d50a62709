pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use store::SharedStore;

/// Book catalog: books with append-only comment threads.
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.database.backend,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let plain_text = |description: &str| {
            json!({
                "description": description,
                "content": { "text/plain": { "schema": { "type": "string" } } }
            })
        };
        let json_of = |description: &str, schema: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{schema}") }
                    }
                }
            })
        };
        let id_parameter = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" },
            "description": "24-character hex book identifier"
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books with their comment counts",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/BookSummary" }
                                        }
                                    }
                                }
                            },
                            "500": json_of("Store unavailable", "StoreFailure")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewBook" }
                                },
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/NewBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The created book, or `missing required field title` as text",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/CreatedBook" }
                                    },
                                    "text/plain": { "schema": { "type": "string" } }
                                }
                            },
                            "400": json_of("Malformed body", "ErrorResponse"),
                            "500": json_of("Store unavailable", "StoreFailure")
                        }
                    },
                    "delete": {
                        "summary": "Delete every book",
                        "tags": ["Books"],
                        "responses": {
                            "200": plain_text("`complete delete successful`"),
                            "500": json_of("Store unavailable", "StoreFailure")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book with its comments",
                        "tags": ["Books"],
                        "parameters": [id_parameter.clone()],
                        "responses": {
                            "200": {
                                "description": "The book, or `no book exists` as text",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    },
                                    "text/plain": { "schema": { "type": "string" } }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Append a comment to a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter.clone()],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewComment" }
                                },
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/NewComment" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The updated book, or one of `missing required field comment`, `no book exists`, `no book exists!` as text",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    },
                                    "text/plain": { "schema": { "type": "string" } }
                                }
                            },
                            "400": json_of("Malformed body", "ErrorResponse")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter],
                        "responses": {
                            "200": plain_text("`delete successful` or `no book exists`")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "_id": { "type": "string" },
                            "title": { "type": "string" },
                            "comments": { "type": "array", "items": { "type": "string" } }
                        },
                        "required": ["_id", "title", "comments"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "_id": { "type": "string" },
                            "title": { "type": "string" },
                            "commentcount": { "type": "integer", "minimum": 0 }
                        },
                        "required": ["_id", "title", "commentcount"]
                    },
                    "CreatedBook": {
                        "type": "object",
                        "properties": {
                            "_id": { "type": "string" },
                            "title": { "type": "string" }
                        },
                        "required": ["_id", "title"]
                    },
                    "NewBook": {
                        "type": "object",
                        "properties": { "title": { "type": "string" } }
                    },
                    "NewComment": {
                        "type": "object",
                        "properties": { "comment": { "type": "string" } }
                    },
                    "StoreFailure": {
                        "type": "object",
                        "properties": { "error": { "type": "string" } },
                        "required": ["error"]
                    }
                }
            }
        }))
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

/// Create the books module over the given store
pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}
