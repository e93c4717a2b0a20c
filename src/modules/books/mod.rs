pub mod errors;
pub mod models;
pub mod repository;
pub mod routes;
pub mod search;
pub mod service;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_db::Database;
use bookstore_kernel::{InitCtx, Module};

use repository::SledBookRepository;
use service::CatalogService;

/// Book catalog: store, service and `/api/books` routes
pub struct BooksModule {
    service: CatalogService,
}

impl BooksModule {
    pub fn new(service: CatalogService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let total = self.service.total().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            total,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let json_body = |schema: serde_json::Value| {
            serde_json::json!({
                "content": { "application/json": { "schema": schema } }
            })
        };
        let book_ref = serde_json::json!({ "$ref": "#/components/schemas/Book" });
        let id_param = serde_json::json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let string_list = serde_json::json!({ "type": "array", "items": { "type": "string" } });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List, search or filter books",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "search", "in": "query", "schema": { "type": "string" } },
                            { "name": "genre", "in": "query", "schema": { "type": "string" } },
                            { "name": "author", "in": "query", "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books and catalog counts",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookList" }
                                    }
                                }
                            },
                            "500": error("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": json_body(serde_json::json!({ "$ref": "#/components/schemas/BookDraft" })),
                        "responses": {
                            "201": { "description": "Created book", "content": { "application/json": { "schema": book_ref.clone() } } },
                            "400": error("Validation error")
                        }
                    }
                },
                "/genres": {
                    "get": {
                        "summary": "Distinct genres",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "Genres", "content": { "application/json": { "schema": string_list.clone() } } },
                            "500": error("Internal server error")
                        }
                    }
                },
                "/authors": {
                    "get": {
                        "summary": "Distinct authors",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "Authors", "content": { "application/json": { "schema": string_list } } },
                            "500": error("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch one book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": { "description": "Book", "content": { "application/json": { "schema": book_ref.clone() } } },
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Update some fields of a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": json_body(serde_json::json!({ "$ref": "#/components/schemas/BookDraft" })),
                        "responses": {
                            "200": { "description": "Updated book", "content": { "application/json": { "schema": book_ref } } },
                            "400": error("Validation error"),
                            "404": error("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": {
                                "description": "Confirmation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "message": { "type": "string" } },
                                            "required": ["message"]
                                        }
                                    }
                                }
                            },
                            "404": error("Book not found"),
                            "500": error("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Store-assigned identifier" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "price": { "type": "number", "minimum": 0 },
                            "stock": { "type": "integer", "minimum": 0 },
                            "publishedYear": { "type": "integer", "minimum": 0 },
                            "createdAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "author", "genre", "price", "stock", "createdAt"]
                    },
                    "BookDraft": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "price": { "type": "number", "minimum": 0 },
                            "stock": { "type": "integer", "minimum": 0, "default": 0 },
                            "publishedYear": { "type": "integer", "minimum": 0 }
                        },
                        "required": ["title", "author", "genre", "price"]
                    },
                    "BookList": {
                        "type": "object",
                        "properties": {
                            "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } },
                            "meta": {
                                "type": "object",
                                "properties": {
                                    "total": { "type": "integer" },
                                    "outOfStock": { "type": "integer" }
                                },
                                "required": ["total", "outOfStock"]
                            }
                        },
                        "required": ["books", "meta"]
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

/// Create the books module over the shared database
pub fn create_module(db: &Database) -> anyhow::Result<Arc<dyn Module>> {
    let repository = SledBookRepository::new(db)?;
    let service = CatalogService::new(Arc::new(repository));
    Ok(Arc::new(BooksModule::new(service)))
}
