use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::db::{Document, DocumentStore};
use crate::error::{AppError, Result};
use crate::models::{Envelope, Pagination, Reply, ResourceSchema};

use super::auth_service::hash_password;

pub const REQUIRED_FIELDS_MISSING: &str = "Required fields are missing";
pub const CREDENTIAL_FIELDS_MISSING: &str =
    "Email or password fields they don't have been entered.";
pub const PASSWORD_TOO_SHORT: &str = "The password needs to be at least 8 characters long.";
pub const EMAIL_EXISTS: &str = "An account with this email already exists.";
pub const COLLECTION_EMPTY: &str = "Collection is Empty";
pub const NO_SEARCH_RESULT: &str = "No document found by this request";

const MIN_PASSWORD_LEN: usize = 8;

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("No document found by this id: {}", id))
}

/// Generic create/read/update/delete/list/search handler for one entity
/// collection. All entity-specific behavior comes from the schema.
pub struct ResourceService {
    store: Arc<dyn DocumentStore>,
    schema: &'static ResourceSchema,
}

impl ResourceService {
    pub fn new(store: Arc<dyn DocumentStore>, schema: &'static ResourceSchema) -> Self {
        Self { store, schema }
    }

    pub async fn create(&self, mut body: Map<String, Value>) -> Result<Reply> {
        sanitize(&mut body);

        let missing = self.schema.missing_required(&body);
        if !missing.is_empty() {
            let message = if self.schema.has_credentials
                && (missing.contains(&"email") || missing.contains(&"password"))
            {
                CREDENTIAL_FIELDS_MISSING
            } else {
                REQUIRED_FIELDS_MISSING
            };
            return Err(AppError::Validation(message.to_string()));
        }

        self.schema.normalize_emails(&mut body);

        if self.schema.has_credentials {
            let email = body
                .get("email")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if self
                .store
                .find_by_field(self.schema.collection, "email", &email)
                .await?
                .is_some()
            {
                return Err(AppError::Validation(EMAIL_EXISTS.to_string()));
            }

            let password = body
                .get("password")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if password.chars().count() < MIN_PASSWORD_LEN {
                return Err(AppError::Validation(PASSWORD_TOO_SHORT.to_string()));
            }
            body.insert("password".to_string(), Value::String(hash_password(&password)?));
        }

        self.schema.apply_defaults(&mut body);

        let doc = self.store.insert(self.schema.collection, body).await?;
        tracing::debug!(collection = self.schema.collection, id = %doc.id, "document created");

        Ok(Reply::ok(Envelope::success(
            self.present(doc),
            "Successfully created the document",
        )))
    }

    pub async fn read(&self, id: Uuid) -> Result<Reply> {
        let doc = self
            .store
            .find_by_id(self.schema.collection, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        Ok(Reply::ok(Envelope::success(
            self.present(doc),
            format!("we found this document by this id: {}", id),
        )))
    }

    /// Partial field replacement. Missing ids answer 404 for every entity;
    /// no required-field validation is re-run here.
    pub async fn update(&self, id: Uuid, mut patch: Map<String, Value>) -> Result<Reply> {
        sanitize(&mut patch);
        self.schema.normalize_emails(&mut patch);

        if self.schema.has_credentials {
            // Password changes do not go through the generic update.
            patch.remove("password");

            if let Some(email) = patch.get("email").and_then(Value::as_str) {
                if let Some(existing) = self
                    .store
                    .find_by_field(self.schema.collection, "email", email)
                    .await?
                {
                    if existing.id != id {
                        return Err(AppError::Validation(EMAIL_EXISTS.to_string()));
                    }
                }
            }
        }

        let doc = self
            .store
            .update(self.schema.collection, id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;

        Ok(Reply::ok(Envelope::success(
            self.present(doc),
            format!("we update this document by this id: {}", id),
        )))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Reply> {
        let doc = self
            .store
            .delete(self.schema.collection, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::debug!(collection = self.schema.collection, id = %id, "document deleted");

        Ok(Reply::ok(Envelope::success(
            self.present(doc),
            format!("Successfully Deleted the document by id: {}", id),
        )))
    }

    /// One page in creation order. 203 when the whole collection is empty,
    /// not merely the requested page.
    pub async fn list(&self, page: u64, items: u64) -> Result<Reply> {
        let count = self.store.count(self.schema.collection).await?;
        let pagination = Pagination { page, items, count };

        if count == 0 {
            let body = Envelope {
                success: false,
                result: json!([]),
                message: Some(COLLECTION_EMPTY.to_string()),
                pagination: Some(pagination),
            };
            return Ok(Reply::new(StatusCode::NON_AUTHORITATIVE_INFORMATION, body));
        }

        let skip = page.saturating_sub(1).saturating_mul(items);
        let docs = self.store.page(self.schema.collection, skip, items).await?;
        let results: Vec<Value> = docs.into_iter().map(|d| self.present(d)).collect();

        Ok(Reply::ok(
            Envelope::success(Value::Array(results), "Successfully found all documents")
                .with_pagination(pagination),
        ))
    }

    /// Case-insensitive substring search. An empty query and a query with
    /// zero matches both answer 202.
    pub async fn search(&self, query: &str, fields: Option<&str>) -> Result<Reply> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Reply::new(
                StatusCode::ACCEPTED,
                Envelope {
                    success: false,
                    result: json!([]),
                    message: Some(NO_SEARCH_RESULT.to_string()),
                    pagination: None,
                },
            ));
        }

        let fields: Vec<String> = match fields {
            Some(names) if !names.trim().is_empty() => names
                .split(',')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            _ => self
                .schema
                .search_fields
                .iter()
                .map(|f| f.to_string())
                .collect(),
        };

        let docs = self
            .store
            .search(self.schema.collection, query, &fields)
            .await?;

        if docs.is_empty() {
            return Ok(Reply::new(
                StatusCode::ACCEPTED,
                Envelope {
                    success: false,
                    result: json!([]),
                    message: Some(NO_SEARCH_RESULT.to_string()),
                    pagination: None,
                },
            ));
        }

        let results: Vec<Value> = docs.into_iter().map(|d| self.present(d)).collect();
        Ok(Reply::ok(Envelope::success(
            Value::Array(results),
            "Successfully found all documents",
        )))
    }

    /// Response payload for one document, with credential material removed.
    fn present(&self, mut doc: Document) -> Value {
        if self.schema.has_credentials {
            doc.fields.remove("password");
        }
        serde_json::to_value(doc).unwrap_or(Value::Null)
    }
}

/// Strip system keys clients must not set: ids are immutable and the
/// creation timestamp is store-assigned.
fn sanitize(body: &mut Map<String, Value>) {
    body.remove("_id");
    body.remove("createdAt");
}
