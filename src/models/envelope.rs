use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response wrapper shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub items: u64,
    pub count: u64,
}

impl Envelope {
    pub fn success(result: Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            result,
            message: Some(message.into()),
            pagination: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: Value::Null,
            message: Some(message.into()),
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// An envelope paired with the status code the contract assigns to it.
///
/// The list/search endpoints answer 203 and 202 for "empty collection" and
/// "nothing matched", which are not errors, so they cannot flow through
/// `AppError`.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Envelope,
}

impl Reply {
    pub fn new(status: StatusCode, body: Envelope) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Envelope) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
