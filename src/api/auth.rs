use axum::{extract::State, middleware, routing::post, Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::middleware::{require_auth, CurrentAdmin};
use crate::models::{Envelope, Reply};
use crate::services::{AuthService, FIELDS_MISSING};
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/login", post(login)).merge(protected)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Reply> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let password = payload.password.as_deref().filter(|s| !s.is_empty());

    let (email, password) = match (email, password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(AppError::Validation(FIELDS_MISSING.to_string())),
    };

    let auth_service = AuthService::new(state.store.clone(), state.config.clone());
    let (admin, token) = auth_service.authenticate(email, password).await?;

    Ok(Reply::ok(Envelope::success(
        json!({
            "token": token,
            "admin": admin.profile(),
        }),
        "Successfully logged in admin",
    )))
}

async fn logout(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
) -> Result<Json<Value>> {
    let auth_service = AuthService::new(state.store.clone(), state.config.clone());
    auth_service.logout(current_admin.id).await?;

    Ok(Json(json!({ "isLoggedIn": false })))
}
