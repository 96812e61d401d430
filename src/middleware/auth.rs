use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

pub const NO_TOKEN: &str = "No authentication token, authorization denied.";
pub const BAD_TOKEN: &str = "Token verification failed, authorization denied.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id.
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: Uuid,
    pub email: String,
}

/// Token guard for protected routes. The browser client sends the token in
/// `x-auth-token`; `Authorization: Bearer` is accepted as well.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let token = headers
        .get("x-auth-token")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .ok_or_else(|| AppError::Unauthorized(NO_TOKEN.to_string()))?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized(BAD_TOKEN.to_string()))?
    .claims;

    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized(BAD_TOKEN.to_string()))?;

    let current_admin = CurrentAdmin {
        id,
        email: claims.email,
    };

    request.extensions_mut().insert(current_admin);

    Ok(next.run(request).await)
}
