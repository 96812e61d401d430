use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::Config;
use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::middleware::Claims;
use crate::models::{schema, Admin};

pub const FIELDS_MISSING: &str = "Not all fields have been entered.";
pub const NO_ACCOUNT: &str = "No account with this email exists.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

pub struct AuthService {
    store: Arc<dyn DocumentStore>,
    config: Config,
}

impl AuthService {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self { store, config }
    }

    /// Verify credentials against the admin collection. Removed accounts
    /// are treated as nonexistent. Password mismatch always answers with
    /// the same message, never the account-lookup one.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(Admin, String)> {
        let email = email.trim().to_lowercase();

        let doc = self
            .store
            .find_by_field(schema::ADMIN.collection, "email", &email)
            .await?
            .ok_or_else(|| AppError::Validation(NO_ACCOUNT.to_string()))?;

        let admin = Admin::from_document(&doc)?;
        if admin.removed {
            return Err(AppError::Validation(NO_ACCOUNT.to_string()));
        }

        verify_password(password, &admin.password)
            .map_err(|_| AppError::Validation(INVALID_CREDENTIALS.to_string()))?;

        let token = self.generate_token(&admin)?;
        self.set_logged_in(admin.id, true).await?;

        Ok((admin, token))
    }

    /// Clear the session flag on the admin document.
    pub async fn logout(&self, admin_id: Uuid) -> Result<()> {
        self.set_logged_in(admin_id, false).await
    }

    async fn set_logged_in(&self, admin_id: Uuid, logged_in: bool) -> Result<()> {
        let mut patch = Map::new();
        patch.insert("isLoggedIn".to_string(), Value::Bool(logged_in));
        self.store
            .update(schema::ADMIN.collection, admin_id, patch)
            .await?;
        Ok(())
    }

    pub fn generate_token(&self, admin: &Admin) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.config.jwt.expiry_hours as i64);

        let claims = Claims {
            sub: admin.id.to_string(),
            email: admin.email.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Validation(INVALID_CREDENTIALS.to_string()))
}
