use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::Document;
use crate::error::Result;

/// Typed view of an admin document, used by the auth flow. The generic
/// resource service keeps working on raw documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    /// Argon2 hash, never a raw password.
    pub password: String,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub removed: bool,
    #[serde(rename = "isLoggedIn", default)]
    pub is_logged_in: Option<bool>,
}

fn default_true() -> bool {
    true
}

impl Admin {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let value = serde_json::to_value(doc)
            .map_err(|e| anyhow::anyhow!("admin document serialization failed: {}", e))?;
        let admin = serde_json::from_value(value)
            .map_err(|e| anyhow::anyhow!("malformed admin document: {}", e))?;
        Ok(admin)
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            name: self.name.clone(),
            surname: self.surname.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public shape returned from login, no credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
}
