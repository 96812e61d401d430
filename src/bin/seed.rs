//! Seed script for creating the initial admin account.
//! Run with: cargo run --bin seed

use serde_json::json;

use crm_api::config::Config;
use crm_api::db::{DocumentStore, PgStore};
use crm_api::services::hash_password;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    println!("Connecting to database...");
    let store = PgStore::connect(&config).await?;
    store.run_migrations().await?;
    println!("Connected successfully!");

    let email = std::env::var("ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@demo.com".to_string())
        .trim()
        .to_lowercase();
    let password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123456".to_string());
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string());
    let surname = std::env::var("ADMIN_SURNAME").unwrap_or_else(|_| "Demo".to_string());

    println!("Hashing password...");
    let password_hash = hash_password(&password)?;

    if let Some(existing) = store.find_by_field("admin", "email", &email).await? {
        println!("Updating existing admin password...");
        let patch = json!({ "password": password_hash })
            .as_object()
            .cloned()
            .unwrap_or_default();
        store.update("admin", existing.id, patch).await?;
        println!("Admin password updated successfully!");
    } else {
        println!("Creating new admin...");
        let fields = json!({
            "email": email,
            "password": password_hash,
            "name": name,
            "surname": surname,
            "enabled": true,
            "removed": false,
        })
        .as_object()
        .cloned()
        .unwrap_or_default();
        store.insert("admin", fields).await?;
        println!("Admin created successfully!");
    }

    println!("\n========================================");
    println!("Admin Account Ready!");
    println!("========================================");
    println!("Email:    {}", email);
    println!("Password: {}", password);
    println!("========================================");

    Ok(())
}
