use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;

use super::{Document, DocumentStore};

/// Document store on top of a single JSONB table. Every entity lives in
/// `documents`, partitioned by the `collection` column.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct DocumentRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    fields: Json<Map<String, Value>>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            created_at: row.created_at,
            fields: row.fields.0,
        }
    }
}

const SELECT_DOCUMENT: &str = "SELECT id, created_at, fields FROM documents";

impl PgStore {
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

/// Escape LIKE metacharacters so user queries match literally.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> Result<Document> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO documents (id, collection, created_at, fields) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(collection)
        .bind(created_at)
        .bind(Json(&fields))
        .execute(&self.pool)
        .await?;

        Ok(Document {
            id,
            created_at,
            fields,
        })
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "{SELECT_DOCUMENT} WHERE collection = $1 AND id = $2"
        ))
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "{SELECT_DOCUMENT} WHERE collection = $1 AND fields->>$2 = $3 \
             ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "UPDATE documents SET fields = fields || $3 \
             WHERE collection = $1 AND id = $2 \
             RETURNING id, created_at, fields",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&patch))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 \
             RETURNING id, created_at, fields",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn page(&self, collection: &str, skip: u64, limit: u64) -> Result<Vec<Document>> {
        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            "{SELECT_DOCUMENT} WHERE collection = $1 \
             ORDER BY created_at ASC OFFSET $2 LIMIT $3"
        ))
        .bind(collection)
        .bind(i64::try_from(skip).unwrap_or(i64::MAX))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn search(
        &self,
        collection: &str,
        query: &str,
        fields: &[String],
    ) -> Result<Vec<Document>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }

        // Field names are bound as parameters to the ->> operator, never
        // interpolated into the SQL text.
        let mut sql = format!("{SELECT_DOCUMENT} WHERE collection = $1 AND (");
        for i in 0..fields.len() {
            if i > 0 {
                sql.push_str(" OR ");
            }
            sql.push_str(&format!("fields->>${} ILIKE $2", i + 3));
        }
        sql.push_str(") ORDER BY created_at ASC");

        let pattern = format!("%{}%", escape_like(query));
        let mut q = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(collection)
            .bind(pattern);
        for field in fields {
            q = q.bind(field);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
