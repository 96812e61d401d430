use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Reply, ResourceSchema};
use crate::services::ResourceService;
use crate::AppState;

const DEFAULT_ITEMS_PER_PAGE: u64 = 10;
const MAX_ITEMS_PER_PAGE: u64 = 100;

/// Route set shared by every entity. The schema rides along as a request
/// extension so one handler set serves all four collections.
pub fn routes(schema: &'static ResourceSchema) -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", get(list))
        .route("/read/:id", get(read))
        .route("/update/:id", patch(update))
        .route("/delete/:id", delete(remove))
        .route("/search", get(search))
        .layer(Extension(schema))
}

fn service(state: &AppState, schema: &'static ResourceSchema) -> ResourceService {
    ResourceService::new(state.store.clone(), schema)
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid document id: {}", raw)))
}

async fn create(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static ResourceSchema>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Reply> {
    service(&state, schema).create(body).await
}

async fn read(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static ResourceSchema>,
    Path(id): Path<String>,
) -> Result<Reply> {
    let id = parse_id(&id)?;
    service(&state, schema).read(id).await
}

async fn update(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static ResourceSchema>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Reply> {
    let id = parse_id(&id)?;
    service(&state, schema).update(id, body).await
}

async fn remove(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static ResourceSchema>,
    Path(id): Path<String>,
) -> Result<Reply> {
    let id = parse_id(&id)?;
    service(&state, schema).delete(id).await
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u64>,
    items: Option<u64>,
}

async fn list(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static ResourceSchema>,
    Query(query): Query<ListQuery>,
) -> Result<Reply> {
    let page = query.page.unwrap_or(1).max(1);
    let items = query
        .items
        .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
        .clamp(1, MAX_ITEMS_PER_PAGE);
    service(&state, schema).list(page, items).await
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    fields: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static ResourceSchema>,
    Query(query): Query<SearchQuery>,
) -> Result<Reply> {
    service(&state, schema)
        .search(query.q.as_deref().unwrap_or(""), query.fields.as_deref())
        .await
}
