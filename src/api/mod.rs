mod auth;
mod resource;

use axum::Router;

use crate::models::schema;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::routes(state))
        .nest("/admin", resource::routes(&schema::ADMIN))
        .nest("/client", resource::routes(&schema::CLIENT))
        .nest("/lead", resource::routes(&schema::LEAD))
        .nest("/product", resource::routes(&schema::PRODUCT))
}
