//! API endpoints.

mod admin;
mod engagement;
mod poll;
mod posts;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/posts", posts::router().merge(engagement::router()))
        .nest("/poll", poll::router())
        .nest("/admin", admin::router())
}
