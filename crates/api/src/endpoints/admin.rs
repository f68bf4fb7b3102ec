//! Admin endpoints.

use axum::{extract::State, routing::post, Json, Router};
use brandhub_common::{AppError, AppResult};
use serde::Deserialize;

use crate::{
    endpoints::posts::PostResponse, extractors::AuthUser, middleware::AppState,
    response::ApiResponse,
};

/// Set trending request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTrendingRequest {
    pub post_id: String,
    pub trending: bool,
}

/// Flip the trending flag on a post.
///
/// Requires the admin capability forwarded by the session gateway; the
/// check happens before the service is touched.
async fn set_trending(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetTrendingRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    if !identity.is_admin {
        return Err(AppError::Forbidden(
            "Moderation capability required".to_string(),
        ));
    }

    let post = state
        .moderation_service
        .set_trending(&req.post_id, req.trending)
        .await?;
    Ok(ApiResponse::ok(post.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/posts/set-trending", post(set_trending))
}
