//! Engagement endpoints: likes, comments, replies.

use axum::{extract::State, routing::post, Json, Router};
use brandhub_common::AppResult;
use brandhub_core::CommentThread;
use brandhub_db::entities::{comment, reply};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Comment response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub replies_count: i32,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.text,
            replies_count: comment.replies_count,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Reply response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: String,
    pub comment_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: String,
}

impl From<reply::Model> for ReplyResponse {
    fn from(reply: reply::Model) -> Self {
        Self {
            id: reply.id,
            comment_id: reply.comment_id,
            author_id: reply.author_id,
            text: reply.text,
            created_at: reply.created_at.to_rfc3339(),
        }
    }
}

/// A comment with its replies.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<ReplyResponse>,
}

impl From<CommentThread> for CommentThreadResponse {
    fn from(thread: CommentThread) -> Self {
        Self {
            comment: thread.comment.into(),
            replies: thread.replies.into_iter().map(Into::into).collect(),
        }
    }
}

/// Like toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeRequest {
    pub post_id: String,
}

/// Like toggle response, applied directly by the caller (no reload).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub is_liked: bool,
    pub likes_count: i32,
}

/// Toggle the caller's like on a post.
async fn toggle_like(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ToggleLikeRequest>,
) -> AppResult<ApiResponse<LikeToggleResponse>> {
    let toggle = state
        .engagement_service
        .toggle_like(&identity.user_id, &req.post_id)
        .await?;
    Ok(ApiResponse::ok(LikeToggleResponse {
        is_liked: toggle.is_liked,
        likes_count: toggle.likes_count,
    }))
}

/// Create comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub text: String,
}

/// Add a comment to a post.
async fn create_comment(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .engagement_service
        .add_comment(&identity.user_id, &req.post_id, &req.text)
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// Create reply request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    pub post_id: String,
    pub comment_id: String,
    pub text: String,
}

/// Add a reply to a comment.
async fn create_reply(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReplyRequest>,
) -> AppResult<ApiResponse<ReplyResponse>> {
    let reply = state
        .engagement_service
        .add_reply(&identity.user_id, &req.post_id, &req.comment_id, &req.text)
        .await?;
    Ok(ApiResponse::ok(reply.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/like", post(toggle_like))
        .route("/comments/create", post(create_comment))
        .route("/replies/create", post(create_reply))
}
