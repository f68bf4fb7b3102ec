//! Posts endpoints.

use axum::{extract::State, routing::post, Json, Router};
use brandhub_common::AppResult;
use brandhub_core::{CreatePostInput, FeedPost};
use brandhub_db::entities::post::{self, Category, PostKind};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{
    endpoints::engagement::CommentThreadResponse,
    endpoints::poll::PollViewResponse,
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Post response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub created_at: String,
    pub author_id: String,
    pub category: Category,
    pub kind: PostKind,
    pub text: Option<String>,
    pub photos: JsonValue,
    pub videos: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_opening: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<JsonValue>,
    pub trending: bool,
    pub likes_count: i32,
    pub comments_count: i32,
}

impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            created_at: post.created_at.to_rfc3339(),
            author_id: post.author_id,
            category: post.category,
            kind: post.kind,
            text: post.text,
            photos: post.photos,
            videos: post.videos,
            event: post.event,
            occasion: post.occasion,
            job_opening: post.job_opening,
            document: post.document,
            trending: post.trending,
            likes_count: post.likes_count,
            comments_count: post.comments_count,
        }
    }
}

/// Feed post response, hydrated for the current viewer.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPostResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub is_liked: bool,
}

impl From<FeedPost> for FeedPostResponse {
    fn from(feed_post: FeedPost) -> Self {
        Self {
            post: feed_post.post.into(),
            is_liked: feed_post.is_liked,
        }
    }
}

/// Post detail response: the post with its comment threads and poll view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub is_liked: bool,
    pub comments: Vec<CommentThreadResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<PollViewResponse>,
}

/// Create post request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(flatten)]
    pub input: CreatePostInput,
}

/// Create a new post.
async fn create(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state
        .post_service
        .create(&identity.user_id, req.input)
        .await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Show post request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowPostRequest {
    pub post_id: String,
}

/// Get a post with its engagement state.
async fn show(
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowPostRequest>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let viewer = maybe_user.as_ref().map(|u| u.user_id.as_str());

    let post = state.post_service.get(&req.post_id).await?;

    let is_liked = match viewer {
        Some(user_id) => {
            state
                .engagement_service
                .is_liked_by(user_id, &req.post_id)
                .await?
        }
        None => false,
    };

    let comments = state
        .engagement_service
        .comments_for_post(&req.post_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let poll = state
        .poll_service
        .view_if_present(&req.post_id, viewer)
        .await?
        .map(Into::into);

    Ok(ApiResponse::ok(PostDetailResponse {
        post: post.into(),
        is_liked,
        comments,
        poll,
    }))
}

/// Category feed request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFeedRequest {
    pub category: Category,
    pub limit: Option<u64>,
    pub until_id: Option<String>,
}

/// List posts in a category, newest first.
async fn by_category(
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<CategoryFeedRequest>,
) -> AppResult<ApiResponse<Vec<FeedPostResponse>>> {
    let viewer = maybe_user.as_ref().map(|u| u.user_id.as_str());
    let feed = state
        .feed_service
        .by_category(req.category, req.limit, req.until_id.as_deref(), viewer)
        .await?;
    Ok(ApiResponse::ok(feed.into_iter().map(Into::into).collect()))
}

/// List posts flagged as trending.
async fn trending(
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FeedPostResponse>>> {
    let viewer = maybe_user.as_ref().map(|u| u.user_id.as_str());
    let feed = state.feed_service.trending(viewer).await?;
    Ok(ApiResponse::ok(feed.into_iter().map(Into::into).collect()))
}

/// Author feed request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFeedRequest {
    pub author_id: String,
    pub limit: Option<u64>,
    pub until_id: Option<String>,
}

/// List all posts by one author.
async fn by_author(
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<AuthorFeedRequest>,
) -> AppResult<ApiResponse<Vec<FeedPostResponse>>> {
    let viewer = maybe_user.as_ref().map(|u| u.user_id.as_str());
    let feed = state
        .feed_service
        .by_author(&req.author_id, req.limit, req.until_id.as_deref(), viewer)
        .await?;
    Ok(ApiResponse::ok(feed.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/by-category", post(by_category))
        .route("/trending", post(trending))
        .route("/by-author", post(by_author))
}
