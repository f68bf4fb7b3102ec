//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use brandhub_api::{
    middleware::{identity_middleware, AppState},
    router as api_router,
};
use brandhub_common::config::FeedConfig;
use brandhub_core::{
    EngagementService, FeedService, ModerationService, PollService, PostService,
};
use brandhub_db::entities::{comment, poll, post};
use brandhub_db::repositories::{
    CommentRepository, LikeRepository, PollRepository, PollVoteRepository, PostRepository,
    ReplyRepository,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

/// Create an empty mock database connection.
fn mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// A mock post database whose first lookup finds nothing.
fn post_db_without_posts() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection()
}

fn test_post(id: &str, trending: bool) -> post::Model {
    post::Model {
        id: id.to_string(),
        author_id: "author1".to_string(),
        category: post::Category::TechnologyTools,
        kind: post::PostKind::Text,
        text: Some("Integration test post".to_string()),
        photos: json!([]),
        videos: json!([]),
        event: None,
        occasion: None,
        job_opening: None,
        document: None,
        trending,
        likes_count: 0,
        comments_count: 0,
        created_at: Utc::now().into(),
    }
}

/// Create test app state over per-repository mock databases.
fn create_test_state(
    post_db: DatabaseConnection,
    poll_db: DatabaseConnection,
) -> AppState {
    let post_db = Arc::new(post_db);
    let poll_db = Arc::new(poll_db);

    let post_repo = PostRepository::new(Arc::clone(&post_db));
    let like_repo = LikeRepository::new(Arc::new(mock_db()));
    let comment_repo = CommentRepository::new(Arc::new(mock_db()));
    let reply_repo = ReplyRepository::new(Arc::new(mock_db()));
    let poll_repo = PollRepository::new(Arc::clone(&poll_db));
    let vote_repo = PollVoteRepository::new(Arc::new(mock_db()));

    AppState {
        post_service: PostService::new(post_repo.clone(), poll_repo.clone()),
        engagement_service: EngagementService::new(
            post_repo.clone(),
            like_repo.clone(),
            comment_repo,
            reply_repo,
        ),
        poll_service: PollService::new(poll_repo, vote_repo),
        feed_service: FeedService::new(post_repo.clone(), like_repo, FeedConfig::default()),
        moderation_service: ModerationService::new(post_repo),
    }
}

/// Create the test router with the identity middleware attached.
fn create_test_router(state: AppState) -> Router {
    api_router()
        .layer(axum::middleware::from_fn(identity_middleware))
        .with_state(state)
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(uri: &str, user_id: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .header("x-user-id", user_id)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_like_without_identity_is_unauthenticated() {
    let app = create_test_router(create_test_state(mock_db(), mock_db()));

    let response = app
        .oneshot(json_request("/posts/like", json!({"postId": "post1"})))
        .await
        .unwrap();

    // Rejected before any mutation is attempted
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_like_missing_post_returns_not_found() {
    let app = create_test_router(create_test_state(post_db_without_posts(), mock_db()));

    let response = app
        .oneshot(authed_json_request(
            "/posts/like",
            "user1",
            json!({"postId": "missing"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_with_empty_text_is_rejected() {
    let app = create_test_router(create_test_state(mock_db(), mock_db()));

    let response = app
        .oneshot(authed_json_request(
            "/posts/comments/create",
            "user1",
            json!({"postId": "post1", "text": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_trending_requires_admin_capability() {
    let app = create_test_router(create_test_state(mock_db(), mock_db()));

    let response = app
        .oneshot(authed_json_request(
            "/admin/posts/set-trending",
            "user1",
            json!({"postId": "post1", "trending": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_poll_results_missing_poll_returns_not_found() {
    let poll_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<poll::Model>::new()])
        .into_connection();
    let app = create_test_router(create_test_state(mock_db(), poll_db));

    let response = app
        .oneshot(json_request("/poll/results", json!({"postId": "missing"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vote_without_identity_is_unauthenticated() {
    let app = create_test_router(create_test_state(mock_db(), mock_db()));

    let response = app
        .oneshot(json_request(
            "/poll/vote",
            json!({"postId": "post1", "choice": 0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_trending_feed_for_anonymous_viewer() {
    let post_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_post("post1", true)]])
        .into_connection();
    let app = create_test_router(create_test_state(post_db, mock_db()));

    let response = app
        .oneshot(json_request("/posts/trending", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let feed = parsed["data"].as_array().unwrap();

    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["id"], "post1");
    assert_eq!(feed[0]["isLiked"], false);
    assert_eq!(feed[0]["trending"], true);
}

#[tokio::test]
async fn test_reply_to_missing_comment_returns_not_found() {
    let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<comment::Model>::new()])
        .into_connection();

    let post_repo = PostRepository::new(Arc::new(mock_db()));
    let like_repo = LikeRepository::new(Arc::new(mock_db()));
    let state = AppState {
        post_service: PostService::new(
            post_repo.clone(),
            PollRepository::new(Arc::new(mock_db())),
        ),
        engagement_service: EngagementService::new(
            post_repo.clone(),
            like_repo.clone(),
            CommentRepository::new(Arc::new(comment_db)),
            ReplyRepository::new(Arc::new(mock_db())),
        ),
        poll_service: PollService::new(
            PollRepository::new(Arc::new(mock_db())),
            PollVoteRepository::new(Arc::new(mock_db())),
        ),
        feed_service: FeedService::new(post_repo.clone(), like_repo, FeedConfig::default()),
        moderation_service: ModerationService::new(post_repo),
    };
    let app = create_test_router(state);

    let response = app
        .oneshot(authed_json_request(
            "/posts/replies/create",
            "user2",
            json!({"postId": "post1", "commentId": "not-a-comment", "text": "nice"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
