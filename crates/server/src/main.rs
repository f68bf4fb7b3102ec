//! Brandhub server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use brandhub_api::{middleware::AppState, router as api_router};
use brandhub_common::Config;
use brandhub_core::{
    EngagementService, FeedService, ModerationService, PollService, PostService,
};
use brandhub_db::repositories::{
    CommentRepository, LikeRepository, PollRepository, PollVoteRepository, PostRepository,
    ReplyRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brandhub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting brandhub server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = brandhub_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    brandhub_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Initialize repositories
    let post_repo = PostRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let reply_repo = ReplyRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let vote_repo = PollVoteRepository::new(Arc::clone(&db));

    // Initialize services
    let post_service = PostService::new(post_repo.clone(), poll_repo.clone());
    let engagement_service = EngagementService::new(
        post_repo.clone(),
        like_repo.clone(),
        comment_repo,
        reply_repo,
    );
    let poll_service = PollService::new(poll_repo, vote_repo);
    let feed_service = FeedService::new(post_repo.clone(), like_repo, config.feed.clone());
    let moderation_service = ModerationService::new(post_repo);

    let state = AppState {
        post_service,
        engagement_service,
        poll_service,
        feed_service,
        moderation_service,
    };

    // Build the router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn(
            brandhub_api::middleware::identity_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
