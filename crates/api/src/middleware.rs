//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use brandhub_core::{EngagementService, FeedService, ModerationService, PollService, PostService};

use crate::extractors::Identity;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub post_service: PostService,
    pub engagement_service: EngagementService,
    pub poll_service: PollService,
    pub feed_service: FeedService,
    pub moderation_service: ModerationService,
}

/// Identity middleware.
///
/// The external session gateway authenticates the caller and forwards the
/// result as trusted headers; this middleware turns them into a request
/// extension. Requests without a forwarded identity stay anonymous and are
/// rejected by `AuthUser` at extraction time.
pub async fn identity_middleware(mut req: Request<Body>, next: Next) -> Response {
    let user_id = req
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    if let Some(user_id) = user_id {
        let is_admin = req
            .headers()
            .get("x-user-admin")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true" || v == "1");

        req.extensions_mut().insert(Identity { user_id, is_admin });
    }

    next.run(req).await
}
