//! Moderation service.

use brandhub_common::{AppError, AppResult};
use brandhub_db::{entities::post, repositories::PostRepository};

/// Moderation service for admin-side mutations.
///
/// Deliberately touches only the `trending` column; engagement state lives
/// behind the same post id but in separate code paths.
#[derive(Clone)]
pub struct ModerationService {
    post_repo: PostRepository,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(post_repo: PostRepository) -> Self {
        Self { post_repo }
    }

    /// Set the trending flag on a post.
    ///
    /// Idempotent: re-setting the current value succeeds and returns the
    /// same state. Capability checks happen at the caller's boundary.
    pub async fn set_trending(&self, post_id: &str, value: bool) -> AppResult<post::Model> {
        let matched = self.post_repo.set_trending(post_id, value).await?;
        if matched == 0 {
            return Err(AppError::PostNotFound(post_id.to_string()));
        }

        tracing::info!(post_id = %post_id, trending = value, "Trending flag updated");

        self.post_repo.get_by_id(post_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use brandhub_db::entities::post::{Category, PostKind};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_post(id: &str, trending: bool) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: "author1".to_string(),
            category: Category::Inspirations,
            kind: PostKind::Text,
            text: Some("Test post".to_string()),
            photos: json!([]),
            videos: json!([]),
            event: None,
            occasion: None,
            job_opening: None,
            document: None,
            trending,
            likes_count: 7,
            comments_count: 2,
            created_at: Utc::now().into(),
        }
    }

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_set_trending_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_result(0)])
                .into_connection(),
        );

        let service = ModerationService::new(PostRepository::new(db));

        let result = service.set_trending("missing", true).await;
        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_set_trending_idempotent() {
        let flagged = create_test_post("post1", true);

        // Two set calls with the same value: both match a row, both return
        // the same state, and engagement counters are untouched.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_result(1), exec_result(1)])
                .append_query_results([[flagged.clone()], [flagged]])
                .into_connection(),
        );

        let service = ModerationService::new(PostRepository::new(db));

        let first = service.set_trending("post1", true).await.unwrap();
        let second = service.set_trending("post1", true).await.unwrap();

        assert!(first.trending);
        assert_eq!(first, second);
        assert_eq!(second.likes_count, 7);
        assert_eq!(second.comments_count, 2);
    }
}
