//! Engagement service: like toggling, comments, replies.

use std::collections::HashMap;

use brandhub_common::{AppError, AppResult, IdGenerator};
use brandhub_db::{
    entities::{comment, post_like, reply},
    repositories::{CommentRepository, LikeRepository, PostRepository, ReplyRepository},
};
use chrono::Utc;
use sea_orm::Set;

/// Maximum length of a comment or reply.
const MAX_TEXT_LEN: usize = 2000;

/// Engagement service for business logic.
#[derive(Clone)]
pub struct EngagementService {
    post_repo: PostRepository,
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    reply_repo: ReplyRepository,
    id_gen: IdGenerator,
}

/// Result of a like toggle, applied directly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    /// Whether the user is in the like set after the toggle.
    pub is_liked: bool,
    /// Size of the like set after the toggle.
    pub likes_count: i32,
}

/// A comment with its replies, in insertion order.
#[derive(Debug, Clone)]
pub struct CommentThread {
    pub comment: comment::Model,
    pub replies: Vec<reply::Model>,
}

impl EngagementService {
    /// Create a new engagement service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        reply_repo: ReplyRepository,
    ) -> Self {
        Self {
            post_repo,
            like_repo,
            comment_repo,
            reply_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the caller's like on a post.
    ///
    /// Membership in the like set decides the direction: non-members like,
    /// members unlike. The conditional insert against the unique
    /// `(user_id, post_id)` index is the serialization point, so two
    /// concurrent toggles by the same user settle on one state instead of
    /// drifting the count, and toggles by different users never interfere.
    pub async fn toggle_like(&self, user_id: &str, post_id: &str) -> AppResult<LikeToggle> {
        // Check if post exists
        self.post_repo.get_by_id(post_id).await?;

        let model = post_like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            post_id: Set(post_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let is_liked = if self.like_repo.insert_if_absent(model).await? {
            self.post_repo.increment_likes_count(post_id).await?;
            true
        } else if self
            .like_repo
            .delete_by_user_and_post(user_id, post_id)
            .await?
        {
            self.post_repo.decrement_likes_count(post_id).await?;
            false
        } else {
            // A concurrent unlike by the same user removed the row between
            // the conflict and the delete; the set no longer contains us.
            false
        };

        // The like set is authoritative; the count always equals its size.
        let likes_count = self.like_repo.count_by_post(post_id).await?;

        tracing::debug!(post_id = %post_id, user_id = %user_id, is_liked, "Like toggled");

        Ok(LikeToggle {
            is_liked,
            likes_count,
        })
    }

    /// Add a comment to a post.
    pub async fn add_comment(
        &self,
        user_id: &str,
        post_id: &str,
        text: &str,
    ) -> AppResult<comment::Model> {
        let text = Self::validate_text(text)?;

        // Check if post exists
        self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            author_id: Set(user_id.to_string()),
            text: Set(text),
            replies_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        let created = self.comment_repo.create(model).await?;

        self.post_repo.increment_comments_count(post_id).await?;

        Ok(created)
    }

    /// Add a reply to a comment.
    ///
    /// Replies live one level below comments and only there; a reply id
    /// passed as `comment_id` is simply not a comment and fails the lookup.
    pub async fn add_reply(
        &self,
        user_id: &str,
        post_id: &str,
        comment_id: &str,
        text: &str,
    ) -> AppResult<reply::Model> {
        let text = Self::validate_text(text)?;

        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.post_id != post_id {
            return Err(AppError::CommentNotFound(comment_id.to_string()));
        }

        let model = reply::ActiveModel {
            id: Set(self.id_gen.generate()),
            comment_id: Set(comment_id.to_string()),
            author_id: Set(user_id.to_string()),
            text: Set(text),
            created_at: Set(Utc::now().into()),
        };

        let created = self.reply_repo.create(model).await?;

        self.comment_repo.increment_replies_count(comment_id).await?;

        Ok(created)
    }

    /// Whether a user is in a post's like set (read-time projection).
    pub async fn is_liked_by(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        self.like_repo.has_liked(user_id, post_id).await
    }

    /// Get the comment threads on a post, in insertion order.
    pub async fn comments_for_post(&self, post_id: &str) -> AppResult<Vec<CommentThread>> {
        // Check if post exists
        self.post_repo.get_by_id(post_id).await?;

        let comments = self.comment_repo.find_by_post(post_id).await?;
        let comment_ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();

        let mut replies_by_comment: HashMap<String, Vec<reply::Model>> = HashMap::new();
        for reply in self.reply_repo.find_by_comments(&comment_ids).await? {
            replies_by_comment
                .entry(reply.comment_id.clone())
                .or_default()
                .push(reply);
        }

        Ok(comments
            .into_iter()
            .map(|comment| {
                let replies = replies_by_comment.remove(&comment.id).unwrap_or_default();
                CommentThread { comment, replies }
            })
            .collect())
    }

    /// Reject empty or oversized comment/reply text.
    fn validate_text(text: &str) -> AppResult<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("Text cannot be empty".to_string()));
        }
        if trimmed.len() > MAX_TEXT_LEN {
            return Err(AppError::Validation(format!(
                "Text is too long (max {MAX_TEXT_LEN} chars)"
            )));
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use brandhub_db::entities::post::{self, Category, PostKind};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_post(id: &str, author_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            category: Category::StartupEssentials,
            kind: PostKind::Text,
            text: Some("Test post".to_string()),
            photos: json!([]),
            videos: json!([]),
            event: None,
            occasion: None,
            job_opening: None,
            document: None,
            trending: false,
            likes_count: 0,
            comments_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_comment(id: &str, post_id: &str, author_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
            text: "Test comment".to_string(),
            replies_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }
    }

    fn service(
        post_db: sea_orm::DatabaseConnection,
        like_db: sea_orm::DatabaseConnection,
        comment_db: sea_orm::DatabaseConnection,
        reply_db: sea_orm::DatabaseConnection,
    ) -> EngagementService {
        EngagementService::new(
            PostRepository::new(Arc::new(post_db)),
            LikeRepository::new(Arc::new(like_db)),
            CommentRepository::new(Arc::new(comment_db)),
            ReplyRepository::new(Arc::new(reply_db)),
        )
    }

    #[tokio::test]
    async fn test_toggle_like_post_not_found() {
        let post_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let like_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let reply_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(post_db, like_db, comment_db, reply_db);

        let result = service.toggle_like("user1", "missing").await;
        match result {
            Err(AppError::PostNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected PostNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_toggle_like_twice_returns_to_original_state() {
        let post = create_test_post("post1", "author1");

        // Two existence checks, one per toggle
        let post_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post.clone()], [post]])
            .append_exec_results([exec_result(1), exec_result(1)])
            .into_connection();
        // First toggle: insert succeeds, count = 1.
        // Second toggle: insert conflicts, delete succeeds, count = 0.
        let like_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(1), exec_result(0), exec_result(1)])
            .append_query_results([[count_row(1)], [count_row(0)]])
            .into_connection();
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let reply_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(post_db, like_db, comment_db, reply_db);

        let first = service.toggle_like("user1", "post1").await.unwrap();
        assert!(first.is_liked);
        assert_eq!(first.likes_count, 1);

        let second = service.toggle_like("user1", "post1").await.unwrap();
        assert!(!second.is_liked);
        assert_eq!(second.likes_count, 0);
    }

    #[tokio::test]
    async fn test_add_comment_empty_text() {
        let post_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let like_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let reply_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(post_db, like_db, comment_db, reply_db);

        let result = service.add_comment("user1", "post1", "   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_reply_comment_not_found() {
        let post_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let like_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        // A reply id used as a comment id finds nothing in the comment table
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<comment::Model>::new()])
            .into_connection();
        let reply_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(post_db, like_db, comment_db, reply_db);

        let result = service.add_reply("user2", "post1", "reply1", "nice").await;
        match result {
            Err(AppError::CommentNotFound(id)) => assert_eq!(id, "reply1"),
            _ => panic!("Expected CommentNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_add_reply_wrong_post() {
        let comment = create_test_comment("c1", "other-post", "user1");

        let post_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let like_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[comment]])
            .into_connection();
        let reply_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(post_db, like_db, comment_db, reply_db);

        let result = service.add_reply("user2", "post1", "c1", "nice").await;
        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_comments_for_post_groups_replies() {
        let post = create_test_post("post1", "author1");
        let c1 = create_test_comment("c1", "post1", "user1");
        let c2 = create_test_comment("c2", "post1", "user2");
        let r1 = reply::Model {
            id: "r1".to_string(),
            comment_id: "c1".to_string(),
            author_id: "user2".to_string(),
            text: "nice".to_string(),
            created_at: Utc::now().into(),
        };

        let post_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post]])
            .into_connection();
        let like_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[c1, c2]])
            .into_connection();
        let reply_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[r1]])
            .into_connection();

        let service = service(post_db, like_db, comment_db, reply_db);

        let threads = service.comments_for_post("post1").await.unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].replies.len(), 1);
        assert!(threads[1].replies.is_empty());
    }
}
