//! Like repository.

use std::sync::Arc;

use crate::entities::{post_like, PostLike};
use brandhub_common::{AppError, AppResult};
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a like-set membership row if the user is not already in the set.
    ///
    /// Uses `ON CONFLICT DO NOTHING` against the unique `(user_id, post_id)`
    /// index, so concurrent duplicate submissions collapse to a single row.
    /// Returns `true` if the row was inserted (the user was not a member).
    pub async fn insert_if_absent(&self, model: post_like::ActiveModel) -> AppResult<bool> {
        let rows = PostLike::insert(model)
            .on_conflict(
                OnConflict::columns([post_like::Column::UserId, post_like::Column::PostId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows > 0)
    }

    /// Remove a user's like from a post. Returns `true` if a row was removed.
    pub async fn delete_by_user_and_post(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        let result = PostLike::delete_many()
            .filter(post_like::Column::UserId.eq(user_id))
            .filter(post_like::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Check if a user has liked a post.
    pub async fn has_liked(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        let count = PostLike::find()
            .filter(post_like::Column::UserId.eq(user_id))
            .filter(post_like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Size of the like set for a post.
    ///
    /// The unique index guarantees one row per (user, post), so this equals
    /// the number of distinct likers.
    pub async fn count_by_post(&self, post_id: &str) -> AppResult<i32> {
        let count = PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count as i32)
    }

    /// Among `post_ids`, the ones the user has liked.
    ///
    /// Batched membership probe for per-viewer feed hydration.
    pub async fn find_liked_post_ids(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> AppResult<Vec<String>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = PostLike::find()
            .filter(post_like::Column::UserId.eq(user_id))
            .filter(post_like::Column::PostId.is_in(post_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|like| like.post_id).collect())
    }
}
