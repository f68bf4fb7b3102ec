//! Comment and reply repositories.

use std::sync::Arc;

use crate::entities::{comment, reply, Comment, Reply};
use brandhub_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the comments on a post, in insertion order.
    ///
    /// ULID ids sort chronologically, so ascending id == chronological.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment reply count atomically (single UPDATE query, no fetch).
    pub async fn increment_replies_count(&self, comment_id: &str) -> AppResult<()> {
        Comment::update_many()
            .col_expr(
                comment::Column::RepliesCount,
                Expr::col(comment::Column::RepliesCount).add(1),
            )
            .filter(comment::Column::Id.eq(comment_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Reply repository for database operations.
#[derive(Clone)]
pub struct ReplyRepository {
    db: Arc<DatabaseConnection>,
}

impl ReplyRepository {
    /// Create a new reply repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new reply.
    pub async fn create(&self, model: reply::ActiveModel) -> AppResult<reply::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the replies on a comment, in insertion order.
    pub async fn find_by_comment(&self, comment_id: &str) -> AppResult<Vec<reply::Model>> {
        Reply::find()
            .filter(reply::Column::CommentId.eq(comment_id))
            .order_by_asc(reply::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the replies on a batch of comments, in insertion order.
    ///
    /// One query per page of comments rather than one per comment.
    pub async fn find_by_comments(&self, comment_ids: &[String]) -> AppResult<Vec<reply::Model>> {
        if comment_ids.is_empty() {
            return Ok(vec![]);
        }

        Reply::find()
            .filter(reply::Column::CommentId.is_in(comment_ids.to_vec()))
            .order_by_asc(reply::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
