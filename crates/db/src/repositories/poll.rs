//! Poll and poll vote repositories.

use std::sync::Arc;

use crate::entities::{poll, poll_vote, Poll, PollVote};
use brandhub_common::{AppError, AppResult};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect,
};

/// Poll repository for database operations.
#[derive(Clone)]
pub struct PollRepository {
    db: Arc<DatabaseConnection>,
}

impl PollRepository {
    /// Create a new poll repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a poll by post ID.
    pub async fn find_by_post_id(&self, post_id: &str) -> AppResult<Option<poll::Model>> {
        Poll::find_by_id(post_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a poll by post ID, returning error if not found.
    pub async fn get_by_post_id(&self, post_id: &str) -> AppResult<poll::Model> {
        self.find_by_post_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Poll not found for post: {post_id}")))
    }

    /// Create a new poll.
    pub async fn create(&self, model: poll::ActiveModel) -> AppResult<poll::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Poll vote repository for database operations.
#[derive(Clone)]
pub struct PollVoteRepository {
    db: Arc<DatabaseConnection>,
}

impl PollVoteRepository {
    /// Create a new poll vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a vote if the user has not voted on this poll yet.
    ///
    /// Uses `ON CONFLICT DO NOTHING` against the unique `(user_id, post_id)`
    /// index: a vote is immutable once present, and concurrent duplicate
    /// submissions by the same user collapse to a single row. Returns `true`
    /// if the vote was recorded.
    pub async fn insert_if_absent(&self, model: poll_vote::ActiveModel) -> AppResult<bool> {
        let rows = PollVote::insert(model)
            .on_conflict(
                OnConflict::columns([poll_vote::Column::UserId, poll_vote::Column::PostId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows > 0)
    }

    /// Find a user's vote on a poll.
    pub async fn find_by_user_and_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> AppResult<Option<poll_vote::Model>> {
        PollVote::find()
            .filter(poll_vote::Column::UserId.eq(user_id))
            .filter(poll_vote::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Vote counts per choice index (GROUP BY over the vote rows).
    ///
    /// The vote rows are the single source of truth for tallies; choices
    /// with no votes are absent from the result.
    pub async fn tally_by_choice(&self, post_id: &str) -> AppResult<Vec<(i32, i64)>> {
        PollVote::find()
            .select_only()
            .column(poll_vote::Column::Choice)
            .column_as(poll_vote::Column::Id.count(), "count")
            .filter(poll_vote::Column::PostId.eq(post_id))
            .group_by(poll_vote::Column::Choice)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of voters on a poll.
    ///
    /// One row per (user, post) under the unique index, so the row count
    /// equals the voter count and always matches the sum of the tally.
    pub async fn count_voters(&self, post_id: &str) -> AppResult<i64> {
        let count = PollVote::find()
            .filter(poll_vote::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count as i64)
    }
}
