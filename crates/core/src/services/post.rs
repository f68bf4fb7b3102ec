//! Post service.

use brandhub_common::{AppError, AppResult, IdGenerator};
use brandhub_db::{
    entities::post::{self, Category, PostKind},
    entities::poll,
    repositories::{PollRepository, PostRepository},
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use validator::Validate;

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    poll_repo: PollRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    pub category: Category,

    pub kind: PostKind,

    #[validate(length(max = 5000))]
    pub text: Option<String>,

    /// Photo URLs from the media storage provider.
    #[validate(length(max = 10))]
    #[serde(default)]
    pub photos: Vec<String>,

    /// Video URLs from the media storage provider.
    #[validate(length(max = 4))]
    #[serde(default)]
    pub videos: Vec<String>,

    pub event: Option<JsonValue>,
    pub occasion: Option<JsonValue>,
    pub job_opening: Option<JsonValue>,
    pub document: Option<JsonValue>,

    pub poll: Option<CreatePollInput>,
}

/// Input for creating a poll alongside a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollInput {
    #[validate(length(min = 1, max = 512))]
    pub question: String,

    pub options: Vec<String>,

    pub ends_at: DateTime<Utc>,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(post_repo: PostRepository, poll_repo: PollRepository) -> Self {
        Self {
            post_repo,
            poll_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post.
    ///
    /// The kind tag must match the payload it announces; non-poll payload
    /// fields are non-exclusive (a media post may also carry text). A poll
    /// payload creates the poll row alongside the post.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;
        Self::validate_kind_payload(&input)?;

        if let Some(ref poll_input) = input.poll {
            poll_input.validate()?;
            Self::validate_poll(poll_input)?;
        }

        let now = Utc::now();
        let post_id = self.id_gen.generate();

        let model = post::ActiveModel {
            id: Set(post_id.clone()),
            author_id: Set(author_id.to_string()),
            category: Set(input.category.clone()),
            kind: Set(input.kind),
            text: Set(input.text.clone()),
            photos: Set(json!(input.photos)),
            videos: Set(json!(input.videos)),
            event: Set(input.event.clone()),
            occasion: Set(input.occasion.clone()),
            job_opening: Set(input.job_opening.clone()),
            document: Set(input.document.clone()),
            trending: Set(false),
            likes_count: Set(0),
            comments_count: Set(0),
            created_at: Set(now.into()),
        };

        let created = self.post_repo.create(model).await?;

        if let Some(poll_input) = input.poll {
            let poll_model = poll::ActiveModel {
                post_id: Set(created.id.clone()),
                question: Set(poll_input.question),
                options: Set(json!(poll_input.options)),
                ends_at: Set(poll_input.ends_at.into()),
                created_at: Set(now.into()),
            };
            self.poll_repo.create(poll_model).await?;
        }

        tracing::debug!(post_id = %created.id, author_id = %author_id, "Post created");

        Ok(created)
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Check that the payload announced by `kind` is actually present.
    fn validate_kind_payload(input: &CreatePostInput) -> AppResult<()> {
        let has_text = input
            .text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        let has_media = !input.photos.is_empty() || !input.videos.is_empty();

        let ok = match input.kind {
            PostKind::Text => has_text,
            PostKind::Media => has_media,
            PostKind::Event => input.event.is_some(),
            PostKind::Occasion => input.occasion.is_some(),
            PostKind::JobOpening => input.job_opening.is_some(),
            PostKind::Document => input.document.is_some(),
            PostKind::Poll => input.poll.is_some(),
        };

        if ok {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Post kind {:?} requires its payload",
                input.kind
            )))
        }
    }

    /// Validate a poll payload: 2-4 distinct, non-empty options.
    fn validate_poll(input: &CreatePollInput) -> AppResult<()> {
        if input.options.len() < 2 {
            return Err(AppError::Validation(
                "Poll must have at least 2 options".to_string(),
            ));
        }
        if input.options.len() > 4 {
            return Err(AppError::Validation(
                "Poll cannot have more than 4 options".to_string(),
            ));
        }
        for option in &input.options {
            if option.trim().is_empty() {
                return Err(AppError::Validation(
                    "Poll options cannot be empty".to_string(),
                ));
            }
            if option.len() > 100 {
                return Err(AppError::Validation(
                    "Poll option is too long (max 100 chars)".to_string(),
                ));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for option in &input.options {
            if !seen.insert(option.as_str()) {
                return Err(AppError::Validation(
                    "Poll options must be distinct".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_input(kind: PostKind) -> CreatePostInput {
        CreatePostInput {
            category: Category::StartupEssentials,
            kind,
            text: None,
            photos: vec![],
            videos: vec![],
            event: None,
            occasion: None,
            job_opening: None,
            document: None,
            poll: None,
        }
    }

    fn service_with_empty_mocks() -> PostService {
        let post_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let poll_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        PostService::new(PostRepository::new(post_db), PollRepository::new(poll_db))
    }

    #[tokio::test]
    async fn test_create_text_post_requires_text() {
        let service = service_with_empty_mocks();

        let result = service.create("user1", test_input(PostKind::Text)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let mut input = test_input(PostKind::Text);
        input.text = Some("   ".to_string());
        let result = service.create("user1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_media_post_requires_media() {
        let service = service_with_empty_mocks();

        let result = service.create("user1", test_input(PostKind::Media)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_poll_post_requires_poll_payload() {
        let service = service_with_empty_mocks();

        let result = service.create("user1", test_input(PostKind::Poll)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_poll_option_count() {
        let base = |options: Vec<&str>| CreatePollInput {
            question: "Pick one".to_string(),
            options: options.into_iter().map(String::from).collect(),
            ends_at: Utc::now() + chrono::Duration::hours(1),
        };

        assert!(PostService::validate_poll(&base(vec!["A"])).is_err());
        assert!(PostService::validate_poll(&base(vec!["A", "B"])).is_ok());
        assert!(PostService::validate_poll(&base(vec!["A", "B", "C", "D"])).is_ok());
        assert!(PostService::validate_poll(&base(vec!["A", "B", "C", "D", "E"])).is_err());
    }

    #[test]
    fn test_validate_poll_rejects_duplicates_and_empties() {
        let input = CreatePollInput {
            question: "Pick one".to_string(),
            options: vec!["A".to_string(), "A".to_string()],
            ends_at: Utc::now() + chrono::Duration::hours(1),
        };
        assert!(PostService::validate_poll(&input).is_err());

        let input = CreatePollInput {
            question: "Pick one".to_string(),
            options: vec!["A".to_string(), "  ".to_string()],
            ends_at: Utc::now() + chrono::Duration::hours(1),
        };
        assert!(PostService::validate_poll(&input).is_err());
    }
}
