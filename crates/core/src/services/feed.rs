//! Feed service: category, trending, and author views with per-viewer
//! hydration.

use std::collections::HashSet;

use brandhub_common::{config::FeedConfig, AppResult};
use brandhub_db::{
    entities::post::{self, Category},
    repositories::{LikeRepository, PostRepository},
};
use rand::seq::SliceRandom;

/// Feed service for read-side composition.
#[derive(Clone)]
pub struct FeedService {
    post_repo: PostRepository,
    like_repo: LikeRepository,
    config: FeedConfig,
}

/// A post hydrated for one viewer.
///
/// `is_liked` is a read-time projection of the viewer against the like set;
/// it is never stored.
#[derive(Debug, Clone)]
pub struct FeedPost {
    pub post: post::Model,
    pub is_liked: bool,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        like_repo: LikeRepository,
        config: FeedConfig,
    ) -> Self {
        Self {
            post_repo,
            like_repo,
            config,
        }
    }

    /// Posts in a category, newest first, cursor-paginated.
    pub async fn by_category(
        &self,
        category: Category,
        limit: Option<u64>,
        until_id: Option<&str>,
        viewer: Option<&str>,
    ) -> AppResult<Vec<FeedPost>> {
        let limit = self.clamp_limit(limit);
        let posts = self
            .post_repo
            .find_by_category(category, limit, until_id)
            .await?;
        self.hydrate(posts, viewer).await
    }

    /// Posts flagged as trending by moderation.
    pub async fn trending(&self, viewer: Option<&str>) -> AppResult<Vec<FeedPost>> {
        let posts = self.post_repo.find_trending(self.config.max_page_size).await?;
        self.hydrate(posts, viewer).await
    }

    /// All posts by one author, any category, newest first.
    pub async fn by_author(
        &self,
        author_id: &str,
        limit: Option<u64>,
        until_id: Option<&str>,
        viewer: Option<&str>,
    ) -> AppResult<Vec<FeedPost>> {
        let limit = self.clamp_limit(limit);
        let posts = self
            .post_repo
            .find_by_author(author_id, limit, until_id)
            .await?;
        self.hydrate(posts, viewer).await
    }

    /// Draw a fixed-size uniform sample without replacement.
    ///
    /// Used by the suggested-profiles and featured-agencies surfaces;
    /// shuffle then truncate, nothing fancier is needed.
    #[must_use]
    pub fn sample<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
        let mut rng = rand::thread_rng();
        items.shuffle(&mut rng);
        items.truncate(n);
        items
    }

    /// The configured sample size for suggestion surfaces.
    #[must_use]
    pub const fn suggestion_sample_size(&self) -> usize {
        self.config.suggestion_sample_size
    }

    /// Attach per-viewer state to a page of posts.
    ///
    /// One batched membership probe for the whole page; anonymous viewers
    /// see `is_liked = false` everywhere.
    async fn hydrate(
        &self,
        posts: Vec<post::Model>,
        viewer: Option<&str>,
    ) -> AppResult<Vec<FeedPost>> {
        let liked: HashSet<String> = match viewer {
            Some(user_id) if !posts.is_empty() => {
                let ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
                self.like_repo
                    .find_liked_post_ids(user_id, &ids)
                    .await?
                    .into_iter()
                    .collect()
            }
            _ => HashSet::new(),
        };

        Ok(posts
            .into_iter()
            .map(|post| {
                let is_liked = liked.contains(&post.id);
                FeedPost { post, is_liked }
            })
            .collect())
    }

    fn clamp_limit(&self, limit: Option<u64>) -> u64 {
        limit
            .unwrap_or(self.config.page_size)
            .clamp(1, self.config.max_page_size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use brandhub_db::entities::{post::PostKind, post_like};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_post(id: &str, author_id: &str, trending: bool) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            category: Category::MarketingBranding,
            kind: PostKind::Text,
            text: Some("Test post".to_string()),
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

    fn create_test_like(id: &str, user_id: &str, post_id: &str) -> post_like::Model {
        post_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service(
        post_db: sea_orm::DatabaseConnection,
        like_db: sea_orm::DatabaseConnection,
    ) -> FeedService {
        FeedService::new(
            PostRepository::new(Arc::new(post_db)),
            LikeRepository::new(Arc::new(like_db)),
            FeedConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_by_category_hydrates_viewer_likes() {
        let p1 = create_test_post("post1", "a1", false);
        let p2 = create_test_post("post2", "a2", false);
        let like = create_test_like("l1", "viewer", "post2");

        let post_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[p1, p2]])
            .into_connection();
        let like_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[like]])
            .into_connection();

        let service = service(post_db, like_db);

        let feed = service
            .by_category(Category::MarketingBranding, None, None, Some("viewer"))
            .await
            .unwrap();

        assert_eq!(feed.len(), 2);
        assert!(!feed[0].is_liked);
        assert!(feed[1].is_liked);
    }

    #[tokio::test]
    async fn test_anonymous_viewer_gets_no_likes() {
        let p1 = create_test_post("post1", "a1", true);

        let post_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[p1]])
            .into_connection();
        // No membership probe is made for anonymous viewers
        let like_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(post_db, like_db);

        let feed = service.trending(None).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert!(!feed[0].is_liked);
        assert!(feed[0].post.trending);
    }

    #[test]
    fn test_sample_without_replacement() {
        let items: Vec<u32> = (0..100).collect();
        let sampled = FeedService::sample(items, 5);

        assert_eq!(sampled.len(), 5);
        let unique: HashSet<u32> = sampled.iter().copied().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_sample_smaller_source() {
        let items = vec![1u32, 2, 3];
        let sampled = FeedService::sample(items, 10);

        assert_eq!(sampled.len(), 3);
    }
}
