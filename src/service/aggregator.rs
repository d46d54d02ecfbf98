//! Post detail composition
//!
//! A post detail merges data owned by three services: the post itself
//! (local), its comments (comment service) and its like count (like
//! service). Either remote call failing fails the whole detail; a partial
//! view is never returned.

use std::sync::Arc;

use crate::client::{CommentSource, LikeSource};
use crate::data::{PostDetail, PostStore};
use crate::error::AppError;

pub struct PostDetailAggregator {
    posts: PostStore,
    comments: Arc<dyn CommentSource>,
    likes: Arc<dyn LikeSource>,
}

impl PostDetailAggregator {
    pub fn new(
        posts: PostStore,
        comments: Arc<dyn CommentSource>,
        likes: Arc<dyn LikeSource>,
    ) -> Self {
        Self {
            posts,
            comments,
            likes,
        }
    }

    /// Assemble the detail view of a post
    ///
    /// # Errors
    /// `NotFound` when the post does not exist (no remote call is made),
    /// `DownstreamUnavailable` when either remote call fails
    pub async fn assemble(&self, post_id: &str) -> Result<PostDetail, AppError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found."))?;

        // try_join! drops the sibling future as soon as one side fails.
        let (comments, likes) = tokio::try_join!(
            self.comments.comments_for_post(&post.id),
            self.likes.post_like_count(&post.id),
        )
        .map_err(|error| {
            tracing::warn!(post_id, error = %error, "post detail assembly failed");
            error
        })?;

        tracing::debug!(
            post_id,
            comments = comments.len(),
            likes,
            "post detail assembled"
        );
        Ok(PostDetail::assemble(post, comments, likes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, MockCommentSource, MockLikeSource};
    use crate::config::ServiceKind;
    use crate::data::{Comment, Database, EntityId, Post};
    use chrono::Utc;
    use tempfile::TempDir;

    async fn post_store() -> (PostStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::connect(&temp_dir.path().join("posts.db"), ServiceKind::Posts)
            .await
            .unwrap();
        (PostStore::new(db.pool().clone()), temp_dir)
    }

    async fn seed_post(store: &PostStore) -> Post {
        let post = Post {
            id: EntityId::new().0,
            user_id: "alice".to_string(),
            content: "P1".to_string(),
            created_at: Utc::now(),
        };
        store.insert(&post).await.unwrap();
        post
    }

    fn comment(post_id: &str, text: &str) -> Comment {
        Comment {
            id: EntityId::new().0,
            user_id: "bob".to_string(),
            post_id: post_id.to_string(),
            comment: text.to_string(),
            created_at: Utc::now(),
        }
    }

    fn unavailable(service: &'static str) -> AppError {
        AppError::DownstreamUnavailable(ClientError::Transport {
            service,
            timed_out: false,
            message: "connection refused".to_string(),
        })
    }

    #[tokio::test]
    async fn detail_merges_comments_and_like_count() {
        let (store, _temp_dir) = post_store().await;
        let post = seed_post(&store).await;

        let mut comments = MockCommentSource::new();
        let expected = vec![comment(&post.id, "first"), comment(&post.id, "second")];
        let returned = expected.clone();
        comments
            .expect_comments_for_post()
            .times(1)
            .returning(move |_| Ok(returned.clone()));
        let mut likes = MockLikeSource::new();
        likes.expect_post_like_count().times(1).returning(|_| Ok(3));

        let aggregator = PostDetailAggregator::new(store, Arc::new(comments), Arc::new(likes));
        let detail = aggregator.assemble(&post.id).await.unwrap();

        assert_eq!(detail.id, post.id);
        assert_eq!(detail.content, "P1");
        assert_eq!(detail.comments, expected);
        assert_eq!(detail.likes, 3);
    }

    #[tokio::test]
    async fn empty_comment_list_is_not_a_failure() {
        let (store, _temp_dir) = post_store().await;
        let post = seed_post(&store).await;

        let mut comments = MockCommentSource::new();
        comments
            .expect_comments_for_post()
            .returning(|_| Ok(Vec::new()));
        let mut likes = MockLikeSource::new();
        likes.expect_post_like_count().returning(|_| Ok(0));

        let aggregator = PostDetailAggregator::new(store, Arc::new(comments), Arc::new(likes));
        let detail = aggregator.assemble(&post.id).await.unwrap();
        assert!(detail.comments.is_empty());
        assert_eq!(detail.likes, 0);
    }

    #[tokio::test]
    async fn missing_post_makes_no_downstream_calls() {
        let (store, _temp_dir) = post_store().await;

        let mut comments = MockCommentSource::new();
        comments.expect_comments_for_post().times(0);
        let mut likes = MockLikeSource::new();
        likes.expect_post_like_count().times(0);

        let aggregator = PostDetailAggregator::new(store, Arc::new(comments), Arc::new(likes));
        assert!(matches!(
            aggregator.assemble("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn comment_failure_fails_the_whole_detail() {
        let (store, _temp_dir) = post_store().await;
        let post = seed_post(&store).await;

        let mut comments = MockCommentSource::new();
        comments
            .expect_comments_for_post()
            .returning(|_| Err(unavailable("comments")));
        let mut likes = MockLikeSource::new();
        likes.expect_post_like_count().returning(|_| Ok(5));

        let aggregator = PostDetailAggregator::new(store, Arc::new(comments), Arc::new(likes));
        assert!(matches!(
            aggregator.assemble(&post.id).await,
            Err(AppError::DownstreamUnavailable(ClientError::Transport { service: "comments", .. }))
        ));
    }

    #[tokio::test]
    async fn like_failure_fails_the_whole_detail() {
        let (store, _temp_dir) = post_store().await;
        let post = seed_post(&store).await;

        let mut comments = MockCommentSource::new();
        comments
            .expect_comments_for_post()
            .returning(|_| Ok(Vec::new()));
        let mut likes = MockLikeSource::new();
        likes
            .expect_post_like_count()
            .returning(|_| Err(unavailable("likes")));

        let aggregator = PostDetailAggregator::new(store, Arc::new(comments), Arc::new(likes));
        assert!(matches!(
            aggregator.assemble(&post.id).await,
            Err(AppError::DownstreamUnavailable(_))
        ));
    }
}
