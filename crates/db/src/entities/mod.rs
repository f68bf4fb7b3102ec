//! Database entities.

pub mod comment;
pub mod poll;
pub mod poll_vote;
pub mod post;
pub mod post_like;
pub mod reply;

pub use comment::Entity as Comment;
pub use poll::Entity as Poll;
pub use poll_vote::Entity as PollVote;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use reply::Entity as Reply;
