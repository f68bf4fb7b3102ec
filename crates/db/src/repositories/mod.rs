//! Database repositories.

mod comment;
mod like;
mod poll;
mod post;

pub use comment::{CommentRepository, ReplyRepository};
pub use like::LikeRepository;
pub use poll::{PollRepository, PollVoteRepository};
pub use post::PostRepository;
