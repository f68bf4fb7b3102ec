//! Business logic services.

#![allow(missing_docs)]

pub mod engagement;
pub mod feed;
pub mod moderation;
pub mod poll;
pub mod post;

pub use engagement::{CommentThread, EngagementService, LikeToggle};
pub use feed::{FeedPost, FeedService};
pub use moderation::ModerationService;
pub use poll::{OptionTally, PollResults, PollService, PollView, PollViewerState, VoteReceipt};
pub use post::{CreatePollInput, CreatePostInput, PostService};
