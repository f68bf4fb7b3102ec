//! Poll service.

use brandhub_common::{AppError, AppResult, IdGenerator};
use brandhub_db::{
    entities::{poll, poll_vote},
    repositories::{PollRepository, PollVoteRepository},
};
use chrono::{DateTime, Utc};
use sea_orm::Set;

/// Poll service for business logic.
#[derive(Clone)]
pub struct PollService {
    poll_repo: PollRepository,
    vote_repo: PollVoteRepository,
    id_gen: IdGenerator,
}

/// Per-option tally, in option order.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionTally {
    pub text: String,
    pub votes: i64,
    /// Share of the total vote, rounded to one decimal. 0 when nobody voted.
    pub percentage: f64,
}

/// Expiry-gated poll results.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResults {
    pub ended: bool,
    pub options: Vec<OptionTally>,
    pub total_votes: i64,
}

/// Outcome of a successful vote, applied directly by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteReceipt {
    pub accepted: bool,
    pub options: Vec<OptionTally>,
    pub total_votes: i64,
}

/// What a given viewer should see for a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollViewerState {
    /// The viewer has not voted and the poll is open: show option buttons.
    NotVoted,
    /// The viewer has voted or the poll has ended: show the tally view.
    VotedOrEnded,
}

/// Poll display data for one viewer.
#[derive(Debug, Clone)]
pub struct PollView {
    pub question: String,
    pub ends_at: DateTime<Utc>,
    pub results: PollResults,
    /// Choice index the viewer voted for, if any.
    pub voted_choice: Option<i32>,
    pub state: PollViewerState,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(poll_repo: PollRepository, vote_repo: PollVoteRepository) -> Self {
        Self {
            poll_repo,
            vote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Cast a vote on a poll.
    ///
    /// A vote is immutable once cast: resubmitting, even with the same
    /// option, is rejected. The conditional insert against the unique
    /// `(user_id, post_id)` index is what rejects duplicates, so concurrent
    /// resubmissions cannot double count.
    pub async fn cast_vote(
        &self,
        user_id: &str,
        post_id: &str,
        choice: i32,
    ) -> AppResult<VoteReceipt> {
        let poll = self.poll_repo.get_by_post_id(post_id).await?;

        let now = Utc::now();
        if poll.is_ended(now) {
            return Err(AppError::PollExpired);
        }

        let options = Self::decode_options(&poll)?;
        if choice < 0 || choice as usize >= options.len() {
            return Err(AppError::Validation("Invalid choice".to_string()));
        }

        let model = poll_vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            user_id: Set(user_id.to_string()),
            choice: Set(choice),
            created_at: Set(now.into()),
        };

        if !self.vote_repo.insert_if_absent(model).await? {
            return Err(AppError::AlreadyVoted);
        }

        tracing::debug!(post_id = %post_id, user_id = %user_id, choice, "Vote cast");

        let results = self.tally(&poll, options, now).await?;
        Ok(VoteReceipt {
            accepted: true,
            options: results.options,
            total_votes: results.total_votes,
        })
    }

    /// Compute poll results.
    ///
    /// Expiry is evaluated lazily against `ends_at` here, the same check
    /// the vote path uses; there is no background job flipping state.
    pub async fn results(&self, post_id: &str) -> AppResult<PollResults> {
        let poll = self.poll_repo.get_by_post_id(post_id).await?;
        let options = Self::decode_options(&poll)?;
        self.tally(&poll, options, Utc::now()).await
    }

    /// The choice a user voted for on a poll, if any.
    pub async fn voted_choice(&self, user_id: &str, post_id: &str) -> AppResult<Option<i32>> {
        Ok(self
            .vote_repo
            .find_by_user_and_post(user_id, post_id)
            .await?
            .map(|vote| vote.choice))
    }

    /// Build the display view of a poll for one viewer.
    pub async fn view_for(&self, post_id: &str, viewer: Option<&str>) -> AppResult<PollView> {
        let poll = self.poll_repo.get_by_post_id(post_id).await?;
        self.view(poll, viewer).await
    }

    /// Build the display view if the post has a poll at all.
    pub async fn view_if_present(
        &self,
        post_id: &str,
        viewer: Option<&str>,
    ) -> AppResult<Option<PollView>> {
        match self.poll_repo.find_by_post_id(post_id).await? {
            Some(poll) => Ok(Some(self.view(poll, viewer).await?)),
            None => Ok(None),
        }
    }

    async fn view(&self, poll: poll::Model, viewer: Option<&str>) -> AppResult<PollView> {
        let options = Self::decode_options(&poll)?;

        let now = Utc::now();
        let results = self.tally(&poll, options, now).await?;

        let voted_choice = match viewer {
            Some(user_id) => self.voted_choice(user_id, &poll.post_id).await?,
            None => None,
        };

        let state = if results.ended || voted_choice.is_some() {
            PollViewerState::VotedOrEnded
        } else {
            PollViewerState::NotVoted
        };

        Ok(PollView {
            question: poll.question.clone(),
            ends_at: poll.ends_at.with_timezone(&Utc),
            results,
            voted_choice,
            state,
        })
    }

    /// Derive the tally from the vote rows.
    async fn tally(
        &self,
        poll: &poll::Model,
        options: Vec<String>,
        now: DateTime<Utc>,
    ) -> AppResult<PollResults> {
        let mut votes = vec![0i64; options.len()];
        for (choice, count) in self.vote_repo.tally_by_choice(&poll.post_id).await? {
            if let Some(slot) = votes.get_mut(choice as usize) {
                *slot = count;
            }
        }

        let total_votes: i64 = votes.iter().sum();

        let options = options
            .into_iter()
            .zip(votes)
            .map(|(text, count)| OptionTally {
                text,
                votes: count,
                percentage: if total_votes == 0 {
                    0.0
                } else {
                    round_one_decimal(count as f64 / total_votes as f64 * 100.0)
                },
            })
            .collect();

        Ok(PollResults {
            ended: poll.is_ended(now),
            options,
            total_votes,
        })
    }

    fn decode_options(poll: &poll::Model) -> AppResult<Vec<String>> {
        poll.option_texts()
            .map_err(|e| AppError::Internal(format!("Invalid poll options: {e}")))
    }
}

/// Round to one decimal place.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
