//! Poll endpoints.

use axum::{extract::State, routing::post, Json, Router};
use brandhub_common::AppResult;
use brandhub_core::{OptionTally, PollView, PollViewerState, VoteReceipt};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Per-option tally response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionResponse {
    pub text: String,
    pub votes: i64,
    pub percentage: f64,
}

impl From<OptionTally> for PollOptionResponse {
    fn from(tally: OptionTally) -> Self {
        Self {
            text: tally.text,
            votes: tally.votes,
            percentage: tally.percentage,
        }
    }
}

/// Poll view response for one viewer.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollViewResponse {
    pub question: String,
    pub ends_at: String,
    pub ended: bool,
    pub total_votes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voted_choice: Option<i32>,
    /// Which display state the viewer is in: option buttons or tally view.
    pub state: String,
    pub tally: Vec<PollOptionResponse>,
}

impl From<PollView> for PollViewResponse {
    fn from(view: PollView) -> Self {
        let state = match view.state {
            PollViewerState::NotVoted => "notVoted",
            PollViewerState::VotedOrEnded => "votedOrEnded",
        };
        Self {
            question: view.question,
            ends_at: view.ends_at.to_rfc3339(),
            ended: view.results.ended,
            total_votes: view.results.total_votes,
            voted_choice: view.voted_choice,
            state: state.to_string(),
            tally: view.results.options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub post_id: String,
    pub choice: i32,
}

/// Vote response, applied directly by the caller (no reload).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub accepted: bool,
    pub total_votes: i64,
    pub tally: Vec<PollOptionResponse>,
}

impl From<VoteReceipt> for VoteResponse {
    fn from(receipt: VoteReceipt) -> Self {
        Self {
            accepted: receipt.accepted,
            total_votes: receipt.total_votes,
            tally: receipt.options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Vote on a poll.
async fn vote(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<VoteResponse>> {
    let receipt = state
        .poll_service
        .cast_vote(&identity.user_id, &req.post_id, req.choice)
        .await?;
    Ok(ApiResponse::ok(receipt.into()))
}

/// Poll results request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResultsRequest {
    pub post_id: String,
}

/// Poll results response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResultsResponse {
    pub ended: bool,
    pub total_votes: i64,
    pub tally: Vec<PollOptionResponse>,
}

/// Get poll results.
///
/// Expiry is evaluated lazily at read time; a viewer who never voted still
/// sees the tally once `ends_at` has passed.
async fn results(
    MaybeAuthUser(_maybe_user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<PollResultsRequest>,
) -> AppResult<ApiResponse<PollResultsResponse>> {
    let results = state.poll_service.results(&req.post_id).await?;
    Ok(ApiResponse::ok(PollResultsResponse {
        ended: results.ended,
        total_votes: results.total_votes,
        tally: results.options.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vote", post(vote))
        .route("/results", post(results))
}
