use serde::Serialize;

use crate::model::position::Position;

/// A single-position vote submission, shaped for `POST /votes`.
#[derive(Debug, Clone, Serialize)]
pub struct SingleVote {
    #[serde(rename = "voterEmail")]
    pub voter_email: String,
    pub position: Position,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
}

/// A complete ballot for `POST /votes/bulk`: voter identity plus one
/// candidate choice per position, flattened from the form's selection map.
#[derive(Debug, Clone, Serialize)]
pub struct BulkBallot {
    #[serde(rename = "voterName")]
    pub voter_name: String,
    #[serde(rename = "voterEmail")]
    pub voter_email: String,
    pub votes: Vec<BallotEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BallotEntry {
    pub position: Position,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
}
