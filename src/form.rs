//! The multi-position ballot form.
//!
//! Orchestrates one choice per contested position plus voter identity, and
//! owns the submit lifecycle: `Editing -> Submitting -> Submitted`, falling
//! back to `Editing` on rejection. Nothing here is persisted; the form
//! lives only as long as the voting interaction.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::api::{self, ApiClient};
use crate::error::{Error, Result};
use crate::model::ballot::{BallotEntry, BulkBallot};
use crate::model::candidate::CandidateGroup;
use crate::model::position::Position;

/// Where the form is in its submit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    Submitted,
}

/// Derived completion counts for the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub selected: usize,
    pub total: usize,
}

/// A ballot being filled in: voter identity plus one candidate selection
/// per position known from the fetched candidate group.
#[derive(Debug)]
pub struct BallotForm {
    positions: Vec<Position>,
    voter_name: String,
    voter_email: String,
    selections: BTreeMap<Position, String>,
    phase: Phase,
}

impl BallotForm {
    /// Start an empty form over the positions present in the fetched group.
    pub fn new(group: &CandidateGroup) -> Self {
        Self {
            positions: group.positions().collect(),
            voter_name: String::new(),
            voter_email: String::new(),
            selections: BTreeMap::new(),
            phase: Phase::Editing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn voter_name(&self) -> &str {
        &self.voter_name
    }

    pub fn voter_email(&self) -> &str {
        &self.voter_email
    }

    pub fn selection(&self, position: Position) -> Option<&str> {
        self.selections.get(&position).map(String::as_str)
    }

    pub fn set_voter(&mut self, name: &str, email: &str) {
        self.voter_name = name.to_string();
        self.voter_email = email.to_string();
    }

    /// Record a selection. The candidate must actually stand for that
    /// position in the fetched group; re-selecting a position replaces the
    /// earlier choice.
    pub fn select(&mut self, group: &CandidateGroup, position: Position, candidate_id: &str) -> Result<()> {
        if !self.positions.contains(&position) {
            return Err(Error::Validation(format!(
                "No candidates are standing for {position}"
            )));
        }
        if group.candidate(position, candidate_id).is_none() {
            return Err(Error::Validation(format!(
                "No candidate {candidate_id} is standing for {position}"
            )));
        }
        self.selections.insert(position, candidate_id.to_string());
        Ok(())
    }

    /// Completion counts: populated selections against known positions.
    pub fn progress(&self) -> Progress {
        Progress {
            selected: self.selections.len(),
            total: self.positions.len(),
        }
    }

    /// Positions still without a selection, in ballot order.
    pub fn missing_positions(&self) -> Vec<Position> {
        self.positions
            .iter()
            .copied()
            .filter(|position| !self.selections.contains_key(position))
            .collect()
    }

    /// The validation gate: build the bulk payload, or report exactly what
    /// blocks submission. Runs entirely client-side.
    pub fn payload(&self) -> Result<BulkBallot> {
        if self.voter_name.trim().is_empty() {
            return Err(Error::Validation("Voter name is required".to_string()));
        }
        if !self.voter_email.contains('@') {
            return Err(Error::Validation(format!(
                "Invalid voter email: {:?}",
                self.voter_email
            )));
        }
        let missing = self.missing_positions();
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(Position::name).collect();
            return Err(Error::Validation(format!(
                "No candidate selected for: {}",
                names.join(", ")
            )));
        }

        Ok(BulkBallot {
            voter_name: self.voter_name.clone(),
            voter_email: self.voter_email.clone(),
            votes: self
                .selections
                .iter()
                .map(|(&position, candidate_id)| BallotEntry {
                    position,
                    candidate_id: candidate_id.clone(),
                })
                .collect(),
        })
    }

    /// Validate and submit the ballot. Validation failures block the
    /// submission before any request is made; rejections route through
    /// [`Self::apply_rejection`].
    pub fn submit(&mut self, client: &ApiClient) -> Result<()> {
        let ballot = self.payload()?;
        self.phase = Phase::Submitting;
        match api::voting::cast_bulk(client, &ballot) {
            Ok(()) => {
                self.apply_success();
                Ok(())
            }
            Err(err) => {
                self.apply_rejection(&err);
                Err(err)
            }
        }
    }

    /// A successful submission resets the whole form.
    pub fn apply_success(&mut self) {
        info!("Ballot submitted, resetting form");
        self.voter_name.clear();
        self.voter_email.clear();
        self.selections.clear();
        self.phase = Phase::Submitted;
    }

    /// A rejection returns the form to `Editing`. A duplicate-vote
    /// rejection keeps the voter identity but clears every selection; any
    /// other failure leaves the form untouched so the user can retry.
    pub fn apply_rejection(&mut self, err: &Error) {
        if err.is_duplicate_vote() {
            warn!("Duplicate vote rejected, clearing selections");
            self.selections.clear();
        }
        self.phase = Phase::Editing;
    }
}
