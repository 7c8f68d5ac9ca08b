use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::position::Position;

/// A registered candidate, as returned by the backend. Immutable from this
/// application's perspective; the vote count is only present on the
/// committee endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<u64>,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Candidate {
    /// Vote count with a missing count reading as zero.
    pub fn vote_count(&self) -> u64 {
        self.votes.unwrap_or(0)
    }
}

/// The envelope shapes the candidate endpoints have used across backend
/// revisions, tried in order. New shapes get a variant here, never a
/// special case at a call site.
#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateEnvelope {
    /// A bare candidate array.
    Bare(Vec<Candidate>),
    /// `{"candidates": [...]}`.
    Candidates { candidates: Vec<Candidate> },
    /// `{"data": [...]}`, with or without a `success` flag.
    Data { data: Vec<Candidate> },
    /// `{"success": ..., "data": {"<position>": [...]}}`, already grouped.
    Grouped { data: BTreeMap<Position, Vec<Candidate>> },
}

/// Candidates partitioned by position, in ballot order. Derived from each
/// fetch and recomputed wholesale; it has no identity of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateGroup {
    groups: BTreeMap<Position, Vec<Candidate>>,
}

impl CandidateGroup {
    /// Group a flat candidate list by position, preserving list order
    /// within each position.
    pub fn from_list(candidates: Vec<Candidate>) -> Self {
        let mut groups: BTreeMap<Position, Vec<Candidate>> = BTreeMap::new();
        for candidate in candidates {
            groups.entry(candidate.position).or_default().push(candidate);
        }
        Self { groups }
    }

    /// Normalise any tolerated response envelope into a group. Responses
    /// matching no tolerated shape (including unknown position names) are a
    /// hard error carrying a descriptive message.
    pub fn from_response(value: serde_json::Value) -> Result<Self> {
        let envelope: CandidateEnvelope = serde_json::from_value(value)
            .map_err(|e| Error::Envelope(format!("unrecognised candidate list shape: {e}")))?;

        let candidates = match envelope {
            CandidateEnvelope::Bare(candidates)
            | CandidateEnvelope::Candidates { candidates }
            | CandidateEnvelope::Data { data: candidates } => candidates,
            // Regrouped by each candidate's own position field, so the one
            // grouping rule holds whatever the wire shape was.
            CandidateEnvelope::Grouped { data } => data.into_values().flatten().collect(),
        };
        Ok(Self::from_list(candidates))
    }

    /// Positions that have at least one candidate, in ballot order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.groups.keys().copied()
    }

    /// The candidates standing for a position, in fetch order.
    pub fn candidates(&self, position: Position) -> &[Candidate] {
        self.groups.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a candidate by position and id.
    pub fn candidate(&self, position: Position, id: &str) -> Option<&Candidate> {
        self.candidates(position).iter().find(|c| c.id == id)
    }

    /// Every candidate across all positions.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.groups.values().flatten()
    }

    /// Total number of candidates.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct contested positions.
    pub fn position_count(&self) -> usize {
        self.groups.len()
    }
}

/// A candidate registration submission: `{name, email, position}`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub position: Position,
}


#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::collections::BTreeSet;

    use super::*;

    fn example_list() -> Vec<Candidate> {
        vec![
            Candidate::example("c1", "Alice", Position::Chairman, Some(3)),
            Candidate::example("c2", "Bob", Position::Chairman, Some(1)),
            Candidate::example("c3", "Carol", Position::Secretary1, Some(0)),
        ]
    }

    fn ids(group: &CandidateGroup) -> BTreeSet<String> {
        group.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn groups_by_position_preserving_order() {
        let group = CandidateGroup::from_list(example_list());

        assert_eq!(3, group.len());
        assert_eq!(2, group.position_count());
        let chairman: Vec<_> = group
            .candidates(Position::Chairman)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(vec!["Alice", "Bob"], chairman);
    }

    #[test]
    fn tolerated_envelopes_all_normalise_to_the_same_set() {
        let list = serde_json::to_value(example_list()).unwrap();
        let expected = ids(&CandidateGroup::from_list(example_list()));

        let bare = list.clone();
        let keyed = json!({ "candidates": list.clone() });
        let wrapped = json!({ "success": true, "data": list.clone() });
        let grouped = json!({
            "success": true,
            "data": {
                "Chairman": [list[0].clone(), list[1].clone()],
                "Secretary 1": [list[2].clone()],
            },
        });

        for envelope in [bare, keyed, wrapped, grouped] {
            let group = CandidateGroup::from_response(envelope).unwrap();
            // Flattening back must reproduce the original set exactly.
            assert_eq!(expected, ids(&group));
            assert_eq!(3, group.len());
        }
    }

    #[test]
    fn unrecognised_envelope_is_a_hard_error() {
        let err = CandidateGroup::from_response(json!({ "results": [] })).unwrap_err();
        assert!(matches!(err, Error::Envelope(_)));

        // An unknown position name fails every shape matcher too.
        let err = CandidateGroup::from_response(json!([{
            "_id": "c9",
            "name": "Mallory",
            "email": "m@example.com",
            "position": "Treasurer",
        }]))
        .unwrap_err();
        assert!(matches!(err, Error::Envelope(_)));
    }

    #[test]
    fn optional_fields_are_tolerated() {
        let group = CandidateGroup::from_response(json!([{
            "_id": "c1",
            "name": "Alice",
            "email": "a@example.com",
            "position": "Chairman",
            "createdAt": "2025-06-01T12:00:00Z",
        }]))
        .unwrap();

        let candidate = group.candidate(Position::Chairman, "c1").unwrap();
        assert_eq!(0, candidate.vote_count());
        assert!(candidate.created_at.is_some());
    }
}
