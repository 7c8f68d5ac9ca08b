//! Committee dashboard: grouped vote totals and the statistics derived
//! from them. All derivation is a single pass over data the backend has
//! already aggregated; each refresh replaces the view wholesale.

use log::info;

use crate::api::{self, ApiClient};
use crate::error::Result;
use crate::model::candidate::{Candidate, CandidateGroup};
use crate::model::position::Position;
use crate::session::{Session, TokenStore};

/// Summary statistics over a candidate group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub candidates: usize,
    pub total_votes: u64,
    pub positions: usize,
}

impl Stats {
    /// Derive the summary in one pass: candidate count, vote sum (missing
    /// counts read as zero), distinct contested positions.
    pub fn of(group: &CandidateGroup) -> Self {
        let mut stats = Stats {
            positions: group.position_count(),
            ..Stats::default()
        };
        for candidate in group.iter() {
            stats.candidates += 1;
            stats.total_votes += candidate.vote_count();
        }
        stats
    }
}

/// The candidate leading a position: the maximum vote count, provided it is
/// strictly positive. An all-zero position has no leader. Ties go to the
/// first candidate in list order.
pub fn leader(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        if candidate.vote_count() > best.map(Candidate::vote_count).unwrap_or(0) {
            best = Some(candidate);
        }
    }
    best
}

/// The committee's aggregated view of the election.
#[derive(Debug)]
pub struct Dashboard {
    group: CandidateGroup,
    stats: Stats,
}

impl Dashboard {
    /// Fetch the initial view. Requires an authenticated session; without
    /// one this fails with an authentication error directing to login.
    pub fn load<S: TokenStore>(client: &ApiClient, session: &Session<S>) -> Result<Self> {
        let mut dashboard = Dashboard {
            group: CandidateGroup::default(),
            stats: Stats::default(),
        };
        dashboard.refresh(client, session, true)?;
        Ok(dashboard)
    }

    /// Re-fetch and replace the view wholesale. `show_loading` only
    /// controls the loading banner; a manual refresh passes `false` and
    /// reuses the same fetch path. On failure the previous view is kept.
    pub fn refresh<S: TokenStore>(
        &mut self,
        client: &ApiClient,
        session: &Session<S>,
        show_loading: bool,
    ) -> Result<()> {
        if show_loading {
            info!("Loading committee dashboard...");
        }
        let token = session.require_token()?;
        let group = api::committee::fetch_with_totals(client, token)?;
        self.stats = Stats::of(&group);
        self.group = group;
        Ok(())
    }

    pub fn group(&self) -> &CandidateGroup {
        &self.group
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Each contested position with its leader, if it has one.
    pub fn leaders(&self) -> impl Iterator<Item = (Position, Option<&Candidate>)> {
        self.group
            .positions()
            .map(|position| (position, leader(self.group.candidates(position))))
    }
}
