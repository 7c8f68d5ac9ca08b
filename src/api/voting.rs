use log::info;

use crate::api::ApiClient;
use crate::error::Result;
use crate::model::ballot::{BulkBallot, SingleVote};

/// Cast a single-position vote.
pub fn cast(client: &ApiClient, vote: &SingleVote) -> Result<()> {
    info!("Casting vote for position {}", vote.position);
    client.send(client.post("votes").json(vote))?;
    Ok(())
}

/// Submit a complete ballot in one request.
pub fn cast_bulk(client: &ApiClient, ballot: &BulkBallot) -> Result<()> {
    info!("Submitting ballot with {} votes", ballot.votes.len());
    client.send(client.post("votes/bulk").json(ballot))?;
    Ok(())
}
