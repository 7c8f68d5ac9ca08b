use log::info;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::model::candidate::CandidateGroup;

/// Fetch the grouped candidates with their vote totals. Committee only;
/// the bearer token comes from the caller's session.
pub fn fetch_with_totals(client: &ApiClient, token: &str) -> Result<CandidateGroup> {
    let response = client.send(client.get("committee/candidates").bearer_auth(token))?;
    let value: serde_json::Value = response
        .json()
        .map_err(|e| Error::Envelope(format!("committee candidate list was not valid JSON: {e}")))?;
    let group = CandidateGroup::from_response(value)?;
    info!(
        "Fetched totals for {} candidates across {} positions",
        group.len(),
        group.position_count()
    );
    Ok(group)
}
