use log::info;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::model::candidate::{CandidateGroup, Registration};

/// Fetch the public candidate list, normalised into position groups.
pub fn fetch(client: &ApiClient) -> Result<CandidateGroup> {
    let response = client.send(client.get("candidates"))?;
    let value: serde_json::Value = response
        .json()
        .map_err(|e| Error::Envelope(format!("candidate list was not valid JSON: {e}")))?;
    let group = CandidateGroup::from_response(value)?;
    info!(
        "Fetched {} candidates across {} positions",
        group.len(),
        group.position_count()
    );
    Ok(group)
}

/// Submit a candidate registration.
pub fn register(client: &ApiClient, registration: &Registration) -> Result<()> {
    info!(
        "Registering candidate {} for {}",
        registration.email, registration.position
    );
    client.send(client.post("candidates/register").json(registration))?;
    Ok(())
}
