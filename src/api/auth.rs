use log::info;

use crate::api::{response_error, ApiClient};
use crate::error::{Error, Result};
use crate::model::auth::{Credentials, Identity, LoginResponse};

/// Bootstrap a committee account. Creates no session; the caller logs in
/// separately.
pub fn signup(client: &ApiClient, credentials: &Credentials) -> Result<()> {
    info!("Signing up committee account {}", credentials.email);
    client.send(client.post("committee/signup").json(credentials))?;
    Ok(())
}

/// Exchange committee credentials for a session token and display identity.
/// Tolerates every token-bearing response shape the backend has used; a 200
/// without a token is an envelope error, and error bodies are surfaced via
/// their `msg`/`message` field.
pub fn login(client: &ApiClient, credentials: &Credentials) -> Result<(String, Identity)> {
    info!("Logging in as {}", credentials.email);
    let response = client.execute(client.post("committee/login").json(credentials))?;

    let status = response.status();
    let text = response.text()?;
    if !status.is_success() {
        return Err(response_error(status, &text));
    }

    let parsed: LoginResponse = serde_json::from_str(&text)
        .map_err(|e| Error::Envelope(format!("login response was not valid JSON: {e}")))?;
    parsed.into_session(credentials)
}
