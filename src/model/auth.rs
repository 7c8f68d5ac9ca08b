use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Committee credentials, submitted verbatim at signup and login.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub surname: String,
}

/// Display-only identity shown in greetings. Never used for authorization
/// decisions; those are the backend's job on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub surname: Option<String>,
}

/// The login response shapes the backend has used across revisions, read
/// permissively: a token field is what makes a login successful, whatever
/// else came with it.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<IdentityFields>,
    #[serde(default)]
    committee: Option<IdentityFields>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IdentityFields {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    surname: Option<String>,
}

impl LoginResponse {
    /// Extract the session token and a display identity from a 2xx login
    /// response, preferring server-supplied identity fields over the
    /// submitted credentials. A 200 without a recognisable token is a hard
    /// envelope error, not an empty session.
    pub fn into_session(self, submitted: &Credentials) -> Result<(String, Identity)> {
        if self.token.is_none() {
            return Err(Error::Envelope(format!(
                "login response carried no token: {self:?}"
            )));
        }

        let user = self.user.unwrap_or_default();
        let committee = self.committee.unwrap_or_default();
        let identity = Identity {
            email: user
                .email
                .or(committee.email)
                .unwrap_or_else(|| submitted.email.clone()),
            surname: Some(user.surname.unwrap_or_else(|| submitted.surname.clone())),
        };

        // Checked above.
        Ok((self.token.unwrap(), identity))
    }

    /// The backend's error message, from whichever field it used.
    pub fn error_message(&self) -> Option<&str> {
        self.msg.as_deref().or(self.message.as_deref())
    }
}
