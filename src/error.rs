use thiserror::Error;

/// Substring by which the backend signals a duplicate-vote rejection.
pub const DUPLICATE_VOTE_MARKER: &str = "already voted";

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong talking to the election backend, classified
/// by how the client must react to it.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (connection refused, timeout).
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    /// 401: the stored session is no longer valid.
    #[error("Unauthorized: {0}")]
    Unauthenticated(String),
    /// 403: the session is valid but lacks the required rights.
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Blocked client-side before any request was made.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The backend accepted the request but rejected its content.
    #[error("Rejected: {0}")]
    Rejected(String),
    /// The response matched none of the tolerated envelope shapes.
    #[error("Unexpected response: {0}")]
    Envelope(String),
    #[error(transparent)]
    Storage(#[from] std::io::Error),
}

impl Error {
    /// Failures that must tear down the client-side session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Unauthenticated(_))
    }

    /// True when the backend specifically rejected a duplicate vote.
    pub fn is_duplicate_vote(&self) -> bool {
        matches!(self, Error::Rejected(msg) if msg.contains(DUPLICATE_VOTE_MARKER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_vote_detection() {
        let err = Error::Rejected("You have already voted for this position".to_string());
        assert!(err.is_duplicate_vote());

        let err = Error::Rejected("Candidate not found".to_string());
        assert!(!err.is_duplicate_vote());

        // Only backend rejections count, wherever the substring shows up.
        let err = Error::Validation("already voted".to_string());
        assert!(!err.is_duplicate_vote());
    }

    #[test]
    fn auth_failure_classification() {
        assert!(Error::Unauthenticated("token expired".to_string()).is_auth_failure());
        assert!(!Error::Forbidden("committee only".to_string()).is_auth_failure());
        assert!(!Error::Rejected("nope".to_string()).is_auth_failure());
    }
}
