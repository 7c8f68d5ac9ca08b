use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use log::{info, warn};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::auth::Identity;

/// Where the session token lives between runs. Injectable so tests can run
/// against an in-memory store.
pub trait TokenStore {
    /// The persisted token, if any.
    fn load(&self) -> Result<Option<String>>;
    /// Persist the token, replacing any previous one.
    fn save(&self, token: &str) -> Result<()>;
    /// Remove the persisted token. Removing an absent token is not an error.
    fn clear(&self) -> Result<()>;
}

/// Token storage backed by a single file, the client-local counterpart of
/// the browser's fixed local-storage key.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token storage for tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

/// The client-side session: an opaque bearer token plus a display identity
/// decoded from it without verification. The identity is cosmetic; the
/// backend re-authorizes every request from the token alone.
pub struct Session<S: TokenStore> {
    store: S,
    token: Option<String>,
    identity: Option<Identity>,
}

impl<S: TokenStore> Session<S> {
    /// Restore the session from the store, read once at startup. A present
    /// token means authenticated; the display identity is decoded
    /// best-effort and its absence is not an error.
    pub fn restore(store: S) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read stored session token: {e}");
                None
            }
        };
        let identity = token.as_deref().and_then(decode_display_identity);
        Self {
            store,
            token,
            identity,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The token, or an authentication failure directing the user to login.
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| Error::Unauthenticated("Not logged in".to_string()))
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Adopt a fresh session after a successful login. Nothing is set if
    /// persisting fails, so there is never a half-established session.
    pub fn establish(&mut self, token: String, identity: Identity) -> Result<()> {
        self.store.save(&token)?;
        info!("Session established for {}", identity.email);
        self.token = Some(token);
        self.identity = Some(identity);
        Ok(())
    }

    /// Clear the persisted token and in-memory identity synchronously. No
    /// backend call is made; a storage failure is logged, not propagated.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored session token: {e}");
        }
        self.token = None;
        self.identity = None;
    }

    /// React to a request failure: an authentication failure (401) tears
    /// the session down and returns true; anything else leaves it intact.
    pub fn absorb_failure(&mut self, err: &Error) -> bool {
        if err.is_auth_failure() && self.is_authenticated() {
            warn!("Authentication failure, discarding session: {err}");
            self.logout();
            return true;
        }
        false
    }
}

#[derive(Deserialize)]
struct DisplayClaims {
    email: Option<String>,
    surname: Option<String>,
}

/// Decode the token payload for greeting text only. The signature is NOT
/// checked and the result must never feed an authorization decision.
fn decode_display_identity(token: &str) -> Option<Identity> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let decoded = jsonwebtoken::decode::<DisplayClaims>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    );
    match decoded {
        Ok(data) => data.claims.email.map(|email| Identity {
            email,
            surname: data.claims.surname,
        }),
        Err(e) => {
            warn!("Could not decode token payload for display: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;

    /// Mint a token the way the backend would; the signing key is
    /// irrelevant to the display decode.
    fn mint_token(claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"some-backend-secret"),
        )
        .unwrap()
    }

    fn identity() -> Identity {
        Identity {
            email: "committee@example.com".to_string(),
            surname: Some("Okafor".to_string()),
        }
    }

    #[test]
    fn restore_with_no_token_is_unauthenticated() {
        let session = Session::restore(MemoryTokenStore::new());
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert!(session.require_token().is_err());
    }

    #[test]
    fn restore_decodes_display_identity_from_stored_token() {
        let store = MemoryTokenStore::new();
        store
            .save(&mint_token(json!({
                "email": "committee@example.com",
                "surname": "Okafor",
            })))
            .unwrap();

        let session = Session::restore(store);
        assert!(session.is_authenticated());
        assert_eq!(Some(&identity()), session.identity());
    }

    #[test]
    fn undecodable_token_still_counts_as_authenticated() {
        let store = MemoryTokenStore::new();
        store.save("not-a-jwt").unwrap();

        let session = Session::restore(store);
        assert!(session.is_authenticated());
        assert!(session.identity().is_none());
    }

    #[test]
    fn establish_persists_and_logout_clears() {
        let mut session = Session::restore(MemoryTokenStore::new());
        session
            .establish("header.payload.sig".to_string(), identity())
            .unwrap();

        assert!(session.is_authenticated());
        assert_eq!(
            Some("header.payload.sig".to_string()),
            session.store.load().unwrap()
        );

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert_eq!(None, session.store.load().unwrap());
    }

    #[test]
    fn auth_failure_tears_the_session_down() {
        // This test exercises the teardown logging path, so enable logging.
        log4rs_test_utils::test_logging::init_logging_once_for(["election_portal"], None, None);

        let mut session = Session::restore(MemoryTokenStore::new());
        session.establish("t".to_string(), identity()).unwrap();

        let torn_down = session.absorb_failure(&Error::Unauthenticated("expired".to_string()));
        assert!(torn_down);
        assert!(!session.is_authenticated());
        assert_eq!(None, session.store.load().unwrap());
    }

    #[test]
    fn other_failures_leave_the_session_intact() {
        let mut session = Session::restore(MemoryTokenStore::new());
        session.establish("t".to_string(), identity()).unwrap();

        for err in [
            Error::Forbidden("committee only".to_string()),
            Error::Rejected("already voted".to_string()),
            Error::Envelope("odd shape".to_string()),
        ] {
            assert!(!session.absorb_failure(&err));
            assert!(session.is_authenticated());
        }
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token"));

        assert_eq!(None, store.load().unwrap());
        store.save("abc").unwrap();
        assert_eq!(Some("abc".to_string()), store.load().unwrap());
        store.clear().unwrap();
        assert_eq!(None, store.load().unwrap());
        // Clearing twice is fine.
        store.clear().unwrap();
    }
}
