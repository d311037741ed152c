use std::sync::Arc;

use super::credentials::CredentialStore;
use super::session::SessionManager;
use crate::error::{Error, Result};
use crate::store::StateStore;
use crate::types::User;

/// Credentials extracted from an inbound request. The transport layer maps
/// whatever it has (headers, cookies) into this shape; the core never sees
/// protocol details.
#[derive(Debug, Clone, Default)]
pub struct RequestCredentials {
    pub bearer_token: Option<String>,
    pub session_id: Option<String>,
}

impl RequestCredentials {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            session_id: None,
        }
    }

    #[must_use]
    pub fn session(session_id: impl Into<String>) -> Self {
        Self {
            bearer_token: None,
            session_id: Some(session_id.into()),
        }
    }

    /// Builds credentials from a raw `Authorization` header value and an
    /// out-of-band session id.
    #[must_use]
    pub fn from_parts(authorization: Option<&str>, session_id: Option<&str>) -> Self {
        Self {
            bearer_token: authorization.and_then(parse_bearer).map(str::to_string),
            session_id: session_id.map(str::to_string),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bearer_token.is_none() && self.session_id.is_none()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Resolves inbound credentials to a user.
///
/// A bearer token is always checked before the session, so a request
/// carrying both a valid token and a stale session resolves to the token's
/// owner.
pub struct Authenticator {
    store: Arc<StateStore>,
    credentials: Arc<CredentialStore>,
    sessions: Arc<SessionManager>,
}

impl Authenticator {
    #[must_use]
    pub fn new(
        store: Arc<StateStore>,
        credentials: Arc<CredentialStore>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            store,
            credentials,
            sessions,
        }
    }

    pub fn resolve(&self, request: &RequestCredentials) -> Option<User> {
        if let Some(token) = &request.bearer_token {
            if let Some(user) = self.credentials.resolve_pat(token) {
                return Some(user);
            }
        }
        if let Some(session_id) = &request.session_id {
            if let Some(user_id) = self.sessions.lookup(session_id) {
                return self.store.get_user(&user_id);
            }
        }
        None
    }

    pub fn require(&self, request: &RequestCredentials) -> Result<User> {
        self.resolve(request).ok_or(Error::Unauthenticated)
    }

    /// Identity resolution for the token-issuance path only. When no
    /// credential at all was presented and the store holds exactly one user,
    /// that user is assumed. This is a local-first bootstrap convenience so
    /// the first account can mint its first token, not a general bypass: a
    /// presented-but-invalid credential still fails.
    pub fn resolve_for_pat_issue(&self, request: &RequestCredentials) -> Result<User> {
        if let Some(user) = self.resolve(request) {
            return Ok(user);
        }
        if request.is_empty() {
            if let Some(user) = self.store.sole_user() {
                return Ok(user);
            }
        }
        Err(Error::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        credentials: Arc<CredentialStore>,
        sessions: Arc<SessionManager>,
        authenticator: Authenticator,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StateStore::open(dir.path().join("state.json")).unwrap());
        let credentials = Arc::new(CredentialStore::new(Arc::clone(&store)));
        let sessions = Arc::new(SessionManager::new(None));
        let authenticator =
            Authenticator::new(store, Arc::clone(&credentials), Arc::clone(&sessions));
        Fixture {
            _dir: dir,
            credentials,
            sessions,
            authenticator,
        }
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Basic abc123"), None);
    }

    #[tokio::test]
    async fn test_pat_wins_over_unrelated_session() {
        let fx = fixture();
        let ada = fx
            .credentials
            .create_user("ada@example.com", "Ada", "pw-a")
            .await
            .unwrap();
        let bob = fx
            .credentials
            .create_user("bob@example.com", "Bob", "pw-b")
            .await
            .unwrap();

        let issued = fx.credentials.issue_pat(&ada.id, "ci", Vec::new()).unwrap();
        let bob_session = fx.sessions.create(&bob.id);

        let request = RequestCredentials {
            bearer_token: Some(issued.plaintext.clone()),
            session_id: Some(bob_session),
        };
        let resolved = fx.authenticator.resolve(&request).unwrap();
        assert_eq!(resolved.id, ada.id);
    }

    #[tokio::test]
    async fn test_pat_wins_over_stale_session() {
        let fx = fixture();
        let ada = fx
            .credentials
            .create_user("ada@example.com", "Ada", "pw")
            .await
            .unwrap();
        let issued = fx.credentials.issue_pat(&ada.id, "ci", Vec::new()).unwrap();

        let stale = fx.sessions.create(&ada.id);
        fx.sessions.destroy(&stale);

        let request = RequestCredentials {
            bearer_token: Some(issued.plaintext.clone()),
            session_id: Some(stale),
        };
        let resolved = fx.authenticator.resolve(&request).unwrap();
        assert_eq!(resolved.id, ada.id);
    }

    #[tokio::test]
    async fn test_invalid_pat_falls_back_to_session() {
        let fx = fixture();
        let ada = fx
            .credentials
            .create_user("ada@example.com", "Ada", "pw")
            .await
            .unwrap();
        let session = fx.sessions.create(&ada.id);

        let request = RequestCredentials {
            bearer_token: Some("gitloom_pat_00000000000000000000000000000000".to_string()),
            session_id: Some(session),
        };
        let resolved = fx.authenticator.resolve(&request).unwrap();
        assert_eq!(resolved.id, ada.id);
    }

    #[tokio::test]
    async fn test_no_credentials_resolves_nothing() {
        let fx = fixture();
        fx.credentials
            .create_user("ada@example.com", "Ada", "pw")
            .await
            .unwrap();

        assert!(
            fx.authenticator
                .resolve(&RequestCredentials::anonymous())
                .is_none()
        );
        assert!(matches!(
            fx.authenticator.require(&RequestCredentials::anonymous()),
            Err(Error::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_pat_issue_bootstrap_for_sole_user() {
        let fx = fixture();
        let ada = fx
            .credentials
            .create_user("ada@example.com", "Ada", "pw")
            .await
            .unwrap();

        let resolved = fx
            .authenticator
            .resolve_for_pat_issue(&RequestCredentials::anonymous())
            .unwrap();
        assert_eq!(resolved.id, ada.id);
    }

    #[tokio::test]
    async fn test_pat_issue_bootstrap_requires_sole_user() {
        let fx = fixture();
        fx.credentials
            .create_user("ada@example.com", "Ada", "pw")
            .await
            .unwrap();
        fx.credentials
            .create_user("bob@example.com", "Bob", "pw")
            .await
            .unwrap();

        assert!(matches!(
            fx.authenticator
                .resolve_for_pat_issue(&RequestCredentials::anonymous()),
            Err(Error::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_pat_issue_bootstrap_rejects_bad_credential() {
        let fx = fixture();
        fx.credentials
            .create_user("ada@example.com", "Ada", "pw")
            .await
            .unwrap();

        // A presented-but-invalid credential must not fall through to the
        // sole-user shortcut.
        let request = RequestCredentials::bearer("gitloom_pat_ffffffffffffffffffffffffffffffff");
        assert!(matches!(
            fx.authenticator.resolve_for_pat_issue(&request),
            Err(Error::Unauthenticated)
        ));
    }
}
