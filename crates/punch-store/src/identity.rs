//! Sign-in identities.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::errors::IdentityError;

/// The signed-in user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Stable user id.
    pub uid: String,
    /// Whether the session was opened without credentials.
    pub anonymous: bool,
}

/// Opens a session and reports identity changes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in without credentials.
    async fn sign_in_anonymous(&self) -> Result<Identity, IdentityError>;

    /// Sign in with a custom token.
    async fn sign_in_with_token(&self, token: &str) -> Result<Identity, IdentityError>;

    /// Current identity, updated on every sign-in. `None` before the first.
    fn watch(&self) -> watch::Receiver<Option<Identity>>;
}

/// Offline identity provider.
///
/// Anonymous sessions get a fresh `anon-<uuid>`; token sessions get a uid
/// derived from the token's hash, so the same token always maps to the same
/// user.
#[derive(Debug)]
pub struct LocalIdentityProvider {
    current: watch::Sender<Option<Identity>>,
}

impl LocalIdentityProvider {
    /// Create a provider with nobody signed in.
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    fn publish(&self, identity: Identity) -> Identity {
        info!(uid = %identity.uid, anonymous = identity.anonymous, "signed in");
        let _ = self.current.send_replace(Some(identity.clone()));
        identity
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn token_uid(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let hex: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
    format!("user-{hex}")
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in_anonymous(&self) -> Result<Identity, IdentityError> {
        Ok(self.publish(Identity {
            uid: format!("anon-{}", Uuid::now_v7()),
            anonymous: true,
        }))
    }

    async fn sign_in_with_token(&self, token: &str) -> Result<Identity, IdentityError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(IdentityError::InvalidToken);
        }
        Ok(self.publish(Identity {
            uid: token_uid(token),
            anonymous: false,
        }))
    }

    fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}
