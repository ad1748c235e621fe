//! Reference authenticator backed by a static token table.
//!
//! Real deployments plug in their own `Authenticator` (JWT verification,
//! session lookup); this one serves the demo binary and the test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{AuthError, Authenticator, UserId};

/// Maps opaque credential strings to user identities.
#[derive(Default)]
pub struct StaticTokenAuthenticator {
    tokens: Mutex<HashMap<String, UserId>>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as a credential for `user`.
    pub async fn register_token(&self, token: String, user: UserId) {
        self.tokens.lock().await.insert(token, user);
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, credential: &str) -> Result<UserId, AuthError> {
        self.tokens
            .lock()
            .await
            .get(credential)
            .cloned()
            .ok_or(AuthError::InvalidCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_token_resolves_to_its_user() {
        // given:
        let auth = StaticTokenAuthenticator::new();
        let user = UserId::new("u1".to_string()).unwrap();
        auth.register_token("secret".to_string(), user.clone()).await;

        // when / then:
        assert_eq!(auth.authenticate("secret").await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        // given:
        let auth = StaticTokenAuthenticator::new();

        // when / then:
        assert!(matches!(
            auth.authenticate("nope").await,
            Err(AuthError::InvalidCredential)
        ));
    }
}
