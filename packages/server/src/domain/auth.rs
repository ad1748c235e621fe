//! Authentication collaborator trait.

use async_trait::async_trait;

use super::error::AuthError;
use super::value_object::UserId;

/// Turns an opaque credential string into a verified user identity.
///
/// Token parsing and verification belong to the surrounding application;
/// the broadcast core only consumes the verified identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credential: &str) -> Result<UserId, AuthError>;
}
