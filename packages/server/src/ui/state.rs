//! Server state shared by the axum handlers.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Authenticator, MembershipStore, UserDirectory};
use crate::hub::Hub;
use crate::router::MessageRouter;

/// Query parameters for the WebSocket upgrade
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Opaque credential, verified by the authenticator
    pub token: String,
}

/// Shared application state
pub struct AppState {
    /// Handle to the room registry worker
    pub hub: Hub,
    /// Authentication collaborator (credential → identity)
    pub authenticator: Arc<dyn Authenticator>,
    /// User directory collaborator (identity → profile)
    pub users: Arc<dyn UserDirectory>,
    /// Membership collaborator, consulted before the upgrade
    pub memberships: Arc<dyn MembershipStore>,
    /// Router invoked for every inbound frame
    pub router: Arc<dyn MessageRouter>,
}
