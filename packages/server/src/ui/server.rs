//! Server construction and execution.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::{Authenticator, MembershipStore, UserDirectory};
use crate::hub::Hub;
use crate::router::MessageRouter;

use super::{
    handler::{get_room_online, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// The broadcast core's HTTP/WebSocket server.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Assemble the server from its collaborators.
    ///
    /// # Arguments
    ///
    /// * `hub` - Handle to the room registry worker
    /// * `authenticator` - Credential verification collaborator
    /// * `users` - User directory collaborator
    /// * `memberships` - Membership collaborator
    /// * `router` - Router invoked for every inbound frame
    pub fn new(
        hub: Hub,
        authenticator: Arc<dyn Authenticator>,
        users: Arc<dyn UserDirectory>,
        memberships: Arc<dyn MembershipStore>,
        router: Arc<dyn MessageRouter>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                hub,
                authenticator,
                users,
                memberships,
                router,
            }),
        }
    }

    /// The axum application, exposed separately so tests can serve it on an
    /// ephemeral port.
    pub fn app(&self) -> Router {
        Router::new()
            // WebSocket endpoint
            .route("/ws/{room_id}", get(websocket_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}/online", get(get_room_online))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until a shutdown signal arrives.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.app();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat broadcast server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/{{room_id}}?token=...", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
