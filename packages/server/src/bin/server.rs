//! Chat broadcast server with room fan-out.
//!
//! Receives messages from room members over WebSocket and broadcasts them
//! to every member of the same room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use hiroba_server::{
    domain::{DisplayName, RoomKey, UserId, UserProfile},
    hub::Hub,
    infrastructure::{
        InMemoryMembershipStore, InMemoryMessageStore, InMemoryUserDirectory,
        StaticTokenAuthenticator,
    },
    router::ChatRouter,
    ui::Server,
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Chat broadcast server with room fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Hub (room registry worker)
    // 2. Collaborator stores (in-memory, seeded with demo data)
    // 3. Router
    // 4. Server

    // 1. Spawn the room registry worker
    let hub = Hub::spawn();

    // 2. Create and seed the in-memory collaborators
    let authenticator = Arc::new(StaticTokenAuthenticator::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let memberships = Arc::new(InMemoryMembershipStore::new());
    let messages = Arc::new(InMemoryMessageStore::new());
    seed_demo_data(&authenticator, &users, &memberships).await;

    // 3. Create the router
    let router = Arc::new(ChatRouter::new(
        hub.clone(),
        messages,
        memberships.clone(),
        Arc::new(SystemClock),
    ));

    // 4. Create and run the server
    let server = Server::new(hub, authenticator, users, memberships, router);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Seed demo users, tokens and one shared room so the server is usable out
/// of the box.
async fn seed_demo_data(
    authenticator: &StaticTokenAuthenticator,
    users: &InMemoryUserDirectory,
    memberships: &InMemoryMembershipStore,
) {
    let lounge = RoomKey::group("lounge").expect("room key is valid");

    for (user_id, name, token) in [
        ("alice", "Alice", "alice-token"),
        ("bob", "Bob", "bob-token"),
    ] {
        let user = UserId::new(user_id.to_string()).expect("user id is valid");
        authenticator
            .register_token(token.to_string(), user.clone())
            .await;
        users
            .insert(UserProfile {
                id: user.clone(),
                display_name: DisplayName::new(name.to_string()).expect("display name is valid"),
            })
            .await;
        memberships.grant(lounge.clone(), user).await;

        tracing::info!(
            "Demo user '{}' can join room '{}' with ?token={}",
            user_id,
            lounge,
            token
        );
    }
}
