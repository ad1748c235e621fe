//! WebSocket and HTTP handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, ws::WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
};

use crate::connection::{self, MAX_FRAME_BYTES};
use crate::domain::{AuthError, DirectoryError, RoomKey};
use crate::infrastructure::dto::http::RoomSummaryDto;

use super::state::{AppState, ConnectQuery};

/// Authenticate the session, resolve its room, then hand the socket to the
/// join flow.
///
/// Rejections happen before the upgrade: an invalid credential or unknown
/// user is 401, a non-member is 403, an unreachable collaborator is 503.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room = RoomKey::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let user = match state.authenticator.authenticate(&query.token).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredential) => {
            tracing::warn!("Rejected join for room '{}': invalid credential", room);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(AuthError::Unavailable(e)) => {
            tracing::error!("Authenticator unavailable: {}", e);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    let profile = match state.users.lookup(&user).await {
        Ok(profile) => profile,
        Err(DirectoryError::NotFound(_)) => {
            tracing::warn!("Rejected join for room '{}': unknown user '{}'", room, user);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(DirectoryError::Unavailable(e)) => {
            tracing::error!("User directory unavailable: {}", e);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    match state.memberships.is_member(&room, &user).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(
                "Rejected join: user '{}' is not a member of room '{}'",
                user,
                room
            );
            return Err(StatusCode::FORBIDDEN);
        }
        Err(e) => {
            tracing::error!("Membership lookup failed for room '{}': {}", room, e);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    let hub = state.hub.clone();
    let router = state.router.clone();
    Ok(ws
        .max_message_size(MAX_FRAME_BYTES)
        .on_upgrade(move |socket| {
            connection::join(socket, user, profile.display_name, room, hub, router)
        }))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List active rooms with their online counts
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    let rooms = state
        .hub
        .rooms()
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    let mut summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|(room, online)| RoomSummaryDto {
            room: room.into_string(),
            online,
        })
        .collect();
    // Sort by room key for consistent ordering
    summaries.sort_by(|a, b| a.room.cmp(&b.room));

    Ok(Json(summaries))
}

/// Point-in-time online count for one room
pub async fn get_room_online(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    let room = RoomKey::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let online = state
        .hub
        .online_count(&room)
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(RoomSummaryDto {
        room: room.into_string(),
        online,
    }))
}
