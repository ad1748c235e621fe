//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// One active room and its current member count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room: String,
    pub online: usize,
}
