//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::RoomUserDto;

/// One row of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
    /// Distinct active users (duplicate entries of one user count once)
    pub active_users: usize,
    /// RFC 3339, JST
    pub created_at: String,
}

/// Response of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub users: Vec<RoomUserDto>,
    /// RFC 3339, JST
    pub created_at: String,
}
