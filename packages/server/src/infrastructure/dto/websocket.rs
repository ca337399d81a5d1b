//! WebSocket event DTOs.
//!
//! The wire protocol is JSON with a `"type"` tag naming the event, one sum
//! type per direction. Inbound payloads are deserialized (and thereby
//! validated for shape) before any state mutation; field names are camelCase
//! on the wire.
//!
//! The chat message discriminator is `kind` on the wire: the event name
//! lives inside the envelope as `type`, so the inner field had to be
//! renamed to keep envelopes single-keyed.

use serde::{Deserialize, Serialize};

use crate::domain::{MessageKind, Role};

// ========================================
// Shared payload fragments
// ========================================

/// A point on the tactical board, normalized coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPointDto {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPositionDto {
    #[serde(default)]
    pub player_id: Option<String>,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationDto {
    pub pattern: String,
    #[serde(default)]
    pub positions: Vec<PlayerPositionDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub timestamp: i64,
    pub kind: MessageKind,
}

/// A sanitized user entry: id / name / role / isActive only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUserDto {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
}

/// The snapshot a joining socket receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateDto {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub users: Vec<RoomUserDto>,
    pub formation: Option<FormationDto>,
    pub analysis: Option<serde_json::Value>,
    pub chat: Vec<ChatMessageDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedByDto {
    pub id: String,
    pub name: String,
}

// ========================================
// Client → Server events
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationUpdatePayload {
    pub room_id: String,
    pub formation: FormationDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub room_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisUpdatePayload {
    pub room_id: String,
    pub analysis: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMovePayload {
    pub room_id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticalDrawPayload {
    pub room_id: String,
    pub path: Vec<BoardPointDto>,
}

/// Inbound socket events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinRoom(JoinRoomPayload),
    FormationUpdate(FormationUpdatePayload),
    ChatMessage(ChatMessagePayload),
    AnalysisUpdate(AnalysisUpdatePayload),
    CursorMove(CursorMovePayload),
    TacticalDraw(TacticalDrawPayload),
}

// ========================================
// Server → Client events
// ========================================

/// Outbound socket events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    RoomState {
        room: RoomStateDto,
    },
    UserJoined {
        user: RoomUserDto,
        message: String,
    },
    UserLeft {
        user_id: String,
        message: String,
    },
    FormationUpdated {
        formation: FormationDto,
        updated_by: UpdatedByDto,
    },
    AnalysisUpdated {
        analysis: serde_json::Value,
        updated_by: UpdatedByDto,
    },
    NewChatMessage(ChatMessageDto),
    CursorMoved {
        user_id: String,
        user_name: String,
        position: BoardPointDto,
    },
    TacticalDrawUpdate {
        user_id: String,
        user_name: String,
        path: Vec<BoardPointDto>,
    },
    Error {
        message: String,
    },
}
