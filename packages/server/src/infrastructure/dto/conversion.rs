//! Conversion logic between DTOs and domain entities.

use touchline_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::entity;
use crate::infrastructure::dto::http;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::PlayerPositionDto> for entity::PlayerPosition {
    fn from(dto: dto::PlayerPositionDto) -> Self {
        Self {
            player_id: dto.player_id,
            x: dto.x,
            y: dto.y,
            label: dto.label,
        }
    }
}

impl From<dto::FormationDto> for entity::Formation {
    fn from(dto: dto::FormationDto) -> Self {
        Self {
            pattern: dto.pattern,
            positions: dto.positions.into_iter().map(Into::into).collect(),
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::PlayerPosition> for dto::PlayerPositionDto {
    fn from(model: entity::PlayerPosition) -> Self {
        Self {
            player_id: model.player_id,
            x: model.x,
            y: model.y,
            label: model.label,
        }
    }
}

impl From<entity::Formation> for dto::FormationDto {
    fn from(model: entity::Formation) -> Self {
        Self {
            pattern: model.pattern,
            positions: model.positions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<entity::ChatMessage> for dto::ChatMessageDto {
    fn from(model: entity::ChatMessage) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id.into_string(),
            user_name: model.user_name.into_string(),
            content: model.content.into_string(),
            timestamp: model.timestamp.value(),
            kind: model.kind,
        }
    }
}

/// 公開用のユーザーエントリへのサニタイズ
///
/// ソケット ID と last_action は外に出さない（id / name / role / isActive
/// のみ）。
impl From<&entity::ConnectedUser> for dto::RoomUserDto {
    fn from(model: &entity::ConnectedUser) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            name: model.name.as_str().to_string(),
            role: model.role,
            is_active: model.is_active,
        }
    }
}

impl From<entity::Room> for dto::RoomStateDto {
    fn from(model: entity::Room) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            name: model.name,
            created_by: model.created_by.into_string(),
            users: model.users.iter().map(Into::into).collect(),
            formation: model.formation.map(Into::into),
            analysis: model.analysis,
            chat: model.chat.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&entity::Room> for http::RoomSummaryDto {
    fn from(model: &entity::Room) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            name: model.name.clone(),
            active_users: model.distinct_active_user_count(),
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
        }
    }
}

impl From<&entity::Room> for http::RoomDetailDto {
    fn from(model: &entity::Room) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            name: model.name.clone(),
            created_by: model.created_by.as_str().to_string(),
            users: model.users.iter().map(Into::into).collect(),
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
        }
    }
}
