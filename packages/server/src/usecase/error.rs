//! UseCase 層のエラー型
//!
//! ハンドラはこれらを次の失敗セマンティクスに写像する：
//! RoomNotFound は静かな no-op、権限系は呼び出し元ソケットへの unicast
//! `error`。他の参加者へは決して伝播しない。

use thiserror::Error;

use crate::domain::{RegistryError, RoomError};

/// フォーメーション・分析ドキュメント更新のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpdateBoardError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("user '{0}' is not allowed to edit the board")]
    PermissionDenied(String),

    #[error("user '{0}' has not joined this room")]
    UnknownUser(String),
}

impl From<RegistryError> for UpdateBoardError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::RoomNotFound(room_id) => Self::RoomNotFound(room_id),
            RegistryError::Room(RoomError::EditNotAllowed(user_id))
            | RegistryError::Room(RoomError::ChatNotAllowed(user_id)) => {
                Self::PermissionDenied(user_id)
            }
            RegistryError::Room(RoomError::UnknownUser(user_id)) => Self::UnknownUser(user_id),
        }
    }
}

/// チャット送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendChatError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("user '{0}' is not allowed to chat in this room")]
    PermissionDenied(String),

    #[error("user '{0}' has not joined this room")]
    UnknownUser(String),
}

impl From<RegistryError> for SendChatError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::RoomNotFound(room_id) => Self::RoomNotFound(room_id),
            RegistryError::Room(RoomError::ChatNotAllowed(user_id))
            | RegistryError::Room(RoomError::EditNotAllowed(user_id)) => {
                Self::PermissionDenied(user_id)
            }
            RegistryError::Room(RoomError::UnknownUser(user_id)) => Self::UnknownUser(user_id),
        }
    }
}

/// カーソル・描画イベント中継のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayBoardEventError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
