//! Domain-level error types.

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id is too long: {0} characters")]
    RoomIdTooLong(usize),

    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("user id is too long: {0} characters")]
    UserIdTooLong(usize),

    #[error("user name must not be empty")]
    EmptyUserName,

    #[error("user name is too long: {0} characters")]
    UserNameTooLong(usize),

    #[error("message content must not be empty")]
    EmptyMessage,

    #[error("message content is too long: {0} characters")]
    MessageTooLong(usize),
}

/// Room エンティティのルール違反
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// The user has never joined this room, so no permission set is cached.
    #[error("user '{0}' has not joined this room")]
    UnknownUser(String),

    /// The cached permission set does not grant `can_edit`.
    #[error("user '{0}' is not allowed to edit the board")]
    EditNotAllowed(String),

    /// The cached permission set does not grant `can_chat`.
    #[error("user '{0}' is not allowed to chat in this room")]
    ChatNotAllowed(String),
}

/// RoomRegistry のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// MessagePusher のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("socket '{0}' is not registered")]
    SocketNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
