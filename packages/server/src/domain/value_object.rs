//! 値オブジェクト定義
//!
//! 境界（DTO 層・認証層）から受け取った文字列は、ここで検証してから
//! ドメインに入れる。検証済みであることを型で保証する。

use serde::Serialize;
use uuid::Uuid;

use super::error::ValidationError;

/// ルーム ID の最大長
pub const MAX_ROOM_ID_LEN: usize = 64;
/// ユーザー ID の最大長
pub const MAX_USER_ID_LEN: usize = 64;
/// 表示名の最大長
pub const MAX_USER_NAME_LEN: usize = 64;
/// チャットメッセージ本文の最大長
pub const MAX_MESSAGE_LEN: usize = 2000;

/// ルーム ID
///
/// クライアントが指定する外部由来の ID（サーバー側では生成しない）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyRoomId);
        }
        if trimmed.len() > MAX_ROOM_ID_LEN {
            return Err(ValidationError::RoomIdTooLong(trimmed.len()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ユーザー ID
///
/// 認証トークンの `sub` クレーム由来。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        if trimmed.len() > MAX_USER_ID_LEN {
            return Err(ValidationError::UserIdTooLong(trimmed.len()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ユーザー表示名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUserName);
        }
        if trimmed.len() > MAX_USER_NAME_LEN {
            return Err(ValidationError::UserNameTooLong(trimmed.len()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// チャットメッセージ本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if value.len() > MAX_MESSAGE_LEN {
            return Err(ValidationError::MessageTooLong(value.len()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 接続ごとに払い出されるソケット ID
///
/// 同一ユーザーが再接続すると新しいソケット ID を持つ別エントリになる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SocketId(String);

impl SocketId {
    /// Generate a fresh socket id for a new connection
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_accepts_plain_id() {
        // テスト項目: 通常のルーム ID が受理される
        // given (前提条件):
        let raw = "match-2026-08-06".to_string();

        // when (操作):
        let result = RoomId::new(raw);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "match-2026-08-06");
    }

    #[test]
    fn test_room_id_is_trimmed() {
        // テスト項目: 前後の空白が除去される
        // given (前提条件):
        let raw = "  r1  ".to_string();

        // when (操作):
        let result = RoomId::new(raw);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "r1");
    }

    #[test]
    fn test_room_id_rejects_empty() {
        // テスト項目: 空のルーム ID が拒否される
        // given (前提条件):
        let raw = "   ".to_string();

        // when (操作):
        let result = RoomId::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::EmptyRoomId));
    }

    #[test]
    fn test_room_id_rejects_too_long() {
        // テスト項目: 最大長を超えるルーム ID が拒否される
        // given (前提条件):
        let raw = "r".repeat(MAX_ROOM_ID_LEN + 1);

        // when (操作):
        let result = RoomId::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::RoomIdTooLong(65)));
    }

    #[test]
    fn test_user_id_rejects_empty() {
        // テスト項目: 空のユーザー ID が拒否される
        // given (前提条件):
        let raw = "".to_string();

        // when (操作):
        let result = UserId::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::EmptyUserId));
    }

    #[test]
    fn test_message_content_rejects_too_long() {
        // テスト項目: 最大長を超える本文が拒否される
        // given (前提条件):
        let raw = "x".repeat(MAX_MESSAGE_LEN + 1);

        // when (操作):
        let result = MessageContent::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValidationError::MessageTooLong(2001)));
    }

    #[test]
    fn test_message_content_keeps_inner_whitespace() {
        // テスト項目: 本文内の空白はそのまま保持される
        // given (前提条件):
        let raw = "press higher  up the pitch".to_string();

        // when (操作):
        let result = MessageContent::new(raw.clone());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), raw);
    }

    #[test]
    fn test_socket_id_generate_is_unique() {
        // テスト項目: 生成されるソケット ID が一意である
        // given (前提条件):

        // when (操作):
        let a = SocketId::generate();
        let b = SocketId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }
}
