//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChatMessageUseCase::execute() メソッド
//! - サーバー採番のメッセージ ID（エポックミリ秒の文字列）と履歴への追記
//!
//! ### なぜこのテストが必要か
//! - ID の採番規則はクライアントとの互換性に直結する
//! - can_chat チェック（全ロールがチャット可能）の保証
//! - 履歴が単調に増加し、縮まないことの保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：各ロールからの送信
//! - 異常系：未参加ユーザー、存在しないルーム
//! - エッジケース：同一ミリ秒の連続送信（ID 衝突を許容）

use std::sync::Arc;

use touchline_shared::time::Clock;

use crate::domain::{
    ChatMessage, MessageContent, MessagePusher, RoomId, RoomRegistry, SocketId, Timestamp, UserId,
    UserName,
};

use super::error::SendChatError;

/// チャットメッセージ送信のユースケース
pub struct SendChatMessageUseCase {
    /// Registry（ルーム格納域の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（メッセージ ID 採番用。テストでは FixedClock を注入する）
    clock: Arc<dyn Clock>,
}

impl SendChatMessageUseCase {
    /// 新しい SendChatMessageUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            clock,
        }
    }

    /// チャットメッセージ送信を実行
    ///
    /// メッセージ ID はサーバーが到着時刻（エポックミリ秒）から採番する。
    /// 同一ミリ秒の衝突は許容し、重複排除しない。
    ///
    /// # Returns
    ///
    /// * `Ok((ChatMessage, Vec<SocketId>))` - 採番済みメッセージと
    ///   ブロードキャスト対象（送信者自身を含む）
    /// * `Err(SendChatError)` - 送信失敗。履歴は変化しない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        user_name: &UserName,
        content: MessageContent,
    ) -> Result<(ChatMessage, Vec<SocketId>), SendChatError> {
        let timestamp = Timestamp::new(self.clock.now_millis());
        let message = ChatMessage::text(user_id.clone(), user_name.clone(), content, timestamp);

        let targets = self
            .registry
            .append_chat(room_id, user_id, message.clone())
            .await?;

        Ok((message, targets))
    }

    /// newChatMessage をルーム全体にブロードキャスト
    pub async fn broadcast_message(
        &self,
        targets: Vec<SocketId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message_pusher::MockMessagePusher;
    use crate::domain::{ConnectedUser, Role};
    use crate::infrastructure::registry::InMemoryRoomRegistry;
    use touchline_shared::time::FixedClock;

    fn room_id(raw: &str) -> RoomId {
        RoomId::new(raw.to_string()).unwrap()
    }

    fn user_id(raw: &str) -> UserId {
        UserId::new(raw.to_string()).unwrap()
    }

    fn user_name(raw: &str) -> UserName {
        UserName::new(raw.to_string()).unwrap()
    }

    fn content(raw: &str) -> MessageContent {
        MessageContent::new(raw.to_string()).unwrap()
    }

    async fn join(registry: &InMemoryRoomRegistry, room: &str, id: &str, role: Role) {
        registry
            .join_room(
                room_id(room),
                ConnectedUser::new(user_id(id), user_name(id), role, SocketId::generate()),
                Timestamp::new(1000),
            )
            .await;
    }

    fn create_usecase(
        registry: Arc<InMemoryRoomRegistry>,
        fixed_millis: i64,
    ) -> SendChatMessageUseCase {
        SendChatMessageUseCase::new(
            registry,
            Arc::new(MockMessagePusher::new()),
            Arc::new(FixedClock::new(fixed_millis)),
        )
    }

    #[tokio::test]
    async fn test_send_chat_assigns_epoch_millis_id() {
        // テスト項目: メッセージ ID がエポックミリ秒の文字列で採番される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        join(&registry, "r1", "viewer-c", Role::Viewer).await;
        let usecase = create_usecase(registry.clone(), 1754444444444);

        // when (操作): viewer もチャットは可能
        let result = usecase
            .execute(
                &room_id("r1"),
                &user_id("viewer-c"),
                &user_name("viewer-c"),
                content("hello"),
            )
            .await;

        // then (期待する結果):
        let (message, targets) = result.unwrap();
        assert_eq!(message.id, "1754444444444");
        assert_eq!(message.timestamp, Timestamp::new(1754444444444));
        assert_eq!(targets.len(), 1);

        let room = registry.get_room(&room_id("r1")).await.unwrap();
        assert_eq!(room.chat.len(), 1);
        assert_eq!(room.chat[0].content.as_str(), "hello");
    }

    #[tokio::test]
    async fn test_send_chat_transcript_grows_monotonically() {
        // テスト項目: 連続送信で履歴が送信順に単調増加する
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        join(&registry, "r1", "coach-a", Role::Coach).await;
        let usecase = create_usecase(registry.clone(), 5000);

        // when (操作):
        for text in ["one", "two", "three"] {
            usecase
                .execute(
                    &room_id("r1"),
                    &user_id("coach-a"),
                    &user_name("coach-a"),
                    content(text),
                )
                .await
                .unwrap();
        }

        // then (期待する結果): 送信順に 3 件。同一ミリ秒なので ID は衝突する
        let room = registry.get_room(&room_id("r1")).await.unwrap();
        assert_eq!(room.chat.len(), 3);
        let contents: Vec<&str> = room.chat.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert!(room.chat.iter().all(|m| m.id == "5000"));
    }

    #[tokio::test]
    async fn test_send_chat_to_missing_room() {
        // テスト項目: 存在しないルームへの送信は RoomNotFound になる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = create_usecase(registry, 5000);

        // when (操作):
        let result = usecase
            .execute(
                &room_id("ghost"),
                &user_id("coach-a"),
                &user_name("coach-a"),
                content("anyone here?"),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SendChatError::RoomNotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_send_chat_from_unknown_user() {
        // テスト項目: 未参加ユーザーの送信は UnknownUser になり、
        //             履歴が変化しない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        join(&registry, "r1", "coach-a", Role::Coach).await;
        let usecase = create_usecase(registry.clone(), 5000);

        // when (操作):
        let result = usecase
            .execute(
                &room_id("r1"),
                &user_id("stranger"),
                &user_name("stranger"),
                content("let me in"),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendChatError::UnknownUser("stranger".to_string()))
        );
        let room = registry.get_room(&room_id("r1")).await.unwrap();
        assert!(room.chat.is_empty());
    }
}
