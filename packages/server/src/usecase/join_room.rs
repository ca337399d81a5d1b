//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルームの遅延生成、権限セットの導出、エントリの蓄積
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：初回 join で権限がロールから導出される
//! - 再 join でエントリが重複蓄積される観測挙動を保証（重複排除しない）
//! - join は常に成功する（未知のルーム ID は遅延生成）ことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの join、既存ルームへの join
//! - エッジケース：同一ユーザーの再接続（新しいソケット ID での join）

use std::sync::Arc;

use touchline_shared::time::get_jst_timestamp;

use crate::domain::{
    AuthenticatedUser, ConnectedUser, JoinOutcome, MessagePusher, RoomId, RoomRegistry, SocketId,
    Timestamp,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（ルーム格納域の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// ルーム参加を実行
    ///
    /// 未知のルーム ID なら遅延生成される。join は常に成功する。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加するルームの ID（Domain Model）
    /// * `user` - 検証済みトークン由来のユーザー識別情報
    /// * `socket_id` - この接続のソケット ID
    ///
    /// # Returns
    ///
    /// join 適用後のルームのスナップショットと、このユーザーの権限セット
    pub async fn execute(
        &self,
        room_id: RoomId,
        user: AuthenticatedUser,
        socket_id: SocketId,
    ) -> JoinOutcome {
        let connected = ConnectedUser::new(user.id, user.name, user.role, socket_id);
        self.registry
            .join_room(room_id, connected, Timestamp::new(get_jst_timestamp()))
            .await
    }

    /// userJoined をルーム全体（join した本人を含む）にブロードキャスト
    pub async fn broadcast_user_joined(
        &self,
        targets: Vec<SocketId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// roomState を join したソケットに unicast
    pub async fn notify_room_state(
        &self,
        socket_id: &SocketId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .push_to(socket_id, message)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UserId, UserName};
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
    };

    fn authenticated(id: &str, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(id.to_string()).unwrap(),
            name: UserName::new(id.to_string()).unwrap(),
            role,
        }
    }

    fn room_id(raw: &str) -> RoomId {
        RoomId::new(raw.to_string()).unwrap()
    }

    fn create_usecase() -> (JoinRoomUseCase, Arc<InMemoryRoomRegistry>) {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        (
            JoinRoomUseCase::new(registry.clone(), message_pusher),
            registry,
        )
    }

    #[tokio::test]
    async fn test_join_creates_room_and_grants_permissions() {
        // テスト項目: 未知のルームへの join でルームが生成され、ロールに
        //             応じた権限が返される
        // given (前提条件):
        let (usecase, registry) = create_usecase();

        // when (操作):
        let outcome = usecase
            .execute(
                room_id("r1"),
                authenticated("coach-a", Role::Coach),
                SocketId::generate(),
            )
            .await;

        // then (期待する結果):
        assert!(outcome.permissions.can_edit);
        assert!(outcome.permissions.can_invite);
        assert_eq!(outcome.room.users.len(), 1);

        let stored = registry.get_room(&room_id("r1")).await.unwrap();
        assert_eq!(stored.created_by.as_str(), "coach-a");
    }

    #[tokio::test]
    async fn test_join_by_distinct_users_accumulates_entries() {
        // テスト項目: N 人の join 後にエントリ数が N になる
        // given (前提条件):
        let (usecase, registry) = create_usecase();

        // when (操作):
        usecase
            .execute(
                room_id("r1"),
                authenticated("coach-a", Role::Coach),
                SocketId::generate(),
            )
            .await;
        usecase
            .execute(
                room_id("r1"),
                authenticated("analyst-b", Role::Analyst),
                SocketId::generate(),
            )
            .await;
        usecase
            .execute(
                room_id("r1"),
                authenticated("viewer-c", Role::Viewer),
                SocketId::generate(),
            )
            .await;

        // then (期待する結果):
        let room = registry.get_room(&room_id("r1")).await.unwrap();
        assert_eq!(room.users.len(), 3);
        assert_eq!(room.permissions.len(), 3);
    }

    #[tokio::test]
    async fn test_rejoin_accumulates_duplicate_entries() {
        // テスト項目: 同一ユーザーの再 join でエントリが蓄積される
        //             （重複排除しない）
        // given (前提条件):
        let (usecase, registry) = create_usecase();
        usecase
            .execute(
                room_id("r1"),
                authenticated("coach-a", Role::Coach),
                SocketId::generate(),
            )
            .await;

        // when (操作): 再接続
        let outcome = usecase
            .execute(
                room_id("r1"),
                authenticated("coach-a", Role::Coach),
                SocketId::generate(),
            )
            .await;

        // then (期待する結果): エントリ 2 つ、権限キャッシュは 1 つ
        assert_eq!(outcome.room.users.len(), 2);
        let room = registry.get_room(&room_id("r1")).await.unwrap();
        assert_eq!(room.permissions.len(), 1);
    }

    #[tokio::test]
    async fn test_notify_room_state_reaches_joining_socket() {
        // テスト項目: roomState の unicast が join したソケットに届く
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = JoinRoomUseCase::new(registry, message_pusher.clone());

        let socket_id = SocketId::generate();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        message_pusher.register_socket(socket_id.clone(), tx).await;

        // when (操作):
        let result = usecase
            .notify_room_state(&socket_id, r#"{"type":"roomState"}"#)
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(r#"{"type":"roomState"}"#.to_string()));
    }
}
