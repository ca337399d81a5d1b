//! UseCase: ルーム一覧取得処理（HTTP API 用）

use std::sync::Arc;

use crate::domain::{Room, RoomRegistry};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Registry（ルーム格納域の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 全ルームのスナップショットを取得する（ルーム ID 順）
    pub async fn execute(&self) -> Vec<Room> {
        self.registry.list_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectedUser, Role, RoomId, SocketId, Timestamp, UserId, UserName};
    use crate::infrastructure::registry::InMemoryRoomRegistry;

    #[tokio::test]
    async fn test_get_rooms_returns_every_room() {
        // テスト項目: 生成済みの全ルームが返される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        for id in ["r2", "r1"] {
            registry
                .join_room(
                    RoomId::new(id.to_string()).unwrap(),
                    ConnectedUser::new(
                        UserId::new("coach-a".to_string()).unwrap(),
                        UserName::new("coach-a".to_string()).unwrap(),
                        Role::Coach,
                        SocketId::generate(),
                    ),
                    Timestamp::new(1000),
                )
                .await;
        }
        let usecase = GetRoomsUseCase::new(registry);

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果): ルーム ID 順
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_get_rooms_empty_registry() {
        // テスト項目: ルームがない場合は空のリストが返される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = GetRoomsUseCase::new(registry);

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert!(rooms.is_empty());
    }
}
