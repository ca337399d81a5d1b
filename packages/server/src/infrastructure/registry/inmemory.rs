//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。HashMap を
//! インメモリ DB として使用します。
//!
//! ## 並行性モデル
//!
//! レジストリ全体を 1 つの `Mutex` で守り、各操作（チェック＋状態変更＋
//! ブロードキャスト対象の取得）を 1 回のロック区間で完結させる。これは
//! 元システムのシングルスレッドなイベントループと同じアトミック性を
//! 再現するためで、部分的な変更が他の接続から観測されることはない。
//! 順序は last-write-wins のままで、クライアント間の因果順序は保証しない。
//!
//! ルームは未知の ID への初回 join で遅延生成され、以後削除されない
//! （プロセスの生存期間中蓄積する。明示的な破棄・TTL は設けない）。
//! 水平スケールは非対応：状態はこのプロセスのメモリにしか存在しない。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ConnectedUser, DepartedRoom, Formation, JoinOutcome, RegistryError, Room,
    RoomId, RoomRegistry, SocketId, Timestamp, UserId,
};

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry {
    /// Room ID → Room の集約
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join_room(
        &self,
        room_id: RoomId,
        user: ConnectedUser,
        now: Timestamp,
    ) -> JoinOutcome {
        let mut rooms = self.rooms.lock().await;

        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id, user.id.clone(), now));
        let permissions = room.join(user);

        JoinOutcome {
            room: room.clone(),
            permissions,
        }
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RegistryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut all: Vec<Room> = rooms.values().cloned().collect();
        // Sort by room id for consistent ordering
        all.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        all
    }

    async fn apply_formation(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        formation: Formation,
    ) -> Result<Vec<SocketId>, RegistryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;

        room.apply_formation(user_id, formation)?;
        Ok(room.active_socket_ids())
    }

    async fn apply_analysis(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        analysis: serde_json::Value,
    ) -> Result<Vec<SocketId>, RegistryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;

        room.apply_analysis(user_id, analysis)?;
        Ok(room.active_socket_ids())
    }

    async fn append_chat(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        message: ChatMessage,
    ) -> Result<Vec<SocketId>, RegistryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;

        room.append_chat(user_id, message)?;
        Ok(room.active_socket_ids())
    }

    async fn active_socket_ids(&self, room_id: &RoomId) -> Result<Vec<SocketId>, RegistryError> {
        let rooms = self.rooms.lock().await;
        let room = rooms
            .get(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;
        Ok(room.active_socket_ids())
    }

    async fn mark_disconnected(&self, socket_id: &SocketId) -> Vec<DepartedRoom> {
        let mut rooms = self.rooms.lock().await;

        // 全ルームの線形走査。ルーム数はプロセス寿命の間しか増えない前提。
        let mut departures = Vec::new();
        for room in rooms.values_mut() {
            if let Some(user_id) = room.mark_disconnected(socket_id) {
                departures.push(DepartedRoom {
                    room_id: room.id.clone(),
                    user_id,
                    remaining_targets: room.active_socket_ids(),
                });
            }
        }
        departures
    }
}
