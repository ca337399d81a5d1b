//! UseCase: カーソル移動・描画ストロークの中継処理
//!
//! cursorMove / tacticalDraw は編集可能な状態の変更ではなく純粋に視覚的な
//! ブロードキャストなので、意図的に権限チェックを行わない（フォーメーション
//! 更新との非対称は意図したもの）。ルームの状態も一切変更しない。

use std::sync::Arc;

use crate::domain::{MessagePusher, RegistryError, RoomId, RoomRegistry, SocketId};

use super::error::RelayBoardEventError;

/// 盤面上の視覚イベント中継のユースケース
pub struct RelayBoardEventUseCase {
    /// Registry（ルーム格納域の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayBoardEventUseCase {
    /// 新しい RelayBoardEventUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 中継先（ルームのアクティブな全ソケット）を取得する
    pub async fn execute(&self, room_id: &RoomId) -> Result<Vec<SocketId>, RelayBoardEventError> {
        match self.registry.active_socket_ids(room_id).await {
            Ok(targets) => Ok(targets),
            Err(RegistryError::RoomNotFound(id)) => Err(RelayBoardEventError::RoomNotFound(id)),
            Err(RegistryError::Room(err)) => {
                // active_socket_ids はルームのルールを評価しない
                tracing::warn!("unexpected registry error while relaying board event: {}", err);
                Err(RelayBoardEventError::RoomNotFound(
                    room_id.as_str().to_string(),
                ))
            }
        }
    }

    /// cursorMoved / tacticalDrawUpdate をルーム全体にブロードキャスト
    pub async fn broadcast(&self, targets: Vec<SocketId>, message: &str) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
