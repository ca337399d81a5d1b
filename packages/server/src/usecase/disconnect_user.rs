//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUserUseCase::execute() メソッド
//! - 切断時の全ルーム走査と is_active の更新、ソケット登録の解除
//!
//! ### なぜこのテストが必要か
//! - 切断してもルームとエントリが残る（削除しない）ことの保証
//! - 参加していた全ルームに userLeft を届けるための離脱情報の検証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数ルームに参加していたユーザーの切断
//! - エッジケース：どのルームにも参加していないソケットの切断

use std::sync::Arc;

use crate::domain::{DepartedRoom, MessagePusher, RoomRegistry, SocketId};

/// 切断処理のユースケース
pub struct DisconnectUserUseCase {
    /// Registry（ルーム格納域の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUserUseCase {
    /// 新しい DisconnectUserUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断処理を実行
    ///
    /// 参加していた全ルームでエントリを非アクティブにし（削除はしない）、
    /// ソケットの登録を解除する。離脱が起きたルームごとの情報を返す。
    pub async fn execute(&self, socket_id: &SocketId) -> Vec<DepartedRoom> {
        let departures = self.registry.mark_disconnected(socket_id).await;
        self.message_pusher.unregister_socket(socket_id).await;
        departures
    }

    /// userLeft を残りの参加者にブロードキャスト
    pub async fn broadcast_user_left(
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
