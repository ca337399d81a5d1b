//! UseCase: フォーメーション更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateFormationUseCase::execute() メソッド
//! - can_edit による権限チェックと last-write-wins の全置換
//!
//! ### なぜこのテストが必要か
//! - 権限のないユーザーの更新で状態が変化しないことを保証
//! - ブロードキャスト対象に送信者自身が含まれることを確認
//!   （クライアントはエコーされた更新から再描画する）
//!
//! ### どのような状況を想定しているか
//! - 正常系：coach / analyst による更新
//! - 異常系：viewer による更新、未参加ユーザー、存在しないルーム

use std::sync::Arc;

use crate::domain::{Formation, MessagePusher, RoomId, RoomRegistry, SocketId, UserId};

use super::error::UpdateBoardError;

/// フォーメーション更新のユースケース
pub struct UpdateFormationUseCase {
    /// Registry（ルーム格納域の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateFormationUseCase {
    /// 新しい UpdateFormationUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// フォーメーション更新を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SocketId>)` - ブロードキャスト対象（送信者自身を含む）
    /// * `Err(UpdateBoardError)` - 更新失敗。状態は変化しない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        formation: Formation,
    ) -> Result<Vec<SocketId>, UpdateBoardError> {
        let targets = self
            .registry
            .apply_formation(room_id, user_id, formation)
            .await?;
        Ok(targets)
    }

    /// formationUpdated をルーム全体にブロードキャスト
    pub async fn broadcast_formation_updated(
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
