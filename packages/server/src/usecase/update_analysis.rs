//! UseCase: 分析ドキュメント更新処理
//!
//! フォーメーション更新と同じ last-write-wins + can_edit のパターン。
//! 分析ドキュメント自体は自由形式の JSON で、構造は規定しない。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRegistry, SocketId, UserId};

use super::error::UpdateBoardError;

/// 分析ドキュメント更新のユースケース
pub struct UpdateAnalysisUseCase {
    /// Registry（ルーム格納域の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateAnalysisUseCase {
    /// 新しい UpdateAnalysisUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 分析ドキュメント更新を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SocketId>)` - ブロードキャスト対象（送信者自身を含む）
    /// * `Err(UpdateBoardError)` - 更新失敗。状態は変化しない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        analysis: serde_json::Value,
    ) -> Result<Vec<SocketId>, UpdateBoardError> {
        let targets = self
            .registry
            .apply_analysis(room_id, user_id, analysis)
            .await?;
        Ok(targets)
    }

    /// analysisUpdated をルーム全体にブロードキャスト
    pub async fn broadcast_analysis_updated(
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
