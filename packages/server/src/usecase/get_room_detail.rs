//! UseCase: ルーム詳細取得処理（HTTP API 用）

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRegistry};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Registry（ルーム格納域の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム詳細を取得する
    ///
    /// パスパラメータ由来の文字列を受け取るため、ID の検証もここで行う。
    /// 不正な ID は存在しないルームと同じ扱いにする。
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.registry
            .get_room(&room_id)
            .await
            .map_err(|_| GetRoomDetailError::RoomNotFound)
    }
}
