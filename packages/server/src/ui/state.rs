//! Server state and connection management.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::infrastructure::auth::TokenVerifier;
use crate::usecase::{
    DisconnectUserUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
    RelayBoardEventUseCase, SendChatMessageUseCase, UpdateAnalysisUseCase, UpdateFormationUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// UpdateFormationUseCase（フォーメーション更新のユースケース）
    pub update_formation_usecase: Arc<UpdateFormationUseCase>,
    /// UpdateAnalysisUseCase（分析ドキュメント更新のユースケース）
    pub update_analysis_usecase: Arc<UpdateAnalysisUseCase>,
    /// SendChatMessageUseCase（チャット送信のユースケース）
    pub send_chat_message_usecase: Arc<SendChatMessageUseCase>,
    /// RelayBoardEventUseCase（カーソル・描画イベント中継のユースケース）
    pub relay_board_event_usecase: Arc<RelayBoardEventUseCase>,
    /// DisconnectUserUseCase（切断処理のユースケース）
    pub disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 接続認証のトークン検証器
    pub token_verifier: Arc<TokenVerifier>,
    /// ソケットの登録と unicast（ソケットの生成・登録は UI 層の責務）
    pub message_pusher: Arc<dyn MessagePusher>,
}
