//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::MessagePusher;
use crate::infrastructure::auth::TokenVerifier;
use crate::usecase::{
    DisconnectUserUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
    RelayBoardEventUseCase, SendChatMessageUseCase, UpdateAnalysisUseCase, UpdateFormationUseCase,
};

use super::{
    handler::{debug_rooms, get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Touchline collaboration server
///
/// This struct encapsulates the server configuration and provides methods to
/// run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_room_usecase,
///     update_formation_usecase,
///     update_analysis_usecase,
///     send_chat_message_usecase,
///     relay_board_event_usecase,
///     disconnect_user_usecase,
///     get_rooms_usecase,
///     get_room_detail_usecase,
///     token_verifier,
///     message_pusher,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// UpdateFormationUseCase（フォーメーション更新のユースケース）
    update_formation_usecase: Arc<UpdateFormationUseCase>,
    /// UpdateAnalysisUseCase（分析ドキュメント更新のユースケース）
    update_analysis_usecase: Arc<UpdateAnalysisUseCase>,
    /// SendChatMessageUseCase（チャット送信のユースケース）
    send_chat_message_usecase: Arc<SendChatMessageUseCase>,
    /// RelayBoardEventUseCase（カーソル・描画イベント中継のユースケース）
    relay_board_event_usecase: Arc<RelayBoardEventUseCase>,
    /// DisconnectUserUseCase（切断処理のユースケース）
    disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 接続認証のトークン検証器
    token_verifier: Arc<TokenVerifier>,
    /// MessagePusher（ソケット登録と unicast 用）
    message_pusher: Arc<dyn MessagePusher>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        update_formation_usecase: Arc<UpdateFormationUseCase>,
        update_analysis_usecase: Arc<UpdateAnalysisUseCase>,
        send_chat_message_usecase: Arc<SendChatMessageUseCase>,
        relay_board_event_usecase: Arc<RelayBoardEventUseCase>,
        disconnect_user_usecase: Arc<DisconnectUserUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
        token_verifier: Arc<TokenVerifier>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            join_room_usecase,
            update_formation_usecase,
            update_analysis_usecase,
            send_chat_message_usecase,
            relay_board_event_usecase,
            disconnect_user_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
            token_verifier,
            message_pusher,
        }
    }

    /// Build the axum router for this server.
    ///
    /// Exposed separately from [`Server::run`] so that the integration tests
    /// can serve the router on an ephemeral port.
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase,
            update_formation_usecase: self.update_formation_usecase,
            update_analysis_usecase: self.update_analysis_usecase,
            send_chat_message_usecase: self.send_chat_message_usecase,
            relay_board_event_usecase: self.relay_board_event_usecase,
            disconnect_user_usecase: self.disconnect_user_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
            token_verifier: self.token_verifier,
            message_pusher: self.message_pusher,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/debug/rooms", get(debug_rooms))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the collaboration server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Touchline collaboration server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
