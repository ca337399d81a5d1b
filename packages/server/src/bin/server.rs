//! Touchline collaboration server.
//!
//! Shares a tactical formation board, an analysis document and a chat
//! transcript among connected coaches, analysts and viewers over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use touchline_server::{
    infrastructure::{
        auth::TokenVerifier, message_pusher::WebSocketMessagePusher,
        registry::InMemoryRoomRegistry,
    },
    ui::Server,
    usecase::{
        DisconnectUserUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
        RelayBoardEventUseCase, SendChatMessageUseCase, UpdateAnalysisUseCase,
        UpdateFormationUseCase,
    },
};
use touchline_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Touchline collaboration server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Shared secret for verifying connection tokens
    #[arg(long, default_value = "touchline-dev-secret")]
    token_secret: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. Token verifier
    // 5. Server

    // 1. Create Registry (in-memory, process lifetime)
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let update_formation_usecase = Arc::new(UpdateFormationUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let update_analysis_usecase = Arc::new(UpdateAnalysisUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let send_chat_message_usecase = Arc::new(SendChatMessageUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        Arc::new(SystemClock),
    ));
    let relay_board_event_usecase = Arc::new(RelayBoardEventUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let disconnect_user_usecase = Arc::new(DisconnectUserUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(registry.clone()));

    // 4. Create the token verifier
    let token_verifier = Arc::new(TokenVerifier::new(args.token_secret.clone()));

    // 5. Create and run the server
    let server = Server::new(
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
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
