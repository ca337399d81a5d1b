//! WebSocket connection handlers.
//!
//! Handshake authentication happens before the upgrade; after that, every
//! inbound frame is parsed into a typed [`ClientEvent`] and dispatched. A
//! failing handler stays on this socket: the error is logged and answered
//! with a unicast `error` event, never broadcast to other participants, and
//! never fatal to the server. A missing room is a silent no-op.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use touchline_shared::time::get_jst_timestamp;

use crate::{
    domain::{AuthenticatedUser, Formation, MessageContent, RoomId, SocketId},
    infrastructure::dto::websocket::{
        AnalysisUpdatePayload, BoardPointDto, ChatMessageDto, ChatMessagePayload, ClientEvent,
        CursorMovePayload, FormationDto, FormationUpdatePayload, JoinRoomPayload, RoomStateDto,
        RoomUserDto, ServerEvent, TacticalDrawPayload, UpdatedByDto,
    },
    ui::state::AppState,
    usecase::{RelayBoardEventError, SendChatError, UpdateBoardError},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Verify the handshake token before upgrading. Unauthenticated sockets
    // are refused here and never see a WebSocket frame.
    let user = match state
        .token_verifier
        .verify(&query.token, get_jst_timestamp())
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Rejecting socket handshake: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    // Create a channel for this socket to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the socket before the upgrade so that pre-join unicasts
    // (error events) already have a destination
    let socket_id = SocketId::generate();
    state
        .message_pusher
        .register_socket(socket_id.clone(), tx)
        .await;

    tracing::info!(
        "Socket '{}' connected for user '{}'",
        socket_id.as_str(),
        user.id.as_str()
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user, socket_id, rx)))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This function handles the outbound message flow: events addressed to this
/// socket (via the MessagePusher channel) are written to the WebSocket
/// connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this socket
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    user: AuthenticatedUser,
    socket_id: SocketId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let user_clone = user.clone();
    let socket_id_clone = socket_id.clone();

    // Spawn a task to receive events from this socket
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            dispatch_event(&state_clone, &user_clone, &socket_id_clone, event)
                                .await;
                        }
                        Err(e) => {
                            tracing::warn!("Failed to parse client event: {}", e);
                            notify_error(&state_clone, &socket_id_clone, "invalid event payload")
                                .await;
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Socket '{}' requested close", socket_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive messages from other sockets and push them out
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Mark the user inactive in every joined room (the rooms themselves are
    // never deleted) and notify the remaining participants, one userLeft
    // per room
    let departures = state.disconnect_user_usecase.execute(&socket_id).await;
    for departed in departures {
        let left_event = ServerEvent::UserLeft {
            user_id: departed.user_id.as_str().to_string(),
            message: format!("{} left the room", user.name.as_str()),
        };
        let left_json = serde_json::to_string(&left_event).unwrap();
        if let Err(e) = state
            .disconnect_user_usecase
            .broadcast_user_left(departed.remaining_targets, &left_json)
            .await
        {
            tracing::warn!(
                "Failed to broadcast userLeft for room '{}': {}",
                departed.room_id.as_str(),
                e
            );
        }
    }

    tracing::info!("Socket '{}' disconnected", socket_id.as_str());
}

/// Route one inbound event to its handler.
async fn dispatch_event(
    state: &Arc<AppState>,
    user: &AuthenticatedUser,
    socket_id: &SocketId,
    event: ClientEvent,
) {
    match event {
        ClientEvent::JoinRoom(payload) => handle_join_room(state, user, socket_id, payload).await,
        ClientEvent::FormationUpdate(payload) => {
            handle_formation_update(state, user, socket_id, payload).await
        }
        ClientEvent::ChatMessage(payload) => {
            handle_chat_message(state, user, socket_id, payload).await
        }
        ClientEvent::AnalysisUpdate(payload) => {
            handle_analysis_update(state, user, socket_id, payload).await
        }
        ClientEvent::CursorMove(payload) => {
            handle_cursor_move(state, user, socket_id, payload).await
        }
        ClientEvent::TacticalDraw(payload) => {
            handle_tactical_draw(state, user, socket_id, payload).await
        }
    }
}

/// Unicast an `error` event to the originating socket only.
async fn notify_error(state: &Arc<AppState>, socket_id: &SocketId, message: &str) {
    let event = ServerEvent::Error {
        message: message.to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    if let Err(e) = state.message_pusher.push_to(socket_id, &json).await {
        tracing::warn!(
            "Failed to send error event to socket '{}': {}",
            socket_id.as_str(),
            e
        );
    }
}

fn updated_by(user: &AuthenticatedUser) -> UpdatedByDto {
    UpdatedByDto {
        id: user.id.as_str().to_string(),
        name: user.name.as_str().to_string(),
    }
}

async fn handle_join_room(
    state: &Arc<AppState>,
    user: &AuthenticatedUser,
    socket_id: &SocketId,
    payload: JoinRoomPayload,
) {
    let room_id = match RoomId::new(payload.room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Invalid room id on joinRoom: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
            return;
        }
    };

    let outcome = state
        .join_room_usecase
        .execute(room_id.clone(), user.clone(), socket_id.clone())
        .await;
    tracing::info!(
        "User '{}' joined room '{}' (entries: {})",
        user.id.as_str(),
        room_id.as_str(),
        outcome.room.users.len()
    );

    // Broadcast userJoined to the whole room, the joiner included
    let joined_event = ServerEvent::UserJoined {
        user: RoomUserDto {
            id: user.id.as_str().to_string(),
            name: user.name.as_str().to_string(),
            role: user.role,
            is_active: true,
        },
        message: format!("{} joined the room", user.name.as_str()),
    };
    let joined_json = serde_json::to_string(&joined_event).unwrap();
    let targets = outcome.room.active_socket_ids();
    if let Err(e) = state
        .join_room_usecase
        .broadcast_user_joined(targets, &joined_json)
        .await
    {
        tracing::warn!("Failed to broadcast userJoined: {}", e);
    }

    // Unicast the sanitized snapshot back to the joining socket; a
    // reconnecting client rebuilds its view from this alone
    let state_event = ServerEvent::RoomState {
        room: RoomStateDto::from(outcome.room),
    };
    let state_json = serde_json::to_string(&state_event).unwrap();
    if let Err(e) = state
        .join_room_usecase
        .notify_room_state(socket_id, &state_json)
        .await
    {
        tracing::warn!(
            "Failed to send roomState to socket '{}': {}",
            socket_id.as_str(),
            e
        );
    }
}

async fn handle_formation_update(
    state: &Arc<AppState>,
    user: &AuthenticatedUser,
    socket_id: &SocketId,
    payload: FormationUpdatePayload,
) {
    let room_id = match RoomId::new(payload.room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Invalid room id on formationUpdate: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
            return;
        }
    };
    let formation = Formation::from(payload.formation);

    match state
        .update_formation_usecase
        .execute(&room_id, &user.id, formation.clone())
        .await
    {
        Ok(targets) => {
            let event = ServerEvent::FormationUpdated {
                formation: FormationDto::from(formation),
                updated_by: updated_by(user),
            };
            let json = serde_json::to_string(&event).unwrap();
            if let Err(e) = state
                .update_formation_usecase
                .broadcast_formation_updated(targets, &json)
                .await
            {
                tracing::warn!("Failed to broadcast formationUpdated: {}", e);
            }
        }
        Err(UpdateBoardError::RoomNotFound(room_id)) => {
            // Missing room: silent no-op
            tracing::debug!("formationUpdate for unknown room '{}', ignoring", room_id);
        }
        Err(e) => {
            tracing::warn!("formationUpdate rejected: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
        }
    }
}

async fn handle_chat_message(
    state: &Arc<AppState>,
    user: &AuthenticatedUser,
    socket_id: &SocketId,
    payload: ChatMessagePayload,
) {
    let room_id = match RoomId::new(payload.room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Invalid room id on chatMessage: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
            return;
        }
    };
    let content = match MessageContent::new(payload.content) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Invalid chat content: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
            return;
        }
    };

    match state
        .send_chat_message_usecase
        .execute(&room_id, &user.id, &user.name, content)
        .await
    {
        Ok((message, targets)) => {
            let event = ServerEvent::NewChatMessage(ChatMessageDto::from(message));
            let json = serde_json::to_string(&event).unwrap();
            if let Err(e) = state
                .send_chat_message_usecase
                .broadcast_message(targets, &json)
                .await
            {
                tracing::warn!("Failed to broadcast newChatMessage: {}", e);
            }
        }
        Err(SendChatError::RoomNotFound(room_id)) => {
            // Missing room: silent no-op
            tracing::debug!("chatMessage for unknown room '{}', ignoring", room_id);
        }
        Err(e) => {
            tracing::warn!("chatMessage rejected: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
        }
    }
}

async fn handle_analysis_update(
    state: &Arc<AppState>,
    user: &AuthenticatedUser,
    socket_id: &SocketId,
    payload: AnalysisUpdatePayload,
) {
    let room_id = match RoomId::new(payload.room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Invalid room id on analysisUpdate: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
            return;
        }
    };

    match state
        .update_analysis_usecase
        .execute(&room_id, &user.id, payload.analysis.clone())
        .await
    {
        Ok(targets) => {
            let event = ServerEvent::AnalysisUpdated {
                analysis: payload.analysis,
                updated_by: updated_by(user),
            };
            let json = serde_json::to_string(&event).unwrap();
            if let Err(e) = state
                .update_analysis_usecase
                .broadcast_analysis_updated(targets, &json)
                .await
            {
                tracing::warn!("Failed to broadcast analysisUpdated: {}", e);
            }
        }
        Err(UpdateBoardError::RoomNotFound(room_id)) => {
            // Missing room: silent no-op
            tracing::debug!("analysisUpdate for unknown room '{}', ignoring", room_id);
        }
        Err(e) => {
            tracing::warn!("analysisUpdate rejected: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
        }
    }
}

async fn handle_cursor_move(
    state: &Arc<AppState>,
    user: &AuthenticatedUser,
    socket_id: &SocketId,
    payload: CursorMovePayload,
) {
    let room_id = match RoomId::new(payload.room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Invalid room id on cursorMove: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
            return;
        }
    };

    // No permission check: cursor broadcasts are purely visual
    match state.relay_board_event_usecase.execute(&room_id).await {
        Ok(targets) => {
            let event = ServerEvent::CursorMoved {
                user_id: user.id.as_str().to_string(),
                user_name: user.name.as_str().to_string(),
                position: BoardPointDto {
                    x: payload.x,
                    y: payload.y,
                },
            };
            let json = serde_json::to_string(&event).unwrap();
            if let Err(e) = state
                .relay_board_event_usecase
                .broadcast(targets, &json)
                .await
            {
                tracing::warn!("Failed to broadcast cursorMoved: {}", e);
            }
        }
        Err(RelayBoardEventError::RoomNotFound(room_id)) => {
            // Missing room: silent no-op
            tracing::debug!("cursorMove for unknown room '{}', ignoring", room_id);
        }
    }
}

async fn handle_tactical_draw(
    state: &Arc<AppState>,
    user: &AuthenticatedUser,
    socket_id: &SocketId,
    payload: TacticalDrawPayload,
) {
    let room_id = match RoomId::new(payload.room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Invalid room id on tacticalDraw: {}", e);
            notify_error(state, socket_id, &e.to_string()).await;
            return;
        }
    };

    // No permission check: drawing broadcasts are purely visual
    match state.relay_board_event_usecase.execute(&room_id).await {
        Ok(targets) => {
            let event = ServerEvent::TacticalDrawUpdate {
                user_id: user.id.as_str().to_string(),
                user_name: user.name.as_str().to_string(),
                path: payload.path,
            };
            let json = serde_json::to_string(&event).unwrap();
            if let Err(e) = state
                .relay_board_event_usecase
                .broadcast(targets, &json)
                .await
            {
                tracing::warn!("Failed to broadcast tacticalDrawUpdate: {}", e);
            }
        }
        Err(RelayBoardEventError::RoomNotFound(room_id)) => {
            // Missing room: silent no-op
            tracing::debug!("tacticalDraw for unknown room '{}', ignoring", room_id);
        }
    }
}
