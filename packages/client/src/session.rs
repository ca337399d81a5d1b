//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use touchline_server::infrastructure::dto::websocket::{
    ChatMessagePayload, ClientEvent, FormationDto, FormationUpdatePayload, JoinRoomPayload,
    ServerEvent,
};
use touchline_shared::time::get_jst_timestamp;

use crate::{
    error::ClientError,
    formatter::MessageFormatter,
    runner::ClientConfig,
    ui::redisplay_prompt,
};

/// Run one WebSocket client session (connect, join, chat until it ends)
pub async fn run_client_session(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    // The handshake carries the token as a query parameter
    let url = format!("{}?token={}", config.url, config.token);

    let (ws_stream, response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(e) => {
            // Check if it's an HTTP error response
            let error_msg = e.to_string();

            // The server refuses bad tokens with HTTP 401 before the upgrade
            if error_msg.contains("401") || error_msg.contains("Unauthorized") {
                return Err(Box::new(ClientError::Unauthorized));
            }

            return Err(Box::new(ClientError::ConnectionError(error_msg)));
        }
    };

    // Check HTTP status code from response
    if response.status().as_u16() == 401 {
        return Err(Box::new(ClientError::Unauthorized));
    }

    tracing::info!("Connected to collaboration server!");
    println!(
        "\nYou are '{}' in room '{}'. Type to chat, '/formation <pattern>' to push a formation, Ctrl+C to exit.\n",
        config.display_name, config.room
    );

    let (mut write, mut read) = ws_stream.split();

    // Join the room right away; the server answers with the roomState snapshot
    let join_event = ClientEvent::JoinRoom(JoinRoomPayload {
        room_id: config.room.clone(),
    });
    write
        .send(Message::Text(serde_json::to_string(&join_event)?.into()))
        .await?;

    let display_name_for_read = config.display_name.clone();
    let user_id_for_read = config.user_id.clone();

    // Spawn a task to handle incoming events
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(ServerEvent::RoomState { room }) => {
                            let formatted =
                                MessageFormatter::format_room_state(&room, &user_id_for_read);
                            print!("{}", formatted);
                            redisplay_prompt(&display_name_for_read);
                        }
                        Ok(ServerEvent::UserJoined { message, .. }) => {
                            print!("{}", MessageFormatter::format_user_joined(&message));
                            redisplay_prompt(&display_name_for_read);
                        }
                        Ok(ServerEvent::UserLeft { message, .. }) => {
                            print!("{}", MessageFormatter::format_user_left(&message));
                            redisplay_prompt(&display_name_for_read);
                        }
                        Ok(ServerEvent::NewChatMessage(chat)) => {
                            let formatted = MessageFormatter::format_chat_message(
                                &chat.user_name,
                                &chat.content,
                                chat.timestamp,
                            );
                            print!("{}", formatted);
                            redisplay_prompt(&display_name_for_read);
                        }
                        Ok(ServerEvent::FormationUpdated {
                            formation,
                            updated_by,
                        }) => {
                            let formatted = MessageFormatter::format_formation_updated(
                                &formation.pattern,
                                &updated_by.name,
                            );
                            print!("{}", formatted);
                            redisplay_prompt(&display_name_for_read);
                        }
                        Ok(ServerEvent::AnalysisUpdated { updated_by, .. }) => {
                            let formatted =
                                MessageFormatter::format_analysis_updated(&updated_by.name);
                            print!("{}", formatted);
                            redisplay_prompt(&display_name_for_read);
                        }
                        Ok(ServerEvent::Error { message }) => {
                            print!("{}", MessageFormatter::format_error(&message));
                            redisplay_prompt(&display_name_for_read);
                        }
                        Ok(ServerEvent::CursorMoved { .. })
                        | Ok(ServerEvent::TacticalDrawUpdate { .. }) => {
                            // Too noisy for a line-based terminal, skip
                            tracing::debug!("Ignoring board event: {}", text);
                        }
                        Err(_) => {
                            print!("{}", MessageFormatter::format_raw_message(&text));
                            redisplay_prompt(&display_name_for_read);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let display_name_for_prompt = config.display_name.clone();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", display_name_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn stdin lines into client events
    let room_for_write = config.room.clone();
    let display_name_for_write = config.display_name.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let event = if let Some(pattern) = line.strip_prefix("/formation ") {
                ClientEvent::FormationUpdate(FormationUpdatePayload {
                    room_id: room_for_write.clone(),
                    formation: FormationDto {
                        pattern: pattern.trim().to_string(),
                        positions: vec![],
                    },
                })
            } else {
                ClientEvent::ChatMessage(ChatMessagePayload {
                    room_id: room_for_write.clone(),
                    content: line,
                })
            };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send event: {}", e);
                write_error = true;
                break;
            }

            // Display sent timestamp and redisplay prompt
            let formatted = MessageFormatter::format_sent_confirmation(get_jst_timestamp());
            print!("\n{}", formatted);
            redisplay_prompt(&display_name_for_write);
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
