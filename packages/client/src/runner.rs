//! Client execution logic with reconnection support.

use std::time::Duration;

use crate::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::run_client_session,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Connection settings for one client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket server URL (e.g., "ws://127.0.0.1:8080/ws")
    pub url: String,
    /// Room to join on connect
    pub room: String,
    /// Connection token for the handshake
    pub token: String,
    /// Own user id (to mark "me" in the participant list)
    pub user_id: String,
    /// Prompt display name
    pub display_name: String,
}

/// Run the WebSocket client with reconnection logic
pub async fn run_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            config.url,
            config.display_name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&config).await {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                if let Some(client_err) = e.downcast_ref::<ClientError>() {
                    if should_exit_immediately(client_err) {
                        tracing::error!("{}", e);
                        tracing::error!("The server rejected the connection token. Exiting.");
                        std::process::exit(1);
                    }

                    if !should_attempt_reconnect(client_err, reconnect_count, MAX_RECONNECT_ATTEMPTS)
                    {
                        tracing::error!(
                            "Failed to reconnect after {} attempts. Exiting.",
                            MAX_RECONNECT_ATTEMPTS
                        );
                        std::process::exit(1);
                    }
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    std::process::exit(1);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
