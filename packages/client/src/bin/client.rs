//! Touchline CLI client with reconnection support.
//!
//! Connects to a collaboration server, joins a room and sends chat messages
//! from stdin; `/formation <pattern>` pushes a formation update. A token can
//! be passed directly with `--token`, or self-issued for development from
//! `--user-id` / `--name` / `--role` and the server's shared secret.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval); a rejected token exits immediately instead of retrying.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --room r1 --user-id coach-a --name "Coach A" --role coach
//! cargo run --bin client -- --room r1 --token <token>
//! ```

use clap::Parser;

use touchline_client::{ClientConfig, run_client};
use touchline_server::domain::Role;
use touchline_server::infrastructure::auth::{TokenClaims, TokenVerifier};
use touchline_shared::{logger::setup_logger, time::get_jst_timestamp};

/// Dev-issued tokens stay valid for 8 hours
const DEV_TOKEN_TTL_SECS: i64 = 8 * 3600;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Touchline collaboration room CLI client", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    /// Connection token; when omitted, one is issued from the identity args
    #[arg(long)]
    token: Option<String>,

    /// User id for the dev-issued token
    #[arg(long)]
    user_id: Option<String>,

    /// Display name (defaults to the user id)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Role for the dev-issued token: coach, analyst or viewer
    #[arg(long, default_value = "viewer")]
    role: String,

    /// Shared secret for the dev-issued token (must match the server)
    #[arg(long, default_value = "touchline-dev-secret")]
    secret: String,
}

fn parse_role(raw: &str) -> Option<Role> {
    match raw {
        "coach" => Some(Role::Coach),
        "analyst" => Some(Role::Analyst),
        "viewer" => Some(Role::Viewer),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let user_id = args
        .user_id
        .clone()
        .unwrap_or_else(|| "anonymous".to_string());
    let display_name = args.name.clone().unwrap_or_else(|| user_id.clone());

    let token = match args.token {
        Some(token) => token,
        None => {
            let Some(role) = parse_role(&args.role) else {
                eprintln!("Unknown role '{}': expected coach, analyst or viewer", args.role);
                std::process::exit(2);
            };
            let claims = TokenClaims {
                sub: user_id.clone(),
                name: display_name.clone(),
                role,
                exp: get_jst_timestamp() / 1000 + DEV_TOKEN_TTL_SECS,
            };
            TokenVerifier::new(args.secret.clone()).issue(&claims)
        }
    };

    let config = ClientConfig {
        url: args.url,
        room: args.room,
        token,
        user_id,
        display_name,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
