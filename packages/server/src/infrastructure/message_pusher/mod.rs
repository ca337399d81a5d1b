//! MessagePusher 実装
//!
//! 現在は WebSocket 実装のみ。

mod websocket;

pub use websocket::WebSocketMessagePusher;
