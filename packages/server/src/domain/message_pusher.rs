//! MessagePusher trait 定義
//!
//! 接続中のソケットへメッセージを届ける手段の抽象化。UseCase 層はこの
//! trait に依存し、WebSocket の実装詳細には依存しない。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::SocketId;

/// ソケットへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Message Pusher trait
///
/// ソケット ID をキーに送信チャンネルを管理し、unicast / broadcast を行う。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// ソケットを登録する
    async fn register_socket(&self, socket_id: SocketId, sender: PusherChannel);

    /// ソケットの登録を解除する
    async fn unregister_socket(&self, socket_id: &SocketId);

    /// 特定のソケットに送信する（unicast）
    async fn push_to(&self, socket_id: &SocketId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のソケットに送信する（broadcast）
    ///
    /// 一部のソケットへの送信失敗は許容する（ログに残して継続）。
    async fn broadcast(
        &self,
        targets: Vec<SocketId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
