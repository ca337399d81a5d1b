//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` をソケット ID をキーに管理
//! - ソケットへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に
//! 使用します。
//!
//! これにより、「WebSocket の生成」と「メッセージの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, SocketId};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `sockets`: 接続中のソケットと対応する sender のマップ
pub struct WebSocketMessagePusher {
    /// 接続中のソケットの WebSocket sender
    ///
    /// Key: SocketId
    /// Value: PusherChannel
    sockets: Mutex<HashMap<SocketId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            sockets: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_socket(&self, socket_id: SocketId, sender: PusherChannel) {
        let mut sockets = self.sockets.lock().await;
        sockets.insert(socket_id.clone(), sender);
        tracing::debug!("Socket '{}' registered to MessagePusher", socket_id.as_str());
    }

    async fn unregister_socket(&self, socket_id: &SocketId) {
        let mut sockets = self.sockets.lock().await;
        sockets.remove(socket_id);
        tracing::debug!(
            "Socket '{}' unregistered from MessagePusher",
            socket_id.as_str()
        );
    }

    async fn push_to(&self, socket_id: &SocketId, content: &str) -> Result<(), MessagePushError> {
        let sockets = self.sockets.lock().await;

        if let Some(sender) = sockets.get(socket_id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to socket '{}'", socket_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::SocketNotFound(
                socket_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<SocketId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let sockets = self.sockets.lock().await;

        for target in targets {
            if let Some(sender) = sockets.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push message to socket '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted message to socket '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "Socket '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の基本的なメッセージ送信機能
    // - push_to: 特定のソケットへの送信
    // - broadcast: 複数ソケットへの送信
    // - エラーハンドリング（存在しないソケット）
    //
    // 【なぜこのテストが必要か】
    // - MessagePusher は UseCase から呼ばれる通信層の中核
    // - ルーム内ブロードキャストの配信先制御はここに依存する
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功ケース
    // 2. push_to の失敗ケース（ソケットが存在しない）
    // 3. broadcast の成功ケース（複数ソケット）
    // 4. broadcast の部分失敗ケース（一部のソケットが存在しない）
    // ========================================

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のソケットにメッセージを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let socket_id = SocketId::generate();
        pusher.register_socket(socket_id.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&socket_id, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        let received = rx.recv().await;
        assert_eq!(received, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_socket_not_found() {
        // テスト項目: 存在しないソケットへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let socket_id = SocketId::generate();

        // when (操作):
        let result = pusher.push_to(&socket_id, "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::SocketNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_push_to_unregistered_socket_fails() {
        // テスト項目: 登録解除したソケットへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let socket_id = SocketId::generate();
        pusher.register_socket(socket_id.clone(), tx).await;
        pusher.unregister_socket(&socket_id).await;

        // when (操作):
        let result = pusher.push_to(&socket_id, "Hello").await;

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のソケットにメッセージをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let socket_a = SocketId::generate();
        let socket_b = SocketId::generate();
        pusher.register_socket(socket_a.clone(), tx1).await;
        pusher.register_socket(socket_b.clone(), tx2).await;

        // when (操作):
        let targets = vec![socket_a, socket_b];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: ブロードキャスト時、一部のソケットが存在しなくても成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let socket_a = SocketId::generate();
        let unknown = SocketId::generate();
        pusher.register_socket(socket_a.clone(), tx1).await;

        // when (操作):
        let targets = vec![socket_a, unknown];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果):
        assert!(result.is_ok()); // ブロードキャストは部分失敗を許容
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.broadcast(vec![], "Message").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
