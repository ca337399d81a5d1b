//! RoomRegistry trait 定義
//!
//! ドメイン層が必要とするルーム格納域のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは 1 回のロック区間で完結するアトミックな操作として実装される
//! こと。状態変更とブロードキャスト対象の取得を 1 メソッドにまとめている
//! のはそのためで、チェックと適用の間に他の接続の変更が割り込まない。

use async_trait::async_trait;

use super::entity::{ChatMessage, ConnectedUser, Formation, PermissionSet, Room};
use super::error::RegistryError;
use super::value_object::{RoomId, SocketId, Timestamp, UserId};

/// join の結果
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// join 適用後のルームのスナップショット
    pub room: Room,
    /// join したユーザーの権限セット（初回 join 時に導出されたキャッシュ）
    pub permissions: PermissionSet,
}

/// 切断によってユーザーが離脱した 1 ルーム分の情報
#[derive(Debug, Clone)]
pub struct DepartedRoom {
    pub room_id: RoomId,
    pub user_id: UserId,
    /// 離脱後もアクティブな残りのソケット（userLeft の通知対象）
    pub remaining_targets: Vec<SocketId>,
}

/// Room Registry trait
///
/// プロセス内の全ルームを管理するインターフェース。UseCase 層はこの
/// trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// ルームに参加する
    ///
    /// 未知のルーム ID なら遅延生成する（最初の参加者が created_by になる）。
    /// 参加は常に成功する。
    async fn join_room(
        &self,
        room_id: RoomId,
        user: ConnectedUser,
        now: Timestamp,
    ) -> JoinOutcome;

    /// ルームのスナップショットを取得する
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RegistryError>;

    /// 全ルームのスナップショットを取得する
    async fn list_rooms(&self) -> Vec<Room>;

    /// フォーメーションを全置換し、ブロードキャスト対象を返す
    async fn apply_formation(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        formation: Formation,
    ) -> Result<Vec<SocketId>, RegistryError>;

    /// 分析ドキュメントを全置換し、ブロードキャスト対象を返す
    async fn apply_analysis(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        analysis: serde_json::Value,
    ) -> Result<Vec<SocketId>, RegistryError>;

    /// チャットメッセージを追記し、ブロードキャスト対象を返す
    async fn append_chat(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        message: ChatMessage,
    ) -> Result<Vec<SocketId>, RegistryError>;

    /// ルームのアクティブなソケット ID 一覧を取得する
    async fn active_socket_ids(&self, room_id: &RoomId) -> Result<Vec<SocketId>, RegistryError>;

    /// 指定ソケットを全ルームから離脱させる
    ///
    /// 全ルームを線形走査し、該当エントリの is_active を落とす。ルームも
    /// エントリも削除しない。離脱が起きたルームごとの情報を返す。
    async fn mark_disconnected(&self, socket_id: &SocketId) -> Vec<DepartedRoom>;
}
