//! ドメインエンティティ定義
//!
//! コラボレーションルームの集約（Room）とその構成要素。ルームの不変条件
//! （権限キャッシュ、last-write-wins の盤面更新、追記専用のチャット履歴）は
//! 全てここで守る。外側の層は Room のメソッド経由でしか状態を変更しない。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::RoomError;
use super::value_object::{MessageContent, RoomId, SocketId, Timestamp, UserId, UserName};

/// 参加者のロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coach,
    Analyst,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Coach => "coach",
            Role::Analyst => "analyst",
            Role::Viewer => "viewer",
        }
    }
}

/// ルーム内でのユーザー権限
///
/// 初回 join 時にロールから導出してキャッシュする。再 join しても
/// 再導出はしない（キャッシュがそのまま使われる）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub can_edit: bool,
    pub can_chat: bool,
    pub can_invite: bool,
}

impl PermissionSet {
    /// ロールから権限フラグを導出する
    ///
    /// - coach: 編集・チャット・招待の全てが可能
    /// - analyst: 編集とチャットが可能
    /// - viewer: チャットのみ可能
    pub fn from_role(role: Role) -> Self {
        match role {
            Role::Coach => Self {
                can_edit: true,
                can_chat: true,
                can_invite: true,
            },
            Role::Analyst => Self {
                can_edit: true,
                can_chat: true,
                can_invite: false,
            },
            Role::Viewer => Self {
                can_edit: false,
                can_chat: true,
                can_invite: false,
            },
        }
    }
}

/// 検証済みトークンから得た接続ユーザーの識別情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: UserName,
    pub role: Role,
}

/// ユーザーが最後に行った編集操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    FormationUpdate,
    AnalysisUpdate,
}

/// ルームに参加した接続ユーザーのエントリ
///
/// 接続（join）ごとに 1 エントリ。切断時は削除せず `is_active` を
/// false にするだけで、エントリ自体はプロセスの生存期間中残り続ける。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedUser {
    pub id: UserId,
    pub name: UserName,
    pub role: Role,
    pub socket_id: SocketId,
    pub is_active: bool,
    pub last_action: Option<UserAction>,
}

impl ConnectedUser {
    pub fn new(id: UserId, name: UserName, role: Role, socket_id: SocketId) -> Self {
        Self {
            id,
            name,
            role,
            socket_id,
            is_active: true,
            last_action: None,
        }
    }
}

/// チャットメッセージの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    System,
    Analysis,
}

/// チャットメッセージ
///
/// ID はサーバーが採番する（到着時刻のエポックミリ秒を文字列化したもの）。
/// 同一ミリ秒に複数メッセージが届くと ID が衝突しうるが、重複排除は
/// しない（元システムの観測挙動を維持）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub user_id: UserId,
    pub user_name: UserName,
    pub content: MessageContent,
    pub timestamp: Timestamp,
    pub kind: MessageKind,
}

impl ChatMessage {
    pub fn new(
        user_id: UserId,
        user_name: UserName,
        content: MessageContent,
        timestamp: Timestamp,
        kind: MessageKind,
    ) -> Self {
        Self {
            id: timestamp.value().to_string(),
            user_id,
            user_name,
            content,
            timestamp,
            kind,
        }
    }

    /// 通常のテキストメッセージを作成する
    pub fn text(
        user_id: UserId,
        user_name: UserName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self::new(user_id, user_name, content, timestamp, MessageKind::Text)
    }
}

/// 選手の盤面上の配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPosition {
    pub player_id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
}

/// 戦術フォーメーション
///
/// ルーム内で共有される主要な可変オブジェクト。更新は常に全置換
/// （last-write-wins）で、マージもバージョン管理もしない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formation {
    pub pattern: String,
    pub positions: Vec<PlayerPosition>,
}

/// コラボレーションルームの集約
///
/// 未知の ID への初回 join で遅延生成され、以後明示的には破棄されない。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub users: Vec<ConnectedUser>,
    pub formation: Option<Formation>,
    pub analysis: Option<serde_json::Value>,
    pub chat: Vec<ChatMessage>,
    pub permissions: HashMap<UserId, PermissionSet>,
}

impl Room {
    /// 新しいルームを作成する
    ///
    /// ルーム名はルーム ID をそのまま使う（クライアントはルームを
    /// ID でしか指定しない）。
    pub fn new(id: RoomId, created_by: UserId, created_at: Timestamp) -> Self {
        let name = id.as_str().to_string();
        Self {
            id,
            name,
            created_by,
            created_at,
            users: Vec::new(),
            formation: None,
            analysis: None,
            chat: Vec::new(),
            permissions: HashMap::new(),
        }
    }

    /// 参加者を追加し、そのユーザーの権限セットを返す
    ///
    /// 権限セットは初回 join 時のみロールから導出してキャッシュする。
    /// エントリは無条件に追加する。再接続したユーザーは新しいソケット ID
    /// を持つ 2 つ目のエントリになる（重複排除しないのは元システムの
    /// 観測挙動で、意図的に維持している）。
    pub fn join(&mut self, user: ConnectedUser) -> PermissionSet {
        let permissions = *self
            .permissions
            .entry(user.id.clone())
            .or_insert_with(|| PermissionSet::from_role(user.role));
        self.users.push(user);
        permissions
    }

    /// キャッシュ済みの権限セットを取得する
    pub fn permission_of(&self, user_id: &UserId) -> Option<PermissionSet> {
        self.permissions.get(user_id).copied()
    }

    /// フォーメーションを全置換する（last-write-wins）
    ///
    /// `can_edit` を持たないユーザーの更新は拒否し、状態は変更しない。
    pub fn apply_formation(
        &mut self,
        user_id: &UserId,
        formation: Formation,
    ) -> Result<(), RoomError> {
        let permissions = self
            .permission_of(user_id)
            .ok_or_else(|| RoomError::UnknownUser(user_id.as_str().to_string()))?;
        if !permissions.can_edit {
            return Err(RoomError::EditNotAllowed(user_id.as_str().to_string()));
        }

        self.formation = Some(formation);
        self.set_last_action(user_id, UserAction::FormationUpdate);
        Ok(())
    }

    /// 分析ドキュメントを全置換する（last-write-wins）
    pub fn apply_analysis(
        &mut self,
        user_id: &UserId,
        analysis: serde_json::Value,
    ) -> Result<(), RoomError> {
        let permissions = self
            .permission_of(user_id)
            .ok_or_else(|| RoomError::UnknownUser(user_id.as_str().to_string()))?;
        if !permissions.can_edit {
            return Err(RoomError::EditNotAllowed(user_id.as_str().to_string()));
        }

        self.analysis = Some(analysis);
        self.set_last_action(user_id, UserAction::AnalysisUpdate);
        Ok(())
    }

    /// チャットメッセージを履歴に追記する
    ///
    /// 履歴は追記専用・無制限。上限もローテーションも設けない。
    pub fn append_chat(&mut self, user_id: &UserId, message: ChatMessage) -> Result<(), RoomError> {
        let permissions = self
            .permission_of(user_id)
            .ok_or_else(|| RoomError::UnknownUser(user_id.as_str().to_string()))?;
        if !permissions.can_chat {
            return Err(RoomError::ChatNotAllowed(user_id.as_str().to_string()));
        }

        self.chat.push(message);
        Ok(())
    }

    /// 指定ソケットのエントリを非アクティブにする
    ///
    /// エントリは削除しない。該当エントリがあればそのユーザー ID を返す。
    pub fn mark_disconnected(&mut self, socket_id: &SocketId) -> Option<UserId> {
        let mut departed = None;
        for user in &mut self.users {
            if &user.socket_id == socket_id {
                user.is_active = false;
                departed = Some(user.id.clone());
            }
        }
        departed
    }

    /// アクティブなエントリのソケット ID 一覧（ブロードキャスト対象）
    ///
    /// 重複 join したソケットが二重配信にならないよう、順序を保って
    /// 重複を除く。
    pub fn active_socket_ids(&self) -> Vec<SocketId> {
        let mut seen = Vec::new();
        for user in &self.users {
            if user.is_active && !seen.contains(&user.socket_id) {
                seen.push(user.socket_id.clone());
            }
        }
        seen
    }

    /// アクティブな participant の人数（ユーザー ID で重複を除いた数）
    pub fn distinct_active_user_count(&self) -> usize {
        let mut seen: Vec<&UserId> = Vec::new();
        for user in &self.users {
            if user.is_active && !seen.contains(&&user.id) {
                seen.push(&user.id);
            }
        }
        seen.len()
    }

    fn set_last_action(&mut self, user_id: &UserId, action: UserAction) {
        for user in &mut self.users {
            if &user.id == user_id {
                user.last_action = Some(action);
            }
        }
    }
}
