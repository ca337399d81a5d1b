//! Message formatting utilities for client display.

use touchline_server::infrastructure::dto::websocket::RoomStateDto;
use touchline_shared::time::timestamp_to_jst_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the room snapshot received after joining.
    ///
    /// # Arguments
    ///
    /// * `room` - The sanitized room snapshot
    /// * `current_user_id` - The current user's id (to mark as "me")
    pub fn format_room_state(room: &RoomStateDto, current_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str(&format!("Room: {}\n", room.name));

        if let Some(formation) = &room.formation {
            output.push_str(&format!("Formation: {}\n", formation.pattern));
        }

        output.push_str("Participants:\n");
        if room.users.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for user in &room.users {
                let me_suffix = if user.id == current_user_id { " (me)" } else { "" };
                let inactive_suffix = if user.is_active { "" } else { " (inactive)" };
                output.push_str(&format!(
                    "{} [{:?}]{}{}\n",
                    user.name, user.role, me_suffix, inactive_suffix
                ));
            }
        }

        if !room.chat.is_empty() {
            output.push_str(&format!("({} chat messages so far)\n", room.chat.len()));
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a user-joined notification
    pub fn format_user_joined(message: &str) -> String {
        format!("\n+ {}\n", message)
    }

    /// Format a user-left notification
    pub fn format_user_left(message: &str) -> String {
        format!("\n- {}\n", message)
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `from` - The display name of the sender
    /// * `content` - The message content
    /// * `sent_at` - Unix timestamp when the message was sent (milliseconds)
    pub fn format_chat_message(from: &str, content: &str, sent_at: i64) -> String {
        let timestamp_str = timestamp_to_jst_rfc3339(sent_at);
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            from, content, timestamp_str
        )
    }

    /// Format a formation update notification
    pub fn format_formation_updated(pattern: &str, updated_by: &str) -> String {
        format!("\n* formation is now {} (updated by {})\n", pattern, updated_by)
    }

    /// Format an analysis update notification
    pub fn format_analysis_updated(updated_by: &str) -> String {
        format!("\n* analysis updated by {}\n", updated_by)
    }

    /// Format a server-side error
    pub fn format_error(message: &str) -> String {
        format!("\n! server error: {}\n", message)
    }

    /// Format a raw (unparseable) message
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }

    /// Format a confirmation message after sending
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        let timestamp_str = timestamp_to_jst_rfc3339(sent_at);
        format!("sent at {}\n", timestamp_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchline_server::domain::Role;
    use touchline_server::infrastructure::dto::websocket::{FormationDto, RoomUserDto};

    fn sample_room() -> RoomStateDto {
        RoomStateDto {
            id: "r1".to_string(),
            name: "r1".to_string(),
            created_by: "coach-a".to_string(),
            users: vec![
                RoomUserDto {
                    id: "coach-a".to_string(),
                    name: "Coach A".to_string(),
                    role: Role::Coach,
                    is_active: true,
                },
                RoomUserDto {
                    id: "viewer-b".to_string(),
                    name: "Viewer B".to_string(),
                    role: Role::Viewer,
                    is_active: false,
                },
            ],
            formation: Some(FormationDto {
                pattern: "4-4-2".to_string(),
                positions: vec![],
            }),
            analysis: None,
            chat: vec![],
        }
    }

    #[test]
    fn test_format_room_state_marks_me_and_inactive() {
        // テスト項目: 自分のエントリに (me)、非アクティブなエントリに
        //             (inactive) が付く
        // given (前提条件):
        let room = sample_room();

        // when (操作):
        let output = MessageFormatter::format_room_state(&room, "coach-a");

        // then (期待する結果):
        assert!(output.contains("Coach A [Coach] (me)"));
        assert!(output.contains("Viewer B [Viewer] (inactive)"));
        assert!(output.contains("Formation: 4-4-2"));
    }

    #[test]
    fn test_format_chat_message_contains_sender_and_time() {
        // テスト項目: チャット表示に送信者と JST 時刻が含まれる
        // given (前提条件):
        // 2023-01-01 00:00:00 JST
        let sent_at = 1672498800000;

        // when (操作):
        let output = MessageFormatter::format_chat_message("Coach A", "press higher", sent_at);

        // then (期待する結果):
        assert!(output.contains("@Coach A: press higher"));
        assert!(output.contains("2023-01-01T00:00:00"));
    }

    #[test]
    fn test_format_formation_updated() {
        // テスト項目: フォーメーション更新の通知表示
        // given (前提条件):

        // when (操作):
        let output = MessageFormatter::format_formation_updated("3-5-2", "Coach A");

        // then (期待する結果):
        assert!(output.contains("formation is now 3-5-2"));
        assert!(output.contains("updated by Coach A"));
    }
}
