//! Entity 定義
//!
//! セッション（2者ペア）、待機エントリ、チャットメッセージのドメインモデル。

use serde::Serialize;

use super::error::DomainError;
use super::value_object::{ClientId, MessageContent, SessionId, SessionMode, Timestamp};

/// セッションが保持できるメッセージログの上限
const MESSAGE_LOG_CAPACITY: usize = 500;

/// パートナー待機中のクライアントを表すエントリ
///
/// クライアントはいかなる時点でも高々1つの WaitingEntry しか持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingEntry {
    /// 待機中クライアントの ID
    pub client_id: ClientId,
    /// 希望するセッション種別
    pub mode: SessionMode,
    /// キュー投入時刻
    pub enqueued_at: Timestamp,
}

impl WaitingEntry {
    pub fn new(client_id: ClientId, mode: SessionMode, enqueued_at: Timestamp) -> Self {
        Self {
            client_id,
            mode,
            enqueued_at,
        }
    }
}

/// チャットメッセージ
///
/// chat モードのセッションログの中にのみ存在する。セッション終了とともに破棄される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// メッセージ ID（UUID v4）
    pub id: String,
    /// 送信者
    pub from: ClientId,
    /// メッセージ内容
    pub content: MessageContent,
    /// 送信時刻
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(from: ClientId, content: MessageContent, timestamp: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            content,
            timestamp,
        }
    }
}

/// セッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    TornDown,
}

/// 2者間セッション
///
/// 必ず相異なる2名の参加者を持つ。chat モードのみ一時的なメッセージログを保持し、
/// ログはセッションの生存期間を超えて永続化されることはない。
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// セッション ID
    pub id: SessionId,
    /// セッション種別
    pub mode: SessionMode,
    /// 参加者（常にちょうど2名、相異なる）
    pub participants: [ClientId; 2],
    /// メッセージログ（chat モードのみ使用、teardown で破棄）
    pub messages: Vec<ChatMessage>,
    /// 作成時刻
    pub created_at: Timestamp,
    /// 状態
    pub status: SessionStatus,
}

impl Session {
    /// Create a new active session between two distinct participants.
    ///
    /// Self-pairing is a domain invariant violation and is rejected here.
    pub fn new(
        id: SessionId,
        mode: SessionMode,
        a: ClientId,
        b: ClientId,
        created_at: Timestamp,
    ) -> Result<Self, DomainError> {
        if a == b {
            return Err(DomainError::SelfPairing(a.into_string()));
        }
        Ok(Self {
            id,
            mode,
            participants: [a, b],
            messages: Vec::new(),
            created_at,
            status: SessionStatus::Active,
        })
    }

    /// Return the counterpart of `client_id`, or None if it is not a participant.
    pub fn peer_of(&self, client_id: &ClientId) -> Option<&ClientId> {
        let [a, b] = &self.participants;
        if a == client_id {
            Some(b)
        } else if b == client_id {
            Some(a)
        } else {
            None
        }
    }

    pub fn is_participant(&self, client_id: &ClientId) -> bool {
        self.participants.iter().any(|p| p == client_id)
    }

    /// Append a chat message to the session log.
    ///
    /// Only chat sessions carry a log; the log is bounded.
    pub fn add_message(&mut self, message: ChatMessage) -> Result<(), DomainError> {
        if self.mode != SessionMode::Chat {
            return Err(DomainError::NotAChatSession);
        }
        if self.messages.len() >= MESSAGE_LOG_CAPACITY {
            return Err(DomainError::MessageLogFull);
        }
        self.messages.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::SessionIdFactory;

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    fn chat_session(a: &str, b: &str) -> Session {
        Session::new(
            SessionIdFactory::generate(),
            SessionMode::Chat,
            client(a),
            client(b),
            Timestamp::new(1000),
        )
        .unwrap()
    }

    #[test]
    fn test_session_rejects_self_pairing() {
        // テスト項目: 同一クライアント同士のセッション生成は拒否される
        // given (前提条件):
        let alice = client("alice");

        // when (操作):
        let result = Session::new(
            SessionIdFactory::generate(),
            SessionMode::Chat,
            alice.clone(),
            alice,
            Timestamp::new(1000),
        );

        // then (期待する結果):
        assert!(matches!(result, Err(DomainError::SelfPairing(_))));
    }

    #[test]
    fn test_peer_of_returns_counterpart() {
        // テスト項目: peer_of が相手側の参加者を返す
        // given (前提条件):
        let session = chat_session("alice", "bob");

        // when (操作) / then (期待する結果):
        assert_eq!(session.peer_of(&client("alice")), Some(&client("bob")));
        assert_eq!(session.peer_of(&client("bob")), Some(&client("alice")));
        assert_eq!(session.peer_of(&client("charlie")), None);
    }

    #[test]
    fn test_add_message_to_chat_session() {
        // テスト項目: chat セッションにメッセージを追加できる
        // given (前提条件):
        let mut session = chat_session("alice", "bob");
        let message = ChatMessage::new(
            client("alice"),
            MessageContent::new("hi".to_string()).unwrap(),
            Timestamp::new(2000),
        );

        // when (操作):
        let result = session.add_message(message);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].content.as_str(), "hi");
    }

    #[test]
    fn test_add_message_rejected_for_video_session() {
        // テスト項目: video セッションはメッセージログを持たない
        // given (前提条件):
        let mut session = Session::new(
            SessionIdFactory::generate(),
            SessionMode::Video,
            client("alice"),
            client("bob"),
            Timestamp::new(1000),
        )
        .unwrap();
        let message = ChatMessage::new(
            client("alice"),
            MessageContent::new("hi".to_string()).unwrap(),
            Timestamp::new(2000),
        );

        // when (操作):
        let result = session.add_message(message);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::NotAChatSession));
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_add_message_log_capacity() {
        // テスト項目: メッセージログが上限に達したら追加が拒否される
        // given (前提条件):
        let mut session = chat_session("alice", "bob");
        for _ in 0..MESSAGE_LOG_CAPACITY {
            let message = ChatMessage::new(
                client("alice"),
                MessageContent::new("x".to_string()).unwrap(),
                Timestamp::new(2000),
            );
            session.add_message(message).unwrap();
        }

        // when (操作): 上限を超える1件を追加
        let overflow = ChatMessage::new(
            client("alice"),
            MessageContent::new("y".to_string()).unwrap(),
            Timestamp::new(3000),
        );
        let result = session.add_message(overflow);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::MessageLogFull));
        assert_eq!(session.messages.len(), MESSAGE_LOG_CAPACITY);
    }
}
