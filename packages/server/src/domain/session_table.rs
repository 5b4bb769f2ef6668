//! セッションテーブル
//!
//! アクティブな 2 者間セッションの集合を所有する。セッションの生成、
//! 参加者からの逆引き、冪等な teardown を提供する。

use std::collections::HashMap;

use super::entity::{Session, SessionStatus};
use super::error::DomainError;
use super::value_object::{ClientId, SessionId, SessionIdFactory, SessionMode, Timestamp};

/// アクティブセッションのテーブル
///
/// participant_index により「クライアント → セッション」の逆引きが O(1) になる。
/// クライアントは高々 1 つのセッションにしか属せない。
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<SessionId, Session>,
    participant_index: HashMap<ClientId, SessionId>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            participant_index: HashMap::new(),
        }
    }

    /// Create a fresh session between two distinct participants.
    ///
    /// Precondition: neither participant is in another session (both must
    /// already have been removed from the waiting pool by the caller).
    pub fn create(
        &mut self,
        a: ClientId,
        b: ClientId,
        mode: SessionMode,
        now: Timestamp,
    ) -> Result<Session, DomainError> {
        debug_assert!(
            !self.participant_index.contains_key(&a) && !self.participant_index.contains_key(&b),
            "participants must not already be in a session"
        );
        let session = Session::new(SessionIdFactory::generate(), mode, a.clone(), b.clone(), now)?;
        self.participant_index.insert(a, session.id.clone());
        self.participant_index.insert(b, session.id.clone());
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    /// Return the active session containing `client_id`, if any.
    pub fn find_by_participant(&self, client_id: &ClientId) -> Option<&Session> {
        let session_id = self.participant_index.get(client_id)?;
        self.sessions.get(session_id)
    }

    pub fn get_mut(&mut self, session_id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(session_id)
    }

    /// Tear down a session, removing both participant mappings and discarding
    /// the message log. Idempotent: the removed session is returned only on
    /// the first call, subsequent calls return None.
    pub fn teardown(&mut self, session_id: &SessionId) -> Option<Session> {
        let mut session = self.sessions.remove(session_id)?;
        for participant in &session.participants {
            self.participant_index.remove(participant);
        }
        session.status = SessionStatus::TornDown;
        session.messages.clear();
        Some(session)
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_create_and_find_by_participant() {
        // テスト項目: 生成したセッションが両参加者から逆引きできる
        // given (前提条件):
        let mut table = SessionTable::new();

        // when (操作):
        let session = table
            .create(
                client("alice"),
                client("bob"),
                SessionMode::Chat,
                Timestamp::new(1000),
            )
            .unwrap();

        // then (期待する結果):
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.find_by_participant(&client("alice")).map(|s| &s.id),
            Some(&session.id)
        );
        assert_eq!(
            table.find_by_participant(&client("bob")).map(|s| &s.id),
            Some(&session.id)
        );
    }

    #[test]
    fn test_create_rejects_self_pairing() {
        // テスト項目: 自分自身とのセッション生成は拒否される
        // given (前提条件):
        let mut table = SessionTable::new();

        // when (操作):
        let result = table.create(
            client("alice"),
            client("alice"),
            SessionMode::Video,
            Timestamp::new(1000),
        );

        // then (期待する結果): テーブルは変化しない
        assert!(matches!(result, Err(DomainError::SelfPairing(_))));
        assert!(table.is_empty());
        assert!(table.find_by_participant(&client("alice")).is_none());
    }

    #[test]
    fn test_teardown_removes_both_mappings() {
        // テスト項目: teardown 後、どちらの参加者からも逆引きできない
        // given (前提条件):
        let mut table = SessionTable::new();
        let session = table
            .create(
                client("alice"),
                client("bob"),
                SessionMode::Chat,
                Timestamp::new(1000),
            )
            .unwrap();

        // when (操作):
        let removed = table.teardown(&session.id);

        // then (期待する結果):
        assert!(removed.is_some());
        let removed = removed.unwrap();
        assert_eq!(removed.status, SessionStatus::TornDown);
        assert!(removed.messages.is_empty());
        assert!(table.find_by_participant(&client("alice")).is_none());
        assert!(table.find_by_participant(&client("bob")).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_teardown_is_idempotent() {
        // テスト項目: 同じセッションの二重 teardown は no-op になる
        // given (前提条件):
        let mut table = SessionTable::new();
        let session = table
            .create(
                client("alice"),
                client("bob"),
                SessionMode::Video,
                Timestamp::new(1000),
            )
            .unwrap();
        table.teardown(&session.id);

        // when (操作): もう一度 teardown する
        let second = table.teardown(&session.id);

        // then (期待する結果):
        assert!(second.is_none());
    }
}
