//! InMemory PairingRepository 実装
//!
//! 待機プール・接続履歴・セッションテーブルを単一の Mutex の下に保持し、
//! trait の各メソッドを 1 回のロック取得で完結させることで、仕様の
//! 「単一の逐次タイムライン」を実現します。パートナー選択はロックを
//! 保持したまま同期的に完走するため、選択中の待機プールを他の join が
//! 書き換えることはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ClientId, HistoryTracker, JoinOutcome, LeaveOutcome, MessageContent,
    NextPartnerOutcome, PairingRepository, PairingStats, RepositoryError, SessionId, SessionMode,
    SessionTable, Timestamp, WaitingPool, matchmaking,
};

/// 単一権限が所有するマッチメイキング状態
#[derive(Debug, Default)]
struct PairingState {
    pool: WaitingPool,
    history: HistoryTracker,
    sessions: SessionTable,
}

/// インメモリ PairingRepository 実装
pub struct InMemoryPairingRepository {
    state: Arc<Mutex<PairingState>>,
}

impl InMemoryPairingRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PairingState::default())),
        }
    }

    /// join の本体。ロック取得済みの状態に対して同期的に実行される。
    fn join_locked(
        state: &mut PairingState,
        client_id: ClientId,
        mode: SessionMode,
        now: Timestamp,
    ) -> Result<JoinOutcome, RepositoryError> {
        if state.pool.contains(&client_id)
            || state.sessions.find_by_participant(&client_id).is_some()
        {
            return Err(RepositoryError::AlreadyActive(
                client_id.as_str().to_string(),
            ));
        }

        let candidates = state.pool.snapshot(mode, &client_id);
        let mut rng = rand::rng();
        let selected =
            matchmaking::select_partner(&client_id, &candidates, &state.history, &mut rng);

        match selected {
            Some(partner) => {
                // 選択された相手を待機プールから取り除いてからセッションを生成する
                state.pool.dequeue(&partner);
                let repeat = state.history.record_pairing(&client_id, &partner, now);
                let session = state
                    .sessions
                    .create(client_id, partner.clone(), mode, now)?;
                Ok(JoinOutcome::Matched {
                    session,
                    partner,
                    repeat,
                })
            }
            None => {
                state.pool.enqueue(client_id, mode, now);
                Ok(JoinOutcome::Waiting)
            }
        }
    }

    /// セッション終了の本体。冪等で、最初の呼び出しのみ相手を返す。
    fn teardown_locked(state: &mut PairingState, client_id: &ClientId) -> Option<(SessionId, ClientId)> {
        let session = state.sessions.find_by_participant(client_id)?;
        let session_id = session.id.clone();
        let peer = session.peer_of(client_id)?.clone();
        state.sessions.teardown(&session_id);
        Some((session_id, peer))
    }
}

impl Default for InMemoryPairingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PairingRepository for InMemoryPairingRepository {
    async fn join(
        &self,
        client_id: ClientId,
        mode: SessionMode,
        now: Timestamp,
    ) -> Result<JoinOutcome, RepositoryError> {
        let mut state = self.state.lock().await;
        Self::join_locked(&mut state, client_id, mode, now)
    }

    async fn leave(&self, client_id: &ClientId) -> Result<LeaveOutcome, RepositoryError> {
        let mut state = self.state.lock().await;
        let was_waiting = state.pool.dequeue(client_id).is_some();
        let ended_session = Self::teardown_locked(&mut state, client_id);
        Ok(LeaveOutcome {
            was_waiting,
            ended_session,
        })
    }

    async fn next_partner(
        &self,
        client_id: ClientId,
        now: Timestamp,
    ) -> Result<NextPartnerOutcome, RepositoryError> {
        let mut state = self.state.lock().await;

        // モードは呼び出し元の現在の状態から導出する。video にいなければ
        // 何も変更しない（chat セッションを巻き添えにしない）。
        let current_mode = state
            .sessions
            .find_by_participant(&client_id)
            .map(|s| s.mode)
            .or_else(|| state.pool.mode_of(&client_id));
        if current_mode != Some(SessionMode::Video) {
            return Ok(NextPartnerOutcome::Ignored);
        }

        // teardown と再投入を同一ロック内で行う。他の join から
        // 「セッション参加中かつ待機中」という中間状態は観測されない。
        state.pool.dequeue(&client_id);
        let departed = Self::teardown_locked(&mut state, &client_id).map(|(_, peer)| peer);
        let rejoin = Self::join_locked(&mut state, client_id, SessionMode::Video, now)?;
        Ok(NextPartnerOutcome::Rotated { departed, rejoin })
    }

    async fn append_chat_message(
        &self,
        sender: ClientId,
        content: MessageContent,
        now: Timestamp,
    ) -> Result<(ChatMessage, ClientId), RepositoryError> {
        let mut state = self.state.lock().await;

        let (session_id, peer) = {
            let session = state
                .sessions
                .find_by_participant(&sender)
                .ok_or_else(|| RepositoryError::NotInSession(sender.as_str().to_string()))?;
            let peer = session
                .peer_of(&sender)
                .ok_or_else(|| RepositoryError::NotInSession(sender.as_str().to_string()))?
                .clone();
            (session.id.clone(), peer)
        };

        let message = ChatMessage::new(sender, content, now);
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| RepositoryError::NotInSession(peer.as_str().to_string()))?;
        session.add_message(message.clone())?;

        Ok((message, peer))
    }

    async fn peer_of(&self, client_id: &ClientId) -> Option<(SessionId, ClientId)> {
        let state = self.state.lock().await;
        let session = state.sessions.find_by_participant(client_id)?;
        let peer = session.peer_of(client_id)?.clone();
        Some((session.id.clone(), peer))
    }

    async fn has_paired(&self, a: &ClientId, b: &ClientId) -> bool {
        let state = self.state.lock().await;
        state.history.has_paired(a, b)
    }

    async fn stats(&self) -> PairingStats {
        let state = self.state.lock().await;
        PairingStats {
            active_sessions: state.sessions.len(),
            waiting_chat: state.pool.count(SessionMode::Chat),
            waiting_video: state.pool.count(SessionMode::Video),
            total_pairings: state.history.total_pairings(),
        }
    }

    async fn prune_history(&self, now: Timestamp, retention_millis: i64) -> usize {
        let mut state = self.state.lock().await;
        state.history.prune(now, retention_millis)
    }
}
