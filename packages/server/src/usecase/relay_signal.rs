//! UseCase: シグナル転送処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelaySignalUseCase::execute_chat() / relay_transient() メソッド
//! - セッション相手への転送（送信者へのエコーなし、第三者への送信なし）
//!
//! ### なぜこのテストが必要か
//! - リレーの核心不変条件：ペイロードはセッションの相手「のみ」に届く
//! - chat テキストはログに記録され、typing / シグナリングは記録されない
//! - セッション外の送信者は silent no-op になる（best-effort リレー）
//!
//! ### どのような状況を想定しているか
//! - 正常系：chat メッセージの転送とログ追加
//! - 正常系：typing / offer / answer / ice_candidate の一時転送
//! - エッジケース：セッション外の送信者

use std::sync::Arc;

use tsunagu_shared::time::get_jst_timestamp;

use crate::domain::{
    ChatMessage, ClientId, MessageContent, MessagePusher, PairingRepository, Timestamp,
};

use super::error::RelayError;

/// シグナル転送のユースケース
pub struct RelaySignalUseCase {
    /// Repository（マッチメイキング状態の単一権限）
    repository: Arc<dyn PairingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    /// 新しい RelaySignalUseCase を作成
    pub fn new(
        repository: Arc<dyn PairingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// チャットメッセージをセッションログに追加し、転送先を解決する
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者のクライアント ID（Domain Model）
    /// * `content` - メッセージ内容（Domain Model、入口でバリデーション済み）
    ///
    /// # Returns
    ///
    /// * `Ok((ChatMessage, ClientId))` - 記録されたメッセージと転送先の相手
    /// * `Err(RelayError)` - 送信者がセッション外、またはログ満杯
    pub async fn execute_chat(
        &self,
        sender: ClientId,
        content: MessageContent,
    ) -> Result<(ChatMessage, ClientId), RelayError> {
        let now = Timestamp::new(get_jst_timestamp());
        let (message, peer) = self
            .repository
            .append_chat_message(sender, content, now)
            .await?;
        Ok((message, peer))
    }

    /// 一時的なシグナル（typing / offer / answer / ice_candidate）を相手に転送する
    ///
    /// ログへの記録は行わない。送信者がセッション外の場合は silent no-op。
    ///
    /// # Returns
    ///
    /// 転送が行われた場合は転送先の ClientId、no-op の場合は None
    pub async fn relay_transient(&self, sender: &ClientId, message: &str) -> Option<ClientId> {
        let (_, peer) = match self.repository.peer_of(sender).await {
            Some(found) => found,
            None => {
                tracing::debug!(
                    "Dropping transient signal from '{}': no active session",
                    sender
                );
                return None;
            }
        };

        if let Err(e) = self.message_pusher.push_to(&peer, message).await {
            tracing::warn!("Failed to relay signal to '{}': {}", peer, e);
        }
        Some(peer)
    }

    /// 転送先にイベントを送信（best-effort、失敗はログのみ）
    pub async fn push_to_peer(&self, peer: &ClientId, message: &str) {
        if let Err(e) = self.message_pusher.push_to(peer, message).await {
            tracing::warn!("Failed to push relayed message to '{}': {}", peer, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessagePushError, PusherChannel, SessionMode};
    use crate::infrastructure::repository::InMemoryPairingRepository;
    use tokio::sync::Mutex;

    // Mock MessagePusher: push_to の呼び出し先を記録する
    struct RecordingMessagePusher {
        pushed: Mutex<Vec<(ClientId, String)>>,
    }

    impl RecordingMessagePusher {
        fn new() -> Self {
            Self {
                pushed: Mutex::new(Vec::new()),
            }
        }

        async fn pushed_targets(&self) -> Vec<ClientId> {
            self.pushed.lock().await.iter().map(|(id, _)| id.clone()).collect()
        }
    }

    #[async_trait::async_trait]
    impl MessagePusher for RecordingMessagePusher {
        async fn register_client(
            &self,
            _client_id: ClientId,
            _sender: PusherChannel,
        ) -> Result<(), MessagePushError> {
            Ok(())
        }

        async fn unregister_client(&self, _client_id: &ClientId) {}

        async fn push_to(
            &self,
            client_id: &ClientId,
            content: &str,
        ) -> Result<(), MessagePushError> {
            self.pushed
                .lock()
                .await
                .push((client_id.clone(), content.to_string()));
            Ok(())
        }

        async fn broadcast(
            &self,
            _targets: Vec<ClientId>,
            _content: &str,
        ) -> Result<(), MessagePushError> {
            Ok(())
        }

        async fn connected_clients(&self) -> Vec<ClientId> {
            Vec::new()
        }

        async fn connected_count(&self) -> usize {
            0
        }
    }

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    async fn paired_repository() -> Arc<InMemoryPairingRepository> {
        let repository = Arc::new(InMemoryPairingRepository::new());
        repository
            .join(client("alice"), SessionMode::Chat, Timestamp::new(1000))
            .await
            .unwrap();
        repository
            .join(client("bob"), SessionMode::Chat, Timestamp::new(1001))
            .await
            .unwrap();
        repository
    }

    #[tokio::test]
    async fn test_execute_chat_resolves_peer_without_echo() {
        // テスト項目: chat メッセージの転送先が相手のみで、送信者に返らない
        // given (前提条件): alice と bob がペア
        let repository = paired_repository().await;
        let pusher = Arc::new(RecordingMessagePusher::new());
        let usecase = RelaySignalUseCase::new(repository, pusher.clone());

        // when (操作): alice がメッセージを送信
        let content = MessageContent::new("hi".to_string()).unwrap();
        let (message, peer) = usecase.execute_chat(client("alice"), content).await.unwrap();
        usecase.push_to_peer(&peer, "json").await;

        // then (期待する結果): bob のみに届く
        assert_eq!(peer, client("bob"));
        assert_eq!(message.from, client("alice"));
        let targets = pusher.pushed_targets().await;
        assert_eq!(targets, vec![client("bob")]);
    }

    #[tokio::test]
    async fn test_execute_chat_without_session_is_error() {
        // テスト項目: セッション外の送信者は NotInSession になる
        // given (前提条件):
        let repository = Arc::new(InMemoryPairingRepository::new());
        let pusher = Arc::new(RecordingMessagePusher::new());
        let usecase = RelaySignalUseCase::new(repository, pusher);

        // when (操作):
        let content = MessageContent::new("hi".to_string()).unwrap();
        let result = usecase.execute_chat(client("ghost"), content).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RelayError::NotInSession(_))));
    }

    #[tokio::test]
    async fn test_relay_transient_forwards_to_peer_only() {
        // テスト項目: 一時シグナルがセッションの相手のみに転送される
        // given (前提条件): alice と bob がペア
        let repository = paired_repository().await;
        let pusher = Arc::new(RecordingMessagePusher::new());
        let usecase = RelaySignalUseCase::new(repository, pusher.clone());

        // when (操作):
        let relayed = usecase
            .relay_transient(&client("alice"), r#"{"type":"user_typing","isTyping":true}"#)
            .await;

        // then (期待する結果):
        assert_eq!(relayed, Some(client("bob")));
        assert_eq!(pusher.pushed_targets().await, vec![client("bob")]);
    }

    #[tokio::test]
    async fn test_relay_transient_without_session_is_silent_noop() {
        // テスト項目: セッション外の送信者の一時シグナルは silent no-op になる
        // given (前提条件):
        let repository = Arc::new(InMemoryPairingRepository::new());
        let pusher = Arc::new(RecordingMessagePusher::new());
        let usecase = RelaySignalUseCase::new(repository, pusher.clone());

        // when (操作):
        let relayed = usecase
            .relay_transient(&client("ghost"), r#"{"type":"offer","payload":{}}"#)
            .await;

        // then (期待する結果): 誰にも届かない
        assert!(relayed.is_none());
        assert!(pusher.pushed_targets().await.is_empty());
    }
}
