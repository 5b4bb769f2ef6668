//! UseCase: 統計情報の取得（読み取り専用）

use std::sync::Arc;

use crate::domain::{MessagePusher, PairingRepository, PairingStats};

/// 統計情報のスナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// 接続中のクライアント数
    pub active_clients: usize,
    /// マッチメイキング状態の統計
    pub pairing: PairingStats,
}

/// 統計情報取得のユースケース
pub struct GetStatsUseCase {
    /// Repository（マッチメイキング状態の単一権限）
    repository: Arc<dyn PairingRepository>,
    /// MessagePusher（接続レジストリを兼ねる）
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetStatsUseCase {
    /// 新しい GetStatsUseCase を作成
    pub fn new(
        repository: Arc<dyn PairingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 現在の統計情報を取得
    pub async fn execute(&self) -> StatsSnapshot {
        StatsSnapshot {
            active_clients: self.message_pusher.connected_count().await,
            pairing: self.repository.stats().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, SessionMode, Timestamp};
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryPairingRepository,
    };

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_stats_reflect_state() {
        // テスト項目: 統計が接続数・セッション数・待機数を反映する
        // given (前提条件): alice と bob がペア、carol が待機
        let repository = Arc::new(InMemoryPairingRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        for id in ["alice", "bob", "carol"] {
            let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
            message_pusher.register_client(client(id), tx).await.unwrap();
        }
        repository
            .join(client("alice"), SessionMode::Chat, Timestamp::new(1000))
            .await
            .unwrap();
        repository
            .join(client("bob"), SessionMode::Chat, Timestamp::new(1001))
            .await
            .unwrap();
        repository
            .join(client("carol"), SessionMode::Video, Timestamp::new(1002))
            .await
            .unwrap();
        let usecase = GetStatsUseCase::new(repository, message_pusher);

        // when (操作):
        let snapshot = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(snapshot.active_clients, 3);
        assert_eq!(snapshot.pairing.active_sessions, 1);
        assert_eq!(snapshot.pairing.waiting_chat, 0);
        assert_eq!(snapshot.pairing.waiting_video, 1);
        assert_eq!(snapshot.pairing.total_pairings, 1);
    }
}
