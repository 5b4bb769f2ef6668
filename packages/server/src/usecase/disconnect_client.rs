//! UseCase: クライアント切断・離脱処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 切断時のクリーンアップ（レジストリ削除、待機エントリ削除、セッション終了）
//!
//! ### なぜこのテストが必要か
//! - transport が leave イベントと disconnect イベントの両方を発火しうるため、
//!   冗長な呼び出しに対して安全（冪等）であることを保証する必要がある
//! - セッション相手への partner_disconnected 通知がちょうど 1 回であることの確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：セッション参加中クライアントの切断
//! - 正常系：待機中クライアントの切断
//! - エッジケース：同一クライアントの二重切断

use std::sync::Arc;

use crate::domain::{ClientId, LeaveOutcome, MessagePusher, PairingRepository, RepositoryError};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（マッチメイキング状態の単一権限）
    repository: Arc<dyn PairingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn PairingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// クライアント切断を実行（冪等）
    ///
    /// レジストリからの削除、待機エントリの削除、セッションの teardown を行う。
    /// 2 回目以降の呼び出しは no-op の LeaveOutcome を返す。
    ///
    /// # Returns
    ///
    /// * `Ok(LeaveOutcome)` - 削除された状態の内訳（通知対象の相手を含む）
    pub async fn execute(&self, client_id: &ClientId) -> Result<LeaveOutcome, RepositoryError> {
        let outcome = self.repository.leave(client_id).await?;
        self.message_pusher.unregister_client(client_id).await;
        Ok(outcome)
    }

    /// セッション・待機エントリのみ離脱（レジストリ登録は維持）
    ///
    /// leave_room / leave_video イベント用。ソケットは開いたままなので、
    /// クライアントは続けて join を送り直せる。
    pub async fn leave_session(&self, client_id: &ClientId) -> Result<LeaveOutcome, RepositoryError> {
        self.repository.leave(client_id).await
    }

    /// セッション相手にイベントを送信（best-effort、失敗はログのみ）
    pub async fn notify_peer(&self, peer: &ClientId, message: &str) {
        if let Err(e) = self.message_pusher.push_to(peer, message).await {
            tracing::warn!("Failed to notify peer '{}': {}", peer, e);
        }
    }

    /// 接続中の全クライアントにイベントをブロードキャスト（user_count_update 用）
    pub async fn broadcast_to_all(&self, message: &str) -> Result<(), String> {
        let targets = self.message_pusher.connected_clients().await;
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 接続中のクライアント数を取得
    pub async fn connected_count(&self) -> usize {
        self.message_pusher.connected_count().await
    }
}
