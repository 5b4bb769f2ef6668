//! UseCase: パートナー探索（join）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinPartnerUseCase::execute() メソッド
//! - パートナー探索（マッチ成立 / 待機投入）と二重 join の拒否
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：「待機中」と「セッション参加中」が同時に
//!   成立しないことを join の入口で保証する
//! - マッチ成立時に両者が待機プールから消えることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目は待機、2 人目でマッチ成立
//! - 異常系：既にアクティブなクライアントの join 試行

use std::sync::Arc;

use tsunagu_shared::time::get_jst_timestamp;

use crate::domain::{
    ClientId, JoinOutcome, MessagePusher, PairingRepository, SessionMode, Timestamp,
};

use super::error::JoinError;

/// パートナー探索のユースケース
pub struct JoinPartnerUseCase {
    /// Repository（マッチメイキング状態の単一権限）
    repository: Arc<dyn PairingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinPartnerUseCase {
    /// 新しい JoinPartnerUseCase を作成
    pub fn new(
        repository: Arc<dyn PairingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// パートナー探索を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 探索するクライアントの ID（Domain Model）
    /// * `mode` - 希望するセッション種別
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - マッチ成立または待機投入
    /// * `Err(JoinError)` - join 失敗（既にアクティブなど）
    pub async fn execute(
        &self,
        client_id: ClientId,
        mode: SessionMode,
    ) -> Result<JoinOutcome, JoinError> {
        let now = Timestamp::new(get_jst_timestamp());
        let outcome = self.repository.join(client_id, mode, now).await?;
        Ok(outcome)
    }

    /// 特定のクライアントにイベントを送信（best-effort）
    pub async fn push_to_client(&self, target: &ClientId, message: &str) -> Result<(), String> {
        self.message_pusher
            .push_to(target, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 接続中の全クライアントにイベントをブロードキャスト
    pub async fn broadcast_to_all(&self, message: &str) -> Result<(), String> {
        let targets = self.message_pusher.connected_clients().await;
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 接続中のクライアント数を取得（user_count_update 用）
    pub async fn connected_count(&self) -> usize {
        self.message_pusher.connected_count().await
    }
}
