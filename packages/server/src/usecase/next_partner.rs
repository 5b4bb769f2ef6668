//! UseCase: 次のパートナーへの乗り換え処理（video モード）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - NextPartnerUseCase::execute() メソッド
//! - 現在のセッションの teardown と待機プールへの再投入が
//!   単一の論理操作として行われること
//! - video モードにいないクライアントからの呼び出しが no-op として
//!   吸収されること
//!
//! ### なぜこのテストが必要か
//! - 「セッション参加中」と「待機中」が同時に観測されない不変条件の保証
//! - 旧パートナーへの通知対象が正しく解決されることの確認
//! - chat セッションが乗り換え操作の巻き添えで終了しないことの保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：乗り換え後に待機、または別の待機者と即マッチ
//! - エッジケース：chat セッション中 / セッション外のクライアントの next_partner

use std::sync::Arc;

use tsunagu_shared::time::get_jst_timestamp;

use crate::domain::{ClientId, MessagePusher, NextPartnerOutcome, PairingRepository, Timestamp};

use super::error::JoinError;

/// 次のパートナーへの乗り換えユースケース
pub struct NextPartnerUseCase {
    /// Repository（マッチメイキング状態の単一権限）
    repository: Arc<dyn PairingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl NextPartnerUseCase {
    /// 新しい NextPartnerUseCase を作成
    pub fn new(
        repository: Arc<dyn PairingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 乗り換えを実行
    ///
    /// 現在の video セッションを終了し、同一のアトミック操作内で再マッチを試みる。
    /// モードは呼び出し元の現在の状態から導出され、video モードにいない
    /// クライアントからの呼び出しは `Ignored` として吸収される。
    ///
    /// # Returns
    ///
    /// * `Ok(NextPartnerOutcome)` - 乗り換え結果（通知すべき旧パートナーを含む）
    /// * `Err(JoinError)` - 乗り換え失敗
    pub async fn execute(&self, client_id: ClientId) -> Result<NextPartnerOutcome, JoinError> {
        let now = Timestamp::new(get_jst_timestamp());
        let outcome = self.repository.next_partner(client_id, now).await?;
        Ok(outcome)
    }

    /// 特定のクライアントにイベントを送信（best-effort、失敗はログのみ）
    pub async fn push_to_client(&self, target: &ClientId, message: &str) {
        if let Err(e) = self.message_pusher.push_to(target, message).await {
            tracing::warn!("Failed to push to '{}': {}", target, e);
        }
    }
}
