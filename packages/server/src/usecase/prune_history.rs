//! UseCase: 接続履歴のリテンションスイープ
//!
//! マッチングとは独立した定期タスク（1 時間間隔）から呼ばれる。
//! マッチング処理にインラインで実行されることはない。

use std::sync::Arc;
use std::time::Duration;

use tsunagu_shared::time::get_jst_timestamp;

use crate::domain::{PairingRepository, Timestamp};

/// 接続履歴のリテンション期間（24 時間）
pub const HISTORY_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// スイープの実行間隔（1 時間）
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// 接続履歴スイープのユースケース
pub struct PruneHistoryUseCase {
    /// Repository（マッチメイキング状態の単一権限）
    repository: Arc<dyn PairingRepository>,
}

impl PruneHistoryUseCase {
    /// 新しい PruneHistoryUseCase を作成
    pub fn new(repository: Arc<dyn PairingRepository>) -> Self {
        Self { repository }
    }

    /// リテンション期間を超えた履歴を削除し、削除件数を返す
    pub async fn execute(&self) -> usize {
        let now = Timestamp::new(get_jst_timestamp());
        let removed = self
            .repository
            .prune_history(now, HISTORY_RETENTION.as_millis() as i64)
            .await;
        if removed > 0 {
            tracing::info!("Pruned {} stale history record(s)", removed);
        }
        removed
    }
}
