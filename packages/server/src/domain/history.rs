//! 接続履歴トラッカー
//!
//! ユーザーごとに「過去に誰とペアになったか」「ペアリング回数」「最終ペアリング時刻」を
//! 記録する。マッチメイキングの新規性判定と負荷分散スコアに使用される。
//! 記録はペアリング成功時のみ変化し、リテンション期間（24 時間）を超えて
//! 非アクティブなユーザーの履歴は定期スイープで削除される。

use std::collections::{HashMap, HashSet};

use super::value_object::{ClientId, Timestamp};

/// ユーザー 1 人分の接続履歴
#[derive(Debug, Clone, Default)]
struct ConnectionHistory {
    /// 過去にペアになった相手の集合
    partners: HashSet<ClientId>,
    /// ペアリング回数（単調増加）
    pairing_count: u64,
    /// 最終ペアリング時刻
    last_paired_at: Option<Timestamp>,
}

/// 接続履歴トラッカー
#[derive(Debug, Default)]
pub struct HistoryTracker {
    records: HashMap<ClientId, ConnectionHistory>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Record a successful pairing between `a` and `b`.
    ///
    /// The record is symmetric: both partner sets and both counts are updated
    /// together. Returns true if the two had already paired before this call.
    pub fn record_pairing(&mut self, a: &ClientId, b: &ClientId, now: Timestamp) -> bool {
        let repeat = self.has_paired(a, b);

        let record_a = self.records.entry(a.clone()).or_default();
        record_a.partners.insert(b.clone());
        record_a.pairing_count += 1;
        record_a.last_paired_at = Some(now);

        let record_b = self.records.entry(b.clone()).or_default();
        record_b.partners.insert(a.clone());
        record_b.pairing_count += 1;
        record_b.last_paired_at = Some(now);

        repeat
    }

    /// Pure lookup: have these two clients ever been paired?
    pub fn has_paired(&self, a: &ClientId, b: &ClientId) -> bool {
        self.records
            .get(a)
            .map(|r| r.partners.contains(b))
            .unwrap_or(false)
    }

    /// Total pairings for a client. Unknown ids count as 0.
    pub fn pairing_count(&self, client_id: &ClientId) -> u64 {
        self.records
            .get(client_id)
            .map(|r| r.pairing_count)
            .unwrap_or(0)
    }

    /// Delete history for every client whose last pairing is older than the
    /// retention window. Returns the number of records removed.
    pub fn prune(&mut self, now: Timestamp, retention_millis: i64) -> usize {
        let cutoff = now.value() - retention_millis;
        let before = self.records.len();
        self.records.retain(|_, record| {
            record
                .last_paired_at
                .map(|t| t.value() >= cutoff)
                .unwrap_or(false)
        });
        before - self.records.len()
    }

    /// Sum of pairing counts over all tracked clients. Each pairing is
    /// counted once per participant, so the number of distinct pairings is
    /// half of this.
    pub fn total_pairings(&self) -> u64 {
        self.records.values().map(|r| r.pairing_count).sum::<u64>() / 2
    }
}
