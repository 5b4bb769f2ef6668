//! マッチメイキングの選択アルゴリズム
//!
//! リクエスタと同じモードで待機している候補の中から、ペアになる相手を選ぶ。
//!
//! 1. 候補を「未ペア（novel）」と「過去にペア済み（repeat）」に分割する
//! 2. novel が存在すればそちらを優先し、なければ全候補（repeat 許容）に
//!    フォールバックする
//! 3. 選ばれた側の中で、各候補に `pairing_count + jitter[0, 0.5)` のスコアを
//!    つけ、最小スコアの候補を選ぶ
//!
//! ハードな novel 優先フィルタが新規性を既に符号化しているため、スコアには
//! novelty ボーナスを重ねない。スコアは選択済みパーティション内での
//! 負荷公平性のみを担う。同点はジッター項が実質ランダムに解消する。
//!
//! この選択は同期的に完走する純関数であり、選択の途中で他の join が
//! WaitingPool の中間状態を観測することはない。

use rand::Rng;

use super::entity::WaitingEntry;
use super::history::HistoryTracker;
use super::value_object::ClientId;

/// Select the best available partner for `requester` among `candidates`.
///
/// `candidates` must already exclude the requester (WaitingPool::snapshot
/// does this). Returns None when no candidate is available.
pub fn select_partner<R: Rng>(
    requester: &ClientId,
    candidates: &[WaitingEntry],
    history: &HistoryTracker,
    rng: &mut R,
) -> Option<ClientId> {
    if candidates.is_empty() {
        return None;
    }

    let novel: Vec<&WaitingEntry> = candidates
        .iter()
        .filter(|c| !history.has_paired(requester, &c.client_id))
        .collect();

    // Prefer the novel partition; fall back to the full set (repeats allowed).
    let chosen: Vec<&WaitingEntry> = if novel.is_empty() {
        candidates.iter().collect()
    } else {
        novel
    };

    chosen
        .into_iter()
        .map(|c| {
            let jitter: f64 = rng.random_range(0.0..0.5);
            let score = history.pairing_count(&c.client_id) as f64 + jitter;
            (c, score)
        })
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).expect("score is never NaN"))
        .map(|(c, _)| c.client_id.clone())
}
