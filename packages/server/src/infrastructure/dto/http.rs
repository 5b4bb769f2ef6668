//! HTTP API レスポンス DTO

use serde::Serialize;

/// `/api/stats` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    /// 接続中のクライアント数
    pub active_clients: usize,
    /// アクティブなセッション数
    pub active_sessions: usize,
    /// chat モードで待機中のクライアント数
    pub waiting_chat: usize,
    /// video モードで待機中のクライアント数
    pub waiting_video: usize,
    /// 累計ペアリング数
    pub total_pairings: u64,
}
