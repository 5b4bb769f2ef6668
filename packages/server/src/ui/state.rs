//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetStatsUseCase, JoinPartnerUseCase,
    NextPartnerUseCase, RelaySignalUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// JoinPartnerUseCase（パートナー探索のユースケース）
    pub join_partner_usecase: Arc<JoinPartnerUseCase>,
    /// RelaySignalUseCase（メッセージ・シグナル転送のユースケース）
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// NextPartnerUseCase（パートナー乗り換えのユースケース）
    pub next_partner_usecase: Arc<NextPartnerUseCase>,
    /// DisconnectClientUseCase（クライアント切断・離脱のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetStatsUseCase（統計情報取得のユースケース）
    pub get_stats_usecase: Arc<GetStatsUseCase>,
}
