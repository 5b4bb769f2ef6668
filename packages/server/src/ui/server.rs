//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetStatsUseCase, JoinPartnerUseCase,
    NextPartnerUseCase, PruneHistoryUseCase, RelaySignalUseCase,
    prune_history::SWEEP_INTERVAL,
};

use super::{
    handler::{get_stats, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket matchmaking server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     join_partner_usecase,
///     relay_signal_usecase,
///     next_partner_usecase,
///     disconnect_client_usecase,
///     get_stats_usecase,
///     prune_history_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// JoinPartnerUseCase（パートナー探索のユースケース）
    join_partner_usecase: Arc<JoinPartnerUseCase>,
    /// RelaySignalUseCase（メッセージ・シグナル転送のユースケース）
    relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// NextPartnerUseCase（パートナー乗り換えのユースケース）
    next_partner_usecase: Arc<NextPartnerUseCase>,
    /// DisconnectClientUseCase（クライアント切断・離脱のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetStatsUseCase（統計情報取得のユースケース）
    get_stats_usecase: Arc<GetStatsUseCase>,
    /// PruneHistoryUseCase（接続履歴の定期削除のユースケース）
    prune_history_usecase: Arc<PruneHistoryUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        join_partner_usecase: Arc<JoinPartnerUseCase>,
        relay_signal_usecase: Arc<RelaySignalUseCase>,
        next_partner_usecase: Arc<NextPartnerUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        get_stats_usecase: Arc<GetStatsUseCase>,
        prune_history_usecase: Arc<PruneHistoryUseCase>,
    ) -> Self {
        Self {
            connect_client_usecase,
            join_partner_usecase,
            relay_signal_usecase,
            next_partner_usecase,
            disconnect_client_usecase,
            get_stats_usecase,
            prune_history_usecase,
        }
    }

    /// Run the WebSocket matchmaking server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            join_partner_usecase: self.join_partner_usecase,
            relay_signal_usecase: self.relay_signal_usecase,
            next_partner_usecase: self.next_partner_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            get_stats_usecase: self.get_stats_usecase,
        });

        // Spawn the periodic history sweep
        let prune_usecase = self.prune_history_usecase;
        let sweep_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            // 起動直後の tick はスキップ
            interval.tick().await;
            loop {
                interval.tick().await;
                prune_usecase.execute().await;
            }
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/stats", get(get_stats))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket matchmaking server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        sweep_task.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
