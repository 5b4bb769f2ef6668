//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::StatsDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get current matchmaking statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    let snapshot = state.get_stats_usecase.execute().await;

    // Domain Model から DTO への変換
    let stats = StatsDto {
        active_clients: snapshot.active_clients,
        active_sessions: snapshot.pairing.active_sessions,
        waiting_chat: snapshot.pairing.waiting_chat,
        waiting_video: snapshot.pairing.waiting_video,
        total_pairings: snapshot.pairing.total_pairings,
    };

    Json(stats)
}
