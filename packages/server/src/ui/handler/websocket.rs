//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, JoinOutcome, MessageContent, NextPartnerOutcome, SessionMode},
    infrastructure::dto::{
        conversion::partner_found_event,
        websocket::{ClientEvent, ServerEvent},
    },
    ui::state::AppState,
    usecase::{JoinError, RelayError},
};

use serde::Deserialize;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub client_id: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let client_id_str = query.client_id;

    // Convert String -> ClientId (Domain Model)
    let client_id = match ClientId::try_from(client_id_str.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid client_id format: '{}'", client_id_str);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Use ConnectClientUseCase to handle connection
    // (register_client is called inside the UseCase)
    let client_id_for_handle = client_id.clone();
    match state.connect_client_usecase.execute(client_id, tx).await {
        Ok(()) => {
            tracing::info!("Client '{}' connected and registered", client_id_str);
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client_id_for_handle, rx)))
        }
        Err(crate::usecase::ConnectError::DuplicateClientId(_)) => {
            tracing::warn!(
                "Client with ID '{}' is already connected. Rejecting connection.",
                client_id_str
            );
            Err(StatusCode::CONFLICT)
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events addressed to this client
/// (via rx channel) are sent to its WebSocket connection.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events addressed to this client
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the event to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Pushes `partner_found` to both sides of a fresh match and `waiting_for_partner`
/// to the requester when no partner was available.
async fn announce_outcome(state: &Arc<AppState>, client_id: &ClientId, outcome: &JoinOutcome) {
    match outcome {
        JoinOutcome::Waiting => {
            let waiting_json = ServerEvent::WaitingForPartner.to_json();
            if let Err(e) = state
                .join_partner_usecase
                .push_to_client(client_id, &waiting_json)
                .await
            {
                tracing::warn!("Failed to push waiting_for_partner to '{}': {}", client_id, e);
            }
        }
        JoinOutcome::Matched { partner, .. } => {
            // リクエスタ側
            if let Some(event) = partner_found_event(outcome, false) {
                if let Err(e) = state
                    .join_partner_usecase
                    .push_to_client(client_id, &event.to_json())
                    .await
                {
                    tracing::warn!("Failed to push partner_found to '{}': {}", client_id, e);
                }
            }
            // 相手側
            if let Some(event) = partner_found_event(outcome, true) {
                if let Err(e) = state
                    .join_partner_usecase
                    .push_to_client(partner, &event.to_json())
                    .await
                {
                    tracing::warn!("Failed to push partner_found to '{}': {}", partner, e);
                }
            }
        }
    }
}

/// Broadcasts the current connected-client count to everyone.
async fn broadcast_user_count(state: &Arc<AppState>) {
    let count = state.connect_client_usecase.connected_count().await;
    let json = ServerEvent::UserCountUpdate { count }.to_json();
    if let Err(e) = state.connect_client_usecase.broadcast_to_all(&json).await {
        tracing::warn!("Failed to broadcast user_count_update: {}", e);
    }
}

/// Dispatches a single parsed client event.
async fn dispatch_event(state: &Arc<AppState>, client_id: &ClientId, event: ClientEvent) {
    match event {
        ClientEvent::Join { user_id, mode, .. } => {
            // 接続時に確定した ID が正。ペイロードの userId は照合のみ。
            if user_id != client_id.as_str() {
                tracing::debug!(
                    "join userId '{}' differs from connection id '{}'",
                    user_id,
                    client_id
                );
            }
            handle_join(state, client_id, mode).await;
        }
        ClientEvent::JoinVideoQueue { user_id, .. } => {
            if user_id != client_id.as_str() {
                tracing::debug!(
                    "join_video_queue userId '{}' differs from connection id '{}'",
                    user_id,
                    client_id
                );
            }
            handle_join(state, client_id, SessionMode::Video).await;
        }
        ClientEvent::SendMessage { message, .. } => {
            let content = match MessageContent::try_from(message) {
                Ok(content) => content,
                Err(_) => {
                    tracing::warn!("Invalid message content from '{}'", client_id);
                    return;
                }
            };
            match state
                .relay_signal_usecase
                .execute_chat(client_id.clone(), content)
                .await
            {
                Ok((chat_message, peer)) => {
                    let event = ServerEvent::from(&chat_message);
                    state
                        .relay_signal_usecase
                        .push_to_peer(&peer, &event.to_json())
                        .await;
                }
                Err(RelayError::NotInSession(_)) => {
                    // セッション外からのメッセージは破棄（best-effort リレー）
                    tracing::debug!("Dropping chat message from '{}': no session", client_id);
                }
                Err(e) => {
                    tracing::warn!("Failed to relay chat message from '{}': {}", client_id, e);
                }
            }
        }
        ClientEvent::Typing { is_typing, .. } => {
            let json = ServerEvent::UserTyping { is_typing }.to_json();
            state
                .relay_signal_usecase
                .relay_transient(client_id, &json)
                .await;
        }
        ClientEvent::Offer { payload, .. } => {
            let json = ServerEvent::Offer { payload }.to_json();
            state
                .relay_signal_usecase
                .relay_transient(client_id, &json)
                .await;
        }
        ClientEvent::Answer { payload, .. } => {
            let json = ServerEvent::Answer { payload }.to_json();
            state
                .relay_signal_usecase
                .relay_transient(client_id, &json)
                .await;
        }
        ClientEvent::IceCandidate { payload, .. } => {
            let json = ServerEvent::IceCandidate { payload }.to_json();
            state
                .relay_signal_usecase
                .relay_transient(client_id, &json)
                .await;
        }
        ClientEvent::NextPartner => {
            match state.next_partner_usecase.execute(client_id.clone()).await {
                Ok(NextPartnerOutcome::Rotated { departed, rejoin }) => {
                    if let Some(old_partner) = departed {
                        let json = ServerEvent::PartnerDisconnected.to_json();
                        state
                            .next_partner_usecase
                            .push_to_client(&old_partner, &json)
                            .await;
                    }
                    announce_outcome(state, client_id, &rejoin).await;
                }
                Ok(NextPartnerOutcome::Ignored) => {
                    tracing::debug!("next_partner from '{}' outside video, ignored", client_id);
                }
                Err(e) => {
                    tracing::warn!("next_partner failed for '{}': {}", client_id, e);
                }
            }
        }
        ClientEvent::LeaveRoom { .. } | ClientEvent::LeaveVideo { .. } => {
            match state.disconnect_client_usecase.leave_session(client_id).await {
                Ok(outcome) => {
                    if let Some((_, peer)) = outcome.ended_session {
                        let json = ServerEvent::PartnerDisconnected.to_json();
                        state
                            .disconnect_client_usecase
                            .notify_peer(&peer, &json)
                            .await;
                    }
                }
                Err(e) => {
                    tracing::warn!("leave failed for '{}': {}", client_id, e);
                }
            }
        }
    }
}

/// Handles `join` / `join_video_queue`: runs matchmaking and announces the outcome.
async fn handle_join(state: &Arc<AppState>, client_id: &ClientId, mode: SessionMode) {
    match state
        .join_partner_usecase
        .execute(client_id.clone(), mode)
        .await
    {
        Ok(outcome) => {
            announce_outcome(state, client_id, &outcome).await;
        }
        Err(JoinError::AlreadyActive(_)) => {
            // 既に待機中またはセッション中の join は無視
            tracing::warn!("Ignoring join from already-active client '{}'", client_id);
        }
        Err(e) => {
            tracing::warn!("join failed for '{}': {}", client_id, e);
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: ClientId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    // Spawn a task to forward events from other clients to this client
    let mut send_task = pusher_loop(rx, sender);

    // Announce the new connection count to everyone (including this client)
    broadcast_user_count(&state).await;

    let client_id_for_recv = client_id.clone();
    let state_for_recv = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // Parse the incoming event; malformed payloads are rejected here
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed event from '{}': {}",
                                client_id_for_recv,
                                e
                            );
                            continue;
                        }
                    };

                    dispatch_event(&state_for_recv, &client_id_for_recv, event).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_for_recv);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Use DisconnectClientUseCase to handle disconnection
    match state.disconnect_client_usecase.execute(&client_id).await {
        Ok(outcome) => {
            tracing::info!("Client '{}' disconnected and removed from registry", client_id);

            // Notify the abandoned partner, if any
            if let Some((_, peer)) = outcome.ended_session {
                let json = ServerEvent::PartnerDisconnected.to_json();
                state
                    .disconnect_client_usecase
                    .notify_peer(&peer, &json)
                    .await;
            }
        }
        Err(e) => {
            tracing::warn!("Failed to disconnect client '{}': {}", client_id, e);
        }
    }

    // Announce the updated connection count to the remaining clients
    broadcast_user_count(&state).await;
}
