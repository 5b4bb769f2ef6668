//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, JoinOutcome, SessionMode};
use crate::infrastructure::dto::websocket::ServerEvent;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for ServerEvent {
    fn from(message: &ChatMessage) -> Self {
        ServerEvent::NewMessage {
            id: message.id.clone(),
            text: message.content.as_str().to_string(),
            sender: message.from.as_str().to_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

/// Build the `partner_found` event for one side of a fresh match.
///
/// Partner-visibility rule: chat mode discloses the counterpart's identity,
/// video mode withholds it.
pub fn partner_found_event(outcome: &JoinOutcome, for_peer: bool) -> Option<ServerEvent> {
    match outcome {
        JoinOutcome::Matched {
            session,
            partner,
            repeat,
        } => {
            let counterpart = if for_peer {
                // 相手側から見たパートナーはリクエスタ自身
                session.participants.iter().find(|p| *p != partner)?
            } else {
                partner
            };
            let partner_id = match session.mode {
                SessionMode::Chat => Some(counterpart.as_str().to_string()),
                SessionMode::Video => None,
            };
            Some(ServerEvent::PartnerFound {
                room_id: session.id.as_str().to_string(),
                partner_id,
                is_repeat_connection: *repeat,
            })
        }
        JoinOutcome::Waiting => None,
    }
}
