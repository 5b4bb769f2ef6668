//! Domain layer: value objects, entities, and the pure matchmaking logic.
//!
//! Everything in this module is side-effect free. The traits at the bottom
//! (`PairingRepository`, `MessagePusher`) are the seams implemented by the
//! Infrastructure layer.

pub mod entity;
pub mod error;
pub mod history;
pub mod matchmaking;
pub mod pusher;
pub mod repository;
pub mod session_table;
pub mod value_object;
pub mod waiting_pool;

pub use entity::{ChatMessage, Session, SessionStatus, WaitingEntry};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use history::HistoryTracker;
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{
    JoinOutcome, LeaveOutcome, NextPartnerOutcome, PairingRepository, PairingStats,
};
pub use session_table::SessionTable;
pub use value_object::{ClientId, MessageContent, SessionId, SessionIdFactory, SessionMode, Timestamp};
pub use waiting_pool::WaitingPool;
