//! UseCase layer: one struct per inbound operation.
//!
//! UseCases depend on the domain traits (`PairingRepository`, `MessagePusher`)
//! and never on concrete infrastructure.

pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod get_stats;
pub mod join_partner;
pub mod next_partner;
pub mod prune_history;
pub mod relay_signal;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, JoinError, RelayError};
pub use get_stats::{GetStatsUseCase, StatsSnapshot};
pub use join_partner::JoinPartnerUseCase;
pub use next_partner::NextPartnerUseCase;
pub use prune_history::PruneHistoryUseCase;
pub use relay_signal::RelaySignalUseCase;
