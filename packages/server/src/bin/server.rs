//! Anonymous two-party matchmaking server.
//!
//! Pairs connected clients into text chat or video signaling sessions and
//! relays payloads exclusively between the two paired parties.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsunagu-server
//! cargo run --bin tsunagu-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use tsunagu_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryPairingRepository,
    },
    ui::Server,
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetStatsUseCase, JoinPartnerUseCase,
        NextPartnerUseCase, PruneHistoryUseCase, RelaySignalUseCase,
    },
};
use tsunagu_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Anonymous two-party matchmaking server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (single authority over matchmaking state)
    let repository = Arc::new(InMemoryPairingRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(message_pusher.clone()));
    let join_partner_usecase = Arc::new(JoinPartnerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let next_partner_usecase = Arc::new(NextPartnerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_stats_usecase = Arc::new(GetStatsUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let prune_history_usecase = Arc::new(PruneHistoryUseCase::new(repository.clone()));

    // 4. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        join_partner_usecase,
        relay_signal_usecase,
        next_partner_usecase,
        disconnect_client_usecase,
        get_stats_usecase,
        prune_history_usecase,
    );

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
