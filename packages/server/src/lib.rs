//! Anonymous two-party matchmaking server library.
//!
//! This library pairs concurrently connected clients into two-party sessions
//! for text chat or audio/video signaling relay, then routes payloads
//! exclusively between the two paired parties until either leaves.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
