//! Shared utilities for the Tsunagu matchmaking server.
//!
//! This crate holds the pieces that are independent of the server's domain:
//! logging setup and time utilities.

pub mod logger;
pub mod time;
