//! Repository 実装
//!
//! - `inmemory`: プロセス内メモリ実装。状態は本質的に一時的であり、
//!   再起動で全て失われることは仕様上許容される。

pub mod inmemory;

pub use inmemory::InMemoryPairingRepository;
