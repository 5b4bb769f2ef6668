//! パートナー待機プール
//!
//! パートナーを探しているクライアントの集合。セッション種別（chat / video）ごとに
//! 区切って参照できる。クライアントは高々1つのエントリしか持てない。

use std::collections::HashMap;

use super::entity::WaitingEntry;
use super::value_object::{ClientId, SessionMode, Timestamp};

/// パートナー待機プール
///
/// 内部は client_id をキーとした単一のマップ。snapshot 時にモードで絞り込む。
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: HashMap<ClientId, WaitingEntry>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Enqueue a client seeking a partner.
    ///
    /// Returns false if the client already has an entry (the caller boundary
    /// is expected to have rejected such a join before reaching here).
    pub fn enqueue(&mut self, client_id: ClientId, mode: SessionMode, now: Timestamp) -> bool {
        if self.entries.contains_key(&client_id) {
            return false;
        }
        let entry = WaitingEntry::new(client_id.clone(), mode, now);
        self.entries.insert(client_id, entry);
        true
    }

    /// Remove a client's entry if present. Absent entries are not an error.
    pub fn dequeue(&mut self, client_id: &ClientId) -> Option<WaitingEntry> {
        self.entries.remove(client_id)
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.entries.contains_key(client_id)
    }

    /// Mode the client is waiting under, if present.
    pub fn mode_of(&self, client_id: &ClientId) -> Option<SessionMode> {
        self.entries.get(client_id).map(|e| e.mode)
    }

    /// Snapshot of current waiting entries for a mode, excluding the requester.
    pub fn snapshot(&self, mode: SessionMode, exclude: &ClientId) -> Vec<WaitingEntry> {
        self.entries
            .values()
            .filter(|e| e.mode == mode && &e.client_id != exclude)
            .cloned()
            .collect()
    }

    /// Number of waiting clients for a mode.
    pub fn count(&self, mode: SessionMode) -> usize {
        self.entries.values().filter(|e| e.mode == mode).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
