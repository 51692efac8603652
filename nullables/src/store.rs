//! Nullable stores: thread-safe in-memory storage for testing.

use chanvote_store::{
    ConfigStore, OutboxLedger, SentMessage, StoreError, VoteLedger, VoteRecord,
};
use chanvote_types::Address;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// An in-memory configuration store that counts flushes and can be told to
/// fail the next one.
#[derive(Default)]
pub struct NullConfigStore {
    sections: BTreeMap<String, BTreeMap<String, String>>,
    flushes: AtomicUsize,
    fail_next_flush: AtomicBool,
}

impl NullConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful flushes so far.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Make the next `flush` return a backend error.
    pub fn fail_next_flush(&self) {
        self.fail_next_flush.store(true, Ordering::SeqCst);
    }
}

impl ConfigStore for NullConfigStore {
    fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn sections(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn section_entries(&self, section: &str) -> Vec<(String, String)> {
        self.sections
            .get(section)
            .map(|s| s.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_section(&mut self, section: &str) -> bool {
        self.sections.remove(section).is_some()
    }

    fn flush(&self) -> Result<(), StoreError> {
        if self.fail_next_flush.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("null flush failure".to_string()));
        }
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// An in-memory vote ledger.
#[derive(Default)]
pub struct NullVoteLedger {
    votes: Mutex<Vec<VoteRecord>>,
    fail_writes: AtomicBool,
}

impl NullVoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every vote appended so far (for assertions).
    pub fn all(&self) -> Vec<VoteRecord> {
        self.votes.lock().unwrap().clone()
    }

    /// Make every subsequent append fail.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

impl VoteLedger for NullVoteLedger {
    fn append_vote(&self, vote: &VoteRecord) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null ledger failure".to_string()));
        }
        self.votes.lock().unwrap().push(vote.clone());
        Ok(())
    }

    fn votes_for(&self, chan_address: &Address) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter(|v| &v.chan_address == chan_address)
            .cloned()
            .collect())
    }
}

/// An in-memory outbound message ledger.
#[derive(Default)]
pub struct NullOutbox {
    messages: Mutex<Vec<SentMessage>>,
}

impl NullOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<SentMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl OutboxLedger for NullOutbox {
    fn queue_message(&self, message: &SentMessage) -> Result<(), StoreError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn messages_to(&self, to_address: &Address) -> Result<Vec<SentMessage>, StoreError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| &m.to_address == to_address)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanvote_types::Timestamp;

    #[test]
    fn config_store_roundtrip() {
        let mut store = NullConfigStore::new();
        store.set("BM-chan", "vote", "true");
        assert!(store.has_section("BM-chan"));
        assert_eq!(store.get("BM-chan", "vote").as_deref(), Some("true"));
        assert_eq!(store.sections(), vec!["BM-chan".to_string()]);
        assert!(store.remove_section("BM-chan"));
        assert!(!store.has_section("BM-chan"));
    }

    #[test]
    fn flush_failure_is_one_shot() {
        let store = NullConfigStore::new();
        store.fail_next_flush();
        assert!(store.flush().is_err());
        assert!(store.flush().is_ok());
        assert_eq!(store.flush_count(), 1);
    }

    #[test]
    fn vote_ledger_filters_by_channel() {
        let ledger = NullVoteLedger::new();
        for chan in ["BM-a", "BM-b", "BM-a"] {
            ledger
                .append_vote(&VoteRecord {
                    chan_address: Address::new(chan),
                    voter_address: Address::new("BM-v"),
                    received_at: Timestamp::new(1),
                    raw_payload: vec![0, 0, 0, 0],
                    answer_index: 0,
                })
                .unwrap();
        }
        assert_eq!(ledger.votes_for(&Address::new("BM-a")).unwrap().len(), 2);
        assert_eq!(ledger.all().len(), 3);
    }
}
