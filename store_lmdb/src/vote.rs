//! LMDB implementation of VoteLedger.
//!
//! Key format: `chan_address ++ 0x00 ++ sequence_be`, so a range scan over a
//! channel returns its votes in arrival order.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use chanvote_store::{StoreError, VoteLedger, VoteRecord};
use chanvote_types::Address;

use crate::environment::{channel_key, channel_prefix, channel_upper_bound, next_sequence};
use crate::LmdbError;

const VOTE_SEQUENCE_KEY: &[u8] = b"vote_sequence";

pub struct LmdbVoteLedger {
    pub(crate) env: Arc<Env>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl VoteLedger for LmdbVoteLedger {
    fn append_vote(&self, vote: &VoteRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(vote).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let seq = next_sequence(&mut wtxn, self.meta_db, VOTE_SEQUENCE_KEY)?;
        let key = channel_key(vote.chan_address.as_str(), seq);
        self.votes_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn votes_for(&self, chan_address: &Address) -> Result<Vec<VoteRecord>, StoreError> {
        let lower = channel_prefix(chan_address.as_str());
        let upper = channel_upper_bound(chan_address.as_str());

        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bounds = (
            Bound::Included(lower.as_slice()),
            Bound::Excluded(upper.as_slice()),
        );
        let iter = self
            .votes_db
            .range(&rtxn, &bounds)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for result in iter {
            let (_key, val) = result.map_err(LmdbError::from)?;
            let vote: VoteRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            results.push(vote);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use chanvote_types::Timestamp;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).expect("open env");
        (dir, env)
    }

    fn vote(chan: &str, voter: &str, index: u32, at: u64) -> VoteRecord {
        VoteRecord {
            chan_address: Address::new(chan),
            voter_address: Address::new(voter),
            received_at: Timestamp::new(at),
            raw_payload: index.to_be_bytes().to_vec(),
            answer_index: index,
        }
    }

    #[test]
    fn votes_are_returned_in_arrival_order() {
        let (_dir, env) = temp_env();
        let ledger = env.vote_ledger();
        ledger.append_vote(&vote("BM-chanA", "BM-v1", 2, 10)).unwrap();
        ledger.append_vote(&vote("BM-chanA", "BM-v2", 0, 11)).unwrap();
        ledger.append_vote(&vote("BM-chanA", "BM-v1", 1, 12)).unwrap();

        let votes = ledger.votes_for(&Address::new("BM-chanA")).unwrap();
        let indices: Vec<u32> = votes.iter().map(|v| v.answer_index).collect();
        assert_eq!(indices, vec![2, 0, 1]);
    }

    #[test]
    fn channels_do_not_bleed_into_each_other() {
        let (_dir, env) = temp_env();
        let ledger = env.vote_ledger();
        ledger.append_vote(&vote("BM-chan", "BM-v1", 0, 1)).unwrap();
        ledger.append_vote(&vote("BM-chanB", "BM-v1", 1, 2)).unwrap();

        assert_eq!(ledger.votes_for(&Address::new("BM-chan")).unwrap().len(), 1);
        assert_eq!(ledger.votes_for(&Address::new("BM-chanB")).unwrap().len(), 1);
        assert!(ledger.votes_for(&Address::new("BM-none")).unwrap().is_empty());
    }

    #[test]
    fn votes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
            env.vote_ledger()
                .append_vote(&vote("BM-chanA", "BM-v1", 1, 5))
                .unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let votes = env.vote_ledger().votes_for(&Address::new("BM-chanA")).unwrap();
        assert_eq!(votes, vec![vote("BM-chanA", "BM-v1", 1, 5)]);
    }
}
