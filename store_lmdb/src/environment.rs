//! LMDB environment setup and shared key helpers.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RwTxn};

use crate::{LmdbError, LmdbOutboxLedger, LmdbVoteLedger};

/// Number of named databases: votes, outbox, meta.
const MAX_DBS: u32 = 3;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    votes_db: Database<Bytes, Bytes>,
    outbox_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment directory is owned by this process; it is
        // never opened twice concurrently from the same process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let outbox_db = env.create_database(&mut wtxn, Some("outbox"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            votes_db,
            outbox_db,
            meta_db,
        })
    }

    pub fn vote_ledger(&self) -> LmdbVoteLedger {
        LmdbVoteLedger {
            env: Arc::clone(&self.env),
            votes_db: self.votes_db,
            meta_db: self.meta_db,
        }
    }

    pub fn outbox_ledger(&self) -> LmdbOutboxLedger {
        LmdbOutboxLedger {
            env: Arc::clone(&self.env),
            outbox_db: self.outbox_db,
            meta_db: self.meta_db,
        }
    }
}

/// Allocate the next value of a monotonic counter stored in `meta_db`.
pub(crate) fn next_sequence(
    wtxn: &mut RwTxn,
    meta_db: Database<Bytes, Bytes>,
    counter: &[u8],
) -> Result<u64, LmdbError> {
    let current = match meta_db.get(wtxn, counter)? {
        Some(bytes) if bytes.len() == 8 => {
            let mut arr = [0u8; 8];
            arr.copy_from_slice(bytes);
            u64::from_be_bytes(arr)
        }
        Some(_) => {
            return Err(LmdbError::Serialization(format!(
                "counter {} has unexpected byte length",
                String::from_utf8_lossy(counter)
            )))
        }
        None => 0,
    };
    let next = current + 1;
    meta_db.put(wtxn, counter, &next.to_be_bytes())?;
    Ok(next)
}

/// Composite key `chan ++ 0x00 ++ seq_be`. Addresses never contain a NUL,
/// so every channel owns a contiguous key range.
pub(crate) fn channel_key(chan: &str, seq: u64) -> Vec<u8> {
    let mut key = channel_prefix(chan);
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

pub(crate) fn channel_prefix(chan: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(chan.len() + 9);
    key.extend_from_slice(chan.as_bytes());
    key.push(0);
    key
}

/// Exclusive upper bound of a channel's key range.
pub(crate) fn channel_upper_bound(chan: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(chan.len() + 1);
    key.extend_from_slice(chan.as_bytes());
    key.push(1);
    key
}
