//! LMDB implementation of OutboxLedger.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use chanvote_store::{OutboxLedger, SentMessage, StoreError};
use chanvote_types::Address;

use crate::environment::{channel_key, channel_prefix, channel_upper_bound, next_sequence};
use crate::LmdbError;

const OUTBOX_SEQUENCE_KEY: &[u8] = b"outbox_sequence";

pub struct LmdbOutboxLedger {
    pub(crate) env: Arc<Env>,
    pub(crate) outbox_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl OutboxLedger for LmdbOutboxLedger {
    fn queue_message(&self, message: &SentMessage) -> Result<(), StoreError> {
        let bytes = bincode::serialize(message).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let seq = next_sequence(&mut wtxn, self.meta_db, OUTBOX_SEQUENCE_KEY)?;
        let key = channel_key(message.to_address.as_str(), seq);
        self.outbox_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn messages_to(&self, to_address: &Address) -> Result<Vec<SentMessage>, StoreError> {
        let lower = channel_prefix(to_address.as_str());
        let upper = channel_upper_bound(to_address.as_str());

        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bounds = (
            Bound::Included(lower.as_slice()),
            Bound::Excluded(upper.as_slice()),
        );
        let iter = self
            .outbox_db
            .range(&rtxn, &bounds)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for result in iter {
            let (_key, val) = result.map_err(LmdbError::from)?;
            let message: SentMessage = bincode::deserialize(val).map_err(LmdbError::from)?;
            results.push(message);
        }
        Ok(results)
    }
}
