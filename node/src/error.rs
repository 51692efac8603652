use chanvote_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("election error: {0}")]
    Election(#[from] chanvote_election::ElectionError),

    #[error("store error: {0}")]
    Store(#[from] chanvote_store::StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] chanvote_store_lmdb::LmdbError),

    #[error("no joined election for channel {0}")]
    UnknownElection(Address),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
