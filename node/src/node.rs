//! The voting node: wires stores, ports and the election core together.

use std::sync::Arc;

use chanvote_crypto::{EntropySource, OsEntropy};
use chanvote_election::{
    Election, ElectionParams, JoinOutcome, Membership, ReceiveOutcome, VoteTransport,
};
use chanvote_messages::WorkItem;
use chanvote_network::{spawn_address_worker, AddressClient, AddressGenerator, SendQueue};
use chanvote_store::{ConfigStore, KeysFile, OutboxLedger, SentMessage, VoteLedger, VoteRecord};
use chanvote_store_lmdb::LmdbEnvironment;
use chanvote_types::{Address, AnswerIndex, Clock, SystemClock, Timestamp};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{NodeConfig, NodeError};

/// A message delivered on some channel this node listens to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub to_address: Address,
    pub from_address: Address,
    pub received_at: Timestamp,
    pub payload: Vec<u8>,
}

/// Everything a node needs, for callers that bring their own stores.
pub struct NodeParts<C: ConfigStore> {
    pub config_store: C,
    pub outbox: Arc<dyn OutboxLedger>,
    pub votes: Arc<dyn VoteLedger>,
    pub client: AddressClient,
    pub send_queue: SendQueue,
    pub entropy: Arc<dyn EntropySource>,
    pub clock: Arc<dyn Clock>,
}

pub struct VotingNode<C: ConfigStore = KeysFile> {
    membership: Membership<C>,
    transport: VoteTransport,
    client: AddressClient,
}

impl VotingNode<KeysFile> {
    /// Open the on-disk stores named by `config` and start the address
    /// worker around `generator`.
    ///
    /// Returns the receiver the send worker drains. Must be called from
    /// inside a Tokio runtime.
    pub fn open<G: AddressGenerator>(
        config: &NodeConfig,
        generator: G,
    ) -> Result<(Self, mpsc::Receiver<WorkItem>), NodeError> {
        let keys = KeysFile::open(config.keys_path())?;
        let env = LmdbEnvironment::open(&config.ledger_path(), config.ledger_map_size)?;
        let (client, _worker) = spawn_address_worker(
            generator,
            config.address_queue_capacity,
            config.address_timeout(),
        );
        let (send_queue, work_rx) = SendQueue::channel(config.send_queue_capacity);

        info!(
            keys = %config.keys_path().display(),
            ledger = %config.ledger_path().display(),
            "voting node opened"
        );
        let node = Self::from_parts(NodeParts {
            config_store: keys,
            outbox: Arc::new(env.outbox_ledger()),
            votes: Arc::new(env.vote_ledger()),
            client,
            send_queue,
            entropy: Arc::new(OsEntropy),
            clock: Arc::new(SystemClock),
        });
        Ok((node, work_rx))
    }
}

impl<C: ConfigStore> VotingNode<C> {
    pub fn from_parts(parts: NodeParts<C>) -> Self {
        let transport = VoteTransport::new(
            parts.outbox,
            parts.votes,
            parts.send_queue,
            parts.entropy,
            parts.clock,
        );
        Self {
            membership: Membership::new(parts.config_store, parts.client.clone()),
            transport,
            client: parts.client,
        }
    }

    /// Derive a new election and join its channel.
    pub async fn create_election(&self, params: ElectionParams) -> Result<Election, NodeError> {
        let mut election = Election::derive(params, &self.client).await?;
        self.membership.join(&mut election).await?;
        Ok(election)
    }

    pub async fn join(&self, election: &mut Election) -> Result<JoinOutcome, NodeError> {
        Ok(self.membership.join(election).await?)
    }

    /// Leave the election stored under `chan_address`.
    pub async fn leave(&self, chan_address: &Address) -> Result<Election, NodeError> {
        let mut election = self.joined(chan_address).await?;
        self.membership.leave(&mut election).await?;
        Ok(election)
    }

    pub async fn elections(&self) -> Vec<Election> {
        self.membership.joined_elections().await
    }

    pub async fn election(&self, chan_address: &Address) -> Result<Option<Election>, NodeError> {
        Ok(self.membership.load_from_address(chan_address).await?)
    }

    pub async fn send_vote(
        &self,
        chan_address: &Address,
        from: &Address,
        index: AnswerIndex,
    ) -> Result<SentMessage, NodeError> {
        let election = self.joined(chan_address).await?;
        Ok(self.transport.send_vote(&election, from, index)?)
    }

    /// Route an inbound message to its election.
    ///
    /// Returns `None` when the destination is not a joined vote channel.
    /// Never fails: every fault is logged.
    pub async fn on_message(&self, message: &InboundMessage) -> Option<ReceiveOutcome> {
        let election = match self.membership.load_from_address(&message.to_address).await {
            Ok(Some(election)) => election,
            Ok(None) => {
                debug!(to = %message.to_address, "message is not for a vote channel");
                return None;
            }
            Err(e) => {
                warn!(to = %message.to_address, error = %e, "cannot load election for message");
                return None;
            }
        };
        Some(self.transport.received_vote(
            &election,
            &message.from_address,
            message.received_at,
            &message.payload,
        ))
    }

    /// Votes recorded for a channel, in arrival order.
    pub fn votes(&self, chan_address: &Address) -> Result<Vec<VoteRecord>, NodeError> {
        Ok(self.transport.votes().votes_for(chan_address)?)
    }

    async fn joined(&self, chan_address: &Address) -> Result<Election, NodeError> {
        self.membership
            .load_from_address(chan_address)
            .await?
            .ok_or_else(|| NodeError::UnknownElection(chan_address.clone()))
    }
}
