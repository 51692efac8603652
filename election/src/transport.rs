//! Vote transport: outbound rows for the send worker, inbound votes into
//! the ledger.

use std::sync::Arc;

use chanvote_crypto::{decode_address, EntropySource};
use chanvote_messages::WorkItem;
use chanvote_network::SendQueue;
use chanvote_store::{
    Folder, MessageStatus, OutboxLedger, SentMessage, VoteLedger, VoteRecord, ENCODING_SIMPLE,
};
use chanvote_types::{Address, AnswerIndex, Clock, Timestamp};
use tracing::{info, warn};

use crate::election::Election;
use crate::error::{ElectionError, VoteRejection};

/// What happened to an inbound vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    Recorded(VoteRecord),
    Discarded(VoteRejection),
}

impl ReceiveOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

pub struct VoteTransport {
    outbox: Arc<dyn OutboxLedger>,
    votes: Arc<dyn VoteLedger>,
    send_queue: SendQueue,
    entropy: Arc<dyn EntropySource>,
    clock: Arc<dyn Clock>,
}

impl VoteTransport {
    pub fn new(
        outbox: Arc<dyn OutboxLedger>,
        votes: Arc<dyn VoteLedger>,
        send_queue: SendQueue,
        entropy: Arc<dyn EntropySource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            outbox,
            votes,
            send_queue,
            entropy,
            clock,
        }
    }

    pub fn votes(&self) -> &Arc<dyn VoteLedger> {
        &self.votes
    }

    /// Queue a vote for broadcast on the election's channel.
    ///
    /// The row is persisted before the send worker is signalled. A failed
    /// handoff is only logged: the row stays queued for the worker's next
    /// pass over the outbox.
    pub fn send_vote(
        &self,
        election: &Election,
        from: &Address,
        index: AnswerIndex,
    ) -> Result<SentMessage, ElectionError> {
        let chan = election.chan_address();
        let body = election.encode_vote(index)?;
        if !election.state().accepts_votes() {
            return Err(ElectionError::NotJoined(chan.clone()));
        }
        let to_ripe = decode_address(chan.as_str())
            .map_err(|reason| ElectionError::InvalidChanAddress {
                address: chan.clone(),
                reason,
            })?
            .ripe;

        let row = SentMessage {
            msgid: Vec::new(),
            to_address: chan.clone(),
            to_ripe,
            from_address: from.clone(),
            subject: election.question().to_string(),
            body: body.to_vec(),
            ack_data: self.entropy.ack_data()?,
            last_action_time: self.clock.now(),
            status: MessageStatus::MsgQueued,
            pubkey_retry_number: 1,
            msg_retry_number: 1,
            folder: Folder::Sent,
            encoding_type: ENCODING_SIMPLE,
        };
        self.outbox.queue_message(&row)?;

        let item = WorkItem::SendMessage {
            chan_address: chan.clone(),
        };
        if let Err(e) = self.send_queue.enqueue(item) {
            warn!(chan = %chan, error = %e, "send worker not signalled; vote stays queued");
        }
        info!(chan = %chan, from = %from, answer = index, "vote queued");
        Ok(row)
    }

    /// Record an inbound vote. Faults are logged and returned as data.
    pub fn received_vote(
        &self,
        election: &Election,
        from: &Address,
        received_at: Timestamp,
        payload: &[u8],
    ) -> ReceiveOutcome {
        let chan = election.chan_address();
        let discard = |rejection: VoteRejection| {
            warn!(chan = %chan, from = %from, reason = %rejection, "vote discarded");
            ReceiveOutcome::Discarded(rejection)
        };

        if !election.state().accepts_votes() {
            return discard(VoteRejection::NotJoined);
        }
        let answer_index = match election.decode_vote(payload) {
            Ok(index) => index,
            Err(rejection) => return discard(rejection),
        };

        let record = VoteRecord {
            chan_address: chan.clone(),
            voter_address: from.clone(),
            received_at,
            raw_payload: payload.to_vec(),
            answer_index,
        };
        if let Err(e) = self.votes.append_vote(&record) {
            return discard(VoteRejection::LedgerUnavailable(e.to_string()));
        }
        info!(chan = %chan, from = %from, answer = answer_index, "vote recorded");
        ReceiveOutcome::Recorded(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::state::ElectionState;
    use chanvote_nullables::{test_address, NullClock, NullOutbox, NullRandom, NullVoteLedger};
    use tokio::sync::mpsc;

    struct Harness {
        transport: VoteTransport,
        outbox: Arc<NullOutbox>,
        votes: Arc<NullVoteLedger>,
        work_rx: mpsc::Receiver<WorkItem>,
    }

    fn harness() -> Harness {
        let outbox = Arc::new(NullOutbox::new());
        let votes = Arc::new(NullVoteLedger::new());
        let (queue, work_rx) = SendQueue::channel(4);
        let transport = VoteTransport::new(
            outbox.clone(),
            votes.clone(),
            queue,
            Arc::new(NullRandom::constant([7u8; 32])),
            Arc::new(NullClock::new(1_700_000_000)),
        );
        Harness {
            transport,
            outbox,
            votes,
            work_rx,
        }
    }

    fn joined_election() -> Election {
        let mut e = Election::from_trusted(
            "Lunch?",
            vec!["Pizza".into(), "Sushi".into()],
            ["alice", "bob", "carol"].iter().map(|n| test_address(n)).collect(),
            None,
            Address::new("BM-87Zd56bxno4k3mNjvQukRr5sQh7T9sqDrsd"),
        )
        .unwrap();
        e.set_state(ElectionState::Joined);
        e
    }

    #[test]
    fn send_vote_persists_row_and_signals_worker() {
        let mut h = harness();
        let election = joined_election();
        let me = test_address("alice");

        let row = h.transport.send_vote(&election, &me, 1).unwrap();
        assert_eq!(row.body, vec![0, 0, 0, 1]);
        assert_eq!(row.subject, "Lunch?");
        assert_eq!(row.status, MessageStatus::MsgQueued);
        assert_eq!(row.folder, Folder::Sent);
        assert_eq!(row.encoding_type, 2);
        assert_eq!(row.ack_data, [7u8; 32]);
        assert_eq!(row.last_action_time, Timestamp::new(1_700_000_000));
        assert_eq!((row.pubkey_retry_number, row.msg_retry_number), (1, 1));
        assert!(row.msgid.is_empty());
        assert_eq!(
            row.to_ripe,
            decode_address(election.chan_address().as_str()).unwrap().ripe
        );

        assert_eq!(h.outbox.all(), vec![row]);
        assert_eq!(
            h.work_rx.try_recv().unwrap(),
            WorkItem::SendMessage {
                chan_address: election.chan_address().clone()
            }
        );
    }

    #[test]
    fn send_requires_joined_election() {
        let h = harness();
        let mut election = joined_election();
        election.set_state(ElectionState::AddressBound);
        assert!(matches!(
            h.transport.send_vote(&election, &test_address("alice"), 0),
            Err(ElectionError::NotJoined(_))
        ));
        assert!(h.outbox.all().is_empty());
    }

    #[test]
    fn answer_range_is_checked_before_membership() {
        let h = harness();
        let mut election = joined_election();
        election.set_state(ElectionState::AddressBound);
        assert!(matches!(
            h.transport.send_vote(&election, &test_address("alice"), 5),
            Err(ElectionError::EncodeRange { index: 5, answers: 2 })
        ));
        assert!(h.outbox.all().is_empty());
    }

    #[test]
    fn send_rejects_out_of_range_answer() {
        let h = harness();
        assert!(matches!(
            h.transport
                .send_vote(&joined_election(), &test_address("alice"), 2),
            Err(ElectionError::EncodeRange { index: 2, answers: 2 })
        ));
        assert!(h.outbox.all().is_empty());
    }

    #[test]
    fn closed_send_queue_keeps_the_row() {
        let h = harness();
        drop(h.work_rx);
        let row = h
            .transport
            .send_vote(&joined_election(), &test_address("alice"), 0)
            .unwrap();
        assert_eq!(h.outbox.all(), vec![row]);
    }

    #[test]
    fn received_vote_is_recorded() {
        let h = harness();
        let election = joined_election();
        let outcome = h.transport.received_vote(
            &election,
            &test_address("bob"),
            Timestamp::new(42),
            &[0, 0, 0, 1],
        );
        let record = match outcome {
            ReceiveOutcome::Recorded(record) => record,
            other => panic!("vote not recorded: {other:?}"),
        };
        assert_eq!(record.answer_index, 1);
        assert_eq!(record.voter_address, test_address("bob"));
        assert_eq!(record.received_at, Timestamp::new(42));
        assert_eq!(h.votes.all(), vec![record]);
    }

    #[test]
    fn faulty_inbound_votes_are_discarded() {
        let h = harness();
        let election = joined_election();
        let bob = test_address("bob");
        let at = Timestamp::new(1);

        assert_eq!(
            h.transport.received_vote(&election, &bob, at, &[0, 1]),
            ReceiveOutcome::Discarded(VoteRejection::Malformed(DecodeError(2)))
        );
        assert_eq!(
            h.transport.received_vote(&election, &bob, at, &[0, 0, 0, 9]),
            ReceiveOutcome::Discarded(VoteRejection::OutOfRange { index: 9, answers: 2 })
        );

        let mut left = election.clone();
        left.set_state(ElectionState::AddressBound);
        assert_eq!(
            h.transport.received_vote(&left, &bob, at, &[0, 0, 0, 0]),
            ReceiveOutcome::Discarded(VoteRejection::NotJoined)
        );
        assert!(h.votes.all().is_empty());
    }

    #[test]
    fn index_equal_to_answer_count_is_not_recorded() {
        let h = harness();
        let election = joined_election();
        assert_eq!(
            h.transport.received_vote(
                &election,
                &test_address("bob"),
                Timestamp::new(1),
                &[0, 0, 0, 2],
            ),
            ReceiveOutcome::Discarded(VoteRejection::OutOfRange { index: 2, answers: 2 })
        );
        assert!(h.votes.all().is_empty());
    }

    #[test]
    fn ledger_failure_is_a_discard() {
        let h = harness();
        h.votes.fail_writes();
        let outcome = h.transport.received_vote(
            &joined_election(),
            &test_address("bob"),
            Timestamp::new(1),
            &[0, 0, 0, 0],
        );
        assert!(matches!(
            outcome,
            ReceiveOutcome::Discarded(VoteRejection::LedgerUnavailable(_))
        ));
    }
}
