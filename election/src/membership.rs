//! Channel membership backed by the section-keyed configuration store.
//!
//! A joined election owns one section named after its channel address:
//!
//! ```toml
//! ["BM-87Zd56bxno4k3mNjvQukRr5sQh7T9sqDrsd"]
//! vote = "true"
//! question = "Pick a color"
//! answers = '["Red","Green","Blue"]'
//! voters = '["BM-...","BM-...","BM-..."]'
//! ```
//!
//! Join and leave are read-modify-write cycles over the whole store, so both
//! run under one async lock held across the address service call and the
//! flush. A failed flush rolls the in-memory view back.

use chanvote_network::AddressClient;
use chanvote_store::{parse_bool, ConfigStore};
use chanvote_types::Address;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::election::Election;
use crate::error::ElectionError;
use crate::state::ElectionState;

const KEY_VOTE: &str = "vote";
const KEY_QUESTION: &str = "question";
const KEY_ANSWERS: &str = "answers";
const KEY_VOTERS: &str = "voters";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}

pub struct Membership<C: ConfigStore> {
    store: Mutex<C>,
    changes: Mutex<()>,
    client: AddressClient,
}

impl<C: ConfigStore> Membership<C> {
    pub fn new(store: C, client: AddressClient) -> Self {
        Self {
            store: Mutex::new(store),
            changes: Mutex::new(()),
            client,
        }
    }

    pub async fn is_joined(&self, election: &Election) -> bool {
        self.store
            .lock()
            .await
            .has_section(election.chan_address().as_str())
    }

    /// Join the election's channel and record it. Joining twice is a no-op.
    pub async fn join(&self, election: &mut Election) -> Result<JoinOutcome, ElectionError> {
        let _changes = self.changes.lock().await;
        let chan = election.chan_address().clone();

        if self.store.lock().await.has_section(chan.as_str()) {
            warn!(chan = %chan, "election already joined");
            election.set_state(ElectionState::Joined);
            return Ok(JoinOutcome::AlreadyJoined);
        }

        let label = election.chan_label();
        let seed = election.content_hash().to_hex();
        let returned = self.client.join_chan(&chan, &label, &seed).await?;
        if returned.len() != 1 || returned[0].body() != chan.body() {
            return Err(ElectionError::JoinProtocol {
                expected: chan,
                returned,
            });
        }

        let answers = serde_json::to_string(election.answers())
            .map_err(|e| ElectionError::File(e.to_string()))?;
        let voters = serde_json::to_string(election.voters())
            .map_err(|e| ElectionError::File(e.to_string()))?;

        let mut store = self.store.lock().await;
        let section = chan.as_str();
        store.set(section, KEY_VOTE, "true");
        store.set(section, KEY_QUESTION, election.question());
        store.set(section, KEY_ANSWERS, &answers);
        store.set(section, KEY_VOTERS, &voters);
        if let Err(e) = store.flush() {
            store.remove_section(section);
            return Err(e.into());
        }

        election.set_state(ElectionState::Joined);
        info!(chan = %chan, question = election.question(), "joined election");
        Ok(JoinOutcome::Joined)
    }

    /// Forget the election's channel. Returns whether it was joined.
    pub async fn leave(&self, election: &mut Election) -> Result<bool, ElectionError> {
        let _changes = self.changes.lock().await;
        let chan = election.chan_address().clone();
        let mut store = self.store.lock().await;

        let saved = store.section_entries(chan.as_str());
        if !store.remove_section(chan.as_str()) {
            election.set_state(ElectionState::AddressBound);
            return Ok(false);
        }
        if let Err(e) = store.flush() {
            for (key, value) in &saved {
                store.set(chan.as_str(), key, value);
            }
            return Err(e.into());
        }

        election.set_state(ElectionState::AddressBound);
        info!(chan = %chan, "left election");
        Ok(true)
    }

    /// Rebuild a joined election from its stored section.
    ///
    /// Returns `None` when the address has no section or the section is not
    /// flagged as a vote. The stored fields are trusted: nothing is re-derived.
    pub async fn load_from_address(
        &self,
        address: &Address,
    ) -> Result<Option<Election>, ElectionError> {
        let store = self.store.lock().await;
        load_section(&*store, address)
    }

    /// Every joined election in the store, skipping unreadable sections.
    pub async fn joined_elections(&self) -> Vec<Election> {
        let store = self.store.lock().await;
        let mut out = Vec::new();
        for section in store.sections() {
            let address = Address::new(section);
            match load_section(&*store, &address) {
                Ok(Some(election)) => out.push(election),
                Ok(None) => {}
                Err(e) => warn!(chan = %address, error = %e, "skipping stored election"),
            }
        }
        out
    }
}

fn load_section<C: ConfigStore>(
    store: &C,
    address: &Address,
) -> Result<Option<Election>, ElectionError> {
    let section = address.as_str();
    if !store.has_section(section) {
        return Ok(None);
    }
    let is_vote = store
        .get(section, KEY_VOTE)
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false);
    if !is_vote {
        return Ok(None);
    }

    let corrupt = |reason: String| ElectionError::CorruptConfig {
        address: address.clone(),
        reason,
    };
    let field = |key: &str| {
        store
            .get(section, key)
            .ok_or_else(|| corrupt(format!("missing {key}")))
    };

    let question = field(KEY_QUESTION)?;
    let answers: Vec<String> = serde_json::from_str(&field(KEY_ANSWERS)?)
        .map_err(|e| corrupt(format!("answers: {e}")))?;
    let voters: Vec<Address> = serde_json::from_str(&field(KEY_VOTERS)?)
        .map_err(|e| corrupt(format!("voters: {e}")))?;

    let mut election = Election::from_trusted(question, answers, voters, None, address.clone())
        .map_err(|e| corrupt(e.to_string()))?;
    election.set_state(ElectionState::Joined);
    Ok(Some(election))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::ElectionParams;
    use chanvote_messages::AddressCommand;
    use chanvote_nullables::{
        null_address_client, test_address, CommandLog, NullAddressGenerator, NullConfigStore,
    };
    use std::sync::Arc;

    fn params() -> ElectionParams {
        ElectionParams::new(
            "Pick a color",
            vec!["Red".into(), "Green".into(), "Blue".into()],
            ["alice", "bob", "carol"].iter().map(|n| test_address(n)).collect(),
        )
    }

    async fn setup(
        generator: NullAddressGenerator,
    ) -> (Membership<NullConfigStore>, Election, CommandLog) {
        let (client, log) = null_address_client(generator);
        let election = Election::derive(params(), &client).await.unwrap();
        (Membership::new(NullConfigStore::new(), client), election, log)
    }

    #[tokio::test]
    async fn join_records_section_and_state() {
        let (membership, mut election, log) = setup(NullAddressGenerator::new()).await;
        assert!(!membership.is_joined(&election).await);

        let outcome = membership.join(&mut election).await.unwrap();
        assert_eq!(outcome, JoinOutcome::Joined);
        assert_eq!(election.state(), ElectionState::Joined);
        assert!(membership.is_joined(&election).await);

        let commands = log.lock().unwrap().clone();
        assert!(matches!(
            &commands[1],
            AddressCommand::JoinChan { chan_address, seed, .. }
                if chan_address == election.chan_address() && *seed == election.content_hash().to_hex()
        ));
    }

    #[tokio::test]
    async fn second_join_is_a_no_op() {
        let (membership, mut election, log) = setup(NullAddressGenerator::new()).await;
        membership.join(&mut election).await.unwrap();
        let outcome = membership.join(&mut election).await.unwrap();
        assert_eq!(outcome, JoinOutcome::AlreadyJoined);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn already_joined_channel_logs_a_warning() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (membership, mut election, _) = setup(NullAddressGenerator::new()).await;
        membership.join(&mut election).await.unwrap();
        membership.join(&mut election).await.unwrap();

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("election already joined"), "{output}");
    }

    #[tokio::test]
    async fn empty_join_reply_is_a_protocol_error() {
        let (membership, mut election, _) = setup(NullAddressGenerator::refusing_joins()).await;
        let err = membership.join(&mut election).await.unwrap_err();
        assert!(matches!(err, ElectionError::JoinProtocol { returned, .. } if returned.is_empty()));
        assert!(!membership.is_joined(&election).await);
        assert_eq!(election.state(), ElectionState::AddressBound);
    }

    #[tokio::test]
    async fn failed_flush_leaves_store_unchanged() {
        let (membership, mut election, _) = setup(NullAddressGenerator::new()).await;
        membership.store.lock().await.fail_next_flush();
        assert!(matches!(
            membership.join(&mut election).await,
            Err(ElectionError::Store(_))
        ));
        assert!(!membership.is_joined(&election).await);
    }

    #[tokio::test]
    async fn leave_removes_section() {
        let (membership, mut election, _) = setup(NullAddressGenerator::new()).await;
        membership.join(&mut election).await.unwrap();
        assert!(membership.leave(&mut election).await.unwrap());
        assert_eq!(election.state(), ElectionState::AddressBound);
        assert!(!membership.is_joined(&election).await);
        assert!(!membership.leave(&mut election).await.unwrap());
    }

    #[tokio::test]
    async fn failed_leave_restores_section() {
        let (membership, mut election, _) = setup(NullAddressGenerator::new()).await;
        membership.join(&mut election).await.unwrap();
        membership.store.lock().await.fail_next_flush();
        assert!(membership.leave(&mut election).await.is_err());
        assert!(membership.is_joined(&election).await);
        let loaded = membership
            .load_from_address(election.chan_address())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.question(), "Pick a color");
    }

    #[tokio::test]
    async fn load_from_address_rebuilds_joined_election() {
        let (membership, mut election, _) = setup(NullAddressGenerator::new()).await;
        membership.join(&mut election).await.unwrap();
        let loaded = membership
            .load_from_address(election.chan_address())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, election);
        assert_eq!(loaded.state(), ElectionState::Joined);
    }

    #[tokio::test]
    async fn non_vote_sections_are_ignored() {
        let (membership, election, _) = setup(NullAddressGenerator::new()).await;
        {
            let mut store = membership.store.lock().await;
            store.set(election.chan_address().as_str(), "label", "some chan");
            store.set("BM-other", "vote", "false");
        }
        assert!(membership
            .load_from_address(election.chan_address())
            .await
            .unwrap()
            .is_none());
        assert!(membership
            .load_from_address(&Address::new("BM-missing"))
            .await
            .unwrap()
            .is_none());
        assert!(membership.joined_elections().await.is_empty());
    }

    #[tokio::test]
    async fn whitespace_question_section_loads() {
        let (membership, election, _) = setup(NullAddressGenerator::new()).await;
        {
            let mut store = membership.store.lock().await;
            let s = election.chan_address().as_str();
            store.set(s, "vote", "true");
            store.set(s, "question", " ");
            store.set(s, "answers", r#"["Red","Green","Blue"]"#);
            store.set(s, "voters", &serde_json::to_string(election.voters()).unwrap());
        }
        let loaded = membership
            .load_from_address(election.chan_address())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.question(), " ");
        assert_eq!(membership.joined_elections().await.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_section_is_reported() {
        let (membership, election, _) = setup(NullAddressGenerator::new()).await;
        {
            let mut store = membership.store.lock().await;
            let s = election.chan_address().as_str();
            store.set(s, "vote", "yes");
            store.set(s, "question", "Q");
            store.set(s, "answers", "not json");
            store.set(s, "voters", "[]");
        }
        let err = membership
            .load_from_address(election.chan_address())
            .await
            .unwrap_err();
        assert!(matches!(err, ElectionError::CorruptConfig { .. }));
        assert!(membership.joined_elections().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_joins_record_each_election_once() {
        let (client, _) = null_address_client(NullAddressGenerator::new());
        let membership = Arc::new(Membership::new(NullConfigStore::new(), client.clone()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let membership = membership.clone();
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                let mut p = params();
                p.question = format!("Question {}", i % 4);
                let mut election = Election::derive(p, &client).await.unwrap();
                membership.join(&mut election).await.unwrap()
            }));
        }
        let mut fresh = 0;
        for h in handles {
            if h.await.unwrap() == JoinOutcome::Joined {
                fresh += 1;
            }
        }
        assert_eq!(fresh, 4);
        assert_eq!(membership.joined_elections().await.len(), 4);
    }
}
