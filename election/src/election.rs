//! Election identity: parameter validation, content hash, channel address.
//!
//! An election is identified by the SHA-256 of its canonical encoding
//! `question;answer1,answer2,...;voter1,voter2,...`. The lowercase hex of
//! that hash seeds the address service, which derives the channel address
//! every participant meets on. Order and exact bytes of every field matter:
//! reordering voters yields a different election.

use std::collections::HashSet;
use std::fmt;

use chanvote_crypto::{decode_address, sha256};
use chanvote_network::AddressClient;
use chanvote_types::{Address, ContentHash};
use tracing::debug;

use crate::error::{ElectionError, InvalidVoter, ValidationError};
use crate::state::ElectionState;

pub const CHAN_LABEL_PREFIX: &str = "[vote]";
pub const MIN_ANSWERS: usize = 2;
pub const MIN_VOTERS: usize = 3;

/// The byte string the content hash is computed over.
pub fn canonical_encoding(question: &str, answers: &[String], voters: &[Address]) -> String {
    let voters: Vec<&str> = voters.iter().map(Address::as_str).collect();
    format!("{};{};{}", question, answers.join(","), voters.join(","))
}

pub fn content_hash(question: &str, answers: &[String], voters: &[Address]) -> ContentHash {
    ContentHash::new(sha256(
        canonical_encoding(question, answers, voters).as_bytes(),
    ))
}

/// The human-readable label attached to an election's channel.
pub fn chan_label(question: &str) -> String {
    format!("{CHAN_LABEL_PREFIX} {question}")
}

/// Check the structural rules every election must satisfy.
///
/// Voter addresses are checked before duplicates, and duplicates are
/// detected on the decoded address so that `BM-x` and `x` collide.
pub fn validate(
    question: &str,
    answers: &[String],
    voters: &[Address],
) -> Result<(), ValidationError> {
    if question.is_empty() {
        return Err(ValidationError::EmptyQuestion);
    }
    if answers.len() < MIN_ANSWERS {
        return Err(ValidationError::TooFewAnswers(answers.len()));
    }
    if voters.len() < MIN_VOTERS {
        return Err(ValidationError::TooFewVoters(voters.len()));
    }

    let mut decoded = Vec::with_capacity(voters.len());
    let mut invalid = Vec::new();
    for voter in voters {
        match decode_address(voter.as_str()) {
            Ok(d) => decoded.push(d),
            Err(reason) => invalid.push(InvalidVoter {
                address: voter.clone(),
                reason,
            }),
        }
    }
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidVoterAddresses(invalid));
    }

    let mut seen = HashSet::with_capacity(decoded.len());
    let duplicates: Vec<Address> = voters
        .iter()
        .zip(decoded)
        .filter(|(_, d)| !seen.insert(*d))
        .map(|(v, _)| v.clone())
        .collect();
    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicateVoters(duplicates));
    }
    Ok(())
}

/// Raw election parameters, optionally with the identity the caller expects
/// them to produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElectionParams {
    pub question: String,
    pub answers: Vec<String>,
    pub voters: Vec<Address>,
    pub expected_hash: Option<ContentHash>,
    pub expected_address: Option<Address>,
}

impl ElectionParams {
    pub fn new(
        question: impl Into<String>,
        answers: Vec<String>,
        voters: Vec<Address>,
    ) -> Self {
        Self {
            question: question.into(),
            answers,
            voters,
            expected_hash: None,
            expected_address: None,
        }
    }

    pub fn with_expected_hash(mut self, hash: ContentHash) -> Self {
        self.expected_hash = Some(hash);
        self
    }

    pub fn with_expected_address(mut self, address: Address) -> Self {
        self.expected_address = Some(address);
        self
    }

    pub fn validate(self) -> Result<DefinedElection, ValidationError> {
        validate(&self.question, &self.answers, &self.voters)?;
        Ok(DefinedElection { params: self })
    }
}

/// Validated parameters. Nothing derived yet.
#[derive(Clone, Debug)]
pub struct DefinedElection {
    params: ElectionParams,
}

impl DefinedElection {
    pub fn state(&self) -> ElectionState {
        ElectionState::Defined
    }

    pub fn params(&self) -> &ElectionParams {
        &self.params
    }

    /// Compute the content hash, checking it against any expected hash.
    pub fn bind_hash(self) -> Result<HashBoundElection, ElectionError> {
        let p = &self.params;
        let computed = content_hash(&p.question, &p.answers, &p.voters);
        if let Some(expected) = p.expected_hash {
            if expected != computed {
                return Err(ElectionError::HashMismatch { expected, computed });
            }
        }
        Ok(HashBoundElection {
            params: self.params,
            content_hash: computed,
        })
    }

    /// Skip verification and adopt a stored identity.
    ///
    /// Used when reading elections this node already verified: the expected
    /// hash is trusted when present, otherwise computed locally; the channel
    /// address is taken as given. No address service call is made.
    pub fn trust(self, chan_address: Address) -> Election {
        let p = self.params;
        let hash = p
            .expected_hash
            .unwrap_or_else(|| content_hash(&p.question, &p.answers, &p.voters));
        Election {
            question: p.question,
            answers: p.answers,
            voters: p.voters,
            content_hash: hash,
            chan_address,
            state: ElectionState::AddressBound,
        }
    }
}

/// Content hash computed; waiting for the channel address.
#[derive(Clone, Debug)]
pub struct HashBoundElection {
    params: ElectionParams,
    content_hash: ContentHash,
}

impl HashBoundElection {
    pub fn state(&self) -> ElectionState {
        ElectionState::HashBound
    }

    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    pub fn chan_label(&self) -> String {
        chan_label(&self.params.question)
    }

    /// Ask the address service for the channel address, checking it against
    /// any expected address.
    pub async fn bind_address(self, client: &AddressClient) -> Result<Election, ElectionError> {
        let label = self.chan_label();
        let seed = self.content_hash.to_hex();
        let derived = client.get_deterministic_address(&label, &seed).await?;
        if let Some(expected) = &self.params.expected_address {
            if expected.body() != derived.body() {
                return Err(ElectionError::AddressMismatch {
                    expected: expected.clone(),
                    derived,
                });
            }
        }
        debug!(chan = %derived, hash = %self.content_hash, "derived election channel");

        let p = self.params;
        Ok(Election {
            question: p.question,
            answers: p.answers,
            voters: p.voters,
            content_hash: self.content_hash,
            chan_address: derived,
            state: ElectionState::AddressBound,
        })
    }
}

/// A fully identified election.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Election {
    question: String,
    answers: Vec<String>,
    voters: Vec<Address>,
    content_hash: ContentHash,
    chan_address: Address,
    state: ElectionState,
}

impl Election {
    /// Validate, hash and derive in one go.
    pub async fn derive(
        params: ElectionParams,
        client: &AddressClient,
    ) -> Result<Self, ElectionError> {
        params.validate()?.bind_hash()?.bind_address(client).await
    }

    /// Build from stored fields without any verification beyond validation.
    pub fn from_trusted(
        question: impl Into<String>,
        answers: Vec<String>,
        voters: Vec<Address>,
        content_hash: Option<ContentHash>,
        chan_address: Address,
    ) -> Result<Self, ValidationError> {
        let mut params = ElectionParams::new(question, answers, voters);
        params.expected_hash = content_hash;
        Ok(params.validate()?.trust(chan_address))
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn voters(&self) -> &[Address] {
        &self.voters
    }

    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    pub fn chan_address(&self) -> &Address {
        &self.chan_address
    }

    pub fn state(&self) -> ElectionState {
        self.state
    }

    pub fn chan_label(&self) -> String {
        chan_label(&self.question)
    }

    pub(crate) fn set_state(&mut self, state: ElectionState) {
        self.state = state;
    }
}

impl fmt::Display for Election {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Election<{} ({},{},{},{})>",
            self.question,
            self.answers.len(),
            self.voters.len(),
            self.chan_address,
            self.content_hash
        )
    }
}
