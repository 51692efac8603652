//! Nullable address service: deterministic channel derivation.
//!
//! Addresses are derived from the seed alone: ripe = first 20 bytes of
//! SHA-512(seed), version 4, stream 1. Joining a channel re-derives the
//! address from the seed and echoes it back, so a join for an address that
//! does not match its seed comes back with a different address.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chanvote_crypto::{encode_address, sha512};
use chanvote_messages::{AddressCommand, CHAN_ADDRESS_VERSION, CHAN_STREAM};
use chanvote_network::{spawn_address_worker, AddressClient, AddressGenerator};
use chanvote_types::Address;

/// Shared record of every command the generator handled.
pub type CommandLog = Arc<Mutex<Vec<AddressCommand>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Normal,
    /// `joinChan` answers with an empty list.
    RefuseJoins,
    /// Every command fails.
    Broken,
}

/// A deterministic stand-in for the address service backend.
pub struct NullAddressGenerator {
    mode: Mode,
    log: CommandLog,
}

impl Default for NullAddressGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NullAddressGenerator {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn refusing_joins() -> Self {
        Self {
            mode: Mode::RefuseJoins,
            ..Self::new()
        }
    }

    pub fn broken() -> Self {
        Self {
            mode: Mode::Broken,
            ..Self::new()
        }
    }

    /// Handle on the command log; stays valid after the generator is moved
    /// into a worker.
    pub fn log(&self) -> CommandLog {
        Arc::clone(&self.log)
    }

    /// The address this generator derives for `seed`.
    pub fn derive(seed: &str) -> Address {
        address_from_bytes(seed.as_bytes())
    }
}

impl AddressGenerator for NullAddressGenerator {
    fn handle(&mut self, command: &AddressCommand) -> Result<Vec<Address>, String> {
        self.log.lock().unwrap().push(command.clone());
        if self.mode == Mode::Broken {
            return Err("address service backend offline".to_string());
        }
        match command {
            AddressCommand::GetDeterministicAddress { seed, count, .. } => {
                let mut out = Vec::with_capacity(*count as usize);
                for i in 0..*count {
                    if i == 0 {
                        out.push(Self::derive(seed));
                    } else {
                        out.push(address_from_bytes(format!("{seed}{i}").as_bytes()));
                    }
                }
                Ok(out)
            }
            AddressCommand::JoinChan { seed, .. } => match self.mode {
                Mode::RefuseJoins => Ok(Vec::new()),
                _ => Ok(vec![Self::derive(seed)]),
            },
        }
    }
}

/// Spawn `generator` behind a client with a short timeout.
///
/// Must be called from inside a Tokio runtime.
pub fn null_address_client(generator: NullAddressGenerator) -> (AddressClient, CommandLog) {
    let log = generator.log();
    let (client, _worker) = spawn_address_worker(generator, 16, Duration::from_secs(5));
    (client, log)
}

/// A well-formed version 4 address derived from `name`, for use as a voter.
pub fn test_address(name: &str) -> Address {
    address_from_bytes(name.as_bytes())
}

fn address_from_bytes(data: &[u8]) -> Address {
    let digest = sha512(data);
    let mut ripe = [0u8; 20];
    ripe.copy_from_slice(&digest[..20]);
    encode_address(CHAN_ADDRESS_VERSION, CHAN_STREAM, &ripe)
        .expect("sha-512 prefix leaves at least four significant bytes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_match_reference_vectors() {
        assert_eq!(
            test_address("alice").as_str(),
            "BM-87YKYCH5zAiq9X14gzeu6odtF63eYnj5ifz"
        );
        assert_eq!(
            test_address("bob").as_str(),
            "BM-87Sot4jroKs3h4pbXF9h7PPWXU1YNWNrzye"
        );
    }

    #[tokio::test]
    async fn join_echoes_the_seed_derived_address() {
        let (client, log) = null_address_client(NullAddressGenerator::new());
        let chan = client
            .get_deterministic_address("[vote] Q", "seed")
            .await
            .unwrap();
        let joined = client.join_chan(&chan, "[vote] Q", "seed").await.unwrap();
        assert_eq!(joined, vec![chan]);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn refusing_generator_returns_nothing_on_join() {
        let (client, _) = null_address_client(NullAddressGenerator::refusing_joins());
        let chan = NullAddressGenerator::derive("seed");
        let joined = client.join_chan(&chan, "[vote] Q", "seed").await.unwrap();
        assert!(joined.is_empty());
    }
}
