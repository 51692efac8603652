//! Request/response port to the deterministic address service.
//!
//! The service runs as an independent worker draining an `mpsc` queue. A
//! caller pushes an [`AddressRequest`] holding the command and a fresh
//! `oneshot` sender, then awaits the matching receiver. The reply channel is
//! the correlation: there is no shared return slot to clear or race on.

use std::time::Duration;

use chanvote_messages::AddressCommand;
use chanvote_types::Address;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ServiceError;

/// One queued command and the channel its answer goes back on.
pub struct AddressRequest {
    pub command: AddressCommand,
    pub reply: oneshot::Sender<Result<Vec<Address>, String>>,
}

/// The backend that actually derives addresses and joins channels.
///
/// Errors are plain strings: the backend is foreign to the core, which only
/// ever reports them.
pub trait AddressGenerator: Send + 'static {
    fn handle(&mut self, command: &AddressCommand) -> Result<Vec<Address>, String>;
}

impl<F> AddressGenerator for F
where
    F: FnMut(&AddressCommand) -> Result<Vec<Address>, String> + Send + 'static,
{
    fn handle(&mut self, command: &AddressCommand) -> Result<Vec<Address>, String> {
        self(command)
    }
}

/// Run `generator` as the worker behind a new [`AddressClient`].
///
/// The worker exits once every client clone has been dropped.
pub fn spawn_address_worker<G: AddressGenerator>(
    mut generator: G,
    capacity: usize,
    timeout: Duration,
) -> (AddressClient, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<AddressRequest>(capacity);
    let handle = tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let result = generator.handle(&request.command);
            if request.reply.send(result).is_err() {
                debug!(
                    command = request.command.name(),
                    "address request abandoned before reply"
                );
            }
        }
        debug!("address worker stopped");
    });
    (AddressClient::new(tx, timeout), handle)
}

/// Handle for issuing address-service calls. Cheap to clone.
#[derive(Clone)]
pub struct AddressClient {
    requests: mpsc::Sender<AddressRequest>,
    timeout: Duration,
}

impl AddressClient {
    pub fn new(requests: mpsc::Sender<AddressRequest>, timeout: Duration) -> Self {
        Self { requests, timeout }
    }

    /// Issue one command and wait for its reply, bounded by the timeout.
    pub async fn call(&self, command: AddressCommand) -> Result<Vec<Address>, ServiceError> {
        let name = command.name();
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = AddressRequest {
            command,
            reply: reply_tx,
        };

        match tokio::time::timeout(self.timeout, self.exchange(request, reply_rx)).await {
            Ok(result) => {
                debug!(command = name, ok = result.is_ok(), "address service replied");
                result
            }
            Err(_) => {
                warn!(command = name, timeout = ?self.timeout, "address service timed out");
                Err(ServiceError::Unavailable {
                    command: name,
                    timeout: self.timeout,
                })
            }
        }
    }

    async fn exchange(
        &self,
        request: AddressRequest,
        reply_rx: oneshot::Receiver<Result<Vec<Address>, String>>,
    ) -> Result<Vec<Address>, ServiceError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| ServiceError::Closed)?;
        reply_rx
            .await
            .map_err(|_| ServiceError::Closed)?
            .map_err(ServiceError::Generator)
    }

    /// Derive exactly one deterministic address.
    pub async fn get_deterministic_address(
        &self,
        label: &str,
        seed: &str,
    ) -> Result<Address, ServiceError> {
        let command = AddressCommand::chan_address(label, seed);
        let name = command.name();
        let mut addresses = self.call(command).await?;
        if addresses.len() != 1 {
            return Err(ServiceError::UnexpectedReply {
                command: name,
                count: addresses.len(),
            });
        }
        Ok(addresses.remove(0))
    }

    /// Join a channel. The caller validates the returned addresses.
    pub async fn join_chan(
        &self,
        chan_address: &Address,
        label: &str,
        seed: &str,
    ) -> Result<Vec<Address>, ServiceError> {
        self.call(AddressCommand::JoinChan {
            chan_address: chan_address.clone(),
            label: label.to_string(),
            seed: seed.to_string(),
        })
        .await
    }
}
