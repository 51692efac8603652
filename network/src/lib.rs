//! Ports from the election core into asynchronous infrastructure.
//!
//! - [`AddressClient`]: request/response calls to the address service. Every
//!   request carries its own reply channel, so concurrent callers can never
//!   receive each other's answers, and every call is bounded by a timeout.
//! - [`SendQueue`]: fire-and-forget handoff of work items to the send worker.

pub mod address_service;
pub mod error;
pub mod send_queue;

pub use address_service::{spawn_address_worker, AddressClient, AddressGenerator, AddressRequest};
pub use error::ServiceError;
pub use send_queue::SendQueue;
