use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("address service did not answer {command} within {timeout:?}")]
    Unavailable {
        command: &'static str,
        timeout: Duration,
    },

    #[error("address service has shut down")]
    Closed,

    #[error("address service failed: {0}")]
    Generator(String),

    #[error("{command} returned {count} addresses, expected exactly one")]
    UnexpectedReply { command: &'static str, count: usize },

    #[error("send queue is full")]
    QueueFull,

    #[error("send worker has shut down")]
    QueueClosed,
}
