//! Fallbacks for optional runtime settings.

/// Number of tokio worker threads when the config does not set one.
pub(crate) const DEFAULT_THREAD_COUNT: u8 = 4;

/// Stack size per worker thread (8 MiB) when the config does not set one.
pub(crate) const DEFAULT_THREAD_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Capacity of the scanner-to-relay candidate queue.
pub(crate) const CANDIDATE_QUEUE_SIZE: usize = 64;

/// Capacity of the relay-to-staking delegation queue.
pub(crate) const DELEGATION_QUEUE_SIZE: usize = 64;

/// Capacity of the broadcast event bus.
pub(crate) const EVENT_BUS_SIZE: usize = 256;
