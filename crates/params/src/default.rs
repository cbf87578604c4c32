//! Default values for all bridge parameters.

/// Minimum oracle confidence for a deposit to pass validation.
pub const CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Maximum register+mint attempts before a deposit is marked failed.
pub const MAX_RELAY_ATTEMPTS: u32 = 3;

/// Base delay of the exponential backoff between relay attempts, in milliseconds.
pub const BACKOFF_BASE_MS: u64 = 1_000;

/// Ceiling of the exponential backoff between relay attempts, in milliseconds.
pub const BACKOFF_CAP_MS: u64 = 10_000;

/// How long to wait for a transaction receipt before treating the call as failed, in seconds.
pub const RECEIPT_TIMEOUT_SECS: u64 = 120;

/// Interval between receipt polls, in milliseconds.
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 500;

/// Interval between scans of the watched source-chain address, in seconds.
pub const SCAN_INTERVAL_SECS: u64 = 30;

/// The lock duration applied to detected deposits, in seconds (one day).
pub const LOCK_DURATION_SECS: u64 = 86_400;

/// Minimum confirmations for a source-chain output to be considered.
pub const MIN_CONFIRMATIONS: u64 = 1;

/// Base annual reward rate applied to active positions.
pub const BASE_ANNUAL_RATE: f64 = 0.05;

/// Base slashing rate; halved for minor-severity incidents.
pub const BASE_SLASHING_RATE: f64 = 0.05;

/// A severity draw above this threshold makes a slashing incident major.
pub const MAJOR_SEVERITY_THRESHOLD: f64 = 0.7;

/// Reputation points subtracted from a provider on every slashing incident.
pub const REPUTATION_SLASH_PENALTY: f64 = 10.0;

/// Interval between reward distributions, in seconds (one hour).
pub const REWARD_INTERVAL_SECS: u64 = 3_600;

/// Interval between slashing checks, in seconds (thirty minutes).
pub const SLASHING_INTERVAL_SECS: u64 = 1_800;

/// Duration of one epoch, in seconds (one hour).
pub const EPOCH_DURATION_SECS: u64 = 3_600;
