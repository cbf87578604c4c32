//! Identifier and address newtypes used across the bridge, together with small time helpers.

use std::{
    fmt::{self, Display},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

/// Index of a finality provider, e.g. `fp1`.
pub type ProviderId = String;

/// An amount in the smallest source-chain unit (sats).
pub type Sats = u64;

/// A source-chain transaction id as tracked by the relay.
///
/// Real ids are the canonical 64-character lowercase hex encoding. Ids carrying the `test-`
/// prefix are accepted as well so that integration environments can inject synthetic deposits
/// without mining real transactions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepositTxId(String);

/// Prefix that marks a synthetic transaction id accepted outside the strict hex format.
pub const TEST_TXID_PREFIX: &str = "test-";

impl DepositTxId {
    /// Wraps a raw transaction id string without validating it.
    ///
    /// Validation happens at the relay's intake gate via [`Self::is_wellformed`] so that a
    /// malformed id is observable (and reportable) instead of being unrepresentable.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Whether the id matches the strict 64-hex format or the recognized test prefix.
    pub fn is_wellformed(&self) -> bool {
        let id = self.0.as_str();
        let is_hex = id.len() == 64
            && id
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        is_hex || (id.len() > TEST_TXID_PREFIX.len() && id.starts_with(TEST_TXID_PREFIX))
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DepositTxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DepositTxId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A destination-chain account address (20-byte EVM address, `0x`-prefixed hex).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvmAddress(String);

impl EvmAddress {
    /// Wraps a raw address string without validating it.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Whether the address matches the `0x` + 40-hex-character destination format.
    pub fn is_wellformed(&self) -> bool {
        let addr = self.0.as_str();
        addr.len() == 42
            && addr.starts_with("0x")
            && addr[2..].bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// The raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EvmAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Key of a single source-chain output, used by the scanner's seen-output set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    /// The transaction id of the output.
    pub txid: DepositTxId,

    /// The output index within the transaction.
    pub vout: u32,
}

impl Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// The current unix time in whole seconds.
///
/// # Panics
///
/// If the system clock reads before the unix epoch.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must read after the unix epoch")
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txid_wellformed_accepts_canonical_hex() {
        let txid = DepositTxId::new("a".repeat(64));
        assert!(txid.is_wellformed());
    }

    #[test]
    fn txid_wellformed_rejects_uppercase_and_short_ids() {
        assert!(!DepositTxId::new("A".repeat(64)).is_wellformed());
        assert!(!DepositTxId::new("abc123").is_wellformed());
        assert!(!DepositTxId::new("").is_wellformed());
    }

    #[test]
    fn txid_wellformed_accepts_test_prefix() {
        assert!(DepositTxId::new("test-deposit-1").is_wellformed());
        assert!(!DepositTxId::new("test-").is_wellformed());
    }

    #[test]
    fn evm_address_wellformed() {
        assert!(EvmAddress::new(format!("0x{}", "ab".repeat(20))).is_wellformed());
        assert!(!EvmAddress::new("0x1234").is_wellformed());
        assert!(!EvmAddress::new(format!("1x{}", "ab".repeat(20))).is_wellformed());
    }

    #[test]
    fn output_ref_display_is_colon_separated() {
        let output = OutputRef {
            txid: DepositTxId::new("test-tx"),
            vout: 2,
        };
        assert_eq!(output.to_string(), "test-tx:2");
    }

    #[test]
    fn txid_serde_is_transparent() {
        let txid = DepositTxId::new("test-tx");
        let serialized = serde_json::to_string(&txid).unwrap();
        assert_eq!(serialized, "\"test-tx\"");

        let deserialized: DepositTxId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, txid);
    }
}
