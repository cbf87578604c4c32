//! The source-chain explorer boundary: the UTXO query interface and its HTTP implementation.

use async_trait::async_trait;
use bitcoin::{Amount, ScriptBuf, Txid};
use serde::Deserialize;

use crate::errors::ScanError;

/// One unspent output of the watched address, as reported by the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoEntry {
    /// The transaction id holding the output.
    pub txid: Txid,

    /// The output index within the transaction.
    pub vout: u32,

    /// The output amount.
    pub amount: Amount,

    /// The output's locking script, used to classify staking outputs.
    pub script_pubkey: ScriptBuf,

    /// The block height the transaction confirmed at, zero while unconfirmed.
    pub block_height: u64,

    /// Confirmations at the time of the query.
    pub confirmations: u64,
}

/// Query interface for unspent outputs of an address.
#[async_trait]
pub trait UtxoSource: Send + Sync {
    /// All unspent outputs currently locked to `address`.
    async fn get_utxos(&self, address: &str) -> Result<Vec<UtxoEntry>, ScanError>;
}

/// Wire shape of one UTXO in the explorer's JSON response.
#[derive(Debug, Deserialize)]
struct RawUtxo {
    txid: String,
    vout: u32,
    value: u64,
    script_pubkey: String,
    #[serde(default)]
    block_height: u64,
    #[serde(default)]
    confirmations: u64,
}

impl RawUtxo {
    fn into_entry(self) -> Result<UtxoEntry, ScanError> {
        let txid: Txid = self
            .txid
            .parse()
            .map_err(|_| ScanError::MalformedResponse(format!("bad txid: {}", self.txid)))?;
        let script_pubkey = ScriptBuf::from_hex(&self.script_pubkey).map_err(|_| {
            ScanError::MalformedResponse(format!("bad script: {}", self.script_pubkey))
        })?;

        Ok(UtxoEntry {
            txid,
            vout: self.vout,
            amount: Amount::from_sat(self.value),
            script_pubkey,
            block_height: self.block_height,
            confirmations: self.confirmations,
        })
    }
}

/// Explorer client speaking the REST dialect of esplora-style block explorers
/// (`GET <base>/address/<addr>/utxo`).
#[derive(Debug, Clone)]
pub struct HttpExplorerClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExplorerClient {
    /// Creates a client against the given explorer base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl UtxoSource for HttpExplorerClient {
    async fn get_utxos(&self, address: &str) -> Result<Vec<UtxoEntry>, ScanError> {
        let url = format!("{}/address/{}/utxo", self.base_url, address);
        let raw: Vec<RawUtxo> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        raw.into_iter().map(RawUtxo::into_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_utxo_parses_into_entry() {
        let raw: RawUtxo = serde_json::from_str(
            r#"{
                "txid": "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b",
                "vout": 0,
                "value": 250000000,
                "script_pubkey": "0020000102030405060708090a0b0c0d0e0f000102030405060708090a0b0c0d0e0f",
                "block_height": 840000,
                "confirmations": 6
            }"#,
        )
        .unwrap();

        let entry = raw.into_entry().unwrap();
        assert_eq!(entry.vout, 0);
        assert_eq!(entry.amount, Amount::from_sat(250_000_000));
        assert!(entry.script_pubkey.is_p2wsh());
        assert_eq!(entry.confirmations, 6);
    }

    #[test]
    fn bad_txid_is_a_malformed_response() {
        let raw = RawUtxo {
            txid: "nonsense".to_string(),
            vout: 0,
            value: 1,
            script_pubkey: "51".to_string(),
            block_height: 0,
            confirmations: 0,
        };
        assert!(matches!(
            raw.into_entry(),
            Err(ScanError::MalformedResponse(_))
        ));
    }
}
