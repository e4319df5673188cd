use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Length in bytes of a transaction hash.
const TX_HASH_BYTES: usize = 32;

/// Network the monitored script lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Network {
    #[default]
    Mainnet,
    Preprod,
    Preview,
    Custom,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "Mainnet",
            Network::Preprod => "Preprod",
            Network::Preview => "Preview",
            Network::Custom => "Custom",
        }
    }
}

/// How requests are laid out on-chain, and therefore how they get settled.
///
/// `Single` requests each sit at a per-request validator address and are
/// spent one transaction at a time. `Batch` requests are guarded by a
/// staking-credential-scoped validator and are settled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessingMode {
    Single,
    Batch,
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Single => "single",
            ProcessingMode::Batch => "batch",
        }
    }
}

/// What the operator does with the requests it finds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionIntent {
    /// Fulfill the request and collect the router fee
    Route,
    /// Cancel the request, pay its owner back and collect the reclaim fee
    Reclaim,
}

impl fmt::Display for ActionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ActionIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionIntent::Route => "route",
            ActionIntent::Reclaim => "reclaim",
        }
    }
}

/// Pointer to a pending request UTxO: `(transaction hash, output index)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestRef {
    pub tx_hash: String,
    pub output_index: u32,
}

impl RequestRef {
    pub fn new(tx_hash: impl Into<String>, output_index: u32) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            output_index,
        }
    }

    /// Abbreviated form used when several references share one log line,
    /// e.g. `9f3c01ab..77e2#1`.
    pub fn short(&self) -> String {
        let hash = self.tx_hash.as_str();
        if hash.len() <= 12 || !hash.is_ascii() {
            return self.to_string();
        }
        format!(
            "{}..{}#{}",
            &hash[..8],
            &hash[hash.len() - 4..],
            self.output_index
        )
    }
}

impl fmt::Display for RequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tx_hash, self.output_index)
    }
}

impl FromStr for RequestRef {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hash, index) = s
            .split_once('#')
            .ok_or_else(|| LedgerError::InvalidReference(s.to_string()))?;

        let bytes =
            hex::decode(hash).map_err(|_| LedgerError::InvalidReference(s.to_string()))?;
        if bytes.len() != TX_HASH_BYTES {
            return Err(LedgerError::InvalidReference(s.to_string()));
        }

        let output_index = index
            .parse::<u32>()
            .map_err(|_| LedgerError::InvalidReference(s.to_string()))?;

        Ok(Self::new(hash.to_lowercase(), output_index))
    }
}

/// Renders a set of references for a log line: the full form for a lone
/// reference, short forms joined by `", "` otherwise.
pub fn render_refs(refs: &[RequestRef]) -> String {
    match refs {
        [] => String::new(),
        [only] => only.to_string(),
        many => many
            .iter()
            .map(RequestRef::short)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Unsigned transaction returned by the builder, as CBOR hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTx {
    pub tx_cbor: String,
}

/// Hash of a transaction accepted by the network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
