pub mod client;
pub mod http;
pub mod models;

#[cfg(test)]
pub mod mock;

pub use client::{LedgerClient, ReclaimTxParams, RouteTxParams, ScriptTarget};
pub use http::HttpLedgerClient;
pub use models::{render_refs, ActionIntent, Network, ProcessingMode, RequestRef, TxHash, UnsignedTx};
