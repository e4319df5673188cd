use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::config::LedgerSettings;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::client::{LedgerClient, ReclaimTxParams, RouteTxParams, ScriptTarget};
use crate::ledger::models::{RequestRef, TxHash, UnsignedTx};

#[derive(Debug, Deserialize)]
struct AddressResponse {
    address: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    tx_hash: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    tx_cbor: &'a str,
}

/// Which kind of failure a non-2xx response maps to
#[derive(Debug, Clone, Copy)]
enum CallKind {
    Query,
    Build,
    Submit,
}

impl CallKind {
    fn into_error(self, message: String) -> LedgerError {
        match self {
            CallKind::Query => LedgerError::Query(message),
            CallKind::Build => LedgerError::Build(message),
            CallKind::Submit => LedgerError::Submit(message),
        }
    }
}

/// Ledger collaborator reached over HTTP.
///
/// Talks JSON to a transaction-building service that owns the operator
/// wallet, the chain provider and the smart handles off-chain logic.
pub struct HttpLedgerClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpLedgerClient {
    pub fn new(settings: &LedgerSettings) -> LedgerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request = self.client.post(url);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn call<B, T>(&self, path: &str, body: &B, kind: CallKind) -> LedgerResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}{}", self.base_url, path);
        let response = self.post(path).json(body).send().await?;
        Self::decode(response, kind).await
    }

    async fn decode<T: DeserializeOwned>(response: Response, kind: CallKind) -> LedgerResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        // Prefer the service's own message, fall back to the raw body
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if text.is_empty() => status.to_string(),
            Err(_) => format!("{}: {}", status, text),
        };
        Err(kind.into_error(message))
    }
}

/// Every reference must name a real transaction output; one malformed entry
/// rejects the whole listing.
fn checked_candidates(candidates: Vec<RequestRef>) -> LedgerResult<Vec<RequestRef>> {
    candidates
        .into_iter()
        .map(|candidate| {
            candidate
                .to_string()
                .parse::<RequestRef>()
                .map_err(|e| LedgerError::InvalidResponse(e.to_string()))
        })
        .collect()
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn monitored_address(&self, target: ScriptTarget<'_>) -> LedgerResult<String> {
        let response: AddressResponse = self.call("/address", &target, CallKind::Query).await?;
        Ok(response.address)
    }

    async fn fetch_candidates(&self, target: ScriptTarget<'_>) -> LedgerResult<Vec<RequestRef>> {
        let candidates: Vec<RequestRef> = self.call("/requests", &target, CallKind::Query).await?;
        checked_candidates(candidates)
    }

    async fn build_route(&self, params: RouteTxParams<'_>) -> LedgerResult<UnsignedTx> {
        self.call("/tx/route", &params, CallKind::Build).await
    }

    async fn build_reclaim(&self, params: ReclaimTxParams<'_>) -> LedgerResult<UnsignedTx> {
        self.call("/tx/reclaim", &params, CallKind::Build).await
    }

    async fn sign_and_submit(&self, tx: UnsignedTx) -> LedgerResult<TxHash> {
        let body = SubmitBody {
            tx_cbor: &tx.tx_cbor,
        };
        let response: SubmitResponse = self.call("/tx/submit", &body, CallKind::Submit).await?;
        Ok(TxHash(response.tx_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::models::{Network, ProcessingMode};
    use serde_json::json;

    fn settings(url: &str) -> LedgerSettings {
        LedgerSettings {
            url: url.to_string(),
            api_key: None,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_base_url_is_normalised() {
        let client = HttpLedgerClient::new(&settings("http://localhost:3030/")).unwrap();
        assert_eq!(client.base_url, "http://localhost:3030");
    }

    #[test]
    fn test_route_params_wire_format() {
        let requests = vec![RequestRef::new("aa", 0), RequestRef::new("bb", 2)];
        let simple = json!({ "fee": 1_000_000 });
        let params = RouteTxParams {
            target: ScriptTarget {
                network: Network::Preprod,
                mode: ProcessingMode::Batch,
                script_cbor: "4e4d01",
            },
            requests: &requests,
            route_address: "addr_test1xyz",
            simple_route_config: Some(&simple),
            advanced_route_config: None,
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "network": "Preprod",
                "mode": "Batch",
                "script_cbor": "4e4d01",
                "requests": [
                    { "tx_hash": "aa", "output_index": 0 },
                    { "tx_hash": "bb", "output_index": 2 }
                ],
                "route_address": "addr_test1xyz",
                "simple_route_config": { "fee": 1_000_000 }
            })
        );
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            CallKind::Build.into_error("boom".into()),
            LedgerError::Build("boom".into())
        );
        assert_eq!(
            CallKind::Submit.into_error("bad".into()),
            LedgerError::Submit("bad".into())
        );
    }

    #[test]
    fn test_candidates_are_checked() {
        let hash = "9F3C01AB5D2E4F60718293A4B5C6D7E8F90112233445566778899AABBCCD77E2";
        let checked = checked_candidates(vec![RequestRef::new(hash, 1)]).unwrap();
        assert_eq!(checked, vec![RequestRef::new(hash.to_lowercase(), 1)]);

        let result = checked_candidates(vec![
            RequestRef::new(hash, 0),
            RequestRef::new("not-a-hash", 0),
        ]);
        match result {
            Err(LedgerError::InvalidResponse(message)) => {
                assert!(message.contains("not-a-hash#0"))
            }
            other => panic!("expected invalid response, got {:?}", other),
        }

        assert!(checked_candidates(Vec::new()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // Nothing listens on port 9 locally
        let client = HttpLedgerClient::new(&settings("http://127.0.0.1:9")).unwrap();
        let target = ScriptTarget {
            network: Network::Mainnet,
            mode: ProcessingMode::Single,
            script_cbor: "00",
        };

        let result = client.fetch_candidates(target).await;
        assert!(matches!(result, Err(LedgerError::Transport(_))));
    }
}
