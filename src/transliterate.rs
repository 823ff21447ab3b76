/*!
 * Remote transliteration suggestions.
 *
 * The lookup service is an external collaborator; the core only promises a
 * bounded wait. A request that does not answer within the configured window
 * degrades to an empty suggestion list with a caller-visible timeout, and
 * issuing a new request aborts one still in flight.
 */

use std::time::Duration;

use anyhow::{anyhow, Result};
use futures::future::{AbortHandle, Abortable};
use log::{debug, warn};
use serde_json::Value;

const DEFAULT_ENDPOINT: &str = "https://inputtools.google.com/request";

/// What a lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionReply {
    /// Candidate completions, best first (possibly empty)
    Suggestions(Vec<String>),
    /// The service did not answer within the timeout window
    TimedOut,
}

/// Client for the transliteration suggestion service.
#[derive(Debug)]
pub struct TransliterationClient {
    http: reqwest::Client,
    endpoint: String,
    timeout_ms: u64,
    in_flight: Option<AbortHandle>,
}

impl TransliterationClient {
    /// Client against the default public endpoint.
    pub fn new(timeout_ms: u64) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, timeout_ms)
    }

    /// Client against a custom endpoint, mainly for tests.
    pub fn with_endpoint(endpoint: &str, timeout_ms: u64) -> Self {
        TransliterationClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout_ms,
            in_flight: None,
        }
    }

    /// Look up suggestions for `input` in the given language. Aborts any
    /// request still in flight before issuing this one. An aborted or timed
    /// out request never fails the caller; only transport errors do.
    pub async fn lookup(&mut self, input: &str, lang_code: &str) -> Result<SuggestionReply> {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let request = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("text", input),
                ("itc", &format!("{}-t-i0-und", lang_code)),
                ("num", "10"),
                ("cp", "0"),
                ("cs", "1"),
                ("ie", "utf-8"),
                ("oe", "utf-8"),
            ])
            .send();

        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        self.in_flight = Some(abort_handle);
        let abortable = Abortable::new(request, abort_registration);

        let reply = tokio::select! {
            outcome = abortable => match outcome {
                Ok(Ok(response)) => {
                    let body: Value = response
                        .json()
                        .await
                        .map_err(|e| anyhow!("Failed to parse suggestion reply: {}", e))?;
                    SuggestionReply::Suggestions(parse_suggestions(&body))
                }
                Ok(Err(e)) => return Err(anyhow!("Suggestion request failed: {}", e)),
                // Superseded by a newer request
                Err(_) => SuggestionReply::Suggestions(Vec::new()),
            },
            _ = tokio::time::sleep(Duration::from_millis(self.timeout_ms)) => {
                warn!("Suggestion lookup timed out after {} ms", self.timeout_ms);
                SuggestionReply::TimedOut
            }
        };

        self.in_flight = None;
        debug!("Suggestion lookup for {:?}: {:?}", input, reply);
        Ok(reply)
    }
}

/// Pull the candidate list out of the service's reply shape:
/// `["SUCCESS", [[input, [candidates...], ...]]]`.
fn parse_suggestions(body: &Value) -> Vec<String> {
    body.get(1)
        .and_then(|v| v.get(0))
        .and_then(|v| v.get(1))
        .and_then(Value::as_array)
        .map(|candidates| {
            candidates
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
