//! A scripted in-memory transport for testing.
//!
//! Responses are replayed in the order they were queued. Every request is
//! recorded so tests can inspect exactly what would have gone over the wire.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::TransportError;
use crate::{HttpResponse, Result, Transport};

/// One request as it would have been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub body: Vec<u8>,
}

#[derive(Debug)]
struct Scripted {
    delay: Option<Duration>,
    outcome: Result<HttpResponse>,
}

/// Transport that answers from a queue of canned outcomes.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub async fn respond(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.push(None, Ok(HttpResponse::new(status, body))).await;
    }

    /// Queue a response that arrives only after `delay`.
    pub async fn respond_after(&self, delay: Duration, status: u16, body: impl Into<Vec<u8>>) {
        self.push(Some(delay), Ok(HttpResponse::new(status, body)))
            .await;
    }

    /// Queue a delivery failure.
    pub async fn fail(&self, error: TransportError) {
        self.push(None, Err(error)).await;
    }

    async fn push(&self, delay: Option<Duration>, outcome: Result<HttpResponse>) {
        self.script
            .lock()
            .await
            .push_back(Scripted { delay, outcome });
    }

    /// Requests seen so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse> {
        self.requests.lock().await.push(RecordedRequest {
            url: url.to_string(),
            body,
        });

        let next = self.script.lock().await.pop_front();
        match next {
            Some(Scripted { delay, outcome }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                outcome
            }
            None => Err(TransportError::Connect("no scripted response".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "first").await;
        transport
            .fail(TransportError::Timeout("read".into()))
            .await;

        let first = transport
            .post_json("https://a.example/create", b"{}".to_vec())
            .await
            .unwrap();
        assert_eq!(first.body, b"first");
        assert!(first.is_success());

        let second = transport
            .post_json("https://a.example/create", b"{\"x\":1}".to_vec())
            .await;
        assert!(second.unwrap_err().is_timeout());

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].body, b"{\"x\":1}");
    }

    #[tokio::test]
    async fn test_empty_script_is_connect_error() {
        let transport = ScriptedTransport::new();
        assert!(matches!(
            transport.post_json("https://a.example", Vec::new()).await,
            Err(TransportError::Connect(_))
        ));
    }
}
