//! Common test utilities for the engine
//!
//! [`ScriptedClient`] answers from a fixed table and appends every call to a
//! [`CallLog`] that can be shared between the A and B clients, so tests can
//! check both what each server received and in which order.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use deltapi_core::{Clock, Verb};
use deltapi_engine::{ClientError, HttpClient, HttpResponse, RunControl};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request seen by a scripted client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub client: String,
    pub verb: Verb,
    pub url: String,
    pub body: Option<String>,
}

/// Ordered log of calls shared between clients
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }
}

/// In-memory client answering from a table keyed by verb and URL
///
/// Unscripted requests get a 404 with an empty body.
pub struct ScriptedClient {
    name: String,
    log: CallLog,
    responses: HashMap<(Verb, String), Result<HttpResponse, ClientError>>,
    latency: Duration,
}

impl ScriptedClient {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            responses: HashMap::new(),
            latency: Duration::ZERO,
        }
    }

    /// Answer `verb url` with a status and raw body
    pub fn respond(mut self, verb: Verb, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert((verb, url.to_string()), Ok(HttpResponse::new(status, body)));
        self
    }

    /// Fail `verb url` with a transport error
    pub fn fail(mut self, verb: Verb, url: &str, error: ClientError) -> Self {
        self.responses.insert((verb, url.to_string()), Err(error));
        self
    }

    /// Delay every answer
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn shared(self) -> Arc<dyn HttpClient> {
        Arc::new(self)
    }

    async fn answer(
        &self,
        verb: Verb,
        url: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ClientError> {
        self.log.push(Call {
            client: self.name.clone(),
            verb,
            url: url.to_string(),
            body,
        });

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.responses
            .get(&(verb, url.to_string()))
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, ClientError> {
        self.answer(Verb::Get, url, None).await
    }

    async fn put(&self, url: &str, body: String) -> Result<HttpResponse, ClientError> {
        self.answer(Verb::Put, url, Some(body)).await
    }

    async fn post(&self, url: &str, body: String) -> Result<HttpResponse, ClientError> {
        self.answer(Verb::Post, url, Some(body)).await
    }

    async fn delete(&self, url: &str) -> Result<HttpResponse, ClientError> {
        self.answer(Verb::Delete, url, None).await
    }

    async fn patch(&self, url: &str, body: String) -> Result<HttpResponse, ClientError> {
        self.answer(Verb::Patch, url, Some(body)).await
    }
}

/// Clock that advances by one second on every reading
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }

    pub fn default_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + chrono::Duration::seconds(1);
        now
    }
}

/// Wait until `control` reports the paused state
pub async fn wait_until_paused(control: &RunControl) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !control.is_paused() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("run did not pause in time");
}
