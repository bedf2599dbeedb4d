// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for blockwatt integration tests
//!
//! Provides a scripted [`ExplorerTransport`] and payload builders so the
//! data-access and energy layers can be tested without a real explorer.

#![allow(dead_code)]

use async_trait::async_trait;
use blockwatt::{ExplorerConfig, ExplorerConfigBuilder, ExplorerTransport, HttpResponse, TransportError};
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

enum Outcome {
    Json(Value),
    Status(u16),
}

struct Route {
    pattern: String,
    outcome: Outcome,
}

/// Mock transport answering from a list of scripted routes
///
/// A request is answered by the first route whose pattern is a substring of
/// the requested path. Unmatched paths get a 404. Every request is recorded.
///
/// # Example
///
/// ```rust,ignore
/// let transport = MockTransport::new()
///     .respond("rawtx/abc", tx_json("abc", 250, OLD_TIME))
///     .fail("rawtx/bad", 500);
/// ```
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers paths containing `pattern` with a 200 and `body`
    pub fn respond(mut self, pattern: impl Into<String>, body: Value) -> Self {
        self.routes.push(Route {
            pattern: pattern.into(),
            outcome: Outcome::Json(body),
        });
        self
    }

    /// Answers paths containing `pattern` with an error status
    pub fn fail(mut self, pattern: impl Into<String>, status: u16) -> Self {
        self.routes.push(Route {
            pattern: pattern.into(),
            outcome: Outcome::Status(status),
        });
        self
    }

    /// Every requested path, in request order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests whose path contains `pattern`
    pub fn call_count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|p| p.contains(pattern)).count()
    }
}

#[async_trait]
impl ExplorerTransport for MockTransport {
    async fn request(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(path.to_string());

        let outcome = self
            .routes
            .iter()
            .find(|route| path.contains(&route.pattern))
            .map(|route| &route.outcome);

        match outcome {
            Some(Outcome::Json(body)) => Ok(HttpResponse {
                body: body.clone(),
                headers: HeaderMap::new(),
                status: 200,
            }),
            Some(Outcome::Status(status)) => Err(TransportError::Status {
                url: path.to_string(),
                status: *status,
                retry_after: None,
            }),
            None => Err(TransportError::Status {
                url: path.to_string(),
                status: 404,
                retry_after: None,
            }),
        }
    }
}

/// A block time safely in the past (2023-11-14)
pub const OLD_TIME: i64 = 1_700_000_000;

pub fn tx_json(hash: &str, size: u64, time: i64) -> Value {
    json!({"hash": hash, "size": size, "time": time, "fee": 0})
}

pub fn block_json(hash: &str, size: u64, time: i64, txs: &[(&str, u64)]) -> Value {
    let tx: Vec<Value> = txs
        .iter()
        .map(|(tx_hash, tx_size)| tx_json(tx_hash, *tx_size, time))
        .collect();
    json!({"hash": hash, "size": size, "time": time, "block_index": 1, "tx": tx})
}

pub fn day_listing_json(hashes: &[&str]) -> Value {
    Value::Array(
        hashes
            .iter()
            .map(|hash| json!({"hash": hash, "time": OLD_TIME, "block_index": 1}))
            .collect(),
    )
}

pub fn wallet_json(address: &str, n_tx: u64, txs: &[(&str, u64)]) -> Value {
    let txs: Vec<Value> = txs
        .iter()
        .map(|(hash, size)| tx_json(hash, *size, OLD_TIME))
        .collect();
    json!({"address": address, "n_tx": n_tx, "final_balance": 0, "txs": txs})
}

/// Default configuration without pacing
pub fn test_config() -> ExplorerConfig {
    test_config_builder().build()
}

pub fn test_config_builder() -> ExplorerConfigBuilder {
    ExplorerConfigBuilder::new()
        .min_request_interval(Duration::ZERO)
        .retry_base_delay(Duration::from_millis(10))
}
