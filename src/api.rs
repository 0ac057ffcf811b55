//! HTTP routing for a served network.
//!
//! Routes:
//!   GET  /api/network/state  - current snapshot
//!   POST /api/network/train  - `{"patterns": [...], "epochs": n}`
//!   POST /api/network/reset  - optional `{"topology": [..]}`
//!
//! Caller mistakes answer 400, unknown routes 404, and a poisoned network
//! 500.

use crate::error::Result;
use crate::service::{NetworkService, ResetRequest, TrainingRequest};
use crate::state::NetworkState;

use std::io::Read;

use serde::de::DeserializeOwned;
use tiny_http::Method;

/// Largest request body read before it is rejected.
pub const MAX_BODY_BYTES: u64 = 1 << 20;

/// A status code and body, ready to send.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn new<S: Into<String>>(status: u16, body: S) -> Self {
        Reply {
            status,
            body: body.into(),
        }
    }
}

/// Reads at most `limit` bytes of request body.
pub fn read_body<R: Read>(reader: R, limit: u64) -> std::result::Result<String, Reply> {
    let mut content = String::new();
    reader
        .take(limit + 1)
        .read_to_string(&mut content)
        .map_err(|e| Reply::new(400, e.to_string()))?;
    if content.len() as u64 > limit {
        return Err(Reply::new(
            413,
            format!("request body exceeds {} bytes", limit),
        ));
    }
    Ok(content)
}

/// Dispatches one request against `service`.
pub fn respond(service: &NetworkService, method: &Method, url: &str, body: &str) -> Reply {
    let path = url.split('?').next().unwrap_or("");
    match (method, path) {
        (Method::Options, _) => Reply::new(204, ""),
        (Method::Get, "/api/network/state") => reply(service.state()),
        (Method::Post, "/api/network/train") => match parse::<TrainingRequest>(body) {
            Ok(Some(train)) => reply(service.train(&train)),
            Ok(None) => Reply::new(400, "No training patterns provided"),
            Err(e) => e,
        },
        (Method::Post, "/api/network/reset") => match parse::<ResetRequest>(body) {
            Ok(reset) => {
                let reset = reset.unwrap_or_default();
                reply(service.reset(reset.topology.as_deref()))
            }
            Err(e) => e,
        },
        _ => Reply::new(404, "Not Found"),
    }
}

/// Parses a JSON body, or returns `None` if it is empty.
fn parse<T: DeserializeOwned>(body: &str) -> std::result::Result<Option<T>, Reply> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| Reply::new(400, e.to_string()))
}

fn reply(result: Result<NetworkState>) -> Reply {
    match result {
        Ok(state) => match serde_json::to_string(&state) {
            Ok(body) => Reply::new(200, body),
            Err(e) => Reply::new(500, e.to_string()),
        },
        Err(e) if e.is_bad_request() => Reply::new(400, e.to_string()),
        Err(e) => Reply::new(500, e.to_string()),
    }
}
