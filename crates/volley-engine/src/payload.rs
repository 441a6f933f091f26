// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Continuation payloads carried in the callback path.
//!
//! A payload is a JSON object encoded as URL-safe base64 so it can sit in a
//! single path segment. The decoder also accepts the standard alphabet.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde_json::{Map, Value};
use volley_core::VolleyError;

/// Key holding the part of a delay not yet waited out.
pub const REMAINING_TIMEOUT_KEY: &str = "remaining_timeout_seconds";
/// Key naming the business action to run when the wait is over.
pub const METHOD_KEY: &str = "method";
pub const BLAST_ID_KEY: &str = "blast_id";
/// Recipient index the continuation expects to send to.
pub const INDEX_KEY: &str = "index";
/// Method value that advances a blast by one recipient.
pub const ITERATE_BLAST: &str = "iterate_blast";

/// Path prefix the scheduler calls back on.
pub const TIMEOUT_PATH_PREFIX: &str = "/timeout/";

/// Free-form continuation parameters.
pub type Params = Map<String, Value>;

/// Parameters that resume blast `blast_id` at recipient `index`.
pub fn iterate_blast_params(blast_id: &str, index: i64) -> Params {
    let mut params = Params::new();
    params.insert(METHOD_KEY.to_string(), Value::from(ITERATE_BLAST));
    params.insert(BLAST_ID_KEY.to_string(), Value::from(blast_id));
    params.insert(INDEX_KEY.to_string(), Value::from(index));
    params
}

pub fn encode(params: &Params) -> Result<String, VolleyError> {
    let json = serde_json::to_vec(params).map_err(|e| VolleyError::Payload(e.to_string()))?;
    Ok(URL_SAFE.encode(json))
}

pub fn decode(encoded: &str) -> Result<Params, VolleyError> {
    let encoded = encoded.trim_matches('/');
    let bytes = URL_SAFE
        .decode(encoded)
        .or_else(|_| STANDARD.decode(encoded))
        .map_err(|e| VolleyError::Payload(format!("not base64: {e}")))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(VolleyError::Payload(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(VolleyError::Payload(format!("not JSON: {e}"))),
    }
}

/// Callback path for `params`.
pub fn request_path(params: &Params) -> Result<String, VolleyError> {
    Ok(format!("{TIMEOUT_PATH_PREFIX}{}", encode(params)?))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What a decoded payload asks the service to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// Keep waiting: reschedule `params` after `remaining_secs`.
    Wait { params: Params, remaining_secs: u64 },
    /// Advance a blast by one recipient.
    ///
    /// `index` is absent only in hand-built payloads; such a step runs
    /// against whatever the cursor says.
    IterateBlast {
        blast_id: String,
        index: Option<i64>,
    },
    /// Nothing to do; `reason` is logged.
    Ignore { reason: String },
}

impl Continuation {
    /// Route decoded parameters.
    pub fn classify(mut params: Params) -> Continuation {
        if let Some(remaining) = params.remove(REMAINING_TIMEOUT_KEY) {
            return match remaining.as_u64() {
                Some(remaining_secs) => Continuation::Wait {
                    params,
                    remaining_secs,
                },
                None => Continuation::Ignore {
                    reason: format!("invalid {REMAINING_TIMEOUT_KEY}: {remaining}"),
                },
            };
        }

        match params.get(METHOD_KEY).and_then(Value::as_str) {
            Some(ITERATE_BLAST) => {
                let Some(blast_id) = params.get(BLAST_ID_KEY).and_then(Value::as_str) else {
                    return Continuation::Ignore {
                        reason: format!("{ITERATE_BLAST} without {BLAST_ID_KEY}"),
                    };
                };
                let index = match params.get(INDEX_KEY) {
                    None => None,
                    Some(value) => match value.as_i64() {
                        Some(index) => Some(index),
                        None => {
                            return Continuation::Ignore {
                                reason: format!("invalid {INDEX_KEY}: {value}"),
                            };
                        }
                    },
                };
                Continuation::IterateBlast {
                    blast_id: blast_id.to_string(),
                    index,
                }
            }
            Some(other) => Continuation::Ignore {
                reason: format!("unknown method `{other}`"),
            },
            None => Continuation::Ignore {
                reason: "no method".to_string(),
            },
        }
    }
}
