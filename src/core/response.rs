//! Response decoding
//!
//! Every JSON answer is wrapped as
//! `{"opstat": "ok", "response": ...}` or
//! `{"opstat": "error", "err": {"code": ..., "msg": ...}}`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::core::errors::{GengoError, Result};

/// Error codes the service uses for ids it does not know
pub const NOT_FOUND_CODES: &[i64] = &[2100, 2150, 2250, 2350];

/// Longest body excerpt carried in transport errors
const MAX_BODY_EXCERPT: usize = 200;

/// Map a service error code onto an error kind
pub fn classify(code: i64, message: String) -> GengoError {
    match code {
        1000..=1999 => GengoError::AuthenticationError { code, message },
        c if NOT_FOUND_CODES.contains(&c) => GengoError::NotFoundError { code, message },
        2000..=2999 => GengoError::ValidationError {
            code: Some(code),
            message,
        },
        _ => GengoError::RemoteError { code, message },
    }
}

/// Parse a response body and return its `response` payload
pub fn decode_envelope(body: &[u8]) -> Result<Value> {
    let json: Value = serde_json::from_slice(body)?;
    let envelope = json
        .as_object()
        .ok_or_else(|| GengoError::decode("Bad JSON: response is not an object"))?;

    let opstat = envelope
        .get("opstat")
        .ok_or_else(|| GengoError::decode("Bad JSON: 'opstat' not in response"))?;

    match opstat.as_str() {
        Some("ok") => envelope
            .get("response")
            .cloned()
            .ok_or_else(|| GengoError::decode("Bad JSON: 'response' not in response")),
        Some("error") => {
            let err = remote_error(envelope.get("err"))?;
            warn!("myGengo returned an error: {}", err);
            Err(err)
        }
        _ => Err(GengoError::decode(format!(
            "Bad JSON: 'opstat' is {}",
            opstat
        ))),
    }
}

fn remote_error(err: Option<&Value>) -> Result<GengoError> {
    let err = err.ok_or_else(|| GengoError::decode("Bad JSON: 'err' not in response"))?;

    let code = match err.get("code") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| GengoError::decode("Bad JSON: 'code' not in err"))?;

    let message = err
        .get("msg")
        .and_then(Value::as_str)
        .ok_or_else(|| GengoError::decode("Bad JSON: 'msg' not in err"))?;

    Ok(classify(code, message.to_string()))
}

/// Remove `field` from the payload and decode it
pub fn take_field<T: DeserializeOwned>(response: Value, field: &str) -> Result<T> {
    let mut response = match response {
        Value::Object(map) => map,
        _ => {
            return Err(GengoError::decode(format!(
                "Bad JSON: expected an object holding '{}'",
                field
            )))
        }
    };

    let value = response
        .remove(field)
        .ok_or_else(|| GengoError::decode(format!("Bad JSON: '{}' not in response", field)))?;

    serde_json::from_value(value)
        .map_err(|e| GengoError::decode(format!("Bad JSON: '{}': {}", field, e)))
}

/// Decode the whole payload
pub fn from_payload<T: DeserializeOwned>(response: Value) -> Result<T> {
    serde_json::from_value(response).map_err(|e| GengoError::decode(format!("Bad JSON: {}", e)))
}

/// Fail when an endpoint that answers with raw bytes sent a JSON envelope
/// instead. Error envelopes keep their classification.
pub fn reject_envelope(body: &[u8]) -> Result<()> {
    let looks_like_json = body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .map_or(false, |b| *b == b'{');
    if !looks_like_json {
        return Ok(());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if map.contains_key("opstat") => {
            decode_envelope(body)?;
            Err(GengoError::decode(
                "Bad JSON: expected binary content, got a JSON response",
            ))
        }
        _ => Ok(()),
    }
}

/// Text of a numeric `field` of the payload exactly as it was sent
///
/// Parsing a number drops its trailing zeros, so `42.50` would come back as `42.5`.
pub fn number_literal(body: &[u8], field: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Envelope<'a> {
        #[serde(borrow)]
        response: HashMap<String, &'a RawValue>,
    }

    let envelope: Envelope = serde_json::from_slice(body).ok()?;
    let literal = envelope.response.get(field)?.get();
    literal
        .starts_with(|c: char| c == '-' || c.is_ascii_digit())
        .then(|| literal.to_string())
}

/// Error for a non-success HTTP status
pub fn error_from_status(status: u16, body: &[u8]) -> GengoError {
    match decode_envelope(body) {
        Err(
            e @ (GengoError::AuthenticationError { .. }
            | GengoError::NotFoundError { .. }
            | GengoError::ValidationError { .. }
            | GengoError::RemoteError { .. }),
        ) => return e,
        _ => {}
    }

    let excerpt: String = String::from_utf8_lossy(body)
        .chars()
        .take(MAX_BODY_EXCERPT)
        .collect();
    let message = format!("HTTP {}: {}", status, excerpt.trim());

    match status {
        401 | 403 => GengoError::AuthenticationError {
            code: status as i64,
            message,
        },
        404 => GengoError::NotFoundError {
            code: status as i64,
            message,
        },
        _ => GengoError::TransportError {
            status: Some(status),
            message,
        },
    }
}
