//! Request signing
//!
//! Every call carries `api_key`, a unix timestamp `ts` and `api_sig`, the hex
//! HMAC-SHA1 of the request parameters keyed by the private key. GET and DELETE
//! requests sign their sorted, url-encoded query string. POST and PUT requests
//! sign the JSON object `{"api_key", "data", "ts"}` in canonical form with `/`
//! escaped, which is how the service recomputes it.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha1::Sha1;
use std::fmt;
use std::fmt::Write;

type HmacSha1 = Hmac<Sha1>;

/// Computes `api_sig` values from the account's private key
#[derive(Clone)]
pub struct RequestSigner {
    key: Vec<u8>,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl RequestSigner {
    /// Create a signer for the given private key
    pub fn new(private_key: &str) -> Self {
        Self {
            key: private_key.as_bytes().to_vec(),
        }
    }

    /// Lowercase hex HMAC-SHA1 of `message`
    pub fn sign(&self, message: &str) -> String {
        let mut mac =
            HmacSha1::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Signature for a form-encoded POST/PUT body
    pub fn sign_form(&self, api_key: &str, data: &str, ts: &str) -> String {
        let envelope = serde_json::json!({
            "api_key": api_key,
            "data": data,
            "ts": ts,
        });
        let message = canonical_json(&envelope).replace('/', "\\/");
        self.sign(&message)
    }
}

/// Compact JSON with sorted object keys and non-ASCII characters escaped
pub fn canonical_json(value: &Value) -> String {
    // serde_json's Map is ordered by key unless `preserve_order` is enabled
    let compact = value.to_string();
    escape_non_ascii(&compact)
}

fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    let mut units = [0u16; 2];

    for c in json.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            escaped.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units).iter() {
            let _ = write!(escaped, "\\u{:04x}", unit);
        }
    }

    escaped
}
