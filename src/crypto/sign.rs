use rsa::sha2::{Digest, Sha256};

use crate::model::params::Params;

const SIGN_KEY: &str = "sign";

/// Build the signing string for outbound requests.
///
/// Format: `k1=v1&k2=v2...` with keys in byte order, `sign` removed and
/// pairs whose value renders empty left out.
pub fn canonicalize_skip_empty(params: &Params) -> String {
    canonicalize(params, true)
}

/// Build the signing string with empty values kept as `key=`.
///
/// Used for verifying inbound bodies that sign every field they carry.
pub fn canonicalize_include_empty(params: &Params) -> String {
    canonicalize(params, false)
}

fn canonicalize(params: &Params, skip_empty: bool) -> String {
    let mut buf = String::new();
    for (key, value) in params.iter() {
        if key == SIGN_KEY {
            continue;
        }
        let value = value.to_string();
        if skip_empty && value.is_empty() {
            continue;
        }
        if !buf.is_empty() {
            buf.push('&');
        }
        buf.push_str(key);
        buf.push('=');
        buf.push_str(&value);
    }
    buf
}

/// Sign request parameters with the merchant secret.
///
/// `UPPER(HEX(SHA256(canonicalize_skip_empty(params) + secret_key)))`
pub fn sign_sha256(params: &Params, secret_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonicalize_skip_empty(params).as_bytes());
    hasher.update(secret_key.as_bytes());
    hex::encode_upper(hasher.finalize())
}
