//! Request authentication headers.
//!
//! Token credentials produce a bearer header. Key-pair credentials sign
//! `"{timestamp}\n{METHOD}\n{path_and_query}\n{body}\n"` with HMAC-SHA256
//! keyed by the private key and send it as `prsign {public}:{hex}` alongside
//! the timestamp header.

use ring::hmac;

use crate::config::Credentials;

/// Header carrying the signing timestamp in Unix seconds.
pub(crate) const TIMESTAMP_HEADER: &str = "X-PR-Timestamp";

/// Parts of a request covered by the signature.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SigningInput<'a> {
    pub timestamp: i64,
    pub method: &'a str,
    pub path_and_query: &'a str,
    pub body: &'a str,
}

/// Header values to attach to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthHeaders {
    pub authorization: String,
    pub timestamp: Option<String>,
}

pub(crate) fn authenticate(credentials: Credentials<'_>, input: SigningInput<'_>) -> AuthHeaders {
    match credentials {
        Credentials::AccessToken(token) => AuthHeaders {
            authorization: format!("Bearer {token}"),
            timestamp: None,
        },
        Credentials::KeyPair {
            public_key,
            private_key,
        } => {
            let signature = hmac_signature(private_key, &signing_message(input));
            AuthHeaders {
                authorization: format!("prsign {public_key}:{signature}"),
                timestamp: Some(input.timestamp.to_string()),
            }
        }
    }
}

fn signing_message(input: SigningInput<'_>) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        input.timestamp, input.method, input.path_and_query, input.body
    )
}

/// Lower-case hex HMAC-SHA256 of `data` keyed by `secret`.
fn hmac_signature(secret: &str, data: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, data.as_bytes());
    hex::encode(tag.as_ref())
}
