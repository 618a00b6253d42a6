//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Every call to the platform carries an `Authorization: OAuth ...` header
//! built from the consumer key/secret and the user's access token/secret.
//! Multipart and JSON bodies are not part of the signature base string, so
//! only the request method, URL and query parameters are signed.
//! Reference: https://developer.x.com/en/docs/authentication/oauth-1-0a/creating-a-signature

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use sha1::Sha1;
use url::Url;

use crate::config::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters are left as-is; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Signs requests on behalf of one user.
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    credentials: Credentials,
}

impl OAuthSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Build the `Authorization` header for a request, with a fresh nonce and
    /// the current timestamp. `None` if the signing key is rejected.
    pub fn authorization(&self, method: &str, url: &Url) -> Option<String> {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        self.authorization_with(method, url, &[], &hex::encode(nonce), timestamp)
    }

    /// Build the `Authorization` header with a caller-chosen nonce and
    /// timestamp. `extra_params` are signed but not placed in the header
    /// (form-encoded body parameters, for instance).
    pub fn authorization_with(
        &self,
        method: &str,
        url: &Url,
        extra_params: &[(&str, &str)],
        nonce: &str,
        timestamp: u64,
    ) -> Option<String> {
        let timestamp = timestamp.to_string();
        let mut oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.credentials.client_token.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.signature(method, url, &oauth_params, extra_params)?;
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort();

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Some(format!("OAuth {fields}"))
    }

    fn signature(
        &self,
        method: &str,
        url: &Url,
        oauth_params: &[(&str, &str)],
        extra_params: &[(&str, &str)],
    ) -> Option<String> {
        let base = signature_base(method, url, oauth_params, extra_params);
        let key = format!(
            "{}&{}",
            encode(&self.credentials.client_secret),
            encode(&self.credentials.access_secret)
        );

        let mut mac = match HmacSha1::new_from_slice(key.as_bytes()) {
            Ok(m) => m,
            Err(_) => return None,
        };
        mac.update(base.as_bytes());
        Some(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// `METHOD&enc(base url)&enc(sorted params)`, where params include the URL's
/// query string.
fn signature_base(
    method: &str,
    url: &Url,
    oauth_params: &[(&str, &str)],
    extra_params: &[(&str, &str)],
) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .chain(
            oauth_params
                .iter()
                .chain(extra_params)
                .map(|(k, v)| (encode(k), encode(v))),
        )
        .collect();
    params.sort();

    let param_string = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(base_url.as_str()),
        encode(&param_string)
    )
}
