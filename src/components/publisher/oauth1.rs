//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1) for the status endpoint.

use crate::config::PostingCredentials;
use crate::error::{publish_error, NotifierResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Scheme, host, non-default port and path; no query or fragment
fn base_url(url: &Url) -> String {
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    format!(
        "{}://{}{}{}",
        url.scheme().to_ascii_lowercase(),
        url.host_str().unwrap_or("").to_ascii_lowercase(),
        port,
        url.path()
    )
}

/// Signs requests with the application's static consumer and access keys
#[derive(Debug, Clone)]
pub struct RequestSigner {
    keys: PostingCredentials,
}

impl RequestSigner {
    pub fn new(keys: PostingCredentials) -> Self {
        Self { keys }
    }

    fn oauth_params(&self, nonce: &str, timestamp: i64) -> Vec<(String, String)> {
        vec![
            ("oauth_consumer_key".to_string(), self.keys.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.keys.access_token.clone()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ]
    }

    /// Signature base string over the URL's query pairs, the form params and the oauth params
    pub fn base_string(
        &self,
        method: &str,
        url: &Url,
        form: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (encode(&k), encode(&v)))
            .chain(form.iter().map(|(k, v)| (encode(k), encode(v))))
            .chain(
                self.oauth_params(nonce, timestamp)
                    .into_iter()
                    .map(|(k, v)| (encode(&k), encode(&v))),
            )
            .collect();
        pairs.sort();

        let normalized = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}&{}&{}",
            method.to_ascii_uppercase(),
            encode(&base_url(url)),
            encode(&normalized)
        )
    }

    /// Base64 HMAC-SHA1 of the base string, keyed with both secrets
    pub fn signature(
        &self,
        method: &str,
        url: &Url,
        form: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> NotifierResult<String> {
        let key = format!(
            "{}&{}",
            encode(&self.keys.consumer_secret),
            encode(&self.keys.access_token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| publish_error(&format!("Invalid signing key: {}", e)))?;
        mac.update(self.base_string(method, url, form, nonce, timestamp).as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Value for the `Authorization` header
    pub fn authorization_header(
        &self,
        method: &str,
        url: &Url,
        form: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> NotifierResult<String> {
        let signature = self.signature(method, url, form, nonce, timestamp)?;
        let mut params = self.oauth_params(nonce, timestamp);
        params.push(("oauth_signature".to_string(), signature));
        params.sort();

        let fields = params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", fields))
    }
}
