//! Per-request HMAC-SHA1 signing.
//!
//! The signature covers the `x-date` header only, so it is bound to the
//! wall-clock moment of the request and is recomputed on every call.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use sha1::Sha1;

use crate::tdx::clock::{Clock, SystemClock};
use crate::tdx::error::TdxError;
use super::ClientCredentials;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the signed timestamp.
pub const X_DATE: HeaderName = HeaderName::from_static("x-date");

/// Format a timestamp as an RFC 1123 GMT date (`Mon, 01 Jan 2024 00:00:00 GMT`).
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Base64 HMAC-SHA1 of `"x-date: " + x_date` keyed by `secret`.
pub fn sign(secret: &str, x_date: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(b"x-date: ");
    mac.update(x_date.as_bytes());

    STANDARD.encode(mac.finalize().into_bytes())
}

/// Signs each request with the shared secret. Holds no cached state.
#[derive(Debug, Clone)]
pub struct HmacSigner {
    credentials: ClientCredentials,
    clock: Arc<dyn Clock>,
}

impl HmacSigner {
    pub fn new(credentials: ClientCredentials) -> Self {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    pub fn with_clock(credentials: ClientCredentials, clock: Arc<dyn Clock>) -> Self {
        Self { credentials, clock }
    }

    /// Build `Authorization` and `X-Date` headers for a request sent now.
    pub fn auth_headers(&self) -> Result<HeaderMap, TdxError> {
        self.credentials.ensure_present()?;

        let x_date = http_date(self.clock.now());
        let signature = sign(&self.credentials.client_secret, &x_date);
        let authorization = format!(
            r#"hmac username="{}",algorithm="hmac-sha1",headers="x-date",signature="{}""#,
            self.credentials.client_id, signature
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization)
                .map_err(|_| TdxError::InvalidHeader("client id"))?,
        );
        headers.insert(
            X_DATE,
            HeaderValue::from_str(&x_date).map_err(|_| TdxError::InvalidHeader("x-date"))?,
        );

        Ok(headers)
    }
}
