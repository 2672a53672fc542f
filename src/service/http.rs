//! Blocking HTTP client for the crypto service.
//!
//! Routes: `POST /generate_keys` (empty body), `POST /encrypt` and
//! `POST /decrypt` with JSON bodies. Success bodies carry the result
//! fields; failures come back as a non-2xx status or an `{"error": ...}`
//! body.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    CryptoService, DecryptRequest, DecryptResponse, EncryptRequest,
    EncryptResponse, KeyPair, ServiceError,
};

/// [`CryptoService`] backed by the HTTP service at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpCryptoService {
    base_url: String,
}

impl HttpCryptoService {
    /// Client for the service rooted at `base_url` (no trailing route).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Root URL the client posts to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{route}", self.base_url)
    }

    fn post_empty<T: DeserializeOwned>(
        &self,
        route: &str,
    ) -> Result<T, ServiceError> {
        let response = ureq::post(&self.url(route))
            .config()
            .http_status_as_error(false)
            .build()
            .send_empty()
            .map_err(transport_error)?;
        read_reply(route, response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        route: &str,
        request: &B,
    ) -> Result<T, ServiceError> {
        let payload = serde_json::to_string(request)?;
        let response = ureq::post(&self.url(route))
            .config()
            .http_status_as_error(false)
            .build()
            .header("Content-Type", "application/json")
            .send(payload.as_bytes())
            .map_err(transport_error)?;
        read_reply(route, response)
    }
}

impl CryptoService for HttpCryptoService {
    fn generate_keys(&self) -> Result<KeyPair, ServiceError> {
        self.post_empty("generate_keys")
    }

    fn encrypt(
        &self,
        request: &EncryptRequest,
    ) -> Result<EncryptResponse, ServiceError> {
        self.post_json("encrypt", request)
    }

    fn decrypt(
        &self,
        request: &DecryptRequest,
    ) -> Result<DecryptResponse, ServiceError> {
        self.post_json("decrypt", request)
    }
}

fn transport_error(e: ureq::Error) -> ServiceError {
    match e {
        ureq::Error::StatusCode(code) => ServiceError::Status(code),
        other => ServiceError::Transport(other.to_string()),
    }
}

/// Decode a reply of any status. Error statuses keep the service's
/// `{"error": ...}` message when the body carries one.
fn read_reply<T: DeserializeOwned>(
    route: &str,
    response: ureq::http::Response<ureq::Body>,
) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response
        .into_body()
        .read_to_string()
        .map_err(transport_error)?;
    if status.is_success() {
        return decode(&body);
    }
    let error = match error_message(&body) {
        Some(message) => ServiceError::Rejected(message),
        None => ServiceError::Status(status.as_u16()),
    };
    log::error!("POST /{route} returned {status}: {error}");
    Err(error)
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    Some(
        error
            .as_str()
            .map_or_else(|| error.to_string(), ToOwned::to_owned),
    )
}

/// Parse a success body, treating an `error` field as a rejection.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ServiceError> {
    if let Some(message) = error_message(body) {
        return Err(ServiceError::Rejected(message));
    }
    Ok(serde_json::from_str(body)?)
}
