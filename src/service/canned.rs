//! In-process service with fixed replies.
//!
//! Used for offline runs and tests. Every call is counted so callers can
//! check that preconditions stopped a flow before it reached the service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{
    CryptoService, DecryptRequest, DecryptResponse, EncryptRequest,
    EncryptResponse, KeyPair, ServiceError,
};

/// A [`CryptoService`] that answers from fixed data.
#[derive(Debug)]
pub struct CannedService {
    key_pair: KeyPair,
    ciphertext: String,
    fail_with: Option<ServiceError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<String>>,
}

impl CannedService {
    /// Service that always returns `key_pair`, encrypts to `"<ciphertext>"`
    /// and decrypts back to the last encrypted plaintext.
    #[must_use]
    pub fn new(key_pair: KeyPair) -> Self {
        Self {
            key_pair,
            ciphertext: "<ciphertext>".to_owned(),
            fail_with: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Use `ciphertext` as the encryption result.
    #[must_use]
    pub fn with_ciphertext(mut self, ciphertext: impl Into<String>) -> Self {
        self.ciphertext = ciphertext.into();
        self
    }

    /// Make every call fail with `error`.
    #[must_use]
    pub fn failing(mut self, error: ServiceError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Route plus body of the most recent call, formatted for assertions.
    pub fn last_request(&self) -> Option<String> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }

    fn record(&self, summary: String) -> Result<(), ServiceError> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(summary);
        }
        self.fail_with.clone().map_or(Ok(()), Err)
    }
}

impl CryptoService for CannedService {
    fn generate_keys(&self) -> Result<KeyPair, ServiceError> {
        self.record("generate_keys".to_owned())?;
        Ok(self.key_pair.clone())
    }

    fn encrypt(
        &self,
        request: &EncryptRequest,
    ) -> Result<EncryptResponse, ServiceError> {
        self.record(format!(
            "encrypt plaintext={} public_key={}",
            request.plaintext, request.public_key
        ))?;
        Ok(EncryptResponse {
            ciphertext: self.ciphertext.clone(),
        })
    }

    fn decrypt(
        &self,
        request: &DecryptRequest,
    ) -> Result<DecryptResponse, ServiceError> {
        self.record(format!(
            "decrypt ciphertext={} private_key={}",
            request.ciphertext, request.private_key
        ))?;
        Ok(DecryptResponse {
            plaintext: format!("decrypted({})", request.ciphertext),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> KeyPair {
        KeyPair {
            private_key: "abc".into(),
            public_key: "xyz".into(),
        }
    }

    #[test]
    fn counts_calls_and_records_requests() {
        let service = CannedService::new(pair()).with_ciphertext("ct");
        assert_eq!(service.calls(), 0);
        let reply = service
            .encrypt(&EncryptRequest {
                plaintext: "hi".into(),
                public_key: "xyz".into(),
            })
            .unwrap();
        assert_eq!(reply.ciphertext, "ct");
        assert_eq!(service.calls(), 1);
        assert_eq!(
            service.last_request().as_deref(),
            Some("encrypt plaintext=hi public_key=xyz")
        );
    }

    #[test]
    fn failing_service_still_counts() {
        let service =
            CannedService::new(pair()).failing(ServiceError::Status(500));
        assert_eq!(service.generate_keys(), Err(ServiceError::Status(500)));
        assert_eq!(service.calls(), 1);
    }
}
