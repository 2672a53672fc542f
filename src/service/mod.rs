//! Boundary to the external crypto service.
//!
//! The visualization never does cryptography itself. Each flow run issues
//! exactly one [`ServiceRequest`] through a [`CryptoService`]; the reply is
//! folded into the session and shown to the user. Calls run either inline
//! or on a worker thread whose reply is polled (see [`CallDispatch`]).

pub mod canned;
mod dispatch;
mod error;
#[cfg(feature = "service")]
pub mod http;
mod wire;

pub use canned::CannedService;
pub use dispatch::{dispatch, CallDispatch, CallState, PendingCall};
pub use error::ServiceError;
#[cfg(feature = "service")]
pub use http::HttpCryptoService;
pub use wire::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, KeyPair,
    ServiceReply, ServiceRequest,
};

/// The three operations of the crypto service.
///
/// Implementations must be shareable with a worker thread.
pub trait CryptoService: Send + Sync {
    /// Generate a fresh key pair.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on transport, status or decode failure.
    fn generate_keys(&self) -> Result<KeyPair, ServiceError>;

    /// Encrypt a plaintext for a public key.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on transport, status or decode failure.
    fn encrypt(
        &self,
        request: &EncryptRequest,
    ) -> Result<EncryptResponse, ServiceError>;

    /// Decrypt a ciphertext with a private key.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on transport, status or decode failure.
    fn decrypt(
        &self,
        request: &DecryptRequest,
    ) -> Result<DecryptResponse, ServiceError>;
}
