use serde::{Deserialize, Serialize};

use super::{CryptoService, ServiceError};

/// A key pair as returned by the key-generation route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    /// Serialized private key.
    pub private_key: String,
    /// Serialized public key.
    pub public_key: String,
}

/// Body of the encryption route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Message to encrypt.
    pub plaintext: String,
    /// Recipient public key.
    pub public_key: String,
}

/// Reply of the encryption route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Serialized ciphertext.
    pub ciphertext: String,
}

/// Body of the decryption route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Serialized ciphertext.
    pub ciphertext: String,
    /// Private key to decrypt with.
    pub private_key: String,
}

/// Reply of the decryption route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Recovered message.
    pub plaintext: String,
}

/// One call a flow makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRequest {
    /// Ask for a fresh key pair.
    GenerateKeys,
    /// Encrypt a message.
    Encrypt(EncryptRequest),
    /// Decrypt a ciphertext.
    Decrypt(DecryptRequest),
}

/// What a successful call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    /// New key pair.
    KeyPair(KeyPair),
    /// Ciphertext of an encryption.
    Ciphertext(String),
    /// Plaintext of a decryption.
    Plaintext(String),
}

impl ServiceRequest {
    /// Route name, used in logs and by the HTTP client.
    #[must_use]
    pub fn route(&self) -> &'static str {
        match self {
            Self::GenerateKeys => "generate_keys",
            Self::Encrypt(_) => "encrypt",
            Self::Decrypt(_) => "decrypt",
        }
    }

    /// Perform the call against `service`.
    ///
    /// # Errors
    ///
    /// Propagates the service's [`ServiceError`].
    pub fn execute(
        &self,
        service: &dyn CryptoService,
    ) -> Result<ServiceReply, ServiceError> {
        match self {
            Self::GenerateKeys => service.generate_keys().map(ServiceReply::KeyPair),
            Self::Encrypt(req) => service
                .encrypt(req)
                .map(|r| ServiceReply::Ciphertext(r.ciphertext)),
            Self::Decrypt(req) => service
                .decrypt(req)
                .map(|r| ServiceReply::Plaintext(r.plaintext)),
        }
    }
}
