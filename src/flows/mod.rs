//! The three narrated flows and the state they share.
//!
//! Each builder checks its preconditions against the [`Session`] and
//! either returns a [`Script`](crate::choreography::Script) for the
//! director or a [`FlowError`]. Builders never touch a scene, so a
//! rejected flow leaves every stage as it was.

pub mod decrypt;
pub mod encrypt;
pub mod keygen;
mod session;

use std::fmt;

use glam::Vec3;

pub use session::Session;

use crate::options::ThemeOptions;
use crate::scene::ContainerId;
use crate::util::color::Color;

/// Step caption anchor.
pub const CAPTION_ANCHOR: Vec3 = Vec3::new(0.0, 4.0, 0.0);
/// Anchor of the closing caption of every flow.
pub const FINAL_ANCHOR: Vec3 = Vec3::new(0.0, 5.0, 0.0);

pub(crate) const CYAN: Color = Color::from_hex(0x00d9ff);
pub(crate) const GREEN: Color = Color::from_hex(0x00ff88);
pub(crate) const MAGENTA: Color = Color::from_hex(0xff00ff);
pub(crate) const YELLOW: Color = Color::from_hex(0xffff00);
pub(crate) const GRAY: Color = Color::from_hex(0xaaaaaa);

/// One of the three flows, each with its own viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlowKind {
    /// Key-pair generation.
    KeyGeneration,
    /// Message encryption.
    Encryption,
    /// Ciphertext decryption.
    Decryption,
}

impl FlowKind {
    /// Every flow, in page order.
    pub const ALL: [Self; 3] =
        [Self::KeyGeneration, Self::Encryption, Self::Decryption];

    /// Short name, also the viewport container name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::KeyGeneration => "keygen",
            Self::Encryption => "encrypt",
            Self::Decryption => "decrypt",
        }
    }

    /// The viewport container this flow draws into.
    #[must_use]
    pub fn container(self) -> ContainerId {
        ContainerId::new(self.name())
    }

    /// Accent color of this flow's viewport.
    #[must_use]
    pub fn theme(self, theme: &ThemeOptions) -> Color {
        match self {
            Self::KeyGeneration => theme.keygen,
            Self::Encryption => theme.encrypt,
            Self::Decryption => theme.decrypt,
        }
    }

    /// Notice shown when this flow's service call fails.
    #[must_use]
    pub fn failure_notice(self) -> &'static str {
        match self {
            Self::KeyGeneration => "Key generation failed",
            Self::Encryption => "Encryption failed",
            Self::Decryption => "Decryption failed",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ENCRYPT_PRECONDITION: &str =
    "Please enter a message and generate keys first.";
const DECRYPT_PRECONDITION: &str = "No ciphertext or private key found.";

/// Why a flow did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    /// Encryption without a (non-blank) message.
    MissingMessage,
    /// Encryption before any key pair was generated.
    MissingPublicKey,
    /// Decryption before any ciphertext was produced.
    MissingCiphertext,
    /// Decryption before any key pair was generated.
    MissingPrivateKey,
    /// The flow's viewport has no scene.
    NoScene(FlowKind),
}

impl FlowError {
    /// Warning shown to the user, if this error is a precondition failure.
    #[must_use]
    pub fn notice_text(self) -> Option<&'static str> {
        match self {
            Self::MissingMessage | Self::MissingPublicKey => {
                Some(ENCRYPT_PRECONDITION)
            }
            Self::MissingCiphertext | Self::MissingPrivateKey => {
                Some(DECRYPT_PRECONDITION)
            }
            Self::NoScene(_) => None,
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMessage => f.write_str("no message to encrypt"),
            Self::MissingPublicKey => f.write_str("no public key"),
            Self::MissingCiphertext => f.write_str("no ciphertext"),
            Self::MissingPrivateKey => f.write_str("no private key"),
            Self::NoScene(flow) => {
                write!(f, "no scene bound to container '{flow}'")
            }
        }
    }
}

impl std::error::Error for FlowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containers_match_flow_names() {
        let names: Vec<_> =
            FlowKind::ALL.iter().map(|f| f.container()).collect();
        assert_eq!(
            names,
            [
                ContainerId::new("keygen"),
                ContainerId::new("encrypt"),
                ContainerId::new("decrypt")
            ]
        );
    }

    #[test]
    fn themes_follow_options() {
        let theme = ThemeOptions::default();
        assert_eq!(FlowKind::KeyGeneration.theme(&theme), Color(0x00ff88));
        assert_eq!(FlowKind::Encryption.theme(&theme), Color(0xff00ff));
        assert_eq!(FlowKind::Decryption.theme(&theme), Color(0xffaa00));
    }

    #[test]
    fn precondition_errors_share_notice_per_flow() {
        assert_eq!(
            FlowError::MissingMessage.notice_text(),
            FlowError::MissingPublicKey.notice_text()
        );
        assert_eq!(
            FlowError::MissingCiphertext.notice_text(),
            Some("No ciphertext or private key found.")
        );
        assert_eq!(FlowError::NoScene(FlowKind::Decryption).notice_text(), None);
    }
}
