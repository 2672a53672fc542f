use crate::service::{KeyPair, ServiceReply};

/// What earlier runs produced, carried into later ones.
///
/// Each successful run overwrites its part; nothing is ever reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    key_pair: Option<KeyPair>,
    ciphertext: Option<String>,
    plaintext: Option<String>,
}

impl Session {
    /// Empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a successful service reply into the session.
    pub fn record(&mut self, reply: &ServiceReply) {
        match reply {
            ServiceReply::KeyPair(pair) => self.key_pair = Some(pair.clone()),
            ServiceReply::Ciphertext(c) => self.ciphertext = Some(c.clone()),
            ServiceReply::Plaintext(p) => self.plaintext = Some(p.clone()),
        }
    }

    /// Replace the key pair, e.g. with keys pasted by the user.
    pub fn set_key_pair(&mut self, pair: KeyPair) {
        self.key_pair = Some(pair);
    }

    /// Replace the ciphertext, e.g. with one pasted by the user.
    pub fn set_ciphertext(&mut self, ciphertext: impl Into<String>) {
        self.ciphertext = Some(ciphertext.into());
    }

    /// The latest key pair.
    #[must_use]
    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    /// Public half of the latest key pair.
    #[must_use]
    pub fn public_key(&self) -> Option<&str> {
        self.key_pair.as_ref().map(|k| k.public_key.as_str())
    }

    /// Private half of the latest key pair.
    #[must_use]
    pub fn private_key(&self) -> Option<&str> {
        self.key_pair.as_ref().map(|k| k.private_key.as_str())
    }

    /// The latest ciphertext.
    #[must_use]
    pub fn ciphertext(&self) -> Option<&str> {
        self.ciphertext.as_deref()
    }

    /// The latest decrypted plaintext.
    #[must_use]
    pub fn plaintext(&self) -> Option<&str> {
        self.plaintext.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_overwrite_their_own_part() {
        let mut session = Session::new();
        session.record(&ServiceReply::KeyPair(KeyPair {
            private_key: "a".into(),
            public_key: "b".into(),
        }));
        session.record(&ServiceReply::Ciphertext("c1".into()));
        session.record(&ServiceReply::Ciphertext("c2".into()));

        assert_eq!(session.private_key(), Some("a"));
        assert_eq!(session.public_key(), Some("b"));
        assert_eq!(session.ciphertext(), Some("c2"));
        assert_eq!(session.plaintext(), None);
    }
}
