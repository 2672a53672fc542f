use rustc_hash::FxHashMap;

use crate::flows::FlowKind;

/// Generation stamp of one flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunToken(u64);

impl RunToken {
    /// Raw generation number.
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// The current token of each flow.
#[derive(Debug, Default)]
pub struct RunTokens {
    next: u64,
    current: FxHashMap<FlowKind, RunToken>,
}

impl RunTokens {
    /// No runs issued yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for a new run of `flow`, invalidating the previous one.
    pub fn issue(&mut self, flow: FlowKind) -> RunToken {
        self.next += 1;
        let token = RunToken(self.next);
        let _ = self.current.insert(flow, token);
        token
    }

    /// Whether `token` is still the newest run of `flow`.
    #[must_use]
    pub fn is_current(&self, flow: FlowKind, token: RunToken) -> bool {
        self.current.get(&flow) == Some(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reissue_invalidates_only_that_flow() {
        let mut tokens = RunTokens::new();
        let keygen = tokens.issue(FlowKind::KeyGeneration);
        let encrypt = tokens.issue(FlowKind::Encryption);
        assert!(tokens.is_current(FlowKind::KeyGeneration, keygen));

        let again = tokens.issue(FlowKind::KeyGeneration);
        assert!(!tokens.is_current(FlowKind::KeyGeneration, keygen));
        assert!(tokens.is_current(FlowKind::KeyGeneration, again));
        assert!(tokens.is_current(FlowKind::Encryption, encrypt));
    }

    #[test]
    fn token_of_other_flow_is_not_current() {
        let mut tokens = RunTokens::new();
        let keygen = tokens.issue(FlowKind::KeyGeneration);
        assert!(!tokens.is_current(FlowKind::Decryption, keygen));
    }
}
