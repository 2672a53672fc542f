//! Flow launching for [`CurveVizEngine`].

use super::CurveVizEngine;
use crate::choreography::{RunToken, Script};
use crate::flows::{self, FlowError, FlowKind};
use crate::host::{HostView, Notice};

impl<H: HostView> CurveVizEngine<H> {
    /// Start key generation on the key-generation stage.
    ///
    /// # Errors
    ///
    /// [`FlowError::NoScene`] if that view was never activated.
    pub fn generate_keys(&mut self) -> Result<RunToken, FlowError> {
        let flow = FlowKind::KeyGeneration;
        self.require_scene(flow)?;
        let script = flows::keygen::script(&self.options.timing, &mut self.rng);
        Ok(self.launch(flow, script))
    }

    /// Start encrypting `message` with the session's public key.
    ///
    /// Switches to the encryption view once the preconditions hold.
    ///
    /// # Errors
    ///
    /// [`FlowError::MissingMessage`] or [`FlowError::MissingPublicKey`]
    /// (after a warning notice), or [`FlowError::NoScene`].
    pub fn encrypt(&mut self, message: &str) -> Result<RunToken, FlowError> {
        let flow = FlowKind::Encryption;
        let script =
            flows::encrypt::script(message, &self.session, &self.options.timing)
                .map_err(|e| self.reject(flow, e))?;
        let _ = self.activate_view(flow);
        self.require_scene(flow)?;
        Ok(self.launch(flow, script))
    }

    /// Start decrypting the session's ciphertext.
    ///
    /// # Errors
    ///
    /// [`FlowError::MissingCiphertext`] or [`FlowError::MissingPrivateKey`]
    /// (after a warning notice), or [`FlowError::NoScene`].
    pub fn decrypt(&mut self) -> Result<RunToken, FlowError> {
        let flow = FlowKind::Decryption;
        let script = flows::decrypt::script(&self.session, &self.options.timing)
            .map_err(|e| self.reject(flow, e))?;
        self.require_scene(flow)?;
        Ok(self.launch(flow, script))
    }

    fn reject(&mut self, flow: FlowKind, error: FlowError) -> FlowError {
        if let Some(text) = error.notice_text() {
            log::warn!("{flow} not started: {error}");
            self.host.notify(&Notice::warning(flow, text));
        }
        error
    }

    fn require_scene(&self, flow: FlowKind) -> Result<(), FlowError> {
        if self.viewports.scene(&flow.container()).is_some() {
            Ok(())
        } else {
            log::debug!("{flow} not started: no scene");
            Err(FlowError::NoScene(flow))
        }
    }

    /// Queue `script` and run it up to its first wait.
    fn launch(&mut self, flow: FlowKind, script: Script) -> RunToken {
        let token = self.director.start(flow, flow.container(), script);
        self.director
            .advance(&mut self.viewports, &mut self.session, &mut self.host);
        token
    }
}
