//! The engine's interactive vocabulary.
//!
//! Key presses, buttons and programmatic calls all end up as a
//! [`VizCommand`] passed to [`CurveVizEngine::execute`].

use super::CurveVizEngine;
use crate::flows::{FlowError, FlowKind};
use crate::host::HostView;
use crate::input::KeyAction;

/// One user-level operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VizCommand {
    /// Show the home particle field.
    ShowHome,
    /// Show a flow's viewport.
    ShowView(FlowKind),
    /// Start key generation.
    GenerateKeys,
    /// Start encryption of `message`.
    Encrypt {
        /// Message as typed by the user, untrimmed.
        message: String,
    },
    /// Start decryption of the session ciphertext.
    Decrypt,
    /// Pause or resume the home particle field.
    ToggleBackground,
}

impl VizCommand {
    /// Command for a bound key. `message` is the host's current message
    /// field. [`KeyAction::Quit`] has no engine command.
    #[must_use]
    pub fn from_key_action(action: KeyAction, message: &str) -> Option<Self> {
        match action {
            KeyAction::ShowHome => Some(Self::ShowHome),
            KeyAction::ShowKeygen => Some(Self::ShowView(FlowKind::KeyGeneration)),
            KeyAction::ShowEncrypt => Some(Self::ShowView(FlowKind::Encryption)),
            KeyAction::ShowDecrypt => Some(Self::ShowView(FlowKind::Decryption)),
            KeyAction::GenerateKeys => Some(Self::GenerateKeys),
            KeyAction::Encrypt => Some(Self::Encrypt {
                message: message.to_owned(),
            }),
            KeyAction::Decrypt => Some(Self::Decrypt),
            KeyAction::ToggleBackground => Some(Self::ToggleBackground),
            KeyAction::Quit => None,
        }
    }
}

impl<H: HostView> CurveVizEngine<H> {
    /// Perform `command`.
    ///
    /// # Errors
    ///
    /// Returns the [`FlowError`] of a rejected flow launch. The host has
    /// already been notified when the rejection is user-facing.
    pub fn execute(&mut self, command: VizCommand) -> Result<(), FlowError> {
        match command {
            VizCommand::ShowHome => {
                let _ = self.show_home();
                Ok(())
            }
            VizCommand::ShowView(flow) => {
                let _ = self.activate_view(flow);
                Ok(())
            }
            VizCommand::GenerateKeys => self.generate_keys().map(|_| ()),
            VizCommand::Encrypt { message } => {
                self.encrypt(&message).map(|_| ())
            }
            VizCommand::Decrypt => self.decrypt().map(|_| ()),
            VizCommand::ToggleBackground => {
                let _ = self.toggle_background();
                Ok(())
            }
        }
    }
}
