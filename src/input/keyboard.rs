use serde::{Deserialize, Serialize};

/// Engine-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// generate_keys = "KeyG"
/// show_encrypt = "Digit2"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Show the home particle field.
    ShowHome,
    /// Activate the key-generation viewport.
    ShowKeygen,
    /// Activate the encryption viewport.
    ShowEncrypt,
    /// Activate the decryption viewport.
    ShowDecrypt,
    /// Start the key-generation flow.
    GenerateKeys,
    /// Start the encryption flow with the host's current message.
    Encrypt,
    /// Start the decryption flow.
    Decrypt,
    /// Pause or resume the home particle field.
    ToggleBackground,
    /// Close the viewer.
    Quit,
}
