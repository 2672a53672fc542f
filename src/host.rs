//! What the surrounding application provides to the visualization.
//!
//! The engine never touches widgets directly. Notices, result fields and
//! label overlays go through [`HostView`]; a desktop viewer shows them in
//! dialogs and a window title, tests record them.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::flows::FlowKind;
use crate::scene::{ContainerId, LabelOverlay};

/// Severity of a blocking notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// A precondition was not met; nothing happened.
    Warning,
    /// The service call failed; the flow stopped where it was.
    Failure,
}

/// A message the user must acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Flow that raised it.
    pub flow: FlowKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Precondition warning.
    pub fn warning(flow: FlowKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            flow,
            message: message.into(),
        }
    }

    /// Service failure.
    pub fn failure(flow: FlowKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            flow,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Text fields the host displays results in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultField {
    /// Abbreviated private key.
    PrivateKey,
    /// Abbreviated public key.
    PublicKey,
    /// Full ciphertext.
    Ciphertext,
    /// Full decrypted plaintext.
    Plaintext,
}

/// Sink for everything the visualization shows outside its 3D stages.
pub trait HostView {
    /// Show a blocking notice.
    fn notify(&mut self, notice: &Notice);

    /// Replace the contents of a result field.
    fn write_field(&mut self, field: ResultField, text: &str);

    /// Draw this frame's label overlays for one container.
    fn place_labels(&mut self, _container: &ContainerId, _overlays: &[LabelOverlay]) {}
}

/// Host that only logs. Used when no UI is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHost;

impl HostView for LogHost {
    fn notify(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Warning => log::warn!("[{}] {notice}", notice.flow),
            NoticeLevel::Failure => log::error!("[{}] {notice}", notice.flow),
        }
    }

    fn write_field(&mut self, field: ResultField, text: &str) {
        log::info!("{field:?}: {text}");
    }
}

/// Host that keeps everything it is told, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    notices: Vec<Notice>,
    fields: FxHashMap<ResultField, String>,
    overlays: FxHashMap<ContainerId, Vec<LabelOverlay>>,
}

impl RecordingHost {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Current contents of `field`, if it was ever written.
    #[must_use]
    pub fn field(&self, field: ResultField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Overlays most recently placed for `container`.
    #[must_use]
    pub fn overlays(&self, container: &ContainerId) -> &[LabelOverlay] {
        self.overlays.get(container).map_or(&[], Vec::as_slice)
    }
}

impl HostView for RecordingHost {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn write_field(&mut self, field: ResultField, text: &str) {
        let _ = self.fields.insert(field, text.to_owned());
    }

    fn place_labels(&mut self, container: &ContainerId, overlays: &[LabelOverlay]) {
        let _ = self.overlays.insert(container.clone(), overlays.to_vec());
    }
}
