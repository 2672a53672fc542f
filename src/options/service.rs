use serde::{Deserialize, Serialize};

use crate::service::CallDispatch;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Where the crypto service lives and how calls to it are executed.
pub struct ServiceOptions {
    /// Base URL the `/generate_keys`, `/encrypt` and `/decrypt` routes hang
    /// off.
    pub base_url: String,
    /// Whether calls block the director tick or run on a worker thread.
    pub dispatch: CallDispatch,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            dispatch: CallDispatch::Background,
        }
    }
}
