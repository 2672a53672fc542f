use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{CryptoService, ServiceError, ServiceReply, ServiceRequest};

/// Where a service call runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CallDispatch {
    /// Block the calling thread until the reply arrives.
    Inline,
    /// Run on a worker thread; the reply is polled each frame.
    #[default]
    Background,
}

/// Result of handing a request to [`dispatch`].
#[derive(Debug)]
pub enum CallState {
    /// The call already finished.
    Ready(Result<ServiceReply, ServiceError>),
    /// The call is running on a worker.
    Pending(PendingCall),
}

/// A call running on a worker thread.
///
/// Dropping it abandons the reply; the worker finishes on its own and its
/// send fails silently.
#[derive(Debug)]
pub struct PendingCall {
    rx: Receiver<Result<ServiceReply, ServiceError>>,
}

impl PendingCall {
    /// Non-blocking check for the reply.
    ///
    /// Returns `None` while the worker is still running.
    pub fn poll(&self) -> Option<Result<ServiceReply, ServiceError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(ServiceError::Disconnected))
            }
        }
    }
}

/// Start `request` against `service` in the given mode.
pub fn dispatch(
    service: &Arc<dyn CryptoService>,
    request: ServiceRequest,
    mode: CallDispatch,
) -> CallState {
    match mode {
        CallDispatch::Inline => {
            log::debug!("service call {} (inline)", request.route());
            CallState::Ready(request.execute(service.as_ref()))
        }
        CallDispatch::Background => {
            let (tx, rx) = mpsc::channel();
            let service = Arc::clone(service);
            let route = request.route();
            let spawned = std::thread::Builder::new()
                .name(format!("ecviz-{route}"))
                .spawn(move || {
                    let _ = tx.send(request.execute(service.as_ref()));
                });
            match spawned {
                Ok(_) => {
                    log::debug!("service call {route} (background)");
                    CallState::Pending(PendingCall { rx })
                }
                Err(e) => CallState::Ready(Err(ServiceError::Transport(
                    format!("failed to spawn service worker: {e}"),
                ))),
            }
        }
    }
}
