//! Read-only queries and host access for [`CurveVizEngine`].

use web_time::Instant;

use super::CurveVizEngine;
use crate::flows::{FlowKind, Session};
use crate::host::HostView;
use crate::options::Options;
use crate::scene::{HeroField, Scene, Viewports};

// ── Scenes ──

impl<H: HostView> CurveVizEngine<H> {
    /// The scene bound to `flow`'s container, if created.
    #[must_use]
    pub fn scene(&self, flow: FlowKind) -> Option<&Scene> {
        self.viewports.scene(&flow.container())
    }

    /// The scene of the active view.
    #[must_use]
    pub fn active_scene(&self) -> Option<&Scene> {
        self.active_view.and_then(|flow| self.scene(flow))
    }

    /// The home particle field, once shown.
    #[must_use]
    pub fn hero(&self) -> Option<&HeroField> {
        self.hero.as_ref()
    }

    /// Whether the home field turns.
    #[must_use]
    pub fn background_animation(&self) -> bool {
        self.background_animation
    }

    /// The most recently activated flow view, `None` on the home view.
    #[must_use]
    pub fn active_view(&self) -> Option<FlowKind> {
        self.active_view
    }

    /// The viewport registry.
    #[must_use]
    pub fn viewports(&self) -> &Viewports {
        &self.viewports
    }
}

// ── Session & host ──

impl<H: HostView> CurveVizEngine<H> {
    /// State carried between runs.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session, for hosts that let users paste keys or ciphertext.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The host view.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host view.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

// ── Choreography ──

impl<H: HostView> CurveVizEngine<H> {
    /// Whether no flow run is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.director.is_idle()
    }

    /// Number of flow runs still held, superseded ones included until
    /// they reach a wait and are dropped.
    #[must_use]
    pub fn active_runs(&self) -> usize {
        self.director.active_runs()
    }

    /// Whether the newest run of `flow` is still active.
    #[must_use]
    pub fn is_running(&self, flow: FlowKind) -> bool {
        self.director.is_running(flow)
    }

    /// Earliest timed wake-up of any run.
    #[must_use]
    pub fn next_wake(&self) -> Option<Instant> {
        self.director.next_wake()
    }
}
