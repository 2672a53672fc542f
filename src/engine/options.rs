//! Options methods for [`CurveVizEngine`].

use super::CurveVizEngine;
use crate::choreography::TracePacing;
use crate::host::HostView;
use crate::options::Options;

impl<H: HostView> CurveVizEngine<H> {
    /// Replace options.
    ///
    /// Timing applies to runs started afterwards. Camera, motion and theme
    /// apply to scenes created afterwards; existing scenes keep theirs.
    pub fn set_options(&mut self, new: Options) {
        self.options = new;
        self.apply_options();
    }

    /// Push current option values to the director.
    pub fn apply_options(&mut self) {
        self.director.configure(
            self.options.service.dispatch,
            TracePacing::from_options(&self.options.timing),
        );
    }
}
