//! The engine behind every host: viewports, flow runs, session and the
//! home particle field, advanced one frame at a time.
//!
//! The methods of [`CurveVizEngine`] are split across submodules by concern:
//! queries in `accessors`, [`VizCommand`] dispatch in `command`, flow
//! launches in `flows`, input in `input`, option updates in `options`.

mod accessors;
mod command;
mod flows;
mod input;
mod options;

use std::sync::Arc;

pub use command::VizCommand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::choreography::{Clock, Director, SystemClock, TracePacing};
use crate::flows::{FlowKind, Session};
use crate::host::{HostView, LogHost};
use crate::options::Options;
use crate::scene::{CreateOutcome, HeroField, Viewports};
use crate::service::CryptoService;

/// The visualization core for the three flows.
///
/// Owns one viewport registry (at most one [`Scene`](crate::scene::Scene)
/// per flow container), the [`Director`] running flow scripts, the
/// [`Session`] carried between runs, and the [`HostView`] results and
/// notices go to.
///
/// # Frame loop
///
/// Call [`frame`](Self::frame) once per display refresh. It resumes every
/// flow run whose wait has elapsed, advances camera drift and element
/// pulsation, and hands label overlays to the host. Rendering the scenes
/// is the caller's business (see [`SceneRenderer`](crate::renderer::SceneRenderer)).
///
/// # Flows
///
/// [`generate_keys`](Self::generate_keys), [`encrypt`](Self::encrypt) and
/// [`decrypt`](Self::decrypt) check preconditions, then queue a script and
/// run it up to its first wait. A rejected flow changes nothing but the
/// notice shown.
pub struct CurveVizEngine<H: HostView = LogHost> {
    options: Options,
    viewports: Viewports,
    director: Director,
    session: Session,
    host: H,
    /// Source of scene seeds and key-generation hops.
    rng: StdRng,
    /// `None` while the home view is shown.
    active_view: Option<FlowKind>,
    /// Home particle field, created on first [`show_home`](Self::show_home).
    hero: Option<HeroField>,
    /// Surface size the home view was last declared or resized to.
    home_surface: (u32, u32),
    /// Whether the home field turns.
    background_animation: bool,
}

// =============================================================================
// Core
// =============================================================================

impl<H: HostView> CurveVizEngine<H> {
    /// Engine on the wall clock with a random seed.
    pub fn new(options: Options, service: Arc<dyn CryptoService>, host: H) -> Self {
        Self::with_clock(
            options,
            service,
            host,
            Box::new(SystemClock),
            rand::random(),
        )
    }

    /// Engine on an explicit clock and seed, for deterministic drivers.
    pub fn with_clock(
        options: Options,
        service: Arc<dyn CryptoService>,
        host: H,
        clock: Box<dyn Clock>,
        seed: u64,
    ) -> Self {
        let director = Director::new(
            clock,
            service,
            options.service.dispatch,
            TracePacing::from_options(&options.timing),
        );
        log::debug!(
            "engine ready (dispatch {:?}, seed {seed})",
            options.service.dispatch
        );
        Self {
            options,
            viewports: Viewports::new(),
            director,
            session: Session::new(),
            host,
            rng: StdRng::seed_from_u64(seed),
            active_view: None,
            hero: None,
            home_surface: (0, 0),
            background_animation: true,
        }
    }

    /// Register the container of `flow` with its current size.
    pub fn declare_viewport(&mut self, flow: FlowKind, width: u32, height: u32) {
        let container = flow.container();
        if self.viewports.has_container(&container) {
            log::debug!("{container} redeclared at {width}x{height}");
        }
        self.viewports.declare(container, width, height);
    }

    /// Register all three containers and the home view at the same size.
    pub fn declare_all_viewports(&mut self, width: u32, height: u32) {
        for flow in FlowKind::ALL {
            self.declare_viewport(flow, width, height);
        }
        self.home_surface = (width, height);
    }

    /// Show the home view, creating its particle field on first use.
    ///
    /// Returns [`CreateOutcome::MissingContainer`] until a home size was
    /// declared through [`declare_all_viewports`](Self::declare_all_viewports).
    pub fn show_home(&mut self) -> CreateOutcome {
        self.active_view = None;
        if self.hero.is_some() {
            return CreateOutcome::AlreadyBound;
        }
        if self.home_surface.0 == 0 || self.home_surface.1 == 0 {
            return CreateOutcome::MissingContainer;
        }
        let mut hero =
            HeroField::new(&self.options, self.home_surface, self.rng.random());
        hero.set_paused(!self.background_animation);
        self.hero = Some(hero);
        log::info!("home view initialized");
        CreateOutcome::Created
    }

    /// Flip the home field's animation. Returns whether it now turns.
    pub fn toggle_background(&mut self) -> bool {
        self.background_animation = !self.background_animation;
        if let Some(hero) = &mut self.hero {
            hero.set_paused(!self.background_animation);
        }
        log::info!(
            "background animation {}",
            if self.background_animation { "on" } else { "off" }
        );
        self.background_animation
    }

    /// Show `flow`'s viewport, creating its scene on first activation.
    pub fn activate_view(&mut self, flow: FlowKind) -> CreateOutcome {
        self.active_view = Some(flow);
        let seed = self.rng.random();
        let outcome = self.viewports.create(
            &flow.container(),
            flow.theme(&self.options.theme),
            &self.options,
            seed,
        );
        if outcome == CreateOutcome::Created {
            log::info!("{flow} view initialized");
        }
        outcome
    }

    /// Run one frame of every timeline.
    pub fn frame(&mut self) {
        self.director
            .advance(&mut self.viewports, &mut self.session, &mut self.host);
        for scene in self.viewports.scenes_mut() {
            scene.advance_frame();
            self.host
                .place_labels(scene.container(), &scene.label_overlays());
        }
        if let Some(hero) = &mut self.hero {
            let _ = hero.advance_frame();
        }
    }
}
