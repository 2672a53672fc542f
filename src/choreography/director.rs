use std::sync::Arc;

use web_time::Instant;

use super::clock::Clock;
use super::script::{Cue, Script, Slot};
use super::token::{RunToken, RunTokens};
use super::trace::{TracePacing, TraceRamp};
use crate::flows::{FlowKind, Session};
use crate::host::{HostView, Notice, ResultField};
use crate::scene::{ContainerId, ElementId, Scene, Viewports};
use crate::service::{
    dispatch, CallDispatch, CallState, CryptoService, PendingCall,
    ServiceError, ServiceReply,
};
use crate::util::text::{abbreviate, KEY_PREVIEW_CHARS};

/// Interprets flow scripts, one step per tick.
pub struct Director {
    clock: Box<dyn Clock>,
    service: Arc<dyn CryptoService>,
    dispatch: CallDispatch,
    pacing: TracePacing,
    tokens: RunTokens,
    runs: Vec<Run>,
}

/// Shared, read-only inputs of one tick.
struct Tick<'a> {
    now: Instant,
    service: &'a Arc<dyn CryptoService>,
    dispatch: CallDispatch,
    pacing: TracePacing,
}

impl Director {
    /// Director calling `service` in `dispatch` mode, timed by `clock`.
    pub fn new(
        clock: Box<dyn Clock>,
        service: Arc<dyn CryptoService>,
        dispatch: CallDispatch,
        pacing: TracePacing,
    ) -> Self {
        Self {
            clock,
            service,
            dispatch,
            pacing,
            tokens: RunTokens::new(),
            runs: Vec::new(),
        }
    }

    /// Change dispatch mode and trace pacing for cues executed from now on.
    pub fn configure(&mut self, dispatch: CallDispatch, pacing: TracePacing) {
        self.dispatch = dispatch;
        self.pacing = pacing;
    }

    // -- Runs --

    /// Queue `script` as the newest run of `flow` on `container`.
    ///
    /// Any older run of the same flow becomes stale and is dropped at its
    /// next resume. Nothing executes until the next
    /// [`advance`](Self::advance).
    pub fn start(
        &mut self,
        flow: FlowKind,
        container: ContainerId,
        script: Script,
    ) -> RunToken {
        let token = self.tokens.issue(flow);
        log::info!(
            "{flow} run {} started (~{:.1}s)",
            token.generation(),
            script.nominal_duration(self.pacing).as_secs_f32()
        );
        let (cues, slots) = script.into_parts();
        self.runs.push(Run {
            flow,
            token,
            container,
            cues: cues.into_iter(),
            slots: vec![None; slots],
            wait: Wait::Idle,
            failure: String::new(),
            reply: None,
        });
        token
    }

    /// Resume every run until it waits, finishes, fails or goes stale.
    pub fn advance(
        &mut self,
        viewports: &mut Viewports,
        session: &mut Session,
        host: &mut dyn HostView,
    ) {
        let tick = Tick {
            now: self.clock.now(),
            service: &self.service,
            dispatch: self.dispatch,
            pacing: self.pacing,
        };
        let tokens = &self.tokens;
        self.runs.retain_mut(|run| {
            if !tokens.is_current(run.flow, run.token) {
                log::debug!(
                    "{} run {} superseded, abandoned",
                    run.flow,
                    run.token.generation()
                );
                return false;
            }
            let Some(scene) = viewports.scene_mut(&run.container) else {
                log::warn!(
                    "{} run {}: no scene on '{}', abandoned",
                    run.flow,
                    run.token.generation(),
                    run.container
                );
                return false;
            };
            run.resume(&tick, scene, session, &mut *host)
        });
    }

    // -- Queries --

    /// Current time of the director's clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Earliest deadline any run waits for. `None` if nothing is timed,
    /// either because no run is active or all wait on service replies.
    #[must_use]
    pub fn next_wake(&self) -> Option<Instant> {
        self.runs.iter().filter_map(Run::next_wake).min()
    }

    /// Whether no run is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of active runs, stale ones included until dropped.
    #[must_use]
    pub fn active_runs(&self) -> usize {
        self.runs.len()
    }

    /// Whether the newest run of `flow` is still active.
    #[must_use]
    pub fn is_running(&self, flow: FlowKind) -> bool {
        self.runs
            .iter()
            .any(|r| r.flow == flow && self.tokens.is_current(flow, r.token))
    }
}

/// What a run is waiting for.
#[derive(Debug)]
enum Wait {
    Idle,
    Until(Instant),
    Tracing(Vec<TraceRamp>),
    Reply(PendingCall),
}

enum Step {
    Continue,
    Suspend,
    Stop,
}

struct Run {
    flow: FlowKind,
    token: RunToken,
    container: ContainerId,
    cues: std::vec::IntoIter<Cue>,
    slots: Vec<Option<ElementId>>,
    wait: Wait,
    failure: String,
    reply: Option<ServiceReply>,
}

impl Run {
    /// Run cues until the next wait. Returns `false` once the run is over.
    fn resume(
        &mut self,
        tick: &Tick<'_>,
        scene: &mut Scene,
        session: &mut Session,
        host: &mut dyn HostView,
    ) -> bool {
        loop {
            match self.poll_wait(tick.now, scene, session, host) {
                Step::Continue => {}
                Step::Suspend => return true,
                Step::Stop => return false,
            }
            let Some(cue) = self.cues.next() else {
                log::info!("{} run {} finished", self.flow, self.token.generation());
                return false;
            };
            if matches!(self.execute(cue, tick, scene, session, host), Step::Stop) {
                return false;
            }
        }
    }

    fn poll_wait(
        &mut self,
        now: Instant,
        scene: &mut Scene,
        session: &mut Session,
        host: &mut dyn HostView,
    ) -> Step {
        match std::mem::replace(&mut self.wait, Wait::Idle) {
            Wait::Idle => Step::Continue,
            Wait::Until(deadline) => {
                if now >= deadline {
                    Step::Continue
                } else {
                    self.wait = Wait::Until(deadline);
                    Step::Suspend
                }
            }
            Wait::Tracing(mut ramps) => {
                let mut done = true;
                for ramp in &mut ramps {
                    done &= ramp.advance(now, scene);
                }
                if done {
                    Step::Continue
                } else {
                    self.wait = Wait::Tracing(ramps);
                    Step::Suspend
                }
            }
            Wait::Reply(pending) => match pending.poll() {
                Some(result) => self.settle(result, session, host),
                None => {
                    self.wait = Wait::Reply(pending);
                    Step::Suspend
                }
            },
        }
    }

    fn execute(
        &mut self,
        cue: Cue,
        tick: &Tick<'_>,
        scene: &mut Scene,
        session: &mut Session,
        host: &mut dyn HostView,
    ) -> Step {
        match cue {
            Cue::Clear => scene.clear(),
            Cue::Point {
                slot,
                at,
                color,
                scale,
            } => {
                let id = scene.add_point(at.x, at.y, color, scale);
                self.bind(slot, id);
            }
            Cue::Label {
                slot,
                text,
                anchor,
                color,
            } => {
                let id = scene.add_label(text, anchor, color);
                self.bind(slot, id);
            }
            Cue::Remove(slot) => {
                let removed = self
                    .slots
                    .get_mut(slot.0)
                    .and_then(Option::take)
                    .and_then(|id| scene.remove_element(id));
                if removed.is_none() {
                    log::debug!("{}: slot {} already gone", self.flow, slot.0);
                }
            }
            Cue::Dwell(duration) => self.wait = Wait::Until(tick.now + duration),
            Cue::Trace(paths) => {
                let ramps = paths
                    .into_iter()
                    .map(|path| {
                        let ramp = TraceRamp::begin(
                            scene,
                            path.from,
                            path.to,
                            path.color,
                            tick.pacing,
                            tick.now,
                        );
                        self.bind(path.slot, ramp.element());
                        ramp
                    })
                    .collect();
                self.wait = Wait::Tracing(ramps);
            }
            Cue::Call { request, failure } => {
                self.failure = failure;
                match dispatch(tick.service, request, tick.dispatch) {
                    CallState::Ready(result) => {
                        return self.settle(result, session, host);
                    }
                    CallState::Pending(pending) => {
                        self.wait = Wait::Reply(pending);
                    }
                }
            }
            Cue::Present => match &self.reply {
                Some(reply) => present(reply, host),
                None => log::warn!("{}: nothing to present", self.flow),
            },
        }
        Step::Continue
    }

    fn settle(
        &mut self,
        result: Result<ServiceReply, ServiceError>,
        session: &mut Session,
        host: &mut dyn HostView,
    ) -> Step {
        match result {
            Ok(reply) => {
                log::info!("{} service call succeeded", self.flow);
                session.record(&reply);
                self.reply = Some(reply);
                Step::Continue
            }
            Err(e) => {
                log::error!("{} service call failed: {e}", self.flow);
                host.notify(&Notice::failure(self.flow, self.failure.as_str()));
                Step::Stop
            }
        }
    }

    fn bind(&mut self, slot: Slot, id: ElementId) {
        if let Some(entry) = self.slots.get_mut(slot.0) {
            *entry = Some(id);
        }
    }

    fn next_wake(&self) -> Option<Instant> {
        match &self.wait {
            Wait::Until(deadline) => Some(*deadline),
            Wait::Tracing(ramps) => {
                ramps.iter().filter_map(TraceRamp::next_wake).min()
            }
            Wait::Idle | Wait::Reply(_) => None,
        }
    }
}

fn present(reply: &ServiceReply, host: &mut dyn HostView) {
    match reply {
        ServiceReply::KeyPair(pair) => {
            host.write_field(
                ResultField::PrivateKey,
                &abbreviate(&pair.private_key, KEY_PREVIEW_CHARS),
            );
            host.write_field(
                ResultField::PublicKey,
                &abbreviate(&pair.public_key, KEY_PREVIEW_CHARS),
            );
        }
        ServiceReply::Ciphertext(ciphertext) => {
            host.write_field(ResultField::Ciphertext, ciphertext);
        }
        ServiceReply::Plaintext(plaintext) => {
            host.write_field(ResultField::Plaintext, plaintext);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::{Vec2, Vec3};

    use super::*;
    use crate::choreography::{ManualClock, ScriptBuilder};
    use crate::host::{NoticeLevel, RecordingHost};
    use crate::options::Options;
    use crate::service::{CannedService, KeyPair, ServiceRequest};
    use crate::util::color::Color;

    struct Rig {
        clock: ManualClock,
        director: Director,
        viewports: Viewports,
        session: Session,
        host: RecordingHost,
        container: ContainerId,
    }

    impl Rig {
        fn new(service: CannedService) -> Self {
            let clock = ManualClock::new();
            let container = ContainerId::new("keygen");
            let mut viewports = Viewports::new();
            viewports.declare(container.clone(), 800, 600);
            let _ = viewports.create(
                &container,
                Color(0x00ff88),
                &Options::default(),
                1,
            );
            Self {
                director: Director::new(
                    Box::new(clock.clone()),
                    Arc::new(service),
                    CallDispatch::Inline,
                    TracePacing::default(),
                ),
                clock,
                viewports,
                session: Session::new(),
                host: RecordingHost::new(),
                container,
            }
        }

        fn tick(&mut self) {
            self.director.advance(
                &mut self.viewports,
                &mut self.session,
                &mut self.host,
            );
        }

        fn run_to_idle(&mut self) {
            self.tick();
            for _ in 0..10_000 {
                if self.director.is_idle() {
                    return;
                }
                let wake = self.director.next_wake().unwrap();
                self.clock.set(wake);
                self.tick();
            }
            panic!("director never went idle");
        }

        fn scene(&self) -> &Scene {
            self.viewports.scene(&self.container).unwrap()
        }
    }

    fn service() -> CannedService {
        CannedService::new(KeyPair {
            private_key: "abc".into(),
            public_key: "xyz".into(),
        })
    }

    #[test]
    fn dwell_holds_later_cues() {
        let mut rig = Rig::new(service());
        let mut b = ScriptBuilder::new();
        b.dwell(Duration::from_millis(500));
        let _ = b.point(Vec2::ZERO, Color::WHITE, 1.0);
        let _ = rig.director.start(
            FlowKind::KeyGeneration,
            rig.container.clone(),
            b.build(),
        );

        rig.tick();
        assert!(rig.scene().is_empty());
        rig.clock.advance(Duration::from_millis(499));
        rig.tick();
        assert!(rig.scene().is_empty());
        rig.clock.advance(Duration::from_millis(1));
        rig.tick();
        assert_eq!(rig.scene().len(), 1);
        assert!(rig.director.is_idle());
    }

    #[test]
    fn relaunch_drops_stale_run_before_it_touches_stage() {
        let mut rig = Rig::new(service());
        let script = |text: &str| {
            let mut b = ScriptBuilder::new();
            b.dwell(Duration::from_millis(100));
            let _ = b.label(text, Vec3::ZERO, Color::WHITE);
            b.build()
        };
        let first = rig.director.start(
            FlowKind::KeyGeneration,
            rig.container.clone(),
            script("stale"),
        );
        rig.tick();
        let second = rig.director.start(
            FlowKind::KeyGeneration,
            rig.container.clone(),
            script("fresh"),
        );
        assert_ne!(first, second);
        rig.run_to_idle();

        let texts: Vec<_> =
            rig.scene().labels().map(|(_, l)| l.text.clone()).collect();
        assert_eq!(texts, ["fresh"]);
    }

    #[test]
    fn failed_call_stops_run_without_rollback() {
        let mut rig = Rig::new(service().failing(ServiceError::Status(500)));
        let mut b = ScriptBuilder::new();
        let _ = b.point(Vec2::ZERO, Color::WHITE, 1.0);
        b.call(ServiceRequest::GenerateKeys, "Key generation failed");
        let _ = b.label("never", Vec3::ZERO, Color::WHITE);
        let _ = rig.director.start(
            FlowKind::KeyGeneration,
            rig.container.clone(),
            b.build(),
        );
        rig.run_to_idle();

        assert_eq!(rig.scene().len(), 1);
        assert_eq!(rig.host.notices().len(), 1);
        assert_eq!(rig.host.notices()[0].level, NoticeLevel::Failure);
        assert_eq!(rig.host.notices()[0].message, "Key generation failed");
        assert!(rig.session.key_pair().is_none());
    }

    #[test]
    fn successful_call_updates_session_and_presents() {
        let mut rig = Rig::new(service());
        let mut b = ScriptBuilder::new();
        b.call(ServiceRequest::GenerateKeys, "Key generation failed");
        b.present();
        let _ = rig.director.start(
            FlowKind::KeyGeneration,
            rig.container.clone(),
            b.build(),
        );
        rig.run_to_idle();

        assert_eq!(rig.session.public_key(), Some("xyz"));
        assert_eq!(rig.host.field(ResultField::PrivateKey), Some("abc"));
        assert_eq!(rig.host.field(ResultField::PublicKey), Some("xyz"));
    }

    #[test]
    fn joint_trace_waits_for_all_paths() {
        let mut rig = Rig::new(service());
        let mut b = ScriptBuilder::new();
        let _ = b.trace_jointly(&[
            (Vec3::ZERO, Vec3::X, Color::WHITE),
            (Vec3::ZERO, Vec3::Y, Color::WHITE),
        ]);
        let _ = b.point(Vec2::ONE, Color::WHITE, 1.0);
        let _ = rig.director.start(
            FlowKind::Encryption,
            rig.container.clone(),
            b.build(),
        );
        rig.tick();
        assert_eq!(rig.scene().transitions().count(), 2);
        assert_eq!(rig.scene().points().count(), 0);

        rig.run_to_idle();
        assert!(rig.scene().transitions().all(|(_, t)| t.opacity == 1.0));
        assert_eq!(rig.scene().points().count(), 1);
    }

    #[test]
    fn removing_slot_twice_is_harmless() {
        let mut rig = Rig::new(service());
        let mut b = ScriptBuilder::new();
        let p = b.point(Vec2::ZERO, Color::WHITE, 1.0);
        b.remove(p);
        b.remove(p);
        let _ = rig.director.start(
            FlowKind::Decryption,
            rig.container.clone(),
            b.build(),
        );
        rig.run_to_idle();
        assert!(rig.scene().is_empty());
    }

    #[test]
    fn run_without_scene_is_dropped() {
        let mut rig = Rig::new(service());
        let mut b = ScriptBuilder::new();
        b.clear();
        let _ = rig.director.start(
            FlowKind::Decryption,
            ContainerId::new("decrypt"),
            b.build(),
        );
        rig.tick();
        assert!(rig.director.is_idle());
    }
}
