//! End-to-end runs of the three flows against a canned service.

use std::sync::Arc;

use ecviz::{
    choreography::ManualClock,
    flows::{FlowError, FlowKind},
    host::{NoticeLevel, RecordingHost, ResultField},
    input::InputEvent,
    scene::{CreateOutcome, Scene},
    service::{CallDispatch, CannedService, KeyPair, ServiceError},
    CurveVizEngine, Options, VizCommand,
};

struct Harness {
    clock: ManualClock,
    service: Arc<CannedService>,
    engine: CurveVizEngine<RecordingHost>,
}

impl Harness {
    fn new(service: CannedService) -> Self {
        let mut options = Options::default();
        options.service.dispatch = CallDispatch::Inline;
        let clock = ManualClock::new();
        let service = Arc::new(service);
        let mut engine = CurveVizEngine::with_clock(
            options,
            service.clone(),
            RecordingHost::new(),
            Box::new(clock.clone()),
            7,
        );
        engine.declare_all_viewports(800, 600);
        Self {
            clock,
            service,
            engine,
        }
    }

    fn with_views(service: CannedService) -> Self {
        let mut h = Self::new(service);
        for flow in FlowKind::ALL {
            assert_eq!(h.engine.activate_view(flow), CreateOutcome::Created);
        }
        h
    }

    /// Jump the clock from wake to wake until every run has finished.
    fn run_to_idle(&mut self) {
        self.engine.frame();
        for _ in 0..10_000 {
            let Some(wake) = self.engine.next_wake() else {
                return;
            };
            self.clock.set(wake);
            self.engine.frame();
        }
        panic!("flows never finished");
    }

    fn scene(&self, flow: FlowKind) -> &Scene {
        self.engine.scene(flow).unwrap()
    }

    fn notices(&self) -> Vec<(NoticeLevel, FlowKind)> {
        self.engine
            .host()
            .notices()
            .iter()
            .map(|n| (n.level, n.flow))
            .collect()
    }
}

fn service() -> CannedService {
    CannedService::new(KeyPair {
        private_key: "abc".into(),
        public_key: "xyz".into(),
    })
}

fn label_texts(scene: &Scene) -> Vec<String> {
    scene.labels().map(|(_, l)| l.text.clone()).collect()
}

#[test]
fn key_generation_runs_to_completion() {
    let mut h = Harness::with_views(service());
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    assert!(h.engine.is_running(FlowKind::KeyGeneration));
    h.run_to_idle();

    let scene = h.scene(FlowKind::KeyGeneration);
    assert_eq!(scene.clear_count(), 1);
    assert_eq!(scene.transitions().count(), 8);
    assert!(scene.transitions().all(|(_, t)| t.opacity == 1.0));
    assert!(label_texts(scene).iter().any(|t| t == "Public Key (P)"));

    let host = h.engine.host();
    assert_eq!(host.field(ResultField::PrivateKey), Some("abc"));
    assert_eq!(host.field(ResultField::PublicKey), Some("xyz"));
    assert_eq!(h.engine.session().public_key(), Some("xyz"));
    assert_eq!(h.service.calls(), 1);
    assert!(host.notices().is_empty());
}

#[test]
fn full_round_trip_carries_session_between_flows() {
    let mut h = Harness::with_views(service().with_ciphertext("C1C2"));
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.run_to_idle();

    h.engine
        .execute(VizCommand::Encrypt {
            message: "  hello  ".into(),
        })
        .unwrap();
    assert_eq!(h.engine.active_view(), Some(FlowKind::Encryption));
    h.run_to_idle();
    assert_eq!(
        h.service.last_request().as_deref(),
        Some("encrypt plaintext=hello public_key=xyz")
    );
    assert_eq!(h.engine.host().field(ResultField::Ciphertext), Some("C1C2"));

    h.engine.execute(VizCommand::Decrypt).unwrap();
    h.run_to_idle();
    assert_eq!(
        h.engine.host().field(ResultField::Plaintext),
        Some("decrypted(C1C2)")
    );
    assert_eq!(h.engine.session().plaintext(), Some("decrypted(C1C2)"));
    assert!(label_texts(h.scene(FlowKind::Decryption))
        .iter()
        .any(|t| t == "Decryption Successful!"));
    assert_eq!(h.service.calls(), 3);
}

#[test]
fn empty_message_is_rejected_before_any_side_effect() {
    let mut h = Harness::with_views(service());
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.run_to_idle();
    let _ = h.engine.activate_view(FlowKind::KeyGeneration);

    let err = h.engine.encrypt("   ").unwrap_err();
    assert_eq!(err, FlowError::MissingMessage);
    assert_eq!(h.service.calls(), 1);
    assert_eq!(h.scene(FlowKind::Encryption).clear_count(), 0);
    assert_eq!(h.engine.active_view(), Some(FlowKind::KeyGeneration));
    assert_eq!(
        h.notices(),
        vec![(NoticeLevel::Warning, FlowKind::Encryption)]
    );
}

#[test]
fn encrypt_without_keys_warns() {
    let mut h = Harness::with_views(service());
    assert_eq!(
        h.engine.encrypt("hello").unwrap_err(),
        FlowError::MissingPublicKey
    );
    assert_eq!(h.service.calls(), 0);
    assert_eq!(h.notices().len(), 1);
}

#[test]
fn decrypt_without_ciphertext_warns() {
    let mut h = Harness::with_views(service());
    assert_eq!(
        h.engine.decrypt().unwrap_err(),
        FlowError::MissingCiphertext
    );
    assert_eq!(h.service.calls(), 0);
    assert_eq!(
        h.notices(),
        vec![(NoticeLevel::Warning, FlowKind::Decryption)]
    );
    assert!(h.scene(FlowKind::Decryption).is_empty());
}

#[test]
fn flow_without_scene_is_refused_silently() {
    let mut h = Harness::new(service());
    assert_eq!(
        h.engine.generate_keys().unwrap_err(),
        FlowError::NoScene(FlowKind::KeyGeneration)
    );
    assert!(h.engine.host().notices().is_empty());
    assert_eq!(h.service.calls(), 0);
}

#[test]
fn relaunch_supersedes_running_flow() {
    let mut h = Harness::with_views(service());
    let first = h.engine.generate_keys().unwrap();
    h.engine.frame();
    let second = h.engine.generate_keys().unwrap();
    assert!(second.generation() > first.generation());
    h.run_to_idle();

    // The first run was dwelling before its call and never resumed.
    let scene = h.scene(FlowKind::KeyGeneration);
    assert_eq!(scene.clear_count(), 2);
    assert_eq!(scene.transitions().count(), 8);
    assert_eq!(h.service.calls(), 1);
}

#[test]
fn service_failure_notifies_once_and_keeps_the_stage() {
    let mut h = Harness::with_views(
        service().failing(ServiceError::Status(500)),
    );
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.run_to_idle();

    assert_eq!(
        h.notices(),
        vec![(NoticeLevel::Failure, FlowKind::KeyGeneration)]
    );
    assert_eq!(h.engine.session().key_pair(), None);
    assert_eq!(h.engine.host().field(ResultField::PublicKey), None);
    let scene = h.scene(FlowKind::KeyGeneration);
    assert!(!scene.is_empty());
    assert_eq!(scene.transitions().count(), 0);
    assert!(h.engine.is_idle());
}

#[test]
fn frames_hand_label_overlays_to_the_host() {
    let mut h = Harness::with_views(service());
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.engine.frame();

    let overlays = h
        .engine
        .host()
        .overlays(&FlowKind::KeyGeneration.container());
    assert!(overlays.iter().any(|o| o.text.starts_with("Step 1")));
    assert!(overlays.iter().any(|o| o.text == "G"));
    assert!(h
        .engine
        .host()
        .overlays(&FlowKind::Decryption.container())
        .is_empty());
}

#[test]
fn new_options_apply_to_the_next_run() {
    let mut h = Harness::with_views(service());
    let mut options = h.engine.options().clone();
    options.timing.hop_count = 3;
    options.timing.trace_steps = 4;
    h.engine.set_options(options);

    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.run_to_idle();
    assert_eq!(h.scene(FlowKind::KeyGeneration).transitions().count(), 3);
}

fn step_captions(scene: &Scene) -> Vec<String> {
    label_texts(scene)
        .into_iter()
        .filter(|t| t.starts_with("Step "))
        .collect()
}

#[test]
fn step_captions_stay_until_the_next_clear() {
    let mut h = Harness::with_views(service().with_ciphertext("C1C2"));
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.run_to_idle();
    let keygen = step_captions(h.scene(FlowKind::KeyGeneration));
    assert_eq!(keygen.len(), 4);
    assert_eq!(keygen[0], "Step 1: Selecting Generator Point G");
    assert!(label_texts(h.scene(FlowKind::KeyGeneration))
        .iter()
        .any(|t| t == "G"));

    h.engine
        .execute(VizCommand::Encrypt {
            message: "hello".into(),
        })
        .unwrap();
    h.run_to_idle();
    let encrypt = step_captions(h.scene(FlowKind::Encryption));
    assert_eq!(encrypt.len(), 5);
    assert_eq!(encrypt[0], "Step 1: Mapping Message to Curve Point (M)");
    assert_eq!(encrypt[4], "Step 5: Encrypt M: C2 = M + S");

    // A relaunch clears the stage once and narrates from the start again.
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.engine.frame();
    let scene = h.scene(FlowKind::KeyGeneration);
    assert_eq!(scene.clear_count(), 2);
    assert_eq!(
        step_captions(scene),
        vec!["Step 1: Selecting Generator Point G".to_owned()]
    );
}

#[test]
fn long_keys_are_shown_abbreviated_but_used_whole() {
    let private_key = "d".repeat(64);
    let public_key = format!("04{}", "ab".repeat(40));
    let mut h = Harness::with_views(CannedService::new(KeyPair {
        private_key: private_key.clone(),
        public_key: public_key.clone(),
    }));
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.run_to_idle();

    let host = h.engine.host();
    assert_eq!(
        host.field(ResultField::PrivateKey),
        Some(format!("{}...", &private_key[..30]).as_str())
    );
    assert_eq!(
        host.field(ResultField::PublicKey),
        Some(format!("{}...", &public_key[..30]).as_str())
    );
    assert_eq!(h.engine.session().public_key(), Some(public_key.as_str()));

    h.engine
        .execute(VizCommand::Encrypt {
            message: "hi".into(),
        })
        .unwrap();
    h.run_to_idle();
    assert_eq!(
        h.service.last_request(),
        Some(format!("encrypt plaintext=hi public_key={public_key}"))
    );
}

#[test]
fn visible_labels_become_overlays_with_positions() {
    let mut h = Harness::with_views(service());
    h.engine.execute(VizCommand::GenerateKeys).unwrap();
    h.engine.frame();

    let scene = h.scene(FlowKind::KeyGeneration);
    let overlays = h
        .engine
        .host()
        .overlays(&FlowKind::KeyGeneration.container());
    assert_eq!(overlays.len(), scene.labels().count());
    for ((_, label), overlay) in scene.labels().zip(overlays) {
        assert!(label.is_visible());
        assert_eq!(overlay.position, label.placement.position);
        assert_eq!(overlay.opacity, 1.0);
    }
    // The generator label sits below-left of the centre, inside the view.
    let g = overlays.iter().find(|o| o.text == "G").unwrap();
    assert!(g.position.x > 0.0 && g.position.x < 400.0);
    assert!(g.position.y > 300.0 && g.position.y < 600.0);
}

#[test]
fn home_field_turns_until_toggled_off() {
    let mut h = Harness::new(service());
    assert!(h.engine.hero().is_none());
    h.engine.execute(VizCommand::ShowHome).unwrap();
    assert_eq!(h.engine.active_view(), None);
    assert_eq!(h.engine.show_home(), CreateOutcome::AlreadyBound);

    h.engine.frame();
    let turned = h.engine.hero().unwrap().rotation();
    assert!(turned.y > 0.0);

    h.engine.execute(VizCommand::ToggleBackground).unwrap();
    assert!(!h.engine.background_animation());
    h.engine.frame();
    h.engine.frame();
    assert_eq!(h.engine.hero().unwrap().rotation(), turned);

    assert!(h.engine.toggle_background());
    h.engine.frame();
    assert!(h.engine.hero().unwrap().rotation().y > turned.y);
}

#[test]
fn home_field_follows_pointer_and_resize() {
    let mut h = Harness::with_views(service());
    assert_eq!(h.engine.show_home(), CreateOutcome::Created);
    h.engine.handle_input(InputEvent::CursorMoved { x: 800.0, y: 300.0 });
    h.engine.frame();
    let hero = h.engine.hero().unwrap();
    assert!((hero.rotation().y - 0.003).abs() < 1e-6);
    assert_eq!(hero.rotation().x, 0.0);

    h.engine.handle_input(InputEvent::Resized {
        width: 1000,
        height: 500,
    });
    assert_eq!(h.engine.hero().unwrap().surface_size(), (1000, 500));
    assert_eq!(h.scene(FlowKind::Encryption).surface_size(), (1000, 500));
}

#[test]
fn toggle_before_home_starts_it_paused() {
    let mut h = Harness::new(service());
    assert!(!h.engine.toggle_background());
    assert_eq!(h.engine.show_home(), CreateOutcome::Created);
    assert!(h.engine.hero().unwrap().is_paused());
    h.engine.frame();
    assert_eq!(h.engine.hero().unwrap().rotation(), glam::Vec2::ZERO);
}

#[test]
fn superseded_run_is_dropped_at_its_next_wait() {
    let mut h = Harness::with_views(service());
    let _ = h.engine.generate_keys().unwrap();
    assert_eq!(h.engine.active_runs(), 1);
    let _ = h.engine.generate_keys().unwrap();
    assert!((1..=2).contains(&h.engine.active_runs()));
    h.run_to_idle();
    assert_eq!(h.engine.active_runs(), 0);
    assert!(h
        .engine
        .viewports()
        .has_container(&FlowKind::Decryption.container()));
}
