//! Key generation: generator point, service call, scalar-multiplication
//! hops along the curve, public key.

use std::ops::Range;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{FlowKind, CAPTION_ANCHOR, CYAN, FINAL_ANCHOR, GREEN};
use crate::choreography::{Script, ScriptBuilder};
use crate::options::TimingOptions;
use crate::scene::backdrop::{curve_y_squared, CURVE_SCALE};
use crate::service::ServiceRequest;
use crate::util::color::Color;

/// Generator point G.
pub const GENERATOR: Vec2 = Vec2::new(-2.0, -1.5);

/// Unscaled x range hops are drawn from. The lower bound keeps
/// `x³ + 7` non-negative so every hop lands on the drawn curve.
pub const HOP_X: Range<f32> = -1.9..2.5;

const HOP_MARKER_SCALE: f32 = 0.5;
const PUBLIC_KEY_SCALE: f32 = 1.5;

/// A random point on the displayed curve.
pub fn hop_point<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let x = rng.random_range(HOP_X);
    let y = curve_y_squared(x).max(0.0).sqrt();
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    Vec2::new(x, sign * y) * CURVE_SCALE
}

/// Build the key-generation script. Hops are drawn from `rng`.
pub fn script<R: Rng + ?Sized>(timing: &TimingOptions, rng: &mut R) -> Script {
    let mut b = ScriptBuilder::new();
    b.clear();

    let _ = b.label("Step 1: Selecting Generator Point G", CAPTION_ANCHOR, CYAN);
    let _ = b.point(GENERATOR, CYAN, 1.0);
    let _ = b.label("G", GENERATOR.extend(0.0) - Vec3::Y * 0.7, CYAN);
    b.dwell(timing.short_dwell());

    b.call(
        ServiceRequest::GenerateKeys,
        FlowKind::KeyGeneration.failure_notice(),
    );

    let _ = b.label("Step 2: Private Key (k) selected", CAPTION_ANCHOR, Color::WHITE);
    b.dwell(timing.short_dwell());

    let _ = b.label(
        "Step 3: Computing P = k * G",
        Vec3::new(0.0, 3.0, 0.0),
        GREEN,
    );
    let mut current = GENERATOR;
    let hops = timing.hop_count.max(1);
    for i in 0..hops {
        let next = hop_point(rng);
        let _ = b.trace(current.extend(0.0), next.extend(0.0), GREEN);
        current = next;
        if i + 1 == hops {
            let _ = b.point(next, Color::WHITE, PUBLIC_KEY_SCALE);
            b.dwell(timing.hop_dwell());
        } else {
            let marker = b.point(next, GREEN, HOP_MARKER_SCALE);
            b.dwell(timing.hop_dwell());
            b.remove(marker);
        }
    }

    let _ = b.label("Step 4: Public Key Generated!", FINAL_ANCHOR, GREEN);
    let _ = b.label(
        "Public Key (P)",
        current.extend(0.0) - Vec3::Y * 0.8,
        Color::WHITE,
    );
    b.present();
    b.build()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::choreography::Cue;

    #[test]
    fn hops_lie_on_the_scaled_curve() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let p = hop_point(&mut rng) / CURVE_SCALE;
            assert!(p.x >= HOP_X.start && p.x < HOP_X.end);
            let expected = curve_y_squared(p.x).sqrt();
            assert!((p.y.abs() - expected).abs() < 1e-3, "{p:?}");
        }
    }

    #[test]
    fn script_clears_once_and_calls_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let script = script(&TimingOptions::default(), &mut rng);
        let clears = script.cues().iter().filter(|c| **c == Cue::Clear).count();
        let calls = script
            .cues()
            .iter()
            .filter(|c| matches!(c, Cue::Call { .. }))
            .count();
        assert_eq!(clears, 1);
        assert_eq!(calls, 1);
        assert_eq!(script.cues()[0], Cue::Clear);
    }

    #[test]
    fn one_trace_per_hop() {
        let mut rng = StdRng::seed_from_u64(2);
        let script = script(&TimingOptions::default(), &mut rng);
        let traces = script
            .cues()
            .iter()
            .filter(|c| matches!(c, Cue::Trace(_)))
            .count();
        assert_eq!(traces, 8);
    }

    #[test]
    fn call_precedes_hops() {
        let mut rng = StdRng::seed_from_u64(3);
        let script = script(&TimingOptions::default(), &mut rng);
        let cues = script.cues();
        let call = cues
            .iter()
            .position(|c| matches!(c, Cue::Call { .. }))
            .unwrap();
        let first_trace =
            cues.iter().position(|c| matches!(c, Cue::Trace(_))).unwrap();
        assert!(call < first_trace);
        assert_eq!(cues.last(), Some(&Cue::Present));
    }
}
