//! Encryption: message point, public key, ephemeral C1, shared secret,
//! C2, service call.

use glam::{Vec2, Vec3};

use super::{
    FlowError, FlowKind, Session, CAPTION_ANCHOR, CYAN, FINAL_ANCHOR, GRAY,
    GREEN, MAGENTA, YELLOW,
};
use crate::choreography::{Script, ScriptBuilder};
use crate::options::TimingOptions;
use crate::service::{EncryptRequest, ServiceRequest};
use crate::util::color::Color;

/// Message point M.
pub const MESSAGE: Vec2 = Vec2::new(-1.0, 2.0);
/// Receiver public key P.
pub const PUBLIC_KEY: Vec2 = Vec2::new(3.0, -2.0);
/// Generator point G.
pub const GENERATOR: Vec2 = Vec2::new(-2.0, -1.5);
/// First ciphertext component C1 = k·G.
pub const C1: Vec2 = Vec2::new(-3.0, 1.0);
/// Shared secret S = k·P.
pub const SECRET: Vec2 = Vec2::new(1.0, -1.0);
/// Second ciphertext component C2 = M + S.
pub const C2: Vec2 = Vec2::new(2.0, 2.0);

fn below(p: Vec2, by: f32) -> Vec3 {
    Vec3::new(p.x, p.y - by, 0.0)
}

fn above(p: Vec2, by: f32) -> Vec3 {
    Vec3::new(p.x, p.y + by, 0.0)
}

/// Build the encryption script for `message`.
///
/// # Errors
///
/// [`FlowError::MissingMessage`] if `message` is blank,
/// [`FlowError::MissingPublicKey`] if no key pair exists yet.
pub fn script(
    message: &str,
    session: &Session,
    timing: &TimingOptions,
) -> Result<Script, FlowError> {
    let plaintext = message.trim();
    if plaintext.is_empty() {
        return Err(FlowError::MissingMessage);
    }
    let public_key = session.public_key().ok_or(FlowError::MissingPublicKey)?;

    let mut b = ScriptBuilder::new();
    b.clear();

    let _ = b.label(
        "Step 1: Mapping Message to Curve Point (M)",
        CAPTION_ANCHOR,
        MAGENTA,
    );
    let m = b.point(MESSAGE, MAGENTA, 1.2);
    let _ = b.label("Message (M)", below(MESSAGE, 0.7), MAGENTA);
    b.dwell(timing.step_dwell());

    let _ = b.label("Step 2: Retrieve Public Key (P)", CAPTION_ANCHOR, CYAN);
    let _ = b.point(PUBLIC_KEY, CYAN, 1.0);
    let _ = b.label("Public Key (P)", below(PUBLIC_KEY, 0.8), CYAN);
    b.dwell(timing.step_dwell());

    let _ = b.label(
        "Step 3: Generate Random k & Calculate C1 = k*G",
        CAPTION_ANCHOR,
        Color::WHITE,
    );
    let _ = b.point(GENERATOR, GRAY, 0.8);
    let _ = b.label("G", below(GENERATOR, 0.7), GRAY);
    let _ = b.trace(GENERATOR.extend(0.0), C1.extend(0.0), Color::WHITE);
    let _ = b.point(C1, Color::WHITE, 1.0);
    let _ = b.label("C1", above(C1, 0.5), Color::WHITE);
    b.dwell(timing.step_dwell());

    let _ = b.label(
        "Step 4: Calculate Shared Secret S = k*P",
        CAPTION_ANCHOR,
        YELLOW,
    );
    let _ = b.trace(PUBLIC_KEY.extend(0.0), SECRET.extend(0.0), YELLOW);
    let s = b.point(SECRET, YELLOW, 0.8);
    let _ = b.label("Secret S", below(SECRET, 0.6), YELLOW);
    b.dwell(timing.step_dwell());

    let _ = b.label("Step 5: Encrypt M: C2 = M + S", CAPTION_ANCHOR, MAGENTA);
    let _ = b.trace_jointly(&[
        (MESSAGE.extend(0.0), C2.extend(0.0), MAGENTA),
        (SECRET.extend(0.0), C2.extend(0.0), YELLOW),
    ]);
    b.remove(m);
    b.remove(s);
    let _ = b.point(C2, MAGENTA, 1.5);
    let _ = b.label("C2 (Encrypted)", above(C2, 0.6), MAGENTA);
    b.dwell(timing.short_dwell());

    b.call(
        ServiceRequest::Encrypt(EncryptRequest {
            plaintext: plaintext.to_owned(),
            public_key: public_key.to_owned(),
        }),
        FlowKind::Encryption.failure_notice(),
    );
    b.present();
    let _ = b.label("Encryption Complete! (C1, C2) sent.", FINAL_ANCHOR, GREEN);
    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreography::Cue;
    use crate::service::KeyPair;

    fn keyed() -> Session {
        let mut session = Session::new();
        session.set_key_pair(KeyPair {
            private_key: "sk".into(),
            public_key: "pk".into(),
        });
        session
    }

    #[test]
    fn blank_message_is_rejected_first() {
        let timing = TimingOptions::default();
        assert_eq!(
            script("   ", &Session::new(), &timing),
            Err(FlowError::MissingMessage)
        );
        assert_eq!(
            script("hi", &Session::new(), &timing),
            Err(FlowError::MissingPublicKey)
        );
    }

    #[test]
    fn request_carries_trimmed_message_and_key() {
        let script = script("  hello ", &keyed(), &TimingOptions::default())
            .unwrap();
        let request = script.cues().iter().find_map(|c| match c {
            Cue::Call { request, .. } => Some(request.clone()),
            _ => None,
        });
        assert_eq!(
            request,
            Some(ServiceRequest::Encrypt(EncryptRequest {
                plaintext: "hello".into(),
                public_key: "pk".into(),
            }))
        );
    }

    #[test]
    fn m_and_s_merge_in_one_joint_trace() {
        let script =
            script("hello", &keyed(), &TimingOptions::default()).unwrap();
        let joint = script
            .cues()
            .iter()
            .filter(|c| matches!(c, Cue::Trace(paths) if paths.len() == 2))
            .count();
        assert_eq!(joint, 1);
    }
}
