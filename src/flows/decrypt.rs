//! Decryption: received C1 and C2, shared secret, recovered M, service
//! call.

use glam::{Vec2, Vec3};

use super::encrypt::{C1, C2, MESSAGE, SECRET};
use super::{
    FlowError, FlowKind, Session, CAPTION_ANCHOR, FINAL_ANCHOR, GREEN, MAGENTA,
    YELLOW,
};
use crate::choreography::{Script, ScriptBuilder};
use crate::options::TimingOptions;
use crate::service::{DecryptRequest, ServiceRequest};
use crate::util::color::Color;

fn offset(p: Vec2, dy: f32) -> Vec3 {
    Vec3::new(p.x, p.y + dy, 0.0)
}

/// Build the decryption script for the session's ciphertext.
///
/// # Errors
///
/// [`FlowError::MissingCiphertext`] or [`FlowError::MissingPrivateKey`]
/// when the session lacks either.
pub fn script(
    session: &Session,
    timing: &TimingOptions,
) -> Result<Script, FlowError> {
    let ciphertext = session.ciphertext().ok_or(FlowError::MissingCiphertext)?;
    let private_key = session.private_key().ok_or(FlowError::MissingPrivateKey)?;

    let mut b = ScriptBuilder::new();
    b.clear();

    let _ = b.label(
        "Step 1: Received Ciphertext (C1, C2)",
        CAPTION_ANCHOR,
        Color::WHITE,
    );
    let _ = b.point(C1, Color::WHITE, 1.0);
    let _ = b.label("C1", offset(C1, 0.6), Color::WHITE);
    let c2 = b.point(C2, MAGENTA, 1.3);
    let _ = b.label("C2", offset(C2, 0.6), MAGENTA);
    b.dwell(timing.step_dwell());

    let _ = b.label(
        "Step 2: Compute Secret S = d * C1",
        CAPTION_ANCHOR,
        YELLOW,
    );
    let _ = b.trace(C1.extend(0.0), SECRET.extend(0.0), YELLOW);
    let s = b.point(SECRET, YELLOW, 1.0);
    let _ = b.label("Secret S", offset(SECRET, -0.6), YELLOW);
    b.dwell(timing.step_dwell());

    let _ = b.label("Step 3: Decrypt M = C2 - S", CAPTION_ANCHOR, GREEN);
    let _ = b.trace_jointly(&[
        (C2.extend(0.0), MESSAGE.extend(0.0), MAGENTA),
        (SECRET.extend(0.0), MESSAGE.extend(0.0), YELLOW),
    ]);
    b.remove(c2);
    b.remove(s);
    let _ = b.point(MESSAGE, GREEN, 1.5);
    let _ = b.label("Decrypted Message (M)", offset(MESSAGE, 0.6), GREEN);
    b.dwell(timing.short_dwell());

    b.call(
        ServiceRequest::Decrypt(DecryptRequest {
            ciphertext: ciphertext.to_owned(),
            private_key: private_key.to_owned(),
        }),
        FlowKind::Decryption.failure_notice(),
    );
    b.present();
    let _ = b.label("Decryption Successful!", FINAL_ANCHOR, GREEN);
    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreography::Cue;
    use crate::service::KeyPair;

    #[test]
    fn needs_ciphertext_and_private_key() {
        let timing = TimingOptions::default();
        let mut session = Session::new();
        assert_eq!(
            script(&session, &timing),
            Err(FlowError::MissingCiphertext)
        );
        session.set_ciphertext("ct");
        assert_eq!(
            script(&session, &timing),
            Err(FlowError::MissingPrivateKey)
        );
        session.set_key_pair(KeyPair {
            private_key: "sk".into(),
            public_key: "pk".into(),
        });
        assert!(script(&session, &timing).is_ok());
    }

    #[test]
    fn request_uses_session_snapshot() {
        let mut session = Session::new();
        session.set_ciphertext("ct");
        session.set_key_pair(KeyPair {
            private_key: "sk".into(),
            public_key: "pk".into(),
        });
        let script = script(&session, &TimingOptions::default()).unwrap();
        assert!(script.cues().iter().any(|c| matches!(
            c,
            Cue::Call {
                request: ServiceRequest::Decrypt(DecryptRequest { ciphertext, private_key }),
                ..
            } if ciphertext == "ct" && private_key == "sk"
        )));
    }
}
