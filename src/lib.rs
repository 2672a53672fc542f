// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Real-time 3D choreography of elliptic-curve key generation, encryption
//! and decryption, built on wgpu.
//!
//! The crate never does cryptography itself. An external service generates
//! keys, encrypts and decrypts; ecviz stages each call as a short animated
//! story on a curve backdrop: points pulse, paths fade in, captions narrate.
//!
//! # Key entry points
//!
//! - [`CurveVizEngine`] - viewports, flow launching and the frame loop
//! - [`choreography`] - scripts as data, run by a [`choreography::Director`]
//!   against a pluggable clock
//! - [`service::CryptoService`] - the boundary to the crypto service
//! - [`host::HostView`] - where notices, result fields and labels go
//! - [`options::Options`] - runtime configuration (camera, motion, timing,
//!   theme, service, keybindings)
//!
//! # Architecture
//!
//! Each flow builds a [`choreography::Script`] of cues (place a point, show
//! a caption, dwell, trace a path, call the service, present results). The
//! director resumes runs as their waits elapse and drops a run as soon as a
//! newer launch of the same flow supersedes it. Scenes are plain CPU state;
//! [`renderer::SceneRenderer`] draws whichever one the host shows.

pub mod camera;
pub mod choreography;
pub mod engine;
pub mod error;
pub mod flows;
pub mod gpu;
pub mod host;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod service;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{CurveVizEngine, VizCommand};
pub use error::VizError;
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
