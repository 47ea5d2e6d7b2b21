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
// Complexity limits
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

//! Interactive 3D model viewer with clickable hotspots, built on wgpu.
//!
//! A [`ViewerEngine`] shows one configured model. Hotspots placed around it
//! glow and pulse; clicking one (a press and release with little movement)
//! flies the camera to a framing pose over 1.5 s and then reveals the
//! hotspot's title and description. Dragging orbits the camera instead.
//!
//! # Key entry points
//!
//! - [`ViewerEngine`] - the orchestrator: load, input, per-frame update
//! - [`ViewerConfig`] - the configuration document (JSON or TOML)
//! - [`CameraAnimator`] - the scripted camera transition state machine
//! - [`HotspotRegistry`] - the live hotspot set and its hit proxies
//! - [`HitTestDispatcher`] - click-versus-drag classification and picking
//!
//! # Architecture
//!
//! The engine owns its state and borrows nothing global. Rendering goes
//! through the [`SceneRenderer`] trait ([`gpu::WgpuRenderer`] draws with
//! wgpu; tests use a recording stand-in), model loading through
//! [`AssetLoader`] on a background thread, and every time-dependent
//! operation takes an explicit [`web_time::Instant`].

pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod hotspot;
pub mod input;
pub mod loader;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

#[cfg(test)]
mod testing;

pub use camera::{Camera, CameraAnimator, CameraInput, OrbitControls};
pub use config::{Color, ViewerConfig};
pub use engine::{command::ViewerCommand, events::ViewerEvent, ViewerEngine};
pub use error::ViewerError;
pub use hotspot::{Hotspot, HotspotRegistry};
pub use input::{HitTestDispatcher, InputEvent, MouseButton};
pub use loader::{AssetLoader, GltfLoader, ModelType};
pub use renderer::{SceneRenderer, Viewport};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
