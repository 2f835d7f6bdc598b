//! Pointer-reactive tendril: a chain of control points swaying under a
//! procedural wave field, driven by a per-frame force integrator and drawn as
//! a tapered, gradient-stroked spline.
//!
//! Nothing in this crate touches a platform API. Hosts feed an
//! [`InteractionSnapshot`] and a frame delta into [`Engine::tick`] and replay
//! the resulting [`DrawList`] onto their own [`DrawSurface`].

pub mod chain;
pub mod constants;
pub mod engine;
pub mod error;
pub mod integrator;
pub mod interaction;
pub mod profile;
pub mod render;
pub mod wave;

pub use chain::*;
pub use constants::*;
pub use engine::*;
pub use error::*;
pub use integrator::*;
pub use interaction::*;
pub use profile::*;
pub use render::*;
pub use wave::*;
