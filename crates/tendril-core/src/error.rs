//! Error types for building a tendril.
//!
//! Steady-state ticking never fails; these only surface from construction and
//! configuration paths.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TendrilError {
    /// Width or height is zero, negative, or not finite.
    #[error("viewport {width}x{height} is degenerate")]
    DegenerateViewport { width: f32, height: f32 },
    /// A chain needs an anchor-adjacent point and a distinct tip.
    #[error("a tendril needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("invalid profile: {0}")]
    InvalidProfile(&'static str),
}
