//! The point chain: a fixed-length run of control points hanging off an anchor.

use crate::constants::*;
use crate::error::TendrilError;
use crate::profile::{FreedomBias, TendrilProfile};
use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Drawing surface size in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// One mass point of the chain.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlPoint {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rest position; fixed for the lifetime of the chain.
    pub base: Vec2,
    /// Rest distance from the anchor along the axis; never decreases along the chain.
    pub distance_from_start: f32,
    pub phase: f32,
    /// Compliance in [0, 1]: how readily the point follows wave and pointer.
    pub freedom: f32,
    pub last_influence_ms: Option<f64>,
    pub influence_amount: f32,
    /// Width hint for hosts drawing their own markers. `CurveRenderer` takes
    /// its widths from `ThicknessProfile` instead.
    pub thickness: f32,
}

impl ControlPoint {
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.influence_amount.is_finite()
    }

    /// Drop all live state and park the point at rest.
    pub fn reset_to_base(&mut self) {
        self.pos = self.base;
        self.vel = Vec2::ZERO;
        self.influence_amount = 0.0;
        self.last_influence_ms = None;
    }
}

#[inline]
pub fn ease_in_out_sine(x: f32) -> f32 {
    -((PI * x).cos() - 1.0) / 2.0
}

/// Normalized chain position `index / (len - 1)`; 0 for chains shorter than 2.
#[inline]
pub fn chain_t(index: usize, len: usize) -> f32 {
    if len < 2 {
        0.0
    } else {
        index as f32 / (len - 1) as f32
    }
}

/// Wave phase seeded for a point; fixed at build time.
#[inline]
pub fn point_phase(index: usize, len: usize) -> f32 {
    ease_in_out_sine(chain_t(index, len)) * TAU
}

/// Freedom for an eased chain position `s`; monotonic in `s` for either bias.
#[inline]
pub fn freedom_at(s: f32, bias: FreedomBias) -> f32 {
    let toward = match bias {
        FreedomBias::Anchor => 1.0 - s,
        FreedomBias::Tip => s,
    };
    toward.max(0.0).powf(FREEDOM_EXPONENT) * FREEDOM_SPAN + FREEDOM_FLOOR
}

/// Ordered control points from the anchor-adjacent point (index 0) to the
/// free tip (index `len - 1`). Never resized or reordered once built.
#[derive(Clone, Debug)]
pub struct Chain {
    anchor: Vec2,
    length: f32,
    axis: Vec2,
    lateral: Vec2,
    points: Vec<ControlPoint>,
    rest_spacing: Vec<f32>,
}

impl Chain {
    /// Lay out a fresh chain for `viewport`.
    pub fn build(viewport: Viewport, profile: &TendrilProfile) -> Result<Self, TendrilError> {
        if viewport.is_degenerate() {
            return Err(TendrilError::DegenerateViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let n = profile.point_count;
        if n < 2 {
            return Err(TendrilError::TooFewPoints(n));
        }

        let orientation = profile.orientation;
        let axis = orientation.axis();
        let lateral = orientation.lateral();
        let anchor = viewport.size() * profile.anchor_fraction;
        let length = orientation.span(viewport.width, viewport.height) * profile.length_fraction;

        let points = (0..n)
            .map(|i| {
                let s = ease_in_out_sine(chain_t(i, n));
                let spread = s.powf(SPACING_EXPONENT);
                let distance = length * spread;
                ControlPoint {
                    pos: anchor + axis * (length * spread.powf(UNFURL_EXPONENT)),
                    vel: Vec2::ZERO,
                    base: anchor + axis * distance,
                    distance_from_start: distance,
                    phase: point_phase(i, n),
                    freedom: freedom_at(s, profile.freedom_bias),
                    last_influence_ms: None,
                    influence_amount: 0.0,
                    thickness: s.powf(THICKNESS_EXPONENT) * THICKNESS_SCALE,
                }
            })
            .collect::<Vec<_>>();
        // bases sit on the axis, so rest spacing is the step in distance
        let rest_spacing = points
            .windows(2)
            .map(|pair| pair[1].distance_from_start - pair[0].distance_from_start)
            .collect();

        Ok(Self {
            anchor,
            length,
            axis,
            lateral,
            points,
            rest_spacing,
        })
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    pub fn lateral(&self) -> Vec2 {
        self.lateral
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    pub fn tip(&self) -> Option<&ControlPoint> {
        self.points.last()
    }

    /// Rest distance between point `index` and `index + 1`.
    pub fn rest_spacing(&self, index: usize) -> Option<f32> {
        self.rest_spacing.get(index).copied()
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| p.pos).collect()
    }

    /// Offset of `pos` from the anchor along the sway axis.
    #[inline]
    pub fn lateral_of(&self, pos: Vec2) -> f32 {
        (pos - self.anchor).dot(self.lateral)
    }

    /// Offset of `pos` from the anchor along the growth axis.
    #[inline]
    pub fn axial_of(&self, pos: Vec2) -> f32 {
        (pos - self.anchor).dot(self.axis)
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(ControlPoint::is_finite)
    }

    pub(crate) fn points_mut(&mut self) -> &mut [ControlPoint] {
        &mut self.points
    }

    /// Mutable points alongside the read-only rest spacing.
    pub(crate) fn split_mut(&mut self) -> (&mut [ControlPoint], &[f32]) {
        (&mut self.points, &self.rest_spacing)
    }
}
