//! Turns a chain into 2D draw commands.
//!
//! The renderer is a pure function of the chain, the viewport and the wave
//! time; it never mutates simulation state. Hosts implement [`DrawSurface`]
//! for whatever 2D API they have and replay the [`DrawList`] onto it.

use crate::chain::{Chain, Viewport};
use crate::profile::RenderParams;
use glam::Vec2;
use smallvec::SmallVec;

/// Straight (non-premultiplied) colour with channels in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white(alpha: f32) -> Self {
        Self::new(1.0, 1.0, 1.0, alpha)
    }

    /// CSS `rgba(...)` string, as accepted by Canvas 2D and SVG.
    pub fn to_css(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

pub type ColorStops = SmallVec<[ColorStop; 6]>;

#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: Vec2,
    pub to: Vec2,
    pub stops: ColorStops,
}

/// Radial gradient from the centre (offset 0) out to `radius` (offset 1).
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub stops: ColorStops,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub gradient: LinearGradient,
    pub width: f32,
    pub cap: LineCap,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect { origin: Vec2, size: Vec2, color: Rgba },
    /// Start a new path at `start`.
    BeginPath { start: Vec2 },
    CurveTo { c1: Vec2, c2: Vec2, end: Vec2 },
    /// Stroke the current path.
    Stroke(StrokeStyle),
    /// Fill a circle with a radial gradient.
    FillCircle(RadialGradient),
}

/// Host-provided 2D drawing target.
pub trait DrawSurface {
    type Error;

    fn apply(&mut self, command: &DrawCommand) -> Result<(), Self::Error>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Apply every command to `surface` in order, stopping at the first error.
    pub fn replay<S: DrawSurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        self.commands.iter().try_for_each(|cmd| surface.apply(cmd))
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Bezier handles for the segment `p1 -> p2` given its neighbours `p0` and `p3`.
#[inline]
pub fn bezier_handles(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, divisor: f32) -> (Vec2, Vec2) {
    (p1 + (p2 - p0) / divisor, p2 - (p3 - p1) / divisor)
}

#[derive(Clone, Debug)]
pub struct CurveRenderer {
    params: RenderParams,
}

impl CurveRenderer {
    pub fn new(params: RenderParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Handle divisor for segment `index` of a `count`-point draw sequence.
    pub fn segment_divisor(&self, index: usize, count: usize) -> f32 {
        let p = &self.params;
        let progress = index as f32 / count as f32;
        let anchor_factor = (1.0 - index as f32 / (count - 1).max(1) as f32).powi(2);
        p.tension_base + progress * p.tension_ramp + anchor_factor * p.anchor_softening
    }

    /// Stroke width of the segment ending at draw point `index`.
    pub fn segment_width(&self, index: usize, count: usize, influence: f32, time: f32) -> f32 {
        let p = &self.params;
        let progress = index as f32 / count as f32;
        let wobble = 1.0 + (time * p.width_wobble_rate + index as f32 * p.width_wobble_spread).sin() * p.width_wobble;
        p.thickness.width_at(progress) * wobble * (1.0 + influence * p.influence_thickening)
    }

    pub fn render(&self, chain: &Chain, viewport: Viewport, time: f32) -> DrawList {
        let mut list = DrawList::default();
        let p = &self.params;

        if let Some(color) = p.trail {
            list.push(DrawCommand::FillRect {
                origin: Vec2::ZERO,
                size: viewport.size(),
                color,
            });
        }

        let Some(tip) = chain.tip() else {
            return list;
        };

        let mut draw = Vec::with_capacity(chain.len() + 1);
        draw.push(chain.anchor());
        draw.extend(chain.points().iter().map(|pt| pt.pos));
        let count = draw.len();

        let gradient = LinearGradient {
            from: chain.anchor(),
            to: tip.pos,
            stops: p.stroke_stops.clone(),
        };

        for i in 0..count - 1 {
            let p0 = draw[i.saturating_sub(1)];
            let p1 = draw[i];
            let p2 = draw[i + 1];
            let p3 = draw[(i + 2).min(count - 1)];
            let (c1, c2) = bezier_handles(p0, p1, p2, p3, self.segment_divisor(i, count));

            // draw point i + 1 is chain point i
            let influence = chain.points()[i].influence_amount;
            list.push(DrawCommand::BeginPath { start: p1 });
            list.push(DrawCommand::CurveTo { c1, c2, end: p2 });
            list.push(DrawCommand::Stroke(StrokeStyle {
                gradient: gradient.clone(),
                width: self.segment_width(i + 1, count, influence, time),
                cap: LineCap::Round,
            }));
        }

        let outer = p.glow_radius * p.outer_glow_scale;
        list.push(DrawCommand::FillCircle(RadialGradient {
            center: tip.pos,
            radius: outer,
            stops: p.outer_glow_stops.clone(),
        }));
        list.push(DrawCommand::FillCircle(RadialGradient {
            center: tip.pos,
            radius: p.glow_radius,
            stops: p.core_glow_stops.clone(),
        }));
        list
    }
}
