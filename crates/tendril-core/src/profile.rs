//! Tuning for a single tendril.
//!
//! The upright variant (anchored low, swaying sideways) and the sideways
//! variant (anchored mid-frame, swaying up and down) are the same engine with
//! different [`TendrilProfile`] presets. Every knob the integrator, wave field
//! and renderer read lives here so a host can tweak one value without
//! touching simulation code.

use crate::constants::*;
use crate::error::TendrilError;
use crate::render::{ColorStop, ColorStops, Rgba};
use glam::Vec2;
use smallvec::smallvec;
use std::f32::consts::PI;

/// Direction the chain grows from its anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Grows upward from a low anchor; sways along x.
    #[default]
    Vertical,
    /// Grows rightward from a mid-frame anchor; sways along y.
    Horizontal,
}

impl Orientation {
    /// Unit vector from the anchor toward the tip (surface coordinates, y down).
    pub fn axis(self) -> Vec2 {
        match self {
            Orientation::Vertical => Vec2::NEG_Y,
            Orientation::Horizontal => Vec2::X,
        }
    }

    /// Sway direction, perpendicular to [`Orientation::axis`].
    pub fn lateral(self) -> Vec2 {
        match self {
            Orientation::Vertical => Vec2::X,
            Orientation::Horizontal => Vec2::Y,
        }
    }

    /// Viewport extent the nominal length is measured against.
    pub fn span(self, width: f32, height: f32) -> f32 {
        match self {
            Orientation::Vertical => height,
            Orientation::Horizontal => width,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }
}

/// Which end of the chain is the compliant one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FreedomBias {
    /// Freedom falls from 1.0 at the anchor to the floor at the tip.
    #[default]
    Anchor,
    /// Freedom rises from the floor at the anchor to 1.0 at the tip.
    Tip,
}

/// How a point forgets pointer proximity once the pointer moves away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InfluenceDecay {
    /// Decay accelerates with staleness and snaps to exactly zero once
    /// `timeout_ms` has passed since the point was last inside the radius.
    TimeoutReset { timeout_ms: f64, rate: f32 },
    /// Plain exponential decay by elapsed frame time, snapped to zero once it
    /// falls below [`INFLUENCE_EPSILON`] or once [`INFLUENCE_TIMEOUT_MS`] has
    /// passed, whichever comes first.
    Continuous { half_life_ms: f64 },
}

impl Default for InfluenceDecay {
    fn default() -> Self {
        InfluenceDecay::TimeoutReset {
            timeout_ms: INFLUENCE_TIMEOUT_MS,
            rate: INFLUENCE_DECAY_RATE,
        }
    }
}

impl InfluenceDecay {
    /// Next influence amount for a point outside the pointer radius.
    ///
    /// `since_ms` is the time since the point was last influenced (`None` if
    /// never); `dt_ms` and `frame_scale` describe the current tick.
    pub fn apply(self, amount: f32, since_ms: Option<f64>, dt_ms: f64, frame_scale: f32) -> f32 {
        let Some(since_ms) = since_ms else {
            return 0.0;
        };
        match self {
            InfluenceDecay::TimeoutReset { timeout_ms, rate } => {
                if since_ms >= timeout_ms {
                    0.0
                } else {
                    let steps = (since_ms.max(0.0) / INFLUENCE_DECAY_STEP_MS) as f32;
                    amount * rate.powf(steps * frame_scale)
                }
            }
            InfluenceDecay::Continuous { half_life_ms } => {
                if since_ms >= INFLUENCE_TIMEOUT_MS {
                    return 0.0;
                }
                let next = amount * 0.5_f32.powf((dt_ms / half_life_ms) as f32);
                if next < INFLUENCE_EPSILON {
                    0.0
                } else {
                    next
                }
            }
        }
    }
}

/// One sinusoid of the idle wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveLayer {
    pub amplitude: f32,
    /// Exponent of the `(1 - t)` amplitude falloff toward the tip.
    pub falloff: f32,
    /// Chain position by which the layer has ramped in from the anchor.
    pub ramp: f32,
    pub frequency: f32,
    pub phase_shift: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveParams {
    /// Converts engine milliseconds into wave time.
    pub time_scale: f64,
    pub phase_rate: f32,
    pub phase_spread: f32,
    /// Extra phase at the anchor, fading to zero at the tip; makes the wave travel.
    pub travel: f32,
    pub layers: Vec<WaveLayer>,
    pub anchor_fade_edge: f32,
    pub anchor_fade_power: f32,
    pub tip_fade_edge: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            time_scale: 0.0006,
            phase_rate: 0.5,
            phase_spread: 0.6,
            travel: 2.2,
            layers: vec![
                WaveLayer {
                    amplitude: 45.0,
                    falloff: 0.2,
                    ramp: 0.3,
                    frequency: 0.07,
                    phase_shift: 0.0,
                },
                WaveLayer {
                    amplitude: 20.0,
                    falloff: 0.3,
                    ramp: 0.32,
                    frequency: 0.025,
                    phase_shift: PI * 0.5,
                },
                WaveLayer {
                    amplitude: 2.5,
                    falloff: 0.4,
                    ramp: 0.35,
                    frequency: 0.006,
                    phase_shift: -PI * 0.3,
                },
                WaveLayer {
                    amplitude: 0.75,
                    falloff: 0.4,
                    ramp: 0.35,
                    frequency: 0.004,
                    phase_shift: PI * 0.7,
                },
            ],
            anchor_fade_edge: 0.45,
            anchor_fade_power: 1.3,
            tip_fade_edge: 0.9,
        }
    }
}

/// Force coefficients, all per nominal 60 Hz frame.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegratorParams {
    pub homing: f32,
    pub homing_freedom_gain: f32,

    pub return_strength: f32,
    pub return_ramp_ms: f64,
    pub return_ramp_cap: f32,
    pub return_axial_gain: f32,

    pub damping: f32,
    pub damping_freedom_relief: f32,
    pub damping_speed_gain: f32,
    pub damping_floor: f32,

    /// Extra displacement per unit velocity for free points.
    pub mobility_gain: f32,

    pub lateral_rigidity: f32,
    pub rigidity_freedom_relief: f32,
    pub rigidity_return_relief: f32,
    pub rigidity_wobble: f32,
    pub rigidity_wobble_rate: f32,

    pub axial_drift: f32,

    pub spacing_stiffness: f32,
    pub spacing_taper_power: f32,
    pub spacing_sway: f32,
    pub spacing_sway_rate: f32,
    /// Number of pairs at the free end where the spacing spring fades out.
    pub trailing_pairs: usize,
    pub trailing_power: f32,
    pub trailing_gain: f32,

    /// Spring from a held tip to the drag target. The tip also moves with the
    /// target each tick, so this only corrects the remaining offset.
    pub drag_stiffness: f32,
    /// Per-frame decay of the tip's velocity relative to the target.
    pub drag_damping: f32,
    pub drag_follow: f32,
    pub drag_follow_power: f32,
    /// Amplitude of the slow sway added to a captured drag target.
    pub drag_sway: Vec2,
}

impl Default for IntegratorParams {
    fn default() -> Self {
        Self {
            homing: 0.00025,
            homing_freedom_gain: 1.3,

            return_strength: 0.00004,
            return_ramp_ms: RETURN_RAMP_MS,
            return_ramp_cap: RETURN_RAMP_CAP,
            return_axial_gain: 1.2,

            damping: 0.972,
            damping_freedom_relief: 0.0006,
            damping_speed_gain: 0.008,
            damping_floor: 0.85,

            mobility_gain: 0.5,

            lateral_rigidity: 0.0003,
            rigidity_freedom_relief: 0.92,
            rigidity_return_relief: 0.7,
            rigidity_wobble: 0.08,
            rigidity_wobble_rate: 0.6,

            axial_drift: 0.00001,

            spacing_stiffness: 0.0015,
            spacing_taper_power: 1.4,
            spacing_sway: 0.001,
            spacing_sway_rate: 0.3,
            trailing_pairs: 2,
            trailing_power: 2.2,
            trailing_gain: 0.3,

            drag_stiffness: 0.08,
            drag_damping: 0.6,
            drag_follow: 0.015,
            drag_follow_power: 2.2,
            drag_sway: Vec2::new(1.2, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfluenceParams {
    pub touch_radius: f32,
    pub radius_base: f32,
    pub radius_freedom_gain: f32,
    pub falloff_power: f32,
    pub strength: f32,
    pub repulsion: f32,
    pub repulsion_power: f32,
    pub velocity_gain: f32,
    pub velocity_freedom_gain: f32,
    pub capture_radius: f32,
    pub decay: InfluenceDecay,
}

impl Default for InfluenceParams {
    fn default() -> Self {
        Self {
            touch_radius: TOUCH_RADIUS,
            radius_base: 3.2,
            radius_freedom_gain: 0.5,
            falloff_power: 2.8,
            strength: 0.18,
            repulsion: 0.00012,
            repulsion_power: 1.6,
            velocity_gain: 0.18,
            velocity_freedom_gain: 0.2,
            capture_radius: CAPTURE_RADIUS,
            decay: InfluenceDecay::default(),
        }
    }
}

/// How the host-side pointer tracker turns raw samples into a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerParams {
    pub velocity_scale: f32,
    /// Weight of the previous velocity when blending in a new sample, in [0, 1).
    pub velocity_smoothing: f32,
    pub jitter_px: f32,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            velocity_scale: POINTER_VELOCITY_SCALE,
            velocity_smoothing: 0.3,
            jitter_px: POINTER_JITTER_PX,
        }
    }
}

/// Piecewise stroke width over normalized chain position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThicknessProfile {
    pub start: f32,
    pub ramp: f32,
    /// Progress at which the widening ramp hands over to the taper.
    pub split: f32,
    pub peak: f32,
    pub taper: f32,
}

impl Default for ThicknessProfile {
    fn default() -> Self {
        Self {
            start: 0.8,
            ramp: 14.0,
            split: 0.3,
            peak: 5.5,
            taper: 0.65,
        }
    }
}

impl ThicknessProfile {
    pub fn width_at(&self, progress: f32) -> f32 {
        if progress < self.split {
            self.start + progress * self.ramp
        } else {
            self.peak * (1.0 - progress * self.taper)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Translucent fill drawn over the previous frame; `None` leaves it alone.
    pub trail: Option<Rgba>,
    /// Stroke gradient from anchor (offset 0) to tip (offset 1).
    pub stroke_stops: ColorStops,
    pub tension_base: f32,
    pub tension_ramp: f32,
    pub anchor_softening: f32,
    pub thickness: ThicknessProfile,
    pub width_wobble: f32,
    pub width_wobble_rate: f32,
    pub width_wobble_spread: f32,
    pub influence_thickening: f32,
    pub glow_radius: f32,
    pub outer_glow_scale: f32,
    pub outer_glow_stops: ColorStops,
    pub core_glow_stops: ColorStops,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            trail: Some(Rgba::new(0.0, 0.0, 0.0, 0.95)),
            stroke_stops: smallvec![
                ColorStop::new(0.0, Rgba::white(0.95)),
                ColorStop::new(0.3, Rgba::white(0.85)),
                ColorStop::new(0.6, Rgba::white(0.65)),
                ColorStop::new(0.8, Rgba::white(0.45)),
                ColorStop::new(1.0, Rgba::white(0.25)),
            ],
            tension_base: 8.0,
            tension_ramp: 4.0,
            anchor_softening: 4.0,
            thickness: ThicknessProfile::default(),
            width_wobble: 0.03,
            width_wobble_rate: 2.0,
            width_wobble_spread: 0.2,
            influence_thickening: 0.8,
            glow_radius: 6.0,
            outer_glow_scale: 2.0,
            outer_glow_stops: smallvec![
                ColorStop::new(0.0, Rgba::white(0.2)),
                ColorStop::new(0.5, Rgba::white(0.1)),
                ColorStop::new(1.0, Rgba::white(0.0)),
            ],
            core_glow_stops: smallvec![
                ColorStop::new(0.0, Rgba::white(0.95)),
                ColorStop::new(0.7, Rgba::white(0.3)),
                ColorStop::new(1.0, Rgba::white(0.0)),
            ],
        }
    }
}

/// Complete configuration of one tendril.
///
/// # Builder Pattern
/// ```
/// use tendril_core::{InfluenceDecay, Orientation, TendrilProfile};
///
/// let profile = TendrilProfile::vertical()
///     .with_point_count(32)
///     .with_influence_decay(InfluenceDecay::Continuous { half_life_ms: 300.0 });
/// assert_eq!(profile.orientation, Orientation::Vertical);
/// assert!(profile.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TendrilProfile {
    pub orientation: Orientation,
    /// Anchor position as a fraction of the viewport.
    pub anchor_fraction: Vec2,
    /// Nominal length as a fraction of [`Orientation::span`].
    pub length_fraction: f32,
    pub point_count: usize,
    pub freedom_bias: FreedomBias,
    pub wave: WaveParams,
    pub integrator: IntegratorParams,
    pub influence: InfluenceParams,
    pub tracker: TrackerParams,
    pub render: RenderParams,
}

impl Default for TendrilProfile {
    fn default() -> Self {
        Self::vertical()
    }
}

impl TendrilProfile {
    /// Upright tendril anchored near the bottom centre, free near the root.
    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
            anchor_fraction: Vec2::new(0.5, 0.85),
            length_fraction: 0.65,
            point_count: DEFAULT_POINT_COUNT,
            freedom_bias: FreedomBias::Anchor,
            wave: WaveParams::default(),
            integrator: IntegratorParams::default(),
            influence: InfluenceParams::default(),
            tracker: TrackerParams::default(),
            render: RenderParams::default(),
        }
    }

    /// Sideways tendril anchored mid-frame on the left, free toward the tip.
    pub fn horizontal() -> Self {
        let base = Self::vertical();
        Self {
            orientation: Orientation::Horizontal,
            anchor_fraction: Vec2::new(0.15, 0.5),
            length_fraction: 0.7,
            freedom_bias: FreedomBias::Tip,
            integrator: IntegratorParams {
                drag_stiffness: 0.07,
                ..base.integrator
            },
            influence: InfluenceParams {
                decay: InfluenceDecay::Continuous { half_life_ms: 400.0 },
                ..base.influence
            },
            render: RenderParams {
                stroke_stops: smallvec![
                    ColorStop::new(0.0, Rgba::white(0.25)),
                    ColorStop::new(0.2, Rgba::white(0.45)),
                    ColorStop::new(0.4, Rgba::white(0.65)),
                    ColorStop::new(0.7, Rgba::white(0.85)),
                    ColorStop::new(1.0, Rgba::white(0.95)),
                ],
                ..base.render
            },
            ..base
        }
    }

    /// Preset for an orientation.
    pub fn for_orientation(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Vertical => Self::vertical(),
            Orientation::Horizontal => Self::horizontal(),
        }
    }

    pub fn with_point_count(mut self, point_count: usize) -> Self {
        self.point_count = point_count;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_anchor_fraction(mut self, anchor_fraction: Vec2) -> Self {
        self.anchor_fraction = anchor_fraction;
        self
    }

    pub fn with_length_fraction(mut self, length_fraction: f32) -> Self {
        self.length_fraction = length_fraction;
        self
    }

    pub fn with_freedom_bias(mut self, freedom_bias: FreedomBias) -> Self {
        self.freedom_bias = freedom_bias;
        self
    }

    pub fn with_influence_decay(mut self, decay: InfluenceDecay) -> Self {
        self.influence.decay = decay;
        self
    }

    /// Reject configurations that would poison the simulation with NaNs.
    pub fn validate(&self) -> Result<(), TendrilError> {
        if self.point_count < 2 {
            return Err(TendrilError::TooFewPoints(self.point_count));
        }
        if !self.anchor_fraction.is_finite() {
            return Err(TendrilError::InvalidProfile("anchor fraction must be finite"));
        }
        if !(self.length_fraction.is_finite() && self.length_fraction > 0.0) {
            return Err(TendrilError::InvalidProfile("length fraction must be positive"));
        }
        if !self.wave.time_scale.is_finite() {
            return Err(TendrilError::InvalidProfile("wave time scale must be finite"));
        }

        let p = &self.integrator;
        if !(p.damping > 0.0 && p.damping <= 1.0) {
            return Err(TendrilError::InvalidProfile("damping must be in (0, 1]"));
        }
        if !(p.damping_floor > 0.0 && p.damping_floor <= p.damping) {
            return Err(TendrilError::InvalidProfile("damping floor must be in (0, damping]"));
        }
        if !(p.drag_damping > 0.0 && p.drag_damping <= 1.0) {
            return Err(TendrilError::InvalidProfile("drag damping must be in (0, 1]"));
        }

        let i = &self.influence;
        if !(i.touch_radius.is_finite() && i.touch_radius > 0.0) {
            return Err(TendrilError::InvalidProfile("touch radius must be positive"));
        }
        match i.decay {
            InfluenceDecay::TimeoutReset { timeout_ms, rate } => {
                if !(timeout_ms > 0.0 && rate > 0.0 && rate <= 1.0) {
                    return Err(TendrilError::InvalidProfile("timeout decay needs a positive timeout and rate in (0, 1]"));
                }
            }
            InfluenceDecay::Continuous { half_life_ms } => {
                if !(half_life_ms.is_finite() && half_life_ms > 0.0) {
                    return Err(TendrilError::InvalidProfile("half-life must be positive"));
                }
            }
        }

        if !(0.0..1.0).contains(&self.tracker.velocity_smoothing) {
            return Err(TendrilError::InvalidProfile("velocity smoothing must be in [0, 1)"));
        }

        let stops_ok = |stops: &ColorStops| stops.iter().all(|s| (0.0..=1.0).contains(&s.offset));
        let r = &self.render;
        if !(stops_ok(&r.stroke_stops) && stops_ok(&r.outer_glow_stops) && stops_ok(&r.core_glow_stops)) {
            return Err(TendrilError::InvalidProfile("gradient stop offsets must be in [0, 1]"));
        }
        Ok(())
    }
}
