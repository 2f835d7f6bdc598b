//! Per-tick force accumulation and integration.
//!
//! Forces are tuned per nominal 60 Hz frame; [`StepClock::frame_scale`]
//! stretches them to the real frame delta. Within the per-point pass a point
//! only reads its own state plus values captured before the pass, so the
//! result does not depend on iteration order.

use crate::chain::{chain_t, Chain, ControlPoint};
use crate::constants::{MAX_FRAME_SCALE, NOMINAL_FRAME_MS};
use crate::interaction::{DragState, InteractionSnapshot};
use crate::profile::{InfluenceParams, IntegratorParams, TendrilProfile};
use crate::wave::WaveField;
use glam::Vec2;
use std::f32::consts::PI;

/// Time inputs for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepClock {
    /// Engine clock after this tick's delta was applied.
    pub now_ms: f64,
    pub dt_ms: f64,
    pub wave_time: f32,
    pub frame_scale: f32,
}

impl StepClock {
    pub fn new(now_ms: f64, dt_ms: f64, wave: &WaveField) -> Self {
        let frame_scale = if dt_ms.is_finite() && dt_ms > 0.0 {
            ((dt_ms / NOMINAL_FRAME_MS) as f32).min(MAX_FRAME_SCALE)
        } else {
            0.0
        };
        Self {
            now_ms,
            dt_ms,
            wave_time: wave.time_at(now_ms),
            frame_scale,
        }
    }
}

/// What happened during one [`Integrator::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Points inside the pointer radius this tick.
    pub influenced: usize,
    /// Points reset to rest after going non-finite.
    pub recovered: usize,
}

/// Strength of the return-to-rest spring, ramped in since the last interaction.
pub fn return_ramp(params: &IntegratorParams, last_interaction_ms: Option<f64>, now_ms: f64) -> f32 {
    match last_interaction_ms {
        Some(last) => (((now_ms - last).max(0.0) / params.return_ramp_ms) as f32).min(params.return_ramp_cap),
        None => params.return_ramp_cap,
    }
}

#[derive(Clone, Debug)]
pub struct Integrator {
    params: IntegratorParams,
    influence: InfluenceParams,
    wave: WaveField,
    naturals: Vec<f32>,
    /// Drag target seen on the previous tick while the tip is held.
    held_target: Option<Vec2>,
}

impl Integrator {
    pub fn new(profile: &TendrilProfile) -> Self {
        Self {
            params: profile.integrator.clone(),
            influence: profile.influence,
            wave: WaveField::new(profile.wave.clone()),
            naturals: Vec::with_capacity(profile.point_count),
            held_target: None,
        }
    }

    /// Forget the previous drag target, e.g. after the chain was rebuilt.
    pub fn release_drag(&mut self) {
        self.held_target = None;
    }

    pub fn wave(&self) -> &WaveField {
        &self.wave
    }

    pub fn params(&self) -> &IntegratorParams {
        &self.params
    }

    /// Advance `chain` by one tick.
    pub fn step(&mut self, chain: &mut Chain, input: &InteractionSnapshot, clock: StepClock) -> StepStats {
        let mut stats = StepStats::default();
        let n = chain.len();
        if n == 0 || clock.frame_scale <= 0.0 {
            return stats;
        }
        let input = input.sanitized();
        let s = clock.frame_scale;

        self.wave.sample_into(n, clock.wave_time, &mut self.naturals);

        let anchor = chain.anchor();
        let axis = chain.axis();
        let lateral = chain.lateral();
        let p = &self.params;
        let ramp = return_ramp(p, input.last_interaction_ms, clock.now_ms);
        let wobble = 1.0 + (clock.wave_time * p.rigidity_wobble_rate).sin() * p.rigidity_wobble;

        let held = match input.drag {
            DragState::Captured { target } => {
                let moved = self.held_target.map_or(Vec2::ZERO, |prev| target - prev);
                self.held_target = Some(target);
                apply_drag(p, chain.points_mut(), target, moved, clock);
                true
            }
            DragState::Idle => {
                self.held_target = None;
                false
            }
        };

        for (i, point) in chain.points_mut().iter_mut().enumerate() {
            if held && i == n - 1 {
                // the held tip answers to the drag spring only
                continue;
            }
            let t = chain_t(i, n);
            let f = point.freedom;
            let natural = self.naturals[i];

            // homing toward the wave-displaced ideal
            let lat = (point.pos - anchor).dot(lateral);
            point.vel += lateral * ((natural - lat) * p.homing * (1.0 + f * p.homing_freedom_gain) * s);

            if apply_influence(&self.influence, point, &input, clock) {
                stats.influenced += 1;
            }

            // return to rest, weak near the anchor
            let axial = (point.pos - anchor).dot(axis);
            let base_axial = (point.base - anchor).dot(axis);
            let weight = 1.0 - (1.0 - t).powi(2);
            let strength = p.return_strength * ramp * weight * s;
            point.vel += lateral * ((natural - lat) * strength)
                + axis * ((base_axial - axial) * strength * p.return_axial_gain);

            let speed = point.vel.length();
            let damping = (p.damping - f * p.damping_freedom_relief - speed * p.damping_speed_gain)
                .min(p.damping)
                .max(p.damping_floor);
            point.vel *= damping.powf(s);

            point.pos += point.vel * ((1.0 + f * p.mobility_gain) * s);

            // lateral rigidity, loosened for free points and after a long rest
            let lat = (point.pos - anchor).dot(lateral);
            let base_lat = (point.base - anchor).dot(lateral);
            let rigidity = p.lateral_rigidity
                * (1.0 - f * p.rigidity_freedom_relief)
                * (1.0 - ramp * p.rigidity_return_relief)
                * wobble;
            point.pos += lateral * ((base_lat - lat) * rigidity * s);

            point.vel -= axis * (p.axial_drift * f * s);
        }

        if n > 1 {
            apply_spacing(p, chain, clock);
        }

        for point in chain.points_mut() {
            if !point.is_finite() {
                point.reset_to_base();
                stats.recovered += 1;
            }
        }
        if stats.recovered > 0 {
            log::warn!("[integrator] reset {} non-finite point(s) to rest", stats.recovered);
        }
        stats
    }
}

/// Carry the held tip along with the target, spring it onto the target, and
/// let the body follow the tip as it stood at the start of the tick.
///
/// `moved` is the target's displacement since the previous tick. The tip
/// inherits it directly, so damping and the spring act only on the tip's
/// motion relative to the target and a steadily moving pointer is tracked
/// without lag.
fn apply_drag(p: &IntegratorParams, points: &mut [ControlPoint], target: Vec2, moved: Vec2, clock: StepClock) {
    let Some(tip_index) = points.len().checked_sub(1) else {
        return;
    };
    let s = clock.frame_scale;
    let now = clock.now_ms;
    let sway = Vec2::new(
        (now * 0.0008).sin() as f32 * p.drag_sway.x,
        (now * 0.0012).cos() as f32 * p.drag_sway.y,
    );
    let goal = target + sway;
    let tip_start = points[tip_index].pos;

    let n = points.len();
    let (body, tip) = points.split_at_mut(tip_index);
    let tip = &mut tip[0];
    let carried = moved / s;
    let relative = (tip.vel - carried + (goal - tip.pos) * (p.drag_stiffness * s)) * p.drag_damping.powf(s);
    tip.vel = carried + relative;
    tip.pos += tip.vel * s;

    for (i, point) in body.iter_mut().enumerate() {
        let pull = chain_t(i, n).powf(p.drag_follow_power) * p.drag_follow * s;
        point.vel += (tip_start - point.pos) * pull;
    }
}

/// Pointer proximity response for one point. Returns whether the point was
/// inside the influence radius.
fn apply_influence(
    params: &InfluenceParams,
    point: &mut ControlPoint,
    input: &InteractionSnapshot,
    clock: StepClock,
) -> bool {
    let f = point.freedom;
    let s = clock.frame_scale;
    if let Some(pointer) = input.pointer {
        let away = point.pos - pointer;
        let distance = away.length();
        let radius = params.touch_radius * (params.radius_base + f * params.radius_freedom_gain);
        if distance < radius {
            let df = distance / radius;
            let influence = ((1.0 - df.powf(params.falloff_power)) * f * params.strength).max(0.0);
            point.influence_amount = influence;
            point.last_influence_ms = Some(clock.now_ms);

            if distance > f32::EPSILON {
                let push = params.repulsion * influence * (1.0 - df).powf(params.repulsion_power);
                point.vel += away / distance * (push * s);
            }
            point.vel += input.velocity * (influence * (params.velocity_gain + f * params.velocity_freedom_gain) * s);
            return true;
        }
    }

    let since = point.last_influence_ms.map(|last| clock.now_ms - last);
    point.influence_amount = params
        .decay
        .apply(point.influence_amount, since, clock.dt_ms, s);
    if point.influence_amount == 0.0 {
        point.last_influence_ms = None;
    }
    false
}

/// Spring every adjacent pair toward its rest distance, fading out over the
/// trailing pairs so the tip answers to the pointer and the wave instead.
fn apply_spacing(p: &IntegratorParams, chain: &mut Chain, clock: StepClock) {
    let (points, rest) = chain.split_mut();
    let n = points.len();
    let s = clock.frame_scale;
    let trailing = p.trailing_pairs.min(n - 1);
    let trail_start = (n - 1) - trailing;

    for i in 0..n - 1 {
        let t = i as f32 / n as f32;
        let delta = points[i + 1].pos - points[i].pos;
        let deviation = delta.length() - rest[i];

        let trail = (trailing > 0 && i >= trail_start)
            .then(|| 1.0 - ((i - trail_start) as f32 / trailing as f32).powf(p.trailing_power));
        let attenuation = trail.map_or(1.0, |r| r * p.trailing_gain);
        let sway_gain = trail.unwrap_or(1.0);

        let force = deviation * p.spacing_stiffness * (1.0 - t.powf(p.spacing_taper_power)) * attenuation * s;
        let angle = delta.y.atan2(delta.x)
            + (clock.wave_time * p.spacing_sway_rate + t * PI).sin() * p.spacing_sway * sway_gain;
        let push = Vec2::from_angle(angle) * force;

        points[i].vel += push;
        points[i + 1].vel -= push;
    }
}
