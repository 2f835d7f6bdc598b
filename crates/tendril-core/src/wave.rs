//! Procedural idle motion.
//!
//! [`WaveField::offset`] is a pure function of `(index, len, time)`: the
//! per-point phase is re-derived from the index with the same
//! [`point_phase`] the chain uses at build time, so replaying a time series
//! reproduces the motion bit for bit.

use crate::chain::{chain_t, point_phase};
use crate::profile::WaveParams;

/// Hermite smoothstep; `edge0 > edge1` gives a falling edge.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sinusoid over `phase`, enveloped to vanish at both chain ends, with a small
/// aperiodic wobble derived from the phase itself.
#[inline]
pub fn smooth_wave(t: f32, phase: f32, frequency: f32) -> f32 {
    let raw = (phase * frequency).sin();
    let envelope = smoothstep(0.0, 0.2, t) * smoothstep(1.0, 0.8, t);
    let micro = (phase * 3.7).sin() * 0.12 * (phase * 0.3).sin()
        + (phase * 2.4).sin() * 0.08 * (phase * 0.5).sin()
        + (phase * 5.2).sin() * 0.05 * (phase * 0.7).sin();
    (raw + micro * envelope) * envelope
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveField {
    params: WaveParams,
}

impl WaveField {
    pub fn new(params: WaveParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    /// Wave time for an engine clock reading.
    pub fn time_at(&self, now_ms: f64) -> f32 {
        (now_ms * self.params.time_scale) as f32
    }

    /// Lateral displacement of point `index` of a `len`-point chain at wave `time`.
    ///
    /// Exactly zero at the anchor-adjacent point and at the tip.
    pub fn offset(&self, index: usize, len: usize, time: f32) -> f32 {
        let p = &self.params;
        let t = chain_t(index, len);
        let phase = time * p.phase_rate + point_phase(index, len) * p.phase_spread + (1.0 - t) * p.travel;

        let anchor_fade = smoothstep(0.0, p.anchor_fade_edge, t).powf(p.anchor_fade_power);
        let tip_fade = smoothstep(1.0, p.tip_fade_edge, t);

        let sum: f32 = p
            .layers
            .iter()
            .map(|layer| {
                let amplitude = layer.amplitude * (1.0 - t).powf(layer.falloff) * smoothstep(0.0, layer.ramp, t);
                smooth_wave(t, phase + layer.phase_shift, layer.frequency) * amplitude
            })
            .sum();
        sum * anchor_fade * tip_fade
    }

    /// Offsets for every point of a `len`-point chain, written into `out`.
    pub fn sample_into(&self, len: usize, time: f32, out: &mut Vec<f32>) {
        out.clear();
        out.extend((0..len).map(|i| self.offset(i, len, time)));
    }
}
