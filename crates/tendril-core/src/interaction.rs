//! Pointer state as the simulation sees it.
//!
//! The host owns a [`PointerTracker`], feeds it raw pointer events, and hands
//! the integrator an immutable [`InteractionSnapshot`] once per tick so every
//! point reacts to the same pointer state.

use crate::profile::TrackerParams;
use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// The tip is held; `target` is the latest pointer position.
    Captured { target: Vec2 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionSnapshot {
    pub pointer: Option<Vec2>,
    pub velocity: Vec2,
    pub last_interaction_ms: Option<f64>,
    pub drag: DragState,
}

impl InteractionSnapshot {
    /// No pointer has ever been seen.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.drag, DragState::Captured { .. })
    }

    /// Copy with every non-finite field discarded.
    pub fn sanitized(self) -> Self {
        let drag = match self.drag {
            DragState::Captured { target } if target.is_finite() => self.drag,
            _ => DragState::Idle,
        };
        Self {
            pointer: self.pointer.filter(|p| p.is_finite()),
            velocity: if self.velocity.is_finite() {
                self.velocity
            } else {
                Vec2::ZERO
            },
            last_interaction_ms: self.last_interaction_ms.filter(|t| t.is_finite()),
            drag,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointerTracker {
    params: TrackerParams,
    position: Option<Vec2>,
    velocity: Vec2,
    last_interaction_ms: Option<f64>,
    drag: DragState,
}

impl PointerTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            position: None,
            velocity: Vec2::ZERO,
            last_interaction_ms: None,
            drag: DragState::Idle,
        }
    }

    /// Record a pointer sample. Returns `false` if it was discarded as
    /// non-finite or as sub-pixel jitter.
    pub fn on_move(&mut self, pos: Vec2, now_ms: f64) -> bool {
        if !pos.is_finite() {
            log::debug!("[pointer] dropped non-finite sample");
            return false;
        }
        if let Some(prev) = self.position {
            let delta = pos - prev;
            if delta.x.abs() < self.params.jitter_px && delta.y.abs() < self.params.jitter_px {
                return false;
            }
            let raw = delta * self.params.velocity_scale;
            self.velocity = raw.lerp(self.velocity, self.params.velocity_smoothing);
        }
        self.position = Some(pos);
        self.last_interaction_ms = Some(now_ms);
        if let DragState::Captured { target } = &mut self.drag {
            *target = pos;
        }
        true
    }

    /// Pointer pressed at `pos`; captures the tip when within `capture_radius` of it.
    pub fn on_down(&mut self, pos: Vec2, now_ms: f64, tip: Option<Vec2>, capture_radius: f32) -> bool {
        if !pos.is_finite() {
            return false;
        }
        self.position = Some(pos);
        self.last_interaction_ms = Some(now_ms);
        match tip {
            Some(tip) if tip.distance(pos) < capture_radius => {
                self.drag = DragState::Captured { target: pos };
                log::debug!("[pointer] captured tip at ({:.1},{:.1})", pos.x, pos.y);
                true
            }
            _ => false,
        }
    }

    pub fn on_up(&mut self) {
        self.release();
    }

    pub fn on_leave(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.is_captured() {
            log::debug!("[pointer] released tip");
        }
        self.drag = DragState::Idle;
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.drag, DragState::Captured { .. })
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn snapshot(&self) -> InteractionSnapshot {
        InteractionSnapshot {
            pointer: self.position,
            velocity: self.velocity,
            last_interaction_ms: self.last_interaction_ms,
            drag: self.drag,
        }
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(TrackerParams::default())
    }
}
