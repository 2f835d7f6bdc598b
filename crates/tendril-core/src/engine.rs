//! Owner of one tendril: chain, clock, lifecycle and the frame epoch.
//!
//! The host calls [`Engine::tick`] once per display frame and
//! [`Engine::render`] to get the frame's draw commands. Geometry changes go
//! through [`Engine::resize`], which bumps the epoch before rebuilding so a
//! [`FrameTicket`] issued for the old geometry can never write into the new
//! chain.

use crate::chain::{Chain, Viewport};
use crate::error::TendrilError;
use crate::integrator::{Integrator, StepClock, StepStats};
use crate::interaction::{InteractionSnapshot, PointerTracker};
use crate::profile::TendrilProfile;
use crate::render::{CurveRenderer, DrawList};
use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Active,
    /// Torn down, paused for a resize, or waiting for usable geometry.
    Suspended,
    Rebuilding,
}

/// Proof that a frame was scheduled against a particular chain epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
    epoch: u64,
}

impl FrameTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(StepStats),
    /// Nothing to do: not active, or a zero/non-finite delta.
    Skipped,
    /// The ticket predates the last rebuild.
    Stale,
}

#[derive(Clone, Debug)]
pub struct Engine {
    profile: TendrilProfile,
    integrator: Integrator,
    renderer: CurveRenderer,
    chain: Option<Chain>,
    viewport: Option<Viewport>,
    lifecycle: Lifecycle,
    epoch: u64,
    now_ms: f64,
}

impl Engine {
    pub fn new(profile: TendrilProfile) -> Result<Self, TendrilError> {
        profile.validate()?;
        Ok(Self {
            integrator: Integrator::new(&profile),
            renderer: CurveRenderer::new(profile.render.clone()),
            profile,
            chain: None,
            viewport: None,
            lifecycle: Lifecycle::Uninitialized,
            epoch: 0,
            now_ms: 0.0,
        })
    }

    /// Build an engine and lay out its first chain.
    pub fn with_viewport(profile: TendrilProfile, viewport: Viewport) -> Result<Self, TendrilError> {
        let mut engine = Self::new(profile)?;
        engine.resize(viewport);
        Ok(engine)
    }

    /// Throw away the current chain and build one for `viewport`.
    ///
    /// Degenerate geometry leaves the engine suspended without a chain; a
    /// later valid resize recovers.
    pub fn resize(&mut self, viewport: Viewport) -> Lifecycle {
        self.invalidate();
        self.viewport = Some(viewport);
        self.rebuild()
    }

    fn invalidate(&mut self) {
        self.lifecycle = Lifecycle::Suspended;
        self.epoch = self.epoch.wrapping_add(1);
        self.chain = None;
        self.integrator.release_drag();
    }

    fn rebuild(&mut self) -> Lifecycle {
        let Some(viewport) = self.viewport else {
            return self.lifecycle;
        };
        self.lifecycle = Lifecycle::Rebuilding;
        match Chain::build(viewport, &self.profile) {
            Ok(chain) => {
                log::info!(
                    "[engine] chain built: points={} anchor=({:.1},{:.1}) length={:.1} epoch={}",
                    chain.len(),
                    chain.anchor().x,
                    chain.anchor().y,
                    chain.length(),
                    self.epoch
                );
                self.chain = Some(chain);
                self.lifecycle = Lifecycle::Active;
            }
            Err(err) => {
                log::warn!("[engine] rebuild skipped: {err}");
                self.lifecycle = Lifecycle::Suspended;
            }
        }
        self.lifecycle
    }

    /// Swap the profile and rebuild at the last requested viewport.
    pub fn set_profile(&mut self, profile: TendrilProfile) -> Result<Lifecycle, TendrilError> {
        profile.validate()?;
        self.integrator = Integrator::new(&profile);
        self.renderer = CurveRenderer::new(profile.render.clone());
        self.profile = profile;
        self.invalidate();
        Ok(self.rebuild())
    }

    /// Pause ticking; the chain is kept for [`Engine::resume`].
    pub fn suspend(&mut self) {
        if self.lifecycle == Lifecycle::Active {
            self.lifecycle = Lifecycle::Suspended;
            self.epoch = self.epoch.wrapping_add(1);
        }
    }

    pub fn resume(&mut self) -> Lifecycle {
        if self.lifecycle == Lifecycle::Suspended && self.chain.is_some() {
            self.lifecycle = Lifecycle::Active;
        }
        self.lifecycle
    }

    /// Drop the chain for good; only a resize brings it back.
    pub fn teardown(&mut self) {
        self.invalidate();
        self.viewport = None;
        log::info!("[engine] torn down");
    }

    pub fn ticket(&self) -> FrameTicket {
        FrameTicket { epoch: self.epoch }
    }

    /// Advance the simulation by `dt_ms`.
    pub fn tick(&mut self, ticket: FrameTicket, dt_ms: f64, input: &InteractionSnapshot) -> TickOutcome {
        if ticket.epoch != self.epoch {
            log::debug!("[engine] stale frame for epoch {} (now {})", ticket.epoch, self.epoch);
            return TickOutcome::Stale;
        }
        if self.lifecycle != Lifecycle::Active || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return TickOutcome::Skipped;
        }
        let Some(chain) = self.chain.as_mut() else {
            return TickOutcome::Skipped;
        };
        self.now_ms += dt_ms;
        let clock = StepClock::new(self.now_ms, dt_ms, self.integrator.wave());
        TickOutcome::Advanced(self.integrator.step(chain, input, clock))
    }

    /// [`Engine::tick`] against the current epoch.
    pub fn step(&mut self, dt_ms: f64, input: &InteractionSnapshot) -> TickOutcome {
        let ticket = self.ticket();
        self.tick(ticket, dt_ms, input)
    }

    /// Draw commands for the current state; empty without a chain.
    pub fn render(&self) -> DrawList {
        match (&self.chain, self.viewport) {
            (Some(chain), Some(viewport)) => {
                let time = self.integrator.wave().time_at(self.now_ms);
                self.renderer.render(chain, viewport, time)
            }
            _ => DrawList::default(),
        }
    }

    /// A tracker configured from this engine's profile.
    pub fn tracker(&self) -> PointerTracker {
        PointerTracker::new(self.profile.tracker)
    }

    pub fn tip(&self) -> Option<Vec2> {
        self.chain.as_ref().and_then(|c| c.tip()).map(|p| p.pos)
    }

    pub fn capture_radius(&self) -> f32 {
        self.profile.influence.capture_radius
    }

    pub fn chain(&self) -> Option<&Chain> {
        self.chain.as_ref()
    }

    pub fn profile(&self) -> &TendrilProfile {
        &self.profile
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
