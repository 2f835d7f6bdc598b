use anyhow::{anyhow, bail, Context};
use glam::Vec2;
use tendril_core::{Engine, TendrilProfile, TickOutcome, Viewport, NOMINAL_FRAME_MS};

mod svg;

const DEFAULT_FRAMES: usize = 600;
const VIEWPORT: (f32, f32) = (800.0, 600.0);
const SWEEP_FRACTION: f32 = 0.5; // share of the run spent sweeping the pointer

/// Pointer position for `frame`, or `None` once the sweep is over.
fn sweep(frame: usize, frames: usize, viewport: Viewport) -> Option<Vec2> {
    let sweep_frames = ((frames as f32 * SWEEP_FRACTION) as usize).max(1);
    if frame >= sweep_frames {
        return None;
    }
    let u = frame as f32 / sweep_frames as f32;
    Some(Vec2::new(
        viewport.width * (0.2 + 0.6 * u),
        viewport.height * (0.5 + 0.1 * (u * std::f32::consts::TAU).sin()),
    ))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let frames = match args.next() {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("invalid frame count {arg:?}"))?,
        None => DEFAULT_FRAMES,
    };
    let profile = match args.next().as_deref() {
        None | Some("vertical") => TendrilProfile::vertical(),
        Some("horizontal") => TendrilProfile::horizontal(),
        Some(other) => bail!("unknown profile {other:?} (expected vertical|horizontal)"),
    };

    let viewport = Viewport::new(VIEWPORT.0, VIEWPORT.1);
    let mut engine = Engine::with_viewport(profile, viewport)?;
    let mut tracker = engine.tracker();
    log::info!("[native] running {frames} frames on {}x{}", viewport.width, viewport.height);

    let mut influenced_frames = 0usize;
    for frame in 0..frames {
        match sweep(frame, frames, viewport) {
            Some(pos) => {
                tracker.on_move(pos, engine.now_ms());
            }
            None => tracker.on_leave(),
        }
        if let TickOutcome::Advanced(stats) = engine.step(NOMINAL_FRAME_MS, &tracker.snapshot()) {
            if stats.influenced > 0 {
                influenced_frames += 1;
            }
        }
    }
    log::info!("[native] pointer touched the tendril in {influenced_frames} frame(s)");

    let mut surface = svg::SvgSurface::new(viewport);
    engine
        .render()
        .replay(&mut surface)
        .map_err(|_| anyhow!("failed to format SVG output"))?;
    print!("{}", surface.finish());
    Ok(())
}
