// Host-side tests for the engine lifecycle and end-to-end behaviour.

use glam::Vec2;
use tendril_core::*;

const FRAME: f64 = NOMINAL_FRAME_MS;

fn engine() -> Engine {
    Engine::with_viewport(TendrilProfile::vertical(), Viewport::new(800.0, 600.0)).unwrap()
}

#[test]
fn idle_chain_stays_near_rest() {
    let mut engine = engine();
    let idle = InteractionSnapshot::idle();
    for _ in 0..1000 {
        assert!(matches!(engine.step(FRAME, &idle), TickOutcome::Advanced(_)));
    }
    let chain = engine.chain().unwrap();
    assert!(chain.is_finite());
    for (i, p) in chain.points().iter().enumerate() {
        let drift = p.pos - p.base;
        assert!(
            drift.x.abs() < 100.0 && drift.y.abs() < 100.0,
            "point {i} wandered to {drift:?} from rest"
        );
    }
}

#[test]
fn idle_chain_actually_sways() {
    let mut engine = engine();
    let idle = InteractionSnapshot::idle();
    let mut max_lateral = 0.0_f32;
    for _ in 0..600 {
        engine.step(FRAME, &idle);
        let chain = engine.chain().unwrap();
        let mid = chain.point(chain.len() / 3).unwrap();
        max_lateral = max_lateral.max(chain.lateral_of(mid.pos).abs());
    }
    assert!(max_lateral > 0.5, "mid chain never left the axis");
}

fn drag_tip_along(profile: TendrilProfile, step: Vec2) {
    let mut engine = Engine::with_viewport(profile, Viewport::new(800.0, 600.0)).unwrap();
    let mut tracker = engine.tracker();
    let mut target = engine.tip().unwrap() + Vec2::new(5.0, 0.0);
    assert!(tracker.on_down(target, engine.now_ms(), engine.tip(), engine.capture_radius()));
    engine.step(FRAME, &tracker.snapshot());

    for frame in 0..180 {
        target += step;
        tracker.on_move(target, engine.now_ms());
        engine.step(FRAME, &tracker.snapshot());
        let gap = engine.tip().unwrap().distance(target);
        assert!(gap < CAPTURE_RADIUS, "frame {frame}: tip fell {gap}px behind the pointer");
        if frame >= 60 {
            assert!(gap < 3.0, "frame {frame}: tip trails a steady pointer by {gap}px");
        }
    }

    for frame in 0..120 {
        engine.step(FRAME, &tracker.snapshot());
        let gap = engine.tip().unwrap().distance(target);
        assert!(gap < CAPTURE_RADIUS, "hold frame {frame}: tip {gap}px from the pointer");
    }
    let last = engine.tip().unwrap().distance(target);
    assert!(last < 3.0, "tip settled {last}px from the pointer");
    assert!(engine.chain().unwrap().is_finite());
}

#[test]
fn captured_tip_tracks_moving_pointer_vertical() {
    drag_tip_along(TendrilProfile::vertical(), Vec2::new(2.0, -1.0));
}

#[test]
fn captured_tip_tracks_moving_pointer_horizontal() {
    drag_tip_along(TendrilProfile::horizontal(), Vec2::new(-1.0, 2.0));
}

#[test]
fn rebuild_forgets_previous_drag_target() {
    let mut engine = engine();
    let mut tracker = engine.tracker();
    let target = engine.tip().unwrap();
    tracker.on_down(target, engine.now_ms(), engine.tip(), engine.capture_radius());
    engine.step(FRAME, &tracker.snapshot());

    // a fresh chain must not inherit a jump between the old and new target
    assert_eq!(engine.resize(Viewport::new(900.0, 700.0)), Lifecycle::Active);
    let far = target + Vec2::new(300.0, 0.0);
    let fresh_tip = engine.tip().unwrap();
    let held = InteractionSnapshot {
        drag: DragState::Captured { target: far },
        ..tracker.snapshot()
    };
    engine.step(FRAME, &held);
    let moved = engine.tip().unwrap().distance(fresh_tip);
    assert!(moved < 60.0, "tip jumped {moved}px on the first tick after a rebuild");
}

#[test]
fn released_tip_returns_toward_rest() {
    let mut engine = engine();
    let mut tracker = engine.tracker();
    let rest = engine.chain().unwrap().tip().unwrap().base;
    let target = rest + Vec2::new(60.0, 0.0);
    tracker.on_down(rest, engine.now_ms(), engine.tip(), engine.capture_radius());
    tracker.on_move(target, engine.now_ms());
    for _ in 0..120 {
        engine.step(FRAME, &tracker.snapshot());
    }
    let held = engine.tip().unwrap().distance(rest);
    tracker.on_up();
    tracker.on_leave();
    let away = InteractionSnapshot {
        pointer: None,
        ..tracker.snapshot()
    };
    for _ in 0..1200 {
        engine.step(FRAME, &away);
    }
    let released = engine.tip().unwrap().distance(rest);
    assert!(released < held, "tip did not head home: held {held}, released {released}");
}

#[test]
fn degenerate_viewport_suspends_then_recovers() {
    let mut engine = Engine::with_viewport(TendrilProfile::vertical(), Viewport::new(0.0, 0.0)).unwrap();
    assert_eq!(engine.lifecycle(), Lifecycle::Suspended);
    assert!(engine.chain().is_none());
    assert!(engine.render().is_empty());
    assert_eq!(engine.step(FRAME, &InteractionSnapshot::idle()), TickOutcome::Skipped);
    assert_eq!(engine.now_ms(), 0.0);

    assert_eq!(engine.resize(Viewport::new(800.0, 600.0)), Lifecycle::Active);
    for _ in 0..60 {
        engine.step(FRAME, &InteractionSnapshot::idle());
    }
    let chain = engine.chain().unwrap();
    assert_eq!(chain.len(), DEFAULT_POINT_COUNT);
    assert!(chain.is_finite());
    assert!(!engine.render().is_empty());
}

#[test]
fn fresh_engine_is_uninitialized() {
    let engine = Engine::new(TendrilProfile::default()).unwrap();
    assert_eq!(engine.lifecycle(), Lifecycle::Uninitialized);
    assert!(engine.tip().is_none());
    assert!(engine.render().is_empty());
}

#[test]
fn resize_rebuilds_with_new_geometry() {
    let mut engine = engine();
    for _ in 0..30 {
        engine.step(FRAME, &InteractionSnapshot::idle());
    }
    let epoch = engine.epoch();
    engine.resize(Viewport::new(400.0, 300.0));

    assert!(engine.epoch() > epoch);
    let chain = engine.chain().unwrap();
    assert_eq!(chain.len(), DEFAULT_POINT_COUNT);
    assert!((chain.anchor() - Vec2::new(200.0, 255.0)).length() < 1e-3);
    assert!((chain.tip().unwrap().base - Vec2::new(200.0, 60.0)).length() < 1e-3);
    assert!(chain.points().iter().all(|p| p.vel == Vec2::ZERO));
}

#[test]
fn ticket_from_before_resize_is_stale() {
    let mut engine = engine();
    let ticket = engine.ticket();
    engine.resize(Viewport::new(640.0, 480.0));
    let before = engine.chain().unwrap().positions();

    assert_eq!(engine.tick(ticket, FRAME, &InteractionSnapshot::idle()), TickOutcome::Stale);
    assert_eq!(engine.chain().unwrap().positions(), before);
    assert!(matches!(
        engine.tick(engine.ticket(), FRAME, &InteractionSnapshot::idle()),
        TickOutcome::Advanced(_)
    ));
}

#[test]
fn bad_deltas_are_skipped() {
    let mut engine = engine();
    let before = engine.chain().unwrap().positions();
    for dt in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        assert_eq!(engine.step(dt, &InteractionSnapshot::idle()), TickOutcome::Skipped);
    }
    assert_eq!(engine.now_ms(), 0.0);
    assert_eq!(engine.chain().unwrap().positions(), before);
}

#[test]
fn suspend_resume_and_teardown() {
    let mut engine = engine();
    engine.suspend();
    assert_eq!(engine.lifecycle(), Lifecycle::Suspended);
    assert_eq!(engine.step(FRAME, &InteractionSnapshot::idle()), TickOutcome::Skipped);
    // paused chains still draw
    assert!(!engine.render().is_empty());

    assert_eq!(engine.resume(), Lifecycle::Active);
    assert!(matches!(engine.step(FRAME, &InteractionSnapshot::idle()), TickOutcome::Advanced(_)));

    engine.teardown();
    assert_eq!(engine.lifecycle(), Lifecycle::Suspended);
    assert!(engine.chain().is_none());
    assert!(engine.viewport().is_none());
    assert_eq!(engine.resume(), Lifecycle::Suspended);
    assert_eq!(engine.resize(Viewport::new(800.0, 600.0)), Lifecycle::Active);
}

#[test]
fn switching_profile_rebuilds_in_place() {
    let mut engine = engine();
    let state = engine.set_profile(TendrilProfile::horizontal()).unwrap();
    assert_eq!(state, Lifecycle::Active);
    let chain = engine.chain().unwrap();
    assert_eq!(chain.axis(), Vec2::X);
    assert!((chain.anchor() - Vec2::new(120.0, 300.0)).length() < 1e-3);

    let bad = TendrilProfile::vertical().with_point_count(1);
    assert_eq!(engine.set_profile(bad).unwrap_err(), TendrilError::TooFewPoints(1));
    assert_eq!(engine.profile().orientation, Orientation::Horizontal);
}

#[test]
fn horizontal_profile_runs_bounded() {
    let mut engine = Engine::with_viewport(TendrilProfile::horizontal(), Viewport::new(1024.0, 768.0)).unwrap();
    let mut tracker = engine.tracker();
    for frame in 0..600 {
        let x = 150.0 + frame as f32;
        tracker.on_move(Vec2::new(x, 384.0 + (frame as f32 * 0.05).sin() * 40.0), engine.now_ms());
        engine.step(FRAME, &tracker.snapshot());
    }
    let chain = engine.chain().unwrap();
    assert!(chain.is_finite());
    assert!(chain.points().iter().all(|p| p.pos.distance(p.base) < 200.0));
}

#[test]
fn uneven_frame_times_stay_stable() {
    let mut engine = engine();
    let idle = InteractionSnapshot::idle();
    for i in 0..500 {
        let dt = if i % 7 == 0 { 120.0 } else { 8.0 };
        engine.step(dt, &idle);
    }
    assert!(engine.chain().unwrap().is_finite());
}
