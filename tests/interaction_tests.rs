// Host-side tests for pointer tracking.

use glam::Vec2;
use tendril_core::*;

#[test]
fn first_sample_sets_position_without_velocity() {
    let mut tracker = PointerTracker::default();
    assert!(tracker.on_move(Vec2::new(10.0, 20.0), 5.0));
    let snap = tracker.snapshot();
    assert_eq!(snap.pointer, Some(Vec2::new(10.0, 20.0)));
    assert_eq!(snap.velocity, Vec2::ZERO);
    assert_eq!(snap.last_interaction_ms, Some(5.0));
    assert!(!snap.is_captured());
}

#[test]
fn velocity_is_smoothed_and_scaled_difference() {
    let params = TrackerParams::default();
    let mut tracker = PointerTracker::new(params);
    tracker.on_move(Vec2::ZERO, 0.0);
    tracker.on_move(Vec2::new(100.0, 0.0), 16.0);
    let expected = 100.0 * params.velocity_scale * (1.0 - params.velocity_smoothing);
    assert!((tracker.snapshot().velocity.x - expected).abs() < 1e-7);
    assert_eq!(tracker.snapshot().velocity.y, 0.0);
}

#[test]
fn sub_pixel_jitter_is_ignored() {
    let mut tracker = PointerTracker::default();
    tracker.on_move(Vec2::new(50.0, 50.0), 0.0);
    assert!(!tracker.on_move(Vec2::new(50.05, 49.95), 10.0));
    let snap = tracker.snapshot();
    assert_eq!(snap.pointer, Some(Vec2::new(50.0, 50.0)));
    assert_eq!(snap.last_interaction_ms, Some(0.0));
}

#[test]
fn non_finite_samples_are_dropped() {
    let mut tracker = PointerTracker::default();
    assert!(!tracker.on_move(Vec2::new(f32::NAN, 1.0), 0.0));
    assert!(!tracker.on_down(Vec2::new(1.0, f32::INFINITY), 0.0, Some(Vec2::ONE), 20.0));
    assert_eq!(tracker.position(), None);
    assert_eq!(tracker.snapshot(), InteractionSnapshot::idle());
}

#[test]
fn press_near_tip_captures_and_moves_retarget() {
    let mut tracker = PointerTracker::default();
    let tip = Vec2::new(400.0, 120.0);
    assert!(tracker.on_down(Vec2::new(405.0, 120.0), 0.0, Some(tip), CAPTURE_RADIUS));
    assert!(tracker.is_captured());

    tracker.on_move(Vec2::new(450.0, 130.0), 16.0);
    assert_eq!(
        tracker.snapshot().drag,
        DragState::Captured {
            target: Vec2::new(450.0, 130.0)
        }
    );

    tracker.on_up();
    assert!(!tracker.is_captured());
    // releasing keeps the last known pointer
    assert_eq!(tracker.position(), Some(Vec2::new(450.0, 130.0)));
}

#[test]
fn press_away_from_tip_does_not_capture() {
    let mut tracker = PointerTracker::default();
    let tip = Vec2::new(400.0, 120.0);
    assert!(!tracker.on_down(Vec2::new(400.0, 145.0), 0.0, Some(tip), CAPTURE_RADIUS));
    assert!(!tracker.on_down(Vec2::new(400.0, 120.0), 0.0, None, CAPTURE_RADIUS));
    assert!(!tracker.is_captured());
}

#[test]
fn leaving_releases_capture() {
    let mut tracker = PointerTracker::default();
    tracker.on_down(Vec2::ZERO, 0.0, Some(Vec2::ZERO), CAPTURE_RADIUS);
    tracker.on_leave();
    assert_eq!(tracker.snapshot().drag, DragState::Idle);
}

#[test]
fn sanitized_snapshot_drops_non_finite_fields() {
    let snap = InteractionSnapshot {
        pointer: Some(Vec2::new(f32::NAN, 0.0)),
        velocity: Vec2::new(f32::INFINITY, 0.0),
        last_interaction_ms: Some(f64::NAN),
        drag: DragState::Captured {
            target: Vec2::new(0.0, f32::NAN),
        },
    }
    .sanitized();
    assert_eq!(snap, InteractionSnapshot::idle());
}
