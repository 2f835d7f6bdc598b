// Host-side tests for curve rendering.

use glam::Vec2;
use tendril_core::*;

fn rendered() -> (Chain, DrawList) {
    let profile = TendrilProfile::vertical();
    let chain = Chain::build(Viewport::new(800.0, 600.0), &profile).unwrap();
    let list = CurveRenderer::new(profile.render.clone()).render(&chain, Viewport::new(800.0, 600.0), 0.0);
    (chain, list)
}

#[test]
fn one_stroked_segment_per_point_plus_trail_and_glow() {
    let (chain, list) = rendered();
    // trail + 3 commands per segment + two glow discs
    assert_eq!(list.len(), 1 + chain.len() * 3 + 2);

    let cmds = list.commands();
    assert!(matches!(cmds[0], DrawCommand::FillRect { .. }));
    for seg in cmds[1..cmds.len() - 2].chunks(3) {
        assert!(matches!(seg[0], DrawCommand::BeginPath { .. }));
        assert!(matches!(seg[1], DrawCommand::CurveTo { .. }));
        assert!(matches!(seg[2], DrawCommand::Stroke(_)));
    }
}

#[test]
fn trail_covers_viewport() {
    let (_, list) = rendered();
    match &list.commands()[0] {
        DrawCommand::FillRect { origin, size, color } => {
            assert_eq!(*origin, Vec2::ZERO);
            assert_eq!(*size, Vec2::new(800.0, 600.0));
            assert!((color.a - 0.95).abs() < 1e-6);
        }
        other => panic!("expected trail fill, got {other:?}"),
    }
}

#[test]
fn segments_are_contiguous_from_anchor_to_tip() {
    let (chain, list) = rendered();
    let mut expected_start = chain.anchor();
    let mut ends = Vec::new();
    for seg in list.commands()[1..list.len() - 2].chunks(3) {
        let (DrawCommand::BeginPath { start }, DrawCommand::CurveTo { end, .. }) = (&seg[0], &seg[1]) else {
            panic!("malformed segment");
        };
        assert_eq!(*start, expected_start);
        expected_start = *end;
        ends.push(*end);
    }
    assert_eq!(ends, chain.positions());
}

#[test]
fn strokes_share_anchor_to_tip_gradient() {
    let (chain, list) = rendered();
    let tip = chain.tip().unwrap().pos;
    let strokes: Vec<&StrokeStyle> = list
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Stroke(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(strokes.len(), chain.len());
    for s in &strokes {
        assert_eq!(s.gradient.from, chain.anchor());
        assert_eq!(s.gradient.to, tip);
        assert_eq!(s.gradient.stops.len(), 5);
        assert_eq!(s.cap, LineCap::Round);
        assert!(s.width > 0.0);
    }
    // stroke widths vary along the chain
    assert!(strokes.iter().any(|s| (s.width - strokes[0].width).abs() > 0.5));
}

#[test]
fn tip_glow_is_two_discs() {
    let (chain, list) = rendered();
    let tip = chain.tip().unwrap().pos;
    let cmds = list.commands();
    let (DrawCommand::FillCircle(outer), DrawCommand::FillCircle(core)) = (&cmds[cmds.len() - 2], &cmds[cmds.len() - 1]) else {
        panic!("expected glow discs last");
    };
    assert_eq!(outer.center, tip);
    assert_eq!(core.center, tip);
    assert_eq!(outer.radius, 12.0);
    assert_eq!(core.radius, 6.0);
    assert_eq!(core.stops.last().unwrap().color.a, 0.0);
}

#[test]
fn influence_thickens_stroke() {
    let r = CurveRenderer::new(RenderParams::default());
    let calm = r.segment_width(10, 46, 0.0, 1.0);
    let touched = r.segment_width(10, 46, 0.1, 1.0);
    assert!(touched > calm);
}

#[test]
fn divisor_softens_near_anchor() {
    let r = CurveRenderer::new(RenderParams::default());
    let first = r.segment_divisor(0, 46);
    let last = r.segment_divisor(44, 46);
    assert!((first - 12.0).abs() < 1e-5);
    assert!(last > 8.0 && last < first);
}

#[test]
fn handles_reduce_to_chord_on_straight_line() {
    let (c1, c2) = bezier_handles(Vec2::ZERO, Vec2::X, Vec2::X * 2.0, Vec2::X * 3.0, 6.0);
    assert!((c1 - Vec2::new(1.0 + 2.0 / 6.0, 0.0)).length() < 1e-6);
    assert!((c2 - Vec2::new(2.0 - 2.0 / 6.0, 0.0)).length() < 1e-6);
}

#[test]
fn no_trail_when_disabled() {
    let profile = TendrilProfile::vertical();
    let chain = Chain::build(Viewport::new(800.0, 600.0), &profile).unwrap();
    let params = RenderParams {
        trail: None,
        ..profile.render
    };
    let list = CurveRenderer::new(params).render(&chain, Viewport::new(800.0, 600.0), 0.0);
    assert!(matches!(list.commands()[0], DrawCommand::BeginPath { .. }));
}

#[derive(Default)]
struct Recorder(Vec<&'static str>);

impl DrawSurface for Recorder {
    type Error = ();

    fn apply(&mut self, command: &DrawCommand) -> Result<(), ()> {
        self.0.push(match command {
            DrawCommand::FillRect { .. } => "rect",
            DrawCommand::BeginPath { .. } => "begin",
            DrawCommand::CurveTo { .. } => "curve",
            DrawCommand::Stroke(_) => "stroke",
            DrawCommand::FillCircle(_) => "circle",
        });
        if self.0.len() == 4 {
            return Err(());
        }
        Ok(())
    }
}

#[test]
fn replay_stops_at_first_error() {
    let (_, list) = rendered();
    let mut surface = Recorder::default();
    assert_eq!(list.replay(&mut surface), Err(()));
    assert_eq!(surface.0, vec!["rect", "begin", "curve", "stroke"]);
}

#[test]
fn css_colours() {
    assert_eq!(Rgba::white(0.5).to_css(), "rgba(255, 255, 255, 0.5)");
    assert_eq!(Rgba::new(0.0, 0.0, 0.0, 2.0).to_css(), "rgba(0, 0, 0, 1)");
}
