// Browser-independent input helpers, kept free of web-sys so host tests can include them.

use glam::Vec2;
use tendril_core::{Orientation, TendrilProfile, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    SwitchOrientation,
    ToggleHint,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " | "Spacebar" => Some(KeyAction::TogglePause),
        "o" | "O" => Some(KeyAction::SwitchOrientation),
        "h" | "H" => Some(KeyAction::ToggleHint),
        _ => None,
    }
}

/// Preset named by the canvas' profile attribute.
pub fn profile_for_attr(value: Option<&str>) -> TendrilProfile {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("horizontal") => TendrilProfile::horizontal(),
        _ => TendrilProfile::vertical(),
    }
}

pub fn toggled_profile(current: Orientation) -> TendrilProfile {
    TendrilProfile::for_orientation(current.toggled())
}

/// Pointer position relative to the canvas' top-left corner, in CSS pixels.
#[inline]
pub fn pointer_local(client: Vec2, rect_origin: Vec2) -> Vec2 {
    client - rect_origin
}

/// Backing store size for a canvas laid out at `css` pixels on a `dpr` display.
#[inline]
pub fn backing_size(css: Vec2, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let w = (css.x as f64 * dpr).round().max(1.0) as u32;
    let h = (css.y as f64 * dpr).round().max(1.0) as u32;
    (w, h)
}

/// Simulation viewport for a canvas laid out at `css` pixels.
#[inline]
pub fn css_viewport(css: Vec2) -> Viewport {
    Viewport::new(css.x.max(0.0), css.y.max(0.0))
}
