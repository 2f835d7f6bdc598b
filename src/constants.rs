// DOM hooks shared by the web frontend.

pub const CANVAS_ID: &str = "tendril-canvas";
/// Attribute on the canvas selecting the preset; `"horizontal"` or anything else for vertical.
pub const PROFILE_ATTR: &str = "data-profile";
pub const HINT_SELECTOR: &str = ".hint";
pub const HIDDEN_CLASS: &str = "hidden";

/// Longest frame delta fed to the engine after the tab was backgrounded.
pub const MAX_FRAME_DT_MS: f64 = 250.0;
