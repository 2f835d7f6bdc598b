// Tuning constants shared by the simulation presets and the frontends.

// Frame timing
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0; // forces are tuned per 60 Hz frame
pub const MAX_FRAME_SCALE: f32 = 4.0; // caps catch-up after a stalled tab

// Chain layout
pub const DEFAULT_POINT_COUNT: usize = 45;
pub const SPACING_EXPONENT: f32 = 1.2; // packs points closer near the anchor
pub const UNFURL_EXPONENT: f32 = 0.95; // initial live spread vs. rest spread
pub const THICKNESS_EXPONENT: f32 = 0.85;
pub const THICKNESS_SCALE: f32 = 4.5;
pub const FREEDOM_EXPONENT: f32 = 0.8;
pub const FREEDOM_SPAN: f32 = 0.7;
pub const FREEDOM_FLOOR: f32 = 0.3;

// Pointer interaction
pub const TOUCH_RADIUS: f32 = 85.0; // px, scaled per point by freedom
pub const CAPTURE_RADIUS: f32 = 20.0; // px around the tip that starts a drag
pub const POINTER_VELOCITY_SCALE: f32 = 0.00035; // px delta -> force units
pub const POINTER_JITTER_PX: f32 = 0.1; // moves smaller than this are ignored

// Influence memory
pub const INFLUENCE_TIMEOUT_MS: f64 = 6000.0;
pub const INFLUENCE_DECAY_RATE: f32 = 0.9994; // per 20 ms of staleness
pub const INFLUENCE_DECAY_STEP_MS: f64 = 20.0;
pub const INFLUENCE_EPSILON: f32 = 1e-4; // continuous decay snaps to zero below this

// Return-to-rest ramp
pub const RETURN_RAMP_MS: f64 = 12_000.0;
pub const RETURN_RAMP_CAP: f32 = 0.7;
