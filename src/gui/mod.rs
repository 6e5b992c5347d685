pub mod app;
pub mod snapshot;
pub mod theme;
pub mod view;

/// Short straight strokes per full turn used to fake an angular gradient.
pub const ARC_SEGMENTS: usize = 180;
pub const SEGMENT_OVERLAP: f64 = 0.004; // radians, hides seams between segments
pub const KNOB_SHADOW_OFFSET: f64 = 1.5;
pub const KNOB_SHADOW_SPREAD: f64 = 2.5;
