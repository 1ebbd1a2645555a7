//! Public types and constants for the visualization module.

/// How series animation state is written into the SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Freeze the current dash offsets and label opacities.
    Snapshot,
    /// Start every series hidden and embed `<animate>` elements that replay the entrance.
    Animated,
}

/// Cubic in-out as an SVG `keySplines` control pair.
pub const CUBIC_IN_OUT_SPLINE: &str = "0.645 0.045 0.355 1";

/// Tick mark length on both axes.
pub const TICK_SIZE: f64 = 6.0;

/// Gap between a tick mark and its label.
pub const TICK_PADDING: f64 = 3.0;

pub const GRID_STROKE: &str = "lightgrey";
pub const GRID_OPACITY: f64 = 0.7;
