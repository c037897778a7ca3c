//! Default overlay parameters, applied when an overlay is first initialised.

/// Ring colour as 8-bit sRGB (light grey).
pub const DEFAULT_COLOR_SRGB: [u8; 3] = [200, 200, 200];

/// Ring line width in metres.
pub const DEFAULT_LINE_WIDTH: f32 = 0.02;

/// Radius of the outermost ring in metres.
pub const DEFAULT_MAX_RADIUS: f32 = 200.0;

/// Distance between consecutive rings in metres.
pub const DEFAULT_SPACING: f32 = 10.0;

/// Angular samples per ring.
pub const DEFAULT_RESOLUTION: u32 = 99;

pub const DEFAULT_SHOW_LABELS: bool = true;

/// Character height of the radius labels in metres.
pub const DEFAULT_LABEL_SIZE: f32 = 5.0;

pub const DEFAULT_REFERENCE_FRAME: &str = "base_link";

/// Fewest angular samples that still close a ring into a polygon.
pub const MIN_RESOLUTION: u32 = 3;

/// Hard cap on angular samples. A ring contributes `resolution + 1` vertices
/// and the line renderable has a fixed vertex budget.
pub const MAX_RESOLUTION: u32 = 99;

/// Vertices a single overlay may generate across all of its rings.
pub const MAX_RING_VERTICES: u64 = 250_000;
