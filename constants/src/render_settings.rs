//! Render tuning shared by overlay hosts.

/// Offset of label text from its anchor, in label heights, so text starts just
/// outside the ring it annotates.
pub const LABEL_ANCHOR_PADDING: f32 = 0.1;

/// Smallest on-screen font size worth drawing, in logical pixels.
pub const MIN_LABEL_FONT_PX: f32 = 4.0;

/// Largest on-screen font size, in logical pixels. Keeps labels next to the
/// camera from covering the viewport.
pub const MAX_LABEL_FONT_PX: f32 = 96.0;

/// Ribbon width used when a ring's line width is zero, in metres.
pub const HAIRLINE_WIDTH: f32 = 0.002;
