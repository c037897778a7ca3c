//! Radius labels attached to each ring.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::RingConfig;
use crate::geometry::RingDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Text, placement and style of one ring's label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDescriptor {
    pub text: String,
    /// Rightmost point of the ring, `(radius, 0, 0)`.
    pub anchor: Vec3,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub character_height: f32,
    pub color: Color,
    pub visible: bool,
}

/// Radius rendered with zero decimal places.
pub fn format_radius(radius: f32) -> String {
    format!("{radius:.0}")
}

/// Label for `ring` using the current style. Hidden labels are still
/// produced so visibility can flip without regenerating anything.
pub fn format_label(ring: &RingDescriptor, config: &RingConfig) -> LabelDescriptor {
    LabelDescriptor {
        text: format_radius(ring.radius),
        anchor: Vec3::new(ring.radius, 0.0, 0.0),
        horizontal_align: HorizontalAlign::Left,
        vertical_align: VerticalAlign::Center,
        character_height: config.label_size,
        color: config.color,
        visible: config.show_labels,
    }
}

pub fn format_labels(rings: &[RingDescriptor], config: &RingConfig) -> Vec<LabelDescriptor> {
    rings.iter().map(|ring| format_label(ring, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::generate;

    fn ring(radius: f32, resolution: u32) -> RingDescriptor {
        RingDescriptor {
            index: 1,
            radius,
            points: crate::geometry::ring_points(radius, resolution),
            colors: Vec::new(),
            closed: true,
        }
    }

    #[test]
    fn radius_is_rounded_without_decimals() {
        assert_eq!(format_radius(37.6), "38");
        assert_eq!(format_radius(37.4), "37");
        assert_eq!(format_radius(10.0), "10");
        assert_eq!(format_radius(0.2), "0");
    }

    #[test]
    fn anchor_is_independent_of_resolution() {
        let config = RingConfig::default();
        let coarse = format_label(&ring(37.6, 3), &config);
        let fine = format_label(&ring(37.6, 99), &config);
        assert_eq!(coarse.anchor, Vec3::new(37.6, 0.0, 0.0));
        assert_eq!(coarse.anchor, fine.anchor);
        assert_eq!(coarse.text, "38");
    }

    #[test]
    fn label_tracks_style() {
        let config = RingConfig {
            color: Color::srgb(0.0, 1.0, 0.0),
            label_size: 1.5,
            show_labels: false,
            ..RingConfig::default()
        };
        let label = format_label(&ring(4.0, 8), &config);
        assert_eq!(label.color, config.color);
        assert!((label.character_height - 1.5).abs() < 1e-6);
        assert!(!label.visible);
        assert_eq!(label.horizontal_align, HorizontalAlign::Left);
        assert_eq!(label.vertical_align, VerticalAlign::Center);
    }

    #[test]
    fn one_label_per_ring() {
        let config = RingConfig {
            max_radius: 30.0,
            spacing: 7.4,
            ..RingConfig::default()
        };
        let rings = generate(&config).unwrap();
        let labels = format_labels(&rings, &config);
        let texts: Vec<_> = labels.iter().map(|label| label.text.as_str()).collect();
        assert_eq!(texts, ["7", "15", "22", "30"]);
    }
}
