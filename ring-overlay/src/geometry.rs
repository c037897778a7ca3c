//! Concentric ring polylines generated from a configuration.

use std::f32::consts::TAU;

use bevy::prelude::*;
use constants::ring_defaults::{MAX_RESOLUTION, MAX_RING_VERTICES};

use crate::config::RingConfig;
use crate::error::{OverlayError, Result};

/// One closed ring in the overlay's local XY plane.
#[derive(Debug, Clone, PartialEq)]
pub struct RingDescriptor {
    /// 1-based position counted outwards from the centre.
    pub index: u32,
    pub radius: f32,
    /// `resolution + 1` samples, the last revisiting the first.
    pub points: Vec<Vec3>,
    /// Style colour baked per point.
    pub colors: Vec<Color>,
    pub closed: bool,
}

/// Number of rings that fit inside `max_radius` at `spacing` intervals.
pub fn ring_count(max_radius: f32, spacing: f32) -> u32 {
    if spacing <= 0.0 || max_radius <= 0.0 {
        return 0;
    }
    (max_radius / spacing).floor() as u32
}

/// Sample a closed circle of `radius` in the XY plane.
///
/// Sample `resolution` lands back on angle zero so the loop closes exactly.
/// A resolution of zero yields no samples.
pub fn ring_points(radius: f32, resolution: u32) -> Vec<Vec3> {
    if resolution == 0 {
        return Vec::new();
    }
    (0..=resolution)
        .map(|s| {
            let theta = TAU * (s % resolution) as f32 / resolution as f32;
            Vec3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
        })
        .collect()
}

/// Build every ring described by `config`, innermost first.
///
/// A non-positive spacing or max radius yields no rings. A resolution above
/// its cap, or more rings than [`MAX_RING_VERTICES`] can hold, is an error
/// and yields nothing.
pub fn generate(config: &RingConfig) -> Result<Vec<RingDescriptor>> {
    if config.resolution > MAX_RESOLUTION {
        return Err(OverlayError::resolution_exceeded(
            config.resolution,
            MAX_RESOLUTION,
        ));
    }
    // Resolutions below 3 never pass the config store; treat them as empty.
    if config.resolution == 0 {
        return Ok(Vec::new());
    }

    let count = ring_count(config.max_radius, config.spacing);
    let vertices = u64::from(count) * u64::from(config.resolution + 1);
    if vertices > MAX_RING_VERTICES {
        return Err(OverlayError::VertexBudgetExceeded {
            rings: count,
            vertices,
            max: MAX_RING_VERTICES,
        });
    }

    let rings = (1..=count)
        .map(|index| {
            let radius = config.spacing * index as f32;
            let points = ring_points(radius, config.resolution);
            let colors = vec![config.color; points.len()];
            RingDescriptor {
                index,
                radius,
                points,
                colors,
                closed: true,
            }
        })
        .collect();

    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_radius: f32, spacing: f32, resolution: u32) -> RingConfig {
        RingConfig {
            max_radius,
            spacing,
            resolution,
            ..RingConfig::default()
        }
    }

    #[test]
    fn five_unit_rings_with_eight_samples() {
        let rings = generate(&config(5.0, 1.0, 8)).unwrap();
        assert_eq!(rings.len(), 5);
        for (i, ring) in rings.iter().enumerate() {
            assert_eq!(ring.index, i as u32 + 1);
            assert!((ring.radius - (i as f32 + 1.0)).abs() < 1e-6);
            assert_eq!(ring.points.len(), 9);
            assert!(ring.closed);
        }
    }

    #[test]
    fn ring_count_is_floor_of_ratio() {
        for (max_radius, spacing) in [(200.0, 10.0), (7.5, 2.0), (1.0, 0.3), (9.99, 1.0)] {
            let rings = generate(&config(max_radius, spacing, 16)).unwrap();
            let expected = (max_radius / spacing).floor() as usize;
            assert_eq!(rings.len(), expected);
            for ring in &rings {
                assert!((ring.radius - spacing * ring.index as f32).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn every_resolution_closes_the_loop() {
        for resolution in [3, 4, 17, 64, 99] {
            let rings = generate(&config(3.0, 1.5, resolution)).unwrap();
            for ring in rings {
                assert_eq!(ring.points.len(), resolution as usize + 1);
                assert_eq!(ring.points.first(), ring.points.last());
                assert_eq!(ring.colors.len(), ring.points.len());
            }
        }
    }

    #[test]
    fn points_lie_on_the_circle_in_the_xy_plane() {
        let rings = generate(&config(4.0, 2.0, 12)).unwrap();
        for ring in rings {
            for point in ring.points {
                assert!(point.z.abs() < 1e-6);
                assert!((point.truncate().length() - ring.radius).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn zero_resolution_has_no_samples() {
        assert!(ring_points(5.0, 0).is_empty());
    }

    #[test]
    fn vertex_budget_refuses_dense_rings() {
        let result = generate(&config(1e9, 1e-3, 99));
        assert_eq!(
            result,
            Err(OverlayError::VertexBudgetExceeded {
                rings: u32::MAX,
                vertices: u64::from(u32::MAX) * 100,
                max: MAX_RING_VERTICES,
            })
        );

        // 2500 rings of 100 points sit exactly on the budget.
        assert_eq!(generate(&config(2500.0, 1.0, 99)).unwrap().len(), 2500);
        assert!(generate(&config(2501.0, 1.0, 99)).is_err());
    }

    #[test]
    fn first_sample_is_on_positive_x_axis() {
        let points = ring_points(2.0, 6);
        assert!((points[0] - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
        // A quarter of the way round lands on +Y for a resolution of 4.
        let points = ring_points(1.0, 4);
        assert!((points[1] - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn resolution_above_cap_is_an_error() {
        let result = generate(&config(5.0, 1.0, 100));
        assert_eq!(result, Err(OverlayError::resolution_exceeded(100, 99)));
        assert!(generate(&config(5.0, 1.0, 99)).is_ok());
    }

    #[test]
    fn zero_spacing_or_radius_is_empty_without_error() {
        assert_eq!(generate(&config(5.0, 0.0, 8)), Ok(Vec::new()));
        assert_eq!(generate(&config(0.0, 1.0, 8)), Ok(Vec::new()));
    }

    #[test]
    fn spacing_larger_than_radius_yields_no_rings() {
        assert_eq!(generate(&config(3.0, 4.0, 8)), Ok(Vec::new()));
    }

    #[test]
    fn ring_colour_follows_style() {
        let config = RingConfig {
            color: Color::srgb(1.0, 0.0, 0.0),
            ..config(2.0, 1.0, 5)
        };
        let rings = generate(&config).unwrap();
        assert!(rings
            .iter()
            .flat_map(|ring| &ring.colors)
            .all(|color| *color == Color::srgb(1.0, 0.0, 0.0)));
    }
}
