use std::fmt::Write;

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use ring_overlay::{DistanceRings, OverlayStatus, StatusLevel};

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct StatusText;

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}

/// Show requested settings and the overlay's status reports.
pub fn status_text_update_system(
    status: Res<OverlayStatus>,
    rings: Query<(Entity, &DistanceRings)>,
    mut query: Query<(&mut Text, &mut TextColor), With<StatusText>>,
) {
    let Ok((mut text, mut color)) = query.single_mut() else {
        return;
    };

    let mut lines = String::new();
    let mut worst = StatusLevel::Ok;
    for (entity, settings) in &rings {
        let config = &settings.config;
        let _ = writeln!(
            lines,
            "frame '{}'  spacing {:.1}  max {:.0}  resolution {}  width {:.2}  labels {} ({:.1}){}",
            config.reference_frame,
            config.spacing,
            config.max_radius,
            config.resolution,
            config.line_width,
            if config.show_labels { "on" } else { "off" },
            config.label_size,
            if settings.enabled { "" } else { "  [disabled]" },
        );
        let Some(board) = status.get(entity) else {
            continue;
        };
        for report in board.reports() {
            let _ = writeln!(lines, "  {:?} {}: {}", report.level, report.category, report.message);
        }
        worst = worst.max(board.worst());
    }

    if text.0 != lines {
        text.0 = lines;
    }
    color.0 = match worst {
        StatusLevel::Ok => Color::srgb(0.8, 0.9, 0.8),
        StatusLevel::Warn => Color::srgb(1.0, 0.8, 0.2),
        StatusLevel::Error => Color::srgb(1.0, 0.3, 0.3),
    };
}
