use bevy::prelude::*;
use constants::ring_defaults::DEFAULT_REFERENCE_FRAME;
use ring_overlay::DistanceRings;

pub const HELP: &str = "1/2 spacing  3/4 max radius  5/6 resolution  7/8 line width  \
9/0 label size\nL labels  C colour  F missing frame  H enable  Space pause  T follow";

const MISSING_FRAME: &str = "missing_frame";

const PALETTE: [Color; 4] = [
    Color::srgb(0.78, 0.78, 0.78),
    Color::srgb(0.2, 0.9, 0.4),
    Color::srgb(0.3, 0.6, 1.0),
    Color::srgb(1.0, 0.4, 0.3),
];

/// Keyboard edits of every ring setting.
pub fn ring_controls_system(
    mut rings: Query<&mut DistanceRings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut palette_index: Local<usize>,
) {
    if keyboard.get_just_pressed().next().is_none() {
        return;
    }

    for mut settings in &mut rings {
        let config = &mut settings.config;

        if keyboard.just_pressed(KeyCode::Digit1) {
            config.spacing -= 1.0;
        }
        if keyboard.just_pressed(KeyCode::Digit2) {
            config.spacing += 1.0;
        }
        if keyboard.just_pressed(KeyCode::Digit3) {
            config.max_radius -= 10.0;
        }
        if keyboard.just_pressed(KeyCode::Digit4) {
            config.max_radius += 10.0;
        }
        // Stepping past 99 demonstrates the resolution fault.
        if keyboard.just_pressed(KeyCode::Digit5) {
            config.resolution = config.resolution.saturating_sub(8);
        }
        if keyboard.just_pressed(KeyCode::Digit6) {
            config.resolution += 8;
        }
        if keyboard.just_pressed(KeyCode::Digit7) {
            config.line_width -= 0.1;
        }
        if keyboard.just_pressed(KeyCode::Digit8) {
            config.line_width += 0.1;
        }
        if keyboard.just_pressed(KeyCode::Digit9) {
            config.label_size -= 1.0;
        }
        if keyboard.just_pressed(KeyCode::Digit0) {
            config.label_size += 1.0;
        }
        if keyboard.just_pressed(KeyCode::KeyL) {
            config.show_labels = !config.show_labels;
        }
        if keyboard.just_pressed(KeyCode::KeyC) {
            *palette_index = (*palette_index + 1) % PALETTE.len();
            config.color = PALETTE[*palette_index];
        }
        if keyboard.just_pressed(KeyCode::KeyF) {
            config.reference_frame = if config.reference_frame == MISSING_FRAME {
                DEFAULT_REFERENCE_FRAME.to_string()
            } else {
                MISSING_FRAME.to_string()
            };
            info!("Reference frame: {}", config.reference_frame);
        }
        if keyboard.just_pressed(KeyCode::KeyH) {
            settings.enabled = !settings.enabled;
        }
    }
}
