use bevy::prelude::*;
use constants::coordinate_system::Z_UP_TO_Y_UP;

/// Drives the `base_link` frame around a circle.
#[derive(Component)]
pub struct Vehicle {
    pub path_radius: f32,
    pub angular_speed: f32,
    pub angle: f32,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            path_radius: 40.0,
            angular_speed: 0.15,
            angle: 0.0,
        }
    }
}

/// Rotation taking the Z-up overlay frame into Bevy's Y-up world.
pub fn ring_plane_rotation() -> Quat {
    // Stored row-major, glam reads columns.
    Quat::from_mat3(&Mat3::from_cols_array_2d(&Z_UP_TO_Y_UP).transpose())
}

pub fn drive_vehicle(
    mut vehicles: Query<(&mut Vehicle, &mut Transform)>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut paused: Local<bool>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        *paused = !*paused;
        info!("Vehicle {}", if *paused { "paused" } else { "moving" });
    }
    if *paused {
        return;
    }

    for (mut vehicle, mut transform) in &mut vehicles {
        vehicle.angle += vehicle.angular_speed * time.delta_secs();
        let angle = vehicle.angle;

        transform.translation = Vec3::new(angle.cos(), 0.0, angle.sin()) * vehicle.path_radius;
        // Face along the direction of travel.
        let heading = -std::f32::consts::FRAC_PI_2 - angle;
        transform.rotation = Quat::from_rotation_y(heading) * ring_plane_rotation();
    }
}
