use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

use crate::vehicle::Vehicle;

#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    /// Keep the focus on the vehicle instead of the free pan point.
    pub follow_vehicle: bool,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 260.0,
            pitch: -0.8,
            yaw: 0.0,
            follow_vehicle: true,
        }
    }
}

impl ViewportCamera {
    fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Orbit with right drag, dolly with the wheel, pan with WASD. `T` toggles
/// following the vehicle.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport: ResMut<ViewportCamera>,
    vehicles: Query<&GlobalTransform, With<Vehicle>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport.yaw += -mouse_delta.x * yaw_sens;
        viewport.pitch += -mouse_delta.y * pitch_sens;
        viewport.pitch = viewport.pitch.clamp(-1.55, -0.05);
    }

    let scroll_accum: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();
    if scroll_accum.abs() > f32::EPSILON {
        viewport.distance = (viewport.distance * (1.0 - scroll_accum * 0.1)).clamp(5.0, 2000.0);
    }

    if keyboard.just_pressed(KeyCode::KeyT) {
        viewport.follow_vehicle = !viewport.follow_vehicle;
    }

    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) { move_input.z -= 1.0; }
    if keyboard.pressed(KeyCode::KeyS) { move_input.z += 1.0; }
    if keyboard.pressed(KeyCode::KeyD) { move_input.x += 1.0; }
    if keyboard.pressed(KeyCode::KeyA) { move_input.x -= 1.0; }

    if viewport.follow_vehicle {
        if let Some(vehicle) = vehicles.iter().next() {
            viewport.focus_point = vehicle.translation();
        }
    } else if move_input != Vec3::ZERO {
        // Pan along the ground plane.
        let yaw_rot = Quat::from_rotation_y(viewport.yaw);
        let mut speed = (viewport.distance * 0.5).clamp(2.0, 400.0);
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) { speed *= 3.5; }
        let world_delta = yaw_rot * move_input.normalize();
        viewport.focus_point += world_delta * speed * time.delta_secs();
    }

    let target_rot = viewport.view_rotation();
    let target_pos = viewport.focus_point + target_rot * Vec3::Z * viewport.distance;

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}
