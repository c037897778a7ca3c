use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::PresentMode;
use ring_overlay::{DistanceRings, DistanceRingsPlugin};

mod camera;
mod controls;
mod hud;
mod vehicle;

use camera::{ViewportCamera, camera_controller};
use controls::ring_controls_system;
use hud::{FpsText, StatusText, fps_text_update_system, status_text_update_system};
use vehicle::{Vehicle, drive_vehicle, ring_plane_rotation};

fn main() {
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(DistanceRingsPlugin)
        .init_resource::<ViewportCamera>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                drive_vehicle,
                camera_controller,
                ring_controls_system,
                fps_text_update_system,
                status_text_update_system,
            ),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    DefaultPlugins.set(window_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Distance rings".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("=== DISTANCE RING OVERLAY VIEWER ===");

    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
    spawn_ground(&mut commands, &mut meshes, &mut materials);
    spawn_vehicle(&mut commands, &mut meshes, &mut materials);
    commands.spawn((Name::new("distance_rings"), DistanceRings::default()));
    spawn_ui(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-60.0, 120.0, 180.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(600.0, 600.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.12, 0.13, 0.15))),
        Transform::from_xyz(0.0, -0.05, 0.0),
    ));
}

/// The moving `base_link` frame the rings follow, drawn as a small box.
fn spawn_vehicle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Name::new(constants::ring_defaults::DEFAULT_REFERENCE_FRAME),
        Vehicle::default(),
        Mesh3d(meshes.add(Cuboid::new(4.0, 2.0, 1.5))),
        MeshMaterial3d(materials.add(Color::srgb(0.9, 0.55, 0.1))),
        Transform::from_rotation(ring_plane_rotation()),
    ));
}

fn spawn_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
            parent.spawn((
                Text::new(controls::HELP),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
            ));
        });
}
