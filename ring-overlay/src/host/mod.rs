//! Bevy integration: a component per overlay and the systems that drive it.
//!
//! Spawn [`DistanceRings`] on any entity to get an overlay. Mutating the
//! component becomes a field-by-field edit, removing it tears the overlay
//! down. Reference frames are resolved from entity [`Name`]s.

pub mod frames;
pub mod labels;
pub mod scene;
pub mod status;

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use bevy::transform::TransformSystem;

pub use frames::NamedFrames;
pub use labels::project_ring_labels;
pub use scene::{BevyScene, OverlayRoot, RingLabel, RingLabelText, RingLine, ribbon_mesh};
pub use status::OverlayStatus;

use crate::config::{ConfigEdit, ConfigField, RingConfig};
use crate::overlay::RingOverlay;
use crate::status::StatusBoard;

pub struct DistanceRingsPlugin;

impl Plugin for DistanceRingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RingOverlays>()
            .init_resource::<OverlayStatus>()
            .add_systems(
                Update,
                (sync_ring_settings, follow_reference_frames).chain(),
            )
            .add_systems(
                PostUpdate,
                project_ring_labels.after(TransformSystem::TransformPropagate),
            );
    }
}

/// Requested settings of one overlay.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct DistanceRings {
    pub config: RingConfig,
    /// Hidden overlays skip frame following and show nothing.
    pub enabled: bool,
}

impl Default for DistanceRings {
    fn default() -> Self {
        Self {
            config: RingConfig::default(),
            enabled: true,
        }
    }
}

impl DistanceRings {
    /// Field edits that turn `previous` into `self`, in field order.
    pub fn edits_since(&self, previous: &DistanceRings) -> Vec<ConfigEdit> {
        ConfigField::ALL
            .into_iter()
            .filter_map(|field| {
                let value = self.config.get(field);
                (value != previous.config.get(field)).then(|| ConfigEdit::new(field, value))
            })
            .collect()
    }
}

/// Overlays built for each entity carrying [`DistanceRings`].
#[derive(Resource, Default)]
pub struct RingOverlays {
    hosted: HashMap<Entity, HostedOverlay>,
    /// Settings whose overlay could not be built. Retried once they change.
    failed: HashMap<Entity, DistanceRings>,
}

impl RingOverlays {
    pub fn get(&self, entity: Entity) -> Option<&RingOverlay<Entity>> {
        self.hosted.get(&entity).map(|hosted| &hosted.overlay)
    }

    pub fn len(&self) -> usize {
        self.hosted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosted.is_empty()
    }
}

struct HostedOverlay {
    overlay: RingOverlay<Entity>,
    /// Settings last pushed into `overlay`, edits are computed against these.
    seen: DistanceRings,
}

impl HostedOverlay {
    fn apply(&mut self, scene: &mut BevyScene<'_>, board: &mut StatusBoard, settings: DistanceRings) {
        if settings == self.seen {
            return;
        }

        for edit in settings.edits_since(&self.seen) {
            let field = edit.field;
            // Refusals are already reported on the status board.
            if let Err(err) = self.overlay.apply_edit(scene, board, edit) {
                debug!("Edit to '{}' not applied: {}", field, err);
            }
        }
        if settings.enabled != self.seen.enabled {
            if let Err(err) = self.overlay.set_enabled(scene, board, settings.enabled) {
                error!("Failed to rebuild ring overlay on enable: {}", err);
            }
        }
        self.seen = settings;
    }
}

/// Create, edit and tear down overlays to match their [`DistanceRings`].
pub fn sync_ring_settings(world: &mut World) {
    let mut query = world.query::<(Entity, &DistanceRings)>();
    let requested: Vec<(Entity, DistanceRings)> = query
        .iter(world)
        .map(|(entity, settings)| (entity, settings.clone()))
        .collect();
    let live: HashSet<Entity> = requested.iter().map(|(entity, _)| *entity).collect();

    world.resource_scope(|world, mut overlays: Mut<RingOverlays>| {
        world.resource_scope(|world, mut status: Mut<OverlayStatus>| {
            let stale: Vec<Entity> = overlays
                .hosted
                .keys()
                .chain(overlays.failed.keys())
                .filter(|entity| !live.contains(entity))
                .copied()
                .collect();
            for entity in stale {
                overlays.failed.remove(&entity);
                status.remove(entity);
                if let Some(mut hosted) = overlays.hosted.remove(&entity) {
                    hosted.overlay.teardown(&mut BevyScene::new(world));
                    info!("Distance rings on {} torn down", entity);
                }
            }

            for (entity, settings) in requested {
                let board = status.board_mut(entity);
                let mut scene = BevyScene::new(world);

                if let Some(hosted) = overlays.hosted.get_mut(&entity) {
                    hosted.apply(&mut scene, board, settings);
                    continue;
                }

                if overlays.failed.get(&entity) == Some(&settings) {
                    continue;
                }
                match RingOverlay::initialize(&mut scene, board, settings.config.clone()) {
                    Ok(overlay) => {
                        let mut hosted = HostedOverlay {
                            overlay,
                            seen: DistanceRings {
                                config: settings.config.clone(),
                                enabled: true,
                            },
                        };
                        hosted.apply(&mut scene, board, settings);
                        overlays.failed.remove(&entity);
                        overlays.hosted.insert(entity, hosted);
                    }
                    Err(err) => {
                        error!("Failed to create distance rings on {}: {}", entity, err);
                        overlays.failed.insert(entity, settings);
                    }
                }
            }
        });
    });
}

/// Move every enabled overlay to the latest pose of its reference frame.
pub fn follow_reference_frames(world: &mut World) {
    let frames = NamedFrames::capture(world);

    world.resource_scope(|world, mut overlays: Mut<RingOverlays>| {
        world.resource_scope(|world, mut status: Mut<OverlayStatus>| {
            let mut scene = BevyScene::new(world);
            for (entity, hosted) in overlays.hosted.iter_mut() {
                hosted
                    .overlay
                    .tick(&mut scene, &frames, status.board_mut(*entity));
            }
        });
    });
}
