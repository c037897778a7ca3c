use bevy::prelude::*;

use super::scene::OverlayRoot;
use crate::follower::{LookupTime, PoseResult, StaticFrames, TransformResolver};

/// Reference frames taken from named entities.
///
/// Poses come from the last transform propagation, so a frame moved during
/// `Update` is seen one frame late. When several entities share a name the
/// first one queried wins.
#[derive(Debug, Clone, Default)]
pub struct NamedFrames {
    frames: StaticFrames,
}

impl NamedFrames {
    /// Snapshot every named entity's global pose.
    pub fn capture(world: &mut World) -> Self {
        let mut query =
            world.query_filtered::<(&Name, &GlobalTransform), Without<OverlayRoot>>();
        let mut frames = StaticFrames::new();
        for (name, transform) in query.iter(world) {
            if frames.contains(name.as_str()) {
                continue;
            }
            let (_, rotation, translation) = transform.to_scale_rotation_translation();
            frames.insert(name.as_str(), translation, rotation);
        }
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TransformResolver for NamedFrames {
    fn lookup(&self, frame_id: &str, time: LookupTime) -> PoseResult {
        self.frames.lookup(frame_id, time)
    }
}
