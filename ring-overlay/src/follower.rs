//! Per-tick re-anchoring of the overlay root to its reference frame.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::scene::SceneGraph;
use crate::status::{StatusCategory, StatusReport, StatusSink};
use crate::synchronizer::SceneSynchronizer;

/// Point in time a pose is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTime {
    /// Most recent pose the resolver knows, without waiting.
    Latest,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseResult {
    Resolved { position: Vec3, orientation: Quat },
    Unavailable,
}

/// Resolves named frames to poses in the scene's fixed frame.
///
/// Lookups return immediately: a cached pose or `Unavailable`.
pub trait TransformResolver {
    fn lookup(&self, frame_id: &str, time: LookupTime) -> PoseResult;
}

/// Fixed table of frame poses.
#[derive(Debug, Clone, Default)]
pub struct StaticFrames {
    frames: HashMap<String, (Vec3, Quat)>,
}

impl StaticFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, frame_id: impl Into<String>, position: Vec3, orientation: Quat) {
        self.frames.insert(frame_id.into(), (position, orientation));
    }

    pub fn contains(&self, frame_id: &str) -> bool {
        self.frames.contains_key(frame_id)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TransformResolver for StaticFrames {
    fn lookup(&self, frame_id: &str, _time: LookupTime) -> PoseResult {
        match self.frames.get(frame_id) {
            Some(&(position, orientation)) => PoseResult::Resolved {
                position,
                orientation,
            },
            None => PoseResult::Unavailable,
        }
    }
}

/// Polls the reference frame pose every tick and moves the overlay root.
///
/// There is no retry or backoff: each tick's lookup stands alone.
#[derive(Debug, Default)]
pub struct FrameFollower {
    available: Option<bool>,
}

impl FrameFollower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last tick resolved the frame. `None` before the first tick.
    pub fn is_available(&self) -> Option<bool> {
        self.available
    }

    pub fn tick<S, R, K>(
        &mut self,
        frame: &str,
        resolver: &R,
        scene: &mut S,
        sync: &mut SceneSynchronizer<S::Handle>,
        sink: &mut K,
    ) -> PoseResult
    where
        S: SceneGraph,
        R: TransformResolver + ?Sized,
        K: StatusSink + ?Sized,
    {
        let pose = resolver.lookup(frame, LookupTime::Latest);
        match pose {
            PoseResult::Resolved {
                position,
                orientation,
            } => {
                sync.set_root_pose(scene, position, orientation);
                sink.report(StatusReport::ok(StatusCategory::Transform));
                if self.available != Some(true) {
                    debug!("Reference frame '{}' resolved", frame);
                }
                self.available = Some(true);
            }
            PoseResult::Unavailable => {
                sync.reset_root_position(scene);
                sink.report(StatusReport::warn(
                    StatusCategory::Transform,
                    format!("transform not available for reference frame '{frame}'"),
                ));
                if self.available != Some(false) {
                    debug!("Reference frame '{}' unavailable", frame);
                }
                self.available = Some(false);
            }
        }
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;
    use crate::status::{StatusLevel, StatusReport};

    #[test]
    fn missing_frame_resets_position_and_warns() {
        let mut scene = MemoryScene::new();
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();
        let root = sync.root().unwrap();
        let turn = Quat::from_rotation_z(0.5);
        sync.set_root_pose(&mut scene, Vec3::new(1.0, 2.0, 3.0), turn);

        let mut follower = FrameFollower::new();
        let mut sink: Vec<StatusReport> = Vec::new();
        let pose = follower.tick("odom", &StaticFrames::new(), &mut scene, &mut sync, &mut sink);

        assert_eq!(pose, PoseResult::Unavailable);
        assert_eq!(scene.node_pose(root), Some((Vec3::ZERO, turn, true)));
        assert_eq!(sink[0].category, StatusCategory::Transform);
        assert_eq!(sink[0].level, StatusLevel::Warn);
        assert!(sink[0].message.contains("transform not available"));
        assert_eq!(follower.is_available(), Some(false));
    }

    #[test]
    fn recovered_frame_moves_root_to_pose() {
        let mut scene = MemoryScene::new();
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();
        let root = sync.root().unwrap();
        let mut follower = FrameFollower::new();
        let mut sink: Vec<StatusReport> = Vec::new();
        let mut frames = StaticFrames::new();

        follower.tick("base_link", &frames, &mut scene, &mut sync, &mut sink);

        let turn = Quat::from_rotation_z(1.2);
        frames.insert("base_link", Vec3::new(4.0, -1.0, 0.5), turn);
        follower.tick("base_link", &frames, &mut scene, &mut sync, &mut sink);

        assert_eq!(
            scene.node_pose(root),
            Some((Vec3::new(4.0, -1.0, 0.5), turn, true))
        );
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1], StatusReport::ok(StatusCategory::Transform));
    }

    #[test]
    fn every_tick_reports() {
        let mut scene = MemoryScene::new();
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();
        let mut follower = FrameFollower::new();
        let mut sink: Vec<StatusReport> = Vec::new();
        let mut frames = StaticFrames::new();
        frames.insert("map", Vec3::ZERO, Quat::IDENTITY);

        for _ in 0..3 {
            follower.tick("map", &frames, &mut scene, &mut sync, &mut sink);
        }
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn torn_down_root_is_left_alone() {
        let mut scene = MemoryScene::new();
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();
        sync.teardown(&mut scene);

        let mut frames = StaticFrames::new();
        frames.insert("map", Vec3::ONE, Quat::IDENTITY);
        let mut sink: Vec<StatusReport> = Vec::new();
        FrameFollower::new().tick("map", &frames, &mut scene, &mut sync, &mut sink);
        assert!(scene.is_empty());
    }
}
