//! Exclusive owner of the overlay's scene objects.

use bevy::prelude::*;

use crate::error::Result;
use crate::geometry::RingDescriptor;
use crate::labels::LabelDescriptor;
use crate::scene::SceneGraph;

/// Owns the overlay root node and every ring and label attached to it.
///
/// Nothing else creates or destroys overlay objects. Rebuilds always release
/// the previous objects before creating replacements.
#[derive(Debug)]
pub struct SceneSynchronizer<H> {
    root: Option<H>,
    rings: Vec<H>,
    labels: Vec<H>,
}

impl<H: Copy + Eq + std::fmt::Debug> SceneSynchronizer<H> {
    /// Create the overlay root node.
    pub fn attach<S: SceneGraph<Handle = H>>(scene: &mut S) -> Result<Self> {
        let root = scene.create_node()?;
        Ok(Self {
            root: Some(root),
            rings: Vec::new(),
            labels: Vec::new(),
        })
    }

    /// Root node, `None` once torn down.
    pub fn root(&self) -> Option<H> {
        self.root
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty() && self.labels.is_empty()
    }

    /// Replace every ring and label with new objects.
    ///
    /// If any creation fails, the objects created so far are released and the
    /// overlay is left empty.
    pub fn rebuild<S: SceneGraph<Handle = H>>(
        &mut self,
        scene: &mut S,
        rings: &[RingDescriptor],
        labels: &[LabelDescriptor],
        line_width: f32,
    ) -> Result<()> {
        self.clear(scene);
        let Some(root) = self.root else {
            return Ok(());
        };

        let mut staged = Staged::new(scene);
        for ring in rings {
            let line = staged
                .scene
                .create_line_strip(root, &ring.points, &ring.colors, line_width)?;
            staged.rings.push(line);
        }
        for label in labels {
            let text = staged.scene.create_text_label(root, label)?;
            staged.labels.push(text);
        }
        (self.rings, self.labels) = staged.commit();

        debug!(
            "Ring overlay rebuilt: {} rings, {} labels",
            self.rings.len(),
            self.labels.len()
        );
        Ok(())
    }

    /// Release every ring and label, keeping the root.
    pub fn clear<S: SceneGraph<Handle = H>>(&mut self, scene: &mut S) {
        for handle in self.rings.drain(..).chain(self.labels.drain(..)) {
            scene.destroy(handle);
        }
    }

    /// Update line width on rings and colour on labels in place.
    pub fn apply_style<S: SceneGraph<Handle = H>>(
        &mut self,
        scene: &mut S,
        color: Color,
        line_width: f32,
    ) {
        for &ring in &self.rings {
            scene.set_line_width(ring, line_width);
        }
        for &label in &self.labels {
            scene.set_label_color(label, color);
        }
    }

    pub fn set_labels_visible<S: SceneGraph<Handle = H>>(&mut self, scene: &mut S, visible: bool) {
        for &label in &self.labels {
            scene.set_label_visible(label, visible);
        }
    }

    pub fn set_label_height<S: SceneGraph<Handle = H>>(&mut self, scene: &mut S, height: f32) {
        for &label in &self.labels {
            scene.set_label_height(label, height);
        }
    }

    pub fn set_visible<S: SceneGraph<Handle = H>>(&mut self, scene: &mut S, visible: bool) {
        if let Some(root) = self.root {
            scene.set_node_visible(root, visible);
        }
    }

    pub fn set_root_pose<S: SceneGraph<Handle = H>>(
        &mut self,
        scene: &mut S,
        position: Vec3,
        orientation: Quat,
    ) {
        if let Some(root) = self.root {
            scene.set_node_pose(root, position, orientation);
        }
    }

    /// Move the root back to the origin, leaving its orientation alone.
    pub fn reset_root_position<S: SceneGraph<Handle = H>>(&mut self, scene: &mut S) {
        if let Some(root) = self.root {
            scene.set_node_position(root, Vec3::ZERO);
        }
    }

    /// Release all owned objects and the root. Safe to repeat.
    pub fn teardown<S: SceneGraph<Handle = H>>(&mut self, scene: &mut S) {
        self.clear(scene);
        if let Some(root) = self.root.take() {
            scene.destroy(root);
            debug!("Ring overlay root released");
        }
    }
}

/// Objects created during one rebuild, released on drop unless committed.
struct Staged<'s, S: SceneGraph> {
    scene: &'s mut S,
    rings: Vec<S::Handle>,
    labels: Vec<S::Handle>,
}

impl<'s, S: SceneGraph> Staged<'s, S> {
    fn new(scene: &'s mut S) -> Self {
        Self {
            scene,
            rings: Vec::new(),
            labels: Vec::new(),
        }
    }

    fn commit(mut self) -> (Vec<S::Handle>, Vec<S::Handle>) {
        (
            std::mem::take(&mut self.rings),
            std::mem::take(&mut self.labels),
        )
    }
}

impl<S: SceneGraph> Drop for Staged<'_, S> {
    fn drop(&mut self) {
        for handle in self.labels.drain(..).rev().chain(self.rings.drain(..).rev()) {
            self.scene.destroy(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RingConfig;
    use crate::geometry::generate;
    use crate::labels::format_labels;
    use crate::scene::{MemoryScene, SceneError, SceneObject};
    use crate::error::OverlayError;

    fn descriptors(max_radius: f32) -> (Vec<RingDescriptor>, Vec<LabelDescriptor>) {
        let config = RingConfig {
            max_radius,
            spacing: 1.0,
            resolution: 8,
            ..RingConfig::default()
        };
        let rings = generate(&config).unwrap();
        let labels = format_labels(&rings, &config);
        (rings, labels)
    }

    #[test]
    fn rebuild_replaces_previous_objects() {
        let mut scene = MemoryScene::new();
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();

        let (rings, labels) = descriptors(5.0);
        sync.rebuild(&mut scene, &rings, &labels, 0.1).unwrap();
        assert_eq!(sync.ring_count(), 5);
        assert_eq!(scene.len(), 11);

        let (rings, labels) = descriptors(2.0);
        sync.rebuild(&mut scene, &rings, &labels, 0.1).unwrap();
        assert_eq!(sync.ring_count(), 2);
        assert_eq!(sync.label_count(), 2);
        assert_eq!(scene.len(), 5);
    }

    #[test]
    fn failed_rebuild_leaves_nothing_behind() {
        // Root plus five objects fit; the sixth creation fails.
        let mut scene = MemoryScene::with_capacity_limit(6);
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();

        let (rings, labels) = descriptors(5.0);
        let result = sync.rebuild(&mut scene, &rings, &labels, 0.1);
        assert_eq!(result, Err(OverlayError::Scene(SceneError::Exhausted)));
        assert!(sync.is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn in_place_updates_touch_existing_objects() {
        let mut scene = MemoryScene::new();
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();
        let (rings, labels) = descriptors(3.0);
        sync.rebuild(&mut scene, &rings, &labels, 0.1).unwrap();
        let before: Vec<_> = scene.lines().map(|(id, _)| id).collect();

        sync.apply_style(&mut scene, Color::BLACK, 0.5);
        sync.set_labels_visible(&mut scene, false);
        sync.set_label_height(&mut scene, 2.0);

        let after: Vec<_> = scene.lines().map(|(id, _)| id).collect();
        assert_eq!(before, after);
        assert!(scene.lines().all(|(_, line)| matches!(
            line,
            SceneObject::Line { width, .. } if (*width - 0.5).abs() < 1e-6
        )));
        assert!(scene.labels().all(|label| {
            !label.visible && label.color == Color::BLACK && label.character_height == 2.0
        }));
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut scene = MemoryScene::new();
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();
        let (rings, labels) = descriptors(4.0);
        sync.rebuild(&mut scene, &rings, &labels, 0.1).unwrap();

        sync.teardown(&mut scene);
        assert!(sync.is_empty());
        assert!(scene.is_empty());
        assert_eq!(sync.root(), None);

        sync.teardown(&mut scene);
        assert!(sync.is_empty());
        assert!(scene.is_empty());
    }

    #[test]
    fn rebuild_after_teardown_creates_nothing() {
        let mut scene = MemoryScene::new();
        let mut sync = SceneSynchronizer::attach(&mut scene).unwrap();
        sync.teardown(&mut scene);

        let (rings, labels) = descriptors(4.0);
        sync.rebuild(&mut scene, &rings, &labels, 0.1).unwrap();
        assert!(scene.is_empty());
    }
}
