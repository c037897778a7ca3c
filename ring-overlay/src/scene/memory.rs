use std::collections::BTreeMap;

use bevy::prelude::*;

use super::{SceneError, SceneGraph};
use crate::labels::LabelDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// A live object in a [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Node {
        position: Vec3,
        orientation: Quat,
        visible: bool,
    },
    Line {
        parent: NodeId,
        points: Vec<Vec3>,
        colors: Vec<Color>,
        width: f32,
    },
    Label {
        parent: NodeId,
        label: LabelDescriptor,
    },
}

impl SceneObject {
    fn parent(&self) -> Option<NodeId> {
        match self {
            Self::Node { .. } => None,
            Self::Line { parent, .. } | Self::Label { parent, .. } => Some(*parent),
        }
    }
}

/// Scene graph kept entirely in memory.
///
/// Useful for headless hosts and for inspecting exactly what the overlay
/// attached. Creation can be capped with [`MemoryScene::with_capacity_limit`]
/// to exercise failure paths.
#[derive(Debug, Default)]
pub struct MemoryScene {
    next_id: u64,
    objects: BTreeMap<NodeId, SceneObject>,
    capacity: Option<usize>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse creations once `capacity` objects are live.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn lines(&self) -> impl Iterator<Item = (NodeId, &SceneObject)> {
        self.objects
            .iter()
            .filter(|(_, object)| matches!(object, SceneObject::Line { .. }))
            .map(|(id, object)| (*id, object))
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelDescriptor> {
        self.objects.values().filter_map(|object| match object {
            SceneObject::Label { label, .. } => Some(label),
            _ => None,
        })
    }

    /// Position, orientation and visibility of a transform node.
    pub fn node_pose(&self, id: NodeId) -> Option<(Vec3, Quat, bool)> {
        match self.objects.get(&id)? {
            SceneObject::Node {
                position,
                orientation,
                visible,
            } => Some((*position, *orientation, *visible)),
            _ => None,
        }
    }

    fn insert(&mut self, object: SceneObject) -> Result<NodeId, SceneError> {
        if let Some(parent) = object.parent() {
            if !matches!(self.objects.get(&parent), Some(SceneObject::Node { .. })) {
                return Err(SceneError::UnknownParent);
            }
        }
        if self.capacity.is_some_and(|cap| self.objects.len() >= cap) {
            return Err(SceneError::Exhausted);
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        Ok(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<(&mut Vec3, &mut Quat, &mut bool)> {
        match self.objects.get_mut(&id)? {
            SceneObject::Node {
                position,
                orientation,
                visible,
            } => Some((position, orientation, visible)),
            _ => None,
        }
    }

    fn label_mut(&mut self, id: NodeId) -> Option<&mut LabelDescriptor> {
        match self.objects.get_mut(&id)? {
            SceneObject::Label { label, .. } => Some(label),
            _ => None,
        }
    }
}

impl SceneGraph for MemoryScene {
    type Handle = NodeId;

    fn create_node(&mut self) -> Result<NodeId, SceneError> {
        self.insert(SceneObject::Node {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            visible: true,
        })
    }

    fn create_line_strip(
        &mut self,
        parent: NodeId,
        points: &[Vec3],
        colors: &[Color],
        width: f32,
    ) -> Result<NodeId, SceneError> {
        self.insert(SceneObject::Line {
            parent,
            points: points.to_vec(),
            colors: colors.to_vec(),
            width,
        })
    }

    fn create_text_label(
        &mut self,
        parent: NodeId,
        label: &LabelDescriptor,
    ) -> Result<NodeId, SceneError> {
        self.insert(SceneObject::Label {
            parent,
            label: label.clone(),
        })
    }

    fn destroy(&mut self, handle: NodeId) {
        if self.objects.remove(&handle).is_some() {
            self.objects
                .retain(|_, object| object.parent() != Some(handle));
        }
    }

    fn set_node_pose(&mut self, node: NodeId, position: Vec3, orientation: Quat) {
        if let Some((p, o, _)) = self.node_mut(node) {
            *p = position;
            *o = orientation;
        }
    }

    fn set_node_position(&mut self, node: NodeId, position: Vec3) {
        if let Some((p, _, _)) = self.node_mut(node) {
            *p = position;
        }
    }

    fn set_node_visible(&mut self, node: NodeId, visible: bool) {
        if let Some((_, _, v)) = self.node_mut(node) {
            *v = visible;
        }
    }

    fn set_line_width(&mut self, line: NodeId, width: f32) {
        if let Some(SceneObject::Line { width: w, .. }) = self.objects.get_mut(&line) {
            *w = width;
        }
    }

    fn set_label_color(&mut self, label: NodeId, color: Color) {
        if let Some(label) = self.label_mut(label) {
            label.color = color;
        }
    }

    fn set_label_visible(&mut self, label: NodeId, visible: bool) {
        if let Some(label) = self.label_mut(label) {
            label.visible = visible;
        }
    }

    fn set_label_height(&mut self, label: NodeId, height: f32) {
        if let Some(label) = self.label_mut(label) {
            label.character_height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{HorizontalAlign, VerticalAlign};

    fn label() -> LabelDescriptor {
        LabelDescriptor {
            text: "1".into(),
            anchor: Vec3::X,
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Center,
            character_height: 1.0,
            color: Color::WHITE,
            visible: true,
        }
    }

    #[test]
    fn destroying_a_node_releases_its_children() {
        let mut scene = MemoryScene::new();
        let root = scene.create_node().unwrap();
        scene
            .create_line_strip(root, &[Vec3::ZERO, Vec3::X], &[Color::WHITE; 2], 0.1)
            .unwrap();
        scene.create_text_label(root, &label()).unwrap();
        assert_eq!(scene.len(), 3);

        scene.destroy(root);
        assert!(scene.is_empty());
    }

    #[test]
    fn children_need_a_live_parent() {
        let mut scene = MemoryScene::new();
        let root = scene.create_node().unwrap();
        scene.destroy(root);
        assert_eq!(
            scene.create_text_label(root, &label()),
            Err(SceneError::UnknownParent)
        );
    }

    #[test]
    fn capacity_limit_refuses_creation() {
        let mut scene = MemoryScene::with_capacity_limit(1);
        let root = scene.create_node().unwrap();
        assert_eq!(
            scene.create_line_strip(root, &[], &[], 0.0),
            Err(SceneError::Exhausted)
        );
    }

    #[test]
    fn position_update_keeps_orientation() {
        let mut scene = MemoryScene::new();
        let root = scene.create_node().unwrap();
        let turn = Quat::from_rotation_z(1.0);
        scene.set_node_pose(root, Vec3::ONE, turn);
        scene.set_node_position(root, Vec3::ZERO);
        assert_eq!(scene.node_pose(root), Some((Vec3::ZERO, turn, true)));
    }
}
