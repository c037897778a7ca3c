//! Scene graph capability consumed by the overlay.
//!
//! Hosts implement [`SceneGraph`] over their renderer. The crate ships an
//! in-memory implementation for headless use and a Bevy one in
//! [`crate::host`].

pub mod memory;

use bevy::prelude::*;
use thiserror::Error;

use crate::labels::LabelDescriptor;

pub use memory::{MemoryScene, NodeId, SceneObject};

/// Failures a scene graph may report while creating objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Storage the renderer needs is not present.
    #[error("missing scene resource: {0}")]
    MissingResource(&'static str),

    /// The parent handle does not refer to a live node.
    #[error("unknown parent node")]
    UnknownParent,

    /// The renderer refused to allocate another object.
    #[error("scene object limit reached")]
    Exhausted,
}

/// Renderable object creation, mutation and destruction.
///
/// Every object created under a parent must be released with
/// [`SceneGraph::destroy`]. Destroying a node also releases whatever is still
/// attached to it.
pub trait SceneGraph {
    type Handle: Copy + Eq + std::fmt::Debug;

    /// Create an empty transform node at the scene root.
    fn create_node(&mut self) -> Result<Self::Handle, SceneError>;

    /// Create a polyline under `parent` with one colour per point.
    fn create_line_strip(
        &mut self,
        parent: Self::Handle,
        points: &[Vec3],
        colors: &[Color],
        width: f32,
    ) -> Result<Self::Handle, SceneError>;

    /// Create a text label under `parent`.
    fn create_text_label(
        &mut self,
        parent: Self::Handle,
        label: &LabelDescriptor,
    ) -> Result<Self::Handle, SceneError>;

    fn destroy(&mut self, handle: Self::Handle);

    fn set_node_pose(&mut self, node: Self::Handle, position: Vec3, orientation: Quat);

    /// Move `node` without touching its orientation.
    fn set_node_position(&mut self, node: Self::Handle, position: Vec3);

    fn set_node_visible(&mut self, node: Self::Handle, visible: bool);

    fn set_line_width(&mut self, line: Self::Handle, width: f32);

    fn set_label_color(&mut self, label: Self::Handle, color: Color);

    fn set_label_visible(&mut self, label: Self::Handle, visible: bool);

    fn set_label_height(&mut self, label: Self::Handle, height: f32);
}
