//! Scene graph implementation over a Bevy `World`.

use bevy::render::render_asset::RenderAssetUsages;
use bevy::color::ColorToComponents;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::render_settings::HAIRLINE_WIDTH;

use crate::labels::{HorizontalAlign, LabelDescriptor, VerticalAlign};
use crate::scene::{SceneError, SceneGraph};

/// Marker for an overlay's root node.
#[derive(Component)]
pub struct OverlayRoot;

/// Ring centreline kept alongside its ribbon mesh so width changes can
/// re-extrude it.
#[derive(Component, Debug, Clone)]
pub struct RingLine {
    pub points: Vec<Vec3>,
    pub colors: Vec<Color>,
    pub width: f32,
}

/// World-anchored radius label. Drawn through its linked screen-space text.
#[derive(Component, Debug, Clone)]
pub struct RingLabel {
    pub text: String,
    pub height: f32,
    pub color: Color,
    pub visible: bool,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub screen_text: Entity,
}

/// Marker for the UI text entity that renders a [`RingLabel`].
#[derive(Component)]
pub struct RingLabelText;

/// Short-lived scene access handed to the overlay by exclusive systems.
pub struct BevyScene<'w> {
    world: &'w mut World,
}

impl<'w> BevyScene<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn require_parent(&self, parent: Entity) -> Result<(), SceneError> {
        match self.world.get::<OverlayRoot>(parent) {
            Some(_) => Ok(()),
            None => Err(SceneError::UnknownParent),
        }
    }

    fn add_mesh(&mut self, mesh: Mesh) -> Result<Handle<Mesh>, SceneError> {
        let mut meshes = self
            .world
            .get_resource_mut::<Assets<Mesh>>()
            .ok_or(SceneError::MissingResource("Assets<Mesh>"))?;
        Ok(meshes.add(mesh))
    }
}

impl SceneGraph for BevyScene<'_> {
    type Handle = Entity;

    fn create_node(&mut self) -> Result<Entity, SceneError> {
        Ok(self
            .world
            .spawn((OverlayRoot, Transform::IDENTITY, Visibility::Inherited))
            .id())
    }

    fn create_line_strip(
        &mut self,
        parent: Entity,
        points: &[Vec3],
        colors: &[Color],
        width: f32,
    ) -> Result<Entity, SceneError> {
        self.require_parent(parent)?;
        if !self.world.contains_resource::<Assets<StandardMaterial>>() {
            return Err(SceneError::MissingResource("Assets<StandardMaterial>"));
        }

        let mesh = self.add_mesh(ribbon_mesh(points, colors, width))?;
        let material = self
            .world
            .get_resource_mut::<Assets<StandardMaterial>>()
            .ok_or(SceneError::MissingResource("Assets<StandardMaterial>"))?
            .add(StandardMaterial {
                base_color: Color::WHITE,
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                cull_mode: None,
                ..default()
            });

        Ok(self
            .world
            .spawn((
                RingLine {
                    points: points.to_vec(),
                    colors: colors.to_vec(),
                    width,
                },
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::IDENTITY,
                Visibility::Inherited,
                ChildOf(parent),
            ))
            .id())
    }

    fn create_text_label(
        &mut self,
        parent: Entity,
        label: &LabelDescriptor,
    ) -> Result<Entity, SceneError> {
        self.require_parent(parent)?;

        let screen_text = self
            .world
            .spawn((
                Text::new(label.text.clone()),
                TextFont::default(),
                TextColor(label.color),
                Node {
                    position_type: PositionType::Absolute,
                    ..default()
                },
                Visibility::Hidden,
                RingLabelText,
            ))
            .id();

        Ok(self
            .world
            .spawn((
                RingLabel {
                    text: label.text.clone(),
                    height: label.character_height,
                    color: label.color,
                    visible: label.visible,
                    horizontal_align: label.horizontal_align,
                    vertical_align: label.vertical_align,
                    screen_text,
                },
                Transform::from_translation(label.anchor),
                visibility(label.visible),
                ChildOf(parent),
            ))
            .id())
    }

    fn destroy(&mut self, handle: Entity) {
        if let Some(label) = self.world.get::<RingLabel>(handle) {
            let screen_text = label.screen_text;
            if self.world.get_entity(screen_text).is_ok() {
                self.world.despawn(screen_text);
            }
        }
        if self.world.get_entity(handle).is_ok() {
            self.world.despawn(handle);
        }
    }

    fn set_node_pose(&mut self, node: Entity, position: Vec3, orientation: Quat) {
        if let Some(mut transform) = self.world.get_mut::<Transform>(node) {
            transform.translation = position;
            transform.rotation = orientation;
        }
    }

    fn set_node_position(&mut self, node: Entity, position: Vec3) {
        if let Some(mut transform) = self.world.get_mut::<Transform>(node) {
            transform.translation = position;
        }
    }

    fn set_node_visible(&mut self, node: Entity, visible: bool) {
        if let Some(mut current) = self.world.get_mut::<Visibility>(node) {
            current.set_if_neq(visibility(visible));
        }
    }

    fn set_line_width(&mut self, line: Entity, width: f32) {
        let mesh = match self.world.get_mut::<RingLine>(line) {
            Some(mut ring) => {
                ring.width = width;
                ribbon_mesh(&ring.points, &ring.colors, width)
            }
            None => return,
        };
        // Ribbon meshes live in the render world only, so swap in a new asset.
        let Ok(mesh) = self.add_mesh(mesh) else {
            return;
        };
        if let Ok(mut entity) = self.world.get_entity_mut(line) {
            entity.insert(Mesh3d(mesh));
        }
    }

    fn set_label_color(&mut self, label: Entity, color: Color) {
        if let Some(mut ring_label) = self.world.get_mut::<RingLabel>(label) {
            ring_label.color = color;
        }
    }

    fn set_label_visible(&mut self, label: Entity, visible: bool) {
        if let Some(mut ring_label) = self.world.get_mut::<RingLabel>(label) {
            ring_label.visible = visible;
        }
        self.set_node_visible(label, visible);
    }

    fn set_label_height(&mut self, label: Entity, height: f32) {
        if let Some(mut ring_label) = self.world.get_mut::<RingLabel>(label) {
            ring_label.height = height;
        }
    }
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Extrude a polyline into a flat ribbon of `width` in its XY plane.
pub fn ribbon_mesh(points: &[Vec3], colors: &[Color], width: f32) -> Mesh {
    let half_width = if width > 0.0 { width } else { HAIRLINE_WIDTH } * 0.5;

    let mut positions = Vec::with_capacity(points.len() * 2);
    let mut normals = Vec::with_capacity(points.len() * 2);
    let mut vertex_colors = Vec::with_capacity(points.len() * 2);

    for (i, point) in points.iter().enumerate() {
        let side = Vec3::Z.cross(tangent_at(points, i)).normalize_or_zero() * half_width;
        let color = colors
            .get(i)
            .copied()
            .unwrap_or(Color::WHITE)
            .to_linear()
            .to_f32_array();

        positions.push((*point - side).to_array());
        positions.push((*point + side).to_array());
        normals.extend([[0.0, 0.0, 1.0]; 2]);
        vertex_colors.extend([color; 2]);
    }

    // Two triangles per segment
    let segments = points.len().saturating_sub(1) as u32;
    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let a = i * 2;
        indices.extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Direction of travel at point `i`, wrapping around closed loops.
fn tangent_at(points: &[Vec3], i: usize) -> Vec3 {
    let n = points.len();
    if n < 2 {
        return Vec3::X;
    }
    let closed = n > 2 && points[0].distance_squared(points[n - 1]) < 1e-12;

    let prev = match i {
        0 if closed => points[n - 2],
        0 => points[0],
        _ => points[i - 1],
    };
    let next = match i {
        _ if i + 1 < n => points[i + 1],
        _ if closed => points[1],
        _ => points[i],
    };
    (next - prev).normalize_or_zero()
}
