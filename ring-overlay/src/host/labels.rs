//! Screen-space rendering of world-anchored radius labels.

use bevy::prelude::*;
use constants::render_settings::{LABEL_ANCHOR_PADDING, MAX_LABEL_FONT_PX, MIN_LABEL_FONT_PX};

use super::scene::{RingLabel, RingLabelText};
use crate::labels::{HorizontalAlign, VerticalAlign};

/// Where a label lands on screen and how large its glyphs appear.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    anchor: Vec2,
    font_px: f32,
}

/// Project each label's anchor through the active 3D camera and place its
/// text so the glyph height tracks the label's world-space height.
pub fn project_ring_labels(
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    labels: Query<(&RingLabel, &GlobalTransform, &InheritedVisibility)>,
    mut texts: Query<
        (&mut Node, &mut TextFont, &mut TextColor, &mut Visibility),
        With<RingLabelText>,
    >,
) {
    let camera = cameras.iter().find(|(camera, _)| camera.is_active);

    for (label, transform, inherited) in &labels {
        let Ok((mut node, mut font, mut color, mut visibility)) = texts.get_mut(label.screen_text)
        else {
            continue;
        };

        let placement = camera
            .filter(|_| label.visible && inherited.get())
            .and_then(|(camera, camera_transform)| {
                place(camera, camera_transform, transform.translation(), label.height)
            });
        let Some(placement) = placement else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };

        let width_guess = placement.font_px * 0.6 * label.text.chars().count() as f32;
        let padding = placement.font_px * LABEL_ANCHOR_PADDING;
        let left = match label.horizontal_align {
            HorizontalAlign::Left => placement.anchor.x + padding,
            HorizontalAlign::Center => placement.anchor.x - width_guess * 0.5,
            HorizontalAlign::Right => placement.anchor.x - width_guess - padding,
        };
        let top = match label.vertical_align {
            VerticalAlign::Top => placement.anchor.y,
            VerticalAlign::Center => placement.anchor.y - placement.font_px * 0.5,
            VerticalAlign::Bottom => placement.anchor.y - placement.font_px,
        };

        node.left = Val::Px(left);
        node.top = Val::Px(top);
        if (font.font_size - placement.font_px).abs() > 0.25 {
            font.font_size = placement.font_px;
        }
        if color.0 != label.color {
            color.0 = label.color;
        }
        visibility.set_if_neq(Visibility::Inherited);
    }
}

/// Screen anchor and glyph size for a label of world `height` at `anchor`.
///
/// `None` when the anchor is off screen or the text would be too small to read.
fn place(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    anchor: Vec3,
    height: f32,
) -> Option<Placement> {
    let base = camera.world_to_viewport(camera_transform, anchor).ok()?;
    let top = camera
        .world_to_viewport(camera_transform, anchor + *camera_transform.up() * height)
        .ok()?;

    let font_px = base.distance(top);
    if !font_px.is_finite() || font_px < MIN_LABEL_FONT_PX {
        return None;
    }
    Some(Placement {
        anchor: base,
        font_px: font_px.min(MAX_LABEL_FONT_PX),
    })
}
