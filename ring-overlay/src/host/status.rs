use std::collections::HashMap;

use bevy::prelude::*;

use crate::status::StatusBoard;

/// Health of every hosted overlay, keyed by the entity carrying its settings.
#[derive(Resource, Debug, Default)]
pub struct OverlayStatus {
    boards: HashMap<Entity, StatusBoard>,
}

impl OverlayStatus {
    pub fn get(&self, entity: Entity) -> Option<&StatusBoard> {
        self.boards.get(&entity)
    }

    pub fn board_mut(&mut self, entity: Entity) -> &mut StatusBoard {
        self.boards.entry(entity).or_default()
    }

    pub fn remove(&mut self, entity: Entity) {
        self.boards.remove(&entity);
    }
}
