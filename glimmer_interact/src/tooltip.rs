// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::HashMap;

use glimmer_data::{JoinedEntity, Key};
use kurbo::Point;

/// The single tooltip of one visualization instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipState {
    /// Whether the tooltip is shown.
    pub visible: bool,
    /// Text content; lines are separated by `\n`.
    pub content: String,
    /// Surface-space position, pointer plus offset.
    pub anchor: Point,
    /// Element the content was derived from.
    pub source: Option<Key>,
}

/// What a pointer event did to the tooltip.
#[derive(Clone, Debug, PartialEq)]
pub enum TooltipChange {
    /// No visible difference.
    Unchanged,
    /// Became visible.
    Shown,
    /// Same content, new anchor.
    Moved,
    /// Content switched to another element without hiding in between.
    Replaced,
    /// Became hidden.
    Hidden,
}

impl TooltipChange {
    /// True if visibility flipped, which callers usually animate.
    pub fn toggles_visibility(&self) -> bool {
        matches!(self, Self::Shown | Self::Hidden)
    }
}

/// Turns a hovered entity into tooltip text.
pub trait TooltipFormat {
    /// Tooltip text for `entity`.
    fn format(&self, entity: &JoinedEntity) -> String;
}

impl<F> TooltipFormat for F
where
    F: Fn(&JoinedEntity) -> String,
{
    fn format(&self, entity: &JoinedEntity) -> String {
        self(entity)
    }
}

/// Joined entities addressable by key.
pub trait EntityLookup {
    /// Entity drawn by the element `key`.
    fn entity(&self, key: &Key) -> Option<&JoinedEntity>;
}

impl EntityLookup for HashMap<Key, JoinedEntity> {
    fn entity(&self, key: &Key) -> Option<&JoinedEntity> {
        self.get(key)
    }
}

impl EntityLookup for [JoinedEntity] {
    fn entity(&self, key: &Key) -> Option<&JoinedEntity> {
        self.iter().find(|e| &e.key == key)
    }
}

impl EntityLookup for Vec<JoinedEntity> {
    fn entity(&self, key: &Key) -> Option<&JoinedEntity> {
        self.as_slice().entity(key)
    }
}

/// Entities in draw order with a key index for hover lookups.
///
/// When keys repeat, the first entity with a key is the one found.
#[derive(Clone, Debug, Default)]
pub struct EntityIndex {
    entities: Vec<JoinedEntity>,
    by_key: HashMap<Key, usize>,
}

impl EntityIndex {
    /// Index `entities`.
    pub fn new(entities: Vec<JoinedEntity>) -> Self {
        let mut by_key = HashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            by_key.entry(entity.key.clone()).or_insert(i);
        }
        Self { entities, by_key }
    }

    /// Entities in their original order.
    pub fn as_slice(&self) -> &[JoinedEntity] {
        &self.entities
    }

    /// True if some entity has `key`.
    pub fn contains(&self, key: &Key) -> bool {
        self.by_key.contains_key(key)
    }

    /// Number of entities, duplicates included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if there are no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.by_key.clear();
    }
}

impl EntityLookup for EntityIndex {
    fn entity(&self, key: &Key) -> Option<&JoinedEntity> {
        self.by_key.get(key).and_then(|&i| self.entities.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_finds_the_first_entity_per_key() {
        let index = EntityIndex::new(vec![
            JoinedEntity::new("a", 1.0),
            JoinedEntity::new("b", 2.0),
            JoinedEntity::new("a", 3.0),
        ]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.entity(&Key::from("a")).map(|e| e.value), Some(1.0));
        assert_eq!(index.entity(&Key::from("b")).map(|e| e.value), Some(2.0));
        assert!(index.entity(&Key::from("c")).is_none());
        assert!(index.contains(&Key::from("b")));
    }

    #[test]
    fn cleared_index_finds_nothing() {
        let mut index = EntityIndex::new(vec![JoinedEntity::new("a", 1.0)]);
        index.clear();
        assert!(index.is_empty());
        assert!(index.entity(&Key::from("a")).is_none());
    }
}
