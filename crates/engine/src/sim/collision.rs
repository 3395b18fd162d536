use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::EntityId;
use super::geometry::Rect;

/// Depth bands on either side of an entity that count as vertically adjacent.
pub const VERTICAL_BAND_LAYERS: i32 = 5;

/// Selects which predicate the player controller applies against an entity.
/// The numeric values are part of the level format and stay fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CollisionTier {
    /// Scenery the player never tests against.
    #[default]
    None = 0,
    /// Wall-like: same depth layer, full-width boxes.
    Coarse = 1,
    /// Object-like: half-width boxes plus the vertical depth band.
    Fine = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("collision tier must be 0, 1 or 2, got {0}")]
pub struct InvalidCollisionTier(pub u8);

impl TryFrom<u8> for CollisionTier {
    type Error = InvalidCollisionTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CollisionTier::None),
            1 => Ok(CollisionTier::Coarse),
            2 => Ok(CollisionTier::Fine),
            other => Err(InvalidCollisionTier(other)),
        }
    }
}

impl From<CollisionTier> for u8 {
    fn from(tier: CollisionTier) -> u8 {
        tier as u8
    }
}

/// Everything a collision predicate reads from one entity, captured by value.
///
/// Every predicate is directional: `a.predicate(&b)` gates on `b.collidable`
/// and compares `b`'s depth against `a`'s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    pub depth: i32,
    pub collidable: bool,
    pub bounds: Rect,
    pub half_bounds: Rect,
}

impl Collider {
    pub fn same_layer(&self, other: &Collider) -> bool {
        self.depth == other.depth
    }

    pub fn collides_horizontally(&self, other: &Collider) -> bool {
        self.same_layer(other) && other.collidable && self.bounds.intersects(&other.bounds)
    }

    pub fn collides_half_horizontally(&self, other: &Collider) -> bool {
        self.same_layer(other)
            && other.collidable
            && self.half_bounds.intersects(&other.half_bounds)
    }

    /// `other` sits in one of the four layers behind (above on screen) `self`.
    pub fn collides_with_below(&self, other: &Collider) -> bool {
        other.depth < self.depth
            && other.depth + VERTICAL_BAND_LAYERS > self.depth
            && other.collidable
            && self.half_bounds.intersects(&other.half_bounds)
    }

    /// `other` sits in one of the four layers in front of `self`.
    pub fn collides_with_above(&self, other: &Collider) -> bool {
        other.depth > self.depth
            && other.depth - VERTICAL_BAND_LAYERS < self.depth
            && other.collidable
            && self.half_bounds.intersects(&other.half_bounds)
    }

    pub fn collides(&self, other: &Collider) -> bool {
        let banded = self.collides_with_above(other) || self.collides_with_below(other);
        if self.collides_horizontally(other) {
            banded || self.collides_half_horizontally(other)
        } else {
            banded
        }
    }

    /// Plain full-box overlap with no layer or collidability gate.
    pub fn is_within_bounds(&self, other: &Collider) -> bool {
        self.bounds.intersects(&other.bounds)
    }
}

#[derive(Debug, Clone)]
pub struct IndexedCollider {
    pub id: EntityId,
    pub name: Arc<str>,
    pub collider: Collider,
}

/// Collidable entities partitioned by tier, rebuilt once per tick.
#[derive(Debug, Default, Clone)]
pub struct CollisionIndex {
    coarse: Vec<IndexedCollider>,
    fine: Vec<IndexedCollider>,
}

impl CollisionIndex {
    pub fn clear(&mut self) {
        self.coarse.clear();
        self.fine.clear();
    }

    pub fn insert(&mut self, tier: CollisionTier, entry: IndexedCollider) {
        match tier {
            CollisionTier::None => {}
            CollisionTier::Coarse => self.coarse.push(entry),
            CollisionTier::Fine => self.fine.push(entry),
        }
    }

    pub fn tier(&self, tier: CollisionTier) -> &[IndexedCollider] {
        match tier {
            CollisionTier::None => &[],
            CollisionTier::Coarse => &self.coarse,
            CollisionTier::Fine => &self.fine,
        }
    }

    pub fn len(&self) -> usize {
        self.coarse.len() + self.fine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First entry that blocks `probe`. Fine entries are tested with
    /// `collides`, coarse ones with `collides_horizontally`; entries named
    /// `self_name` are skipped.
    pub fn first_blocking(&self, self_name: &str, probe: &Collider) -> Option<EntityId> {
        let fine_hit = self
            .fine
            .iter()
            .filter(|entry| &*entry.name != self_name)
            .find(|entry| probe.collides(&entry.collider));
        if let Some(entry) = fine_hit {
            return Some(entry.id);
        }

        self.coarse
            .iter()
            .filter(|entry| &*entry.name != self_name)
            .find(|entry| probe.collides_horizontally(&entry.collider))
            .map(|entry| entry.id)
    }
}
