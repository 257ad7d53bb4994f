//! Entity registry
//!
//! Owns every live bullet, asteroid, enemy and power-up. Iteration is always in
//! ascending id order (spawn order) for determinism. Systems that remove while
//! walking a category take an id snapshot first with [`Registry::ids`] and
//! re-check liveness with [`Registry::get`] before touching an entity.

use std::collections::BTreeMap;

use glam::Vec3;

use super::entity::{Body, Category, Entity, EntityId, Owner};

#[derive(Debug, Clone)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    next_id: EntityId,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Add an entity, returning its freshly allocated id
    pub fn add(&mut self, pos: Vec3, body: Body) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(id, Entity { id, pos, body });
        id
    }

    /// Remove an entity. Removing an id that is already gone is a no-op returning `None`.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Entities of one category, in id order
    pub fn of(&self, category: Category) -> impl Iterator<Item = &Entity> {
        self.entities
            .values()
            .filter(move |e| e.category() == category)
    }

    /// Snapshot of the ids in one category (safe to remove while walking it)
    pub fn ids(&self, category: Category) -> Vec<EntityId> {
        self.of(category).map(|e| e.id).collect()
    }

    /// Snapshot of bullet ids fired by `owner`
    pub fn bullet_ids(&self, owner: Owner) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.is_bullet_of(owner))
            .map(|e| e.id)
            .collect()
    }

    pub fn count(&self, category: Category) -> usize {
        self.of(category).count()
    }

    pub fn bullet_count(&self, owner: Owner) -> usize {
        self.entities
            .values()
            .filter(|e| e.is_bullet_of(owner))
            .count()
    }

    /// Keep only entities for which `keep` returns true; returns how many were dropped
    pub fn retain(&mut self, mut keep: impl FnMut(&Entity) -> bool) -> usize {
        let before = self.entities.len();
        self.entities.retain(|_, e| keep(e));
        before - self.entities.len()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, Bullet};

    fn asteroid() -> Body {
        Body::Asteroid(Asteroid {
            speed: 0.02,
            spin: 0.0,
            rotation: Vec3::ZERO,
            health: 1,
        })
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut reg = Registry::new();
        let a = reg.add(Vec3::ZERO, asteroid());
        let b = reg.add(Vec3::ZERO, Body::Bullet(Bullet::player()));
        let c = reg.add(Vec3::ZERO, asteroid());
        assert!(a < b && b < c);

        reg.remove(b);
        let d = reg.add(Vec3::ZERO, asteroid());
        assert!(d > c, "ids are never reused");

        let order: Vec<_> = reg.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![a, c, d]);
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut reg = Registry::new();
        let id = reg.add(Vec3::ZERO, asteroid());
        assert!(reg.remove(id).is_some());
        assert!(reg.remove(id).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_snapshot_survives_removal() {
        let mut reg = Registry::new();
        for _ in 0..5 {
            reg.add(Vec3::ZERO, asteroid());
        }
        let ids = reg.ids(Category::Asteroid);
        for id in &ids {
            // Remove the next one too while walking
            reg.remove(*id);
            reg.remove(*id + 1);
        }
        assert!(reg.is_empty());
    }

    #[test]
    fn test_per_category_counts() {
        let mut reg = Registry::new();
        reg.add(Vec3::ZERO, asteroid());
        reg.add(Vec3::ZERO, Body::Bullet(Bullet::player()));
        reg.add(Vec3::ZERO, Body::Bullet(Bullet::enemy()));
        reg.add(Vec3::ZERO, Body::Bullet(Bullet::player()));

        assert_eq!(reg.count(Category::Asteroid), 1);
        assert_eq!(reg.count(Category::Bullet), 3);
        assert_eq!(reg.bullet_count(Owner::Player), 2);
        assert_eq!(reg.bullet_ids(Owner::Enemy).len(), 1);
    }
}
