//! Entities and the kind-partitioned entity store
//!
//! The store is the only owner of entity lifetimes. Everything else holds
//! `EntityId`s and re-queries the store, so a destroyed entity is simply
//! absent rather than dangling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameEvent;

/// Entity class tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    PlayerBullet,
    EnemyProjectile,
    BossProjectile,
    Boss,
}

impl EntityKind {
    pub const COUNT: usize = 6;
    pub const ALL: [EntityKind; Self::COUNT] = [
        EntityKind::Player,
        EntityKind::Enemy,
        EntityKind::PlayerBullet,
        EntityKind::EnemyProjectile,
        EntityKind::BossProjectile,
        EntityKind::Boss,
    ];

    fn index(self) -> usize {
        match self {
            EntityKind::Player => 0,
            EntityKind::Enemy => 1,
            EntityKind::PlayerBullet => 2,
            EntityKind::EnemyProjectile => 3,
            EntityKind::BossProjectile => 4,
            EntityKind::Boss => 5,
        }
    }

    /// Player and boss partitions hold at most one entity
    pub fn is_singleton(self) -> bool {
        matches!(self, EntityKind::Player | EntityKind::Boss)
    }

    pub fn is_projectile(self) -> bool {
        matches!(
            self,
            EntityKind::PlayerBullet | EntityKind::EnemyProjectile | EntityKind::BossProjectile
        )
    }

    /// Hit-points given to a freshly spawned entity of this kind
    pub fn default_hp(self) -> i32 {
        match self {
            EntityKind::Player => 3,
            EntityKind::Enemy => 3,
            EntityKind::Boss => 500,
            _ => 1,
        }
    }

    /// What happens to an entity when its hit-points reach zero
    pub fn death_policy(self) -> DeathPolicy {
        match self {
            EntityKind::Player => DeathPolicy::Retain,
            EntityKind::Boss => DeathPolicy::Deactivate,
            _ => DeathPolicy::Remove,
        }
    }
}

/// Per-class handling of an entity that has run out of hit-points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathPolicy {
    /// Removed from the store immediately
    Remove,
    /// Kept in the store but inert (boss defeat animation)
    Deactivate,
    /// Kept as-is; the owner of the game rules decides (player lives)
    Retain,
}

/// Stable handle to an entity. Serials are never reused, so a handle to a
/// destroyed entity can never alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub kind: EntityKind,
    pub serial: u64,
}

/// Cosmetic tag; also selects the hit-box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    Whale,
    Ship,
    AlienBeige,
    AlienBlue,
    AlienPink,
    Shot,
    Meteor,
    BossLaser,
    BossShip,
}

impl Visual {
    /// Enemy palette, picked uniformly at spawn
    pub const ALIENS: [Visual; 3] = [Visual::AlienBeige, Visual::AlienBlue, Visual::AlienPink];

    /// Display scale applied by the presentation layer
    pub fn scale(self) -> f32 {
        match self {
            Visual::Whale => 0.7,
            Visual::Ship => 1.5,
            Visual::Meteor => 0.15,
            _ => 1.0,
        }
    }

    /// Half width/height of the (already scaled) hit-box
    pub fn half_extents(self) -> Vec2 {
        match self {
            Visual::Whale => Vec2::new(28.0, 20.0),
            Visual::Ship => Vec2::new(24.0, 24.0),
            Visual::AlienBeige | Visual::AlienBlue | Visual::AlienPink => Vec2::new(33.0, 46.0),
            Visual::Shot => Vec2::new(6.0, 14.0),
            Visual::Meteor => Vec2::new(7.0, 7.0),
            Visual::BossLaser => Vec2::new(8.0, 8.0),
            Visual::BossShip => Vec2::new(62.0, 61.0),
        }
    }
}

/// A simulated object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: i32,
    /// Inactive entities are inert: never targeted by new collisions
    pub active: bool,
    pub visual: Visual,
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        self.id.kind
    }

    pub fn half_extents(&self) -> Vec2 {
        self.visual.half_extents()
    }

    /// Full display height, used for off-screen tests
    pub fn height(&self) -> f32 {
        self.half_extents().y * 2.0
    }
}

/// Owner of every live entity, partitioned by kind
#[derive(Debug, Clone)]
pub struct EntityStore {
    partitions: [Vec<Entity>; EntityKind::COUNT],
    next_serial: u64,
    /// Bumped on every `clear`; deferred work compares against it
    generation: u32,
    /// Spawn/destroy notifications waiting to be drained by the driver
    journal: Vec<GameEvent>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            partitions: Default::default(),
            next_serial: 1,
            generation: 0,
            journal: Vec::new(),
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Create an entity. Spawning a singleton kind evicts the previous holder.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        vel: Vec2,
        hp: i32,
        visual: Visual,
    ) -> EntityId {
        if kind.is_singleton() {
            if let Some(old) = self.first(kind).map(|e| e.id) {
                log::warn!("Replacing existing {:?} {:?}", kind, old);
                self.destroy(old);
            }
        }

        let id = EntityId {
            kind,
            serial: self.next_serial,
        };
        self.next_serial += 1;

        self.partitions[kind.index()].push(Entity {
            id,
            pos,
            vel,
            hp,
            active: true,
            visual,
        });
        self.journal.push(GameEvent::EntitySpawned {
            id,
            kind,
            pos,
            visual,
            scale: visual.scale(),
        });
        id
    }

    /// Remove an entity. Destroying an unknown or already-destroyed id is a no-op.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let partition = &mut self.partitions[id.kind.index()];
        match partition.iter().position(|e| e.id == id) {
            Some(index) => {
                partition.remove(index);
                self.journal.push(GameEvent::EntityDestroyed { id });
                true
            }
            None => false,
        }
    }

    /// Mark an entity inert without removing it
    pub fn deactivate(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.active => {
                entity.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.partitions[id.kind.index()].iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.partitions[id.kind.index()]
            .iter_mut()
            .find(|e| e.id == id)
    }

    /// Present in the store (active or not)
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Present and active
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.active)
    }

    pub fn iter(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.partitions[kind.index()].iter()
    }

    pub fn iter_active(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.iter(kind).filter(|e| e.active)
    }

    /// Snapshot of the active ids of a kind, in spawn order
    pub fn active_ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.iter_active(kind).map(|e| e.id).collect()
    }

    /// Visit every active entity of `kind`. The callback may mutate the store;
    /// entities destroyed or deactivated mid-walk are skipped, never revisited,
    /// and entities spawned mid-walk are not visited.
    pub fn for_each_active<F>(&mut self, kind: EntityKind, mut f: F)
    where
        F: FnMut(&mut EntityStore, EntityId),
    {
        for id in self.active_ids(kind) {
            if self.is_alive(id) {
                f(self, id);
            }
        }
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.partitions[kind.index()].len()
    }

    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first(&self, kind: EntityKind) -> Option<&Entity> {
        self.partitions[kind.index()].first()
    }

    pub fn player(&self) -> Option<&Entity> {
        self.first(EntityKind::Player)
    }

    pub fn boss(&self) -> Option<&Entity> {
        self.first(EntityKind::Boss)
    }

    /// Decrement hit-points. Returns true only on the call that takes the
    /// entity from above zero to zero or below; the kind's death policy is
    /// applied before returning. Inactive or unknown entities are ignored.
    pub fn apply_damage(&mut self, id: EntityId, amount: i32) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        if !entity.active || entity.hp <= 0 {
            return false;
        }

        entity.hp = (entity.hp - amount).max(0);
        if entity.hp > 0 {
            return false;
        }

        match id.kind.death_policy() {
            DeathPolicy::Remove => {
                self.destroy(id);
            }
            DeathPolicy::Deactivate => {
                self.deactivate(id);
            }
            DeathPolicy::Retain => {}
        }
        true
    }

    /// Advance free-moving bodies by their velocity. The player is driven by
    /// input and the boss by its own locomotion, so both are skipped.
    pub fn integrate(&mut self, dt: f32) {
        for kind in EntityKind::ALL {
            if kind.is_singleton() {
                continue;
            }
            for entity in self.partitions[kind.index()].iter_mut() {
                if entity.active {
                    entity.pos += entity.vel * dt;
                }
            }
        }
    }

    /// Destroy enemies that fell past the bottom edge and projectiles that
    /// left the playfield. Returns the number of entities removed.
    pub fn prune_offscreen(&mut self, width: f32, height: f32) -> usize {
        let mut doomed = Vec::new();

        for enemy in self.iter(EntityKind::Enemy) {
            if enemy.active && enemy.pos.y > height + enemy.height() {
                doomed.push(enemy.id);
            }
        }

        for kind in EntityKind::ALL.into_iter().filter(|k| k.is_projectile()) {
            for shot in self.iter(kind) {
                let margin = shot.half_extents();
                let outside = shot.pos.x < -margin.x
                    || shot.pos.x > width + margin.x
                    || shot.pos.y < -margin.y
                    || shot.pos.y > height + margin.y;
                if outside {
                    doomed.push(shot.id);
                }
            }
        }

        for id in &doomed {
            self.destroy(*id);
        }
        doomed.len()
    }

    /// Destroy every entity of one kind
    pub fn clear_kind(&mut self, kind: EntityKind) -> usize {
        let ids: Vec<EntityId> = self.iter(kind).map(|e| e.id).collect();
        for id in &ids {
            self.destroy(*id);
        }
        ids.len()
    }

    /// Destroy everything and start a new generation
    pub fn clear(&mut self) {
        for kind in EntityKind::ALL {
            self.clear_kind(kind);
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Take the pending spawn/destroy notifications
    pub fn drain_journal(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.journal)
    }
}
