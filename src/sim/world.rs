//! The explicit state bundle threaded through every simulation call

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{EntityKind, EntityStore, Visual};
use super::schedule::Scheduler;
use super::state::{GameEvent, GameState};
use crate::consts::PLAYER_START;
use crate::tuning::Tuning;
use glam::Vec2;

/// Everything one game session owns
#[derive(Debug, Clone)]
pub struct World {
    pub state: GameState,
    pub store: EntityStore,
    pub scheduler: Scheduler,
    pub tuning: Tuning,
    pub rng: Pcg32,
    seed: u64,
}

impl World {
    /// Create a session with the player at the start position
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut world = Self {
            state: GameState::new(&tuning),
            store: EntityStore::new(),
            scheduler: Scheduler::new(),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            seed,
        };
        world.spawn_player();
        world
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn spawn_player(&mut self) {
        self.store.spawn(
            EntityKind::Player,
            PLAYER_START,
            Vec2::ZERO,
            self.tuning.player_lives,
            Visual::Whale,
        );
    }

    /// Move pending store notifications into the event stream
    pub(crate) fn flush_journal(&mut self) {
        let journal = self.store.drain_journal();
        self.state.events.extend(journal);
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.flush_journal();
        std::mem::take(&mut self.state.events)
    }
}
