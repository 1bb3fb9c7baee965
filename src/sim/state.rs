//! Game state and core simulation types
//!
//! Everything one run needs lives in `GameState`; the tick function is the
//! only thing that mutates it while playing.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::skins::Progression;
use crate::assets::AssetRegistry;
use crate::tuning::{Tuning, WorldMetrics};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start input, world frozen
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended, world frozen for display
    GameOver,
}

/// One upper/lower barrier pair with a passable gap
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Height of the upper barrier, i.e. where the gap begins
    pub gap_top: f32,
    /// Gap height
    pub gap: f32,
    /// Barrier width
    pub width: f32,
    /// Already counted toward the score
    pub scored: bool,
}

impl Obstacle {
    /// Where the lower barrier begins
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap
    }

    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap / 2.0
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Cycles to the next skin
    Regular,
    /// Milestone reward: unlocks the special skin
    Special,
}

/// A pickup placed inside a gap
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    /// Drawn height
    pub size: f32,
    pub radius: f32,
    pub collected: bool,
}

/// Things that happened during a tick, for the shell to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted { run_id: u32 },
    ObstacleSpawned { count: u32 },
    CollectibleSpawned { kind: CollectibleKind },
    Scored { score: u32 },
    CollectiblePicked { kind: CollectibleKind },
    SkinChanged { skin: &'static str },
    /// Emitted exactly once per run
    RunEnded {
        run_id: u32,
        score: u32,
        play_ms: u64,
        best: u32,
        new_best: bool,
    },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run RNG (obstacle layout, collectible schedule)
    pub rng: Pcg32,
    /// Balance in reference units
    pub tuning: Tuning,
    /// Balance scaled to the current viewport
    pub metrics: WorldMetrics,
    /// Current phase
    pub phase: GamePhase,
    /// Incremented on every run start
    pub run_id: u32,
    /// Obstacles passed this run
    pub score: u32,
    /// Best score across runs (never decreases)
    pub best_score: u32,
    /// Simulated play time this run (seconds)
    pub elapsed: f32,
    pub actor: Actor,
    /// Active obstacles, oldest (leftmost) first
    pub obstacles: VecDeque<Obstacle>,
    pub collectibles: Vec<Collectible>,
    /// Seconds until the next obstacle spawn
    pub spawn_timer: f32,
    /// Obstacles spawned this run
    pub columns_spawned: u32,
    /// Spawn count at which the next regular collectible appears
    pub next_collectible_at: u32,
    /// Special collectible already placed this run
    pub special_placed: bool,
    pub progression: Progression,
    /// Pending events (drained by the shell)
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a state in the `Ready` phase
    pub fn new(seed: u64, tuning: Tuning, width: f32, height: f32) -> Self {
        let metrics = WorldMetrics::new(&tuning, width, height);
        let actor = Actor::new(&metrics);
        let spawn_timer = metrics.spawn_interval;
        let next_collectible_at = tuning.first_collectible_at;
        Self {
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            metrics,
            phase: GamePhase::Ready,
            run_id: 0,
            score: 0,
            best_score: 0,
            elapsed: 0.0,
            actor,
            obstacles: VecDeque::new(),
            collectibles: Vec::new(),
            spawn_timer,
            columns_spawned: 0,
            next_collectible_at,
            special_placed: false,
            progression: Progression::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Seed the best score from persistent storage
    pub fn with_best_score(mut self, best: u32) -> Self {
        self.best_score = best;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a new run from any phase. Always a full reset.
    pub fn start_run(&mut self, assets: &AssetRegistry) {
        self.reset_world();
        self.progression.reset(assets);
        self.run_id += 1;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RunStarted { run_id: self.run_id });
        log::info!("Run {} started", self.run_id);
    }

    fn reset_world(&mut self) {
        self.actor = Actor::new(&self.metrics);
        self.obstacles.clear();
        self.collectibles.clear();
        self.score = 0;
        self.elapsed = 0.0;
        self.spawn_timer = self.metrics.spawn_interval;
        self.columns_spawned = 0;
        self.next_collectible_at = self.tuning.first_collectible_at;
        self.special_placed = false;
    }

    /// Terminal collision. Only the first call of a run does anything;
    /// returns whether this call ended the run.
    pub fn end_run(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        let new_best = self.score > self.best_score;
        if new_best {
            self.best_score = self.score;
        }
        let play_ms = (self.elapsed.max(0.0) * 1000.0).round() as u64;
        self.events.push(GameEvent::RunEnded {
            run_id: self.run_id,
            score: self.score,
            play_ms,
            best: self.best_score,
            new_best,
        });
        log::info!(
            "Run {} over: score {} (best {}, {} ms)",
            self.run_id,
            self.score,
            self.best_score,
            play_ms
        );
        true
    }

    /// Viewport changed. New obstacles use the new metrics; outside a run
    /// the actor is put back at the start height.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.metrics = WorldMetrics::new(&self.tuning, width, height);
        self.actor.x = self.metrics.actor_x;
        self.actor.radius = self.metrics.actor_radius;
        if self.phase != GamePhase::Playing {
            self.actor.y = self.metrics.start_y;
        }
    }

    /// Swap in new balance numbers. Spacing and gap size apply from the next
    /// spawn on; obstacles already on screen keep their geometry.
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.tuning = tuning;
        let (w, h) = (self.metrics.width, self.metrics.height);
        self.resize(w, h);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
