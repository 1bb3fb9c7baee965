//! Obstacle generation and collectible scheduling
//!
//! Obstacles are spawned on a wall-clock timer just past the right edge and
//! retired from the left in the same order, so the active set is a FIFO.
//! Consecutive gaps may only drift by a bounded amount, which keeps every
//! generated course passable.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, CollectibleKind, GameEvent, GameState, Obstacle};
use crate::clamp_range;
use crate::tuning::{Tuning, WorldMetrics};

/// Pick the top of the next gap.
///
/// The candidate is uniform over the allowed band; when there is a previous
/// obstacle it is then pulled toward it so the gap centers differ by at most
/// `metrics.max_center_delta`.
pub fn choose_gap_top<R: Rng>(
    rng: &mut R,
    metrics: &WorldMetrics,
    prev_center: Option<f32>,
) -> f32 {
    let (min_top, max_top) = metrics.gap_top_range();
    let candidate = if max_top > min_top {
        rng.random_range(min_top..=max_top)
    } else {
        min_top
    };

    let Some(prev_center) = prev_center else {
        return candidate;
    };

    let half_gap = metrics.gap / 2.0;
    let lo = prev_center - metrics.max_center_delta - half_gap;
    let hi = prev_center + metrics.max_center_delta - half_gap;
    clamp_range(clamp_range(candidate, lo, hi), min_top, max_top)
}

/// Obstacles between two regular collectibles
fn collectible_interval<R: Rng>(rng: &mut R, tuning: &Tuning) -> u32 {
    let min = tuning.collectible_interval_min.max(1);
    let max = tuning.collectible_interval_max.max(min);
    rng.random_range(min..=max)
}

/// Spawn one obstacle at the right edge and run the collectible schedule
pub fn spawn_obstacle(state: &mut GameState) {
    let prev = state.obstacles.back().cloned();
    let prev_center = prev.as_ref().map(Obstacle::gap_center);
    let gap_top = choose_gap_top(&mut state.rng, &state.metrics, prev_center);

    let obstacle = Obstacle {
        id: state.next_entity_id(),
        x: state.metrics.spawn_x(),
        gap_top,
        gap: state.metrics.gap,
        width: state.metrics.barrier_width,
        scored: false,
    };
    let spawn_x = obstacle.x;
    state.obstacles.push_back(obstacle);
    state.columns_spawned += 1;
    state.events.push(GameEvent::ObstacleSpawned {
        count: state.columns_spawned,
    });
    log::debug!("Obstacle {} spawned, gap top {:.1}", state.columns_spawned, gap_top);

    schedule_collectible(state, prev.as_ref(), spawn_x);
}

/// Place a collectible if a milestone was reached.
///
/// The special milestone wins over the regular one and is placed at most
/// once per run. Placement needs a previous obstacle to anchor to; without
/// one the milestone stays pending until the next spawn.
fn schedule_collectible(state: &mut GameState, prev: Option<&Obstacle>, spawn_x: f32) {
    let count = state.columns_spawned;
    let special_due = !state.special_placed && count >= state.tuning.special_milestone;
    let regular_due = count >= state.next_collectible_at;
    if !special_due && !regular_due {
        return;
    }
    let Some(prev) = prev else {
        return;
    };

    let kind = if special_due {
        CollectibleKind::Special
    } else {
        CollectibleKind::Regular
    };
    let collectible = place_collectible(state, prev, spawn_x, kind);
    state.collectibles.push(collectible);
    state.events.push(GameEvent::CollectibleSpawned { kind });

    if special_due {
        state.special_placed = true;
        log::info!("Special collectible placed at obstacle {count}");
    }
    if regular_due {
        let interval = collectible_interval(&mut state.rng, &state.tuning);
        state.next_collectible_at = count.saturating_add(interval);
    }
}

/// Midway between the anchoring obstacle and the new one, inside the
/// anchoring gap and at least a safe margin from both of its edges
fn place_collectible(
    state: &mut GameState,
    anchor: &Obstacle,
    spawn_x: f32,
    kind: CollectibleKind,
) -> Collectible {
    let safe_margin = anchor.gap * state.metrics.safe_margin_frac;
    let min_y = anchor.gap_top + safe_margin;
    let max_y = anchor.gap_bottom() - safe_margin;
    let span = (max_y - min_y).max(0.0);
    let jitter = (state.rng.random::<f32>() * 2.0 - 1.0) * state.metrics.jitter_frac * span;
    let y = clamp_range(anchor.gap_center() + jitter, min_y, max_y);
    let x = (anchor.x + spawn_x) / 2.0;

    Collectible {
        id: state.next_entity_id(),
        kind,
        pos: Vec2::new(x, y),
        size: state.metrics.collectible_size,
        radius: state.metrics.collectible_radius,
        collected: false,
    }
}

/// Run the spawn timer and scroll the world left by one step
pub fn advance_world(state: &mut GameState, dt: f32) {
    let interval = state.metrics.spawn_interval;
    state.spawn_timer -= dt;
    if interval > 0.0 {
        while state.spawn_timer <= 0.0 {
            spawn_obstacle(state);
            state.spawn_timer += interval;
        }
    }

    let dx = state.metrics.scroll_speed * dt;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.x -= dx;
    }
    for collectible in state.collectibles.iter_mut() {
        collectible.pos.x -= dx;
    }

    // Oldest first: stop at the first obstacle still on screen
    let limit = -state.metrics.offscreen_margin;
    while state.obstacles.front().is_some_and(|o| o.right() < limit) {
        state.obstacles.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRegistry;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn metrics() -> WorldMetrics {
        WorldMetrics::new(&Tuning::default(), 1280.0, 720.0)
    }

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default(), 1280.0, 720.0);
        state.start_run(&AssetRegistry::all_ready());
        state
    }

    #[test]
    fn test_first_gap_within_band() {
        let m = metrics();
        let mut rng = Pcg32::seed_from_u64(1);
        let (min_top, max_top) = m.gap_top_range();
        for _ in 0..500 {
            let top = choose_gap_top(&mut rng, &m, None);
            assert!(top >= min_top && top <= max_top);
        }
    }

    #[test]
    fn test_degenerate_band_uses_margin() {
        let tuning = Tuning {
            margin_top: 400.0,
            margin_bottom: 400.0,
            ..Default::default()
        };
        let m = WorldMetrics::new(&tuning, 1280.0, 720.0);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(choose_gap_top(&mut rng, &m, None), m.margin_top);
        assert_eq!(choose_gap_top(&mut rng, &m, Some(500.0)), m.margin_top);
    }

    #[test]
    fn test_spawn_position_and_fifo_eviction() {
        let mut state = playing_state(3);
        spawn_obstacle(&mut state);
        let first = state.obstacles[0].clone();
        assert_eq!(first.x, state.metrics.spawn_x());
        assert_eq!(state.columns_spawned, 1);

        spawn_obstacle(&mut state);
        state.obstacles[0].x = -200.0;
        state.obstacles[1].x = -100.0;
        advance_world(&mut state, 0.001);
        // -100 + 70 = -30 is still within the margin, so only the oldest goes
        assert_eq!(state.obstacles.len(), 1);
        assert_ne!(state.obstacles[0].id, first.id);
    }

    #[test]
    fn test_spawn_timer_is_wall_clock() {
        let mut state = playing_state(4);
        let dt = 1.0 / 120.0;
        // Just short of 1.5 s: nothing yet
        for _ in 0..179 {
            advance_world(&mut state, dt);
        }
        assert_eq!(state.columns_spawned, 0);
        advance_world(&mut state, dt);
        advance_world(&mut state, dt);
        assert_eq!(state.columns_spawned, 1);
        // Three more intervals
        for _ in 0..(180 * 3) {
            advance_world(&mut state, dt);
        }
        assert_eq!(state.columns_spawned, 4);
    }

    #[test]
    fn test_world_scrolls_left() {
        let mut state = playing_state(5);
        spawn_obstacle(&mut state);
        let x0 = state.obstacles[0].x;
        advance_world(&mut state, 0.01);
        let expected = x0 - state.metrics.scroll_speed * 0.01;
        assert!((state.obstacles[0].x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_first_regular_collectible_at_milestone() {
        let mut state = playing_state(6);
        let first_at = state.tuning.first_collectible_at;
        for _ in 0..first_at - 1 {
            spawn_obstacle(&mut state);
        }
        assert!(state.collectibles.is_empty());

        spawn_obstacle(&mut state);
        assert_eq!(state.collectibles.len(), 1);
        let c = &state.collectibles[0];
        assert_eq!(c.kind, CollectibleKind::Regular);

        let next_gap = state.next_collectible_at - first_at;
        assert!(next_gap >= 13 && next_gap <= 20);
    }

    #[test]
    fn test_collectible_needs_anchor() {
        let mut state = playing_state(7);
        state.next_collectible_at = 1;
        spawn_obstacle(&mut state);
        assert!(state.collectibles.is_empty());
        // Still due, placed on the next spawn
        spawn_obstacle(&mut state);
        assert_eq!(state.collectibles.len(), 1);
    }

    #[test]
    fn test_special_milestone_placement() {
        let mut state = playing_state(8);
        state.next_collectible_at = u32::MAX;
        state.columns_spawned = state.tuning.special_milestone - 2;
        spawn_obstacle(&mut state);
        assert!(state.collectibles.is_empty());

        spawn_obstacle(&mut state);
        assert_eq!(state.columns_spawned, state.tuning.special_milestone);
        assert_eq!(state.collectibles.len(), 1);
        let c = state.collectibles[0].clone();
        assert_eq!(c.kind, CollectibleKind::Special);
        assert!(state.special_placed);

        let anchor = &state.obstacles[0];
        let safe = anchor.gap * state.tuning.safe_margin_frac;
        assert!(c.pos.y >= anchor.gap_top + safe - 1e-3);
        assert!(c.pos.y <= anchor.gap_bottom() - safe + 1e-3);
        let mid = (anchor.x + state.obstacles[1].x) / 2.0;
        assert!((c.pos.x - mid).abs() < 1e-3);

        // Never twice in one run
        spawn_obstacle(&mut state);
        assert_eq!(state.collectibles.len(), 1);
    }

    #[test]
    fn test_special_beats_regular_on_same_count() {
        let mut state = playing_state(9);
        spawn_obstacle(&mut state);
        state.columns_spawned = state.tuning.special_milestone - 1;
        state.next_collectible_at = state.tuning.special_milestone;
        spawn_obstacle(&mut state);
        assert_eq!(state.collectibles.len(), 1);
        assert_eq!(state.collectibles[0].kind, CollectibleKind::Special);
        // Regular schedule moved on past the milestone
        assert!(state.next_collectible_at > state.tuning.special_milestone);
    }

    proptest! {
        #[test]
        fn prop_gap_drift_bounded(seed in any::<u64>(), height in 400.0f32..1600.0) {
            let mut state = GameState::new(seed, Tuning::default(), 1280.0, height);
            state.start_run(&AssetRegistry::all_ready());
            for _ in 0..60 {
                spawn_obstacle(&mut state);
            }
            let max_delta = state.metrics.max_center_delta;
            let (min_top, max_top) = state.metrics.gap_top_range();
            let obstacles: Vec<_> = state.obstacles.iter().collect();
            for pair in obstacles.windows(2) {
                let delta = (pair[1].gap_center() - pair[0].gap_center()).abs();
                prop_assert!(delta <= max_delta + 1e-3);
            }
            for o in &obstacles {
                prop_assert!(o.gap_top >= min_top - 1e-3 && o.gap_top <= max_top + 1e-3);
            }
        }

        #[test]
        fn prop_collectibles_inside_anchor_gap(seed in any::<u64>()) {
            let mut state = GameState::new(seed, Tuning::default(), 1280.0, 720.0);
            state.start_run(&AssetRegistry::all_ready());
            state.next_collectible_at = 2;
            let mut checked = 0;
            for _ in 0..80 {
                let before = state.collectibles.len();
                spawn_obstacle(&mut state);
                if state.collectibles.len() > before {
                    let anchor = &state.obstacles[state.obstacles.len() - 2];
                    let c = state.collectibles.last().unwrap();
                    let safe = anchor.gap * state.tuning.safe_margin_frac;
                    prop_assert!(c.pos.y >= anchor.gap_top + safe - 1e-3);
                    prop_assert!(c.pos.y <= anchor.gap_bottom() - safe + 1e-3);
                    checked += 1;
                }
            }
            prop_assert!(checked >= 3);
        }
    }
}
