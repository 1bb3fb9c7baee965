//! Simulation tick
//!
//! Advances the run state machine and, while playing, runs physics,
//! spawning, collision and scoring in that order.

use super::collision::{circle_circle_overlap, circle_hits_obstacle, out_of_vertical_bounds};
use super::spawn::advance_world;
use super::state::{CollectibleKind, GameEvent, GamePhase, GameState};
use crate::assets::AssetRegistry;
use crate::consts::MAX_FRAME_DT;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (pointer down / Space / ArrowUp). Starts a run when not playing.
    pub jump: bool,
    /// Start a run (Enter). Ignored while playing.
    pub start: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub autopilot: bool,
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, assets: &AssetRegistry) {
    match state.phase {
        GamePhase::Ready | GamePhase::GameOver => {
            if input.start || input.jump || input.autopilot {
                state.start_run(assets);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.elapsed += dt;

    let jump = input.jump || (input.autopilot && autopilot_wants_jump(state));
    if jump {
        let (velocity, frame_ms) = (state.metrics.jump_velocity, state.metrics.active_frame_ms);
        state.actor.impulse(velocity, frame_ms);
    }
    state.actor.integrate(dt, state.metrics.gravity);

    advance_world(state, dt);

    if resolve_collisions(state, assets) {
        state.end_run();
    }
}

/// Bounds, barrier, scoring and pickup checks for one tick.
/// Returns true on terminal collision.
pub fn resolve_collisions(state: &mut GameState, assets: &AssetRegistry) -> bool {
    let actor = state.actor.clone();
    let center = actor.center();
    let height = state.metrics.height;

    // World bounds
    if out_of_vertical_bounds(actor.y, actor.radius, height) {
        return true;
    }

    // Barriers and scoring, in spawn order
    let (inset_x, inset_y) = (state.metrics.hit_inset_x, state.metrics.cap_inset_y);
    for obstacle in state.obstacles.iter_mut() {
        if circle_hits_obstacle(center, actor.radius, obstacle, height, inset_x, inset_y) {
            return true;
        }
        if !obstacle.scored && obstacle.right() < actor.x {
            obstacle.scored = true;
            state.score += 1;
            state.events.push(GameEvent::Scored { score: state.score });
        }
    }

    // Collectibles
    for collectible in state.collectibles.iter_mut() {
        if collectible.collected
            || !circle_circle_overlap(center, actor.radius, collectible.pos, collectible.radius)
        {
            continue;
        }
        collectible.collected = true;
        state.events.push(GameEvent::CollectiblePicked {
            kind: collectible.kind,
        });

        let changed = match collectible.kind {
            CollectibleKind::Regular => {
                state.progression.advance(state.tuning.cycle_policy, assets)
            }
            CollectibleKind::Special => {
                state.progression.unlock_special(state.tuning.lock_after_special, assets)
            }
        };
        if changed {
            let skin = state.progression.active_skin().name;
            log::info!("Skin changed to {skin}");
            state.events.push(GameEvent::SkinChanged { skin });
        }
    }
    let limit = -state.metrics.offscreen_margin;
    state
        .collectibles
        .retain(|c| !c.collected && c.pos.x + c.size > limit);

    false
}

/// Demo-mode pilot: keep the actor a little below the next gap's center
fn autopilot_wants_jump(state: &GameState) -> bool {
    let actor = &state.actor;
    if actor.vel_y < 0.0 {
        return false;
    }
    let target = state
        .obstacles
        .iter()
        .find(|o| o.right() + actor.radius > actor.x)
        .map(|o| o.gap_center() + o.gap * 0.15)
        .unwrap_or(state.metrics.height * 0.5);
    actor.y > target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{Collectible, Obstacle};
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn ready_state(seed: u64) -> GameState {
        GameState::new(seed, Tuning::default(), 1280.0, 720.0)
    }

    fn start(state: &mut GameState, assets: &AssetRegistry) {
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(state, &input, SIM_DT, assets);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    fn run_ended_count(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .count()
    }

    #[test]
    fn test_ready_waits_for_input() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(1);
        let y = state.actor.y;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        }
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.actor.y, y);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, SIM_DT, &assets);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_collectibles_scroll_and_leave_offscreen() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(3);
        start(&mut state, &assets);
        state.spawn_timer = 10.0;

        let margin = state.metrics.offscreen_margin;
        let size = 68.0;
        let dx = state.metrics.scroll_speed * SIM_DT;
        // Right edge stays past the limit after one step / crosses it
        let inside_x = -margin - size + dx + 1.0;
        let leaving_x = -margin - size + dx * 0.5;
        for (id, x) in [(100, inside_x), (101, leaving_x)] {
            state.collectibles.push(Collectible {
                id,
                kind: CollectibleKind::Regular,
                pos: glam::Vec2::new(x, 60.0),
                size,
                radius: 28.0,
                collected: false,
            });
        }

        tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.collectibles.len(), 1);
        let kept = &state.collectibles[0];
        assert_eq!(kept.id, 100);
        assert!((kept.pos.x - (inside_x - dx)).abs() < 1e-3);
        assert!(kept.pos.x + kept.size > -margin);
    }

    #[test]
    fn test_jump_moves_actor_up() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(2);
        start(&mut state, &assets);
        let y0 = state.actor.y;
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, SIM_DT, &assets);
        assert!(state.actor.y < y0);
        assert!(state.actor.shows_active_frame());
    }

    #[test]
    fn test_clean_run_falls_to_floor() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(3);
        start(&mut state, &assets);
        let h = state.metrics.height;
        let g = state.metrics.gravity;
        let r = state.actor.radius;
        let start_y = state.actor.y;
        assert_eq!(start_y, h / 2.0 - 80.0);

        let frame = 1.0 / 60.0;
        let mut ticks = 0;
        while state.phase == GamePhase::Playing && ticks < 1000 {
            tick(&mut state, &TickInput::default(), frame, &assets);
            ticks += 1;
        }
        assert_eq!(state.phase, GamePhase::GameOver);

        // The run ends when the bottom of the collision circle reaches the floor,
        // which is no later than the center crossing y = H
        let t_edge = (2.0 * (h - r - start_y) / g).sqrt();
        let t_floor = (2.0 * (h / 2.0 + 80.0) / g).sqrt();
        assert!(state.elapsed >= t_edge - frame);
        assert!(state.elapsed <= t_floor + frame);
        assert_eq!(state.score, 0);
        assert_eq!(state.columns_spawned, 0);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(4).with_best_score(0);
        start(&mut state, &assets);
        state.score = 3;
        state.actor.y = state.metrics.height + 50.0;

        tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Still below the floor on the next tick
        tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        assert!(!state.end_run());

        let events = state.drain_events();
        assert_eq!(run_ended_count(&events), 1);
        assert_eq!(state.best_score, 3);
    }

    #[test]
    fn test_restart_after_game_over_resets() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(5);
        start(&mut state, &assets);
        state.score = 7;
        state.actor.y = -100.0;
        tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        assert_eq!(state.phase, GamePhase::GameOver);

        start(&mut state, &assets);
        assert_eq!(state.score, 0);
        assert_eq!(state.run_id, 2);
        assert_eq!(state.best_score, 7);
    }

    #[test]
    fn test_passing_obstacle_scores_once() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(6);
        start(&mut state, &assets);
        let actor_x = state.actor.x;
        let gap_top = state.actor.y - 80.0;
        state.obstacles.push_back(Obstacle {
            id: 500,
            x: actor_x - 70.0 + 0.5,
            gap_top,
            gap: 160.0,
            width: 70.0,
            scored: false,
        });
        state.actor.vel_y = -30.0;
        let mut scored = 0;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT, &assets);
            scored = state.score;
        }
        assert_eq!(scored, 1);
        assert!(state.obstacles[0].scored);
    }

    #[test]
    fn test_barrier_hit_ends_run() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(7);
        start(&mut state, &assets);
        let actor_x = state.actor.x;
        // Gap well above the actor: the lower barrier covers it
        state.obstacles.push_back(Obstacle {
            id: 501,
            x: actor_x - 35.0,
            gap_top: 60.0,
            gap: 160.0,
            width: 70.0,
            scored: false,
        });
        tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_regular_pickup_cycles_skin() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(8);
        start(&mut state, &assets);
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            kind: CollectibleKind::Regular,
            pos: state.actor.center(),
            size: 68.0,
            radius: 28.0,
            collected: false,
        });
        tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        assert!(state.collectibles.is_empty());
        assert_eq!(state.progression.active_skin().name, "Comet");
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::SkinChanged { skin: "Comet" }));
    }

    #[test]
    fn test_pickup_with_broken_skin_keeps_current() {
        let assets = AssetRegistry::all_ready();
        let mut assets_broken = AssetRegistry::from_manifest();
        for spec in crate::assets::MANIFEST {
            if spec.id == crate::assets::COMET_IDLE {
                assets_broken.mark_failed(spec.id);
            } else {
                assets_broken.mark_ready(spec.id, 100.0, 100.0);
            }
        }
        let mut state = ready_state(9);
        start(&mut state, &assets);
        state.collectibles.push(Collectible {
            id: 900,
            kind: CollectibleKind::Regular,
            pos: state.actor.center(),
            size: 68.0,
            radius: 28.0,
            collected: false,
        });
        tick(&mut state, &TickInput::default(), SIM_DT, &assets_broken);
        assert_eq!(state.progression.active_skin().name, "Apple");
        assert!(state.collectibles.is_empty());
    }

    #[test]
    fn test_special_milestone_scenario() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(10);
        start(&mut state, &assets);

        // Drive the spawn count to one short of the milestone with an anchor present
        crate::sim::spawn::spawn_obstacle(&mut state);
        state.next_collectible_at = u32::MAX;
        state.columns_spawned = state.tuning.special_milestone - 1;
        crate::sim::spawn::spawn_obstacle(&mut state);
        assert_eq!(state.columns_spawned, state.tuning.special_milestone);

        let special = state
            .collectibles
            .iter()
            .find(|c| c.kind == CollectibleKind::Special)
            .cloned()
            .expect("special collectible placed");
        let anchor = state.obstacles[0].clone();
        let safe = anchor.gap * state.tuning.safe_margin_frac;
        assert!(special.pos.y >= anchor.gap_top + safe - 1e-3);
        assert!(special.pos.y <= anchor.gap_bottom() - safe + 1e-3);

        // Pick it up
        state.obstacles.clear();
        state.collectibles[0].pos = state.actor.center();
        tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        assert_eq!(state.progression.active_skin().name, "Golden");

        // Later regular pickups don't move off the reward skin
        for i in 0..3 {
            state.collectibles.push(Collectible {
                id: 1000 + i,
                kind: CollectibleKind::Regular,
                pos: state.actor.center(),
                size: 68.0,
                radius: 28.0,
                collected: false,
            });
            tick(&mut state, &TickInput::default(), SIM_DT, &assets);
        }
        assert_eq!(state.progression.active_skin().name, "Golden");
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_determinism() {
        let assets = AssetRegistry::all_ready();
        let mut a = ready_state(99999);
        let mut b = ready_state(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut a, &input, SIM_DT, &assets);
            tick(&mut b, &input, SIM_DT, &assets);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.columns_spawned, b.columns_spawned);
        assert_eq!(a.obstacles, b.obstacles);
        assert!((a.actor.y - b.actor.y).abs() < 1e-4);
    }

    #[test]
    fn test_autopilot_scores() {
        let assets = AssetRegistry::all_ready();
        let mut state = ready_state(42);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        // 20 simulated seconds
        for _ in 0..(120 * 20) {
            tick(&mut state, &input, SIM_DT, &assets);
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert!(state.columns_spawned > 0);
        assert!(state.score > 0);
    }

    proptest! {
        #[test]
        fn prop_score_monotonic_and_once_per_obstacle(
            seed in any::<u64>(),
            jumps in proptest::collection::vec(any::<bool>(), 600),
        ) {
            let assets = AssetRegistry::all_ready();
            let mut state = ready_state(seed);
            start(&mut state, &assets);
            let mut scored_ids = HashSet::new();
            let mut last_score = 0;
            for (i, jump) in jumps.iter().enumerate() {
                // Mix the autopilot in so runs last long enough to score
                let input = TickInput {
                    jump: *jump && i % 7 == 0,
                    autopilot: i % 7 != 0,
                    ..Default::default()
                };
                tick(&mut state, &input, 1.0 / 60.0, &assets);
                if state.phase != GamePhase::Playing {
                    break;
                }
                prop_assert!(state.score >= last_score);
                prop_assert!(state.score - last_score <= 1);
                for o in state.obstacles.iter().filter(|o| o.scored) {
                    scored_ids.insert(o.id);
                }
                prop_assert_eq!(state.score as usize, scored_ids.len());
                last_score = state.score;
            }
        }

        #[test]
        fn prop_actor_centered_in_gap_survives(offset in -30.0f32..30.0) {
            let assets = AssetRegistry::all_ready();
            let mut state = ready_state(11);
            start(&mut state, &assets);
            let center_y = state.actor.y;
            state.obstacles.push_back(Obstacle {
                id: 700,
                x: state.actor.x - 35.0 + offset,
                gap_top: center_y - 80.0,
                gap: 160.0,
                width: 70.0,
                scored: false,
            });
            state.actor.vel_y = 0.0;
            prop_assert!(!resolve_collisions(&mut state, &assets));
        }
    }
}
