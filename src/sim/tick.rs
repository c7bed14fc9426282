//! Fixed timestep simulation tick
//!
//! One scheduler tick advances all three cooperating routines - the jump
//! animator, the wave spawner and the scroll loop - as explicit state
//! machines over the shared session state. No tick ever overlaps another.

use rand::Rng;

use super::collision::plankton_hitbox;
use super::state::{GamePhase, GameState, JumpState, Obstacle, ObstacleKind};
use crate::consts::*;
use crate::ms_to_ticks;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// The single activate action: jump while running, restart after game over
    pub activate: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        if input.activate {
            state.restart();
            log::info!("New session started (seed {})", state.seed);
            return;
        }
        // The scroll and spawn chains are cancelled at game over, but an
        // in-flight jump keeps settling unless tuned to freeze. Session
        // counters stay frozen either way.
        if !state.tuning.freeze_jump_on_game_over && step_ballistic(state) {
            log::debug!("Post-game-over jump settled");
        }
        return;
    }

    state.time_ticks += 1;

    advance_jump(state, input.activate);
    advance_spawner(state);
    advance_waves(state);
}

/// Jump animator: start on activate, integrate while airborne
fn advance_jump(state: &mut GameState, activate: bool) {
    match state.plankton.jump {
        JumpState::Grounded => {
            if activate {
                state.plankton.jump = JumpState::Airborne {
                    velocity: JUMP_VELOCITY,
                };
            }
        }
        // activate is ignored while airborne
        JumpState::Airborne { .. } => {
            if step_ballistic(state) {
                land(state);
            }
        }
    }
}

/// One step of discrete ballistic motion; returns true on landing
///
/// Position is clamped to the playfield top, and to ground level exactly on
/// landing.
fn step_ballistic(state: &mut GameState) -> bool {
    let JumpState::Airborne { velocity } = state.plankton.jump else {
        return false;
    };
    let ground = state.metrics.ground_level;

    state.plankton.top -= velocity;
    if state.plankton.top < 0.0 {
        state.plankton.top = 0.0;
    }

    if state.plankton.top >= ground {
        state.plankton.top = ground;
        state.plankton.jump = JumpState::Grounded;
        true
    } else {
        state.plankton.jump = JumpState::Airborne {
            velocity: velocity - JUMP_GRAVITY,
        };
        false
    }
}

/// Landing bookkeeping: every Nth landing steps the scroll speed up
fn land(state: &mut GameState) {
    state.jump_counter += 1;
    if state.jump_counter >= LANDINGS_PER_SPEEDUP {
        state.speed_base += SPEED_INCREMENT;
        state.jump_counter = 0;
        log::info!("Speed up: base speed now {:.4}", state.speed_base);
    }
}

/// Wave spawner: countdown, spawn, re-arm with a random delay
fn advance_spawner(state: &mut GameState) {
    if state.spawner.ticks_left == 0 {
        spawn_wave(state);
        let delay_ms = state
            .rng
            .random_range(SPAWN_DELAY_MIN_MS..SPAWN_DELAY_MAX_MS);
        state.spawner.ticks_left = ms_to_ticks(delay_ms);
    } else {
        state.spawner.ticks_left -= 1;
    }
}

/// Create one wave at the playfield's trailing edge
pub fn spawn_wave(state: &mut GameState) {
    let id = state.next_entity_id();
    let kind = match state.rng.random_range(0..2) {
        0 => ObstacleKind::Weak,
        _ => ObstacleKind::Strong,
    };
    let width = kind.width();
    let height = state.metrics.height * kind.height_frac();

    let num_segments = (width / (SEGMENT_WIDTH + SEGMENT_MARGIN)) as usize;
    let segments = (0..num_segments)
        .map(|_| {
            state
                .rng
                .random_range(SEGMENT_MIN_FRAC..SEGMENT_MAX_FRAC)
                * height
        })
        .collect();

    log::debug!("Spawned {kind:?} wave {id} ({num_segments} segments)");
    state.obstacles.push(Obstacle {
        id,
        kind,
        width,
        height,
        offset: 0.0,
        segments,
    });
}

/// Scroll loop: advance, score exits, then test for collision
fn advance_waves(state: &mut GameState) {
    let speed = state.scroll_speed();
    let playfield_width = state.metrics.width;

    // Waves that exit the playfield score and despawn (decoration included,
    // same record) and are excluded from this tick's collision pass.
    let mut passed = 0u32;
    state.obstacles.retain_mut(|wave| {
        wave.offset += speed;
        if wave.offset > playfield_width {
            passed += 1;
            false
        } else {
            true
        }
    });
    if passed > 0 {
        state.score += passed;
        log::debug!("Score: {}", state.score);
    }

    let hitbox = plankton_hitbox(&state.plankton, &state.tuning);
    let collided = state
        .obstacles
        .iter()
        .any(|wave| hitbox.overlaps(&wave.rect(&state.metrics)));
    if collided {
        state.phase = GamePhase::GameOver;
        log::info!("Game over at score {}", state.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Metrics;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn test_state(seed: u64) -> GameState {
        GameState::new(seed, Metrics::new(800.0, 400.0), Tuning::default())
    }

    /// State that never spawns waves, for isolating the jump machinery
    fn quiet_state(seed: u64) -> GameState {
        let mut state = test_state(seed);
        state.spawner.ticks_left = u32::MAX;
        state
    }

    fn run_ticks(state: &mut GameState, n: u32) {
        for _ in 0..n {
            tick(state, &TickInput::default());
        }
    }

    /// Activate, then tick until the character lands again
    fn complete_jump(state: &mut GameState) {
        tick(state, &TickInput { activate: true });
        let mut guard = 0;
        while state.plankton.is_airborne() {
            tick(state, &TickInput::default());
            guard += 1;
            assert!(guard < 1000, "jump never landed");
        }
    }

    /// A wave whose crest overlaps the character's hitbox at ground level
    fn colliding_wave(state: &mut GameState) -> Obstacle {
        Obstacle {
            id: state.next_entity_id(),
            kind: ObstacleKind::Strong,
            width: 60.0,
            height: 40.0,
            // left edge lands just inside the inset hitbox
            offset: state.metrics.width - (PLANKTON_LEFT + 16.0) - 60.0,
            segments: vec![20.0; 15],
        }
    }

    #[test]
    fn test_start_scenario() {
        let mut state = test_state(12345);
        tick(&mut state, &TickInput::default());

        // first wave spawns immediately; the next is pending 800-1600ms out
        assert_eq!(state.obstacles.len(), 1);
        let min = crate::ms_to_ticks(SPAWN_DELAY_MIN_MS);
        let max = crate::ms_to_ticks(SPAWN_DELAY_MAX_MS);
        assert!(state.spawner.ticks_left >= min && state.spawner.ticks_left <= max);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_base, BASE_SPEED);
    }

    #[test]
    fn test_waves_scroll_with_viewport_scaled_speed() {
        let mut state = quiet_state(1);
        spawn_wave(&mut state);
        let before = state.obstacles[0].offset;
        tick(&mut state, &TickInput::default());
        let moved = state.obstacles[0].offset - before;
        assert!((moved - 800.0 * BASE_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_score_increments_when_wave_exits() {
        let mut state = quiet_state(1);
        let mut wave = colliding_wave(&mut state);
        wave.offset = state.metrics.width - 1.0;
        state.obstacles.push(wave);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert!(state.obstacles.is_empty());
        // exiting is not a collision
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_collision_ends_run_and_halts_timers() {
        let mut state = quiet_state(1);
        state.spawner.ticks_left = 5;
        let wave = colliding_wave(&mut state);
        state.obstacles.push(wave);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        // frozen: no more scrolling, spawning, scoring or tick counting
        let offset = state.obstacles[0].offset;
        let ticks = state.time_ticks;
        run_ticks(&mut state, 200);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].offset, offset);
        assert_eq!(state.spawner.ticks_left, 5 - 1);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_jump_lands_exactly_on_ground() {
        let mut state = quiet_state(1);
        complete_jump(&mut state);
        assert_eq!(state.plankton.top, state.metrics.ground_level);
        assert_eq!(state.jump_counter, 1);
    }

    #[test]
    fn test_jump_clamps_at_playfield_top() {
        // a playfield so short the jump would overshoot the top
        let mut state = GameState::new(1, Metrics::new(800.0, 80.0), Tuning::default());
        state.spawner.ticks_left = u32::MAX;
        tick(&mut state, &TickInput { activate: true });
        let mut min_top = state.plankton.top;
        while state.plankton.is_airborne() {
            tick(&mut state, &TickInput::default());
            min_top = min_top.min(state.plankton.top);
        }
        assert_eq!(min_top, 0.0);
        assert_eq!(state.plankton.top, state.metrics.ground_level);
    }

    #[test]
    fn test_activate_ignored_while_airborne() {
        let mut spammed = quiet_state(9);
        let mut patient = quiet_state(9);

        tick(&mut spammed, &TickInput { activate: true });
        tick(&mut patient, &TickInput { activate: true });
        for _ in 0..10 {
            tick(&mut spammed, &TickInput { activate: true });
            tick(&mut patient, &TickInput::default());
        }
        assert_eq!(spammed.plankton, patient.plankton);
        assert_eq!(spammed.jump_counter, patient.jump_counter);
    }

    #[test]
    fn test_speed_up_every_seventh_landing() {
        let mut state = quiet_state(1);
        for _ in 0..6 {
            complete_jump(&mut state);
        }
        assert_eq!(state.speed_base, BASE_SPEED);
        assert_eq!(state.jump_counter, 6);

        complete_jump(&mut state);
        assert!((state.speed_base - (BASE_SPEED + SPEED_INCREMENT)).abs() < 1e-6);
        assert_eq!(state.jump_counter, 0);
    }

    #[test]
    fn test_jump_settles_after_game_over() {
        let mut state = quiet_state(1);
        tick(&mut state, &TickInput { activate: true });
        assert!(state.plankton.is_airborne());

        let wave = colliding_wave(&mut state);
        state.obstacles.push(wave);
        // one tick in the character has barely lifted off and still clips
        // the crest, so the run ends while the jump is in flight
        state.plankton.top = state.metrics.ground_level;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.plankton.is_airborne());

        // the in-flight jump keeps settling but mutates no session counters
        run_ticks(&mut state, 200);
        assert!(!state.plankton.is_airborne());
        assert_eq!(state.plankton.top, state.metrics.ground_level);
        assert_eq!(state.jump_counter, 0);
        assert_eq!(state.speed_base, BASE_SPEED);
    }

    #[test]
    fn test_frozen_jump_on_game_over_when_tuned() {
        let tuning = Tuning {
            freeze_jump_on_game_over: true,
            ..Tuning::default()
        };
        let mut state = GameState::new(1, Metrics::new(800.0, 400.0), tuning);
        state.spawner.ticks_left = u32::MAX;

        tick(&mut state, &TickInput { activate: true });
        let wave = colliding_wave(&mut state);
        state.obstacles.push(wave);
        state.plankton.top = state.metrics.ground_level;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        let frozen = state.plankton;
        run_ticks(&mut state, 50);
        assert_eq!(state.plankton, frozen);
    }

    #[test]
    fn test_activate_after_game_over_restarts() {
        let mut state = quiet_state(1);
        let wave = colliding_wave(&mut state);
        state.obstacles.push(wave);
        state.score = 0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &TickInput { activate: true });
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_base, BASE_SPEED);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawner.ticks_left, 0);
        assert_eq!(state.plankton.top, state.metrics.ground_level);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and inputs stay identical
        let mut state1 = test_state(99999);
        let mut state2 = test_state(99999);

        for i in 0..600u32 {
            let input = TickInput {
                activate: i % 70 == 0,
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(
            serde_json::to_string(&state1).unwrap(),
            serde_json::to_string(&state2).unwrap()
        );
    }

    #[test]
    fn test_serde_round_trip_preserves_behavior() {
        let mut state = test_state(4242);
        run_ticks(&mut state, 120);

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();

        run_ticks(&mut state, 120);
        run_ticks(&mut restored, 120);
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            serde_json::to_string(&restored).unwrap()
        );
    }

    proptest! {
        #[test]
        fn prop_segment_heights_in_bounds(seed in any::<u64>()) {
            let mut state = test_state(seed);
            spawn_wave(&mut state);
            let wave = &state.obstacles[0];

            let expected = (wave.width / (SEGMENT_WIDTH + SEGMENT_MARGIN)) as usize;
            prop_assert_eq!(wave.segments.len(), expected);
            for &h in &wave.segments {
                prop_assert!(h >= SEGMENT_MIN_FRAC * wave.height - 1e-3);
                prop_assert!(h <= SEGMENT_MAX_FRAC * wave.height);
            }
        }

        #[test]
        fn prop_character_stays_in_vertical_bounds(
            seed in any::<u64>(),
            presses in prop::collection::vec(any::<bool>(), 1..300),
        ) {
            let mut state = quiet_state(seed);
            for press in presses {
                tick(&mut state, &TickInput { activate: press });
                prop_assert!(state.plankton.top >= 0.0);
                prop_assert!(state.plankton.top <= state.metrics.ground_level);
            }
        }

        #[test]
        fn prop_score_never_decreases(seed in any::<u64>()) {
            let mut state = test_state(seed);
            let mut last = state.score;
            for _ in 0..2000 {
                tick(&mut state, &TickInput::default());
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
