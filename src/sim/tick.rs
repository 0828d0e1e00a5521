//! Simulation tick
//!
//! Advances the run by one frame: move, pick up jewels, then check alarms.

use super::collision::{captured_collectibles, first_triggered_hazard};
use super::input::HeldKeys;
use super::motion::step_avatar;
use super::state::{GameEvent, GameState, GameStatus};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement keys held this frame
    pub held: HeldKeys,
    /// Wall-clock timestamp in ms (footstep cadence only)
    pub now_ms: f64,
}

/// Advance the game state by one frame and report what happened.
///
/// Does nothing once the run is over: the avatar is frozen and no entity is
/// checked.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.status == GameStatus::GameOver {
        return events;
    }

    state.time_ticks += 1;
    state.elapsed += dt;

    let moving = step_avatar(&mut state.avatar, input.held, &state.tuning);
    if moving
        && state
            .footsteps
            .try_fire(input.now_ms, state.tuning.footstep_interval_ms)
    {
        events.push(GameEvent::Footstep);
    }

    collect_jewels(state, &mut events);
    check_alarms(state, &mut events);

    events
}

/// Pick up every jewel in reach. Each pickup is replaced right away, so the
/// jewel count never changes between ticks.
fn collect_jewels(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let GameState {
        avatar,
        registry,
        rng,
        tuning,
        score,
        ..
    } = state;

    // Highest index first: replacements are appended past every pending index
    let hits = captured_collectibles(avatar.pos, &registry.collectibles, tuning.capture_radius);
    for index in hits {
        let jewel = registry.remove_collectible(index);
        *score += 1;
        log::debug!("Jewel {} collected, score {}", jewel.id, score);
        events.push(GameEvent::Collected {
            collectible_id: jewel.id,
            score: *score,
        });

        let collectible_id = registry.spawn_collectible(rng, tuning);
        events.push(GameEvent::CollectibleSpawned { collectible_id });

        if *score % tuning.hazard_score_interval == 0 {
            let hazard_id = registry.spawn_hazard(rng, tuning);
            log::debug!(
                "Score {} reached, alarm {} armed ({} total)",
                score,
                hazard_id,
                registry.hazards.len()
            );
            events.push(GameEvent::HazardSpawned { hazard_id });
        }
    }
}

/// End the run on the first alarm in reach, including any armed this tick
fn check_alarms(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(index) = first_triggered_hazard(
        state.avatar.pos,
        &state.registry.hazards,
        state.tuning.capture_radius,
    ) else {
        return;
    };

    let hazard_id = state.registry.hazards[index].id;
    state.status = GameStatus::GameOver;
    log::info!(
        "Caught by alarm {} after {} ticks, final score {}",
        hazard_id,
        state.time_ticks,
        state.score
    );
    events.push(GameEvent::Caught { hazard_id });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Key;
    use crate::sim::registry::EntityRegistry;
    use crate::sim::tuning::Tuning;
    use glam::Vec3;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    /// A run with hand-placed entities
    fn scripted(jewels: &[Vec3], alarms: &[Vec3]) -> GameState {
        let mut registry = EntityRegistry::new();
        for &pos in jewels {
            registry.insert_collectible(pos);
        }
        for &pos in alarms {
            registry.insert_hazard(pos);
        }
        let tuning = Tuning {
            initial_collectibles: jewels.len(),
            initial_hazards: alarms.len(),
            ..Default::default()
        };
        GameState::from_parts(0, Pcg32::seed_from_u64(0), tuning, registry)
    }

    fn holding(keys: &[Key]) -> TickInput {
        let mut held = HeldKeys::new();
        for &k in keys {
            held.set(k, true);
        }
        TickInput { held, now_ms: 0.0 }
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(*e)).count()
    }

    #[test]
    fn test_capture_adjacent_jewel() {
        let far_alarm = Vec3::new(7.0, 0.05, 7.0);
        let mut state = scripted(&[Vec3::new(0.0, 0.15, 0.3)], &[far_alarm]);

        let events = tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 1);
        assert_eq!(state.registry.collectibles.len(), 1);
        assert_eq!(state.registry.hazards.len(), 1);
        assert_eq!(state.status, GameStatus::Playing);
        assert!(events.contains(&GameEvent::Collected {
            collectible_id: 1,
            score: 1
        }));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::HazardSpawned { .. })), 0);
        // The replacement is a new entity
        assert_ne!(state.registry.collectibles[0].id, 1);
    }

    #[test]
    fn test_fifth_jewel_arms_alarm() {
        let mut state = scripted(&[Vec3::new(0.2, 0.15, 0.0)], &[Vec3::new(-7.0, 0.05, 7.0)]);
        state.score = 4;

        let events = tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 5);
        assert_eq!(state.registry.hazards.len(), 2);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::HazardSpawned { .. })), 1);
    }

    #[test]
    fn test_multiple_captures_in_one_tick() {
        let jewels = [
            Vec3::new(0.1, 0.15, 0.0),
            Vec3::new(6.0, 0.15, 6.0),
            Vec3::new(0.0, 0.15, -0.2),
            Vec3::new(-0.2, 0.15, 0.1),
        ];
        let mut state = scripted(&jewels, &[]);

        let events = tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 3);
        assert_eq!(state.registry.collectibles.len(), 4);
        let scores: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Collected { score, .. } => Some(*score),
                _ => None,
            })
            .collect();
        assert_eq!(scores, vec![1, 2, 3]);
        // The far jewel survives
        assert!(state.registry.collectibles.iter().any(|e| e.id == 2));
    }

    #[test]
    fn test_zero_interval_and_bad_bound_tick() {
        let mut registry = EntityRegistry::new();
        registry.insert_collectible(Vec3::new(0.0, 0.15, 0.1));
        let tuning = Tuning {
            initial_collectibles: 1,
            initial_hazards: 0,
            hazard_score_interval: 0,
            world_bound: f32::NAN,
            ..Default::default()
        };
        let mut state = GameState::from_parts(0, Pcg32::seed_from_u64(0), tuning, registry);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 1);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::HazardSpawned { .. })), 0);

        let input = holding(&[Key::D, Key::S]);
        for _ in 0..400 {
            tick(&mut state, &input, DT);
        }
        assert!(state.avatar.pos.x <= 15.0 && state.avatar.pos.z <= 15.0);
    }

    #[test]
    fn test_exact_radius_not_touched() {
        let mut state = scripted(&[Vec3::new(0.0, 0.0, 0.5)], &[Vec3::new(0.5, 0.0, 0.0)]);

        let events = tick(&mut state, &TickInput::default(), DT);

        assert!(events.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_walk_into_alarm() {
        let mut state = scripted(&[], &[Vec3::new(0.0, 0.05, -0.8)]);
        let forward = holding(&[Key::W]);

        let mut caught_on = None;
        for i in 1..=10 {
            let events = tick(&mut state, &forward, DT);
            if events.iter().any(|e| matches!(e, GameEvent::Caught { .. })) {
                caught_on = Some(i);
                break;
            }
        }

        assert_eq!(caught_on, Some(4));
        assert_eq!(state.status, GameStatus::GameOver);
        let frozen = state.avatar;

        // Further ticks are inert
        let events = tick(&mut state, &forward, DT);
        assert!(events.is_empty());
        assert_eq!(state.avatar, frozen);
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.time_ticks, 4);
    }

    #[test]
    fn test_game_over_keeps_score() {
        let mut state = scripted(
            &[Vec3::new(0.0, 0.15, 0.2)],
            &[Vec3::new(0.0, 0.05, 0.1)],
        );

        let events = tick(&mut state, &TickInput::default(), DT);

        // Jewel resolves first, then the alarm
        assert_eq!(state.score, 1);
        assert_eq!(state.status, GameStatus::GameOver);
        assert!(matches!(events.last(), Some(GameEvent::Caught { hazard_id: 2 })));

        state.registry.insert_collectible(Vec3::ZERO);
        tick(&mut state, &holding(&[Key::D]), DT);
        assert_eq!(state.score, 1);
        assert_eq!(state.avatar.pos, Vec3::ZERO);
    }

    #[test]
    fn test_diagonal_tick() {
        let mut state = scripted(&[], &[]);
        tick(&mut state, &holding(&[Key::W, Key::A]), DT);
        assert!((state.avatar.pos.x + 0.1).abs() < 1e-6);
        assert!((state.avatar.pos.z + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_footstep_cadence_by_wall_clock() {
        let mut state = scripted(&[], &[]);
        let mut steps = 0;
        for i in 0..63 {
            let input = TickInput {
                held: HeldKeys::new().with(Key::S),
                now_ms: i as f64 * 16.0,
            };
            let events = tick(&mut state, &input, DT);
            steps += count(&events, |e| *e == GameEvent::Footstep);
        }
        // 0, 304, 608, 912
        assert_eq!(steps, 4);
    }

    #[test]
    fn test_no_footstep_standing_still() {
        let mut state = scripted(&[], &[]);
        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(events.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            holding(&[Key::W]),
            holding(&[Key::W, Key::D]),
            holding(&[Key::ArrowLeft]),
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, DT);
                tick(&mut state2, input, DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.avatar, state2.avatar);
        assert_eq!(state1.registry.collectibles, state2.registry.collectibles);
        assert_eq!(state1.registry.hazards, state2.registry.hazards);
    }

    proptest! {
        #[test]
        fn prop_run_invariants(
            seed in any::<u64>(),
            keys in proptest::collection::vec(any::<u8>(), 1..400),
        ) {
            // A generous radius so random walks actually pick things up
            let tuning = Tuning {
                capture_radius: 1.5,
                initial_collectibles: 30,
                initial_hazards: 1,
                ..Default::default()
            };
            let mut state = GameState::with_tuning(seed, tuning);
            let jewel_count = state.registry.collectibles.len();

            for (i, bits) in keys.into_iter().enumerate() {
                let input = TickInput {
                    held: HeldKeys::from_bits(bits),
                    now_ms: i as f64 * 16.6,
                };
                let was_over = state.is_game_over();
                let before = (state.avatar, state.score, state.status);

                let events = tick(&mut state, &input, DT);

                if was_over {
                    prop_assert!(events.is_empty());
                    prop_assert_eq!((state.avatar, state.score, state.status), before);
                    continue;
                }

                let bound = state.tuning.world_bound;
                prop_assert!(state.avatar.pos.x.abs() <= bound);
                prop_assert!(state.avatar.pos.z.abs() <= bound);
                prop_assert_eq!(state.registry.collectibles.len(), jewel_count);
                prop_assert_eq!(
                    state.registry.hazards.len(),
                    state.tuning.expected_hazards(state.score)
                );

                let collected = count(&events, |e| matches!(e, GameEvent::Collected { .. }));
                prop_assert_eq!(state.score, before.1 + collected as u64);
            }
        }
    }
}
