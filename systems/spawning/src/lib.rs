#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn director that emits enemy spawn commands.
//!
//! The director owns the spawn countdown. It arms on arena configuration and
//! releases one spawn per elapse, resetting to the full interval after each
//! spawn and discarding any overshoot, so cadence never drifts faster than
//! configured. An elapse blocked by the per-wave cap holds the countdown
//! expired instead, so a spawn fires the moment the arena frees a slot.

use std::time::Duration;

use dune_defence_core::{Command, DifficultyParams, Event, Health};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawn director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically emits enemy spawn commands.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    countdown: Option<Duration>,
}

impl Spawning {
    /// Creates a new spawn director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            countdown: None,
        }
    }

    /// Consumes events and read-only session state to emit spawn commands.
    ///
    /// `weakest_lane` carries the lane of the tower with the least remaining
    /// health, when any tower stands; spawns funnel toward that lane,
    /// otherwise a uniform lane in `[0, arena_height)` is rolled.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        events: &[Event],
        params: &DifficultyParams,
        arena_height: f32,
        enemy_count: usize,
        weakest_lane: Option<f32>,
        game_over: bool,
        out: &mut Vec<Command>,
    ) {
        if game_over {
            self.countdown = None;
            return;
        }

        let mut emitted = 0usize;
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::ArenaConfigured { .. } => {
                    // A fresh session fields its first enemy right away; the
                    // countdown covers the gap to the second.
                    self.countdown = Some(params.spawn_interval);
                    let _ = self.spawn_if_below_cap(
                        params,
                        arena_height,
                        enemy_count,
                        weakest_lane,
                        &mut emitted,
                        out,
                    );
                }
                Event::TimeAdvanced { dt } => {
                    elapsed = elapsed.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if elapsed.is_zero() || params.spawn_interval.is_zero() {
            return;
        }

        let Some(remaining) = self.countdown else {
            return;
        };

        if elapsed >= remaining {
            // The countdown only rearms on an actual spawn; a cap-blocked
            // elapse stays expired so the next free slot is filled at once.
            let spawned = self.spawn_if_below_cap(
                params,
                arena_height,
                enemy_count,
                weakest_lane,
                &mut emitted,
                out,
            );
            self.countdown = Some(if spawned {
                params.spawn_interval
            } else {
                Duration::ZERO
            });
        } else {
            self.countdown = Some(remaining - elapsed);
        }
    }

    fn spawn_if_below_cap(
        &mut self,
        params: &DifficultyParams,
        arena_height: f32,
        enemy_count: usize,
        weakest_lane: Option<f32>,
        emitted: &mut usize,
        out: &mut Vec<Command>,
    ) -> bool {
        if enemy_count + *emitted >= params.enemies_per_wave as usize {
            return false;
        }

        let lane = match weakest_lane {
            Some(lane) => lane,
            None => self.roll_lane(arena_height),
        };
        let speed = self.roll_speed(params);
        out.push(Command::SpawnEnemy {
            lane,
            speed,
            health: Health::new(params.enemy_health),
        });
        *emitted += 1;
        true
    }

    fn roll_lane(&mut self, arena_height: f32) -> f32 {
        if arena_height <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..arena_height)
    }

    fn roll_speed(&mut self, params: &DifficultyParams) -> i32 {
        let min = params.enemy_speed_min;
        let max = params.enemy_speed_max.max(min);
        self.rng.gen_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_params() -> DifficultyParams {
        DifficultyParams::default()
    }

    #[test]
    fn unarmed_director_ignores_time() {
        let mut spawning = Spawning::new(Config::new(7));
        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(30),
            }],
            &default_params(),
            600.0,
            0,
            None,
            false,
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn zero_interval_never_releases_timed_spawns() {
        let mut spawning = Spawning::new(Config::new(7));
        let params = DifficultyParams {
            spawn_interval: Duration::ZERO,
            ..default_params()
        };
        spawning.countdown = Some(Duration::ZERO);

        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(1),
            }],
            &params,
            600.0,
            0,
            None,
            false,
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn cap_blocked_elapse_keeps_the_countdown_expired() {
        let mut spawning = Spawning::new(Config::new(7));
        let params = default_params();
        spawning.countdown = Some(params.spawn_interval);

        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: params.spawn_interval,
            }],
            &params,
            600.0,
            params.enemies_per_wave as usize,
            None,
            false,
            &mut commands,
        );
        assert!(commands.is_empty());
        assert_eq!(spawning.countdown, Some(Duration::ZERO));
    }

    #[test]
    fn speed_roll_collapses_to_minimum_when_bounds_invert() {
        let mut spawning = Spawning::new(Config::new(7));
        let params = DifficultyParams {
            enemy_speed_min: 5,
            enemy_speed_max: 2,
            ..default_params()
        };
        for _ in 0..20 {
            assert_eq!(spawning.roll_speed(&params), 5);
        }
    }

    #[test]
    fn degenerate_arena_height_spawns_in_lane_zero() {
        let mut spawning = Spawning::new(Config::new(7));
        assert_eq!(spawning.roll_lane(0.0), 0.0);
    }

    #[test]
    fn game_over_disarms_the_countdown() {
        let mut spawning = Spawning::new(Config::new(7));
        spawning.countdown = Some(Duration::from_millis(1));

        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(1),
            }],
            &default_params(),
            600.0,
            0,
            None,
            true,
            &mut commands,
        );
        assert!(commands.is_empty());
        assert!(spawning.countdown.is_none());
    }
}
