#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that escalates difficulty once the arena is cleared.
//!
//! Time keeps accumulating while enemies remain, so a wave whose interval
//! elapsed mid-fight advances the moment the last enemy leaves the arena.

use std::time::Duration;

use dune_defence_core::{Command, Event};

/// Pure system that emits wave advancement commands.
#[derive(Debug, Default)]
pub struct Waves {
    accumulator: Duration,
}

impl Waves {
    /// Creates a new wave director with an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes events and read-only session state to emit wave commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        wave_interval: Duration,
        enemy_count: usize,
        game_over: bool,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::ArenaConfigured { .. } => self.accumulator = Duration::ZERO,
                Event::TimeAdvanced { dt } => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if game_over || wave_interval.is_zero() {
            return;
        }

        if self.accumulator >= wave_interval && enemy_count == 0 {
            self.accumulator = Duration::ZERO;
            out.push(Command::AdvanceWave);
        }
    }
}
