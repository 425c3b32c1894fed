#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Event-fed session metrics surfaced to adapters for end-of-run summaries.

use dune_defence_core::Event;

/// Aggregated metrics describing everything observed over a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Number of simulation ticks observed.
    pub ticks: u64,
    /// Enemies that entered the arena.
    pub spawned: u32,
    /// Enemies that crossed the defended edge.
    pub breached: u32,
    /// Enemies neutralized by tower fire.
    pub neutralized: u32,
    /// Towers placed into the arena.
    pub towers_placed: u32,
    /// Towers lost to self-damage collapse.
    pub towers_lost: u32,
    /// Placement requests the session refused.
    pub placements_rejected: u32,
    /// Waves survived before the session ended.
    pub waves: u32,
    /// Indicates the session reached its terminal state.
    pub game_over: bool,
}

/// Pure system that folds broadcast events into a running session report.
#[derive(Clone, Copy, Debug, Default)]
pub struct Analytics {
    report: SessionReport,
}

impl Analytics {
    /// Creates a new analytics system with zeroed tallies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the metrics accumulated so far.
    #[must_use]
    pub fn report(&self) -> SessionReport {
        self.report
    }

    /// Folds a batch of broadcast events into the running tallies.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ArenaConfigured { .. } => self.report = SessionReport::default(),
                Event::TimeAdvanced { .. } => self.report.ticks += 1,
                Event::EnemySpawned { .. } => self.report.spawned += 1,
                Event::EnemyBreached { .. } => self.report.breached += 1,
                Event::EnemyNeutralized { .. } => self.report.neutralized += 1,
                Event::TowerPlaced { .. } => self.report.towers_placed += 1,
                Event::TowerCollapsed { .. } => self.report.towers_lost += 1,
                Event::TowerPlacementRejected { .. } => self.report.placements_rejected += 1,
                Event::WaveStarted { wave, .. } => self.report.waves = *wave,
                Event::GameEnded { .. } => self.report.game_over = true,
                Event::TowerLimitRaised { .. } => {}
            }
        }
    }
}
