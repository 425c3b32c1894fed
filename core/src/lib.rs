#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dune Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! to react to deterministically. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dune Defence.";

/// Fixed simulated duration of a single display-driven tick.
///
/// The original experience assumes a ~60 Hz callback and decrements its
/// countdowns by this constant regardless of wall-clock time; drivers feed
/// the same constant into [`Command::Tick`].
pub const FRAME_TICK: Duration = Duration::from_millis(16);

/// Additive component of a tower's attack radius in arena units.
pub const RANGE_OFFSET: i32 = 120;

/// Smallest entity footprint, used for entities spawned at the arena top.
pub const MIN_FOOTPRINT: u32 = 60;

/// Largest entity footprint, used for entities spawned at the arena bottom.
pub const MAX_FOOTPRINT: u32 = 120;

/// Number of neutralizations that raises the tower cap by one.
pub const NEUTRALIZATIONS_PER_LIMIT_RAISE: u32 = 50;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the session over an arena with the provided dimensions.
    ConfigureArena {
        /// Horizontal extent of the arena in arena units.
        width: f32,
        /// Vertical extent of the arena in arena units.
        height: f32,
    },
    /// Overwrites every tunable difficulty parameter at once.
    ConfigureDifficulty {
        /// Replacement parameter set applied without validation.
        params: DifficultyParams,
    },
    /// Overwrites the maximum number of simultaneously active towers.
    ConfigureTowerLimit {
        /// Replacement cap on the active tower count.
        max_towers: u32,
    },
    /// Selects how tower ranges react to self-damage within a tick.
    SetRangePolicy {
        /// Policy the world should apply during subsequent attack passes.
        policy: RangePolicy,
    },
    /// Advances the simulation by one tick.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new enemy enter the arena at the left edge.
    SpawnEnemy {
        /// Vertical lane the enemy travels along for its whole lifetime.
        lane: f32,
        /// Horizontal speed in arena units per tick.
        speed: i32,
        /// Starting health of the enemy.
        health: Health,
    },
    /// Requests placement of a tower at the provided position.
    PlaceTower {
        /// Arena position selected by the player.
        position: Position,
    },
    /// Requests advancement to the next wave, escalating difficulty.
    AdvanceWave,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the session was reset over a fresh arena.
    ArenaConfigured {
        /// Horizontal extent of the configured arena.
        width: f32,
        /// Vertical extent of the configured arena.
        height: f32,
    },
    /// Confirms that an enemy entered the arena.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Position at which the enemy entered the arena.
        position: Position,
        /// Horizontal speed rolled for the enemy.
        speed: i32,
        /// Starting health assigned to the enemy.
        health: Health,
    },
    /// Reports that an enemy crossed the defended edge.
    EnemyBreached {
        /// Identifier of the enemy that crossed.
        enemy: EnemyId,
        /// Life total remaining after the breach was charged.
        life_remaining: u32,
    },
    /// Reports that an enemy's health was depleted by tower fire.
    EnemyNeutralized {
        /// Identifier of the neutralized enemy.
        enemy: EnemyId,
        /// Running total of neutralizations for the session.
        total: u32,
    },
    /// Confirms that a tower was placed into the arena.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Position the tower occupies.
        position: Position,
        /// Starting health assigned to the tower.
        health: HalfPoints,
    },
    /// Reports that a tower placement request left the session unchanged.
    TowerPlacementRejected {
        /// Position provided in the placement request.
        position: Position,
        /// Specific policy that blocked the placement.
        reason: PlacementError,
    },
    /// Reports that a tower's health was depleted by self-damage.
    TowerCollapsed {
        /// Identifier of the collapsed tower.
        tower: TowerId,
    },
    /// Announces that the tower cap grew after a neutralization milestone.
    TowerLimitRaised {
        /// New cap on the active tower count.
        max_towers: u32,
    },
    /// Announces that a new wave began and difficulty escalated.
    WaveStarted {
        /// One-based index of the wave that just began.
        wave: u32,
        /// Difficulty parameters in force for the new wave.
        params: DifficultyParams,
    },
    /// Announces that the life total reached zero and the session froze.
    GameEnded {
        /// Enemies neutralized over the whole session.
        neutralized: u32,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Real-valued position expressed in arena units with a top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate measured from the arena's left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate measured from the arena's top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Computes the Euclidean distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }
}

/// Whole-point health carried by enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(i32);

impl Health {
    /// Creates a new health value with the provided point count.
    #[must_use]
    pub const fn new(points: i32) -> Self {
        Self(points)
    }

    /// Retrieves the remaining points, which may be negative after overkill.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the health remaining after absorbing the provided damage.
    #[must_use]
    pub const fn damaged(self, points: i32) -> Self {
        Self(self.0 - points)
    }

    /// Reports whether the health has reached or fallen below zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }
}

/// Tower health measured in half-point units.
///
/// Towers lose half a point per engaged enemy per tick; storing half-points
/// keeps that decrement integral and makes the derived attack range
/// (`2 × points + RANGE_OFFSET`) exactly `half_points + RANGE_OFFSET`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HalfPoints(i32);

impl HalfPoints {
    /// Creates a tower health value from whole points.
    #[must_use]
    pub const fn from_points(points: u32) -> Self {
        Self(points as i32 * 2)
    }

    /// Creates a tower health value directly from half-point units.
    #[must_use]
    pub const fn from_half_points(half_points: i32) -> Self {
        Self(half_points)
    }

    /// Retrieves the raw half-point count, which may be negative.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Remaining health expressed in points, including the fractional half.
    #[must_use]
    pub fn points(&self) -> f32 {
        self.0 as f32 / 2.0
    }

    /// Returns the health remaining after the provided half-point loss.
    #[must_use]
    pub const fn drained(self, half_points: i32) -> Self {
        Self(self.0 - half_points)
    }

    /// Reports whether the health has reached or fallen below zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }

    /// Attack radius derived from the remaining health.
    ///
    /// The radius shrinks as the tower takes self-damage and keeps shrinking
    /// past depletion, matching the coupling between durability and reach.
    #[must_use]
    pub fn attack_range(&self) -> f32 {
        (self.0 + RANGE_OFFSET) as f32
    }
}

/// Derives an entity footprint from its vertical spawn lane.
///
/// Entities near the arena top render small and entities near the bottom
/// render large, interpolating between [`MIN_FOOTPRINT`] and
/// [`MAX_FOOTPRINT`]. The footprint feeds back into the simulation because
/// tower engagement distances are measured from the footprint center.
#[must_use]
pub fn footprint_for_lane(lane: f32, arena_height: f32) -> u32 {
    if arena_height <= 0.0 {
        return MIN_FOOTPRINT;
    }

    let scale = (lane / arena_height).clamp(0.0, 1.0);
    let span = (MAX_FOOTPRINT - MIN_FOOTPRINT) as f32;
    MIN_FOOTPRINT + (span * scale) as u32
}

/// Tunable difficulty parameters escalated at every wave boundary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Inclusive lower bound of the enemy speed roll.
    pub enemy_speed_min: i32,
    /// Inclusive upper bound of the enemy speed roll.
    pub enemy_speed_max: i32,
    /// Cap on simultaneously active enemies while a wave is in progress.
    pub enemies_per_wave: u32,
    /// Starting health assigned to newly spawned enemies.
    pub enemy_health: i32,
    /// Baseline whole-point health assigned to newly placed towers.
    pub tower_health: u32,
    /// Countdown between consecutive enemy spawns.
    pub spawn_interval: Duration,
    /// Countdown between consecutive wave advancements.
    pub wave_interval: Duration,
}

impl DifficultyParams {
    /// Escalates the parameters in place at a wave boundary.
    ///
    /// Raises the speed ceiling and per-wave enemy cap by one and the tower
    /// health baseline by five points; every other parameter is untouched.
    pub fn escalate(&mut self) {
        self.enemy_speed_max += 1;
        self.enemies_per_wave += 1;
        self.tower_health += 5;
    }
}

impl Default for DifficultyParams {
    fn default() -> Self {
        Self {
            enemy_speed_min: 1,
            enemy_speed_max: 3,
            enemies_per_wave: 5,
            enemy_health: 10,
            tower_health: 100,
            spawn_interval: Duration::from_millis(1000),
            wave_interval: Duration::from_millis(10_000),
        }
    }
}

/// Policy governing how a tower's range reacts to self-damage mid-tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePolicy {
    /// Range is recomputed from live health for every enemy check, so the
    /// radius can shrink while a tower works through a single pass.
    #[default]
    Live,
    /// Range is captured once per tower at the start of its pass and held
    /// for every enemy check within that tick.
    TickStart,
}

/// Reasons a tower placement request may leave the session unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The active tower count already equals the configured cap.
    LimitReached,
    /// The session reached its terminal state; placements are frozen.
    SessionOver,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current arena position of the enemy.
    pub position: Position,
    /// Footprint derived from the enemy's spawn lane.
    pub footprint: u32,
    /// Horizontal speed in arena units per tick.
    pub speed: i32,
    /// Remaining health.
    pub health: Health,
}

/// Read-only snapshot describing all enemies within the arena.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Position the tower occupies.
    pub position: Position,
    /// Footprint derived from the tower's placement lane.
    pub footprint: u32,
    /// Remaining health in half-point units.
    pub health: HalfPoints,
}

impl TowerSnapshot {
    /// Attack radius derived from the snapshot's remaining health.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.health.attack_range()
    }
}

/// Read-only snapshot describing all towers placed within the arena.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Aggregated session counters surfaced to adapters every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Remaining player life, clamped at zero.
    pub life: u32,
    /// Enemies neutralized over the session so far.
    pub neutralized: u32,
    /// Waves completed so far.
    pub wave: u32,
    /// Current cap on the active tower count.
    pub max_towers: u32,
    /// Number of currently active towers.
    pub tower_count: u32,
    /// Indicates the session reached its terminal state.
    pub game_over: bool,
}

#[cfg(test)]
mod tests {
    use super::{
        footprint_for_lane, DifficultyParams, EnemyId, HalfPoints, Health, PlacementError,
        Position, RangePolicy, TowerId, MAX_FOOTPRINT, MIN_FOOTPRINT,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        assert_round_trip(&EnemyId::new(7));
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::LimitReached);
    }

    #[test]
    fn range_policy_round_trips_through_bincode() {
        assert_round_trip(&RangePolicy::TickStart);
    }

    #[test]
    fn position_round_trips_through_bincode() {
        assert_round_trip(&Position::new(120.5, 44.0));
    }

    #[test]
    fn distance_matches_euclidean_expectation() {
        let origin = Position::new(0.0, 0.0);
        let other = Position::new(3.0, 4.0);
        assert!((origin.distance_to(other) - 5.0).abs() < f32::EPSILON);
        assert!((other.distance_to(origin) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn attack_range_matches_health_coupling() {
        let full = HalfPoints::from_points(100);
        assert!((full.attack_range() - 320.0).abs() < f32::EPSILON);

        let worn = full.drained(10);
        assert!((worn.points() - 95.0).abs() < f32::EPSILON);
        assert!((worn.attack_range() - 310.0).abs() < f32::EPSILON);
    }

    #[test]
    fn attack_range_keeps_shrinking_past_depletion() {
        let collapsed = HalfPoints::from_half_points(-200);
        assert!(collapsed.is_depleted());
        assert!(collapsed.attack_range() < 0.0);
    }

    #[test]
    fn enemy_health_depletes_at_zero() {
        let health = Health::new(2);
        assert!(!health.is_depleted());
        assert!(health.damaged(2).is_depleted());
        assert!(health.damaged(3).is_depleted());
    }

    #[test]
    fn footprint_interpolates_across_the_arena() {
        assert_eq!(footprint_for_lane(0.0, 600.0), MIN_FOOTPRINT);
        assert_eq!(footprint_for_lane(600.0, 600.0), MAX_FOOTPRINT);
        assert_eq!(footprint_for_lane(300.0, 600.0), 90);
    }

    #[test]
    fn footprint_tolerates_degenerate_arena() {
        assert_eq!(footprint_for_lane(50.0, 0.0), MIN_FOOTPRINT);
        assert_eq!(footprint_for_lane(-10.0, 600.0), MIN_FOOTPRINT);
    }

    #[test]
    fn escalation_raises_only_the_documented_parameters() {
        let mut params = DifficultyParams::default();
        let before = params;
        params.escalate();

        assert_eq!(params.enemy_speed_max, before.enemy_speed_max + 1);
        assert_eq!(params.enemies_per_wave, before.enemies_per_wave + 1);
        assert_eq!(params.tower_health, before.tower_health + 5);
        assert_eq!(params.enemy_speed_min, before.enemy_speed_min);
        assert_eq!(params.enemy_health, before.enemy_health);
        assert_eq!(params.spawn_interval, before.spawn_interval);
        assert_eq!(params.wave_interval, before.wave_interval);
    }
}
