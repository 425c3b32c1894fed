#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Dune Defence.
//!
//! The world owns every mutable piece of the session: the arena, the active
//! enemy and tower collections, the difficulty parameters, and the life,
//! neutralization and wave counters. Mutation happens exclusively through
//! [`apply`]; reads happen exclusively through [`query`]. Entities marked
//! for removal during a tick stay in place until a single compaction at the
//! end of the tick, so no scan ever skips or revisits an entity.

use dune_defence_core::{
    footprint_for_lane, Command, DifficultyParams, EnemyId, Event, HalfPoints, Health,
    PlacementError, Position, RangePolicy, TowerId, NEUTRALIZATIONS_PER_LIMIT_RAISE,
    WELCOME_BANNER,
};

const DEFAULT_ARENA_WIDTH: f32 = 800.0;
const DEFAULT_ARENA_HEIGHT: f32 = 600.0;
const DEFAULT_LIFE: u32 = 10;
const DEFAULT_MAX_TOWERS: u32 = 5;

/// Damage a tower deals to each enemy in range per tick, in points.
const ENEMY_DAMAGE: i32 = 1;

/// Self-damage a tower takes per engaged enemy per tick, in half-points.
const SELF_DAMAGE: i32 = 1;

/// Rectangular play area that enemies traverse left to right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    width: f32,
    height: f32,
}

impl Arena {
    /// Creates a new arena description.
    #[must_use]
    pub(crate) const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent in arena units; enemies breach at this coordinate.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent in arena units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EnemyFate {
    Breached,
    Neutralized,
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: Position,
    footprint: u32,
    speed: i32,
    health: Health,
    fate: Option<EnemyFate>,
}

#[derive(Clone, Debug)]
struct Tower {
    id: TowerId,
    position: Position,
    footprint: u32,
    health: HalfPoints,
    collapsed: bool,
}

impl Tower {
    /// Center of the tower's footprint; engagement distances are measured
    /// from here, matching the horizontal half-footprint offset of the
    /// rendered sprite.
    fn center(&self) -> Position {
        Position::new(
            self.position.x() + self.footprint as f32 / 2.0,
            self.position.y(),
        )
    }
}

/// Represents the authoritative Dune Defence session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    arena: Arena,
    enemies: Vec<Enemy>,
    towers: Vec<Tower>,
    difficulty: DifficultyParams,
    configured_difficulty: DifficultyParams,
    max_towers: u32,
    configured_max_towers: u32,
    life: u32,
    neutralized: u32,
    wave: u32,
    game_over: bool,
    range_policy: RangePolicy,
    next_enemy_id: u32,
    next_tower_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new Dune Defence session ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            arena: Arena::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT),
            enemies: Vec::new(),
            towers: Vec::new(),
            difficulty: DifficultyParams::default(),
            configured_difficulty: DifficultyParams::default(),
            max_towers: DEFAULT_MAX_TOWERS,
            configured_max_towers: DEFAULT_MAX_TOWERS,
            life: DEFAULT_LIFE,
            neutralized: 0,
            wave: 0,
            game_over: false,
            range_policy: RangePolicy::default(),
            next_enemy_id: 0,
            next_tower_id: 0,
            tick_index: 0,
        }
    }

    fn reset_session(&mut self, width: f32, height: f32) {
        self.arena = Arena::new(width, height);
        self.enemies.clear();
        self.towers.clear();
        self.difficulty = self.configured_difficulty;
        self.max_towers = self.configured_max_towers;
        self.life = DEFAULT_LIFE;
        self.neutralized = 0;
        self.wave = 0;
        self.game_over = false;
        self.next_enemy_id = 0;
        self.next_tower_id = 0;
        self.tick_index = 0;
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn allocate_tower_id(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.wrapping_add(1);
        id
    }

    fn spawn_enemy(&mut self, lane: f32, speed: i32, health: Health, out_events: &mut Vec<Event>) {
        let id = self.allocate_enemy_id();
        let position = Position::new(0.0, lane);
        let footprint = footprint_for_lane(lane, self.arena.height());
        self.enemies.push(Enemy {
            id,
            position,
            footprint,
            speed,
            health,
            fate: None,
        });
        out_events.push(Event::EnemySpawned {
            enemy: id,
            position,
            speed,
            health,
        });
    }

    fn place_tower(&mut self, position: Position, out_events: &mut Vec<Event>) {
        if self.game_over {
            out_events.push(Event::TowerPlacementRejected {
                position,
                reason: PlacementError::SessionOver,
            });
            return;
        }

        if self.towers.len() as u32 >= self.max_towers {
            out_events.push(Event::TowerPlacementRejected {
                position,
                reason: PlacementError::LimitReached,
            });
            return;
        }

        let id = self.allocate_tower_id();
        let footprint = footprint_for_lane(position.y(), self.arena.height());
        let health = HalfPoints::from_points(self.difficulty.tower_health);
        self.towers.push(Tower {
            id,
            position,
            footprint,
            health,
            collapsed: false,
        });
        out_events.push(Event::TowerPlaced {
            tower: id,
            position,
            health,
        });
    }

    /// Moves every enemy horizontally toward the defended edge and marks
    /// breaches. Lanes never change after spawn: the conceptual target sits
    /// at `(width, spawn_y)`, so the direction vector has no vertical
    /// component.
    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let width = self.arena.width();
        for enemy in &mut self.enemies {
            let dx = width - enemy.position.x();
            if dx > 0.0 {
                enemy.position =
                    Position::new(enemy.position.x() + enemy.speed as f32, enemy.position.y());
            }

            if enemy.position.x() >= width {
                enemy.fate = Some(EnemyFate::Breached);
                self.life = self.life.saturating_sub(1);
                out_events.push(Event::EnemyBreached {
                    enemy: enemy.id,
                    life_remaining: self.life,
                });
                if self.life == 0 {
                    self.game_over = true;
                }
            }
        }
    }

    /// Runs every tower's attack pass over the enemy collection in insertion
    /// order. A collapsing tower finishes its pass; under
    /// [`RangePolicy::Live`] its radius keeps shrinking as it drains.
    fn attack_pass(&mut self, out_events: &mut Vec<Event>) {
        for tower_index in 0..self.towers.len() {
            let center = self.towers[tower_index].center();
            let pass_range = self.towers[tower_index].health.attack_range();

            for enemy_index in 0..self.enemies.len() {
                if self.enemies[enemy_index].fate.is_some() {
                    continue;
                }

                let range = match self.range_policy {
                    RangePolicy::Live => self.towers[tower_index].health.attack_range(),
                    RangePolicy::TickStart => pass_range,
                };

                let distance = center.distance_to(self.enemies[enemy_index].position);
                if distance >= range {
                    continue;
                }

                let enemy = &mut self.enemies[enemy_index];
                enemy.health = enemy.health.damaged(ENEMY_DAMAGE);
                if enemy.health.is_depleted() {
                    enemy.fate = Some(EnemyFate::Neutralized);
                    self.neutralized += 1;
                    out_events.push(Event::EnemyNeutralized {
                        enemy: enemy.id,
                        total: self.neutralized,
                    });
                    if self.neutralized % NEUTRALIZATIONS_PER_LIMIT_RAISE == 0 {
                        self.max_towers += 1;
                        out_events.push(Event::TowerLimitRaised {
                            max_towers: self.max_towers,
                        });
                    }
                }

                let tower = &mut self.towers[tower_index];
                tower.health = tower.health.drained(SELF_DAMAGE);
                if tower.health.is_depleted() && !tower.collapsed {
                    tower.collapsed = true;
                    out_events.push(Event::TowerCollapsed { tower: tower.id });
                }
            }
        }
    }

    /// Removes every entity marked during this tick in a single pass.
    fn compact(&mut self) {
        self.enemies.retain(|enemy| enemy.fate.is_none());
        self.towers.retain(|tower| !tower.collapsed);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena { width, height } => {
            world.reset_session(width, height);
            out_events.push(Event::ArenaConfigured { width, height });
        }
        Command::ConfigureDifficulty { params } => {
            world.difficulty = params;
            world.configured_difficulty = params;
        }
        Command::ConfigureTowerLimit { max_towers } => {
            world.max_towers = max_towers;
            world.configured_max_towers = max_towers;
        }
        Command::SetRangePolicy { policy } => {
            world.range_policy = policy;
        }
        Command::Tick { dt } => {
            if world.game_over {
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            world.advance_enemies(out_events);
            world.attack_pass(out_events);
            world.compact();

            if world.game_over {
                out_events.push(Event::GameEnded {
                    neutralized: world.neutralized,
                });
            }
        }
        Command::SpawnEnemy {
            lane,
            speed,
            health,
        } => {
            if world.game_over {
                return;
            }
            world.spawn_enemy(lane, speed, health, out_events);
        }
        Command::PlaceTower { position } => {
            world.place_tower(position, out_events);
        }
        Command::AdvanceWave => {
            if world.game_over {
                return;
            }
            world.wave += 1;
            world.difficulty.escalate();
            out_events.push(Event::WaveStarted {
                wave: world.wave,
                params: world.difficulty,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Arena, World};
    use dune_defence_core::{
        DifficultyParams, EnemySnapshot, EnemyView, HudSnapshot, RangePolicy, TowerSnapshot,
        TowerView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides the arena dimensions enemies traverse.
    #[must_use]
    pub fn arena(world: &World) -> Arena {
        world.arena
    }

    /// Provides the difficulty parameters currently in force.
    #[must_use]
    pub fn difficulty(world: &World) -> DifficultyParams {
        world.difficulty
    }

    /// Provides the range policy applied during attack passes.
    #[must_use]
    pub fn range_policy(world: &World) -> RangePolicy {
        world.range_policy
    }

    /// Captures a read-only view of the enemies crossing the arena.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    footprint: enemy.footprint,
                    speed: enemy.speed,
                    health: enemy.health,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the towers defending the arena.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    position: tower.position,
                    footprint: tower.footprint,
                    health: tower.health,
                })
                .collect(),
        )
    }

    /// Aggregates the session counters shown on the HUD.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            life: world.life,
            neutralized: world.neutralized,
            wave: world.wave,
            max_towers: world.max_towers,
            tower_count: world.towers.len() as u32,
            game_over: world.game_over,
        }
    }

    /// Number of ticks the session has simulated so far.
    #[must_use]
    pub fn ticks(world: &World) -> u64 {
        world.tick_index
    }

    /// Vertical lane of the weakest active tower, if any tower stands.
    ///
    /// Ties resolve to the tower encountered first in insertion order; the
    /// spawn director uses this lane to aim new enemies at the most
    /// vulnerable defense.
    #[must_use]
    pub fn weakest_tower_lane(world: &World) -> Option<f32> {
        let mut weakest: Option<&super::Tower> = None;
        for tower in &world.towers {
            match weakest {
                Some(current) if tower.health >= current.health => {}
                _ => weakest = Some(tower),
            }
        }
        weakest.map(|tower| tower.position.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn configured_world(width: f32, height: f32) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureArena { width, height },
            &mut events,
        );
        (world, events)
    }

    #[test]
    fn apply_configures_arena_and_resets_counters() {
        let (world, events) = configured_world(1024.0, 512.0);

        let arena = query::arena(&world);
        assert_eq!(arena.width(), 1024.0);
        assert_eq!(arena.height(), 512.0);
        assert_eq!(
            events,
            vec![Event::ArenaConfigured {
                width: 1024.0,
                height: 512.0,
            }]
        );

        let hud = query::hud(&world);
        assert_eq!(hud.life, DEFAULT_LIFE);
        assert_eq!(hud.neutralized, 0);
        assert_eq!(hud.wave, 0);
        assert!(!hud.game_over);
    }

    #[test]
    fn reconfiguring_the_arena_keeps_tuned_difficulty() {
        let mut world = World::new();
        let mut events = Vec::new();
        let params = DifficultyParams {
            enemy_health: 25,
            ..DifficultyParams::default()
        };

        apply(
            &mut world,
            Command::ConfigureDifficulty { params },
            &mut events,
        );
        apply(
            &mut world,
            Command::ConfigureArena {
                width: 640.0,
                height: 480.0,
            },
            &mut events,
        );

        assert_eq!(query::difficulty(&world).enemy_health, 25);
    }

    #[test]
    fn spawned_enemy_enters_at_the_left_edge() {
        let (mut world, _) = configured_world(800.0, 600.0);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnEnemy {
                lane: 300.0,
                speed: 2,
                health: Health::new(10),
            },
            &mut events,
        );

        let enemies = query::enemy_view(&world).into_vec();
        assert_eq!(enemies.len(), 1);
        let enemy = enemies[0];
        assert_eq!(enemy.position, Position::new(0.0, 300.0));
        assert_eq!(enemy.footprint, 90);
        assert_eq!(
            events,
            vec![Event::EnemySpawned {
                enemy: enemy.id,
                position: enemy.position,
                speed: 2,
                health: Health::new(10),
            }]
        );
    }

    #[test]
    fn placement_respects_the_tower_limit() {
        let (mut world, _) = configured_world(800.0, 600.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureTowerLimit { max_towers: 1 },
            &mut events,
        );

        apply(
            &mut world,
            Command::PlaceTower {
                position: Position::new(100.0, 100.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceTower {
                position: Position::new(200.0, 200.0),
            },
            &mut events,
        );

        assert_eq!(query::tower_view(&world).len(), 1);
        assert!(matches!(
            events.last(),
            Some(Event::TowerPlacementRejected {
                reason: PlacementError::LimitReached,
                ..
            })
        ));
    }

    #[test]
    fn wave_advancement_escalates_difficulty() {
        let (mut world, _) = configured_world(800.0, 600.0);
        let mut events = Vec::new();
        let before = query::difficulty(&world);

        apply(&mut world, Command::AdvanceWave, &mut events);

        let after = query::difficulty(&world);
        assert_eq!(after.enemy_speed_max, before.enemy_speed_max + 1);
        assert_eq!(after.enemies_per_wave, before.enemies_per_wave + 1);
        assert_eq!(after.tower_health, before.tower_health + 5);
        assert_eq!(
            events,
            vec![Event::WaveStarted {
                wave: 1,
                params: after,
            }]
        );
    }

    #[test]
    fn weakest_tower_lane_prefers_first_on_ties() {
        let (mut world, _) = configured_world(800.0, 600.0);
        let mut events = Vec::new();
        for y in [120.0, 240.0, 360.0] {
            apply(
                &mut world,
                Command::PlaceTower {
                    position: Position::new(400.0, y),
                },
                &mut events,
            );
        }

        // All towers share the baseline health, so the first one wins.
        assert_eq!(query::weakest_tower_lane(&world), Some(120.0));
    }

    #[test]
    fn weakest_tower_lane_is_absent_without_towers() {
        let (world, _) = configured_world(800.0, 600.0);
        assert_eq!(query::weakest_tower_lane(&world), None);
    }

    #[test]
    fn tick_is_a_no_op_once_terminal() {
        let (mut world, _) = configured_world(100.0, 100.0);
        world.life = 1;
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnEnemy {
                lane: 50.0,
                speed: 200,
                health: Health::new(5),
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert!(query::hud(&world).game_over);
        assert!(events.contains(&Event::GameEnded { neutralized: 0 }));

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert!(events.is_empty(), "terminal ticks must not emit events");
    }
}
