#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Dune Defence experience.

mod tuning_transfer;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dune_defence_core::{Command, DifficultyParams, Event, Position, RangePolicy, FRAME_TICK};
use dune_defence_rendering::{
    ArenaPresentation, FrameInput, Presentation, RenderingBackend, Scene, ARENA_COLOR,
};
use dune_defence_rendering_macroquad::MacroquadBackend;
use dune_defence_system_analytics::Analytics;
use dune_defence_system_placement::{Placement, PlacementInput};
use dune_defence_system_spawning::{Config as SpawningConfig, Spawning};
use dune_defence_system_waves::Waves;
use dune_defence_world::{self as world, query, World};

use crate::tuning_transfer::TuningSnapshot;

/// Command-line arguments accepted by the Dune Defence binary.
#[derive(Debug, Parser)]
#[command(name = "dune-defence", about = "Tower defence on the dunes")]
struct Args {
    /// Run without a window for the given number of ticks and print a summary.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Seed for the deterministic spawn director.
    #[arg(long, default_value_t = 0x4d59_5df4_d0f3_3173)]
    seed: u64,

    /// Horizontal arena extent in arena units.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Vertical arena extent in arena units.
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Tuning preset string produced by `--emit-preset`.
    #[arg(long, value_name = "PRESET")]
    preset: Option<String>,

    /// Print the effective tuning as a shareable preset string and exit.
    #[arg(long)]
    emit_preset: bool,

    /// Milliseconds between consecutive enemy spawns.
    #[arg(long, value_name = "MS")]
    spawn_interval_ms: Option<u64>,

    /// Milliseconds between consecutive wave advancements.
    #[arg(long, value_name = "MS")]
    wave_interval_ms: Option<u64>,

    /// Starting health assigned to newly spawned enemies.
    #[arg(long)]
    enemy_health: Option<i32>,

    /// Baseline health assigned to newly placed towers.
    #[arg(long)]
    tower_health: Option<u32>,

    /// Cap on simultaneously active enemies while a wave is in progress.
    #[arg(long)]
    enemies_per_wave: Option<u32>,

    /// Inclusive lower bound of the enemy speed roll.
    #[arg(long)]
    speed_min: Option<i32>,

    /// Inclusive upper bound of the enemy speed roll.
    #[arg(long)]
    speed_max: Option<i32>,

    /// Cap on simultaneously active towers.
    #[arg(long)]
    max_towers: Option<u32>,

    /// How tower ranges react to self-damage within a tick.
    #[arg(long, value_enum)]
    range_policy: Option<RangePolicyArg>,
}

/// Range policy selector exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RangePolicyArg {
    /// Recompute the radius from live health for every enemy check.
    Live,
    /// Capture the radius once per tower at the start of its pass.
    TickStart,
}

impl From<RangePolicyArg> for RangePolicy {
    fn from(value: RangePolicyArg) -> Self {
        match value {
            RangePolicyArg::Live => RangePolicy::Live,
            RangePolicyArg::TickStart => RangePolicy::TickStart,
        }
    }
}

/// Effective session tuning resolved from preset and flag overrides.
#[derive(Clone, Copy, Debug)]
struct Tuning {
    width: u32,
    height: u32,
    params: DifficultyParams,
    max_towers: u32,
    range_policy: RangePolicy,
}

impl Tuning {
    fn resolve(args: &Args) -> Result<Self> {
        let mut tuning = match &args.preset {
            Some(preset) => {
                let snapshot = TuningSnapshot::decode(preset)
                    .context("failed to decode the provided tuning preset")?;
                Self {
                    width: snapshot.width,
                    height: snapshot.height,
                    params: snapshot.params,
                    max_towers: snapshot.max_towers,
                    range_policy: snapshot.range_policy,
                }
            }
            None => Self {
                width: args.width,
                height: args.height,
                params: DifficultyParams::default(),
                max_towers: 5,
                range_policy: RangePolicy::default(),
            },
        };

        if let Some(ms) = args.spawn_interval_ms {
            tuning.params.spawn_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = args.wave_interval_ms {
            tuning.params.wave_interval = Duration::from_millis(ms);
        }
        if let Some(health) = args.enemy_health {
            tuning.params.enemy_health = health;
        }
        if let Some(health) = args.tower_health {
            tuning.params.tower_health = health;
        }
        if let Some(cap) = args.enemies_per_wave {
            tuning.params.enemies_per_wave = cap;
        }
        if let Some(speed) = args.speed_min {
            tuning.params.enemy_speed_min = speed;
        }
        if let Some(speed) = args.speed_max {
            tuning.params.enemy_speed_max = speed;
        }
        if let Some(cap) = args.max_towers {
            tuning.max_towers = cap;
        }
        if let Some(policy) = args.range_policy {
            tuning.range_policy = policy.into();
        }

        Ok(tuning)
    }

    fn snapshot(&self) -> TuningSnapshot {
        TuningSnapshot {
            width: self.width,
            height: self.height,
            params: self.params,
            max_towers: self.max_towers,
            range_policy: self.range_policy,
        }
    }
}

/// Authoritative world plus the pure systems driven against it each frame.
struct Session {
    world: World,
    spawning: Spawning,
    waves: Waves,
    placement: Placement,
    analytics: Analytics,
}

impl Session {
    fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            spawning: Spawning::new(SpawningConfig::new(seed)),
            waves: Waves::new(),
            placement: Placement::new(),
            analytics: Analytics::new(),
        }
    }

    /// Applies the tuning and opens a fresh session over the arena.
    fn configure(&mut self, tuning: &Tuning) {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::ConfigureDifficulty {
                params: tuning.params,
            },
            &mut events,
        );
        world::apply(
            &mut self.world,
            Command::ConfigureTowerLimit {
                max_towers: tuning.max_towers,
            },
            &mut events,
        );
        world::apply(
            &mut self.world,
            Command::SetRangePolicy {
                policy: tuning.range_policy,
            },
            &mut events,
        );
        world::apply(
            &mut self.world,
            Command::ConfigureArena {
                width: tuning.width as f32,
                height: tuning.height as f32,
            },
            &mut events,
        );
        self.pump(events);
    }

    /// Advances the session by one fixed frame tick.
    fn tick(&mut self, input: PlacementInput) {
        let mut events = Vec::new();

        let arena = query::arena(&self.world);
        let mut commands = Vec::new();
        self.placement
            .handle(input, arena.width(), arena.height(), &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::Tick { dt: FRAME_TICK }, &mut events);
        self.pump(events);
    }

    /// Feeds a world event batch through the directors and analytics,
    /// applying any commands they emit.
    fn pump(&mut self, events: Vec<Event>) {
        self.analytics.handle(&events);

        let difficulty = query::difficulty(&self.world);
        let arena = query::arena(&self.world);
        let hud = query::hud(&self.world);
        let enemy_count = query::enemy_view(&self.world).len();

        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            &difficulty,
            arena.height(),
            enemy_count,
            query::weakest_tower_lane(&self.world),
            hud.game_over,
            &mut commands,
        );
        self.waves.handle(
            &events,
            difficulty.wave_interval,
            enemy_count,
            hud.game_over,
            &mut commands,
        );

        let mut follow_up = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut follow_up);
        }
        self.analytics.handle(&follow_up);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let tuning = Tuning::resolve(&args)?;

    if args.emit_preset {
        println!("{}", tuning.snapshot().encode());
        return Ok(());
    }

    let mut session = Session::new(args.seed);
    session.configure(&tuning);
    println!("{}", query::welcome_banner(&session.world));

    match args.headless {
        Some(ticks) => run_headless(session, ticks),
        None => run_windowed(session, &tuning),
    }
}

fn run_headless(mut session: Session, ticks: u64) -> Result<()> {
    for _ in 0..ticks {
        session.tick(PlacementInput::default());
        if query::hud(&session.world).game_over {
            break;
        }
    }

    let report = session.analytics.report();
    println!("ticks simulated:      {}", report.ticks);
    println!("enemies spawned:      {}", report.spawned);
    println!("enemies breached:     {}", report.breached);
    println!("enemies neutralized:  {}", report.neutralized);
    println!("towers placed:        {}", report.towers_placed);
    println!("towers lost:          {}", report.towers_lost);
    println!("waves survived:       {}", report.waves);
    if report.game_over {
        println!("Enemies neutralized: {}", report.neutralized);
    }
    Ok(())
}

fn run_windowed(mut session: Session, tuning: &Tuning) -> Result<()> {
    let arena = ArenaPresentation::new(tuning.width as f32, tuning.height as f32, ARENA_COLOR)
        .context("failed to frame the arena presentation")?;
    let mut scene = Scene::new(arena, Vec::new(), Vec::new(), query::hud(&session.world));
    sync_scene(&mut scene, &session);

    let presentation = Presentation::new("Dune Defence", ARENA_COLOR, scene);
    MacroquadBackend::new().run(presentation, move |_dt, input: FrameInput, scene| {
        let cursor = input.cursor.map(|cursor| Position::new(cursor.x, cursor.y));
        session.tick(PlacementInput::new(input.place_action, cursor));
        sync_scene(scene, &session);
    })
}

fn sync_scene(scene: &mut Scene, session: &Session) {
    scene.sync(
        &query::enemy_view(&session.world),
        &query::tower_view(&session.world),
        query::hud(&session.world),
        query::difficulty(&session.world).tower_health,
    );
}
