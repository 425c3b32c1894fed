#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Dune Defence adapters.

use anyhow::Result as AnyResult;
use dune_defence_core::{EnemyId, EnemyView, HudSnapshot, TowerId, TowerView};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Sand-toned clear color matching the dune backdrop.
pub const ARENA_COLOR: Color = Color::from_rgb_u8(0xda, 0xc0, 0x8a);
/// Fill color used for enemy bodies.
pub const ENEMY_COLOR: Color = Color::from_rgb_u8(0x8a, 0x3b, 0x1f);
/// Fill color used for tower bodies.
pub const TOWER_COLOR: Color = Color::from_rgb_u8(0x2f, 0x5d, 0x3a);
/// Stroke color used for tower range rings.
pub const RANGE_RING_COLOR: Color = Color::from_rgb_u8(0x00, 0x80, 0x80);
/// Color used for health labels drawn above entities.
pub const LABEL_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in arena units, when over the arena.
    pub cursor: Option<Vec2>,
    /// Whether the adapter detected a placement request on this frame.
    pub place_action: bool,
}

impl FrameInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(cursor: Option<Vec2>, place_action: bool) -> Self {
        Self {
            cursor,
            place_action,
        }
    }
}

/// Arena backdrop covering the playable area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaPresentation {
    /// Horizontal extent of the arena in arena units.
    pub width: f32,
    /// Vertical extent of the arena in arena units.
    pub height: f32,
    /// Solid fill standing in for the dune backdrop.
    pub color: Color,
}

impl ArenaPresentation {
    /// Creates a new arena backdrop descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidArena`] when either extent is not
    /// strictly positive.
    pub fn new(width: f32, height: f32, color: Color) -> Result<Self, RenderingError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(RenderingError::InvalidArena { width, height });
        }

        Ok(Self {
            width,
            height,
            color,
        })
    }
}

/// Drawable enemy expressed in arena units.
///
/// The body is a square of `footprint` extent centered vertically on the
/// lane, with the health label floating above it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier of the presented enemy.
    pub id: EnemyId,
    /// Top-left anchor of the body square.
    pub anchor: Vec2,
    /// Edge length of the body square.
    pub footprint: f32,
    /// Remaining health shown on the label.
    pub health: i32,
    /// Fill color of the body.
    pub color: Color,
}

/// Drawable tower expressed in arena units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier of the presented tower.
    pub id: TowerId,
    /// Top-left anchor of the body square.
    pub anchor: Vec2,
    /// Edge length of the body square.
    pub footprint: f32,
    /// Remaining health shown on the label, in whole points.
    pub health: f32,
    /// Center of the range ring, offset to the footprint middle.
    pub ring_center: Vec2,
    /// Radius of the range ring.
    pub range: f32,
    /// Fill color of the body.
    pub color: Color,
}

/// Scene description combining the arena backdrop and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Arena backdrop that frames the play area.
    pub arena: ArenaPresentation,
    /// Enemies currently marching across the arena.
    pub enemies: Vec<EnemyPresentation>,
    /// Towers currently standing in the arena.
    pub towers: Vec<TowerPresentation>,
    /// Session counters shown by the HUD overlay.
    pub hud: HudSnapshot,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        arena: ArenaPresentation,
        enemies: Vec<EnemyPresentation>,
        towers: Vec<TowerPresentation>,
        hud: HudSnapshot,
    ) -> Self {
        Self {
            arena,
            enemies,
            towers,
            hud,
        }
    }

    /// Replaces the scene's inhabitants and HUD from fresh world snapshots.
    ///
    /// Entity squares are anchored at `(x, lane - footprint / 2)` so bodies
    /// stay vertically centered on their lane, and tower range rings sit at
    /// the footprint's horizontal middle. `baseline_tower_health` is the
    /// current difficulty baseline; tower fills lighten toward white as
    /// their health drains below it.
    pub fn sync(
        &mut self,
        enemies: &EnemyView,
        towers: &TowerView,
        hud: HudSnapshot,
        baseline_tower_health: u32,
    ) {
        self.enemies.clear();
        for snapshot in enemies.iter() {
            let footprint = snapshot.footprint as f32;
            self.enemies.push(EnemyPresentation {
                id: snapshot.id,
                anchor: Vec2::new(
                    snapshot.position.x(),
                    snapshot.position.y() - footprint / 2.0,
                ),
                footprint,
                health: snapshot.health.get(),
                color: ENEMY_COLOR,
            });
        }

        self.towers.clear();
        for snapshot in towers.iter() {
            let footprint = snapshot.footprint as f32;
            let baseline = (baseline_tower_health as f32).max(1.0);
            let damage = 1.0 - (snapshot.health.points() / baseline).clamp(0.0, 1.0);
            self.towers.push(TowerPresentation {
                id: snapshot.id,
                anchor: Vec2::new(
                    snapshot.position.x(),
                    snapshot.position.y() - footprint / 2.0,
                ),
                footprint,
                health: snapshot.health.points(),
                ring_center: Vec2::new(
                    snapshot.position.x() + footprint / 2.0,
                    snapshot.position.y(),
                ),
                range: snapshot.range(),
                color: TOWER_COLOR.lighten(damage),
            });
        }

        self.hud = hud;
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Dune Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame
    /// delta and per-frame input captured by the adapter, and may mutate the
    /// scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Arena extents must be strictly positive to frame a scene.
    InvalidArena {
        /// Provided horizontal extent that failed validation.
        width: f32,
        /// Provided vertical extent that failed validation.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArena { width, height } => {
                write!(f, "arena extents must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use dune_defence_core::{EnemySnapshot, HalfPoints, Health, Position, TowerSnapshot};

    fn empty_hud() -> HudSnapshot {
        HudSnapshot {
            life: 10,
            neutralized: 0,
            wave: 0,
            max_towers: 5,
            tower_count: 0,
            game_over: false,
        }
    }

    #[test]
    fn arena_creation_rejects_non_positive_extents() {
        let error = ArenaPresentation::new(0.0, 600.0, ARENA_COLOR)
            .expect_err("zero width must be rejected");
        assert!(matches!(error, RenderingError::InvalidArena { .. }));
    }

    #[test]
    fn sync_centers_bodies_on_their_lane() {
        let arena = ArenaPresentation::new(800.0, 600.0, ARENA_COLOR).expect("valid arena");
        let mut scene = Scene::new(arena, Vec::new(), Vec::new(), empty_hud());

        let enemies = EnemyView::from_snapshots(vec![EnemySnapshot {
            id: EnemyId::new(0),
            position: Position::new(40.0, 300.0),
            footprint: 90,
            speed: 2,
            health: Health::new(10),
        }]);
        let towers = TowerView::from_snapshots(vec![TowerSnapshot {
            id: TowerId::new(0),
            position: Position::new(200.0, 300.0),
            footprint: 90,
            health: HalfPoints::from_points(100),
        }]);

        scene.sync(&enemies, &towers, empty_hud(), 100);

        assert_eq!(scene.enemies[0].anchor, Vec2::new(40.0, 255.0));
        assert_eq!(scene.towers[0].anchor, Vec2::new(200.0, 255.0));
        assert_eq!(scene.towers[0].ring_center, Vec2::new(245.0, 300.0));
        assert_eq!(scene.towers[0].range, 320.0);
    }

    #[test]
    fn sync_lightens_towers_as_health_drains() {
        let arena = ArenaPresentation::new(800.0, 600.0, ARENA_COLOR).expect("valid arena");
        let mut scene = Scene::new(arena, Vec::new(), Vec::new(), empty_hud());

        let towers = TowerView::from_snapshots(vec![
            TowerSnapshot {
                id: TowerId::new(0),
                position: Position::new(200.0, 300.0),
                footprint: 90,
                health: HalfPoints::from_points(100),
            },
            TowerSnapshot {
                id: TowerId::new(1),
                position: Position::new(400.0, 300.0),
                footprint: 90,
                health: HalfPoints::from_half_points(100),
            },
        ]);
        scene.sync(&EnemyView::default(), &towers, empty_hud(), 100);

        // Undamaged towers keep the base fill; a half-drained one sits
        // halfway to white.
        assert_eq!(scene.towers[0].color, TOWER_COLOR);
        assert_eq!(scene.towers[1].color, TOWER_COLOR.lighten(0.5));
    }

    #[test]
    fn lighten_saturates_at_white() {
        let color = Color::from_rgb_u8(10, 20, 30).lighten(2.0);
        assert_eq!(color, Color::new(1.0, 1.0, 1.0, 1.0));
    }
}
