#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Dune Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use dune_defence_rendering::{
    Color, EnemyPresentation, FrameInput, Presentation, RenderingBackend, Scene,
    TowerPresentation, LABEL_COLOR, RANGE_RING_COLOR,
};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use std::time::Duration;

const LABEL_FONT_SIZE: f32 = 20.0;
const HUD_FONT_SIZE: f32 = 40.0;
const GAME_OVER_FONT_SIZE: f32 = 96.0;
const RING_THICKNESS: f32 = 1.0;

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Creates a backend with default window settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the OpenGL swap interval used by the created window.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: i32) -> Self {
        self.swap_interval = Some(swap_interval);
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.arena.width.max(1.0) as i32,
            window_height: scene.arena.height.max(1.0) as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(&scene);

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = ScreenMetrics::from_scene(&scene);
                draw_arena(&scene, &metrics);
                // A terminal frame shows only the final summary over the
                // backdrop; entities and the running HUD disappear with it.
                if scene.hud.game_over {
                    draw_summary(&scene, &metrics);
                } else {
                    for tower in &scene.towers {
                        draw_tower(tower, &metrics);
                    }
                    for enemy in &scene.enemies {
                        draw_enemy(enemy, &metrics);
                    }
                    draw_hud(&scene, &metrics);
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Scale factors mapping arena units onto the current screen size.
#[derive(Clone, Copy, Debug)]
struct ScreenMetrics {
    scale_x: f32,
    scale_y: f32,
}

impl ScreenMetrics {
    fn from_scene(scene: &Scene) -> Self {
        let width = scene.arena.width.max(1.0);
        let height = scene.arena.height.max(1.0);
        Self {
            scale_x: macroquad::window::screen_width() / width,
            scale_y: macroquad::window::screen_height() / height,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(position.x * self.scale_x, position.y * self.scale_y)
    }

    fn to_arena(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x / self.scale_x, y / self.scale_y)
    }
}

fn gather_frame_input(scene: &Scene) -> FrameInput {
    let metrics = ScreenMetrics::from_scene(scene);
    let (mouse_x, mouse_y) = mouse_position();
    let cursor = metrics.to_arena(mouse_x, mouse_y);

    let in_bounds = cursor.x >= 0.0
        && cursor.x < scene.arena.width
        && cursor.y >= 0.0
        && cursor.y < scene.arena.height;
    let cursor = in_bounds.then_some(cursor);
    let place_action = is_mouse_button_pressed(MouseButton::Left);

    FrameInput::new(cursor, place_action)
}

fn draw_arena(scene: &Scene, metrics: &ScreenMetrics) {
    let size = metrics.to_screen(Vec2::new(scene.arena.width, scene.arena.height));
    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        size.x,
        size.y,
        to_macroquad_color(scene.arena.color),
    );
}

fn draw_enemy(enemy: &EnemyPresentation, metrics: &ScreenMetrics) {
    let anchor = metrics.to_screen(enemy.anchor);
    let size = Vec2::new(
        enemy.footprint * metrics.scale_x,
        enemy.footprint * metrics.scale_y,
    );
    macroquad::shapes::draw_rectangle(
        anchor.x,
        anchor.y,
        size.x,
        size.y,
        to_macroquad_color(enemy.color),
    );
    draw_label(&enemy.health.to_string(), anchor, enemy.footprint, metrics);
}

fn draw_tower(tower: &TowerPresentation, metrics: &ScreenMetrics) {
    let anchor = metrics.to_screen(tower.anchor);
    let size = Vec2::new(
        tower.footprint * metrics.scale_x,
        tower.footprint * metrics.scale_y,
    );
    macroquad::shapes::draw_rectangle(
        anchor.x,
        anchor.y,
        size.x,
        size.y,
        to_macroquad_color(tower.color),
    );

    let ring_center = metrics.to_screen(tower.ring_center);
    macroquad::shapes::draw_circle_lines(
        ring_center.x,
        ring_center.y,
        tower.range * metrics.scale_x.min(metrics.scale_y),
        RING_THICKNESS,
        to_macroquad_color(RANGE_RING_COLOR),
    );

    draw_label(&tower.health.to_string(), anchor, tower.footprint, metrics);
}

fn draw_label(text: &str, anchor: Vec2, footprint: f32, metrics: &ScreenMetrics) {
    macroquad::text::draw_text(
        text,
        anchor.x + footprint * metrics.scale_x / 2.0 - 10.0,
        anchor.y - 4.0,
        LABEL_FONT_SIZE,
        to_macroquad_color(LABEL_COLOR),
    );
}

fn draw_hud(scene: &Scene, metrics: &ScreenMetrics) {
    let hud = &scene.hud;
    let center_x = scene.arena.width * metrics.scale_x / 2.0;

    macroquad::text::draw_text(
        &format!("Life: {}", hud.life),
        center_x - 100.0,
        50.0,
        HUD_FONT_SIZE,
        macroquad::color::BLACK,
    );
    macroquad::text::draw_text(
        &format!(
            "Wave {}  Towers {}/{}",
            hud.wave, hud.tower_count, hud.max_towers
        ),
        20.0,
        50.0,
        HUD_FONT_SIZE / 2.0,
        macroquad::color::BLACK,
    );
}

fn draw_summary(scene: &Scene, metrics: &ScreenMetrics) {
    macroquad::text::draw_text(
        &format!("Enemies neutralized: {}", scene.hud.neutralized),
        scene.arena.width * metrics.scale_x / 2.0 - 500.0,
        scene.arena.height * metrics.scale_y / 2.0,
        GAME_OVER_FONT_SIZE,
        macroquad::color::BLACK,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
