#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that translates pointer input into tower placement commands.
//!
//! The system only filters for a usable click; the cap and terminal-state
//! policies stay with the world, which answers every request with either a
//! placement or a rejection event.

use dune_defence_core::{Command, Position};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementInput {
    /// Indicates whether the player requested a placement on this frame.
    pub place_action: bool,
    /// Arena position of the cursor, when it is over the arena.
    pub cursor: Option<Position>,
}

impl PlacementInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(place_action: bool, cursor: Option<Position>) -> Self {
        Self {
            place_action,
            cursor,
        }
    }
}

impl Default for PlacementInput {
    fn default() -> Self {
        Self {
            place_action: false,
            cursor: None,
        }
    }
}

/// System that emits placement commands for in-bounds confirmed clicks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Placement;

impl Placement {
    /// Creates a new placement system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes adapter-derived input to emit placement commands.
    pub fn handle(
        &self,
        input: PlacementInput,
        arena_width: f32,
        arena_height: f32,
        out: &mut Vec<Command>,
    ) {
        if !input.place_action {
            return;
        }

        let Some(position) = input.cursor else {
            return;
        };

        let in_bounds = position.x() >= 0.0
            && position.x() < arena_width
            && position.y() >= 0.0
            && position.y() < arena_height;
        if !in_bounds {
            return;
        }

        out.push(Command::PlaceTower { position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;

    fn emitted(input: PlacementInput) -> Vec<Command> {
        let mut commands = Vec::new();
        Placement::new().handle(input, WIDTH, HEIGHT, &mut commands);
        commands
    }

    #[test]
    fn confirmed_in_bounds_click_places() {
        let commands = emitted(PlacementInput::new(
            true,
            Some(Position::new(120.0, 340.0)),
        ));
        assert_eq!(
            commands,
            vec![Command::PlaceTower {
                position: Position::new(120.0, 340.0),
            }]
        );
    }

    #[test]
    fn unconfirmed_frames_are_silent() {
        let commands = emitted(PlacementInput::new(
            false,
            Some(Position::new(120.0, 340.0)),
        ));
        assert!(commands.is_empty());
    }

    #[test]
    fn missing_cursor_is_silent() {
        let commands = emitted(PlacementInput::new(true, None));
        assert!(commands.is_empty());
    }

    #[test]
    fn out_of_bounds_clicks_are_dropped() {
        for cursor in [
            Position::new(-1.0, 300.0),
            Position::new(WIDTH, 300.0),
            Position::new(400.0, -0.5),
            Position::new(400.0, HEIGHT),
        ] {
            let commands = emitted(PlacementInput::new(true, Some(cursor)));
            assert!(commands.is_empty(), "cursor {cursor:?} should be rejected");
        }
    }
}
