//! Text output for boards and solutions.

use crossterm::style::Stylize;
use std::fmt::Write;

use crate::puzzle::Board;
use crate::search::Solution;

const BORDER: &str = "+---+---+---+";

/// Draws `board` as a bordered grid. With `color` set, `highlight` is shown
/// in bold yellow and the other tiles in cyan.
pub fn board_grid(board: &Board, highlight: Option<u8>, color: bool) -> String {
    if !color {
        return board.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", BORDER.dark_grey());
    for row in board.rows() {
        let _ = write!(out, "{}", "|".dark_grey());
        for &tile in row {
            let cell = if tile == 0 {
                "   ".to_string()
            } else if Some(tile) == highlight {
                format!(" {} ", tile.to_string().bold().yellow())
            } else {
                format!(" {} ", tile.to_string().cyan())
            };
            let _ = write!(out, "{}{}", cell, "|".dark_grey());
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", BORDER.dark_grey());
    }
    out
}

/// Step-by-step narration: a summary line, the initial board, then every move
/// followed by the board it produces.
pub fn narrate(solution: &Solution, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Solution found in {} moves!\n", solution.move_count());

    for (i, step) in solution.steps.iter().enumerate() {
        match step.transition {
            Some(t) => {
                let _ = writeln!(out, "Step {}: Move tile {} {}", i, t.tile, t.direction);
            }
            None => {
                let _ = writeln!(out, "Initial state:");
            }
        }
        let highlight = step.transition.map(|t| t.tile);
        let _ = writeln!(out, "{}", board_grid(&step.board, highlight, color));
    }
    out
}
