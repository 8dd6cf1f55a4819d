//! Reading boards from command-line text and from an interactive terminal.

use std::io::{self, BufRead, Write};

use crate::error::{PuzzleError, Result};
use crate::puzzle::{Board, SIZE, TILE_COUNT};

fn parse_tiles(text: &str) -> Result<Vec<i64>> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '/'))
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| PuzzleError::InvalidToken(token.to_string()))
        })
        .collect()
}

/// Parses nine labels in row-major order, e.g. `"1 2 3 / 4 5 6 / 7 8 0"`.
/// Whitespace, commas, semicolons and slashes all separate labels.
pub fn parse_board(text: &str) -> Result<Board> {
    Board::from_flat(&parse_tiles(text)?)
}

/// Asks for a board one row at a time. A malformed row is asked for again;
/// a board that is not a permutation of 0-8 is asked for again from the top.
pub fn prompt_board<R: BufRead, W: Write>(input: &mut R, output: &mut W, title: &str) -> Result<Board> {
    writeln!(output, "{}", title)?;
    loop {
        let mut values = Vec::with_capacity(TILE_COUNT);
        for row in 0..SIZE {
            let tiles = loop {
                write!(output, "Row {}: ", row + 1)?;
                output.flush()?;

                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
                }
                match parse_tiles(&line) {
                    Ok(tiles) if tiles.len() == SIZE => break tiles,
                    Ok(tiles) => writeln!(
                        output,
                        "  {}",
                        PuzzleError::WrongTileCount {
                            expected: SIZE,
                            found: tiles.len()
                        }
                    )?,
                    Err(err) => writeln!(output, "  {}", err)?,
                }
            };
            values.extend(tiles);
        }

        match Board::from_flat(&values) {
            Ok(board) => return Ok(board),
            Err(err) => writeln!(output, "  {}; enter the whole board again", err)?,
        }
    }
}
