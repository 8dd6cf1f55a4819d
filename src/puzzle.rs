use rand::{seq::SliceRandom, Rng};
use std::fmt;

use crate::error::{PuzzleError, Result};

pub const SIZE: usize = 3;
pub const TILE_COUNT: usize = SIZE * SIZE;

/// Direction the blank travels. The tile it swaps with travels the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// The cell next to `from` in this direction, if it is on the board.
    pub fn step(&self, from: (usize, usize)) -> Option<(usize, usize)> {
        let (dr, dc) = self.as_offset();
        let row = from.0.checked_add_signed(dr)?;
        let col = from.1.checked_add_signed(dc)?;
        (row < SIZE && col < SIZE).then_some((row, col))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}

/// Result of sliding the blank one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub board: Board,
    /// Where the blank ended up.
    pub blank: (usize, usize),
    /// The tile that moved into the blank's old cell.
    pub tile: u8,
}

/// A 3x3 arrangement of the labels 0-8, with 0 as the blank.
///
/// Construction validates that the labels form a permutation, so every
/// `Board` value the solver sees is well formed. Boards are `Copy` and never
/// mutated in place; a slide produces a new board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Board {
    tiles: [[u8; SIZE]; SIZE],
}

impl Board {
    pub fn new(tiles: [[u8; SIZE]; SIZE]) -> Result<Self> {
        let flat: Vec<i64> = tiles.iter().flatten().map(|&t| i64::from(t)).collect();
        Self::from_flat(&flat)
    }

    /// Builds a board from labels in row-major order.
    pub fn from_flat(values: &[i64]) -> Result<Self> {
        if values.len() != TILE_COUNT {
            return Err(PuzzleError::WrongTileCount {
                expected: TILE_COUNT,
                found: values.len(),
            });
        }

        let mut seen = [false; TILE_COUNT];
        let mut tiles = [[0u8; SIZE]; SIZE];
        for (i, &value) in values.iter().enumerate() {
            let tile = u8::try_from(value)
                .ok()
                .filter(|&t| usize::from(t) < TILE_COUNT)
                .ok_or(PuzzleError::TileOutOfRange(value))?;
            if seen[usize::from(tile)] {
                return Err(PuzzleError::DuplicateTile(tile));
            }
            seen[usize::from(tile)] = true;
            tiles[i / SIZE][i % SIZE] = tile;
        }

        Ok(Self { tiles })
    }

    /// Tiles 1-8 in order with the blank in the bottom-right corner.
    pub fn solved() -> Self {
        let mut tiles = [[0u8; SIZE]; SIZE];
        for i in 0..TILE_COUNT - 1 {
            tiles[i / SIZE][i % SIZE] = (i + 1) as u8;
        }
        Self { tiles }
    }

    pub fn rows(&self) -> &[[u8; SIZE]; SIZE] {
        &self.tiles
    }

    pub fn blank_position(&self) -> (usize, usize) {
        self.positions()[0]
    }

    /// Coordinates of every label, indexed by label.
    pub fn positions(&self) -> [(usize, usize); TILE_COUNT] {
        let mut positions = [(0, 0); TILE_COUNT];
        for (i, row) in self.tiles.iter().enumerate() {
            for (j, &tile) in row.iter().enumerate() {
                positions[usize::from(tile)] = (i, j);
            }
        }
        positions
    }

    /// Slides the blank, currently at `blank`, one cell in `direction`.
    /// Returns `None` if that would leave the board.
    pub fn slide(&self, blank: (usize, usize), direction: Move) -> Option<Slide> {
        let (row, col) = direction.step(blank)?;
        let mut tiles = self.tiles;
        let tile = tiles[row][col];
        tiles[blank.0][blank.1] = tile;
        tiles[row][col] = 0;

        Some(Slide {
            board: Self { tiles },
            blank: (row, col),
            tile,
        })
    }

    /// Sum over non-blank tiles of the row and column distance to where
    /// that tile sits in `goal`. Admissible and consistent for this puzzle.
    pub fn manhattan_distance(&self, goal: &Board) -> u32 {
        let targets = goal.positions();
        let mut distance = 0;
        for (i, row) in self.tiles.iter().enumerate() {
            for (j, &tile) in row.iter().enumerate() {
                if tile != 0 {
                    let (gi, gj) = targets[usize::from(tile)];
                    distance += i.abs_diff(gi) + j.abs_diff(gj);
                }
            }
        }
        distance as u32
    }

    /// Pairs of non-blank tiles out of ascending order, reading row-major.
    pub fn count_inversions(&self) -> usize {
        let flattened: Vec<u8> = self.tiles.iter().flatten().copied().collect();
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }

    /// Even inversion parity. On an odd-width board two arrangements are
    /// mutually reachable exactly when this agrees for both.
    pub fn is_solvable(&self) -> bool {
        self.count_inversions() % 2 == 0
    }

    /// Applies `moves` random blank slides, never directly undoing the previous one.
    pub fn scramble<R: Rng + ?Sized>(&self, moves: usize, rng: &mut R) -> Self {
        let mut board = *self;
        let mut blank = board.blank_position();
        let mut last: Option<Move> = None;

        for _ in 0..moves {
            let options: Vec<(Move, Slide)> = Move::ALL
                .iter()
                .filter(|&&dir| last != Some(dir.opposite()))
                .filter_map(|&dir| board.slide(blank, dir).map(|slide| (dir, slide)))
                .collect();
            let Some(&(dir, slide)) = options.choose(rng) else {
                break;
            };
            last = Some(dir);
            board = slide.board;
            blank = slide.blank;
        }

        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::solved()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+---+---+---+")?;
        for row in &self.tiles {
            write!(f, "|")?;
            for &val in row {
                if val == 0 {
                    write!(f, "   |")?;
                } else {
                    write!(f, " {} |", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+---+---+---+")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(tiles: [[u8; 3]; 3]) -> Board {
        Board::new(tiles).unwrap()
    }

    #[test]
    fn solved_board_layout() {
        assert_eq!(Board::solved(), board([[1, 2, 3], [4, 5, 6], [7, 8, 0]]));
        assert_eq!(Board::solved().blank_position(), (2, 2));
    }

    #[test]
    fn rejects_malformed_boards() {
        assert!(matches!(
            Board::from_flat(&[1, 2, 3]),
            Err(PuzzleError::WrongTileCount { expected: 9, found: 3 })
        ));
        assert!(matches!(
            Board::from_flat(&[1, 2, 3, 4, 5, 6, 7, 9, 0]),
            Err(PuzzleError::TileOutOfRange(9))
        ));
        assert!(matches!(
            Board::from_flat(&[1, 2, 3, 4, 5, 6, 7, -1, 0]),
            Err(PuzzleError::TileOutOfRange(-1))
        ));
        assert!(matches!(
            Board::new([[1, 2, 3], [4, 5, 6], [7, 7, 0]]),
            Err(PuzzleError::DuplicateTile(7))
        ));
    }

    #[test]
    fn slide_swaps_blank_with_neighbour() {
        let start = board([[1, 2, 3], [4, 5, 6], [7, 0, 8]]);
        let slide = start.slide((2, 1), Move::Right).unwrap();
        assert_eq!(slide.board, Board::solved());
        assert_eq!(slide.tile, 8);
        assert_eq!(slide.blank, (2, 2));

        assert!(start.slide((2, 1), Move::Down).is_none());
        // the source board is untouched
        assert_eq!(start.rows()[2][1], 0);
    }

    #[test]
    fn step_stays_in_bounds() {
        assert_eq!(Move::Up.step((0, 0)), None);
        assert_eq!(Move::Left.step((0, 0)), None);
        assert_eq!(Move::Down.step((2, 2)), None);
        assert_eq!(Move::Right.step((1, 2)), None);
        assert_eq!(Move::Down.step((0, 0)), Some((1, 0)));
        assert_eq!(Move::Left.step((1, 1)), Some((1, 0)));
    }

    #[test]
    fn manhattan_of_board_against_itself_is_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let b = Board::solved().scramble(30, &mut rng);
            assert_eq!(b.manhattan_distance(&b), 0);
        }
    }

    #[test]
    fn manhattan_known_values() {
        let goal = Board::solved();
        let one_away = board([[1, 2, 3], [4, 5, 6], [7, 0, 8]]);
        assert_eq!(one_away.manhattan_distance(&goal), 1);

        // every tile as far as it can be from its goal cell
        let reversed = board([[0, 8, 7], [6, 5, 4], [3, 2, 1]]);
        assert_eq!(reversed.manhattan_distance(&goal), 20);
    }

    #[test]
    fn manhattan_is_bounded_and_symmetric() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let a = Board::solved().scramble(40, &mut rng);
            let b = Board::solved().scramble(40, &mut rng);
            let d = a.manhattan_distance(&b);
            assert!(d <= 4 * 8);
            assert_eq!(d, b.manhattan_distance(&a));
        }
    }

    #[test]
    fn inversions_and_parity() {
        assert_eq!(Board::solved().count_inversions(), 0);
        assert!(Board::solved().is_solvable());

        let swapped = board([[2, 1, 3], [4, 5, 6], [7, 8, 0]]);
        assert_eq!(swapped.count_inversions(), 1);
        assert!(!swapped.is_solvable());
    }

    #[test]
    fn swapping_two_tiles_flips_parity() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let b = Board::solved().scramble(25, &mut rng);
            let mut tiles = *b.rows();
            let cells: Vec<(usize, usize)> = (0..TILE_COUNT)
                .map(|i| (i / SIZE, i % SIZE))
                .filter(|&(r, c)| tiles[r][c] != 0)
                .take(2)
                .collect();
            let (a, c) = (cells[0], cells[1]);
            let tmp = tiles[a.0][a.1];
            tiles[a.0][a.1] = tiles[c.0][c.1];
            tiles[c.0][c.1] = tmp;

            assert_ne!(board(tiles).is_solvable(), b.is_solvable());
        }
    }

    #[test]
    fn blank_slides_never_change_parity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut b = Board::solved();
        for _ in 0..200 {
            let blank = b.blank_position();
            let slides: Vec<Slide> = Move::ALL.iter().filter_map(|&m| b.slide(blank, m)).collect();
            let next = slides.choose(&mut rng).unwrap().board;
            assert_eq!(next.is_solvable(), b.is_solvable());
            b = next;
        }
    }

    #[test]
    fn scramble_is_reproducible_and_stays_close() {
        let goal = Board::solved();
        let a = goal.scramble(20, &mut StdRng::seed_from_u64(42));
        let b = goal.scramble(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.is_solvable());
        assert!(a.manhattan_distance(&goal) <= 20);
        assert_eq!(goal.scramble(0, &mut StdRng::seed_from_u64(1)), goal);
    }

    #[test]
    fn display_draws_bordered_grid() {
        let b = board([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        assert_eq!(
            b.to_string(),
            "+---+---+---+\n\
             | 1 | 2 | 3 |\n\
             +---+---+---+\n\
             | 4 |   | 6 |\n\
             +---+---+---+\n\
             | 7 | 5 | 8 |\n\
             +---+---+---+\n"
        );
    }
}
