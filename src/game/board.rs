use std::fmt;

use super::rng::TileRng;
use crate::error::BoardError;

/// Side length of the classic board.
pub const DEFAULT_SIZE: usize = 4;

/// Largest tile a `u32` cell can hold. Two of these never merge.
pub const MAX_TILE: u32 = 1 << 31;

/// Probability that a spawned tile is a 4 rather than a 2.
pub const FOUR_PROBABILITY: f64 = 0.1;

/// A direction to slide and merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse a key name such as `ArrowLeft` or `left`. Anything else is `None`.
    pub fn from_key_name(name: &str) -> Option<Direction> {
        match name {
            "ArrowLeft" | "left" | "Left" => Some(Direction::Left),
            "ArrowRight" | "right" | "Right" => Some(Direction::Right),
            "ArrowUp" | "up" | "Up" => Some(Direction::Up),
            "ArrowDown" | "down" | "Down" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Whether tiles travel toward increasing row/column index.
    fn toward_end(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

/// Square grid of tiles. 0 is an empty cell, anything else is a power of two.
///
/// Shape and tile values are checked once at construction; every operation
/// afterwards keeps them valid, so the engine methods never fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
}

impl Board {
    /// Create an empty `size` x `size` board.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size < 2 {
            return Err(BoardError::TooSmall { size });
        }
        Ok(Board {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a board from explicit rows, validating shape and tile values.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if size < 2 {
            return Err(BoardError::TooSmall { size });
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(BoardError::NotSquare {
                    rows: size,
                    row,
                    len: values.len(),
                });
            }
            for (col, value) in values.into_iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(BoardError::InvalidTile { row, col, value });
                }
                cells.push(value);
            }
        }

        Ok(Board { size, cells })
    }

    /// Empty board with two random tiles: the start of every game.
    pub fn initial<R: TileRng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, BoardError> {
        let mut board = Board::new(size)?;
        board.reset(rng);
        Ok(board)
    }

    /// Clear every cell, then spawn the two starting tiles.
    pub fn reset<R: TileRng + ?Sized>(&mut self, rng: &mut R) {
        self.cells.fill(0);
        self.spawn_random_tile(rng);
        self.spawn_random_tile(rng);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the tile at a position. Row 0 is the top, column 0 the left.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    /// Copy of the grid as rows of tile values.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.size).map(<[u32]>::to_vec).collect()
    }

    /// Positions of all empty cells, in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&value| value == 0).count()
    }

    pub fn count_tiles(&self) -> usize {
        self.cells.len() - self.count_empty()
    }

    /// Highest tile on the board, 0 for an empty board.
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Sum of every tile on the board.
    ///
    /// This is the game's score: it is recomputed from the board after each
    /// move instead of accumulating merge rewards.
    pub fn score(&self) -> u64 {
        self.cells.iter().map(|&value| u64::from(value)).sum()
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns the filled position, or `None` without touching the board when
    /// no cell is empty.
    pub fn spawn_random_tile<R: TileRng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let (row, col) = empty[rng.choose_index(empty.len())];
        let value = if rng.chance(FOUR_PROBABILITY) { 4 } else { 2 };
        self.cells[row * self.size + col] = value;
        Some((row, col))
    }

    /// Return the board after sliding in `direction`, and whether anything moved.
    /// No tile is spawned.
    pub fn shift(&self, direction: Direction) -> (Board, bool) {
        let mut moved = self.clone();
        let changed = moved.shift_mut(direction);
        (moved, changed)
    }

    /// Slide and merge in place. Returns `true` if any line changed.
    pub fn shift_mut(&mut self, direction: Direction) -> bool {
        let mut changed = false;
        for line in 0..self.size {
            let indices = self.line_indices(direction, line);
            let values: Vec<u32> = indices.iter().map(|&idx| self.cells[idx]).collect();
            let (slid, merged) = slide_line(&values);
            if merged || slid != values {
                changed = true;
                for (&idx, value) in indices.iter().zip(slid) {
                    self.cells[idx] = value;
                }
            }
        }
        changed
    }

    /// No empty cell and no two horizontally or vertically adjacent equal tiles.
    pub fn is_terminal(&self) -> bool {
        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let value = self.get(row, col);
                if value == 0 {
                    return false;
                }
                if col + 1 < n && can_merge(value, self.get(row, col + 1)) {
                    return false;
                }
                if row + 1 < n && can_merge(value, self.get(row + 1, col)) {
                    return false;
                }
            }
        }
        true
    }

    /// Cell indices of one row (left/right) or column (up/down), ordered so
    /// that tiles slide toward the first index.
    fn line_indices(&self, direction: Direction, line: usize) -> Vec<usize> {
        let n = self.size;
        let mut indices: Vec<usize> = match direction {
            Direction::Left | Direction::Right => (0..n).map(|col| line * n + col).collect(),
            Direction::Up | Direction::Down => (0..n).map(|row| row * n + line).collect(),
        };
        if direction.toward_end() {
            indices.reverse();
        }
        indices
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.highest_tile().max(1).to_string().len().max(4);
        for (i, row) in self.cells.chunks(self.size).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|&value| match value {
                    0 => format!("{:>width$}", "."),
                    v => format!("{:>width$}", v),
                })
                .collect();
            write!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Slide one line toward index 0, merging each equal adjacent pair once.
///
/// Returns the new line (same length, zero padded) and whether a merge happened.
/// A tile produced by a merge is never merged again in the same pass, so
/// `[2, 2, 2, 0]` becomes `[4, 2, 0, 0]`. Tiles whose double does not fit in
/// a `u32` stay where they are.
pub fn slide_line(line: &[u32]) -> (Vec<u32>, bool) {
    let tiles: Vec<u32> = line.iter().copied().filter(|&value| value != 0).collect();
    let mut out = Vec::with_capacity(line.len());
    let mut merged = false;

    let mut i = 0;
    while i < tiles.len() {
        match tiles.get(i + 1) {
            Some(&next) if can_merge(tiles[i], next) => {
                out.push(tiles[i] << 1);
                merged = true;
                i += 2;
            }
            _ => {
                out.push(tiles[i]);
                i += 1;
            }
        }
    }

    out.resize(line.len(), 0);
    (out, merged)
}

/// Equal non-empty tiles merge unless the result would overflow.
fn can_merge(a: u32, b: u32) -> bool {
    a != 0 && a == b && a <= MAX_TILE / 2
}

fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rng::{ScriptedTiles, StdTiles};

    fn board(rows: &[[u32; 4]; 4]) -> Board {
        Board::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    /// Random mid-game boards reached by legal play from a seeded start.
    fn sample_boards(seed: u64, count: usize) -> Vec<Board> {
        let mut rng = StdTiles::seeded(seed);
        let mut boards = Vec::with_capacity(count);
        let mut current = Board::initial(DEFAULT_SIZE, &mut rng).unwrap();
        let mut step = 0;
        while boards.len() < count {
            boards.push(current.clone());
            let direction = Direction::ALL[rng.choose_index(4)];
            if current.shift_mut(direction) {
                current.spawn_random_tile(&mut rng);
            }
            if current.is_terminal() {
                current = Board::initial(DEFAULT_SIZE, &mut rng).unwrap();
            }
            step += 1;
            assert!(step < count * 100, "sampler got stuck");
        }
        boards
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4).unwrap();
        assert_eq!(board.size(), 4);
        assert_eq!(board.count_empty(), 16);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_rejects_small_board() {
        assert_eq!(Board::new(1), Err(BoardError::TooSmall { size: 1 }));
        assert_eq!(Board::from_rows(vec![]), Err(BoardError::TooSmall { size: 0 }));
    }

    #[test]
    fn test_rejects_non_square() {
        let err = Board::from_rows(vec![vec![0, 0], vec![0, 0, 0]]).unwrap_err();
        assert_eq!(
            err,
            BoardError::NotSquare {
                rows: 2,
                row: 1,
                len: 3
            }
        );
    }

    #[test]
    fn test_rejects_invalid_tiles() {
        for bad in [1, 3, 6, 100] {
            let err = Board::from_rows(vec![vec![0, bad], vec![0, 0]]).unwrap_err();
            assert_eq!(
                err,
                BoardError::InvalidTile {
                    row: 0,
                    col: 1,
                    value: bad
                }
            );
        }
        assert!(Board::from_rows(vec![vec![2, 4], vec![1024, 0]]).is_ok());
    }

    #[test]
    fn test_initial_board_has_two_tiles() {
        let mut rng = StdTiles::seeded(1);
        for _ in 0..50 {
            let board = Board::initial(4, &mut rng).unwrap();
            assert_eq!(board.count_tiles(), 2);
            for row in board.rows() {
                for value in row {
                    assert!(value == 0 || value == 2 || value == 4);
                }
            }
        }
        assert!(Board::initial(1, &mut rng).is_err());
    }

    #[test]
    fn test_spawn_uses_scripted_cell_and_value() {
        let mut b = board(&[[2, 0, 0, 0], [0, 2, 0, 0], [0; 4], [0; 4]]);
        // Empty cells in row-major order: (0, 1), (0, 2), (0, 3), (1, 0), ...
        let mut rng = ScriptedTiles::new([3], [true]);
        assert_eq!(b.spawn_random_tile(&mut rng), Some((1, 0)));
        assert_eq!(b.get(1, 0), 4);
        assert_eq!(b.count_tiles(), 3);
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let mut b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let before = b.clone();
        assert_eq!(b.spawn_random_tile(&mut StdTiles::seeded(0)), None);
        assert_eq!(b, before);
    }

    #[test]
    fn test_spawn_spreads_over_empty_cells() {
        // Four empty cells, along the diagonal.
        let b = board(&[[0, 2, 4, 8], [2, 0, 8, 4], [4, 8, 0, 2], [8, 4, 2, 0]]);
        let mut rng = StdTiles::seeded(17);
        let mut hits = [0usize; 4];
        let mut fours = 0;
        for _ in 0..20_000 {
            let mut spawned = b.clone();
            let (row, col) = spawned.spawn_random_tile(&mut rng).unwrap();
            assert_eq!(row, col);
            hits[row] += 1;
            if spawned.get(row, col) == 4 {
                fours += 1;
            }
        }
        for (cell, &count) in hits.iter().enumerate() {
            assert!((4_500..5_500).contains(&count), "cell {cell} hit {count} times");
        }
        assert!((1_700..2_300).contains(&fours), "{fours} fours");
    }

    #[test]
    fn test_spawn_never_overwrites_tiles() {
        let mut rng = StdTiles::seeded(99);
        for b in sample_boards(5, 200) {
            let mut spawned = b.clone();
            let placed = spawned.spawn_random_tile(&mut rng);
            match placed {
                Some((row, col)) => {
                    assert_eq!(b.get(row, col), 0);
                    assert_eq!(spawned.count_tiles(), b.count_tiles() + 1);
                }
                None => assert_eq!(spawned, b),
            }
            for row in 0..4 {
                for col in 0..4 {
                    if b.get(row, col) != 0 {
                        assert_eq!(spawned.get(row, col), b.get(row, col));
                    }
                }
            }
        }
    }

    #[test]
    fn test_slide_line() {
        assert_eq!(slide_line(&[0, 0, 0, 0]), (vec![0, 0, 0, 0], false));
        assert_eq!(slide_line(&[2, 4, 2, 4]), (vec![2, 4, 2, 4], false));
        assert_eq!(slide_line(&[2, 2, 4, 4]), (vec![4, 8, 0, 0], true));
        assert_eq!(slide_line(&[2, 0, 0, 2]), (vec![4, 0, 0, 0], true));
        assert_eq!(slide_line(&[0, 0, 0, 2]), (vec![2, 0, 0, 0], false));
        assert_eq!(slide_line(&[2, 2, 2, 2]), (vec![4, 4, 0, 0], true));
        assert_eq!(slide_line(&[4, 2, 2, 0]), (vec![4, 4, 0, 0], true));
    }

    #[test]
    fn test_merge_is_not_chained() {
        assert_eq!(slide_line(&[2, 2, 2, 0]).0, vec![4, 2, 0, 0]);
        assert_eq!(slide_line(&[4, 4, 8, 0]).0, vec![8, 8, 0, 0]);
    }

    #[test]
    fn test_shift_left_merges_pair() {
        let b = board(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let (moved, changed) = b.shift(Direction::Left);
        assert!(changed);
        assert_eq!(moved.rows()[0], vec![4, 0, 0, 0]);
    }

    #[test]
    fn test_shift_left_across_gap() {
        let b = board(&[[2, 0, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let (moved, changed) = b.shift(Direction::Left);
        assert!(changed);
        assert_eq!(moved.rows()[0], vec![4, 0, 0, 0]);
    }

    #[test]
    fn test_shift_left_three_in_a_row() {
        let b = board(&[[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let (moved, _) = b.shift(Direction::Left);
        assert_eq!(moved.rows()[0], vec![4, 2, 0, 0]);
    }

    #[test]
    fn test_shift_right_is_mirror_of_left() {
        let b = board(&[[2, 2, 2, 0], [4, 0, 0, 4], [2, 4, 8, 16], [0, 0, 0, 2]]);
        let (moved, changed) = b.shift(Direction::Right);
        assert!(changed);
        assert_eq!(
            moved.rows(),
            vec![
                vec![0, 0, 2, 4],
                vec![0, 0, 0, 8],
                vec![2, 4, 8, 16],
                vec![0, 0, 0, 2],
            ]
        );
    }

    #[test]
    fn test_shift_up_and_down() {
        let b = board(&[[2, 0, 4, 0], [2, 0, 0, 0], [4, 0, 4, 0], [4, 2, 2, 0]]);
        let (up, changed) = b.shift(Direction::Up);
        assert!(changed);
        assert_eq!(
            up.rows(),
            vec![
                vec![4, 2, 8, 0],
                vec![8, 0, 2, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ]
        );

        let (down, changed) = b.shift(Direction::Down);
        assert!(changed);
        assert_eq!(
            down.rows(),
            vec![
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![4, 0, 8, 0],
                vec![8, 2, 2, 0],
            ]
        );
    }

    #[test]
    fn test_unchanged_lines_report_no_change() {
        let b = board(&[[2, 4, 0, 0], [0; 4], [8, 0, 0, 0], [0; 4]]);
        let (moved, changed) = b.shift(Direction::Left);
        assert!(!changed);
        assert_eq!(moved, b);

        let empty = Board::new(4).unwrap();
        for direction in Direction::ALL {
            assert!(!empty.shift(direction).1);
        }
    }

    /// No tile sits behind an empty cell in the slide order of `direction`.
    fn is_packed(b: &Board, direction: Direction) -> bool {
        (0..b.size()).all(|line| {
            let values: Vec<u32> = b
                .line_indices(direction, line)
                .into_iter()
                .map(|idx| b.cells[idx])
                .collect();
            values.windows(2).all(|pair| pair[0] != 0 || pair[1] == 0)
        })
    }

    #[test]
    fn test_second_shift_only_merges() {
        for b in sample_boards(11, 300) {
            for direction in Direction::ALL {
                let (once, _) = b.shift(direction);
                assert!(is_packed(&once, direction), "{:?} left a gap\n{}", direction, once);

                let (twice, changed) = once.shift(direction);
                assert!(is_packed(&twice, direction));
                if once.count_tiles() == b.count_tiles() {
                    // First move only slid, so nothing is left to do.
                    assert!(!changed, "second {:?} changed\n{}", direction, once);
                    assert_eq!(twice, once);
                }
                if changed {
                    assert!(twice.count_tiles() < once.count_tiles());
                }
            }
        }
    }

    #[test]
    fn test_second_shift_can_merge_results_of_first() {
        let b = board(&[[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
        let (once, changed) = b.shift(Direction::Left);
        assert!(changed);
        assert_eq!(once.rows()[0], vec![4, 4, 0, 0]);

        let (twice, changed) = once.shift(Direction::Left);
        assert!(changed);
        assert_eq!(twice.rows()[0], vec![8, 0, 0, 0]);

        let (_, changed) = twice.shift(Direction::Left);
        assert!(!changed);
    }

    #[test]
    fn test_largest_tiles_do_not_merge() {
        let b = Board::from_rows(vec![vec![MAX_TILE, MAX_TILE], vec![0, 0]]).unwrap();
        let (moved, changed) = b.shift(Direction::Left);
        assert!(!changed);
        assert_eq!(moved, b);

        let full = Board::from_rows(vec![vec![MAX_TILE, MAX_TILE], vec![4, 2]]).unwrap();
        assert!(full.is_terminal());

        let b = Board::from_rows(vec![vec![1 << 30, 1 << 30], vec![0, 0]]).unwrap();
        let (moved, changed) = b.shift(Direction::Left);
        assert!(changed);
        assert_eq!(moved.rows()[0], vec![MAX_TILE, 0]);
        assert_eq!(moved.score(), u64::from(MAX_TILE));
    }

    #[test]
    fn test_shift_conserves_total_value() {
        for b in sample_boards(23, 300) {
            for direction in Direction::ALL {
                let (moved, _) = b.shift(direction);
                assert_eq!(moved.score(), b.score());
                assert!(moved.count_tiles() <= b.count_tiles());
            }
        }
    }

    #[test]
    fn test_merges_account_for_tile_multiset() {
        // Two merges (2+2, 8+8), one bystander 4.
        let b = board(&[[2, 2, 4, 0], [8, 0, 8, 0], [0; 4], [0; 4]]);
        let (moved, _) = b.shift(Direction::Left);
        let mut before: Vec<u32> = b.rows().concat().into_iter().filter(|&v| v != 0).collect();
        let mut after: Vec<u32> = moved.rows().concat().into_iter().filter(|&v| v != 0).collect();
        // Remove the merged pairs, add their sums.
        before.retain(|&v| v == 4);
        before.extend([4, 16]);
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn test_terminal_checkerboard() {
        let b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(b.is_terminal());
        for direction in Direction::ALL {
            assert!(!b.shift(direction).1);
        }
    }

    #[test]
    fn test_not_terminal_with_empty_cell() {
        let b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
        assert!(!b.is_terminal());
        assert!(!Board::new(4).unwrap().is_terminal());
    }

    #[test]
    fn test_not_terminal_with_adjacent_pair() {
        let horizontal = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 8, 8]]);
        assert!(!horizontal.is_terminal());
        let vertical = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 8], [4, 2, 4, 8]]);
        assert!(!vertical.is_terminal());
    }

    #[test]
    fn test_terminal_matches_no_legal_move() {
        for b in sample_boards(31, 500) {
            let can_move = Direction::ALL.iter().any(|&d| b.shift(d).1);
            assert_eq!(b.is_terminal(), !can_move);
        }
    }

    #[test]
    fn test_other_sizes() {
        let b = Board::from_rows(vec![vec![2, 2, 0], vec![0, 0, 0], vec![4, 0, 4]]).unwrap();
        let (moved, changed) = b.shift(Direction::Right);
        assert!(changed);
        assert_eq!(
            moved.rows(),
            vec![vec![0, 0, 4], vec![0, 0, 0], vec![0, 0, 8]]
        );
    }

    #[test]
    fn test_direction_from_key_name() {
        assert_eq!(Direction::from_key_name("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key_name("down"), Some(Direction::Down));
        assert_eq!(Direction::from_key_name("Enter"), None);
        assert_eq!(Direction::from_key_name(""), None);
    }

    #[test]
    fn test_display() {
        let b = board(&[[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2048]]);
        let text = b.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "   2    .    .    .");
        assert_eq!(lines[3], "   .    .    . 2048");
    }
}
