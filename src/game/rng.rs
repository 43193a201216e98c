use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for tile spawning.
///
/// The board asks for two independent draws per spawn: which empty cell to
/// fill, then whether the new tile is a 4.
pub trait TileRng {
    /// Return an index uniformly distributed over `0..len`. `len` is never 0.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Return `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
}

/// `TileRng` backed by a `StdRng`, seeded from the OS or from a fixed seed.
pub struct StdTiles {
    rng: StdRng,
}

impl StdTiles {
    pub fn new() -> Self {
        StdTiles {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible tile sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        StdTiles {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// OS-seeded when `seed` is `None`.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }
}

impl Default for StdTiles {
    fn default() -> Self {
        Self::new()
    }
}

impl TileRng for StdTiles {
    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability)
    }
}

/// Replays a fixed script of draws, so tests can place tiles exactly.
///
/// Each spawn consumes one entry from `cells` (an index into the board's
/// empty cells in row-major order, wrapped to the number of empty cells) and
/// one entry from `fours` (`true` places a 4). Exhausted scripts fall back to
/// the first empty cell and a 2.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTiles {
    cells: VecDeque<usize>,
    fours: VecDeque<bool>,
}

impl ScriptedTiles {
    pub fn new(
        cells: impl IntoIterator<Item = usize>,
        fours: impl IntoIterator<Item = bool>,
    ) -> Self {
        ScriptedTiles {
            cells: cells.into_iter().collect(),
            fours: fours.into_iter().collect(),
        }
    }

    /// Script that always fills the first empty cell with a 2.
    pub fn first_empty() -> Self {
        Self::default()
    }
}

impl TileRng for ScriptedTiles {
    fn choose_index(&mut self, len: usize) -> usize {
        self.cells.pop_front().unwrap_or(0) % len
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.fours.pop_front().unwrap_or(false)
    }
}
