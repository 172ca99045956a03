//! Toroidal grid of integer cell states

use crate::error::{LifeError, LifeResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default side length of a square world
pub const DEFAULT_WORLD_SIZE: usize = 20;

/// Default fraction of cells seeded alive by the driver
pub const DEFAULT_ALIVE_FRACTION: f64 = 0.2;

/// Offsets of the Moore neighborhood, as (dx, dy)
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// How a freshly constructed grid is populated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FillPolicy {
    /// Every cell dead
    #[default]
    Empty,
    /// Each cell independently alive with the given probability
    Random { probability: f64 },
    /// Exactly `round(fraction * cells)` cells alive at random positions
    Exact { fraction: f64 },
}

impl FillPolicy {
    /// Check that the probability or fraction lies in [0, 1]
    pub fn validate(&self) -> LifeResult<()> {
        let (name, value) = match self {
            FillPolicy::Empty => return Ok(()),
            FillPolicy::Random { probability } => ("probability", *probability),
            FillPolicy::Exact { fraction } => ("fraction", *fraction),
        };
        if !(0.0..=1.0).contains(&value) {
            return Err(LifeError::InvalidFill(format!(
                "{} must be within [0, 1], got {}",
                name, value
            )));
        }
        Ok(())
    }
}

/// A width x height torus of cell states.
///
/// `0` is a dead cell. In binary rule modes `1` marks a living cell; in the
/// decay mode the value is the cell's age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_SIZE, DEFAULT_WORLD_SIZE)
    }
}

impl Grid {
    /// Create a new grid with every cell dead.
    ///
    /// Panics if either dimension is zero; use [`Grid::with_fill`] for
    /// validated construction.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Create a grid populated according to `fill`, drawing positions from `rng`
    pub fn with_fill<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        fill: &FillPolicy,
        rng: &mut R,
    ) -> LifeResult<Self> {
        if width == 0 || height == 0 {
            return Err(LifeError::InvalidDimensions { width, height });
        }
        fill.validate()?;

        let mut grid = Self::new(width, height);
        match *fill {
            FillPolicy::Empty => {}
            FillPolicy::Random { probability } => {
                for cell in grid.cells.iter_mut() {
                    if rng.gen_bool(probability) {
                        *cell = 1;
                    }
                }
            }
            FillPolicy::Exact { fraction } => {
                let total = grid.cells.len();
                let alive = ((fraction * total as f64).round() as usize).min(total);
                for idx in rand::seq::index::sample(rng, total, alive).into_iter() {
                    grid.cells[idx] = 1;
                }
            }
        }
        Ok(grid)
    }

    /// Create a filled grid from an optional seed (entropy when `None`)
    pub fn random(
        width: usize,
        height: usize,
        fill: &FillPolicy,
        seed: Option<u64>,
    ) -> LifeResult<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_fill(width, height, fill, &mut rng)
    }

    /// Create a grid from rows of cell values
    pub fn from_rows(rows: Vec<Vec<u32>>) -> LifeResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(LifeError::InvalidDimensions { width, height });
        }
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(LifeError::RaggedRow {
                row,
                expected: width,
                found: bad.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major view of every cell
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    fn check_bounds(&self, x: usize, y: usize) {
        assert!(
            x < self.width && y < self.height,
            "coordinates ({}, {}) out of bounds for {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        self.check_bounds(x, y);
        y * self.width + x
    }

    /// Cell value at column `x`, row `y`. Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.cells[self.index(x, y)]
    }

    /// Write `value` at column `x`, row `y`. Panics when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, value: u32) {
        let idx = self.index(x, y);
        self.cells[idx] = value;
    }

    /// Mark a cell alive with state `1`
    pub fn set_alive(&mut self, x: usize, y: usize) {
        self.set(x, y, 1);
    }

    /// Values of the eight Moore neighbors, wrapping around every edge.
    ///
    /// On grids narrower or shorter than three cells the same physical cell
    /// can show up more than once.
    pub fn neighbor_values(&self, x: usize, y: usize) -> [u32; 8] {
        self.check_bounds(x, y);

        let width = self.width as isize;
        let height = self.height as isize;
        NEIGHBOR_OFFSETS.map(|(dx, dy)| {
            let nx = (x as isize + dx).rem_euclid(width) as usize;
            let ny = (y as isize + dy).rem_euclid(height) as usize;
            self.cells[ny * self.width + nx]
        })
    }

    /// Coordinates `(x, y)` of every non-dead cell
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value > 0)
            .map(|(idx, _)| (idx % self.width, idx / self.width))
            .collect()
    }

    /// Count of non-dead cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value > 0).count()
    }

    /// True when every cell is dead
    pub fn is_extinct(&self) -> bool {
        self.cells.iter().all(|&value| value == 0)
    }

    /// Largest value currently held by any cell
    pub fn max_value(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Swap in a full generation of cells computed elsewhere
    pub(crate) fn swap_cells(&mut self, next: &mut Vec<u32>) {
        debug_assert_eq!(next.len(), self.cells.len());
        std::mem::swap(&mut self.cells, next);
    }

    /// Rewrite every cell holding `from` to `to`, returning how many changed
    pub(crate) fn replace_value(&mut self, from: u32, to: u32) -> usize {
        let mut changed = 0;
        for cell in self.cells.iter_mut().filter(|value| **value == from) {
            *cell = to;
            changed += 1;
        }
        changed
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for &value in row {
                let symbol = if value > 0 { "⬛" } else { "⬜" };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.cells().len(), 12);
        assert!(grid.is_extinct());
    }

    #[test]
    fn test_default_grid_is_square_and_dead() {
        let grid = Grid::default();
        assert_eq!(grid.width(), DEFAULT_WORLD_SIZE);
        assert_eq!(grid.height(), DEFAULT_WORLD_SIZE);
        assert_eq!(grid.living_count(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::new(10, 12);
        grid.set_alive(4, 6);
        assert_eq!(grid.get(4, 6), 1);
        assert_eq!(grid.cells()[6 * 10 + 4], 1);

        grid.set(4, 6, 7);
        assert_eq!(grid.get(4, 6), 7);
        assert_eq!(grid.get(6, 4), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds_panics() {
        let grid = Grid::new(5, 5);
        grid.get(5, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_out_of_bounds_panics() {
        let mut grid = Grid::new(5, 3);
        grid.set(0, 3, 1);
    }

    #[test]
    fn test_grid_from_rows() {
        let grid = Grid::from_rows(vec![vec![1, 0, 1], vec![0, 3, 0]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 1), 3);
        assert_eq!(grid.living_count(), 3);
        assert_eq!(grid.living_cells(), vec![(0, 0), (2, 0), (1, 1)]);

        assert!(Grid::from_rows(vec![]).is_err());
        assert!(Grid::from_rows(vec![vec![1, 0], vec![1]]).is_err());
    }

    #[test]
    fn test_neighbor_values_interior() {
        let mut grid = Grid::new(5, 5);
        grid.set(1, 1, 2);
        grid.set(3, 3, 9);
        grid.set(2, 2, 5); // the cell itself is not a neighbor

        let mut neighbors = grid.neighbor_values(2, 2);
        neighbors.sort_unstable();
        assert_eq!(neighbors, [0, 0, 0, 0, 0, 0, 2, 9]);
    }

    #[test]
    fn test_neighbor_values_wrap_around_edges() {
        let (width, height) = (10, 12);
        let mut grid = Grid::new(width, height);
        grid.set(2, height - 1, 4);

        let neighbors = grid.neighbor_values(2, 0);
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.contains(&4));
    }

    #[test]
    fn test_corner_cells_see_opposite_corners() {
        let mut grid = Grid::new(4, 4);
        grid.set_alive(3, 3);
        grid.set_alive(3, 0);
        grid.set_alive(0, 3);

        let neighbors = grid.neighbor_values(0, 0);
        assert_eq!(neighbors.iter().filter(|&&v| v == 1).count(), 3);
    }

    #[test]
    fn test_every_cell_has_eight_neighbors() {
        for (width, height) in [(1, 1), (1, 3), (2, 2), (3, 5), (7, 4)] {
            let grid = Grid::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    assert_eq!(grid.neighbor_values(x, y).len(), 8);
                }
            }
        }
    }

    #[test]
    fn test_single_cell_torus_is_its_own_neighbor() {
        let mut grid = Grid::new(1, 1);
        grid.set_alive(0, 0);
        assert_eq!(grid.neighbor_values(0, 0), [1; 8]);
    }

    #[test]
    fn test_neighbor_values_reflect_current_state() {
        let mut grid = Grid::new(3, 3);
        assert_eq!(grid.neighbor_values(1, 1), [0; 8]);
        grid.set_alive(0, 0);
        assert_eq!(grid.neighbor_values(1, 1).iter().sum::<u32>(), 1);
    }

    #[test]
    fn test_random_fill_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty = Grid::with_fill(10, 12, &FillPolicy::Random { probability: 0.0 }, &mut rng).unwrap();
        assert_eq!(empty.living_count(), 0);

        let full = Grid::with_fill(10, 12, &FillPolicy::Random { probability: 1.0 }, &mut rng).unwrap();
        assert_eq!(full.living_count(), 120);
        assert!(full.cells().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_exact_fill_sets_exact_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = Grid::with_fill(10, 10, &FillPolicy::Exact { fraction: 0.25 }, &mut rng).unwrap();
        assert_eq!(grid.living_count(), 25);

        let grid = Grid::with_fill(3, 3, &FillPolicy::Exact { fraction: 1.0 }, &mut rng).unwrap();
        assert_eq!(grid.living_count(), 9);
    }

    #[test]
    fn test_seeded_fill_is_reproducible() {
        let fill = FillPolicy::Random { probability: 0.3 };
        let a = Grid::random(16, 16, &fill, Some(99)).unwrap();
        let b = Grid::random(16, 16, &fill, Some(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_fill_and_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            Grid::with_fill(4, 4, &FillPolicy::Random { probability: 1.5 }, &mut rng),
            Err(LifeError::InvalidFill(_))
        ));
        assert!(matches!(
            Grid::with_fill(4, 4, &FillPolicy::Exact { fraction: -0.1 }, &mut rng),
            Err(LifeError::InvalidFill(_))
        ));
        assert!(matches!(
            Grid::with_fill(0, 4, &FillPolicy::Empty, &mut rng),
            Err(LifeError::InvalidDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = Grid::from_rows(vec![vec![1, 0, 0], vec![0, 1, 0], vec![1]]).unwrap_err();
        assert_eq!(
            err,
            LifeError::RaggedRow {
                row: 2,
                expected: 3,
                found: 1
            }
        );
        assert_eq!(err.to_string(), "Row 2 has length 1, expected 3");

        assert!(matches!(
            Grid::from_rows(vec![]),
            Err(LifeError::InvalidDimensions { width: 0, height: 0 })
        ));
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_rows(vec![vec![1, 0], vec![0, 5]]).unwrap();
        assert_eq!(grid.to_string(), "⬛⬜\n⬜⬛\n");
    }

    #[test]
    fn test_replace_value() {
        let mut grid = Grid::from_rows(vec![vec![1, 2], vec![1, 0]]).unwrap();
        assert_eq!(grid.replace_value(1, 4), 2);
        assert_eq!(grid.cells(), &[4, 2, 4, 0]);
    }
}
