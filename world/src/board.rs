//! Authoritative tile storage for the 5×5 board.

use rand::Rng;
use robot_merge_core::{BoardView, RobotSize, TileCoord, CELL_COUNT};

/// Fixed-size mapping from tile to robot size, stored in flat-index order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [RobotSize; CELL_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [RobotSize::EMPTY; CELL_COUNT],
        }
    }

    /// Removes every robot from the board.
    pub fn reset(&mut self) {
        self.cells = [RobotSize::EMPTY; CELL_COUNT];
    }

    /// Size of the robot at `cell`, or [`RobotSize::EMPTY`].
    #[must_use]
    pub fn get(&self, cell: TileCoord) -> RobotSize {
        self.cells[cell.flat_index()]
    }

    /// Stores `size` at `cell`, replacing whatever was there.
    pub fn set(&mut self, cell: TileCoord, size: RobotSize) {
        self.cells[cell.flat_index()] = size;
    }

    /// Reports whether `cell` holds no robot.
    #[must_use]
    pub fn is_empty(&self, cell: TileCoord) -> bool {
        self.get(cell).is_empty()
    }

    /// Reports whether every tile holds a robot.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|size| !size.is_empty())
    }

    /// Empty tiles in ascending flat-index order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<TileCoord> {
        TileCoord::all().filter(|cell| self.is_empty(*cell)).collect()
    }

    /// Picks an empty tile uniformly at random.
    ///
    /// A full board is reset first, so the call always succeeds. Any robots
    /// on the board at that point, including a controlled one, are lost.
    pub fn random_empty_cell<R>(&mut self, rng: &mut R) -> TileCoord
    where
        R: Rng + ?Sized,
    {
        let mut candidates = self.empty_cells();
        if candidates.is_empty() {
            self.reset();
            candidates = self.empty_cells();
        }
        candidates[rng.gen_range(0..candidates.len())]
    }

    /// Places a robot of `size` on a random empty tile and returns that tile.
    pub fn spawn_random<R>(&mut self, size: RobotSize, rng: &mut R) -> TileCoord
    where
        R: Rng + ?Sized,
    {
        let cell = self.random_empty_cell(rng);
        self.set(cell, size);
        cell
    }

    /// Read-only view over the stored sizes.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.cells)
    }
}

/// Draws a living robot size uniformly from `RobotSize::MIN..=RobotSize::MAX`.
pub(crate) fn random_size<R>(rng: &mut R) -> RobotSize
where
    R: Rng + ?Sized,
{
    let value = rng.gen_range(RobotSize::MIN.get()..=RobotSize::MAX.get());
    RobotSize::new(value).unwrap_or(RobotSize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn coord(x: u8, y: u8) -> TileCoord {
        TileCoord::new(x, y).expect("valid coordinate")
    }

    fn size(value: u8) -> RobotSize {
        RobotSize::new(value).expect("valid size")
    }

    #[test]
    fn reset_clears_every_tile() {
        let mut board = Board::new();
        for cell in TileCoord::all() {
            board.set(cell, size(3));
        }
        board.reset();

        for cell in TileCoord::all() {
            assert_eq!(board.get(cell), RobotSize::EMPTY);
        }
    }

    #[test]
    fn set_uses_flipped_rows() {
        let mut board = Board::new();
        board.set(coord(1, 4), size(2));

        assert_eq!(board.view().iter().next(), Some((coord(0, 4), RobotSize::EMPTY)));
        assert_eq!(board.view().iter().nth(1), Some((coord(1, 4), size(2))));
        assert!(!board.is_empty(coord(1, 4)));
        assert!(board.is_empty(coord(1, 0)));
    }

    #[test]
    fn random_empty_cell_returns_empty_tiles() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut board = Board::new();
        for cell in TileCoord::all().filter(|cell| cell.flat_index() % 3 != 0) {
            board.set(cell, size(1));
        }

        for _ in 0..200 {
            let cell = board.random_empty_cell(&mut rng);
            assert!(board.is_empty(cell));
            assert_eq!(cell.flat_index() % 3, 0);
        }
    }

    #[test]
    fn random_empty_cell_resets_full_board() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut board = Board::new();
        for cell in TileCoord::all() {
            board.set(cell, size(4));
        }
        assert!(board.is_full());

        let cell = board.random_empty_cell(&mut rng);

        assert!(board.is_empty(cell));
        assert_eq!(board.empty_cells().len(), CELL_COUNT);
    }

    #[test]
    fn random_empty_cell_is_roughly_uniform() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut board = Board::new();
        let occupied = coord(0, 4);
        board.set(occupied, size(2));

        let trials = 10_000;
        let mut counts = [0usize; CELL_COUNT];
        for _ in 0..trials {
            let cell = board.random_empty_cell(&mut rng);
            counts[cell.flat_index()] += 1;
        }

        assert_eq!(counts[occupied.flat_index()], 0);
        let expected = trials / (CELL_COUNT - 1);
        for (index, count) in counts.iter().enumerate().skip(1) {
            assert!(
                (expected * 7 / 10..=expected * 13 / 10).contains(count),
                "index {index} drawn {count} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn spawn_random_fills_one_tile() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut board = Board::new();

        let cell = board.spawn_random(size(3), &mut rng);

        assert_eq!(board.get(cell), size(3));
        assert_eq!(board.empty_cells().len(), CELL_COUNT - 1);
    }

    #[test]
    fn random_size_covers_living_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let mut seen = [false; RobotSize::PALETTE_LEN];
        for _ in 0..500 {
            let drawn = random_size(&mut rng);
            assert!(!drawn.is_empty());
            seen[usize::from(drawn.get())] = true;
        }
        assert_eq!(seen, [false, true, true, true, true]);
    }
}
