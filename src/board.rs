//! The playfield: a fixed 10x20 grid of block colors.
//!
//! Cells hold `0` for empty or a piece color `1..=7`. Coordinates are `(x, y)`
//! with `x` growing right and `y` growing down; both are signed at the API so
//! that a negative position is reported as out of bounds rather than wrapping.

use log::trace;

use crate::error::{Error, Result};
use crate::grid::{Grid, GridIter};
use crate::tetromino::{PieceKind, Tetromino};

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

pub const EMPTY: u8 = 0;

/// Highest valid block color.
pub const MAX_COLOR: u8 = PieceKind::ALL.len() as u8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid<u8>,
}

pub struct Cells<'a> {
    inner: GridIter<'a, u8>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: Grid::new(BOARD_WIDTH, BOARD_HEIGHT, &mut |_, _| EMPTY),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    fn position(&self, x: i32, y: i32) -> Result<(usize, usize)> {
        let out_of_bounds = || Error::OutOfBounds {
            x: i64::from(x),
            y: i64::from(y),
        };

        let ux = usize::try_from(x).map_err(|_| out_of_bounds())?;
        let uy = usize::try_from(y).map_err(|_| out_of_bounds())?;

        if ux >= self.width() || uy >= self.height() {
            return Err(out_of_bounds());
        }

        Ok((ux, uy))
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.position(x, y).is_ok()
    }

    pub fn get(&self, x: i32, y: i32) -> Result<u8> {
        let (x, y) = self.position(x, y)?;

        Ok(self.grid.get(x, y).copied().unwrap_or(EMPTY))
    }

    /// Overwrites a cell. Placement legality is the caller's concern.
    pub fn set(&mut self, x: i32, y: i32, color: u8) -> Result<()> {
        if color > MAX_COLOR {
            return Err(Error::InvalidColor(color));
        }

        let (x, y) = self.position(x, y)?;

        self.grid.set(x, y, color)
    }

    /// `true` only for an on-board empty cell.
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Ok(EMPTY))
    }

    /// Row-major `(x, y, color)` triples. Each call starts a new traversal.
    pub fn cells(&self) -> Cells<'_> {
        Cells {
            inner: self.grid.iter(),
        }
    }

    pub fn occupied(&self) -> usize {
        self.cells().filter(|&(_, _, color)| color != EMPTY).count()
    }

    pub fn fits(&self, piece: &Tetromino) -> bool {
        piece.cells().all(|(x, y)| self.is_empty(x, y))
    }

    /// Writes the piece's color into its cells. Nothing is written unless every
    /// cell is on the board.
    pub fn lock(&mut self, piece: &Tetromino) -> Result<()> {
        let cells = piece
            .cells()
            .map(|(x, y)| self.position(x, y))
            .collect::<Result<Vec<_>>>()?;

        for (x, y) in cells {
            self.grid.set(x, y, piece.color())?;
        }

        trace!("Locked {} at {:?}", piece.kind(), piece.position());

        Ok(())
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.grid
            .rows()
            .nth(y)
            .map_or(false, |row| row.iter().all(|&color| color != EMPTY))
    }

    /// Removes every full row, dropping the rows above it. Returns the count.
    pub fn clear_full_rows(&mut self) -> usize {
        let kept: Vec<Vec<u8>> = self
            .grid
            .rows()
            .filter(|row| row.iter().any(|&color| color == EMPTY))
            .map(<[u8]>::to_vec)
            .collect();

        let cleared = self.height() - kept.len();

        if cleared > 0 {
            self.grid.fill(&mut |x, y| {
                y.checked_sub(cleared)
                    .map_or(EMPTY, |row| kept[row][x])
            });

            trace!("Cleared {} rows", cleared);
        }

        cleared
    }

    /// Rewrites every cell from `color(x, y)`. The board is left untouched if
    /// any produced value is not a color.
    pub fn repaint<F: FnMut(usize, usize) -> u8>(&mut self, mut color: F) -> Result<()> {
        let grid = Grid::new(self.width(), self.height(), &mut color);

        if let Some((_, _, &value)) = grid.iter().find(|&(_, _, &value)| value > MAX_COLOR) {
            return Err(Error::InvalidColor(value));
        }

        self.grid = grid;

        Ok(())
    }

    pub fn reset(&mut self) {
        self.grid.fill(&mut |_, _| EMPTY);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = (usize, usize, u8);
    type IntoIter = Cells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

impl<'a> Iterator for Cells<'a> {
    type Item = (usize, usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(x, y, &color)| (x, y, color))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
