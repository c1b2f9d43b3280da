//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds a puyo.
//! Uses a flat vector for cache locality and cheap structural copies.
//! Coordinates: (x, y) where x ranges 0..width (left to right), y ranges 0..height
//! (top to bottom). Dimensions are fixed for the lifetime of the board.
//!
//! Coordinates are `i16` so that candidate positions one step outside the grid
//! (e.g. `x - 1` at the left wall) can be expressed and rejected by
//! [`Board::is_within`]. `get`/`set` require in-bounds coordinates; calling them
//! out of range is a caller bug and panics.

use puyo_chain_types::{Cell, Puyo, PuyoColor};

/// The game board - flat row-major storage plus dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> usize {
        assert!(
            self.is_within(x, y),
            "board access out of bounds: ({}, {}) on {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get width of the board
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Check if position is on the board
    #[inline]
    pub fn is_within(&self, x: i16, y: i16) -> bool {
        x >= 0 && y >= 0 && (x as u16) < self.width && (y as u16) < self.height
    }

    /// Check if position is on the board and unoccupied
    #[inline]
    pub fn is_empty(&self, x: i16, y: i16) -> bool {
        self.is_within(x, y) && self.cells[self.index(x, y)].is_none()
    }

    /// Check if position is on the board and occupied
    #[inline]
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        self.is_within(x, y) && self.cells[self.index(x, y)].is_some()
    }

    /// Get cell at position (x, y). Panics if out of bounds.
    #[inline]
    pub fn get(&self, x: i16, y: i16) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Mutable access to an occupied cell's puyo. Panics if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: i16, y: i16) -> Option<&mut Puyo> {
        let idx = self.index(x, y);
        self.cells[idx].as_mut()
    }

    /// Set cell at position (x, y). Panics if out of bounds.
    #[inline]
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) {
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    /// Take the cell at (x, y), leaving it empty
    #[inline]
    pub fn take(&mut self, x: i16, y: i16) -> Cell {
        let idx = self.index(x, y);
        self.cells[idx].take()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of cells currently popping
    pub fn popping_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Some(p) if p.is_popping()))
            .count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a board from ASCII rows, top row first.
    ///
    /// `.` is empty; `R G B Y P` are colors (case-insensitive). Every row must
    /// have the same length. Returns `None` on ragged rows or unknown characters.
    ///
    /// ```
    /// use puyo_chain_core::Board;
    ///
    /// let board = Board::from_ascii(&[
    ///     "......",
    ///     "RRGG..",
    /// ]).unwrap();
    /// assert_eq!(board.width(), 6);
    /// assert_eq!(board.height(), 2);
    /// assert_eq!(board.occupied_count(), 4);
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 || height > i16::MAX as usize || width > i16::MAX as usize {
            return None;
        }

        let mut board = Board::new(width as u16, height as u16);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    other => Some(Puyo::new(PuyoColor::from_char(other)?)),
                };
                board.set(x as i16, y as i16, cell);
            }
        }
        Some(board)
    }

    /// Render as ASCII rows, top row first.
    ///
    /// Popping puyos are written in lowercase so fixtures can tell them apart.
    pub fn to_ascii(&self) -> Vec<String> {
        let width = self.width as usize;
        self.cells
            .chunks(width.max(1))
            .map(|row| {
                let mut line = String::with_capacity(width);
                for cell in row {
                    let ch = match cell {
                        None => '.',
                        Some(p) if p.is_popping() => p.color.as_char().to_ascii_lowercase(),
                        Some(p) => p.color.as_char(),
                    };
                    line.push(ch);
                }
                line
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(
            puyo_chain_types::DEFAULT_WIDTH,
            puyo_chain_types::DEFAULT_HEIGHT,
        )
    }
}
