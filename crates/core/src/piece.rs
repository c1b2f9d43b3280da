//! Piece module - the falling pivot/satellite pair
//!
//! A pair is two puyos. The satellite always sits one unit step (up, down, left
//! or right) from the pivot. Rotation orbits the satellite around the pivot and
//! is rejected outright when the target cell is blocked; there are no wall kicks.
//!
//! Every mutator validates against the board first and leaves the pair
//! untouched on failure, so callers never see a half-applied move.

use serde::Serialize;

use crate::board::Board;
use puyo_chain_types::{Puyo, PuyoColor};

/// One cell of the active pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceCell {
    pub x: i16,
    pub y: i16,
    pub color: PuyoColor,
}

impl PieceCell {
    pub fn new(x: i16, y: i16, color: PuyoColor) -> Self {
        Self { x, y, color }
    }
}

/// Active falling pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PuyoPair {
    pub pivot: PieceCell,
    pub satellite: PieceCell,
}

impl PuyoPair {
    /// Column the pivot spawns in for a board of `width` columns
    pub fn spawn_column(width: u16) -> i16 {
        (width.saturating_sub(1) / 2) as i16
    }

    /// Create a pair at the spawn position: pivot on row 0, satellite below it on row 1
    pub fn spawn(width: u16, pivot_color: PuyoColor, satellite_color: PuyoColor) -> Self {
        let x = Self::spawn_column(width);
        Self {
            pivot: PieceCell::new(x, 0, pivot_color),
            satellite: PieceCell::new(x, 1, satellite_color),
        }
    }

    /// Both cells, pivot first
    pub fn cells(&self) -> [PieceCell; 2] {
        [self.pivot, self.satellite]
    }

    /// Colors as (pivot, satellite)
    pub fn colors(&self) -> (PuyoColor, PuyoColor) {
        (self.pivot.color, self.satellite.color)
    }

    /// Satellite position relative to the pivot
    pub fn offset(&self) -> (i16, i16) {
        (
            self.satellite.x - self.pivot.x,
            self.satellite.y - self.pivot.y,
        )
    }

    /// True if both cells are in bounds and on empty board cells
    pub fn fits(&self, board: &Board) -> bool {
        self.cells().iter().all(|c| board.is_empty(c.x, c.y))
    }

    /// Translate both cells by (dx, dy). No-op returning false if either target is blocked.
    pub fn try_move(&mut self, board: &Board, dx: i16, dy: i16) -> bool {
        let mut moved = *self;
        moved.pivot.x += dx;
        moved.pivot.y += dy;
        moved.satellite.x += dx;
        moved.satellite.y += dy;
        if !moved.fits(board) {
            return false;
        }
        *self = moved;
        true
    }

    /// Rotate the satellite 90 degrees around the pivot.
    ///
    /// Clockwise maps the offset (dx, dy) to (-dy, dx); counter-clockwise maps it
    /// to (dy, -dx). Only the satellite moves, so only its target is checked.
    pub fn try_rotate(&mut self, board: &Board, clockwise: bool) -> bool {
        let (dx, dy) = self.offset();
        let (ndx, ndy) = if clockwise { (-dy, dx) } else { (dy, -dx) };
        let (nx, ny) = (self.pivot.x + ndx, self.pivot.y + ndy);
        if !board.is_empty(nx, ny) {
            return false;
        }
        self.satellite.x = nx;
        self.satellite.y = ny;
        true
    }

    /// Rows the pair can fall before it is blocked
    pub fn drop_distance(&self, board: &Board) -> i16 {
        let mut probe = *self;
        let mut distance = 0;
        while probe.try_move(board, 0, 1) {
            distance += 1;
        }
        distance
    }

    /// Write both cells into the board as normal puyos
    pub fn lock_into(&self, board: &mut Board) {
        for cell in self.cells() {
            board.set(cell.x, cell.y, Some(Puyo::new(cell.color)));
        }
    }
}
