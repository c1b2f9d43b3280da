//! Matcher module - connected group detection
//!
//! Scans the board row-major (top-to-bottom, then left-to-right) and flood
//! fills each unvisited normal puyo breadth-first over its 4-connected
//! neighbours in the fixed order left, right, up, down. Every cell is visited
//! at most once per pass. Groups at or above the required size are recorded in
//! a [`ChainContext`]; popping puyos never participate.
//!
//! The scan and neighbour orders are fixed, so identical boards always produce
//! identical `to_clear` ordering.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::board::Board;
use puyo_chain_types::{ColorSet, PuyoColor};

/// Neighbour offsets in search order: left, right, up, down
const NEIGHBORS: [(i16, i16); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Result of one match pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainContext {
    /// Cells to clear, group by group, each group in BFS order
    pub to_clear: Vec<(i16, i16)>,
    /// Distinct colors among cleared groups
    pub colors_cleared: ColorSet,
    /// Size of each cleared group, in discovery order
    pub groups_cleared: Vec<usize>,
}

impl ChainContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new pass, keeping allocations
    pub fn reset(&mut self) {
        self.to_clear.clear();
        self.colors_cleared.clear();
        self.groups_cleared.clear();
    }

    /// True if nothing matched
    pub fn is_empty(&self) -> bool {
        self.to_clear.is_empty()
    }

    /// Number of puyos to clear
    pub fn cleared_count(&self) -> usize {
        self.to_clear.len()
    }

    /// Run a match pass over `board`, replacing the previous contents
    pub fn find(&mut self, board: &Board, required_group_size: usize) {
        self.reset();

        let width = board.width() as usize;
        let height = board.height() as usize;
        let mut visited = vec![false; width * height];
        let mut queue: VecDeque<(i16, i16)> = VecDeque::new();
        let mut group: Vec<(i16, i16)> = Vec::new();

        for y in 0..height as i16 {
            for x in 0..width as i16 {
                let idx = y as usize * width + x as usize;
                if visited[idx] {
                    continue;
                }
                let color = match board.get(x, y) {
                    Some(p) if p.is_normal() => p.color,
                    _ => continue,
                };

                group.clear();
                visited[idx] = true;
                queue.push_back((x, y));
                while let Some((cx, cy)) = queue.pop_front() {
                    group.push((cx, cy));
                    for (nx, ny) in matching_neighbors(board, cx, cy, color) {
                        let nidx = ny as usize * width + nx as usize;
                        if !visited[nidx] {
                            visited[nidx] = true;
                            queue.push_back((nx, ny));
                        }
                    }
                }

                if group.len() >= required_group_size {
                    self.to_clear.extend_from_slice(&group);
                    self.colors_cleared.insert(color);
                    self.groups_cleared.push(group.len());
                }
            }
        }
    }
}

/// In-bounds neighbours of (x, y) holding a normal puyo of `color`, in search order
fn matching_neighbors(board: &Board, x: i16, y: i16, color: PuyoColor) -> ArrayVec<(i16, i16), 4> {
    let mut out = ArrayVec::new();
    for (dx, dy) in NEIGHBORS {
        let (nx, ny) = (x + dx, y + dy);
        if !board.is_within(nx, ny) {
            continue;
        }
        if let Some(p) = board.get(nx, ny) {
            if p.is_normal() && p.color == color {
                out.push((nx, ny));
            }
        }
    }
    out
}

/// Run a match pass and return a fresh context
pub fn find_matches(board: &Board, required_group_size: usize) -> ChainContext {
    let mut ctx = ChainContext::new();
    ctx.find(board, required_group_size);
    ctx
}
