//! Read-only session view for renderers and observers.
//!
//! `snapshot_into` reuses the target's buffers, so a renderer that keeps one
//! `GameSnapshot` around does not allocate per frame once the sizes are stable.

use serde::Serialize;

use crate::nuisance::NuisanceReport;
use crate::piece::PuyoPair;
use crate::session::Session;
use puyo_chain_types::{Phase, PuyoColor};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CellSnapshot {
    pub color: Option<PuyoColor>,
    pub popping: bool,
    /// Pop animation progress in [0, 1]; 0 for normal cells
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major, `width * height` entries
    pub cells: Vec<CellSnapshot>,
    pub active: Option<PuyoPair>,
    pub ghost_drop: Option<i16>,
    pub next: Option<PuyoPair>,
    pub next_next: Option<PuyoPair>,
    pub score: u64,
    pub chain_count: u32,
    pub last_chain: u32,
    pub running: bool,
    pub phase: Phase,
    pub paused: bool,
    pub nuisance: NuisanceReport,
    pub seed: u32,
    pub piece_id: u32,
    pub episode_id: u32,
    pub elapsed_secs: f64,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.active = None;
        self.ghost_drop = None;
        self.next = None;
        self.next_next = None;
        self.score = 0;
        self.chain_count = 0;
        self.last_chain = 0;
        self.running = true;
        self.phase = Phase::Falling;
        self.paused = false;
        self.nuisance.count = 0;
        self.nuisance.denominations.clear();
        self.nuisance.leftover = 0.0;
        self.seed = 0;
        self.piece_id = 0;
        self.episode_id = 0;
        self.elapsed_secs = 0.0;
    }

    /// Cell at (x, y), `None` if out of range
    pub fn cell(&self, x: i16, y: i16) -> Option<&CellSnapshot> {
        if x < 0 || y < 0 || x as u16 >= self.width || y as u16 >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    pub fn playable(&self) -> bool {
        self.running && !self.paused && self.phase == Phase::Falling
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            active: None,
            ghost_drop: None,
            next: None,
            next_next: None,
            score: 0,
            chain_count: 0,
            last_chain: 0,
            running: true,
            phase: Phase::Falling,
            paused: false,
            nuisance: NuisanceReport::default(),
            seed: 0,
            piece_id: 0,
            episode_id: 0,
            elapsed_secs: 0.0,
        }
    }
}

impl Session {
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let board = self.board();
        out.width = board.width();
        out.height = board.height();
        out.cells.clear();
        out.cells.reserve(board.cells().len());
        for y in 0..board.height() as i16 {
            for x in 0..board.width() as i16 {
                let cell = match board.get(x, y) {
                    None => CellSnapshot::default(),
                    Some(p) => CellSnapshot {
                        color: Some(p.color),
                        popping: p.is_popping(),
                        progress: self.pop_progress(x, y).unwrap_or(0.0),
                    },
                };
                out.cells.push(cell);
            }
        }

        out.active = self.active();
        out.ghost_drop = self.ghost_drop_distance();
        out.next = Some(self.next());
        out.next_next = Some(self.next_next());
        out.score = self.score();
        out.chain_count = self.chain_count();
        out.last_chain = self.last_chain();
        out.running = self.is_running();
        out.phase = self.phase();
        out.paused = self.paused();

        let nuisance = self.last_nuisance();
        out.nuisance.count = nuisance.count;
        out.nuisance.denominations.clone_from(&nuisance.denominations);
        out.nuisance.leftover = nuisance.leftover;

        out.seed = self.seed();
        out.piece_id = self.piece_id();
        out.episode_id = self.episode_id();
        out.elapsed_secs = self.elapsed_secs();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::EngineConfig;
    use puyo_chain_types::GameAction;

    #[test]
    fn test_snapshot_reflects_session() {
        let session = Session::new_default(12345);
        let snap = session.snapshot();
        assert_eq!(snap.width, 6);
        assert_eq!(snap.height, 12);
        assert_eq!(snap.cells.len(), 72);
        assert!(snap.cells.iter().all(|c| c.color.is_none()));
        assert_eq!(snap.active, session.active());
        assert_eq!(snap.next, Some(session.next()));
        assert_eq!(snap.ghost_drop, Some(10));
        assert!(snap.running);
        assert!(snap.playable());
        assert_eq!(snap.piece_id, 1);
        assert_eq!(snap.seed, 12345);
    }

    #[test]
    fn test_snapshot_into_reuses_and_overwrites() {
        let mut session = Session::new_default(2);
        let mut snap = GameSnapshot::default();
        session.snapshot_into(&mut snap);
        let capacity = snap.cells.capacity();

        session.process_input(GameAction::HardDrop);
        session.snapshot_into(&mut snap);
        assert_eq!(snap.cells.capacity(), capacity);
        assert!(snap.cell(2, 11).unwrap().color.is_some());
        assert!(snap.cell(2, 0).unwrap().color.is_none());
        assert!(snap.cell(6, 0).is_none());
        assert_eq!(snap, session.snapshot());
    }

    #[test]
    fn test_popping_progress_in_snapshot() {
        let mut rows = vec!["......"; 11];
        rows.push("RR....");
        let board = Board::from_ascii(&rows).unwrap();
        let config = EngineConfig {
            palette: vec![PuyoColor::Red],
            ..EngineConfig::default()
        };
        let mut session = Session::from_board(config, board, 1).unwrap();
        session.process_input(GameAction::RotateCcw);
        session.process_input(GameAction::HardDrop);
        session.tick(0.35);

        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Resolving);
        assert!(!snap.playable());
        let cell = snap.cell(1, 11).unwrap();
        assert!(cell.popping);
        assert!((cell.progress - 0.5).abs() < 1e-6);
        assert_eq!(snap.chain_count, 1);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let session = Session::new_default(8);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["width"], 6);
        assert_eq!(json["phase"], "falling");
        assert_eq!(json["cells"].as_array().unwrap().len(), 72);
        assert!(json["active"]["pivot"]["color"].is_string());
    }

    #[test]
    fn test_clear_resets_fields() {
        let session = Session::new_default(8);
        let mut snap = session.snapshot();
        snap.clear();
        assert_eq!(snap, GameSnapshot::default());
    }
}
