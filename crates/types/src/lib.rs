//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no engine logic, making them usable in any
//! context (core simulation, snapshots for renderers, search collaborators).
//!
//! # Board Dimensions
//!
//! Default playfield dimensions:
//!
//! - **Width**: 6 columns (indexed 0-5)
//! - **Height**: 12 rows (indexed 0-11, row 0 is the top)
//! - **Spawn position**: pivot at column `(width - 1) / 2`, row 0; satellite below it at row 1
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FALL_SPEED` | 30 | Fall-timer ticks before the active pair drops one row |
//! | `FAST_FALL_MULTIPLIER` | 5 | Fall-timer increment per tick while soft drop is held |
//! | `POP_DURATION_SECS` | 0.7 | Popping animation length before cleared cells are removed |
//!
//! # Scoring Tables
//!
//! | Table | Values |
//! |-------|--------|
//! | `CHAIN_BONUS` | 0, 8, 16, 32, 64, 96, 128, 160, 192, 224, 256 |
//! | `COLOR_BONUS` | 0, 3, 6, 12, 24 |
//! | `GROUP_BONUS` | 0, 2, 3, 4, 5, 6, 7, 10 |
//!
//! # Examples
//!
//! ```
//! use puyo_chain_types::{ColorSet, GameAction, PuyoColor, DEFAULT_HEIGHT, DEFAULT_WIDTH};
//!
//! // Parse colors and actions from their names (case-insensitive)
//! assert_eq!(PuyoColor::from_str("Red"), Some(PuyoColor::Red));
//! assert_eq!(GameAction::from_str("rotate_cw"), Some(GameAction::RotateCw));
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! // Track distinct colors cleared in a pass
//! let mut colors = ColorSet::new();
//! colors.insert(PuyoColor::Red);
//! colors.insert(PuyoColor::Red);
//! colors.insert(PuyoColor::Blue);
//! assert_eq!(colors.len(), 2);
//!
//! assert_eq!(DEFAULT_WIDTH, 6);
//! assert_eq!(DEFAULT_HEIGHT, 12);
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells (6 columns)
pub const DEFAULT_WIDTH: u16 = 6;

/// Default board height in cells (12 rows)
pub const DEFAULT_HEIGHT: u16 = 12;

/// Default number of connected same-color puyos needed to clear a group
pub const DEFAULT_REQUIRED_GROUP_SIZE: usize = 4;

/// Fall-timer threshold in ticks
pub const DEFAULT_FALL_SPEED: u32 = 30;

/// Fall-timer increment per tick while the fast input is held
pub const FAST_FALL_MULTIPLIER: u32 = 5;

/// Popping animation duration in seconds
pub const POP_DURATION_SECS: f32 = 0.7;

/// Points per cleared puyo before the bonus multiplier
pub const POINTS_PER_PUYO: u64 = 10;

/// Crazy-mode chain bonus base: `CRAZY_CHAIN_BASE * 2^chain`
pub const CRAZY_CHAIN_BASE: u64 = 4;

/// Chain bonus table, indexed by `chain - 1` (clamped to the last entry)
pub const CHAIN_BONUS: [u64; 11] = [0, 8, 16, 32, 64, 96, 128, 160, 192, 224, 256];

/// Color bonus table, indexed by `distinct colors - 1` (clamped to the last entry)
pub const COLOR_BONUS: [u64; 5] = [0, 3, 6, 12, 24];

/// Group bonus table, indexed by `group size - 4` (clamped to both ends)
pub const GROUP_BONUS: [u64; 8] = [0, 2, 3, 4, 5, 6, 7, 10];

/// Score needed for one nuisance puyo
pub const NUISANCE_TARGET_POINTS: u64 = 70;

/// Nuisance denominations, ascending. Greedy decomposition walks this from the top.
pub const NUISANCE_DENOMINATIONS: [u64; 23] = [
    1,
    6,
    30,
    90,
    180,
    360,
    720,
    1_000,
    5_000,
    20_000,
    100_000,
    500_000,
    2_000_000,
    10_000_000,
    50_000_000,
    200_000_000,
    1_000_000_000,
    5_000_000_000,
    10_000_000_000,
    50_000_000_000,
    100_000_000_000,
    500_000_000_000,
    1_000_000_000_000,
];

/// Puyo colors
///
/// The default palette uses the first four; `Purple` is available to
/// configurations that want a fifth color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuyoColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl PuyoColor {
    pub const ALL: [PuyoColor; 5] = [
        PuyoColor::Red,
        PuyoColor::Green,
        PuyoColor::Blue,
        PuyoColor::Yellow,
        PuyoColor::Purple,
    ];

    /// Default four-color palette
    pub const DEFAULT_PALETTE: [PuyoColor; 4] = [
        PuyoColor::Red,
        PuyoColor::Green,
        PuyoColor::Blue,
        PuyoColor::Yellow,
    ];

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use puyo_chain_types::PuyoColor;
    ///
    /// assert_eq!(PuyoColor::from_str("green"), Some(PuyoColor::Green));
    /// assert_eq!(PuyoColor::from_str("PURPLE"), Some(PuyoColor::Purple));
    /// assert_eq!(PuyoColor::from_str("pink"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(PuyoColor::Red),
            "green" => Some(PuyoColor::Green),
            "blue" => Some(PuyoColor::Blue),
            "yellow" => Some(PuyoColor::Yellow),
            "purple" => Some(PuyoColor::Purple),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PuyoColor::Red => "red",
            PuyoColor::Green => "green",
            PuyoColor::Blue => "blue",
            PuyoColor::Yellow => "yellow",
            PuyoColor::Purple => "purple",
        }
    }

    /// Single-letter code used by ASCII board fixtures
    pub fn as_char(&self) -> char {
        match self {
            PuyoColor::Red => 'R',
            PuyoColor::Green => 'G',
            PuyoColor::Blue => 'B',
            PuyoColor::Yellow => 'Y',
            PuyoColor::Purple => 'P',
        }
    }

    /// Parse a single-letter code (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(PuyoColor::Red),
            'G' => Some(PuyoColor::Green),
            'B' => Some(PuyoColor::Blue),
            'Y' => Some(PuyoColor::Yellow),
            'P' => Some(PuyoColor::Purple),
            _ => None,
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// Set of distinct colors, stored as a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, color: PuyoColor) {
        self.0 |= color.bit();
    }

    pub fn contains(&self, color: PuyoColor) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Colors in palette order
    pub fn iter(&self) -> impl Iterator<Item = PuyoColor> + '_ {
        PuyoColor::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<PuyoColor> for ColorSet {
    fn from_iter<I: IntoIterator<Item = PuyoColor>>(iter: I) -> Self {
        let mut set = ColorSet::new();
        for color in iter {
            set.insert(color);
        }
        set
    }
}

/// Lifecycle state of a placed puyo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuyoState {
    /// Settled and eligible for matching
    Normal,
    /// Part of a cleared group, animating out; never matches
    Popping,
}

/// A puyo placed on the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Puyo {
    pub color: PuyoColor,
    pub state: PuyoState,
    /// Seconds spent popping; only meaningful while `state == Popping`
    pub pop_elapsed: f32,
}

impl Puyo {
    /// Create a settled puyo of the given color
    pub fn new(color: PuyoColor) -> Self {
        Self {
            color,
            state: PuyoState::Normal,
            pop_elapsed: 0.0,
        }
    }

    pub fn is_normal(&self) -> bool {
        self.state == PuyoState::Normal
    }

    pub fn is_popping(&self) -> bool {
        self.state == PuyoState::Popping
    }

    /// Switch to the popping state with a fresh animation timer
    pub fn start_popping(&mut self) {
        self.state = PuyoState::Popping;
        self.pop_elapsed = 0.0;
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Puyo)`: Occupied cell
///
/// Used by the board as a flat row-major array of cells.
pub type Cell = Option<Puyo>;

/// Game actions that can be applied to a session
///
/// These actions are used by both human input and search collaborators.
/// Anything other than `Pause` and `Restart` is only honoured while the
/// active pair is falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Move the pair one column left
    MoveLeft,
    /// Move the pair one column right
    MoveRight,
    /// Rotate the satellite 90° clockwise around the pivot
    RotateCw,
    /// Rotate the satellite 90° counter-clockwise around the pivot
    RotateCcw,
    /// Start holding the fast-fall input (also drops one row immediately)
    SoftDropStart,
    /// Release the fast-fall input
    SoftDropStop,
    /// Drop one row, locking if blocked
    Drop,
    /// Drop to the lowest reachable row and lock
    HardDrop,
    /// Toggle pause state
    Pause,
    /// Restart the session (valid in any state, including game over)
    Restart,
}

impl GameAction {
    pub const ALL: [GameAction; 10] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::SoftDropStart,
        GameAction::SoftDropStop,
        GameAction::Drop,
        GameAction::HardDrop,
        GameAction::Pause,
        GameAction::Restart,
    ];

    /// Parse action from string
    ///
    /// Case-insensitive; `_`, `-` and spaces are ignored so that `"moveLeft"`,
    /// `"move_left"` and `"MOVE-LEFT"` all parse. `"left"`/`"right"` are accepted
    /// as short forms.
    ///
    /// # Examples
    ///
    /// ```
    /// use puyo_chain_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("soft_drop_start"), Some(GameAction::SoftDropStart));
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "rotatecw" | "rotate" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "softdropstart" => Some(GameAction::SoftDropStart),
            "softdropstop" => Some(GameAction::SoftDropStop),
            "drop" => Some(GameAction::Drop),
            "harddrop" => Some(GameAction::HardDrop),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::SoftDropStart => "softDropStart",
            GameAction::SoftDropStop => "softDropStop",
            GameAction::Drop => "drop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Session phase (chain resolution state machine)
///
/// `Locked` and `Spawning` are transient: the session enters and leaves them
/// within a single call, so observers only see `Falling`, `Resolving` or
/// `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Active pair is under player control
    Falling,
    /// Pair written to the board; settling and matching next
    Locked,
    /// Matched groups are popping; removal waits on the animation timer
    Resolving,
    /// Promoting the queue into a new active pair
    Spawning,
    /// Spawn was blocked; terminal until restart
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Falling => "falling",
            Phase::Locked => "locked",
            Phase::Resolving => "resolving",
            Phase::Spawning => "spawning",
            Phase::GameOver => "game_over",
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Phase::Locked | Phase::Spawning)
    }
}
