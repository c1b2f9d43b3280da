//! Engine configuration
//!
//! One value parameterizes every rule that differs between game variants:
//! board size, group threshold, palette, crazy chain bonus, timing and the
//! bonus/denomination tables. Every field has a default, so a partial JSON
//! document such as `{"width": 8, "crazy_mode": true}` is a valid config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use puyo_chain_types::{
    PuyoColor, CHAIN_BONUS, COLOR_BONUS, DEFAULT_FALL_SPEED, DEFAULT_HEIGHT,
    DEFAULT_REQUIRED_GROUP_SIZE, DEFAULT_WIDTH, FAST_FALL_MULTIPLIER, GROUP_BONUS,
    NUISANCE_DENOMINATIONS, NUISANCE_TARGET_POINTS, POP_DURATION_SECS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board width must be at least 1")]
    ZeroWidth,
    #[error("board height must be at least 2 (got {0})")]
    HeightTooSmall(u16),
    #[error("board dimensions {0}x{1} exceed the addressable range")]
    BoardTooLarge(u16, u16),
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("palette lists {0} more than once")]
    DuplicateColor(&'static str),
    #[error("required group size must be at least 1")]
    ZeroGroupSize,
    #[error("fall speed must be at least 1 tick")]
    ZeroFallSpeed,
    #[error("fast fall multiplier must be at least 1")]
    ZeroFastFallMultiplier,
    #[error("pop duration must be finite and non-negative (got {0})")]
    InvalidPopDuration(f32),
    #[error("{0} table must not be empty")]
    EmptyTable(&'static str),
    #[error("nuisance denominations must start at 1 and strictly increase")]
    InvalidDenominations,
    #[error("nuisance target points must be at least 1")]
    ZeroTargetPoints,
    #[error("board is {actual_w}x{actual_h} but config expects {expected_w}x{expected_h}")]
    BoardMismatch {
        expected_w: u16,
        expected_h: u16,
        actual_w: u16,
        actual_h: u16,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u16,
    pub height: u16,
    pub required_group_size: usize,
    pub palette: Vec<PuyoColor>,
    /// Replace the chain bonus table with `4 * 2^chain`
    pub crazy_mode: bool,
    /// Fall-timer ticks per automatic drop
    pub fall_speed: u32,
    /// Fall-timer gain per tick while soft drop is held
    pub fast_fall_multiplier: u32,
    pub pop_duration_secs: f32,
    pub chain_bonus: Vec<u64>,
    pub color_bonus: Vec<u64>,
    pub group_bonus: Vec<u64>,
    pub nuisance_target_points: u64,
    /// Ascending, starting at 1
    pub nuisance_denominations: Vec<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            required_group_size: DEFAULT_REQUIRED_GROUP_SIZE,
            palette: PuyoColor::DEFAULT_PALETTE.to_vec(),
            crazy_mode: false,
            fall_speed: DEFAULT_FALL_SPEED,
            fast_fall_multiplier: FAST_FALL_MULTIPLIER,
            pop_duration_secs: POP_DURATION_SECS,
            chain_bonus: CHAIN_BONUS.to_vec(),
            color_bonus: COLOR_BONUS.to_vec(),
            group_bonus: GROUP_BONUS.to_vec(),
            nuisance_target_points: NUISANCE_TARGET_POINTS,
            nuisance_denominations: NUISANCE_DENOMINATIONS.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Default config with a different board size
    pub fn with_size(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse a JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PUYO_WIDTH`, `PUYO_HEIGHT`, `PUYO_GROUP_SIZE`, `PUYO_CRAZY` and
    /// `PUYO_FALL_SPEED`. Unset or unparsable values keep the current setting.
    pub fn with_env_overrides(mut self) -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        if let Some(width) = parsed("PUYO_WIDTH") {
            self.width = width;
        }
        if let Some(height) = parsed("PUYO_HEIGHT") {
            self.height = height;
        }
        if let Some(size) = parsed("PUYO_GROUP_SIZE") {
            self.required_group_size = size;
        }
        if let Some(speed) = parsed("PUYO_FALL_SPEED") {
            self.fall_speed = speed;
        }
        if let Ok(v) = env::var("PUYO_CRAZY") {
            match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.crazy_mode = true,
                "0" | "false" | "no" | "off" => self.crazy_mode = false,
                _ => {}
            }
        }
        self
    }

    /// Check every invariant the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height < 2 {
            return Err(ConfigError::HeightTooSmall(self.height));
        }
        if self.width > i16::MAX as u16 || self.height > i16::MAX as u16 {
            return Err(ConfigError::BoardTooLarge(self.width, self.height));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for (i, color) in self.palette.iter().enumerate() {
            if self.palette[..i].contains(color) {
                return Err(ConfigError::DuplicateColor(color.as_str()));
            }
        }
        if self.required_group_size == 0 {
            return Err(ConfigError::ZeroGroupSize);
        }
        if self.fall_speed == 0 {
            return Err(ConfigError::ZeroFallSpeed);
        }
        if self.fast_fall_multiplier == 0 {
            return Err(ConfigError::ZeroFastFallMultiplier);
        }
        if !self.pop_duration_secs.is_finite() || self.pop_duration_secs < 0.0 {
            return Err(ConfigError::InvalidPopDuration(self.pop_duration_secs));
        }
        if self.chain_bonus.is_empty() {
            return Err(ConfigError::EmptyTable("chain bonus"));
        }
        if self.color_bonus.is_empty() {
            return Err(ConfigError::EmptyTable("color bonus"));
        }
        if self.group_bonus.is_empty() {
            return Err(ConfigError::EmptyTable("group bonus"));
        }
        let denoms = &self.nuisance_denominations;
        if denoms.first() != Some(&1) || !denoms.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::InvalidDenominations);
        }
        if self.nuisance_target_points == 0 {
            return Err(ConfigError::ZeroTargetPoints);
        }
        Ok(())
    }
}
