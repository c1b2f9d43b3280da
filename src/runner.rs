//! Headless runner: drives a session with a seeded placement bot.
//!
//! Each pair is nudged down one row, rotated a random number of times, slid
//! toward a random column and hard dropped. The runner then ticks until the
//! chain finishes and the next pair is falling (or the game is over).

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use crate::core::{ChainEvent, EngineConfig, GameSnapshot, Session, SessionEvent, SimpleRng};
use crate::types::{GameAction, Phase};

/// Upper bound on ticks spent resolving a single placement
const MAX_TICKS_PER_PIECE: u32 = 1_000_000;

pub const USAGE: &str = "usage: puyo-chain [--seed N] [--pieces N] [--config FILE] [--width W] \
[--height H] [--crazy] [--dt SECS] [--json]";

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub seed: u32,
    pub pieces: u32,
    pub config_path: Option<PathBuf>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub crazy: bool,
    /// Seconds per tick
    pub dt: f32,
    pub json: bool,
    /// JSON-lines event log (`PUYO_LOG_PATH`)
    pub log_path: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            pieces: 100,
            config_path: None,
            width: None,
            height: None,
            crazy: false,
            dt: 1.0 / 60.0,
            json: false,
            log_path: None,
        }
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a String> {
    args.get(i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let v = value(args, i, flag)?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

/// Parse command-line arguments (program name excluded).
///
/// Returns `Ok(None)` when `--help` was requested.
pub fn parse_runner_args(args: &[String]) -> Result<Option<RunnerConfig>> {
    let mut config = RunnerConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                config.seed = parse_value(args, i, "--seed")?;
            }
            "--pieces" => {
                i += 1;
                config.pieces = parse_value(args, i, "--pieces")?;
            }
            "--config" => {
                i += 1;
                config.config_path = Some(PathBuf::from(value(args, i, "--config")?));
            }
            "--width" => {
                i += 1;
                config.width = Some(parse_value(args, i, "--width")?);
            }
            "--height" => {
                i += 1;
                config.height = Some(parse_value(args, i, "--height")?);
            }
            "--dt" => {
                i += 1;
                let dt: f32 = parse_value(args, i, "--dt")?;
                if !dt.is_finite() || dt <= 0.0 {
                    bail!("--dt must be a positive number of seconds (got {})", dt);
                }
                config.dt = dt;
            }
            "--crazy" => config.crazy = true,
            "--json" => config.json = true,
            "-h" | "--help" => return Ok(None),
            other => bail!("unknown argument: {}", other),
        }
        i += 1;
    }

    config.log_path = std::env::var("PUYO_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) });

    Ok(Some(config))
}

/// Resolve the engine config: file (or defaults), then env, then flags
pub fn load_engine_config(runner: &RunnerConfig) -> Result<EngineConfig> {
    let base = match &runner.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            EngineConfig::from_json_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let mut config = base.with_env_overrides();
    if let Some(width) = runner.width {
        config.width = width;
    }
    if let Some(height) = runner.height {
        config.height = height;
    }
    if runner.crazy {
        config.crazy_mode = true;
    }
    config.validate().context("invalid engine configuration")?;
    Ok(config)
}

#[derive(Serialize)]
struct LogRecord<'a> {
    episode_id: u32,
    elapsed_secs: f64,
    #[serde(flatten)]
    event: &'a SessionEvent,
}

/// Optional JSON-lines sink for session events
pub struct EventLog {
    file: Option<BufWriter<File>>,
}

impl EventLog {
    /// Open `path` for appending. A file that cannot be opened disables logging.
    pub fn open(path: Option<&str>) -> Self {
        let file = path.and_then(|p| {
            match OpenOptions::new().create(true).append(true).open(p) {
                Ok(f) => Some(BufWriter::new(f)),
                Err(e) => {
                    eprintln!("[puyo-chain] log disabled: cannot open {}: {}", p, e);
                    None
                }
            }
        });
        Self { file }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn record(&mut self, session: &Session, event: &SessionEvent) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let rec = LogRecord {
            episode_id: session.episode_id(),
            elapsed_secs: session.elapsed_secs(),
            event,
        };
        let ok = serde_json::to_writer(&mut *file, &rec).is_ok() && file.write_all(b"\n").is_ok();
        if !ok {
            eprintln!("[puyo-chain] log disabled: write failed");
            self.file = None;
        }
    }

    pub fn flush(&mut self) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(e) = file.flush() {
            eprintln!("[puyo-chain] log disabled: flush failed: {}", e);
            self.file = None;
        }
    }
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub pieces_placed: u32,
    pub passes: u32,
    pub longest_chain: u32,
    pub score: u64,
    pub game_over: bool,
    pub snapshot: GameSnapshot,
}

/// One human-readable line per clear pass
pub fn format_chain_line(event: &ChainEvent) -> String {
    let nuisance = if event.denominations.is_empty() {
        "None".to_string()
    } else {
        event
            .denominations
            .iter()
            .map(|d| match d.count {
                1 => d.value.to_string(),
                n => format!("{}x{}", d.value, n),
            })
            .collect::<Vec<_>>()
            .join("+")
    };
    format!(
        "Chain {}: {} puyos cleared (+{}) -> Nuisance Puyo: {} ({}) (+{:.2} leftover)",
        event.chain, event.cleared, event.increment, nuisance, event.nuisance_count, event.leftover
    )
}

/// Place one pair: nudge down, rotate, slide toward `column`, hard drop
fn place_pair(session: &mut Session, rotations: u32, column: i16) {
    session.process_input(GameAction::Drop);
    for _ in 0..rotations {
        session.process_input(GameAction::RotateCw);
    }
    while let Some(pair) = session.active() {
        let action = match pair.pivot.x.cmp(&column) {
            std::cmp::Ordering::Less => GameAction::MoveRight,
            std::cmp::Ordering::Greater => GameAction::MoveLeft,
            std::cmp::Ordering::Equal => break,
        };
        if !session.process_input(action) {
            break;
        }
    }
    session.process_input(GameAction::HardDrop);
}

/// Run the bot for `runner.pieces` placements or until game over.
///
/// `on_chain` sees every completed clear pass, in order.
pub fn run_session(
    runner: &RunnerConfig,
    config: EngineConfig,
    log: &mut EventLog,
    mut on_chain: impl FnMut(&ChainEvent),
) -> Result<RunSummary> {
    let width = config.width;
    let mut session = Session::new(config, runner.seed).context("creating session")?;
    let mut bot = SimpleRng::new(runner.seed ^ 0x9E37_79B9);

    let mut pieces_placed = 0u32;
    let mut passes = 0u32;
    let mut longest_chain = 0u32;

    let mut drain = |session: &mut Session, log: &mut EventLog| {
        for event in session.take_events() {
            log.record(session, &event);
            match &event {
                SessionEvent::Chain(chain) => {
                    passes += 1;
                    longest_chain = longest_chain.max(chain.chain);
                    on_chain(chain);
                }
                SessionEvent::GameOver { score, pieces } => {
                    eprintln!("[puyo-chain] game over: score={} pieces={}", score, pieces);
                }
                SessionEvent::Locked { .. } => {}
            }
        }
    };

    drain(&mut session, log);
    while pieces_placed < runner.pieces && session.is_running() {
        let rotations = bot.next_range(4);
        let column = bot.next_range(width as u32) as i16;
        place_pair(&mut session, rotations, column);
        pieces_placed += 1;
        drain(&mut session, log);

        let mut ticks = 0u32;
        while session.phase() != Phase::Falling && session.is_running() {
            session.tick(runner.dt);
            drain(&mut session, log);
            ticks += 1;
            if ticks > MAX_TICKS_PER_PIECE {
                bail!("chain did not resolve within {} ticks", MAX_TICKS_PER_PIECE);
            }
        }
    }
    log.flush();

    Ok(RunSummary {
        pieces_placed,
        passes,
        longest_chain,
        score: session.score(),
        game_over: !session.is_running(),
        snapshot: session.snapshot(),
    })
}
