//! Headless puyo-chain runner (default binary).
//!
//! Plays a deterministic game with a seeded placement bot and prints every
//! chain pass plus a final summary. `--json` prints the final snapshot instead.

use anyhow::Result;

use puyo_chain::runner::{
    format_chain_line, load_engine_config, parse_runner_args, run_session, EventLog, USAGE,
};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(runner) = parse_runner_args(&args)? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let config = load_engine_config(&runner)?;
    eprintln!(
        "[puyo-chain] start: seed={} board={}x{} group={} crazy={} pieces={}",
        runner.seed,
        config.width,
        config.height,
        config.required_group_size,
        config.crazy_mode,
        runner.pieces
    );

    let mut log = EventLog::open(runner.log_path.as_deref());
    if log.is_enabled() {
        eprintln!(
            "[puyo-chain] logging events to {}",
            runner.log_path.as_deref().unwrap_or_default()
        );
    }

    let quiet = runner.json;
    let summary = run_session(&runner, config, &mut log, |event| {
        if !quiet {
            println!("{}", format_chain_line(event));
        }
    })?;

    if runner.json {
        println!("{}", serde_json::to_string_pretty(&summary.snapshot)?);
    } else {
        println!(
            "Placed {} pieces: score {} over {} passes, longest chain {}{}",
            summary.pieces_placed,
            summary.score,
            summary.passes,
            summary.longest_chain,
            if summary.game_over { " (game over)" } else { "" }
        );
    }
    Ok(())
}
