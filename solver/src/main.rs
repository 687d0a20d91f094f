use std::fs;
use std::thread;

use anyhow::Context;
use clap::Parser;
use enclosure::config::parse_seconds;
use enclosure::{Enclosure, Level, LevelRecord, MilpSolver, SolveOptions, SolveStatus};
use log::{error, warn};

mod render;

/// Shown when no level is given or a given level cannot be read.
const FOUR_SQUARE: &str = r#"{"id":"qS_Kov","map":"...............\n.~.~~~~..~~~~~.\n.~...~...~...~.\n.~.1.......0.~.\n.~...~...~.....\n.~~..~...~.~~~.\n.......~.....~.\n....~..H...~...\n.~.......~.....\n.~~.~~.....~.~.\n.....~...~...~.\n.~G0....~~.1G~.\n.~...~...~.....\n.~~~~~...~~~~~.\n.......~.......","budget":10,"name":"4 Square","description":null,"creatorName":"Shivers"}"#;

#[derive(Parser)]
#[command(author, version, about = "Find the best enclosure for enclose-the-horse levels", long_about = None)]
struct Args {
    /// Level JSON files or raw JSON strings
    #[arg(value_name = "LEVEL")]
    levels: Vec<String>,

    /// Do not print the solved board
    #[arg(short = 'n', long = "no-solved-board")]
    no_solved_board: bool,

    /// Give up on a level after this many seconds, overriding ENCLOSURE_TIME_LIMIT
    #[arg(long = "time-limit", value_name = "SECONDS")]
    time_limit: Option<String>,
}

fn builtin() -> anyhow::Result<LevelRecord> {
    Ok(LevelRecord::from_json(FOUR_SQUARE)?)
}

/// A file path is tried first, then the argument itself as JSON.
fn load(argument: &str) -> anyhow::Result<LevelRecord> {
    let json = fs::read_to_string(argument).unwrap_or_else(|_| argument.to_string());
    match LevelRecord::from_json(&json) {
        Ok(record) => Ok(record),
        Err(err) => {
            error!("could not read level data from {argument:?}: {err}");
            warn!("using the built-in level instead");
            builtin()
        }
    }
}

fn report(record: &LevelRecord, level: &Level, enclosure: &Enclosure, show_board: bool) {
    println!("=== {} ===", record.display_name());
    println!("Size: {}x{}, budget {}", level.width(), level.height(), level.budget());
    println!("Status: {}", enclosure.status());

    let Some(score) = enclosure.score() else {
        println!();
        return;
    };
    println!("Total Score: {score}");
    println!("Walls Used: {}/{}", enclosure.walls().len(), level.budget());

    if show_board {
        println!();
        print!("{}", render::board(level, enclosure));
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut options = SolveOptions::from_env()?;
    if let Some(raw) = &args.time_limit {
        options.time_limit = Some(parse_seconds(raw)?);
    }

    let records = if args.levels.is_empty() {
        vec![builtin()?]
    } else {
        args.levels.iter().map(String::as_str).map(load).collect::<anyhow::Result<Vec<_>>>()?
    };
    let levels = records.iter()
        .map(|record| record.level().with_context(|| format!("level {} is not playable", record.display_name())))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let options = &options;
    let enclosures = thread::scope(|scope| {
        let handles = levels.iter()
            .map(|level| scope.spawn(move || level.solve(&MilpSolver, options)))
            .collect::<Vec<_>>();
        handles.into_iter()
            .map(|handle| handle.join().unwrap_or_else(|_| Enclosure::unsolved(SolveStatus::Error)))
            .collect::<Vec<_>>()
    });

    for ((record, level), enclosure) in records.iter().zip(&levels).zip(&enclosures) {
        report(record, level, enclosure, !args.no_solved_board);
    }

    Ok(())
}
