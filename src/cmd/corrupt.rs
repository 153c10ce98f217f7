use super::ConsoleProgress;
use crate::reports;
use clap::Args;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::info;
use typoforge::config::Config;
use typoforge::{api, corrupt_batch, Tally, TfResult};

#[derive(Args, Debug, Clone)]
pub struct CorruptArgs {
    #[command(flatten)]
    pub config: Config,

    /// Text file to corrupt line by line; stdin when omitted
    #[arg(short, long)]
    pub input: Option<String>,

    /// Print a per-operation tally after the output
    #[arg(long, default_value_t = false)]
    pub report: bool,
}

fn read_lines(input: &Option<String>) -> TfResult<Vec<String>> {
    let lines = match input {
        Some(path) => BufReader::new(File::open(path)?)
            .lines()
            .collect::<Result<Vec<_>, _>>()?,
        None => io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?,
    };
    Ok(lines)
}

pub fn run(args: &CorruptArgs, config: &Config) -> TfResult<()> {
    let (model, _, _) = api::build_model(config, &ConsoleProgress::default())?;
    let lines = read_lines(&args.input)?;

    let weight = config.generation.weight;
    let seed = config.generation.seed;
    info!(
        "🎲 Corrupting {} lines (weight {}, seed {})",
        lines.len(),
        weight,
        seed
    );

    let results = corrupt_batch(&model, &lines, weight, seed)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut total = Tally::default();
    for result in &results {
        writeln!(out, "{}", result.text)?;
        total.merge(&result.tally);
    }
    out.flush()?;

    if args.report {
        reports::print_tally(&total);
    }
    Ok(())
}
