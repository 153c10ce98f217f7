use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info, Level};
use typoforge::config::Config;
use typoforge::TfResult;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; flags typed on the command line override it
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mine (or load cached) edit statistics from the corpus
    Extract(cmd::extract::ExtractArgs),
    /// Build the model and print its probability tables
    Inspect(cmd::inspect::InspectArgs),
    /// Corrupt text line by line
    Corrupt(cmd::corrupt::CorruptArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Extract(_) => "extract",
            Commands::Inspect(_) => "inspect",
            Commands::Corrupt(_) => "corrupt",
        }
    }

    fn config(&self) -> &Config {
        match self {
            Commands::Extract(args) => &args.config,
            Commands::Inspect(args) => &args.config,
            Commands::Corrupt(args) => &args.config,
        }
    }
}

fn resolve_config(cli: &Cli, sub_matches: Option<&ArgMatches>) -> TfResult<Config> {
    let cli_config = cli.command.config();
    let Some(path) = &cli.config else {
        return Ok(cli_config.clone());
    };

    info!("⚙️  Loading config from: {}", path);
    let mut config = Config::load_from_file(path)?;
    if let Some(sub_matches) = sub_matches {
        config.merge_from_cli(cli_config, sub_matches);
    }
    Ok(config)
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let sub_matches = matches.subcommand_matches(cli.command.name());
    let config = resolve_config(&cli, sub_matches).and_then(|c| {
        c.validate()?;
        Ok(c)
    });
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("❌ {}", e);
            process::exit(2);
        }
    };

    let result = match &cli.command {
        Commands::Extract(_) => cmd::extract::run(&config),
        Commands::Inspect(args) => cmd::inspect::run(args, &config),
        Commands::Corrupt(args) => cmd::corrupt::run(args, &config),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
