use super::ConsoleProgress;
use crate::reports;
use clap::Args;
use tracing::info;
use typoforge::api;
use typoforge::config::Config;
use typoforge::TfResult;

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub config: Config,
}

pub fn run(config: &Config) -> TfResult<()> {
    info!(
        "⛏️  Extracting {} statistics for layout {}",
        config.corpus.corpus_source, config.corpus.layout
    );
    let outcome = api::load_statistics(config, &ConsoleProgress::default())?;
    reports::print_extraction_report(&outcome);
    Ok(())
}
