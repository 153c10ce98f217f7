use super::ConsoleProgress;
use crate::reports;
use clap::Args;
use typoforge::api;
use typoforge::config::Config;
use typoforge::TfResult;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub config: Config,

    /// Rows per table, most error-prone first
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}

pub fn run(args: &InspectArgs, config: &Config) -> TfResult<()> {
    let (model, report, outcome) = api::build_model(config, &ConsoleProgress::default())?;

    reports::print_extraction_report(&outcome);
    reports::print_build_report(&report);
    reports::print_char_table(&model, args.top);
    reports::print_transposition_table(&model, args.top);
    Ok(())
}
