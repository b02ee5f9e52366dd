//! Ad-hoc band scan for symbols given on the command line.

use bandtrack_core::{assemble, BatchOrchestrator, Symbol, Timeframe, UtcDateTime};

use crate::cli::{Cli, ScanArgs, TimeframeArg};
use crate::error::CliError;
use crate::output;

pub async fn run(cli: &Cli, args: &ScanArgs) -> Result<(), CliError> {
    let symbols = args
        .symbols
        .iter()
        .map(|raw| Symbol::parse(&raw.trim().to_ascii_uppercase()))
        .collect::<Result<Vec<_>, _>>()?;
    if symbols.is_empty() {
        return Err(CliError::NoSymbols);
    }

    let timeframe = match args.timeframe {
        TimeframeArg::Daily => Timeframe::Daily,
        TimeframeArg::Hourly => Timeframe::Hourly,
    };

    let source = super::build_source(cli);
    let orchestrator = BatchOrchestrator::new(super::batch_config(cli)?);
    let batch = orchestrator.run(&source, &symbols, timeframe).await;

    let title = format!("Scan {} BB", timeframe.label());
    let table = assemble(&batch, &title, UtcDateTime::now());
    output::render_table(&table, cli.format, cli.pretty)
}
