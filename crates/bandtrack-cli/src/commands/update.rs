//! Worksheet refresh across watched categories and timeframes.
//!
//! Each category/timeframe pair is independent: a failed symbol list or an
//! empty watchlist skips that worksheet and the run continues. Only a total
//! absence of symbols, or a worksheet that can be written neither to Sheets
//! nor to the CSV fallback, fails the command.

use tracing::warn;

use bandtrack_core::{assemble, BatchOrchestrator, Category, HttpAuth, Timeframe, UtcDateTime};
use bandtrack_sheets::{
    worksheet_name, CsvBackup, GoogleSheetsWriter, SheetError, SheetSymbolSource, SheetWriter,
    StaticSymbolSource, SymbolSource,
};

use crate::cli::{CategoryArg, Cli, TimeframeSelect, UpdateArgs};
use crate::error::CliError;
use crate::output::{self, WorksheetReport};

const SPREADSHEET_ENV: &str = "GSHEETS_SPREADSHEET_ID";
const TOKEN_ENV: &str = "GSHEETS_ACCESS_TOKEN";

pub async fn run(cli: &Cli, args: &UpdateArgs) -> Result<(), CliError> {
    let timeframes: Vec<Timeframe> = match args.timeframe {
        TimeframeSelect::Daily => vec![Timeframe::Daily],
        TimeframeSelect::Hourly => vec![Timeframe::Hourly],
        TimeframeSelect::Both => vec![Timeframe::Daily, Timeframe::Hourly],
    };
    let categories = selected_categories(&args.categories);
    let spreadsheet_id = resolve_spreadsheet_id(cli, args)?;

    let http = super::http_client(cli);
    let auth = if cli.mock {
        HttpAuth::None
    } else {
        let token = std::env::var(TOKEN_ENV).map_err(|_| SheetError::MissingToken)?;
        HttpAuth::BearerToken(token)
    };

    let writer = GoogleSheetsWriter::new(http.clone(), spreadsheet_id.clone(), auth.clone());
    let backup = CsvBackup::new(&args.backup_dir);
    let symbol_source: Box<dyn SymbolSource> = if cli.mock {
        Box::new(StaticSymbolSource::mock_defaults())
    } else {
        Box::new(SheetSymbolSource::new(http, spreadsheet_id, auth))
    };

    let source = super::build_source(cli);
    let orchestrator = BatchOrchestrator::new(super::batch_config(cli)?);

    let mut reports = Vec::new();
    let mut total_symbols = 0_usize;

    for timeframe in &timeframes {
        for category in &categories {
            let worksheet = worksheet_name(*category, *timeframe);

            let symbols = match symbol_source.list_symbols(*category).await {
                Ok(symbols) => symbols,
                Err(error) => {
                    warn!(worksheet = %worksheet, "could not read watchlist: {error}");
                    reports.push(skipped_report(&worksheet));
                    continue;
                }
            };
            if symbols.is_empty() {
                warn!(worksheet = %worksheet, "watchlist is empty, skipping");
                reports.push(skipped_report(&worksheet));
                continue;
            }
            total_symbols += symbols.len();

            let batch = orchestrator.run(&source, &symbols, *timeframe).await;
            let table = assemble(&batch, &worksheet, UtcDateTime::now());

            let sink = match writer.replace_worksheet(&worksheet, &table).await {
                Ok(()) => String::from("sheets"),
                Err(sheet_error) => {
                    warn!(worksheet = %worksheet, "sheet write failed, falling back to CSV: {sheet_error}");
                    match backup.write(&table) {
                        Ok(path) => path.display().to_string(),
                        Err(backup_error) => {
                            return Err(CliError::SinkUnavailable {
                                sheet: sheet_error.to_string(),
                                backup: backup_error.to_string(),
                            })
                        }
                    }
                }
            };

            reports.push(WorksheetReport {
                worksheet,
                symbols: batch.len(),
                succeeded: batch.succeeded(),
                failed: batch.failed(),
                sink,
            });
        }
    }

    if total_symbols == 0 {
        return Err(CliError::NoSymbols);
    }

    output::render_reports(&reports, cli.format, cli.pretty)
}

fn selected_categories(args: &[CategoryArg]) -> Vec<Category> {
    if args.is_empty() {
        return Category::ALL.to_vec();
    }

    let mut categories = Vec::new();
    for arg in args {
        let category = match arg {
            CategoryArg::Nifty50 => Category::Nifty50,
            CategoryArg::Smallcap100 => Category::Smallcap100,
            CategoryArg::Midcap100 => Category::Midcap100,
        };
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}

fn resolve_spreadsheet_id(cli: &Cli, args: &UpdateArgs) -> Result<String, CliError> {
    if let Some(id) = &args.spreadsheet_id {
        return Ok(id.clone());
    }
    if let Ok(id) = std::env::var(SPREADSHEET_ENV) {
        if !id.trim().is_empty() {
            return Ok(id);
        }
    }
    if cli.mock {
        return Ok(String::from("mock-spreadsheet"));
    }
    Err(CliError::Command(format!(
        "--spreadsheet-id or {SPREADSHEET_ENV} is required"
    )))
}

fn skipped_report(worksheet: &str) -> WorksheetReport {
    WorksheetReport {
        worksheet: worksheet.to_owned(),
        symbols: 0,
        succeeded: 0,
        failed: 0,
        sink: String::from("skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_all_categories() {
        let categories = selected_categories(&[]);
        assert_eq!(categories, Category::ALL.to_vec());
    }

    #[test]
    fn deduplicates_repeated_category_flags() {
        let categories =
            selected_categories(&[CategoryArg::Nifty50, CategoryArg::Nifty50, CategoryArg::Midcap100]);
        assert_eq!(categories, vec![Category::Nifty50, Category::Midcap100]);
    }
}
