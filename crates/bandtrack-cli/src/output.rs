//! Rendering of scan tables and update summaries.

use serde::Serialize;
use serde_json::json;

use bandtrack_core::rows::RowTable;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Per-worksheet report printed after an `update` run.
#[derive(Debug, Clone, Serialize)]
pub struct WorksheetReport {
    pub worksheet: String,
    pub symbols: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Where the rows landed: "sheets", a CSV path, or "skipped".
    pub sink: String,
}

pub fn render_table(table: &RowTable, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = json!({
                "title": table.title,
                "last_updated": table.updated_at.format_ist_label(),
                "headers": table.headers,
                "rows": table.rows,
            });
            print_json(&payload, pretty)?;
        }
        OutputFormat::Table => print_aligned(table),
    }
    Ok(())
}

pub fn render_reports(
    reports: &[WorksheetReport],
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = json!({ "worksheets": reports });
            print_json(&payload, pretty)?;
        }
        OutputFormat::Table => {
            for report in reports {
                println!(
                    "{}: {}/{} symbols ok -> {}",
                    report.worksheet, report.succeeded, report.symbols, report.sink
                );
            }
        }
    }
    Ok(())
}

fn print_json(payload: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(payload)?
    } else {
        serde_json::to_string(payload)?
    };
    println!("{rendered}");
    Ok(())
}

fn print_aligned(table: &RowTable) {
    println!("{}", table.title);
    println!("Last Updated: {}", table.updated_at.format_ist_label());
    println!();

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    print_row(&table.headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    print_row(&rule, &widths);
    for row in &table.rows {
        print_row(row, &widths);
    }
}

fn print_row(cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let width = widths.get(i).copied().unwrap_or(0);
        line.push_str(cell);
        for _ in cell.chars().count()..width {
            line.push(' ');
        }
    }
    println!("{}", line.trim_end());
}
