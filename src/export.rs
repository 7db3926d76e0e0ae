// Exporter - filtered, ordered view → simple CSV
//
// Plain comma-joined fields: no quoting, no escaping. A comma inside a name
// or email shifts that row's columns; callers accept that limitation.

use crate::record::Record;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Display labels, not field names
pub const EXPORT_HEADERS: [&str; 6] = [
    "Name",
    "Email",
    "Income",
    "Loan Amount",
    "Credit History",
    "Risk Score",
];

/// `users_export_<YYYY-MM-DD>.csv` for the day the export runs
pub fn export_filename(date: NaiveDate) -> String {
    format!("users_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Calendar date of `now` in UTC; exports are named by the UTC day
pub fn export_date_at<Tz: TimeZone>(now: DateTime<Tz>) -> NaiveDate {
    now.with_timezone(&Utc).date_naive()
}

pub fn export_date() -> NaiveDate {
    export_date_at(Utc::now())
}

/// Fields of one export row in column order
pub fn export_row(record: &Record) -> [String; 6] {
    [
        record.name.clone(),
        record.email.clone(),
        format_number(record.annual_income),
        format_number(record.loan_amount),
        format_number(record.credit_history_years),
        format_number(record.risk_score),
    ]
}

/// Shortest round-trip decimal (50000, 0.5, 33.25). Magnitudes of 1e21 and
/// above, or below 1e-6, switch to exponent form: 1e+21, 2.5e-7.
fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && value.is_finite() && !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", value);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        }
    } else {
        format!("{}", value)
    }
}

/// Header plus one line per record, `\n`-separated, no trailing newline
pub fn to_csv_text(records: &[&Record]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(EXPORT_HEADERS)
        .context("Failed to write export header")?;

    for record in records {
        wtr.write_record(export_row(record))
            .context("Failed to write export row")?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush export buffer: {}", e.error()))?;
    let mut text = String::from_utf8(bytes).context("Export produced invalid UTF-8")?;

    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

/// File-save side of the export: writes `users_export_<date>.csv` into `dir`
pub fn write_export(dir: &Path, records: &[&Record], date: NaiveDate) -> Result<PathBuf> {
    let text = to_csv_text(records)?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_filename(date));
    fs::write(&path, text.as_bytes())
        .with_context(|| format!("Failed to write export {}", path.display()))?;

    info!(path = %path.display(), rows = records.len(), "export written");

    Ok(path)
}
