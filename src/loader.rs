// Snapshot Loader - reads an exported record feed from disk
// JSON (array of rows) or CSV (header row with feed field names).

use crate::record::RawRecord;
use crate::store::RecordStore;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Csv,
}

impl SnapshotFormat {
    /// Pick the format from the file extension
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(SnapshotFormat::Json),
            Some("csv") => Ok(SnapshotFormat::Csv),
            _ => bail!(
                "Unsupported snapshot file '{}' (expected .json or .csv)",
                path.display()
            ),
        }
    }
}

pub fn load_snapshot(path: &Path) -> Result<RecordStore> {
    let rows = match SnapshotFormat::detect(path)? {
        SnapshotFormat::Json => load_json(path)?,
        SnapshotFormat::Csv => load_csv(path)?,
    };

    let store = RecordStore::from_raw(rows).with_source(path.display().to_string());
    info!(path = %path.display(), records = store.len(), "snapshot loaded");

    Ok(store)
}

pub fn load_json(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot {}", path.display()))?;

    let rows: Vec<RawRecord> = serde_json::from_reader(BufReader::new(file))
        .context("Failed to deserialize JSON snapshot")?;

    Ok(rows)
}

pub fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::Reader::from_path(path).context("Failed to open CSV file")?;

    let mut rows = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // +2: header is line 1
        let row: RawRecord = result
            .with_context(|| format!("Failed to deserialize record on line {}", index + 2))?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_json_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "users.json",
            r#"[
                {"name": "Ann", "email": "ann@x.io", "AnnualIncome": 50000, "LoanAmount": 10000, "RiskScore": 30},
                {"name": "Bo", "email": "bo@x.io", "AnnualIncome": 80000, "LoanAmount": 20000}
            ]"#,
        );

        let store = load_snapshot(&path).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].risk_score, 30.0);
        assert_eq!(store.records()[1].risk_score, 50.0);
        assert!(store.source().unwrap().ends_with("users.json"));
    }

    #[test]
    fn test_load_csv_snapshot_with_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "users.csv",
            "name,email,AnnualIncome,LoanAmount,LengthOfCreditHistory,DebtToIncomeRatio,EmploymentStatus,RiskScore\n\
             Ann,ann@x.io,50000,10000,4,0.2,employed,30\n\
             Bo,bo@x.io,,20000,,,,\n",
        );

        let store = load_snapshot(&path).unwrap();

        assert_eq!(store.len(), 2);
        let bo = &store.records()[1];
        assert_eq!(bo.annual_income, 0.0);
        assert_eq!(bo.loan_amount, 20000.0);
        assert_eq!(bo.risk_score, 50.0);
        assert_eq!(bo.employment_status, None);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = SnapshotFormat::detect(Path::new("users.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported snapshot file"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_snapshot(Path::new("/nonexistent/users.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/users.json"));
    }
}
