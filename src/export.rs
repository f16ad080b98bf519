//! CSV export of a subscription row set.
//!
//! The caller picks the rows (usually the current filtered view) and the
//! order; this module only formats them. Fields are escaped with standard
//! CSV rules, so names and notes containing commas, quotes or newlines
//! survive a round trip through any CSV reader.

use crate::error::{Result, TrackerError};
use crate::types::Subscription;
use chrono::SecondsFormat;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header row of the exported file.
pub const CSV_HEADERS: [&str; 7] = [
    "Name",
    "Cost",
    "Billing Cycle",
    "Category",
    "Next Renewal",
    "Notes",
    "Created At",
];

/// File name offered for downloads.
pub const DEFAULT_EXPORT_FILENAME: &str = "recurly-subscriptions.csv";

/// Write a header row plus one row per subscription. Returns the row count.
pub fn write_csv<W: Write>(subscriptions: &[Subscription], writer: W) -> Result<usize> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;

    for sub in subscriptions {
        let cost = sub.cost.to_string();
        let next_renewal = sub.next_renewal.format("%Y-%m-%d").to_string();
        let created_at = sub.created_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        wtr.write_record([
            sub.name.as_str(),
            cost.as_str(),
            sub.billing_cycle.as_str(),
            sub.category.as_str(),
            next_renewal.as_str(),
            sub.notes.as_deref().unwrap_or(""),
            created_at.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(subscriptions.len())
}

/// Render the export in memory, or `None` when there is nothing to export.
pub fn to_csv_string(subscriptions: &[Subscription]) -> Result<Option<String>> {
    if subscriptions.is_empty() {
        return Ok(None);
    }

    let mut buf = Vec::new();
    write_csv(subscriptions, &mut buf)?;

    String::from_utf8(buf)
        .map(Some)
        .map_err(|e| TrackerError::Export(e.to_string()))
}

/// Write the export to `path`, appending `.csv` if the path lacks it.
///
/// No file is created when `subscriptions` is empty.
pub fn export_to_file(
    subscriptions: &[Subscription],
    path: impl AsRef<Path>,
) -> Result<Option<PathBuf>> {
    if subscriptions.is_empty() {
        debug!("Nothing to export");
        return Ok(None);
    }

    let path = with_csv_extension(path.as_ref());
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    let rows = write_csv(subscriptions, &mut writer)?;
    writer.flush()?;

    debug!(path = %path.display(), rows, "Exported subscriptions");
    Ok(Some(path))
}

fn with_csv_extension(path: &Path) -> PathBuf {
    let is_csv = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".csv");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BillingCycle, Category, SubscriptionId};
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    fn sub(name: &str, cost: f64, cycle: BillingCycle, notes: Option<&str>) -> Subscription {
        Subscription {
            id: SubscriptionId::from(name),
            name: name.to_string(),
            cost,
            billing_cycle: cycle,
            category: Category::new(Category::STREAMING),
            next_renewal: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            notes: notes.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_header_and_rows() {
        let subs = vec![
            sub("Netflix", 15.49, BillingCycle::Monthly, Some("family")),
            sub("GitHub", 120.0, BillingCycle::Yearly, None),
        ];
        let csv = to_csv_string(&subs).unwrap().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Name,Cost,Billing Cycle,Category,Next Renewal,Notes,Created At");
        assert_eq!(
            lines[1],
            "Netflix,15.49,monthly,Streaming,2026-10-20,family,2026-10-18T09:30:00.000Z"
        );
        assert_eq!(
            lines[2],
            "GitHub,120,yearly,Streaming,2026-10-20,,2026-10-18T09:30:00.000Z"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_embedded_delimiters_escaped() {
        let subs = vec![sub(
            "Acme, Inc \"Pro\"",
            5.0,
            BillingCycle::Monthly,
            Some("line one\nline two"),
        )];
        let csv = to_csv_string(&subs).unwrap().unwrap();
        assert!(csv.contains("\"Acme, Inc \"\"Pro\"\"\""));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Acme, Inc \"Pro\"");
        assert_eq!(&record[5], "line one\nline two");
        assert_eq!(record.len(), CSV_HEADERS.len());
    }

    #[test]
    fn test_empty_produces_nothing() {
        assert!(to_csv_string(&[]).unwrap().is_none());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILENAME);
        assert!(export_to_file(&[], &path).unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_export_to_file_adds_suffix() {
        let dir = TempDir::new().unwrap();
        let subs = vec![sub("Netflix", 15.49, BillingCycle::Monthly, None)];

        let written = export_to_file(&subs, dir.path().join("report")).unwrap().unwrap();
        assert_eq!(written, dir.path().join("report.csv"));

        let contents = std::fs::read_to_string(&written).unwrap();
        assert!(contents.starts_with("Name,Cost,"));
        assert!(contents.contains("Netflix,15.49,monthly"));

        let written = export_to_file(&subs, dir.path().join("keep.CSV")).unwrap().unwrap();
        assert_eq!(written, dir.path().join("keep.CSV"));
    }
}
