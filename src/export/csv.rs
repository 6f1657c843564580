//! CSV export of entries
//!
//! One row per entry with a fixed header. Amounts are unsigned magnitudes
//! with two decimals; the `Type` column carries the sign. Quoting follows
//! standard CSV rules, so commas, quotes and newlines in free text survive a
//! round trip.

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Entry, EntryKind, FilterSpec, Money, DATE_FORMAT};

/// Column names, in order
pub const CSV_HEADER: [&str; 6] = ["Type", "Category", "Title", "Amount", "Description", "Date"];

/// A rendered export: suggested file name plus CSV text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// One row read back from an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub kind: EntryKind,
    pub category: String,
    pub title: Option<String>,
    pub amount: Money,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl From<&Entry> for CsvRow {
    fn from(entry: &Entry) -> Self {
        Self {
            kind: entry.kind,
            category: entry.category.clone(),
            title: entry.title.clone(),
            amount: entry.amount,
            description: entry.description.clone(),
            date: entry.date,
        }
    }
}

/// Serialize `entries` in the order given
///
/// `applied` only shapes the file name; the entries are expected to be
/// filtered already.
pub fn to_csv(entries: &[Entry], applied: &FilterSpec, today: NaiveDate) -> LedgerResult<CsvExport> {
    let mut writer = ::csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for entry in entries {
        let amount = entry.amount.abs().to_string();
        let date = entry.date.format(DATE_FORMAT).to_string();
        writer.write_record([
            entry.kind.as_str(),
            entry.category.as_str(),
            entry.title.as_deref().unwrap_or(""),
            amount.as_str(),
            entry.description.as_deref().unwrap_or(""),
            date.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    let content = String::from_utf8(bytes).map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(CsvExport {
        filename: export_filename(applied, today),
        content,
    })
}

/// `transactions_<today>[_<month>][_<category>][_<start>_to_<end>].csv`
pub fn export_filename(applied: &FilterSpec, today: NaiveDate) -> String {
    let mut name = format!("transactions_{}", today.format(DATE_FORMAT));

    if let Some(month) = applied.month {
        name.push('_');
        name.push_str(&month.to_string());
    }
    if let Some(category) = &applied.category {
        name.push('_');
        name.push_str(&sanitize_component(category));
    }
    if let Some(range) = &applied.date_range {
        name.push('_');
        name.push_str(&range.to_string());
    }

    name.push_str(".csv");
    name
}

fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Read an export produced by [`to_csv`] back into rows
pub fn parse_csv(content: &str) -> LedgerResult<Vec<CsvRow>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(LedgerError::Export(format!(
            "unexpected CSV header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2;
        let field = |i: usize| record.get(i).unwrap_or("");

        let kind: EntryKind = field(0).parse()?;
        let amount = Money::parse(field(3))
            .map_err(|e| LedgerError::Export(format!("line {}: {}", line, e)))?;
        let date = NaiveDate::parse_from_str(field(5), DATE_FORMAT)
            .map_err(|e| LedgerError::Export(format!("line {}: {}", line, e)))?;

        rows.push(CsvRow {
            kind,
            category: field(1).to_string(),
            title: optional(field(2)),
            amount,
            description: optional(field(4)),
            date,
        });
    }
    Ok(rows)
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
