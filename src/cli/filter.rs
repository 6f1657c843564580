//! Filter flags shared by listing, report and export commands

use chrono::NaiveDate;
use clap::Args;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{EntryKind, FilterSpec, YearMonth, DATE_FORMAT};

/// Narrow the entries a command works on
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only income or only expense entries
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Exact category name
    #[arg(short, long)]
    pub category: Option<String>,

    /// Calendar month (YYYY-MM)
    #[arg(short, long)]
    pub month: Option<String>,

    /// First day of the date range (YYYY-MM-DD), requires --to
    #[arg(long)]
    pub from: Option<String>,

    /// Last day of the date range (YYYY-MM-DD), requires --from
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    /// Build the filter, rejecting malformed values
    pub fn to_spec(&self) -> LedgerResult<FilterSpec> {
        let mut spec = FilterSpec::all();

        if let Some(kind) = self.kind.as_deref().filter(|k| !is_all(k)) {
            spec = spec.kind(kind.parse::<EntryKind>()?);
        }
        if let Some(category) = self.category.as_deref().filter(|c| !is_all(c)) {
            spec = spec.category(category.trim());
        }
        if let Some(month) = self.month.as_deref().filter(|m| !is_all(m)) {
            spec = spec.month(parse_month(month)?);
        }

        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) => {
                spec = spec.date_range(parse_date(from)?, parse_date(to)?);
            }
            (None, None) => {}
            _ => {
                return Err(LedgerError::Validation(
                    "--from and --to must be given together".into(),
                ))
            }
        }

        Ok(spec)
    }
}

fn is_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

pub fn parse_month(value: &str) -> LedgerResult<YearMonth> {
    value
        .parse()
        .map_err(|e: crate::models::MonthParseError| LedgerError::Validation(e.to_string()))
}

pub fn parse_date(value: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}
