//! Entry display formatting

use super::truncate;
use crate::models::{Entry, DATE_FORMAT};

/// One register line: date, kind, category, title, signed amount
pub fn format_entry_row(entry: &Entry, symbol: &str) -> String {
    format!(
        "{} {:7} {:16} {:20} {:>14}",
        entry.date.format(DATE_FORMAT),
        entry.kind.label(),
        truncate(&entry.category, 16),
        truncate(entry.title.as_deref().unwrap_or(""), 20),
        entry.signed_amount().format_with_symbol(symbol)
    )
}

/// Entries as a register with a header and id column
pub fn format_entry_register(entries: &[Entry], symbol: &str) -> String {
    if entries.is_empty() {
        return "No entries found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:7} {:16} {:20} {:>14}  {}\n",
        "Date", "Type", "Category", "Title", "Amount", "ID"
    ));
    output.push_str(&"-".repeat(74));
    output.push('\n');

    for entry in entries {
        output.push_str(&format_entry_row(entry, symbol));
        output.push_str("  ");
        output.push_str(&entry.id.to_string());
        output.push('\n');
    }

    output
}

pub fn format_entry_details(entry: &Entry, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Entry:       {}\n", entry.id));
    output.push_str(&format!("Type:        {}\n", entry.kind));
    output.push_str(&format!("Date:        {}\n", entry.date.format(DATE_FORMAT)));
    output.push_str(&format!(
        "Amount:      {}\n",
        entry.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Category:    {}\n", entry.category));

    if let Some(title) = &entry.title {
        output.push_str(&format!("Title:       {}\n", title));
    }
    if let Some(description) = &entry.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    output.push_str(&format!(
        "Updated:     {}\n",
        entry.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
