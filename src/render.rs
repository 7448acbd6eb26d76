//! Plain-text rendering of result pages.

use std::fmt::Write;

use pack_search::AggregatedRecord;

/// Group a count with thousands separators: `1234567` → `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render one record as a numbered, multi-line entry.
pub fn render_record(position: usize, record: &AggregatedRecord) -> String {
    let mut out = format!(
        "{position:>3}. {} by {} ({} downloads)",
        record.title,
        record.author,
        format_count(record.downloads)
    );
    if let Some(version) = &record.version {
        let _ = write!(out, " [{version}]");
    }
    if !record.description.is_empty() {
        let _ = write!(out, "\n     {}", record.description);
    }
    if let Some(link) = &record.modrinth {
        let _ = write!(out, "\n     Modrinth:   {link}");
    }
    if let Some(link) = &record.curseforge {
        let _ = write!(out, "\n     CurseForge: {link}");
    }
    out
}

/// Render a page of records, numbering from `first_position`.
pub fn render_page(records: &[AggregatedRecord], first_position: usize) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| render_record(first_position + i, record))
        .collect::<Vec<_>>()
        .join("\n\n")
}
