// src/commands/output.rs
//! Plain-text tables for command output

use sedot::scrape::VideoMetadata;
use std::io::{self, Write};

/// Longest caption shown in the metadata table, in characters
const CAPTION_PREVIEW_CHARS: usize = 200;

/// Print a table with a header row and aligned columns
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(&mut handle, &header, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut handle, &separator, &widths);
    for row in rows {
        write_row(&mut handle, row, &widths);
    }
}

/// Print `label  value` pairs under a title
pub fn output_fields(title: &str, fields: &[(&str, String)]) {
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", title);
    for (label, value) in fields {
        let _ = writeln!(handle, "  {:<width$}  {}", label, value, width = width);
    }
}

fn write_row(handle: &mut impl Write, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        match widths.get(i) {
            Some(width) if i + 1 < cells.len() => {
                line.push_str(&format!("{:<width$}", cell, width = *width));
            }
            _ => line.push_str(cell),
        }
    }
    // Ignore broken pipe errors (e.g., piped to `head`)
    let _ = writeln!(handle, "{}", line);
}

/// Rows of the metadata table
pub fn metadata_fields(metadata: &VideoMetadata) -> Vec<(&'static str, String)> {
    let caption: String = metadata
        .caption
        .as_deref()
        .unwrap_or("-")
        .chars()
        .take(CAPTION_PREVIEW_CHARS)
        .collect();
    vec![
        ("Platform", metadata.platform.to_string()),
        ("Title", metadata.title.clone().unwrap_or_else(|| "-".to_string())),
        ("Caption", caption),
        ("Video URL", metadata.video_url.clone()),
        ("Filename", metadata.filename.clone()),
    ]
}

pub fn print_metadata(metadata: &VideoMetadata) {
    output_fields("Metadata", &metadata_fields(metadata));
}
