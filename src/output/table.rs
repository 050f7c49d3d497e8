//! Table output

use crate::domain::Manifest;
use std::io::{self, Write};

/// Spaces between columns
const PADDING: usize = 5;

const HEADERS: [&str; 6] = ["Name", "Current Version", "Latest Version", "Type", "Mask", "Notes"];

const RULE: &str = "------";

/// Write the manifest as aligned columns
pub fn write_table(manifest: &Manifest, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "API Version: {:?}", manifest.api_version)?;
    writeln!(out)?;

    let mut rows: Vec<[String; 6]> = Vec::with_capacity(manifest.len() + 2);
    rows.push(HEADERS.map(str::to_string));
    rows.push([RULE; 6].map(str::to_string));
    for spec in &manifest.dependencies {
        rows.push([
            spec.name.clone(),
            spec.version.clone(),
            spec.latest_version.clone(),
            spec.effective_type().to_string(),
            spec.mask.clone(),
            spec.notes.clone(),
        ]);
    }

    let mut widths = [0usize; 6];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for row in &rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(cell);
            if i + 1 < row.len() {
                let pad = widths[i] + PADDING - cell.chars().count();
                line.push_str(&" ".repeat(pad));
            }
        }
        writeln!(out, "{}", line.trim_end())?;
    }

    Ok(())
}
