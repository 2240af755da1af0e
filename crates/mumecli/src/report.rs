//! Human-readable table summaries and JSON snapshots.

use anyhow::{Context, Result};
use mume::{CorpusModel, TableKind};
use owo_colors::OwoColorize;
use std::fmt::Write as _;
use std::path::Path;

/// Per-table totals and the `top` most frequent patterns of each.
///
/// `styled` bolds the table headings.
pub fn summary(model: &CorpusModel, top: usize, styled: bool) -> String {
    let stats = &model.stats;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} works, {} parts analyzed, {} parts skipped, {} harmonic moments",
        stats.works, stats.parts_analyzed, stats.parts_skipped, stats.harmony_moments
    );

    for kind in TableKind::ALL {
        let table = model.database.table(kind);
        let heading = if styled {
            kind.bold().to_string()
        } else {
            kind.to_string()
        };
        let _ = writeln!(
            out,
            "\n{}  total {}  distinct {}",
            heading,
            table.total(),
            table.len()
        );
        for entry in table.ranked().into_iter().take(top) {
            let share = 100.0 * entry.count as f64 / table.total() as f64;
            let _ = writeln!(out, "  {:<10} {:>8} {:>6.1}%", entry.key, entry.count, share);
        }
    }

    out
}

/// Write the model's tables and run statistics as pretty JSON.
pub fn write_snapshot(path: &Path, model: &CorpusModel) -> Result<()> {
    let json = serde_json::to_string_pretty(model).context("Failed to serialize database")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    Ok(())
}
