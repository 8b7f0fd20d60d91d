use super::description::{DatasetDescription, SetBlock};
use super::diagnostics::{Diagnostic, Diagnostics};
use super::mask::MAX_SETS;
use super::model::Set;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Set registry
// ---------------------------------------------------------------------------

/// Turn the binary indicator columns declared in `description` into sets.
///
/// Identifiers are assigned 1, 2, 4, … in column order across all blocks.
/// Every block reads the same `rows`, so all membership vectors have
/// `rows.len()` entries. Unsupported or empty blocks are skipped with a
/// diagnostic; unparseable cells become non-members with a diagnostic.
pub fn build_sets(
    header: &[String],
    rows: &[Vec<String>],
    description: &DatasetDescription,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Set>, LoadError> {
    let mut blocks: Vec<&SetBlock> = Vec::with_capacity(description.sets.len());
    for block in &description.sets {
        if !block.is_binary() {
            diagnostics.push(Diagnostic::unsupported_format(block.start, &block.format));
        } else if block.width() == 0 {
            diagnostics.push(Diagnostic::invalid_range(block.start, block.end));
        } else {
            blocks.push(block);
        }
    }

    let set_count: usize = blocks.iter().map(|b| b.width()).sum();
    if set_count > MAX_SETS {
        return Err(LoadError::TooManySets {
            count: set_count,
            max: MAX_SETS,
        });
    }

    let mut sets = Vec::with_capacity(set_count);
    for block in blocks {
        for column in block.start..=block.end {
            let membership = read_indicator_column(rows, column, diagnostics);
            let name = header
                .get(column)
                .cloned()
                .unwrap_or_else(|| format!("Column {column}"));
            let position = sets.len();
            // set_count <= MAX_SETS, so every position has a bit.
            let set = Set::new(position, set_count, name, membership).ok_or(LoadError::TooManySets {
                count: set_count,
                max: MAX_SETS,
            })?;
            sets.push(set);
        }
    }

    log::debug!("Registered {} sets over {} rows", sets.len(), rows.len());
    Ok(sets)
}

fn read_indicator_column(rows: &[Vec<String>], column: usize, diagnostics: &mut Diagnostics) -> Vec<i64> {
    rows.iter()
        .enumerate()
        .map(|(row, cells)| {
            let raw = cells.get(column).map(String::as_str).unwrap_or("");
            parse_indicator(raw).unwrap_or_else(|| {
                diagnostics.push(Diagnostic::malformed(row, column, raw));
                0
            })
        })
        .collect()
}

/// Integer text, or decimal text with an integral value (`1.0`, `1e0`).
fn parse_indicator(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64)
            .map(|v| v as i64)
    })
}
