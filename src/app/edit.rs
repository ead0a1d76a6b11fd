// DataLoader - app/edit.rs
//
// Row-level edits on a loaded table. Each edit reports its outcome on both
// pipeline channels. Row numbers are 1-based, as displayed.

use crate::core::model::Table;
use crate::core::report::Reporter;
use crate::core::severity::Severity;
use crate::util::error::EditError;

/// What an accepted edit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Every supplied value was empty; nothing changed.
    Ignored,

    /// The table was changed.
    Applied,

    /// The edit was kept but left duplicate rows behind.
    AppliedWithDuplicates,
}

fn all_empty(values: &[String]) -> bool {
    values.iter().all(|v| v.is_empty())
}

fn check_width(table: &Table, values: &[String]) -> Result<(), EditError> {
    if values.len() != table.columns.len() {
        return Err(EditError::WidthMismatch {
            expected: table.columns.len(),
            actual: values.len(),
        });
    }
    Ok(())
}

fn row_index(table: &Table, row: usize) -> Result<usize, EditError> {
    if row == 0 || row > table.rows.len() {
        return Err(EditError::RowOutOfRange {
            row,
            rows: table.rows.len(),
        });
    }
    Ok(row - 1)
}

/// Append a row unless it would leave the table with duplicates.
pub fn add_row(
    table: &mut Table,
    values: Vec<String>,
    reporter: &Reporter,
) -> Result<EditOutcome, EditError> {
    if all_empty(&values) {
        return Ok(EditOutcome::Ignored);
    }
    check_width(table, &values)?;

    let mut candidate = table.clone();
    candidate.rows.push(values);
    if candidate.has_duplicates() {
        reporter.warning("Attempt to add duplicate data");
        reporter.log(Severity::Error, "Cannot add duplicates in singleton");
        return Err(EditError::Duplicate);
    }

    *table = candidate;
    reporter.update("New data added");
    Ok(EditOutcome::Applied)
}

/// Overwrite row `row` (1-based).
///
/// The edit is kept even when it creates a duplicate; that case is
/// reported as a warning.
pub fn edit_row(
    table: &mut Table,
    row: usize,
    values: Vec<String>,
    reporter: &Reporter,
) -> Result<EditOutcome, EditError> {
    if all_empty(&values) {
        return Ok(EditOutcome::Ignored);
    }
    check_width(table, &values)?;
    let idx = row_index(table, row)?;

    table.rows[idx] = values;
    if table.has_duplicates() {
        reporter.warning(&format!("Attempt to edit row {row} to duplicate data"));
        Ok(EditOutcome::AppliedWithDuplicates)
    } else {
        reporter.update(&format!("Row {row} edited"));
        Ok(EditOutcome::Applied)
    }
}

/// Remove row `row` (1-based).
pub fn delete_row(table: &mut Table, row: usize, reporter: &Reporter) -> Result<EditOutcome, EditError> {
    let idx = row_index(table, row)?;
    table.rows.remove(idx);
    reporter.warning(&format!("Row {row} deleted"));
    Ok(EditOutcome::Applied)
}
