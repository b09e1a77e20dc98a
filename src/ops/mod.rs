// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cell list mutations.
//!
//! Edit batches come from model output, which is not guaranteed to be self-consistent, so
//! nothing here fails: operations on unknown ids are skipped and dangling edge endpoints are
//! repaired once the batch is done.

mod repair;

pub use repair::{repair, repair_cell, validate_and_fix};

use crate::format::extract_cells;
use crate::model::{collect_ids, join_cells, Cell, EditOp};

/// Result of applying an edit batch to a cell list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub cells: Vec<Cell>,
    pub applied: usize,
    /// Updates/deletes whose target id was not present at the time they ran.
    pub ignored: usize,
}

/// Applies `ops` to the cells found in `base` and returns the repaired, newline-joined result.
///
/// `base` may be bare fragments or a full document; every cell scanned from it takes part.
pub fn apply_edits(base: &str, ops: &[EditOp]) -> String {
    join_cells(&apply_edit_ops(extract_cells(base), ops).cells)
}

/// Applies `ops` left to right, each seeing the effect of the ones before it, then repairs
/// edge references against the resulting ids.
pub fn apply_edit_ops(mut cells: Vec<Cell>, ops: &[EditOp]) -> EditOutcome {
    let mut applied = 0;
    let mut ignored = 0;

    for op in ops {
        if apply_edit_op(&mut cells, op) {
            applied += 1;
        } else {
            ignored += 1;
            log::debug!(
                operation = op.kind().as_str(),
                cell_id = op.cell_id().unwrap_or_default();
                "edit target not found, skipping"
            );
        }
    }

    let valid_ids = collect_ids(&cells);
    let cells = repair(cells, &valid_ids);
    EditOutcome { cells, applied, ignored }
}

fn apply_edit_op(cells: &mut Vec<Cell>, op: &EditOp) -> bool {
    match op {
        // No duplicate-id check: the first cell with an id wins for later update/delete.
        EditOp::Add { new_xml } => {
            cells.push(Cell::new(new_xml.as_str()));
            true
        }
        EditOp::Update { cell_id, new_xml } => {
            let Some(index) = position_of(cells, cell_id) else {
                return false;
            };
            cells[index] = Cell::new(new_xml.as_str());
            true
        }
        EditOp::Delete { cell_id } => {
            let Some(index) = position_of(cells, cell_id) else {
                return false;
            };
            cells.remove(index);
            true
        }
    }
}

fn position_of(cells: &[Cell], cell_id: &str) -> Option<usize> {
    cells.iter().position(|cell| cell.id() == Some(cell_id))
}
