// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::format::extract_cells;
use crate::model::{collect_ids, join_cells, Cell, IdSet};

const ENDPOINT_ATTRS: [&str; 2] = ["source", "target"];

/// Strips edge endpoints that point outside `valid_ids`.
///
/// The edge itself is kept, just without the dangling `source`/`target`. Non-edge cells pass
/// through untouched. Running it twice changes nothing the second time.
pub fn repair(cells: Vec<Cell>, valid_ids: &IdSet) -> Vec<Cell> {
    cells.into_iter().map(|cell| repair_cell(cell, valid_ids)).collect()
}

pub fn repair_cell(mut cell: Cell, valid_ids: &IdSet) -> Cell {
    if !cell.is_edge() {
        return cell;
    }
    for endpoint in ENDPOINT_ATTRS {
        while cell.attr(endpoint).is_some_and(|id| !valid_ids.contains(id)) {
            let Some(stripped) = cell.without_attr(endpoint) else {
                break;
            };
            log::debug!(
                cell_id = cell.id().unwrap_or_default(),
                endpoint;
                "removing dangling edge reference"
            );
            cell = stripped;
        }
    }
    cell
}

/// Repairs free-form markup against the ids it declares itself.
///
/// Text without any cells is returned unchanged; otherwise the result is the repaired cells,
/// newline-joined.
pub fn validate_and_fix(text: &str) -> String {
    let cells = extract_cells(text);
    if cells.is_empty() {
        return text.to_owned();
    }
    let valid_ids = collect_ids(&cells);
    join_cells(&repair(cells, &valid_ids))
}
