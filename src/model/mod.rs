// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: cells, identifier sets and edit operations.
//!
//! Cells stay opaque markup; everything here reads them by light text inspection.

pub mod cell;
pub mod edit;
pub mod ids;

pub use cell::{join_cells, Cell};
pub use edit::{parse_operations, EditOp, EditOpError, EditOperation, OperationKind};
pub use ids::{collect_ids, IdSet, LAYER_CELL_ID, ROOT_CELL_ID};
