// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mxstream: streaming tool-call decoding and cell mutation for draw.io diagrams.
//!
//! A language model edits a diagram by streaming tool calls: `display_diagram` replaces the
//! whole diagram, `edit_diagram` sends add/update/delete operations. This crate decodes that
//! stream ([`stream`]), applies the operations to a cell list ([`ops`]) and keeps edges from
//! pointing at cells that do not exist. All transforms are pure functions over text; no
//! document state is kept between calls.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod ops;
pub mod session;
pub mod stream;
pub mod tools;

pub use error::{Error, Result};
pub use format::{extract_cells, unwrap, wrap};
pub use model::{collect_ids, Cell, EditOp, IdSet};
pub use ops::{apply_edits, repair, validate_and_fix};
pub use stream::{EventStream, StreamDecoder, StreamEvent};
