// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! draw.io markup handling: cell scanning and the document envelope.

pub mod envelope;
pub mod scan;

pub use envelope::{
    is_enveloped, is_structural_cell, new_diagram_id, render_envelope, unwrap, wrap, wrap_with,
    EnvelopeOptions, ENVELOPE_MARKER,
};
pub use scan::{extract_cells, CELL_TAG};
