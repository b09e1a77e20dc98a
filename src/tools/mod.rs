// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The two diagram tools the model can call.

mod types;

pub use types::{DisplayDiagramInput, EditDiagramInput, ToolDefinition};

pub const DISPLAY_DIAGRAM: &str = "display_diagram";
pub const EDIT_DIAGRAM: &str = "edit_diagram";

const DISPLAY_DIAGRAM_DESCRIPTION: &str = "Replace the whole diagram. Pass every mxCell element \
of the new diagram; edges may only reference cells that exist.";
const EDIT_DIAGRAM_DESCRIPTION: &str = "Change the current diagram with add/update/delete \
operations. Updates and deletes target cells by id; new_xml must be a complete mxCell element.";

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: DISPLAY_DIAGRAM.to_owned(),
            description: DISPLAY_DIAGRAM_DESCRIPTION.to_owned(),
            input_schema: schemars::schema_for!(DisplayDiagramInput).to_value(),
        },
        ToolDefinition {
            name: EDIT_DIAGRAM.to_owned(),
            description: EDIT_DIAGRAM_DESCRIPTION.to_owned(),
            input_schema: schemars::schema_for!(EditDiagramInput).to_value(),
        },
    ]
}
