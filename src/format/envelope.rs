// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conversion between bare cell fragments and the full `<mxfile>` document the editor loads.

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::scan::extract_cells;
use crate::model::{join_cells, Cell, LAYER_CELL_ID, ROOT_CELL_ID};

pub const ENVELOPE_MARKER: &str = "<mxfile";

const ROOT_OPEN: &str = "<root>";
const ROOT_CLOSE: &str = "</root>";

/// Fixed page/grid settings written into a generated envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvelopeOptions {
    pub page_name: String,
    pub dx: i64,
    pub dy: i64,
    pub grid: bool,
    pub grid_size: u32,
    pub page_scale: u32,
    pub page_width: u32,
    pub page_height: u32,
}

impl Default for EnvelopeOptions {
    fn default() -> Self {
        Self {
            page_name: "Page-1".to_owned(),
            dx: 0,
            dy: 0,
            grid: true,
            grid_size: 10,
            page_scale: 1,
            page_width: 850,
            page_height: 1100,
        }
    }
}

pub fn is_enveloped(text: &str) -> bool {
    text.trim_start().starts_with(ENVELOPE_MARKER)
}

/// Wraps bare fragments in a default envelope. Already-wrapped input comes back unchanged.
pub fn wrap(fragments: &str) -> String {
    wrap_with(fragments, &EnvelopeOptions::default())
}

pub fn wrap_with(fragments: &str, options: &EnvelopeOptions) -> String {
    if is_enveloped(fragments) {
        return fragments.to_owned();
    }
    render_envelope(fragments, options, &new_diagram_id())
}

/// `diagram-<unix millis>`.
pub fn new_diagram_id() -> String {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
    format!("diagram-{millis}")
}

/// Renders the envelope skeleton around `fragments` using a caller-chosen diagram id.
pub fn render_envelope(fragments: &str, options: &EnvelopeOptions, diagram_id: &str) -> String {
    let flag = |on: bool| if on { '1' } else { '0' };
    let mut out = String::with_capacity(fragments.len() + 512);
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "<mxfile>\n  <diagram id=\"{id}\" name=\"{name}\">\n    <mxGraphModel dx=\"{dx}\" dy=\"{dy}\" grid=\"{grid}\" gridSize=\"{grid_size}\" guides=\"1\" tooltips=\"1\" connect=\"1\" arrows=\"1\" fold=\"1\" page=\"1\" pageScale=\"{scale}\" pageWidth=\"{width}\" pageHeight=\"{height}\">\n      <root>\n        <mxCell id=\"{ROOT_CELL_ID}\" />\n        <mxCell id=\"{LAYER_CELL_ID}\" parent=\"{ROOT_CELL_ID}\" />\n        {fragments}\n      </root>\n    </mxGraphModel>\n  </diagram>\n</mxfile>",
        id = escape_attr(diagram_id),
        name = escape_attr(&options.page_name),
        dx = options.dx,
        dy = options.dy,
        grid = flag(options.grid),
        grid_size = options.grid_size,
        scale = options.page_scale,
        width = options.page_width,
        height = options.page_height,
    );
    out
}

/// Pulls the content cells back out of an envelope, newline-joined.
///
/// Input without the envelope marker is returned as is. So is an envelope whose `<root>`
/// region is missing or holds no content cells.
pub fn unwrap(document: &str) -> String {
    if !is_enveloped(document) {
        return document.to_owned();
    }
    let Some(region) = root_region(document) else {
        log::debug!("envelope has no <root> region, returning document unchanged");
        return document.to_owned();
    };

    let cells =
        extract_cells(region).into_iter().filter(|cell| !is_structural_cell(cell)).collect::<Vec<_>>();
    if cells.is_empty() {
        return document.to_owned();
    }
    join_cells(&cells)
}

/// True for the envelope's own root (`id="0"`) and default layer (`id="1"` with no `value`).
///
/// A cell with `id="1"` that carries a `value` is treated as real content.
pub fn is_structural_cell(cell: &Cell) -> bool {
    match cell.id() {
        Some(ROOT_CELL_ID) => true,
        Some(LAYER_CELL_ID) => !cell.has_attr("value"),
        _ => false,
    }
}

fn root_region(document: &str) -> Option<&str> {
    let start = document.find(ROOT_OPEN)? + ROOT_OPEN.len();
    let end = document.rfind(ROOT_CLOSE)?;
    document.get(start..end)
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        is_enveloped, is_structural_cell, render_envelope, unwrap, wrap, wrap_with,
        EnvelopeOptions,
    };
    use crate::model::Cell;

    const EXPECTED_SKELETON: &str = r#"<mxfile>
  <diagram id="diagram-42" name="Page-1">
    <mxGraphModel dx="0" dy="0" grid="1" gridSize="10" guides="1" tooltips="1" connect="1" arrows="1" fold="1" page="1" pageScale="1" pageWidth="850" pageHeight="1100">
      <root>
        <mxCell id="0" />
        <mxCell id="1" parent="0" />
        <mxCell id="2" value="a" vertex="1" parent="1"/>
      </root>
    </mxGraphModel>
  </diagram>
</mxfile>"#;

    #[test]
    fn renders_the_default_skeleton() {
        let doc = render_envelope(
            r#"<mxCell id="2" value="a" vertex="1" parent="1"/>"#,
            &EnvelopeOptions::default(),
            "diagram-42",
        );
        assert_eq!(doc, EXPECTED_SKELETON);
    }

    #[test]
    fn wrap_generates_a_timestamped_diagram_id() {
        let doc = wrap(r#"<mxCell id="2"/>"#);
        assert!(is_enveloped(&doc));
        assert!(doc.contains(r#"<diagram id="diagram-"#));
    }

    #[test]
    fn wrap_leaves_enveloped_input_alone() {
        let doc = format!("  \n{EXPECTED_SKELETON}");
        assert_eq!(wrap(&doc), doc);
    }

    #[test]
    fn wrap_with_applies_options_and_escapes_page_name() {
        let options = EnvelopeOptions {
            page_name: "A & \"B\"".to_owned(),
            grid: false,
            page_width: 1200,
            ..EnvelopeOptions::default()
        };
        let doc = wrap_with("", &options);
        assert!(doc.contains(r#"name="A &amp; &quot;B&quot;""#));
        assert!(doc.contains(r#"grid="0""#));
        assert!(doc.contains(r#"pageWidth="1200""#));
    }

    #[test]
    fn unwrap_drops_structural_cells_only() {
        assert_eq!(unwrap(EXPECTED_SKELETON), r#"<mxCell id="2" value="a" vertex="1" parent="1"/>"#);
    }

    #[test]
    fn unwrap_keeps_a_layer_id_cell_that_has_a_value() {
        let doc = render_envelope(r#"<mxCell id="1" value="ok"/>"#, &EnvelopeOptions::default(), "d");
        assert_eq!(unwrap(&doc), r#"<mxCell id="1" value="ok"/>"#);
    }

    #[test]
    fn unwrap_passes_bare_fragments_through() {
        let text = r#"<mxCell id="0"/><mxCell id="9"/>"#;
        assert_eq!(unwrap(text), text);
        assert_eq!(unwrap(""), "");
    }

    #[test]
    fn unwrap_falls_back_to_input_without_root_or_content() {
        let no_root = "<mxfile><diagram/></mxfile>";
        assert_eq!(unwrap(no_root), no_root);

        let only_structure = render_envelope("", &EnvelopeOptions::default(), "d");
        assert_eq!(unwrap(&only_structure), only_structure);
    }

    #[test]
    fn structural_cell_detection() {
        assert!(is_structural_cell(&Cell::new(r#"<mxCell id="0"/>"#)));
        assert!(is_structural_cell(&Cell::new(r#"<mxCell id='1' parent="0"/>"#)));
        assert!(!is_structural_cell(&Cell::new(r#"<mxCell id="1" value=""/>"#)));
        assert!(!is_structural_cell(&Cell::new(r#"<mxCell id="10"/>"#)));
    }

    fn content_cell() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9]{0,6}", "[A-Za-z ]{0,8}", any::<bool>()).prop_map(|(id, value, block)| {
            if block {
                format!(
                    "<mxCell id=\"c{id}\" value=\"{value}\" vertex=\"1\" parent=\"1\">\n  <mxGeometry as=\"geometry\"/>\n</mxCell>"
                )
            } else {
                format!("<mxCell id=\"c{id}\" value=\"{value}\" vertex=\"1\" parent=\"1\"/>")
            }
        })
    }

    proptest! {
        #[test]
        fn unwrap_inverts_wrap(cells in prop::collection::vec(content_cell(), 1..8)) {
            let fragments = cells.join("\n");
            prop_assert_eq!(unwrap(&wrap(&fragments)), fragments);
        }

        #[test]
        fn wrap_is_idempotent_on_documents(cells in prop::collection::vec(content_cell(), 0..4)) {
            let doc = wrap(&cells.join("\n"));
            prop_assert_eq!(wrap(&doc), doc.clone());
        }
    }
}
