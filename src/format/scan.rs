// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tag-boundary scanner for `<mxCell>` fragments.
//!
//! The graph markup is flat: cells never nest inside other cells, so a fragment is just an
//! opening tag followed either by `/>` or by the first `</mxCell>`. Anything that does not fit
//! that shape is skipped.

use memchr::memmem;

use crate::model::Cell;

pub const CELL_TAG: &str = "mxCell";

const CELL_OPEN: &str = "<mxCell";
const CELL_CLOSE: &str = "</mxCell>";

/// Returns every well-formed cell fragment in `text`, in document order.
///
/// Never fails: malformed or unterminated openings are dropped and scanning resumes after
/// them. Fragment bytes are copied verbatim.
pub fn extract_cells(text: &str) -> Vec<Cell> {
    let bytes = text.as_bytes();
    let open = memmem::Finder::new(CELL_OPEN);
    let close = memmem::Finder::new(CELL_CLOSE);

    let mut cells = Vec::new();
    let mut pos = 0;

    while let Some(found) = open.find(&bytes[pos..]) {
        let start = pos + found;
        let after_name = start + CELL_OPEN.len();

        // `<mxCellFoo` is a different element.
        if !bytes.get(after_name).is_some_and(|&b| is_name_end(b)) {
            pos = after_name;
            continue;
        }

        // Cells never contain another opening, so every search for this one stops there.
        let limit = open.find(&bytes[after_name..]).map_or(bytes.len(), |offset| after_name + offset);
        let region = &bytes[..limit];

        let Some(tag_end) = find_tag_end(region, after_name) else {
            log::trace!(offset = start; "skipping unterminated cell tag");
            pos = after_name;
            continue;
        };

        if bytes[tag_end - 1] == b'/' {
            cells.push(Cell::new(&text[start..=tag_end]));
            pos = tag_end + 1;
            continue;
        }

        let body = tag_end + 1;
        match close.find(&region[body..]) {
            Some(offset) => {
                let end = body + offset + CELL_CLOSE.len();
                cells.push(Cell::new(&text[start..end]));
                pos = end;
            }
            None => {
                log::trace!(offset = start; "skipping cell without a matching close tag");
                pos = body;
            }
        }
    }

    cells
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

/// Index of the `>` closing the tag that starts before `from`, skipping quoted values.
/// A bare `<` means the tag was cut off.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (offset, &b) in bytes.get(from..)?.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(from + offset),
            None if b == b'<' => return None,
            None => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::extract_cells;

    fn raw(text: &str) -> Vec<String> {
        extract_cells(text).into_iter().map(|c| c.into_string()).collect()
    }

    #[test]
    fn extracts_self_closing_and_block_cells_in_order() {
        let text = concat!(
            "<mxCell id=\"a\" vertex=\"1\"/>\n",
            "  <mxCell id=\"b\" vertex=\"1\">\n",
            "    <mxGeometry x=\"10\" y=\"20\" as=\"geometry\"/>\n",
            "  </mxCell>\n",
            "<mxCell id=\"c\" edge=\"1\" source=\"a\" target=\"b\" />",
        );
        assert_eq!(
            raw(text),
            vec![
                "<mxCell id=\"a\" vertex=\"1\"/>".to_owned(),
                "<mxCell id=\"b\" vertex=\"1\">\n    <mxGeometry x=\"10\" y=\"20\" as=\"geometry\"/>\n  </mxCell>"
                    .to_owned(),
                "<mxCell id=\"c\" edge=\"1\" source=\"a\" target=\"b\" />".to_owned(),
            ]
        );
    }

    #[test]
    fn empty_and_unrelated_text_yield_nothing() {
        assert!(extract_cells("").is_empty());
        assert!(extract_cells("no markup here").is_empty());
        assert!(extract_cells("<mxGraphModel><root></root></mxGraphModel>").is_empty());
    }

    #[test]
    fn ignores_elements_that_only_share_a_prefix() {
        assert_eq!(raw("<mxCellular id=\"x\"/><mxCell id=\"y\"/>"), vec!["<mxCell id=\"y\"/>"]);
    }

    #[test]
    fn skips_truncated_opening_tag() {
        assert_eq!(raw("<mxCell id=\"a\" <mxCell id=\"b\"/>"), vec!["<mxCell id=\"b\"/>"]);
        assert!(extract_cells("<mxCell id=\"a\"").is_empty());
        assert!(extract_cells("<mxCell").is_empty());
    }

    #[test]
    fn skips_block_cell_whose_close_tag_is_missing() {
        let text = "<mxCell id=\"a\"><mxGeometry as=\"geometry\"/>\n<mxCell id=\"b\"/>";
        assert_eq!(raw(text), vec!["<mxCell id=\"b\"/>"]);
        assert!(extract_cells("<mxCell id=\"a\">dangling").is_empty());
    }

    #[test]
    fn quoted_angle_brackets_do_not_end_the_tag() {
        let text = "<mxCell id=\"a\" value=\"x &gt; y\" style=\"a>b\"/>";
        assert_eq!(raw(text), vec![text]);
    }

    #[test]
    fn unclosed_openings_scan_in_linear_time() {
        use std::time::{Duration, Instant};

        let text = "<mxCell id=\"x\">".repeat(100_000);
        let started = Instant::now();
        assert!(extract_cells(&text).is_empty());
        assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());

        let text = "<mxCell id=\"x".repeat(100_000);
        let started = Instant::now();
        assert!(extract_cells(&text).is_empty());
        assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    }

    #[test]
    fn preserves_non_ascii_content() {
        let text = "<mxCell id=\"n\" value=\"図形 ✓\"/>";
        assert_eq!(raw(text), vec![text]);
    }

    #[test]
    fn scans_cells_inside_a_full_document() {
        let text = "<mxfile><diagram><mxGraphModel><root><mxCell id=\"0\" /><mxCell id=\"1\" parent=\"0\" /><mxCell id=\"2\" value=\"x\"/></root></mxGraphModel></diagram></mxfile>";
        let ids = extract_cells(text)
            .iter()
            .map(|c| c.id().unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }
}
