// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// One diagram element fragment: a self-closing `<mxCell .../>` or a `<mxCell ...>...</mxCell>`
/// block.
///
/// The fragment text is kept byte-for-byte. Attributes are read from the opening tag on
/// demand, so an untouched cell always serializes back to exactly what was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    raw: String,
}

impl Cell {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }

    /// Value of the first opening-tag attribute called `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.find_attr(name).map(|attr| attr.value)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.find_attr(name).is_some()
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn is_edge(&self) -> bool {
        self.attr("edge") == Some("1")
    }

    pub fn source_ref(&self) -> Option<&str> {
        self.attr("source")
    }

    pub fn target_ref(&self) -> Option<&str> {
        self.attr("target")
    }

    /// Returns a copy of this cell with the first `name` attribute (and the whitespace in
    /// front of it) cut out, or `None` when the attribute is absent.
    pub fn without_attr(&self, name: &str) -> Option<Cell> {
        let attr = self.find_attr(name)?;
        let (start, end) = attr.span;
        let mut raw = String::with_capacity(self.raw.len() - (end - start));
        raw.push_str(&self.raw[..start]);
        raw.push_str(&self.raw[end..]);
        Some(Cell { raw })
    }

    fn find_attr(&self, name: &str) -> Option<Attr<'_>> {
        Attrs::new(&self.raw).find(|attr| attr.name == name)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for Cell {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for Cell {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Newline-joins cells in list order.
pub fn join_cells(cells: &[Cell]) -> String {
    let mut out = String::with_capacity(cells.iter().map(|c| c.raw.len() + 1).sum());
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&cell.raw);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attr<'a> {
    name: &'a str,
    value: &'a str,
    // Byte range of the attribute including its leading whitespace.
    span: (usize, usize),
}

/// Walks the attributes of the opening tag at the start of a fragment.
///
/// Stops at the first `>` or `/` in attribute-name position, or at anything it cannot read
/// (an unterminated quote, a stray `=`). Every delimiter is ASCII, so all spans fall on
/// char boundaries.
struct Attrs<'a> {
    raw: &'a str,
    pos: usize,
}

impl<'a> Attrs<'a> {
    fn new(raw: &'a str) -> Self {
        let bytes = raw.as_bytes();
        let mut pos = usize::from(bytes.first() == Some(&b'<'));
        while pos < bytes.len() && !is_tag_delim(bytes[pos]) {
            pos += 1;
        }
        Self { raw, pos }
    }

    fn stop(&mut self) -> Option<Attr<'a>> {
        self.pos = self.raw.len();
        None
    }
}

impl<'a> Iterator for Attrs<'a> {
    type Item = Attr<'a>;

    fn next(&mut self) -> Option<Attr<'a>> {
        let raw = self.raw;
        let bytes = raw.as_bytes();
        let start = self.pos;
        let mut pos = skip_ws(bytes, start);

        if pos >= bytes.len() || bytes[pos] == b'>' || bytes[pos] == b'/' {
            return self.stop();
        }

        let name_start = pos;
        while pos < bytes.len() && !is_tag_delim(bytes[pos]) && bytes[pos] != b'=' {
            pos += 1;
        }
        let name_end = pos;
        if name_start == name_end {
            return self.stop();
        }
        let name = &raw[name_start..name_end];

        pos = skip_ws(bytes, pos);
        if bytes.get(pos) != Some(&b'=') {
            // Valueless attribute.
            self.pos = name_end;
            return Some(Attr { name, value: "", span: (start, name_end) });
        }
        pos = skip_ws(bytes, pos + 1);

        let value = match bytes.get(pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                let value_start = pos + 1;
                let Some(len) = memchr::memchr(quote, &bytes[value_start..]) else {
                    return self.stop();
                };
                pos = value_start + len + 1;
                &raw[value_start..value_start + len]
            }
            _ => {
                let value_start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>'
                {
                    pos += 1;
                }
                if pos > value_start && bytes[pos - 1] == b'/' && bytes.get(pos) == Some(&b'>') {
                    pos -= 1;
                }
                &raw[value_start..pos]
            }
        };

        self.pos = pos;
        Some(Attr { name, value, span: (start, pos) })
    }
}

fn is_tag_delim(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

fn skip_ws(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}
