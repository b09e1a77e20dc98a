// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Deserialize;
use serde_json::Value;

use super::{DecoderOptions, UNKNOWN_ERROR_MESSAGE};
use crate::model::{parse_operations, EditOp};
use crate::tools::{DISPLAY_DIAGRAM, EDIT_DIAGRAM};

/// Record kinds that carry a tool invocation.
const TOOL_CALL_KINDS: [&str; 2] = ["tool-call", "tool-input-available"];
const ERROR_KIND: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Frame<'a> {
    Blank,
    Done,
    Payload(&'a str),
}

pub(super) fn split_frame<'a>(line: &'a str, options: &DecoderOptions) -> Frame<'a> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Frame::Blank;
    }
    let payload = line.strip_prefix(options.data_prefix.as_str()).unwrap_or(line);
    if payload == options.done_sentinel {
        return Frame::Done;
    }
    Frame::Payload(payload)
}

/// What a decoded record asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Command {
    DisplayDiagram { xml: String },
    EditDiagram { operations: Vec<EditOp> },
    Error { message: String },
    Ignored,
}

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    /// Older emitters tag records with `kind`; only consulted when `type` is absent.
    #[serde(rename = "kind", default)]
    alt_kind: Option<Value>,
    #[serde(rename = "toolName", default)]
    tool_name: Option<String>,
    #[serde(default)]
    input: Option<Value>,
    #[serde(rename = "errorText", default)]
    error_text: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

pub(super) fn parse_command(payload: &str) -> Result<Command, serde_json::Error> {
    let record: Record = serde_json::from_str(payload)?;
    let kind = record.kind.as_deref().or_else(|| record.alt_kind.as_ref().and_then(Value::as_str));
    let Some(kind) = kind else {
        return Ok(Command::Ignored);
    };

    if kind == ERROR_KIND {
        let message = non_empty_str(record.error_text.as_ref())
            .or_else(|| non_empty_str(record.message.as_ref()))
            .unwrap_or(UNKNOWN_ERROR_MESSAGE);
        return Ok(Command::Error { message: message.to_owned() });
    }

    if !TOOL_CALL_KINDS.contains(&kind) {
        return Ok(Command::Ignored);
    }

    let input = record.input.as_ref();
    let command = match record.tool_name.as_deref() {
        Some(DISPLAY_DIAGRAM) => {
            match non_empty_str(input.and_then(|input| input.get("xml"))) {
                Some(xml) => Command::DisplayDiagram { xml: xml.to_owned() },
                None => Command::Ignored,
            }
        }
        Some(EDIT_DIAGRAM) => {
            let operations = input
                .and_then(|input| input.get("operations"))
                .and_then(Value::as_array)
                .map(|values| parse_operations(values))
                .unwrap_or_default();
            if operations.is_empty() {
                Command::Ignored
            } else {
                Command::EditDiagram { operations }
            }
        }
        _ => Command::Ignored,
    };
    Ok(command)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
