// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Incremental decoding of the model's event stream.
//!
//! The byte source delivers newline-delimited frames (optionally `data: `-prefixed, as in
//! server-sent events). [`StreamDecoder`] reassembles frames across chunk boundaries and turns
//! the diagram tool calls it recognizes into [`StreamEvent`]s. [`EventStream`] drives a decoder
//! from a `tokio` reader, yielding one event per `next_event().await`.

mod decoder;
mod frame;
mod reader;

pub use decoder::{decode_bytes, DecoderState, StreamDecoder};
pub use reader::EventStream;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::EditOp;

/// Fallback text for error records that carry no message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// One decoded event, in stream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Full replacement diagram, already reference-repaired.
    Diagram { xml: String },
    /// Edit batch seen while no base document was supplied; nothing was applied.
    Edit { operations: Vec<EditOp> },
    /// Edit batch applied to the supplied base document, then repaired.
    DiagramFromEdit { xml: String, operations: Vec<EditOp> },
    /// Upstream-reported or transport failure.
    Error { message: String },
}

impl StreamEvent {
    /// The diagram markup this event carries, if any.
    pub fn xml(&self) -> Option<&str> {
        match self {
            Self::Diagram { xml } | Self::DiagramFromEdit { xml, .. } => Some(xml),
            Self::Edit { .. } | Self::Error { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Frame framing knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderOptions {
    /// Prefix stripped from a frame before decoding, when present.
    pub data_prefix: String,
    /// Payload that marks the end of the upstream stream.
    pub done_sentinel: String,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self { data_prefix: "data: ".to_owned(), done_sentinel: "[DONE]".to_owned() }
    }
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream transport failed: {0}")]
    Transport(#[from] std::io::Error),
}
