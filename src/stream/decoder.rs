// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::frame::{parse_command, split_frame, Command, Frame};
use super::{DecoderOptions, StreamEvent};
use crate::ops::{apply_edits, validate_and_fix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Accepting chunks.
    Reading,
    /// Terminal. [`StreamDecoder::finish`] drains the trailing partial frame on the way here.
    Done,
}

/// Push-based frame decoder.
///
/// The only state carried between chunks is the tail after the last newline. Lines are split on
/// raw `\n` bytes before UTF-8 decoding, so a multi-byte character split across two chunks
/// decodes the same as if it had arrived whole.
#[derive(Debug, Clone)]
pub struct StreamDecoder {
    options: DecoderOptions,
    base: Option<String>,
    carry: Vec<u8>,
    state: DecoderState,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            options: DecoderOptions::default(),
            base: None,
            carry: Vec::new(),
            state: DecoderState::Reading,
        }
    }

    /// Edit batches will be applied to `base`. An empty base counts as no base.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.base = (!base.is_empty()).then_some(base);
        self
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == DecoderState::Done
    }

    /// Feeds one chunk; returns the events of every frame the chunk completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        if self.state != DecoderState::Reading {
            log::trace!(len = chunk.len(); "ignoring chunk after end of stream");
            return Vec::new();
        }

        self.carry.extend_from_slice(chunk);
        let Some(last_newline) = memchr::memrchr(b'\n', &self.carry) else {
            return Vec::new();
        };
        let tail = self.carry.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.carry, tail);

        let mut events = Vec::new();
        let mut start = 0;
        for end in memchr::memchr_iter(b'\n', &complete) {
            events.extend(self.decode_line(&complete[start..end]));
            start = end + 1;
        }
        events
    }

    /// Signals end of input: decodes whatever is left in the carry buffer as a final frame.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.state != DecoderState::Reading {
            return Vec::new();
        }
        self.state = DecoderState::Done;
        let tail = std::mem::take(&mut self.carry);
        self.decode_line(&tail).into_iter().collect()
    }

    /// Drops buffered input and moves straight to `Done`.
    pub fn abort(&mut self) {
        self.carry.clear();
        self.state = DecoderState::Done;
    }

    fn decode_line(&self, line: &[u8]) -> Option<StreamEvent> {
        let line = String::from_utf8_lossy(line);
        let payload = match split_frame(&line, &self.options) {
            Frame::Blank => return None,
            Frame::Done => {
                log::trace!("end-of-stream sentinel");
                return None;
            }
            Frame::Payload(payload) => payload,
        };

        let command = match parse_command(payload) {
            Ok(command) => command,
            Err(err) => {
                log::debug!(len = payload.len(); "skipping undecodable frame: {err}");
                return None;
            }
        };

        self.event_for(command)
    }

    fn event_for(&self, command: Command) -> Option<StreamEvent> {
        match command {
            Command::DisplayDiagram { xml } => {
                Some(StreamEvent::Diagram { xml: validate_and_fix(&xml) })
            }
            Command::EditDiagram { operations } => match self.base.as_deref() {
                Some(base) => {
                    let xml = apply_edits(base, &operations);
                    Some(StreamEvent::DiagramFromEdit { xml, operations })
                }
                None => Some(StreamEvent::Edit { operations }),
            },
            Command::Error { message } => Some(StreamEvent::Error { message }),
            Command::Ignored => None,
        }
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a complete in-memory stream.
pub fn decode_bytes(bytes: &[u8], base: Option<&str>) -> Vec<StreamEvent> {
    let mut decoder = StreamDecoder::new();
    if let Some(base) = base {
        decoder = decoder.with_base(base);
    }
    let mut events = decoder.push(bytes);
    events.extend(decoder.finish());
    events
}
