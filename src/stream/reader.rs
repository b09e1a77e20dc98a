// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::{StreamDecoder, StreamError, StreamEvent};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Pull-based event sequence over an async byte source.
///
/// Each `next_event().await` either returns a buffered event or suspends on the next read;
/// it never suspends in the middle of a frame. Dropping the stream early is always fine.
/// A failed read is reported once as a terminal [`StreamEvent::Error`].
#[derive(Debug)]
pub struct EventStream<R> {
    reader: R,
    decoder: StreamDecoder,
    pending: VecDeque<StreamEvent>,
    buf: Box<[u8]>,
}

impl<R: AsyncRead + Unpin> EventStream<R> {
    pub fn new(reader: R, decoder: StreamDecoder) -> Self {
        Self {
            reader,
            decoder,
            pending: VecDeque::new(),
            buf: vec![0; READ_CHUNK_SIZE].into_boxed_slice(),
        }
    }

    pub fn decoder(&self) -> &StreamDecoder {
        &self.decoder
    }

    /// Next event, or `None` once the source is exhausted and every event was handed out.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.decoder.is_done() {
                return None;
            }

            match self.reader.read(&mut self.buf).await {
                Ok(0) => self.pending.extend(self.decoder.finish()),
                Ok(read) => self.pending.extend(self.decoder.push(&self.buf[..read])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.decoder.abort();
                    let err = StreamError::from(err);
                    log::debug!("event stream aborted: {err}");
                    return Some(StreamEvent::Error { message: err.to_string() });
                }
            }
        }
    }

    /// Drains the stream into a vector.
    pub async fn collect_events(mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }
}
