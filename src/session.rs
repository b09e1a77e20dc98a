// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Caller-side glue: one editing session folding stream events into its current document.
//!
//! The engine itself keeps no document; this is the state a front end owns. Each request
//! snapshots the current fragments, and the decoder for the response applies edits against
//! that snapshot.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use crate::config::Config;
use crate::format::{unwrap, wrap_with, EnvelopeOptions};
use crate::stream::{DecoderOptions, EventStream, StreamDecoder, StreamEvent};

const SESSION_SUFFIX_LEN: usize = 7;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `session-<unix millis>-<7 random chars from [0-9a-z]>`.
pub fn new_session_id() -> String {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
    let mut random = uuid::Uuid::new_v4().as_u128();
    let suffix = (0..SESSION_SUFFIX_LEN)
        .map(|_| {
            let digit = BASE36_DIGITS[(random % 36) as usize];
            random /= 36;
            char::from(digit)
        })
        .collect::<String>();
    format!("session-{millis}-{suffix}")
}

/// Request body for the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// Current diagram as bare cell fragments.
    pub xml: String,
    pub previous_xml: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessagePart {
    Text { text: String },
}

impl ChatRequest {
    /// Builds a single-turn user request. `current_document` may be enveloped or bare.
    pub fn new(prompt: impl Into<String>, current_document: &str, session_id: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user".to_owned(),
                parts: vec![MessagePart::Text { text: prompt.into() }],
            }],
            xml: unwrap(current_document),
            previous_xml: String::new(),
            session_id: session_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    session_id: String,
    current: String,
    last_error: Option<String>,
    envelope: EnvelopeOptions,
    decoder_options: DecoderOptions,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::with_session_id(new_session_id())
    }

    pub fn with_session_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            current: String::new(),
            last_error: None,
            envelope: EnvelopeOptions::default(),
            decoder_options: DecoderOptions::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new();
        session.envelope = config.envelope.clone();
        session.decoder_options = config.decoder.clone();
        session
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current diagram as bare fragments; empty before the first diagram arrives.
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replaces the current diagram with a stored document (enveloped or bare).
    pub fn load_document(&mut self, document: &str) {
        self.current = unwrap(document);
        self.last_error = None;
    }

    /// The current diagram wrapped for the editor.
    pub fn editor_document(&self) -> String {
        wrap_with(&self.current, &self.envelope)
    }

    pub fn request(&mut self, prompt: impl Into<String>) -> ChatRequest {
        self.last_error = None;
        ChatRequest::new(prompt, &self.current, self.session_id.clone())
    }

    /// Decodes a response stream, applying edits against the current diagram.
    pub fn decode<R: AsyncRead + Unpin>(&self, reader: R) -> EventStream<R> {
        let decoder = StreamDecoder::new()
            .with_options(self.decoder_options.clone())
            .with_base(self.current.clone());
        EventStream::new(reader, decoder)
    }

    /// Folds one event into the session.
    ///
    /// Returns the new editor document when the event replaced the diagram.
    pub fn absorb(&mut self, event: &StreamEvent) -> Option<String> {
        match event {
            StreamEvent::Diagram { xml } | StreamEvent::DiagramFromEdit { xml, .. } => {
                self.current = xml.clone();
                Some(self.editor_document())
            }
            StreamEvent::Error { message } => {
                log::debug!(session_id = self.session_id.as_str(); "stream reported error: {message}");
                self.last_error = Some(message.clone());
                None
            }
            StreamEvent::Edit { .. } => None,
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
