//! LogBuffer: the append-only text accumulated by one stream session.
//!
//! Chunks arrive as raw bytes. Complete UTF-8 is appended to the text
//! immediately; an incomplete multi-byte sequence at the end of a chunk is
//! held back until the next chunk completes it, so splitting a character
//! across chunks is never observable. Invalid bytes decode to U+FFFD.
//!
//! The buffer also tracks a cursor at the last line boundary the session has
//! already rendered. [`LogBuffer::take_complete`] hands out only the newly
//! completed lines beyond it.

use crate::parser;

#[derive(Debug, Default)]
pub struct LogBuffer {
    text: String,
    /// Bytes of an incomplete UTF-8 sequence at the end of the last chunk.
    pending: Vec<u8>,
    /// Byte offset just past the last line boundary handed out.
    confirmed: usize,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw chunk.
    pub fn push(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    self.text.push_str(s);
                    return;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    // `valid_up_to` marks a UTF-8 prefix.
                    self.text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(n) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[n..];
                        }
                        None => {
                            self.pending = tail.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Everything decoded so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when nothing at all has been received.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.pending.is_empty()
    }

    /// Decoded length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Text of the lines completed since the previous call, terminators
    /// included. Empty when no new line boundary arrived.
    pub fn take_complete(&mut self) -> &str {
        let start = self.confirmed;
        let end = start + parser::complete_len(&self.text[start..]);
        self.confirmed = end;
        &self.text[start..end]
    }

    /// Flush at end of stream: decode any held-back bytes lossily and return
    /// the unterminated trailing fragment, if any.
    pub fn take_remainder(&mut self) -> &str {
        if !self.pending.is_empty() {
            self.pending.clear();
            self.text.push(char::REPLACEMENT_CHARACTER);
        }
        let start = self.confirmed;
        self.confirmed = self.text.len();
        &self.text[start..]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
