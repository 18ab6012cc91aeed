//! Incremental JSON array decoder
//!
//! Frames one element at a time out of a chunked byte stream and feeds it
//! to serde. Envelope faults at the opening bracket fail fast; faults at
//! the closing bracket are deferred to [`JsonArrayDecoder::finish`] so the
//! caller can flush and drain in-flight work first.

use super::types::{ByteStream, DecodeEvent};
use crate::error::{Error, Result};
use crate::types::SensorReading;
use bytes::{Buf, Bytes, BytesMut};
use futures::StreamExt;

/// Decoder phase, advanced by `next_event`
#[derive(Debug)]
enum Phase {
    /// Opening `[` not yet consumed
    Start,
    /// Between elements, inside the array
    Elements,
    /// Closing `]` consumed
    Closed,
    /// Envelope fault observed mid-stream; reported by `finish`
    Broken(String),
}

/// What kind of element the scanner is currently framing
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanKind {
    /// Not yet decided (scanner at element start)
    Init,
    /// Object or nested array, tracked by delimiter depth
    Container,
    /// String scalar
    Str,
    /// Number, boolean, or null; ends at the next top-level delimiter
    Primitive,
}

/// Scanner state carried across chunk refills
#[derive(Debug)]
struct ScanState {
    pos: usize,
    kind: ScanKind,
    depth: u32,
    in_string: bool,
    escaped: bool,
}

impl ScanState {
    fn reset() -> Self {
        Self {
            pos: 0,
            kind: ScanKind::Init,
            depth: 0,
            in_string: false,
            escaped: false,
        }
    }
}

/// Pull-based decoder for a top-level JSON array of sensor readings
///
/// Call [`next_event`](Self::next_event) until it returns `Ok(None)`, then
/// [`finish`](Self::finish) to validate the envelope close. An empty array
/// yields zero events and a successful finish.
pub struct JsonArrayDecoder {
    stream: ByteStream,
    buf: BytesMut,
    eof: bool,
    phase: Phase,
    /// A `,` (or the closing `]`) must come next
    expect_separator: bool,
    /// The last consumed significant byte was a `,`
    after_comma: bool,
    /// Index of the next element
    index: usize,
    scan: ScanState,
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

impl JsonArrayDecoder {
    /// Create a decoder over a chunked byte stream
    pub fn new(stream: ByteStream) -> Self {
        Self {
            stream,
            buf: BytesMut::new(),
            eof: false,
            phase: Phase::Start,
            expect_separator: false,
            after_comma: false,
            index: 0,
            scan: ScanState::reset(),
        }
    }

    /// Number of elements framed so far (records plus skips)
    pub fn elements_seen(&self) -> usize {
        self.index
    }

    /// Pull the next chunk into the buffer; `Ok(false)` means end of stream
    async fn fill(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }
        match self.stream.next().await {
            Some(Ok(chunk)) => {
                self.buf.extend_from_slice(&chunk);
                Ok(true)
            }
            Some(Err(e)) => Err(e),
            None => {
                self.eof = true;
                Ok(false)
            }
        }
    }

    /// Discard leading whitespace and peek the next significant byte
    ///
    /// `Ok(None)` means the stream ended with only whitespace remaining.
    async fn peek_significant(&mut self) -> Result<Option<u8>> {
        loop {
            let ws_len = self.buf.iter().take_while(|b| is_ws(**b)).count();
            if ws_len > 0 {
                self.buf.advance(ws_len);
            }
            if let Some(&b) = self.buf.first() {
                return Ok(Some(b));
            }
            if !self.fill().await? {
                return Ok(None);
            }
        }
    }

    /// Produce the next event, or `Ok(None)` when no more elements can come
    ///
    /// The only error returned here is `MalformedEnvelope` for a missing
    /// opening bracket (plus propagated transport errors); everything at the
    /// tail of the stream is deferred to `finish`.
    pub async fn next_event(&mut self) -> Result<Option<DecodeEvent>> {
        loop {
            match &self.phase {
                Phase::Start => match self.peek_significant().await? {
                    Some(b'[') => {
                        self.buf.advance(1);
                        self.phase = Phase::Elements;
                    }
                    Some(b) => {
                        return Err(Error::malformed_envelope(format!(
                            "expected '[' to open array, found '{}'",
                            b as char
                        )));
                    }
                    None => {
                        return Err(Error::malformed_envelope(
                            "empty input, expected a JSON array",
                        ));
                    }
                },
                Phase::Elements => {
                    let b = match self.peek_significant().await? {
                        Some(b) => b,
                        None => {
                            self.phase =
                                Phase::Broken("stream ended before closing ']'".to_string());
                            return Ok(None);
                        }
                    };

                    if b == b']' {
                        if self.after_comma {
                            self.phase = Phase::Broken("trailing comma before ']'".to_string());
                        } else {
                            self.buf.advance(1);
                            self.phase = Phase::Closed;
                        }
                        return Ok(None);
                    }

                    if self.expect_separator {
                        if b == b',' {
                            self.buf.advance(1);
                            self.expect_separator = false;
                            self.after_comma = true;
                            continue;
                        }
                        self.phase = Phase::Broken(format!(
                            "expected ',' or ']' after element, found '{}'",
                            b as char
                        ));
                        return Ok(None);
                    }

                    if b == b',' {
                        self.phase =
                            Phase::Broken("unexpected ',' before element".to_string());
                        return Ok(None);
                    }

                    let Some(raw) = self.scan_element().await? else {
                        self.phase = Phase::Broken("stream ended inside an element".to_string());
                        return Ok(None);
                    };

                    self.expect_separator = true;
                    self.after_comma = false;
                    let index = self.index;
                    self.index += 1;

                    let event = match serde_json::from_slice::<SensorReading>(&raw) {
                        Ok(reading) => DecodeEvent::Record(reading),
                        Err(e) => DecodeEvent::Skipped {
                            index,
                            reason: e.to_string(),
                        },
                    };
                    return Ok(Some(event));
                }
                Phase::Closed | Phase::Broken(_) => return Ok(None),
            }
        }
    }

    /// Frame one complete element starting at the front of the buffer
    ///
    /// Returns the element's raw bytes, or `None` when the stream ends
    /// mid-element. The trailing delimiter is left in the buffer.
    async fn scan_element(&mut self) -> Result<Option<Bytes>> {
        loop {
            while self.scan.pos < self.buf.len() {
                let b = self.buf[self.scan.pos];
                let pos = self.scan.pos;

                if self.scan.kind == ScanKind::Init {
                    self.scan.kind = match b {
                        b'{' | b'[' => {
                            self.scan.depth = 1;
                            ScanKind::Container
                        }
                        b'"' => {
                            self.scan.in_string = true;
                            ScanKind::Str
                        }
                        _ => ScanKind::Primitive,
                    };
                    self.scan.pos += 1;
                    continue;
                }

                match self.scan.kind {
                    ScanKind::Container => {
                        if self.scan.in_string {
                            if self.scan.escaped {
                                self.scan.escaped = false;
                            } else if b == b'\\' {
                                self.scan.escaped = true;
                            } else if b == b'"' {
                                self.scan.in_string = false;
                            }
                        } else {
                            match b {
                                b'"' => self.scan.in_string = true,
                                b'{' | b'[' => self.scan.depth += 1,
                                b'}' | b']' => {
                                    self.scan.depth -= 1;
                                    if self.scan.depth == 0 {
                                        return Ok(Some(self.detach_element(pos + 1)));
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    ScanKind::Str => {
                        if self.scan.escaped {
                            self.scan.escaped = false;
                        } else if b == b'\\' {
                            self.scan.escaped = true;
                        } else if b == b'"' {
                            return Ok(Some(self.detach_element(pos + 1)));
                        }
                    }
                    ScanKind::Primitive => {
                        if is_ws(b) || b == b',' || b == b']' || b == b'}' {
                            return Ok(Some(self.detach_element(pos)));
                        }
                    }
                    ScanKind::Init => unreachable!("handled above"),
                }

                self.scan.pos += 1;
            }

            if !self.fill().await? {
                // A primitive can also be terminated by end of input; the
                // missing ']' is caught by the caller.
                if self.scan.kind == ScanKind::Primitive && self.scan.pos > 0 {
                    let end = self.scan.pos;
                    return Ok(Some(self.detach_element(end)));
                }
                self.scan = ScanState::reset();
                return Ok(None);
            }
        }
    }

    /// Split the framed element off the buffer and reset the scanner
    fn detach_element(&mut self, end: usize) -> Bytes {
        self.scan = ScanState::reset();
        self.buf.split_to(end).freeze()
    }

    /// Validate the envelope close once the element sequence is exhausted
    ///
    /// Only whitespace may follow the closing `]`.
    pub async fn finish(&mut self) -> Result<()> {
        match &self.phase {
            Phase::Closed => match self.peek_significant().await? {
                None => Ok(()),
                Some(b) => Err(Error::malformed_envelope(format!(
                    "unexpected trailing data after ']': '{}'",
                    b as char
                ))),
            },
            Phase::Broken(reason) => Err(Error::malformed_envelope(reason.clone())),
            Phase::Start => Err(Error::malformed_envelope("array was never opened")),
            Phase::Elements => Err(Error::malformed_envelope("closing ']' never reached")),
        }
    }
}
