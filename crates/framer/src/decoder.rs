use bytes::{Buf, Bytes};

use crate::buffer::AccumulationBuffer;
use crate::header::{self, HEADER_SIZE};
use crate::message::Message;

/// Capacity a decoder starts with and shrinks back to after draining.
pub const DEFAULT_RETAINED_CAPACITY: usize = 4096;

/// A conventional cap for peers which only exchange small messages.
///
/// Not applied by default: a decoder built from [DecoderConfig::default] accepts any frame that fits in the header.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 10 * 1024;

#[derive(Clone, Debug, derive_builder::Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct DecoderConfig {
    /// Largest `total_size` (header included) the decoder will accept.
    ///
    /// Checked as soon as a header is visible, so the body of an oversized frame is never waited for.
    #[builder(default, setter(strip_option))]
    max_frame_size: Option<u32>,

    /// Initial capacity of the accumulation buffer, and the capacity it is shrunk back to whenever it empties.
    #[builder(default = "DEFAULT_RETAINED_CAPACITY")]
    retained_capacity: usize,
}

impl DecoderConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(max)) = self.max_frame_size {
            if (max as usize) < HEADER_SIZE {
                return Err(format!(
                    "max_frame_size {} is smaller than the {}-byte header",
                    max, HEADER_SIZE
                ));
            }
        }

        Ok(())
    }
}

impl DecoderConfig {
    pub fn max_frame_size(&self) -> Option<u32> {
        self.max_frame_size
    }

    pub fn retained_capacity(&self) -> usize {
        self.retained_capacity
    }
}

impl Default for DecoderConfig {
    fn default() -> DecoderConfig {
        DecoderConfig {
            max_frame_size: None,
            retained_capacity: DEFAULT_RETAINED_CAPACITY,
        }
    }
}

/// Errors which poison a decoder.
///
/// There is no way to find the next frame boundary after a bad length, so once one of these comes out of
/// [Decoder::try_extract] the decoder keeps returning it, and the connection should be dropped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The header claims a frame shorter than the header itself.
    #[display(
        fmt = "frame length {} is smaller than the {}-byte header",
        total_size,
        HEADER_SIZE
    )]
    InvalidFrameLength { total_size: u32 },

    /// The header claims a frame longer than the configured maximum.
    #[display(fmt = "frame length {} exceeds the maximum of {}", total_size, max)]
    OversizedFrame { total_size: u32, max: u32 },
}

/// What the front of the buffer looks like right now.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FrameStatus {
    /// Not even a header yet.  `missing` is how many more bytes would complete it.
    NeedHeader { missing: usize },

    /// The header is visible but the body isn't all here.
    NeedBody { total_size: u32, missing: usize },

    /// A whole frame is buffered.
    Ready { total_size: u32 },
}

/// Reassembles frames out of arbitrarily split chunks of a byte stream.
///
/// To use, call [Decoder::append] with each chunk as it arrives, then call [Decoder::try_extract] until it returns
/// `Ok(None)` (or use [Decoder::drain], which does the same thing).  One chunk may complete any number of frames,
/// including none.
///
/// Extraction happens in two phases: [Decoder::status] looks at the header without touching anything, and only a
/// `Ready` status consumes bytes.  Until then the header stays in the buffer and is simply re-read next time.
///
/// One decoder belongs to one stream.  It does no I/O and never blocks.
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,
    buffer: AccumulationBuffer,
    failure: Option<DecodeError>,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Decoder {
        Decoder {
            buffer: AccumulationBuffer::new(config.retained_capacity),
            config,
            failure: None,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Append a chunk to the end of the buffer.
    ///
    /// No validation happens here and empty chunks are fine.
    pub fn append(&mut self, chunk: &[u8]) {
        self.buffer.append(chunk);
    }

    /// Like [Decoder::append], but drains any [Buf].
    pub fn feed(&mut self, chunk: &mut impl Buf) {
        self.buffer.append_buf(chunk);
    }

    /// Look at the front of the buffer without consuming anything.
    pub fn status(&self) -> Result<FrameStatus, DecodeError> {
        if let Some(e) = self.failure {
            return Err(e);
        }

        let unread = self.buffer.unread();
        let total_size = match header::peek_total_size(unread) {
            Some(t) => t,
            None => {
                return Ok(FrameStatus::NeedHeader {
                    missing: HEADER_SIZE - unread.len(),
                })
            }
        };

        if (total_size as usize) < HEADER_SIZE {
            return Err(DecodeError::InvalidFrameLength { total_size });
        }

        if let Some(max) = self.config.max_frame_size {
            if total_size > max {
                return Err(DecodeError::OversizedFrame { total_size, max });
            }
        }

        if unread.len() < total_size as usize {
            return Ok(FrameStatus::NeedBody {
                total_size,
                missing: total_size as usize - unread.len(),
            });
        }

        Ok(FrameStatus::Ready { total_size })
    }

    /// Remove and return one complete message from the front of the buffer, if there is one.
    ///
    /// `Ok(None)` means more data is needed and nothing was consumed.
    pub fn try_extract(&mut self) -> Result<Option<Message>, DecodeError> {
        let total_size = match self.status() {
            Ok(FrameStatus::Ready { total_size }) => total_size as usize,
            Ok(_) => return Ok(None),
            Err(e) => {
                if self.failure.is_none() {
                    log::debug!("Decoder failed: {}", e);
                    self.failure = Some(e);
                }
                return Err(e);
            }
        };

        let body = Bytes::copy_from_slice(&self.buffer.unread()[HEADER_SIZE..total_size]);
        self.buffer.consume(total_size);
        log::trace!("Extracted frame of {} bytes", total_size);
        Ok(Some(Message::new(body)))
    }

    /// Iterate over every message that can be extracted right now.
    ///
    /// Stops when more data is needed, or after yielding the first error.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain {
            decoder: self,
            done: false,
        }
    }

    /// A lower bound on how many more bytes must be appended before a message can come out.
    ///
    /// Zero if a frame is ready, or if the decoder has failed.
    pub fn needed(&self) -> usize {
        match self.status() {
            Ok(FrameStatus::NeedHeader { missing }) => missing,
            Ok(FrameStatus::NeedBody { missing, .. }) => missing,
            Ok(FrameStatus::Ready { .. }) | Err(_) => 0,
        }
    }

    /// The `total_size` of the frame at the front of the buffer, if its header has arrived.
    ///
    /// This is the raw header value and hasn't been validated.
    pub fn peek_frame_len(&self) -> Option<u32> {
        header::peek_total_size(self.buffer.unread())
    }

    /// Number of bytes appended but not yet extracted.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Whether this decoder has reported a protocol error.
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

impl Default for Decoder {
    fn default() -> Decoder {
        Decoder::new(Default::default())
    }
}

/// Iterator returned by [Decoder::drain].
pub struct Drain<'a> {
    decoder: &'a mut Decoder,
    done: bool,
}

impl<'a> Iterator for Drain<'a> {
    type Item = Result<Message, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.decoder.try_extract() {
            Ok(Some(m)) => Some(Ok(m)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a> std::iter::FusedIterator for Drain<'a> {}
