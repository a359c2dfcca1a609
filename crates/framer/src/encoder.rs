use bytes::BufMut;

use crate::header;
use crate::message::Message;

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// The body plus header doesn't fit in a u32.  Contains the body length.
    #[display(fmt = "body of {} bytes is too long to frame", _0)]
    BodyTooLong(usize),
}

/// Write `body` as a single frame.
///
/// Nothing is written if the body is too long.
pub fn encode_frame(body: &[u8], dest: &mut impl BufMut) -> Result<(), EncodeError> {
    let total_size = header::total_size_for(body.len()).ok_or(EncodeError::BodyTooLong(body.len()))?;
    header::encode(total_size, dest);
    dest.put_slice(body);
    Ok(())
}

/// An encoder writes frames to an internal buffer, then hands them out on request.
///
/// To use, call [Encoder::add_message] repeatedly, then [Encoder::data], then [Encoder::clear].  The general pattern
/// here is to build up a batch of frames, send the bytes over the network in one write, then start the next batch.
pub struct Encoder {
    cap_limit: usize,
    buffer: Vec<u8>,
}

impl Encoder {
    /// Create an encoder.
    ///
    /// `cap_limit` is the maximum capacity of the internal buffer after clearing, so that one large batch doesn't pin
    /// memory forever.
    pub fn new(cap_limit: usize) -> Encoder {
        Encoder {
            cap_limit,
            buffer: Vec::with_capacity(cap_limit),
        }
    }

    /// Clear the internal buffer to write a new batch of frames.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.buffer.shrink_to(self.cap_limit);
    }

    pub fn add_message(&mut self, message: &Message) -> Result<(), EncodeError> {
        self.add_body(message.body())
    }

    pub fn add_body(&mut self, body: &[u8]) -> Result<(), EncodeError> {
        encode_frame(body, &mut self.buffer)
    }

    /// Read the data of all frames in the encoder.
    pub fn data(&self) -> &[u8] {
        &self.buffer[..]
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
