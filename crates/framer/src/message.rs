use bytes::Bytes;

use crate::header::HEADER_SIZE;

/// A message: the body of one frame, with the header stripped.
///
/// Messages are immutable and cheap to clone.  This crate doesn't know what the body means; interpreting it is up to
/// whoever is on the other side of the decoder.
#[derive(Debug, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Message {
    body: Bytes,
}

impl Message {
    pub fn new(body: impl Into<Bytes>) -> Message {
        Message { body: body.into() }
    }

    pub fn body(&self) -> &[u8] {
        &self.body[..]
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Length of the body, excluding the header.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Length of this message once framed, i.e. what the header will say.
    pub fn encoded_len(&self) -> usize {
        self.body.len() + HEADER_SIZE
    }
}

impl From<Bytes> for Message {
    fn from(body: Bytes) -> Message {
        Message { body }
    }
}

impl From<Vec<u8>> for Message {
    fn from(body: Vec<u8>) -> Message {
        Message::new(body)
    }
}

impl From<&'static [u8]> for Message {
    fn from(body: &'static [u8]) -> Message {
        Message::new(body)
    }
}

impl From<&'static str> for Message {
    fn from(body: &'static str) -> Message {
        Message::new(body)
    }
}

impl AsRef<[u8]> for Message {
    fn as_ref(&self) -> &[u8] {
        self.body()
    }
}
