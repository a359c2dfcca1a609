//! This crate frames messages and reassembles framed messages.  To use, encode with an [Encoder] (or
//! [encode_frame]) and decode with a [Decoder].
//!
//! A frame is a 4-byte little-endian `total_size` followed by `total_size - 4` bytes of body.  The size counts the
//! header itself, so an empty message is the four bytes `04 00 00 00`, and any size below 4 is a protocol error.
//! There is no type tag, checksum, or version: you get the body back as bytes and are responsible for decoding it.
//!
//! Nothing here does I/O.  Whatever owns the stream appends chunks as they are read and pulls messages out after
//! each one.
mod buffer;
mod decoder;
mod encoder;
mod header;
mod message;
pub use decoder::*;
pub use encoder::*;
pub use header::HEADER_SIZE;
pub use message::*;
