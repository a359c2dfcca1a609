//! Drive [lpf_framer] over an async byte stream.
//!
//! This crate doesn't open connections; hand it anything that implements tokio's `AsyncRead`/`AsyncWrite` and it
//! reads and writes whole messages.  Each stream gets its own decoder, owned by whichever task reads from it.
mod connection;
mod reader;
mod writer;

pub use connection::*;
pub use reader::*;
pub use writer::*;
