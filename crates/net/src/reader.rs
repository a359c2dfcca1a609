use log::*;
use tokio::io::{AsyncRead, AsyncReadExt};

use lpf_framer::{DecodeError, Decoder, Message};

use crate::ConnectionConfig;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Decode(#[from] DecodeError),

    /// The stream ended partway through a frame.
    #[error("Stream ended with {buffered} bytes of an incomplete frame")]
    TruncatedFrame { buffered: usize },
}

/// Reads messages off a byte stream.
///
/// Owns the stream's [Decoder]; the only place this ever waits is the underlying read.  On any error the connection
/// should be thrown out: the decoder won't resynchronize.
pub struct FramedReader<R> {
    reader: R,
    decoder: Decoder,
    chunk: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FramedReader<R> {
    pub fn new(config: ConnectionConfig, reader: R) -> FramedReader<R> {
        FramedReader {
            reader,
            decoder: Decoder::new(config.decoder().clone()),
            chunk: vec![0; config.read_chunk_size()],
        }
    }

    /// Get the next message.
    ///
    /// Messages already sitting in the decoder come out without touching the stream.  Returns `Ok(None)` if the
    /// stream ends cleanly between frames.
    pub async fn read_message(&mut self) -> Result<Option<Message>, ReadError> {
        loop {
            match self.decoder.try_extract() {
                Ok(Some(m)) => return Ok(Some(m)),
                Ok(None) => {}
                Err(e) => {
                    warn!("Dropping stream after protocol error: {}", e);
                    return Err(e.into());
                }
            }

            let read = self.reader.read(&mut self.chunk[..]).await?;
            if read == 0 {
                if self.decoder.is_empty() {
                    debug!("Stream closed");
                    return Ok(None);
                }

                let buffered = self.decoder.buffered_len();
                warn!(
                    "Stream closed with {} bytes of an incomplete frame buffered",
                    buffered
                );
                return Err(ReadError::TruncatedFrame { buffered });
            }

            trace!("Read {} bytes", read);
            self.decoder.append(&self.chunk[..read]);
        }
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
