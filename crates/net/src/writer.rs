use anyhow::Result;
use log::*;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use lpf_framer::{Encoder, Message};

/// Capacity the write batch shrinks back to between sends.
const WRITE_CAP_LIMIT: usize = 4096;

/// Writes messages to a byte stream, one frame each.
pub struct FramedWriter<W> {
    writer: W,
    encoder: Encoder,
}

impl<W: AsyncWrite + Unpin> FramedWriter<W> {
    pub fn new(writer: W) -> FramedWriter<W> {
        FramedWriter {
            writer,
            encoder: Encoder::new(WRITE_CAP_LIMIT),
        }
    }

    pub async fn send(&mut self, message: &Message) -> Result<()> {
        self.send_all(std::iter::once(message)).await
    }

    /// Frame all of `messages` and hand them to the stream in one write.
    ///
    /// If any message can't be framed, nothing is written.
    pub async fn send_all<'a>(&mut self, messages: impl IntoIterator<Item = &'a Message>) -> Result<()> {
        self.encoder.clear();
        for m in messages {
            self.encoder.add_message(m)?;
        }

        self.writer.write_all(self.encoder.data()).await?;
        trace!("Wrote {} bytes", self.encoder.data().len());
        self.encoder.clear();
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Shut down the write side of the stream, so the peer sees a clean end of stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
