use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};

use lpf_framer::DecoderConfig;

use crate::{FramedReader, FramedWriter};

/// Size of the buffer each read call fills.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

#[derive(Clone, Debug, derive_builder::Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ConnectionConfig {
    /// How many bytes to ask the stream for per read.
    ///
    /// Frames larger than this are simply reassembled over several reads, so this only trades syscalls against
    /// memory.
    #[builder(default = "DEFAULT_READ_CHUNK_SIZE")]
    read_chunk_size: usize,

    #[builder(default)]
    decoder: DecoderConfig,
}

impl ConnectionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.read_chunk_size == Some(0) {
            return Err("read_chunk_size must be at least 1".to_string());
        }

        Ok(())
    }
}

impl ConnectionConfig {
    pub fn read_chunk_size(&self) -> usize {
        self.read_chunk_size
    }

    pub fn decoder(&self) -> &DecoderConfig {
        &self.decoder
    }
}

impl Default for ConnectionConfig {
    fn default() -> ConnectionConfig {
        ConnectionConfig {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            decoder: Default::default(),
        }
    }
}

/// Split an already-open stream into a reader and a writer of messages.
///
/// The halves can be moved into different tasks.
pub fn framed<S: AsyncRead + AsyncWrite>(
    config: ConnectionConfig,
    stream: S,
) -> (FramedReader<ReadHalf<S>>, FramedWriter<WriteHalf<S>>) {
    let (read_half, write_half) = tokio::io::split(stream);
    (
        FramedReader::new(config, read_half),
        FramedWriter::new(write_half),
    )
}
