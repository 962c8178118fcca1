use super::ChunkSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Default number of bytes requested per read
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Chunk source over any async reader (files, stdin, pipes)
pub struct ReaderSource<R> {
    reader: R,
    chunk_size: usize,
    transferred: u64,
}

impl<R: AsyncRead + Unpin + Send> ReaderSource<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
            transferred: 0,
        }
    }
}

impl ReaderSource<tokio::fs::File> {
    pub async fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("cannot open {}", path.display()))?;
        Ok(Self::new(file, chunk_size))
    }
}

impl ReaderSource<tokio::io::Stdin> {
    pub fn stdin(chunk_size: usize) -> Self {
        Self::new(tokio::io::stdin(), chunk_size)
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> ChunkSource for ReaderSource<R> {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; self.chunk_size];
        let n = self.reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }

        buf.truncate(n);
        self.transferred += n as u64;
        Ok(Some(buf))
    }

    fn transferred_bytes(&self) -> u64 {
        self.transferred
    }
}
