//! Tail reader: the last N lines of a file, found by scanning fixed-size
//! chunks backward from the end instead of reading the whole file.
//!
//! Lines are split on `\n` before any decoding happens. Since `\n` never
//! occurs inside a multi-byte UTF-8 sequence, a chunk boundary that cuts a
//! character can only fall inside the leading partial line, which is
//! discarded undecoded. Every kept line is decoded strictly: invalid UTF-8
//! fails the whole call.

use crate::error::TailError;
use crate::search::filter_lines;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Backward chunk producer over a seekable source.
///
/// Yields chunks of at most `chunk_size` bytes, last chunk of the file
/// first, until the start of the source. Single pass: once exhausted (or
/// after an error) it yields nothing more.
pub struct ReverseChunks<R> {
    reader: R,
    pos: u64,
    buf: Vec<u8>,
}

impl<R: Read + Seek> ReverseChunks<R> {
    pub fn new(mut reader: R, chunk_size: usize) -> io::Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        Ok(Self {
            reader,
            pos: len,
            buf: vec![0; chunk_size.max(1)],
        })
    }

    /// Offset of the earliest byte yielded so far (0 once the start is reached).
    pub fn position(&self) -> u64 {
        self.pos
    }

    fn read_before(&mut self, len: usize) -> io::Result<u64> {
        let start = self.pos - len as u64;
        self.reader.seek(SeekFrom::Start(start))?;
        self.reader.read_exact(&mut self.buf[..len])?;
        Ok(start)
    }
}

impl<R: Read + Seek> Iterator for ReverseChunks<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == 0 {
            return None;
        }

        let len = (self.buf.len() as u64).min(self.pos) as usize;
        match self.read_before(len) {
            Ok(start) => {
                self.pos = start;
                Some(Ok(self.buf[..len].to_vec()))
            }
            Err(err) => {
                self.pos = 0;
                Some(Err(err))
            }
        }
    }
}

/// Accumulates backward chunks until enough line boundaries have been seen.
struct TailBuffer {
    // newest (closest to EOF) first
    chunks: Vec<Vec<u8>>,
    newlines: usize,
    ends_with_newline: bool,
    limit: usize,
}

impl TailBuffer {
    fn new(limit: usize) -> Self {
        Self {
            chunks: Vec::new(),
            newlines: 0,
            ends_with_newline: false,
            limit,
        }
    }

    fn push(&mut self, chunk: Vec<u8>) {
        if self.chunks.is_empty() {
            self.ends_with_newline = chunk.last() == Some(&b'\n');
        }
        self.newlines += memchr::memchr_iter(b'\n', &chunk).count();
        self.chunks.push(chunk);
    }

    /// `limit` complete lines are buffered: `limit` boundaries in front of
    /// the file's own final terminator, if it has one.
    fn is_complete(&self) -> bool {
        self.newlines >= self.limit + usize::from(self.ends_with_newline)
    }

    fn byte_len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    fn into_lines(self, path: &Path) -> Result<Vec<String>, TailError> {
        if self.chunks.is_empty() || self.limit == 0 {
            return Ok(Vec::new());
        }

        let mut bytes = Vec::with_capacity(self.byte_len());
        for chunk in self.chunks.iter().rev() {
            bytes.extend_from_slice(chunk);
        }

        let body = bytes.strip_suffix(b"\n").unwrap_or(&bytes);

        // Newest line first; the oldest piece may be a partial line when the
        // scan stopped before the start of the file, and is never reached
        // because enough complete lines sit in front of it.
        let mut lines = Vec::with_capacity(self.limit);
        for (from_end, piece) in body.rsplit(|b| *b == b'\n').take(self.limit).enumerate() {
            let piece = piece.strip_suffix(b"\r").unwrap_or(piece);
            let line = std::str::from_utf8(piece).map_err(|_| TailError::Decode {
                path: path.to_path_buf(),
                line: from_end + 1,
            })?;
            lines.push(line.to_string());
        }
        lines.reverse();
        Ok(lines)
    }
}

/// Tail reader with a configurable chunk size.
#[derive(Debug, Clone, Copy)]
pub struct TailReader {
    chunk_size: usize,
}

impl TailReader {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Last `limit` lines of `path`, in file order.
    pub fn tail(&self, path: impl AsRef<Path>, limit: usize) -> Result<Vec<String>, TailError> {
        let path = path.as_ref();
        let file = open_regular(path)?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut chunks =
            ReverseChunks::new(file, self.chunk_size).map_err(|e| TailError::from_io(path, e))?;
        let mut buffer = TailBuffer::new(limit);

        while !buffer.is_complete() {
            match chunks.next() {
                Some(chunk) => buffer.push(chunk.map_err(|e| TailError::from_io(path, e))?),
                None => break,
            }
        }

        debug!(
            path = %path.display(),
            limit,
            bytes_scanned = buffer.byte_len(),
            reached_start = chunks.position() == 0,
            "tail scan finished"
        );
        buffer.into_lines(path)
    }

    /// Non-blocking form of [`TailReader::tail`].
    ///
    /// Chunk reads go through `tokio::fs`, and the task yields between
    /// chunks so one large file does not hold a worker. Dropping the future
    /// closes the file and discards whatever was read.
    pub async fn tail_async(
        &self,
        path: impl AsRef<Path>,
        limit: usize,
    ) -> Result<Vec<String>, TailError> {
        let path = path.as_ref();
        let io_err = |e| TailError::from_io(path, e);

        let mut file = tokio::fs::File::open(path).await.map_err(io_err)?;
        let metadata = file.metadata().await.map_err(io_err)?;
        if !metadata.is_file() {
            return Err(TailError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut pos = metadata.len();
        let mut chunk = vec![0u8; self.chunk_size];
        let mut buffer = TailBuffer::new(limit);

        while pos > 0 && !buffer.is_complete() {
            let len = (chunk.len() as u64).min(pos) as usize;
            pos -= len as u64;
            file.seek(SeekFrom::Start(pos)).await.map_err(io_err)?;
            file.read_exact(&mut chunk[..len]).await.map_err(io_err)?;
            buffer.push(chunk[..len].to_vec());

            tokio::task::yield_now().await;
        }

        debug!(
            path = %path.display(),
            limit,
            bytes_scanned = buffer.byte_len(),
            reached_start = pos == 0,
            "async tail scan finished"
        );
        buffer.into_lines(path)
    }
}

impl Default for TailReader {
    fn default() -> Self {
        Self::new()
    }
}

fn open_regular(path: &Path) -> Result<File, TailError> {
    let file = File::open(path).map_err(|e| TailError::from_io(path, e))?;
    let metadata = file.metadata().map_err(|e| TailError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(TailError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(file)
}

/// Last `limit` lines of `path` using the default chunk size.
pub fn tail(path: impl AsRef<Path>, limit: usize) -> Result<Vec<String>, TailError> {
    TailReader::new().tail(path, limit)
}

pub async fn tail_async(path: impl AsRef<Path>, limit: usize) -> Result<Vec<String>, TailError> {
    TailReader::new().tail_async(path, limit).await
}

/// Tail `path`, then keep only lines containing `search_term` (case-sensitive).
pub fn get_file_lines(
    path: impl AsRef<Path>,
    search_term: Option<&str>,
    limit: usize,
) -> Result<Vec<String>, TailError> {
    let lines = tail(path, limit)?;
    Ok(filter_lines(lines, search_term, None, true))
}

pub async fn get_file_lines_async(
    path: impl AsRef<Path>,
    search_term: Option<&str>,
    limit: usize,
) -> Result<Vec<String>, TailError> {
    let lines = tail_async(path, limit).await?;
    Ok(filter_lines(lines, search_term, None, true))
}
