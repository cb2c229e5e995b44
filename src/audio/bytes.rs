//! Checked little-endian byte I/O.
//!
//! [`ByteStream`] wraps any reader/writer together with a display name so
//! that every failure can be reported against the file it happened on.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ErrorCode, Result, SoundError};

/// Length of a RIFF chunk tag.
pub const TAG_LEN: usize = 4;

/// A stream paired with the name used in its error messages.
pub struct ByteStream<S> {
    inner: S,
    name: String,
}

impl<S> ByteStream<S> {
    /// Wraps `inner`, reporting failures as `name`.
    pub fn new(inner: S, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }

    /// Returns the display name of the underlying target.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unwraps the stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Write> ByteStream<S> {
    /// Writes the low `byte_count` bytes of `value`, least significant first.
    ///
    /// `byte_count` must be between 1 and 8.
    pub fn write_uint_le(&mut self, value: u64, byte_count: usize) -> Result<()> {
        self.inner
            .write_uint::<LittleEndian>(value, byte_count)
            .map_err(|e| SoundError::write_failed(&self.name, e))
    }

    /// Writes raw bytes as they are.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner
            .write_all(bytes)
            .map_err(|e| SoundError::write_failed(&self.name, e))
    }

    /// Writes a fixed four-byte tag such as `RIFF`.
    pub fn write_tag(&mut self, tag: &[u8; TAG_LEN]) -> Result<()> {
        self.inner
            .write_all(tag)
            .map_err(|e| SoundError::write_failed(&self.name, e))
    }

    /// Flushes buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| SoundError::write_failed(&self.name, e))
    }
}

impl<S: Read> ByteStream<S> {
    /// Reads `byte_count` bytes, least significant first.
    ///
    /// `byte_count` must be between 1 and 8.
    pub fn read_uint_le(&mut self, byte_count: usize) -> Result<u64> {
        self.inner
            .read_uint::<LittleEndian>(byte_count)
            .map_err(|e| SoundError::read_failed(&self.name, e))
    }

    /// Reads a fixed four-byte tag.
    pub fn read_tag(&mut self) -> Result<[u8; TAG_LEN]> {
        let mut tag = [0u8; TAG_LEN];
        self.inner
            .read_exact(&mut tag)
            .map_err(|e| SoundError::read_failed(&self.name, e))?;
        Ok(tag)
    }
}

impl<S: Seek> ByteStream<S> {
    /// Seeks to an absolute byte offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|e| SoundError::seek_failed(&self.name, offset, e))
    }

    /// Returns the stream length in bytes, leaving the position at the end.
    pub fn stream_len(&mut self) -> Result<u64> {
        self.inner.seek(SeekFrom::End(0)).map_err(|e| {
            SoundError::with_source(
                ErrorCode::SeekFailed,
                format!("{}: Seek to end failed", self.name),
                e,
            )
        })
    }
}
