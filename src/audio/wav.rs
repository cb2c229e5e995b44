//! WAVE container codec.
//!
//! Writes mono 16-bit PCM files with the canonical 44-byte header and
//! appends to files of the same shape in place. Append verifies the whole
//! existing header before touching a single byte.

use std::fmt;
use std::io::{Read, Seek, Write};

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, info};

use super::bytes::{ByteStream, TAG_LEN};
use crate::error::{Result, SoundError};

/// RIFF chunk identifier.
pub const CHUNK_ID: &[u8; TAG_LEN] = b"RIFF";

/// RIFF form type.
pub const FORMAT: &[u8; TAG_LEN] = b"WAVE";

/// Format sub-chunk identifier.
pub const SUBCHUNK1_ID: &[u8; TAG_LEN] = b"fmt ";

/// Size of the PCM format sub-chunk body.
pub const SUBCHUNK1_SIZE: u32 = 16;

/// Audio format code for uncompressed PCM.
pub const AUDIO_FORMAT_PCM: u16 = 1;

/// Number of audio channels (mono).
pub const CHANNELS: u16 = 1;

/// Bits per sample.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per sample frame across all channels.
pub const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

/// Data sub-chunk identifier.
pub const SUBCHUNK2_ID: &[u8; TAG_LEN] = b"data";

/// Total header length; sample data starts here.
pub const HEADER_LEN: u64 = 44;

/// Bytes counted by the RIFF chunk size besides the sample data.
pub const RIFF_OVERHEAD: u32 = 36;

/// Byte offset of the Chunk Size field.
pub const CHUNK_SIZE_OFFSET: u64 = 4;

/// Byte offset of the Subchunk2 Size field.
pub const DATA_SIZE_OFFSET: u64 = 40;

/// Largest data sub-chunk the 32-bit size fields can describe.
pub const MAX_DATA_SIZE: u32 = u32::MAX - RIFF_OVERHEAD;

/// Byte rate for a mono 16-bit stream at `sample_rate`.
///
/// Computed in 64-bit and truncated to the 32-bit header field, the same
/// way on write and on verify.
pub fn byte_rate(sample_rate: u32) -> u32 {
    (u64::from(sample_rate) * u64::from(BLOCK_ALIGN)) as u32
}

/// Returns the data sub-chunk size for `sample_count` samples, if it fits.
pub fn data_size_for(sample_count: usize) -> Option<u32> {
    let bytes = (sample_count as u64).checked_mul(u64::from(BLOCK_ALIGN))?;
    u32::try_from(bytes).ok().filter(|size| *size <= MAX_DATA_SIZE)
}

/// The 44-byte WAVE header, field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_id: [u8; TAG_LEN],
    pub chunk_size: u32,
    pub format: [u8; TAG_LEN],
    pub subchunk1_id: [u8; TAG_LEN],
    pub subchunk1_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub subchunk2_id: [u8; TAG_LEN],
    pub data_size: u32,
}

impl WavHeader {
    /// The header wavetone writes for `data_size` bytes of samples.
    ///
    /// `data_size` must not exceed [`MAX_DATA_SIZE`].
    pub fn pcm_mono(sample_rate: u32, data_size: u32) -> Self {
        Self {
            chunk_id: *CHUNK_ID,
            chunk_size: RIFF_OVERHEAD + data_size,
            format: *FORMAT,
            subchunk1_id: *SUBCHUNK1_ID,
            subchunk1_size: SUBCHUNK1_SIZE,
            audio_format: AUDIO_FORMAT_PCM,
            channels: CHANNELS,
            sample_rate,
            byte_rate: byte_rate(sample_rate),
            block_align: BLOCK_ALIGN,
            bits_per_sample: BITS_PER_SAMPLE,
            subchunk2_id: *SUBCHUNK2_ID,
            data_size,
        }
    }

    /// Number of samples described by the data sub-chunk.
    pub fn sample_count(&self) -> u32 {
        self.data_size / u32::from(BLOCK_ALIGN)
    }

    /// Writes the header at the stream's current position.
    pub fn encode<W: Write>(&self, stream: &mut ByteStream<W>) -> Result<()> {
        stream.write_tag(&self.chunk_id)?;
        stream.write_uint_le(self.chunk_size.into(), 4)?;
        stream.write_tag(&self.format)?;
        stream.write_tag(&self.subchunk1_id)?;
        stream.write_uint_le(self.subchunk1_size.into(), 4)?;
        stream.write_uint_le(self.audio_format.into(), 2)?;
        stream.write_uint_le(self.channels.into(), 2)?;
        stream.write_uint_le(self.sample_rate.into(), 4)?;
        stream.write_uint_le(self.byte_rate.into(), 4)?;
        stream.write_uint_le(self.block_align.into(), 2)?;
        stream.write_uint_le(self.bits_per_sample.into(), 2)?;
        stream.write_tag(&self.subchunk2_id)?;
        stream.write_uint_le(self.data_size.into(), 4)
    }

    /// Reads the header at the stream's current position without judging it.
    pub fn decode<R: Read>(stream: &mut ByteStream<R>) -> Result<Self> {
        Ok(Self {
            chunk_id: stream.read_tag()?,
            chunk_size: stream.read_uint_le(4)? as u32,
            format: stream.read_tag()?,
            subchunk1_id: stream.read_tag()?,
            subchunk1_size: stream.read_uint_le(4)? as u32,
            audio_format: stream.read_uint_le(2)? as u16,
            channels: stream.read_uint_le(2)? as u16,
            sample_rate: stream.read_uint_le(4)? as u32,
            byte_rate: stream.read_uint_le(4)? as u32,
            block_align: stream.read_uint_le(2)? as u16,
            bits_per_sample: stream.read_uint_le(2)? as u16,
            subchunk2_id: stream.read_tag()?,
            data_size: stream.read_uint_le(4)? as u32,
        })
    }
}

/// Displays a RIFF tag as a quoted, escaped string.
struct Tag<'a>(&'a [u8; TAG_LEN]);

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

/// Writes a complete WAVE file: header followed by `samples`.
///
/// The stream need not be seekable, so this also serves standard output.
///
/// # Arguments
///
/// * `stream` - Destination, named for error messages
/// * `samples` - Mono 16-bit samples in playback order
/// * `sample_rate` - Sample rate in Hz recorded in the header
///
/// # Returns
///
/// The size in bytes of the data sub-chunk written. Fails with
/// `SAMPLE_OVERFLOW` if the samples do not fit the 32-bit size fields.
pub fn create<W: Write>(
    stream: &mut ByteStream<W>,
    samples: &[i16],
    sample_rate: u32,
) -> Result<u32> {
    let data_size = data_size_for(samples.len())
        .ok_or_else(|| SoundError::data_too_large(stream.name(), samples.len() as u64 * 2))?;

    debug!(
        file = stream.name(),
        sample_rate,
        data_size,
        "Writing WAVE header"
    );
    WavHeader::pcm_mono(sample_rate, data_size).encode(stream)?;
    write_samples(stream, samples)?;
    stream.flush()?;

    info!(file = stream.name(), samples = samples.len(), "Created WAVE file");
    Ok(data_size)
}

/// Reads the header from the start of the stream.
pub fn read_header<S: Read + Seek>(stream: &mut ByteStream<S>) -> Result<WavHeader> {
    stream.seek_to(0)?;
    WavHeader::decode(stream)
}

/// Checks that the stream holds a header wavetone can append to at
/// `sample_rate`, and returns it.
///
/// The expected data size is recovered from the Chunk Size field, so a
/// file whose two size fields disagree is rejected. Nothing is written.
pub fn verify_header<S: Read + Seek>(
    stream: &mut ByteStream<S>,
    sample_rate: u32,
) -> Result<WavHeader> {
    stream.seek_to(CHUNK_SIZE_OFFSET)?;
    let chunk_size = stream.read_uint_le(4)? as u32;
    let previous_data_size = chunk_size.checked_sub(RIFF_OVERHEAD).ok_or_else(|| {
        SoundError::header_mismatch(
            stream.name(),
            "Chunk Size",
            format_args!("at least {}", RIFF_OVERHEAD),
            chunk_size,
        )
    })?;

    let actual = read_header(stream)?;
    let expected = WavHeader::pcm_mono(sample_rate, previous_data_size);
    let name = stream.name();

    check_tag(name, "Chunk ID", &expected.chunk_id, &actual.chunk_id)?;
    check_tag(name, "Format", &expected.format, &actual.format)?;
    check_tag(name, "Subchunk1 ID", &expected.subchunk1_id, &actual.subchunk1_id)?;
    check(name, "Subchunk1 Size", expected.subchunk1_size, actual.subchunk1_size)?;
    check(name, "Audio Format", expected.audio_format, actual.audio_format)?;
    check(name, "Num Channels", expected.channels, actual.channels)?;
    check(name, "Sample Rate", expected.sample_rate, actual.sample_rate)?;
    check(name, "Byte Rate", expected.byte_rate, actual.byte_rate)?;
    check(name, "Block Align", expected.block_align, actual.block_align)?;
    check(name, "Bits Per Sample", expected.bits_per_sample, actual.bits_per_sample)?;
    check_tag(name, "Subchunk2 ID", &expected.subchunk2_id, &actual.subchunk2_id)?;
    check(name, "Subchunk2 Size", expected.data_size, actual.data_size)?;

    debug!(file = name, data_size = actual.data_size, "Verified WAVE header");
    Ok(actual)
}

/// Appends `samples` to an existing WAVE file in place.
///
/// The header is verified in full, the stream must hold every data byte
/// the header declares, and the new size is checked, all before any
/// write. On error the stream's bytes are unchanged.
///
/// # Arguments
///
/// * `stream` - A file previously written by [`create`], open for read and write
/// * `samples` - Mono 16-bit samples to add after the existing data
/// * `sample_rate` - Must equal the sample rate in the existing header
///
/// # Returns
///
/// The size in bytes of the data sub-chunk after the append.
///
/// # Example
///
/// ```ignore
/// use wavetone::audio::{append, ByteStream};
///
/// let file = OpenOptions::new().read(true).write(true).open("tone.wav")?;
/// let mut stream = ByteStream::new(file, "tone.wav");
/// let data_size = append(&mut stream, &[0, 1200, -1200], 44100)?;
/// ```
pub fn append<S: Read + Write + Seek>(
    stream: &mut ByteStream<S>,
    samples: &[i16],
    sample_rate: u32,
) -> Result<u32> {
    let header = verify_header(stream, sample_rate)?;
    let previous = header.data_size;

    let added = samples.len() as u64 * u64::from(BLOCK_ALIGN);
    let data_size = u64::from(previous) + added;
    if data_size > u64::from(MAX_DATA_SIZE) {
        return Err(SoundError::data_too_large(stream.name(), data_size));
    }
    let data_size = data_size as u32;

    let data_end = HEADER_LEN + u64::from(previous);
    let len = stream.stream_len()?;
    if len < data_end {
        return Err(SoundError::header_mismatch(
            stream.name(),
            "Subchunk2 Size",
            format!("at most {}", len.saturating_sub(HEADER_LEN)),
            previous,
        ));
    }

    stream.seek_to(CHUNK_SIZE_OFFSET)?;
    stream.write_uint_le((data_size + RIFF_OVERHEAD).into(), 4)?;
    stream.seek_to(DATA_SIZE_OFFSET)?;
    stream.write_uint_le(data_size.into(), 4)?;

    debug!(file = stream.name(), offset = data_end, "Appending samples");
    stream.seek_to(data_end)?;
    write_samples(stream, samples)?;
    stream.flush()?;

    info!(
        file = stream.name(),
        samples = samples.len(),
        data_size,
        "Appended to WAVE file"
    );
    Ok(data_size)
}

/// Encodes samples as consecutive 2-byte little-endian integers.
pub fn encode_samples(samples: &[i16]) -> Vec<u8> {
    let mut bytes = vec![0u8; samples.len() * usize::from(BLOCK_ALIGN)];
    LittleEndian::write_i16_into(samples, &mut bytes);
    bytes
}

fn write_samples<W: Write>(stream: &mut ByteStream<W>, samples: &[i16]) -> Result<()> {
    stream.write_bytes(&encode_samples(samples))
}

fn check<T>(target: &str, field: &str, expected: T, actual: T) -> Result<()>
where
    T: PartialEq + fmt::Display,
{
    if expected == actual {
        Ok(())
    } else {
        Err(SoundError::header_mismatch(target, field, expected, actual))
    }
}

fn check_tag(
    target: &str,
    field: &str,
    expected: &[u8; TAG_LEN],
    actual: &[u8; TAG_LEN],
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SoundError::header_mismatch(target, field, Tag(expected), Tag(actual)))
    }
}
