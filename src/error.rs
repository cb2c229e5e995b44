//! Error types for wavetone.
//!
//! Every failure in the library is reported as a [`SoundError`] carrying an
//! [`ErrorCode`], so the binary can print one consistent diagnostic.

use std::fmt;

/// Error codes identifying the class of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A configuration value is out of range or malformed.
    /// Trigger: bad duration, amplitude, frequency, overtone count, etc.
    InvalidConfig,

    /// Duration and sample rate combine to more samples than a WAVE file
    /// can describe.
    SampleOverflow,

    /// Reading from the target stream failed.
    ReadFailed,

    /// Writing to the target stream failed.
    WriteFailed,

    /// Seeking within the target stream failed.
    SeekFailed,

    /// The existing file's header does not match what append expects.
    /// Trigger: foreign, truncated or corrupted file, or a sample rate
    /// different from the one being appended.
    HeaderCorrupt,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::SampleOverflow => "SAMPLE_OVERFLOW",
            ErrorCode::ReadFailed => "READ_FAILED",
            ErrorCode::WriteFailed => "WRITE_FAILED",
            ErrorCode::SeekFailed => "SEEK_FAILED",
            ErrorCode::HeaderCorrupt => "HEADER_CORRUPT",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "A configuration value is out of range",
            ErrorCode::SampleOverflow => "The resulting file is too large to represent",
            ErrorCode::ReadFailed => "Read failed",
            ErrorCode::WriteFailed => "Write failed",
            ErrorCode::SeekFailed => "Seek failed",
            ErrorCode::HeaderCorrupt => "The existing WAVE header is not appendable",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "Run with --help to see the accepted ranges",
            ErrorCode::SampleOverflow => "Reduce the duration or the sample rate",
            ErrorCode::ReadFailed | ErrorCode::SeekFailed => {
                "Check that the file exists, is readable and is a regular file"
            }
            ErrorCode::WriteFailed => "Check permissions and available disk space",
            ErrorCode::HeaderCorrupt => {
                "Append only to files previously written by wavetone with the same sample rate"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for synthesis and container operations.
#[derive(Debug)]
pub struct SoundError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SoundError {
    /// Creates a new SoundError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new SoundError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an INVALID_CONFIG error for a value outside its range.
    pub fn out_of_range(
        name: &str,
        value: impl fmt::Display,
        min: impl fmt::Display,
        max: impl fmt::Display,
    ) -> Self {
        Self::new(
            ErrorCode::InvalidConfig,
            format!("{} must be in the range [{}, {}], got {}", name, min, max, value),
        )
    }

    /// Creates an INVALID_CONFIG error with a free-form reason.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, reason)
    }

    /// Creates a SAMPLE_OVERFLOW error for a duration/rate pair.
    pub fn too_many_samples(duration_ms: u32, sample_rate: u32) -> Self {
        Self::new(
            ErrorCode::SampleOverflow,
            format!(
                "Duration of {} ms and sample rate of {} Hz combine to create a file \
                 that is too large to store in WAVE format",
                duration_ms, sample_rate
            ),
        )
    }

    /// Creates a SAMPLE_OVERFLOW error for a data chunk the 32-bit size
    /// fields cannot describe.
    pub fn data_too_large(target: &str, data_bytes: u64) -> Self {
        Self::new(
            ErrorCode::SampleOverflow,
            format!(
                "{}: {} bytes of sample data exceed the WAVE size limit",
                target, data_bytes
            ),
        )
    }

    /// Creates a READ_FAILED error.
    pub fn read_failed(target: &str, source: std::io::Error) -> Self {
        Self::with_source(ErrorCode::ReadFailed, format!("{}: Read failed", target), source)
    }

    /// Creates a WRITE_FAILED error.
    pub fn write_failed(target: &str, source: std::io::Error) -> Self {
        Self::with_source(ErrorCode::WriteFailed, format!("{}: Write failed", target), source)
    }

    /// Creates a SEEK_FAILED error.
    pub fn seek_failed(target: &str, offset: u64, source: std::io::Error) -> Self {
        Self::with_source(
            ErrorCode::SeekFailed,
            format!("{}: Seek to byte {} failed", target, offset),
            source,
        )
    }

    /// Creates a HEADER_CORRUPT error naming the offending field.
    pub fn header_mismatch(
        target: &str,
        field: &str,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::new(
            ErrorCode::HeaderCorrupt,
            format!(
                "{}: {} should be {}, found {}",
                target, field, expected, actual
            ),
        )
    }
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for SoundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using SoundError.
pub type Result<T> = std::result::Result<T, SoundError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn error_code_as_str() {
        assert_eq!(ErrorCode::InvalidConfig.as_str(), "INVALID_CONFIG");
        assert_eq!(ErrorCode::SampleOverflow.as_str(), "SAMPLE_OVERFLOW");
        assert_eq!(ErrorCode::ReadFailed.as_str(), "READ_FAILED");
        assert_eq!(ErrorCode::WriteFailed.as_str(), "WRITE_FAILED");
        assert_eq!(ErrorCode::SeekFailed.as_str(), "SEEK_FAILED");
        assert_eq!(ErrorCode::HeaderCorrupt.as_str(), "HEADER_CORRUPT");
    }

    #[test]
    fn error_code_hints_not_empty() {
        for code in [
            ErrorCode::InvalidConfig,
            ErrorCode::SampleOverflow,
            ErrorCode::ReadFailed,
            ErrorCode::WriteFailed,
            ErrorCode::SeekFailed,
            ErrorCode::HeaderCorrupt,
        ] {
            assert!(!code.recovery_hint().is_empty());
            assert!(!code.description().is_empty());
        }
    }

    #[test]
    fn header_mismatch_names_field_and_values() {
        let err = SoundError::header_mismatch("out.wav", "Sample Rate", 44100, 8000);
        let text = err.to_string();
        assert_eq!(err.code, ErrorCode::HeaderCorrupt);
        assert!(text.contains("HEADER_CORRUPT"));
        assert!(text.contains("out.wav"));
        assert!(text.contains("Sample Rate"));
        assert!(text.contains("44100"));
        assert!(text.contains("8000"));
    }

    #[test]
    fn io_errors_keep_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = SoundError::write_failed("stdout", io);
        assert_eq!(err.code, ErrorCode::WriteFailed);
        assert!(err.to_string().contains("stdout: Write failed"));
        assert!(err.source().is_some());
    }
}
