use std::fmt;

/// Custom error types for the track-to-frames pipeline
#[derive(Debug)]
pub enum FramerError {
    /// I/O errors
    Io(std::io::Error),
    /// Input bytes are not valid UTF-8 text
    Encoding(std::str::Utf8Error),
    /// Malformed track document
    Parse(String),
    /// A point sequence that must be non-empty was empty
    EmptySequence,
    /// CSV header does not match the expected column schema
    Schema(String),
    /// A CSV field could not be coerced to its numeric/temporal type
    FieldFormat { column: String, value: String },
    /// A point has no timestamp and cannot be synchronized to a frame
    MissingTimestamp { point_id: u32 },
    /// Target frame index is negative or beyond the end of the stream
    SeekOutOfRange { index: i64, frame_count: u64 },
    /// Frame rate reported by the stream is unusable (zero, negative, NaN)
    InvalidFrameRate(f64),
    /// Image container cannot carry the geolocation metadata block
    UnsupportedImageFormat(String),
    /// Video open/decode failure
    Video(String),
    /// Output write error with context
    Export(String),
}

impl fmt::Display for FramerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramerError::Io(err) => write!(f, "I/O error: {}", err),
            FramerError::Encoding(err) => write!(f, "Encoding error: {}", err),
            FramerError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FramerError::EmptySequence => write!(f, "Track contains no points"),
            FramerError::Schema(msg) => write!(f, "Schema error: {}", msg),
            FramerError::FieldFormat { column, value } => {
                write!(
                    f,
                    "Field format error: column '{}' has unparsable value '{}'",
                    column, value
                )
            }
            FramerError::MissingTimestamp { point_id } => {
                write!(f, "Point {} has no timestamp", point_id)
            }
            FramerError::SeekOutOfRange { index, frame_count } => {
                write!(
                    f,
                    "Frame index {} out of range (stream has {} frames)",
                    index, frame_count
                )
            }
            FramerError::InvalidFrameRate(fps) => write!(f, "Invalid frame rate: {}", fps),
            FramerError::UnsupportedImageFormat(msg) => {
                write!(f, "Unsupported image format: {}", msg)
            }
            FramerError::Video(msg) => write!(f, "Video error: {}", msg),
            FramerError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for FramerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FramerError::Io(err) => Some(err),
            FramerError::Encoding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FramerError {
    fn from(err: std::io::Error) -> Self {
        FramerError::Io(err)
    }
}

impl From<std::str::Utf8Error> for FramerError {
    fn from(err: std::str::Utf8Error) -> Self {
        FramerError::Encoding(err)
    }
}

impl From<csv::Error> for FramerError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => FramerError::Export(err.to_string()),
            _ => FramerError::Schema(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for FramerError {
    fn from(err: anyhow::Error) -> Self {
        FramerError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FramerError>;
