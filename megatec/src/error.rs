//! Error types for the Megatec Q1 protocol.

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the HID transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HID backend could not be initialized or no matching device
    /// is present.
    #[error("failed to open UPS device {vendor_id:04x}:{product_id:04x}: {message}")]
    OpenFailed {
        vendor_id: u16,
        product_id: u16,
        message: String,
    },

    /// The command write failed or was truncated.
    #[error("command write failed ({written} of {expected} bytes): {message}")]
    WriteFailed {
        written: usize,
        expected: usize,
        message: String,
    },

    /// A read elapsed without the device producing any data.
    #[error("no response from UPS within {timeout_ms}ms")]
    ReadTimeout { timeout_ms: u64 },

    /// A read failed outright.
    #[error("failed to read UPS response: {message}")]
    ReadFailed { message: String },
}

/// Violations of the framing rules during response assembly.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The response grew past the configured cap without a terminator.
    #[error("UPS response exceeded {max_total_bytes} bytes without a terminator")]
    BufferOverflow { max_total_bytes: usize },
}

/// Failures decoding an assembled status line.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The status line is not valid UTF-8.
    #[error("UPS status line is not valid UTF-8")]
    NotText(#[from] std::str::Utf8Error),

    /// The status line does not start with `(`.
    #[error("unexpected status line header")]
    MissingHeader,

    /// The status line does not end with `)`.
    #[error("unexpected status line trailer")]
    MissingTrailer,

    /// The wrong number of fields, or a field that failed to parse.
    /// `parsed_count` is how many fields were consumed before the
    /// mismatch, out of the expected eight.
    #[error("malformed status line ({parsed_count} of 8 fields parsed)")]
    MalformedMessage { parsed_count: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
