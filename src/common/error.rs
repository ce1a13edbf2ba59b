use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum QrError {
    /// Reserved for API completeness; the pipeline treats empty input as a
    /// valid zero-length byte mode payload rather than rejecting it.
    EmptyNotAllowed,
    /// The input requires an encoding mode this crate does not implement (Kanji).
    UnsupportedMode,
    /// No version from 1 to 40 has enough capacity for the assembled bit stream.
    DataTooLong,
    /// An explicit version was requested but cannot hold the data at the given ECC level.
    VersionCapacityExceeded,
    /// A caller-supplied parameter is out of range (quiet zone, version, BOM/ECI combination).
    InvalidArgument(&'static str),
    /// An invariant internal to the encoding pipeline was violated; should be unreachable.
    Internal(&'static str),
}

impl Display for QrError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Self::EmptyNotAllowed => f.write_str("empty data is not allowed"),
            Self::UnsupportedMode => f.write_str("requested encoding mode is not supported"),
            Self::DataTooLong => f.write_str("data does not fit in any version 1-40 symbol"),
            Self::VersionCapacityExceeded => {
                f.write_str("data does not fit in the requested version at this ECC level")
            }
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Internal(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for QrError {}

pub type QrResult<T> = Result<T, QrError>;
