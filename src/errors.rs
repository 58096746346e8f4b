use std::error;
use std::fmt;
use std::io;

/// Represents results from this library
pub type Result<T> = std::result::Result<T, Error>;

/// Represents different failure cases
#[derive(Debug)]
pub enum Error {
    /// a std::io error
    Io(io::Error),
    /// a JSON parsing related failure
    BadJson(serde_json::Error),
    /// the `version` field of the envelope is not the supported version 3
    UnsupportedVersion(u32),
    /// `sources` and `sourcesContent` have different lengths
    InconsistentSources {
        /// number of entries in `sources`
        sources: usize,
        /// number of entries in `sourcesContent`
        sources_content: usize,
    },
    /// a mapping contained a character outside the base64 alphabet
    InvalidBase64(char),
    /// a VLQ run ended mid-integer or overflowed 32 bits
    VlqUnterminated {
        /// the string that failed to decode
        vlq: String,
        /// the values successfully decoded before the failure
        values: Vec<i32>,
    },
    /// a mapping segment decoded to a field count other than 1, 4 or 5
    BadSegmentSize(Vec<i32>),
    /// a segment referenced a source index past the end of `sources`
    BadSourceReference {
        /// the offending index
        index: i32,
        /// the number of sources in the map
        count: usize,
    },
    /// a segment referenced a name index past the end of `names`
    BadNameReference {
        /// the offending index
        index: i32,
        /// the number of names in the map
        count: usize,
    },
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::BadJson(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::BadJson(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{err}"),
            Error::BadJson(err) => write!(f, "bad json: {err}"),
            Error::UnsupportedVersion(version) => {
                write!(f, "got version {version}, can only handle version 3")
            }
            Error::InconsistentSources {
                sources,
                sources_content,
            } => write!(
                f,
                "inconsistent source map, {sources} sources but {sources_content} sourcesContent"
            ),
            Error::InvalidBase64(c) => write!(f, "invalid base64 character {c:?}"),
            Error::VlqUnterminated { vlq, values } => write!(
                f,
                "cannot decode vlq string {vlq:?}, got {values:?} before failure"
            ),
            Error::BadSegmentSize(values) => write!(
                f,
                "got {} numbers in a segment, expected 1, 4 or 5",
                values.len()
            ),
            Error::BadSourceReference { index, count } => {
                write!(f, "bad reference to source #{index}, map has {count} sources")
            }
            Error::BadNameReference { index, count } => {
                write!(f, "bad reference to name #{index}, map has {count} names")
            }
        }
    }
}
