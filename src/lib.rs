//! This library implements decoding, querying and re-encoding of
//! JavaScript style source maps (format version 3).
//!
//! ## Basic Operation
//!
//! Source maps are loaded from JSON documents.  The outer envelope is
//! parsed with `serde`; the packed `mappings` string is unpacked lazily
//! the first time segments are needed.
//!
//! ```rust
//! use srcmap::SourceMap;
//! let input: &[_] = b"{
//!     \"version\":3,
//!     \"sources\":[\"coolstuff.js\"],
//!     \"names\":[\"x\",\"alert\"],
//!     \"mappings\":\"AAAA,GAAIA,GAAI,EACR,IAAIA,GAAK,EAAG,CACVC,MAAM\"
//! }";
//! let mut sm = SourceMap::from_reader(input).unwrap();
//! let segment = sm.lookup(0, 4, None).unwrap().unwrap();
//! println!("segment: {}", segment);
//! ```
//!
//! Real-world maps are frequently corrupt in small ways, most commonly
//! stale indices into `sources` or `names`.  Structural corruption of the
//! mappings string fails the decode, but out of range indices do not:
//! lookups clear an invalid name reference and substitute a caller-chosen
//! fallback for an invalid source reference, so one bad segment never
//! poisons the rest of the map.
//!
//! For concurrent read-only queries, freeze a decoded map into an
//! [`UnpackedSourceMap`] and share that.

pub use crate::decoder::{decode, decode_slice};
pub use crate::errors::{Error, Result};
pub use crate::types::{Segment, Source, SourceMap, SourcePos, UnpackedSourceMap};

mod decoder;
mod encoder;
mod errors;
mod jsontypes;
mod mappings;
mod types;
mod vlq;

#[doc(hidden)]
pub mod internals {
    pub use crate::mappings::{decode_mappings, encode_mappings, DeltaState};
    pub use crate::vlq::{decode_vlq_segment, encode_vlq, encode_vlq_segment};
}
