use std::io::{BufReader, Read};

use crate::errors::{Error, Result};
use crate::jsontypes::RawSourceMap;
use crate::types::{Source, SourceMap};

/// Decodes a source map from a reader over a JSON stream.
///
/// Only the envelope is decoded here; the `mappings` string is unpacked
/// lazily the first time the segments are needed, since that is the
/// expensive part and not every use needs it.
pub fn decode<R: Read>(rdr: R) -> Result<SourceMap> {
    let mut rdr = BufReader::new(rdr);
    let rsm: RawSourceMap = serde_json::from_reader(&mut rdr)?;
    decode_common(rsm)
}

/// Decodes a source map from a JSON byte slice.
pub fn decode_slice(slice: &[u8]) -> Result<SourceMap> {
    let rsm: RawSourceMap = serde_json::from_slice(slice)?;
    decode_common(rsm)
}

fn decode_common(rsm: RawSourceMap) -> Result<SourceMap> {
    if rsm.version != 3 {
        return Err(Error::UnsupportedVersion(rsm.version));
    }

    let sources = match rsm.sources_content {
        Some(contents) => {
            if contents.len() != rsm.sources.len() {
                return Err(Error::InconsistentSources {
                    sources: rsm.sources.len(),
                    sources_content: contents.len(),
                });
            }
            rsm.sources
                .into_iter()
                .zip(contents)
                .map(|(url, content)| Source { url, content })
                .collect()
        }
        None => rsm.sources.into_iter().map(Source::remote).collect(),
    };

    let mut sm = SourceMap::new();
    sm.set_file(rsm.file);
    sm.set_source_root(rsm.source_root);
    sm.set_sources(sources);
    sm.set_names(rsm.names);
    sm.set_mappings(rsm.mappings);
    Ok(sm)
}
