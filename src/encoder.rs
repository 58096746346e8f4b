use std::io::Write;

use crate::errors::Result;
use crate::jsontypes::RawSourceMap;
use crate::types::SourceMap;

fn as_raw(sm: &SourceMap) -> RawSourceMap {
    let mut have_contents = false;
    let mut sources = Vec::with_capacity(sm.sources().len());
    let mut contents = Vec::with_capacity(sm.sources().len());
    for source in sm.sources() {
        if source.content.is_some() {
            have_contents = true;
        }
        sources.push(source.url.clone());
        contents.push(source.content.clone());
    }
    RawSourceMap {
        version: sm.get_version(),
        file: sm.get_file().map(str::to_owned),
        source_root: sm.get_source_root().map(str::to_owned),
        sources,
        // the parallel array is only worth emitting if something is in it
        sources_content: have_contents.then_some(contents),
        names: sm.names().to_vec(),
        mappings: sm.get_mappings().to_string(),
    }
}

impl SourceMap {
    /// Writes the source map as JSON.
    ///
    /// A stale packed `mappings` string is regenerated from the segment
    /// table first.  With `continue_on_error` set, segments referencing
    /// out of range source or name indices are written out unchanged,
    /// which is what you want when round-tripping maps you did not build
    /// yourself; with it clear they fail the encode, which catches bugs
    /// when generating maps from scratch.
    pub fn to_writer<W: Write>(&mut self, w: W, continue_on_error: bool) -> Result<()> {
        self.regenerate_mappings(!continue_on_error)?;
        serde_json::to_writer(w, &as_raw(self))?;
        Ok(())
    }

    /// Encodes the source map as a JSON string.  See `to_writer`.
    pub fn to_json(&mut self, continue_on_error: bool) -> Result<String> {
        self.regenerate_mappings(!continue_on_error)?;
        Ok(serde_json::to_string(&as_raw(self))?)
    }
}
