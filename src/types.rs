use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Read;

use crate::decoder::decode;
use crate::errors::Result;
use crate::mappings::{decode_mappings, encode_mappings};

/// An original source referred to from a source map.
///
/// `content` carries the source text when it is embedded inline in the
/// map; otherwise the text has to be fetched from `url`.  Sources have no
/// identity beyond their position in the owning map's source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// location of the source
    pub url: String,
    /// inline copy of the source text, if the map embeds one
    pub content: Option<String>,
}

impl Source {
    /// A source that has to be fetched from its URL.
    pub fn remote(url: impl Into<String>) -> Source {
        Source {
            url: url.into(),
            content: None,
        }
    }

    /// A source whose text is embedded in the map.
    pub fn inline(url: impl Into<String>, content: impl Into<String>) -> Source {
        Source {
            url: url.into(),
            content: Some(content.into()),
        }
    }
}

/// A position in an original source: source index, 0-based line and
/// column, and an optional index into the map's name list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePos {
    /// 0-based index into the map's sources
    pub source: i32,
    /// 0-based line in the source
    pub line: i32,
    /// 0-based column on `line`
    pub column: i32,
    /// 0-based index into the map's names, if the segment has one
    pub name: Option<i32>,
}

impl SourcePos {
    pub fn new(source: i32, line: i32, column: i32) -> SourcePos {
        SourcePos {
            source,
            line,
            column,
            name: None,
        }
    }

    pub fn with_name(source: i32, line: i32, column: i32, name: i32) -> SourcePos {
        SourcePos {
            source,
            line,
            column,
            name: Some(name),
        }
    }

    /// This position without its name reference.
    pub fn without_name(self) -> SourcePos {
        SourcePos { name: None, ..self }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)?;
        if let Some(name) = self.name {
            write!(f, " name={name}")?;
        }
        Ok(())
    }
}

/// One column range on a single generated line, mapped to a source
/// position or explicitly unmapped.
///
/// `last_column` is advisory: the wire format only stores the first
/// column, and a segment runs until the start of the next one on its
/// line.  Decoding fills it in where a next segment exists and leaves it
/// `None` for the final segment on a line.  It takes no part in equality
/// or hashing.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// 0-based first generated column covered by the segment
    pub first_column: i32,
    /// 0-based last generated column (inclusive), when known
    pub last_column: Option<i32>,
    /// where the range came from, or `None` for an unmapped range
    pub source_pos: Option<SourcePos>,
}

impl Segment {
    pub fn new(first_column: i32, source_pos: Option<SourcePos>) -> Segment {
        Segment {
            first_column,
            last_column: None,
            source_pos,
        }
    }

    /// This segment with `source_pos` replaced.
    pub fn with_source_pos(self, source_pos: Option<SourcePos>) -> Segment {
        Segment { source_pos, ..self }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Segment) -> bool {
        // last_column is derived, not canonical data
        self.first_column == other.first_column && self.source_pos == other.source_pos
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first_column.hash(state);
        self.source_pos.hash(state);
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.last_column {
            Some(last) => write!(f, "cols={}..={}", self.first_column, last)?,
            None => write!(f, "cols={}..", self.first_column)?,
        }
        match &self.source_pos {
            Some(pos) => write!(f, " -> {pos}"),
            None => write!(f, " unmapped"),
        }
    }
}

/// Represents a source map in memory.
///
/// Owns the outer envelope fields plus the packed `mappings` string.  The
/// decoded segment table is a cache, materialized on first use; replacing
/// the segments or resizing `sources`/`names` marks the packed string
/// stale, and it is regenerated on the next encode.
#[derive(Debug)]
pub struct SourceMap {
    version: u32,
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<Source>,
    names: Vec<String>,
    mappings: String,
    segments: Option<Vec<Vec<Segment>>>,
    mappings_valid: bool,
}

impl SourceMap {
    /// Creates an empty version 3 source map.
    pub fn new() -> SourceMap {
        SourceMap {
            version: 3,
            file: None,
            source_root: None,
            sources: vec![],
            names: vec![],
            mappings: String::new(),
            segments: None,
            mappings_valid: true,
        }
    }

    /// Reads a source map from a JSON stream in UTF-8 format.
    ///
    /// ```rust
    /// use srcmap::SourceMap;
    /// let input: &[_] = b"{
    ///     \"version\":3,
    ///     \"sources\":[\"coolstuff.js\"],
    ///     \"names\":[\"x\",\"alert\"],
    ///     \"mappings\":\"AAAA,GAAIA,GAAI,EACR,IAAIA,GAAK,EAAG,CACVC,MAAM\"
    /// }";
    /// let sm = SourceMap::from_reader(input).unwrap();
    /// ```
    pub fn from_reader<R: Read>(rdr: R) -> Result<SourceMap> {
        decode(rdr)
    }

    /// Reads a source map from a JSON byte slice.
    pub fn from_slice(slice: &[u8]) -> Result<SourceMap> {
        crate::decoder::decode_slice(slice)
    }

    /// Returns the version of the source map.
    pub fn get_version(&self) -> u32 {
        self.version
    }

    /// Returns the embedded filename in case there is one.
    pub fn get_file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Sets a new value for the file.
    pub fn set_file(&mut self, value: Option<String>) {
        self.file = value;
    }

    /// Returns the source root in case there is one.
    pub fn get_source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// Sets a new value for the source root.
    pub fn set_source_root(&mut self, value: Option<String>) {
        self.source_root = value;
    }

    /// Returns the sources of the map.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Looks up a source for a specific index.
    pub fn get_source(&self, idx: u32) -> Option<&Source> {
        self.sources.get(idx as usize)
    }

    /// Replaces the source list.
    ///
    /// Changing the number of sources invalidates the packed mappings
    /// kept alongside a modified segment table.
    pub fn set_sources(&mut self, sources: Vec<Source>) {
        if sources.len() != self.sources.len() {
            self.mappings_valid = false;
        }
        self.sources = sources;
    }

    /// Appends a source, returning its index.
    pub fn add_source(&mut self, source: Source) -> u32 {
        self.sources.push(source);
        self.mappings_valid = false;
        self.sources.len() as u32 - 1
    }

    /// Returns the names of the map.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks up a name for a specific index.
    pub fn get_name(&self, idx: u32) -> Option<&str> {
        self.names.get(idx as usize).map(|x| &x[..])
    }

    /// Replaces the name list.  See `set_sources` for the caching rules.
    pub fn set_names(&mut self, names: Vec<String>) {
        if names.len() != self.names.len() {
            self.mappings_valid = false;
        }
        self.names = names;
    }

    /// Appends a name, returning its index.
    pub fn add_name(&mut self, name: String) -> u32 {
        self.names.push(name);
        self.mappings_valid = false;
        self.names.len() as u32 - 1
    }

    /// Returns the packed `mappings` string.
    ///
    /// May be stale if segments were replaced or `sources`/`names` resized
    /// since the map was decoded; encoding regenerates it first.
    pub fn get_mappings(&self) -> &str {
        &self.mappings
    }

    /// Replaces the packed `mappings` string, dropping any decoded
    /// segment table derived from the old one.
    pub fn set_mappings(&mut self, mappings: String) {
        self.mappings = mappings;
        self.segments = None;
        self.mappings_valid = true;
    }

    /// One list of segments for every line in the generated file.
    ///
    /// Decodes the packed mappings on first use and caches the result.
    /// Fails only on structural corruption; out of range source or name
    /// indices are kept as decoded.
    pub fn segments(&mut self) -> Result<&[Vec<Segment>]> {
        self.materialize_segments()?;
        Ok(self.segments.as_deref().unwrap_or_default())
    }

    /// Replaces the segment table.  No validation against `sources` or
    /// `names`; the packed string is regenerated on the next encode.
    pub fn set_segments(&mut self, segments: Vec<Vec<Segment>>) {
        self.segments = Some(segments);
        self.mappings_valid = false;
    }

    /// Maps a generated position to the segment covering it.
    ///
    /// Returns the segment with the greatest `first_column` at or before
    /// `column` on `line`, or `None` when the line is out of range, has
    /// no segments, or `column` lies before its first segment.  A
    /// matched segment with an out of range name index comes back with
    /// the name cleared; one with an out of range source index comes
    /// back with `invalid_source_pos` (default unmapped) in place of its
    /// source position.
    pub fn lookup(
        &mut self,
        line: u32,
        column: u32,
        invalid_source_pos: Option<SourcePos>,
    ) -> Result<Option<Segment>> {
        self.materialize_segments()?;
        Ok(lookup_segment(
            self.segments.as_deref().unwrap_or_default(),
            self.sources.len(),
            self.names.len(),
            line,
            column,
            invalid_source_pos,
        ))
    }

    fn materialize_segments(&mut self) -> Result<()> {
        if self.segments.is_none() {
            self.segments = Some(decode_mappings(&self.mappings)?);
        }
        Ok(())
    }

    /// Regenerates the packed string from the segment table if it is
    /// stale.  With `check_references` set, segments holding out of range
    /// indices fail the encode instead of passing through.
    pub(crate) fn regenerate_mappings(&mut self, check_references: bool) -> Result<()> {
        if self.mappings_valid {
            return Ok(());
        }
        self.materialize_segments()?;
        let bounds = check_references.then(|| (self.sources.len(), self.names.len()));
        self.mappings = encode_mappings(self.segments.as_deref().unwrap_or_default(), bounds)?;
        self.mappings_valid = true;
        Ok(())
    }
}

impl Default for SourceMap {
    fn default() -> SourceMap {
        SourceMap::new()
    }
}

/// A source map frozen together with its decoded segment table.
///
/// Decoding happens once, up front; afterwards the value is immutable and
/// queries take `&self`, so a single instance can be shared across
/// threads behind an `Arc`.
#[derive(Debug)]
pub struct UnpackedSourceMap {
    map: SourceMap,
    segments: Vec<Vec<Segment>>,
}

impl UnpackedSourceMap {
    /// Decodes the map's segment table and freezes both.
    pub fn new(mut map: SourceMap) -> Result<UnpackedSourceMap> {
        let segments = map.segments()?.to_vec();
        Ok(UnpackedSourceMap { map, segments })
    }

    /// The underlying source map.
    pub fn map(&self) -> &SourceMap {
        &self.map
    }

    /// The decoded segment table.
    pub fn segments(&self) -> &[Vec<Segment>] {
        &self.segments
    }

    /// Maps a generated position to the segment covering it.
    ///
    /// Same behavior as `SourceMap::lookup` without the lazy decode.
    pub fn lookup(
        &self,
        line: u32,
        column: u32,
        invalid_source_pos: Option<SourcePos>,
    ) -> Option<Segment> {
        lookup_segment(
            &self.segments,
            self.map.sources().len(),
            self.map.names().len(),
            line,
            column,
            invalid_source_pos,
        )
    }

    /// A formatted multi-line description of the segment table.
    pub fn segments_description(&self) -> String {
        let mut lines = vec![];
        for (line_index, line) in self.segments.iter().enumerate() {
            let intro = format!("line={line_index} ");
            if line.is_empty() {
                lines.push(intro.trim_end().to_string());
                continue;
            }
            let pad = " ".repeat(intro.len());
            for (segment_index, segment) in line.iter().enumerate() {
                let prefix = if segment_index == 0 { &intro } else { &pad };
                lines.push(format!("{prefix}{segment}"));
            }
        }
        lines.join("\n")
    }
}

fn lookup_segment(
    segments: &[Vec<Segment>],
    sources_len: usize,
    names_len: usize,
    line: u32,
    column: u32,
    invalid_source_pos: Option<SourcePos>,
) -> Option<Segment> {
    let line_segments = segments.get(line as usize)?;
    let first = line_segments.first()?;
    if i64::from(column) < i64::from(first.first_column) {
        return None;
    }

    // last segment starting at or before the column; lines rarely hold
    // enough segments to make a binary search worthwhile
    let mut found = first;
    for segment in &line_segments[1..] {
        if i64::from(column) < i64::from(segment.first_column) {
            break;
        }
        found = segment;
    }

    let mut segment = *found;
    if let Some(pos) = segment.source_pos {
        if let Some(name) = pos.name {
            if i64::from(name) >= names_len as i64 {
                segment.source_pos = Some(pos.without_name());
            }
        }
    }
    if let Some(pos) = segment.source_pos {
        if i64::from(pos.source) >= sources_len as i64 {
            segment.source_pos = invalid_source_pos;
        }
    }
    Some(segment)
}
