//! Packing and unpacking of the `mappings` field.
//!
//! The packed form is one field per segment, fields joined with `,` within
//! a generated line and lines joined with `;`.  Every field is a base64 VLQ
//! run of 1, 4 or 5 numbers, each stored as the difference from a running
//! counter rather than as an absolute value.

use crate::errors::{Error, Result};
use crate::types::{Segment, SourcePos};
use crate::vlq::{decode_vlq_segment, encode_vlq};

/// The five running counters behind the delta coding: generated column,
/// source index, source line, source column, name index.
///
/// All counters start at zero.  Only the generated column restarts on a new
/// line; the other four persist across line boundaries.
#[derive(Debug, Default)]
pub struct DeltaState {
    counters: [i32; 5],
}

impl DeltaState {
    pub fn new() -> DeltaState {
        DeltaState::default()
    }

    /// Starts a new generated line, resetting the generated column counter.
    pub fn new_line(&mut self) {
        self.counters[0] = 0;
    }

    /// Converts up to 5 deltas into absolute values in place.
    ///
    /// Wrapping arithmetic so that corrupt deltas cannot panic; a map that
    /// wraps is already garbage but must stay decodable.
    pub fn to_absolute(&mut self, deltas: &mut [i32]) {
        for (counter, delta) in self.counters.iter_mut().zip(deltas.iter_mut()) {
            *counter = counter.wrapping_add(*delta);
            *delta = *counter;
        }
    }

    /// Converts up to 5 absolute values into deltas in place.
    pub fn to_deltas(&mut self, values: &mut [i32]) {
        for (counter, value) in self.counters.iter_mut().zip(values.iter_mut()) {
            let delta = value.wrapping_sub(*counter);
            *counter = *value;
            *value = delta;
        }
    }
}

/// Bounds for the validating encode mode: `(sources len, names len)`.
pub type IndexBounds = (usize, usize);

/// Unpacks a `mappings` string into one segment list per generated line.
///
/// Empty lines are preserved as empty lists.  Structural corruption (bad
/// base64, malformed VLQ, wrong field count) fails the whole decode; out of
/// range source or name indices are passed through untouched.
pub fn decode_mappings(mappings: &str) -> Result<Vec<Vec<Segment>>> {
    if mappings.is_empty() {
        return Ok(vec![]);
    }
    let mut state = DeltaState::new();
    let mut lines = vec![];

    for line in mappings.split(';') {
        state.new_line();
        let mut segments: Vec<Segment> = vec![];

        for field in line.split(',') {
            if field.is_empty() {
                continue;
            }
            let mut values = decode_vlq_segment(field)?;
            if !matches!(values.len(), 1 | 4 | 5) {
                return Err(Error::BadSegmentSize(values));
            }
            state.to_absolute(&mut values);

            let source_pos = match values.len() {
                1 => None,
                4 => Some(SourcePos::new(values[1], values[2], values[3])),
                _ => Some(SourcePos::with_name(
                    values[1], values[2], values[3], values[4],
                )),
            };
            segments.push(Segment::new(values[0], source_pos));
        }

        // every segment runs up to the start of the next one; the last
        // segment's extent is unknown
        for i in 1..segments.len() {
            segments[i - 1].last_column = Some(segments[i].first_column.wrapping_sub(1));
        }
        lines.push(segments);
    }
    Ok(lines)
}

/// Packs segment lists back into a `mappings` string.
///
/// With `bounds` set, any segment referencing a source or name index at or
/// past the bound fails with `BadSourceReference`/`BadNameReference`.
/// Without it corrupt indices round-trip unchanged, which is the right
/// default for rewriting third-party maps.
pub fn encode_mappings(lines: &[Vec<Segment>], bounds: Option<IndexBounds>) -> Result<String> {
    let mut state = DeltaState::new();
    let mut rv = String::new();

    for (line_index, line) in lines.iter().enumerate() {
        if line_index > 0 {
            rv.push(';');
        }
        state.new_line();

        for (segment_index, segment) in line.iter().enumerate() {
            if segment_index > 0 {
                rv.push(',');
            }
            let mut values = [0i32; 5];
            let mut len = 1;
            values[0] = segment.first_column;

            if let Some(pos) = segment.source_pos {
                if let Some((sources, names)) = bounds {
                    check_bounds(&pos, sources, names)?;
                }
                values[1] = pos.source;
                values[2] = pos.line;
                values[3] = pos.column;
                len = 4;
                if let Some(name) = pos.name {
                    values[4] = name;
                    len = 5;
                }
            }

            state.to_deltas(&mut values[..len]);
            for &delta in &values[..len] {
                encode_vlq(&mut rv, delta);
            }
        }
    }
    Ok(rv)
}

fn check_bounds(pos: &SourcePos, sources: usize, names: usize) -> Result<()> {
    if pos.source as i64 >= sources as i64 {
        return Err(Error::BadSourceReference {
            index: pos.source,
            count: sources,
        });
    }
    if let Some(name) = pos.name {
        if name as i64 >= names as i64 {
            return Err(Error::BadNameReference {
                index: name,
                count: names,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_counter_resets_per_line() {
        let lines = decode_mappings("IAAA;IAAA").unwrap();
        assert_eq!(lines[0][0].first_column, 4);
        assert_eq!(lines[1][0].first_column, 4);
        // the source column counter does not reset
        let pos = lines[1][0].source_pos.unwrap();
        assert_eq!(pos.column, 0);
    }

    #[test]
    fn empty_lines_are_kept() {
        let lines = decode_mappings(";;AAAA").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].is_empty());
        assert!(lines[1].is_empty());
        assert_eq!(lines[2].len(), 1);
    }
}
