use srcmap::{Segment, Source, SourceMap, SourcePos, UnpackedSourceMap};

fn test_map() -> SourceMap {
    let mut sm = SourceMap::new();
    sm.set_sources(vec![Source::remote("source1.css")]);
    sm.set_names(vec!["Name1".to_string()]);
    sm
}

#[test]
fn test_lookup_picks_covering_segment() {
    let mut sm = test_map();
    sm.set_segments(vec![vec![
        Segment::new(0, Some(SourcePos::new(0, 1, 0))),
        Segment::new(10, Some(SourcePos::new(0, 2, 0))),
        Segment::new(20, Some(SourcePos::new(0, 3, 0))),
    ]]);

    let seg = sm.lookup(0, 0, None).unwrap().unwrap();
    assert_eq!(seg.source_pos.unwrap().line, 1);
    let seg = sm.lookup(0, 9, None).unwrap().unwrap();
    assert_eq!(seg.source_pos.unwrap().line, 1);
    let seg = sm.lookup(0, 10, None).unwrap().unwrap();
    assert_eq!(seg.source_pos.unwrap().line, 2);
    let seg = sm.lookup(0, 5000, None).unwrap().unwrap();
    assert_eq!(seg.source_pos.unwrap().line, 3);
}

#[test]
fn test_lookup_boundaries() {
    let mut sm = test_map();
    sm.set_segments(vec![
        vec![],
        vec![Segment::new(4, Some(SourcePos::new(0, 0, 0)))],
    ]);

    // empty line
    assert_eq!(sm.lookup(0, 0, None).unwrap(), None);
    // before the first segment of the line
    assert_eq!(sm.lookup(1, 3, None).unwrap(), None);
    // line past the end of the table
    assert_eq!(sm.lookup(2, 0, None).unwrap(), None);
    assert_eq!(sm.lookup(900, 0, None).unwrap(), None);
}

#[test]
fn test_lookup_duplicate_first_column_last_wins() {
    let mut sm = test_map();
    sm.set_segments(vec![vec![
        Segment::new(5, Some(SourcePos::new(0, 1, 0))),
        Segment::new(5, Some(SourcePos::new(0, 2, 0))),
    ]]);

    let seg = sm.lookup(0, 5, None).unwrap().unwrap();
    assert_eq!(seg.source_pos.unwrap().line, 2);
}

#[test]
fn test_invalid_name_is_cleared_source_kept() {
    let mut sm = test_map();
    sm.set_segments(vec![vec![Segment::new(
        0,
        Some(SourcePos::with_name(0, 4, 12, 1)),
    )]]);

    let seg = sm.lookup(0, 3, None).unwrap().unwrap();
    let pos = seg.source_pos.unwrap();
    assert_eq!(pos.name, None);
    assert_eq!((pos.source, pos.line, pos.column), (0, 4, 12));
}

#[test]
fn test_invalid_source_replaced_by_default_fallback() {
    let mut sm = test_map();
    sm.set_segments(vec![vec![Segment::new(0, Some(SourcePos::new(1, 4, 12)))]]);

    let seg = sm.lookup(0, 3, None).unwrap().unwrap();
    assert_eq!(seg.source_pos, None);
    assert_eq!(seg.first_column, 0);
}

#[test]
fn test_invalid_source_replaced_by_given_fallback() {
    let mut sm = test_map();
    sm.set_segments(vec![vec![Segment::new(0, Some(SourcePos::new(1, 4, 12)))]]);

    let fallback = SourcePos::new(0, 0, 0);
    let seg = sm.lookup(0, 3, Some(fallback)).unwrap().unwrap();
    assert_eq!(seg.source_pos, Some(fallback));
}

#[test]
fn test_valid_indices_unchanged() {
    let mut sm = test_map();
    let pos = SourcePos::with_name(0, 4, 12, 0);
    sm.set_segments(vec![vec![Segment::new(0, Some(pos))]]);

    let seg = sm.lookup(0, 3, None).unwrap().unwrap();
    assert_eq!(seg.source_pos, Some(pos));
}

#[test]
fn test_unmapped_segment_survives_lookup() {
    let mut sm = test_map();
    sm.set_segments(vec![vec![Segment::new(2, None)]]);

    let seg = sm.lookup(0, 8, None).unwrap().unwrap();
    assert_eq!(seg, Segment::new(2, None));
}

#[test]
fn test_unpacked_map_lookup() {
    let mut sm = test_map();
    sm.set_segments(vec![vec![
        Segment::new(0, None),
        Segment::new(8, Some(SourcePos::with_name(0, 4, 12, 7))),
    ]]);

    let unpacked = UnpackedSourceMap::new(sm).unwrap();
    let seg = unpacked.lookup(0, 12, None).unwrap();
    let pos = seg.source_pos.unwrap();
    // out of range name cleared here too
    assert_eq!(pos.name, None);
    assert_eq!(pos.source, 0);
    assert_eq!(unpacked.lookup(3, 0, None), None);
}

#[test]
fn test_unpacked_map_description() {
    let mut sm = test_map();
    sm.set_segments(vec![
        vec![Segment::new(0, Some(SourcePos::new(0, 4, 12)))],
        vec![],
    ]);

    let unpacked = UnpackedSourceMap::new(sm).unwrap();
    let description = unpacked.segments_description();
    assert!(description.starts_with("line=0 "));
    assert!(description.contains("line=1"));
    assert!(description.contains("0:4:12"));
}
