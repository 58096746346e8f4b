use srcmap::{Error, SourceMap};

#[test]
fn test_basic_sourcemap() {
    let input: &[_] = br#"{
        "version": 3,
        "file": "min.js",
        "sourceRoot": "/static",
        "sources": ["coolstuff.js"],
        "names": ["x", "alert"],
        "mappings": "AAAA,GAAIA,GAAI,EACR,IAAIA,GAAK,EAAG,CACVC,MAAM"
    }"#;
    let mut sm = SourceMap::from_reader(input).unwrap();
    assert_eq!(sm.get_version(), 3);
    assert_eq!(sm.get_file(), Some("min.js"));
    assert_eq!(sm.get_source_root(), Some("/static"));
    assert_eq!(sm.sources().len(), 1);
    assert_eq!(sm.get_source(0).unwrap().url, "coolstuff.js");
    assert_eq!(sm.get_source(0).unwrap().content, None);
    assert_eq!(sm.names(), ["x", "alert"]);
    assert!(!sm.segments().unwrap().is_empty());
}

#[test]
fn test_sources_content_zip() {
    let input: &[_] = br#"{
        "version": 3,
        "sources": ["a.js", "b.js"],
        "sourcesContent": ["var a;", null],
        "names": [],
        "mappings": ""
    }"#;
    let sm = SourceMap::from_slice(input).unwrap();
    assert_eq!(sm.get_source(0).unwrap().content.as_deref(), Some("var a;"));
    assert_eq!(sm.get_source(1).unwrap().content, None);
}

#[test]
fn test_bad_version() {
    let input: &[_] = br#"{
        "version": 2,
        "sources": [],
        "names": [],
        "mappings": ""
    }"#;
    match SourceMap::from_slice(input) {
        Err(Error::UnsupportedVersion(version)) => assert_eq!(version, 2),
        e => panic!("unexpected result: {e:?}"),
    }
}

#[test]
fn test_inconsistent_sources_content() {
    let input: &[_] = br#"{
        "version": 3,
        "sources": ["a.js", "b.js"],
        "sourcesContent": ["var a;"],
        "names": [],
        "mappings": ""
    }"#;
    match SourceMap::from_slice(input) {
        Err(Error::InconsistentSources {
            sources,
            sources_content,
        }) => {
            assert_eq!(sources, 2);
            assert_eq!(sources_content, 1);
        }
        e => panic!("unexpected result: {e:?}"),
    }
}

#[test]
fn test_missing_mandatory_field() {
    let input: &[_] = br#"{"version": 3, "sources": [], "names": []}"#;
    assert!(matches!(
        SourceMap::from_slice(input),
        Err(Error::BadJson(_))
    ));
}

#[test]
fn test_mappings_decoded_lazily() {
    let input: &[_] = br#"{
        "version": 3,
        "sources": [],
        "names": [],
        "mappings": "this is not a mapping"
    }"#;
    // the envelope is fine, so loading succeeds
    let mut sm = SourceMap::from_slice(input).unwrap();
    // the rot only surfaces when the segments are needed
    assert!(matches!(sm.segments(), Err(Error::InvalidBase64(' '))));
}

#[test]
fn test_empty_mappings() {
    let input: &[_] = br#"{
        "version": 3,
        "sources": [],
        "names": [],
        "mappings": ""
    }"#;
    let mut sm = SourceMap::from_slice(input).unwrap();
    assert!(sm.segments().unwrap().is_empty());
    assert_eq!(sm.lookup(0, 0, None).unwrap(), None);
}
