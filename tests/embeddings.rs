mod common;

use std::{fs, io::Cursor};

use graphify::{
    embeddings::{self, parse, EmbeddingCache, Embeddings, Vocab},
    LinkError,
};
use ndarray::array;

#[test]
fn parses_word2vec_text() {
    let embeddings = parse(Cursor::new("2 3\na 1 2 3\nb 4 5 6\n\n")).unwrap();
    assert_eq!(embeddings.vocab.len(), 2);
    assert_eq!(embeddings.vocab.id("b"), Some(1));
    assert_eq!(embeddings.vocab.word(0), Some("a"));
    assert_eq!(embeddings.dims(), 3);
    assert_eq!(embeddings.matrix[[1, 2]], 6.0);
    assert_eq!(embeddings.mean(&[0, 1]).unwrap(), array![2.5, 3.5, 4.5]);
    assert!(embeddings.mean(&[]).is_none());
}

#[test]
fn malformed_files_report_line_numbers() {
    let line_of = |text: &str| match parse(Cursor::new(text.to_string())) {
        Err(LinkError::EmbeddingFormat { line, .. }) => line,
        other => panic!("expected format error, got {other:?}"),
    };
    assert_eq!(line_of(""), 1);
    assert_eq!(line_of("three by two\n"), 1);
    assert_eq!(line_of("2 3\na 1 2\nb 1 2 3\n"), 2);
    assert_eq!(line_of("1 2\na 1 2\nb 3 4\n"), 3);
    assert_eq!(line_of("1 2\na 1 nope\n"), 2);
    assert_eq!(line_of("2 2\na 1 2\n"), 3);
}

#[test]
fn later_duplicate_words_win_lookup() {
    let embeddings = parse(Cursor::new("2 1\na 1\na 2\n")).unwrap();
    assert_eq!(embeddings.vocab.id("a"), Some(1));
    assert_eq!(embeddings.matrix.nrows(), 2);
}

#[test]
fn cache_round_trips_and_recovers_from_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_embeddings(dir.path());
    let cache = EmbeddingCache::open(dir.path().join("cache")).unwrap();
    assert!(cache.get(&source).unwrap().is_none());

    let fresh = embeddings::load(&source, Some(&cache)).unwrap();
    let entry = cache.entry_path(&source).unwrap();
    assert!(entry.exists());
    assert_eq!(cache.get(&source).unwrap().as_ref(), Some(&fresh));
    assert_eq!(fresh, common::tiny_embeddings());

    fs::write(&entry, b"not bincode").unwrap();
    assert!(cache.get(&source).unwrap().is_none());
    let rebuilt = embeddings::load(&source, Some(&cache)).unwrap();
    assert_eq!(rebuilt, fresh);
}

#[test]
fn missing_embedding_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = embeddings::load(&dir.path().join("absent.txt"), None).unwrap_err();
    assert!(matches!(err, LinkError::Io { .. }));
}

#[test]
fn oversized_headers_are_rejected_without_allocating() {
    let line_of = |text: &str| match parse(Cursor::new(text.to_string())) {
        Err(LinkError::EmbeddingFormat { line, .. }) => line,
        other => panic!("expected format error, got {other:?}"),
    };
    assert_eq!(line_of("4294967296 4294967296\na 1\n"), 1);
    assert_eq!(line_of("18446744073709551615 2\na 1 2\n"), 1);
    assert_eq!(line_of("18446744073709551615 0\na\n"), 3);
}

#[test]
fn unusable_cache_entry_still_loads_from_text() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_embeddings(dir.path());
    let cache = EmbeddingCache::open(dir.path().join("cache")).unwrap();
    let entry = cache.entry_path(&source).unwrap();
    fs::create_dir(&entry).unwrap();

    let loaded = embeddings::load(&source, Some(&cache)).unwrap();
    assert_eq!(loaded, common::tiny_embeddings());
    assert!(entry.is_dir());
}

#[test]
fn inconsistent_cache_entry_is_a_miss() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_embeddings(dir.path());
    let cache = EmbeddingCache::open(dir.path().join("cache")).unwrap();
    let lopsided = Embeddings {
        vocab: Vocab::new(vec!["dog".to_string()]),
        matrix: array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };
    assert!(!lopsided.is_consistent());
    fs::write(
        cache.entry_path(&source).unwrap(),
        bincode::serialize(&lopsided).unwrap(),
    )
    .unwrap();

    assert!(cache.get(&source).unwrap().is_none());
    assert_eq!(
        embeddings::load(&source, Some(&cache)).unwrap(),
        common::tiny_embeddings()
    );
}

#[test]
fn rewriting_the_source_evicts_its_old_entry() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_embeddings(dir.path());
    let cache_dir = dir.path().join("cache");
    let cache = EmbeddingCache::open(&cache_dir).unwrap();
    embeddings::load(&source, Some(&cache)).unwrap();
    let old_entry = cache.entry_path(&source).unwrap();

    fs::write(&source, "1 3\ndog 1 0 0\n").unwrap();
    let reloaded = embeddings::load(&source, Some(&cache)).unwrap();
    assert_eq!(reloaded.vocab.len(), 1);

    let new_entry = cache.entry_path(&source).unwrap();
    assert_ne!(old_entry, new_entry);
    assert!(!old_entry.exists());
    assert!(new_entry.exists());
    assert_eq!(fs::read_dir(&cache_dir).unwrap().count(), 1);
}
