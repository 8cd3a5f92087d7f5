// End-to-end tests for the tidy-up file driver: read, re-derive, replace.

use std::fs;
use std::path::{Path, PathBuf};

use midicoll::models::Meter;
use midicoll::tidy::{tidy_file, TidyError};

fn write_coll(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn tidies_a_raw_collection_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_coll(
        dir.path(),
        "tune.txt",
        "0, 0 60 100 90;\n1, 30 62 100 80;\n2, 10 64 100 70;\n",
    );

    let outcome = tidy_file(&path, 0, Meter::with_beats(4)).unwrap();

    assert_eq!(outcome.event_count, 5);
    assert_eq!(outcome.groups.counts(), &[3, 2]);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "0, 0 60 30 90;\n1, 30 62 18 80;\n2, 48 0 0 0;\n3, 0 62 10 80;\n4, 10 64 38 70;\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("group_tune.txt")).unwrap(),
        "0, 3;\n1, 2;\n"
    );
}

#[test]
fn retidying_from_the_first_unprocessed_index_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_coll(
        dir.path(),
        "tune.txt",
        "0, 5 60 100 90;\n1, 30 62 100 80;\n2, 10 64 100 70;\n",
    );

    let first = tidy_file(&path, 0, Meter::with_beats(4)).unwrap();
    let tidy_bytes = fs::read_to_string(&path).unwrap();
    let group_bytes = fs::read_to_string(dir.path().join("group_tune.txt")).unwrap();

    let second = tidy_file(&path, first.event_count, Meter::with_beats(4)).unwrap();

    assert_eq!(second, first);
    assert_eq!(fs::read_to_string(&path).unwrap(), tidy_bytes);
    assert_eq!(
        fs::read_to_string(dir.path().join("group_tune.txt")).unwrap(),
        group_bytes
    );
}

#[test]
fn malformed_input_leaves_the_collection_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let text = "0, 0 60 100 90;\n1, 30 sixty-two 100 80;\n";
    let path = write_coll(dir.path(), "tune.txt", text);

    let err = tidy_file(&path, 0, Meter::with_beats(4)).unwrap_err();

    assert!(matches!(err, TidyError::Coll(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), text);
    assert!(!dir.path().join("group_tune.txt").exists());
}

#[test]
fn out_of_order_indices_leave_the_collection_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let text = "1, 0 60 100 90;\n0, 30 62 100 80;\n";
    let path = write_coll(dir.path(), "tune.txt", text);

    let err = tidy_file(&path, 0, Meter::with_beats(4)).unwrap_err();

    assert!(matches!(err, TidyError::Validation(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), text);
    assert!(!dir.path().join("group_tune.txt").exists());
}

#[test]
fn missing_collection_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = tidy_file(&dir.path().join("absent.txt"), 0, Meter::with_beats(4)).unwrap_err();
    assert!(matches!(err, TidyError::Coll(_)));
}
