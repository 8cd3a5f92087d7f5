// End-to-end tests for the slice transforms: extend the file, re-tidy the seam.

use std::fs;
use std::path::{Path, PathBuf};

use midicoll::models::Meter;
use midicoll::transforms::{repeat_file, sequence_file, TransformError};

const TIDY_BASE: &str = "0, 0 60 24 90;\n1, 24 62 24 80;\n2, 0 64 48 70;\n";

fn write_coll(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("tune.txt");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn repetition_appends_and_retidies_the_seam() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_coll(dir.path(), TIDY_BASE);

    let outcome = repeat_file(&path, 0, 2, Meter::with_beats(4)).unwrap();

    assert_eq!(outcome.event_count, 5);
    assert_eq!(outcome.groups.counts(), &[2, 1, 2]);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "0, 0 60 24 90;\n1, 24 62 24 80;\n2, 0 64 48 70;\n\
         3, 0 60 24 90;\n4, 24 62 24 80;\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("group_tune.txt")).unwrap(),
        "0, 2;\n1, 1;\n2, 2;\n"
    );
}

#[test]
fn sequence_appends_a_transposed_copy() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_coll(dir.path(), TIDY_BASE);

    // Slice ends on pitch 64; sequencing onto 60 shifts the copy down 4.
    let outcome = sequence_file(&path, 0, 3, 60, Meter::with_beats(4)).unwrap();

    assert_eq!(outcome.event_count, 6);
    assert_eq!(outcome.groups.counts(), &[2, 1, 2, 1]);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "0, 0 60 24 90;\n1, 24 62 24 80;\n2, 0 64 48 70;\n\
         3, 0 56 24 90;\n4, 24 58 24 80;\n5, 0 60 48 70;\n"
    );
}

#[test]
fn repetition_drops_a_leading_rest_and_closes_the_gap() {
    // A statement starting with a rest repeats as notes only; the seam note
    // is re-derived against the copy's first onset and shortened to fit.
    let dir = tempfile::tempdir().unwrap();
    let path = write_coll(dir.path(), "0, 0 0 -6 0;\n1, 6 60 42 90;\n2, 0 62 48 80;\n");

    let outcome = repeat_file(&path, 0, 3, Meter::with_beats(4)).unwrap();

    assert_eq!(outcome.event_count, 5);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "0, 0 0 -6 0;\n1, 6 60 42 90;\n2, 0 62 6 80;\n\
         3, 6 60 42 90;\n4, 0 62 48 80;\n"
    );
    assert_eq!(outcome.groups.counts(), &[2, 2, 1]);
}

#[test]
fn bad_slice_leaves_the_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_coll(dir.path(), TIDY_BASE);

    let err = repeat_file(&path, 1, 9, Meter::with_beats(4)).unwrap_err();

    assert!(matches!(err, TransformError::SliceOutOfRange { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), TIDY_BASE);
}
