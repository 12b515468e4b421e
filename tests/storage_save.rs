//! Integration tests for saving to a real filesystem directory.

use std::fs;
use std::path::Path;

use fnotes::capture::mock::MockCapture;
use fnotes::controller::SessionController;
use fnotes::error::FieldError;
use fnotes::geo::{GpsFix, NullLocator, StaticLocator};
use fnotes::storage::{self, FsDir};

fn collect_session(target: &Path) -> SessionController {
    let mut ctl = SessionController::new(
        Box::new(MockCapture::with_frames(3)),
        Box::new(StaticLocator::new(GpsFix::new(35.65, 139.74, Some(5.0)))),
    );
    ctl.set_target(Box::new(FsDir::new(target).unwrap()));
    ctl.new_location("survey", "north face, shady").unwrap();
    ctl.refresh_gps();
    ctl.snap().unwrap();
    ctl.advance_sample();
    ctl.snap().unwrap();
    ctl
}

#[test]
fn test_save_writes_expected_layout() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ctl = collect_session(tmp.path());

    let summary = ctl.save().unwrap();

    // One folder per location, name sanitized.
    let folder = tmp.path().join(&summary.folder);
    assert!(folder.is_dir());
    let fragment = summary.folder.split('_').next_back().unwrap();
    assert!(fragment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    assert!(summary.folder.ends_with("_north_face__shady"));

    // Photos plus the two metadata files.
    let location_id = ctl.session().location().unwrap().location_id.clone();
    for file in &summary.files {
        assert!(folder.join(file).is_file(), "missing {file}");
    }
    let csv = fs::read_to_string(folder.join(format!("{location_id}.csv"))).unwrap();
    assert!(csv.starts_with("project,survey\n"));
    assert!(csv.contains("\n\nsampleId,filename\n"));
    assert!(csv.contains("note,\"north face, shady\""));
    assert!(csv.contains("gps_lat,35.65"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(folder.join(format!("{location_id}.json"))).unwrap())
            .unwrap();
    assert_eq!(json["project"], "survey");
    assert_eq!(json["location"]["locationId"], location_id.as_str());
    assert_eq!(json["photos"].as_array().unwrap().len(), 2);
    assert_eq!(json["gps"]["acc"], 5.0);
}

#[test]
fn test_resave_reuses_folder_with_identical_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ctl = collect_session(tmp.path());

    let first = ctl.save().unwrap();
    let folder = tmp.path().join(&first.folder);
    let csv_before = fs::read(folder.join(
        first.files.iter().find(|f| f.ends_with(".csv")).unwrap(),
    ))
    .unwrap();

    let second = ctl.save().unwrap();
    assert_eq!(first.folder, second.folder);
    assert_eq!(first.files, second.files);

    // Exactly one location folder; contents byte-identical.
    let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let csv_after = fs::read(folder.join(
        second.files.iter().find(|f| f.ends_with(".csv")).unwrap(),
    ))
    .unwrap();
    assert_eq!(csv_before, csv_after);
}

#[test]
fn test_save_without_location_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ctl = SessionController::new(
        Box::new(MockCapture::new()),
        Box::new(NullLocator),
    );
    ctl.set_target(Box::new(FsDir::new(tmp.path()).unwrap()));

    assert!(matches!(ctl.save(), Err(FieldError::NoLocation)));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn test_photo_bytes_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ctl = SessionController::new(
        Box::new(MockCapture::with_frames(1)),
        Box::new(NullLocator),
    );
    ctl.set_target(Box::new(FsDir::new(tmp.path()).unwrap()));
    ctl.new_location("survey", "ridge").unwrap();
    let report = ctl.snap().unwrap();

    let summary = ctl.save().unwrap();
    let written = fs::read(tmp.path().join(&summary.folder).join(&report.filename)).unwrap();
    // MockCapture's first frame is the single byte 0.
    assert_eq!(written, vec![0]);
}

#[test]
fn test_folder_name_is_deterministic() {
    assert_eq!(
        storage::folder_name("20250314 092653", "L20250314092653", "rock pool #2"),
        "20250314 092653_L20250314092653_rock_pool__2"
    );
}
