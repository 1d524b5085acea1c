//! Integration tests for ssm-viewer
//!
//! Archives here hold small solid-color snapshots whose color encodes the
//! rotation state, so the tests can tell which snapshot is on screen.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};
use ssm_core::{Angle, Error, ImageKey, RotationState};
use ssm_io::{Archive, ArchivePacker, ArchiveVariant};
use ssm_viewer::*;
use std::collections::BTreeSet;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

const CANVAS: (u32, u32) = (24, 16);

fn color_of(state: &RotationState) -> [u8; 3] {
    let [x, y, z] = [state.x, state.y, state.z].map(|a: Angle| a.step() as u8 * 30);
    [x, y, z]
}

fn snapshot(state: &RotationState) -> Vec<u8> {
    let image = RgbImage::from_pixel(12, 8, Rgb(color_of(state)));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Archive with every grid snapshot except those in `skip`
fn write_archive(dir: &Path, name: &str, variant: ArchiveVariant, skip: &[RotationState]) -> PathBuf {
    let mut archive = Archive::new();
    for state in RotationState::grid().filter(|s| !skip.contains(s)) {
        archive
            .insert(ImageKey::from_state(&state).into_string(), snapshot(&state))
            .unwrap();
    }
    let path = dir.join(format!("{name}.ssm"));
    ArchivePacker::new(variant).pack(&archive, &path).unwrap();
    path
}

fn config(store: StoreMode) -> ViewerConfig {
    ViewerConfig {
        canvas_width: CANVAS.0,
        canvas_height: CANVAS.1,
        store,
        ..ViewerConfig::default()
    }
}

fn expect_frame(response: Response) -> Frame {
    match response {
        Response::Frame(frame) => frame,
        other => panic!("expected a frame, got {other:?}"),
    }
}

fn extraction_dir(session: &ViewerSession) -> PathBuf {
    session
        .store()
        .and_then(|store| store.location())
        .expect("archive extracted to a directory")
        .to_path_buf()
}

fn dir_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn state(x: i32, y: i32, z: i32) -> RotationState {
    RotationState::from_degrees(x, y, z).unwrap()
}

#[test]
fn test_load_shows_origin_then_yaw_left() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "full", ArchiveVariant::Plain, &[]);
    let mut session = ViewerSession::new(config(StoreMode::Temporary));

    let frame = expect_frame(session.load(&path).unwrap());
    assert_eq!(frame.key.as_str(), "tmpModel_000000000.png");
    assert_eq!(frame.image.dimensions(), CANVAS);
    assert!(session.is_interactive());

    let frame = expect_frame(session.handle(Command::RotateYawLeft));
    assert_eq!(frame.key.as_str(), "tmpModel_000045000.png");
    let [r, g, b] = color_of(&state(0, 45, 0));
    assert_eq!(*frame.image.get_pixel(12, 8), Rgba([r, g, b, 255]));
}

#[test]
fn test_command_axis_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "axes", ArchiveVariant::Plain, &[]);
    let mut session = ViewerSession::new(config(StoreMode::Memory));
    session.load(&path).unwrap();

    let cases = [
        (Command::RotateYawRight, state(0, 315, 0)),
        (Command::RotatePitchUp, state(315, 315, 0)),
        (Command::RotatePitchDown, state(0, 315, 0)),
        (Command::RotatePitchDown, state(45, 315, 0)),
        (Command::RotateRollCw, state(45, 315, 45)),
        (Command::RotateRollCcw, state(45, 315, 0)),
        (Command::RotateRollCcw, state(45, 315, 315)),
    ];
    for (command, expected) in cases {
        let frame = expect_frame(session.handle(command));
        assert_eq!(frame.state, expected, "after {command}");
        assert_eq!(frame.key, ImageKey::from_state(&expected));
    }
}

#[test]
fn test_yaw_wraps_after_a_full_turn() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "turn", ArchiveVariant::Compressed, &[]);
    let mut session = ViewerSession::new(config(StoreMode::Memory));
    session.load(&path).unwrap();

    let start = session.rotation();
    for _ in 0..8 {
        session.handle(Command::RotateYawLeft);
    }
    assert_eq!(session.rotation(), start);

    session.handle(Command::RotateYawRight);
    session.handle(Command::RotateYawLeft);
    assert_eq!(session.rotation(), start);
}

#[test]
fn test_zoom_steps_and_clamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "zoom", ArchiveVariant::Plain, &[]);
    let mut session = ViewerSession::new(config(StoreMode::Memory));
    session.load(&path).unwrap();

    let frame = expect_frame(session.handle(Command::ZoomOut));
    assert!(frame.zoom.is_original_size());
    assert_eq!(frame.image.dimensions(), CANVAS);

    let mut previous = session.zoom().value();
    for steps in 1..=5 {
        let frame = expect_frame(session.handle(Command::ZoomIn));
        assert_eq!(frame.zoom.steps(), steps);
        assert!((frame.zoom.value() - previous - 0.1).abs() < 1e-5);
        previous = frame.zoom.value();
    }

    let frame = expect_frame(session.handle(Command::ZoomIn));
    // 1.6x of 24x16, cropped back to the canvas
    assert_eq!(frame.scaled, (38, 25));
    assert_eq!(frame.scaled_offset, (-7, -5));
    assert_eq!(frame.image.dimensions(), CANVAS);
    assert_eq!(frame.offset, (0, 0));

    for _ in 0..10 {
        session.handle(Command::ZoomOut);
    }
    assert!(session.zoom().is_original_size());
}

#[test]
fn test_missing_origin_reports_lookup_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(
        dir.path(),
        "partial",
        ArchiveVariant::Plain,
        &[RotationState::origin()],
    );
    let mut app = ViewerApp::new(config(StoreMode::Temporary), CanvasDisplay::new(CANVAS.0, CANVAS.1, [0, 0, 0]));

    app.open(&path).unwrap();
    assert!(app.session().is_interactive());
    assert_eq!(app.display().presented(), 0);
    assert_eq!(app.display().messages().len(), 1);
    assert!(app.display().messages()[0].contains("tmpModel_000000000.png"));

    // The session keeps working
    let response = app.dispatch(InputEvent::Key(Key::Left));
    assert!(matches!(response, Response::Frame(_)));
    assert_eq!(app.display().presented(), 1);

    // Coming back to the hole keeps the last good frame on the canvas
    let shown = app.display().canvas().clone();
    let response = app.dispatch(InputEvent::Key(Key::Right));
    match response {
        Response::LookupFailed { key, .. } => assert_eq!(key.as_str(), "tmpModel_000000000.png"),
        other => panic!("expected lookup failure, got {other:?}"),
    }
    assert_eq!(app.display().canvas(), &shown);
    assert!(app.is_running());
}

#[test]
fn test_wrong_variant_keeps_pre_load_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "packed", ArchiveVariant::Compressed, &[]);
    let strict = ViewerConfig {
        variant: Some(ArchiveVariant::Plain),
        ..config(StoreMode::BesideArchive)
    };
    let mut session = ViewerSession::new(strict);

    let err = session.load(&path).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(!session.is_interactive());
    assert!(session.source().is_none());
    assert_eq!(session.handle(Command::RotateYawLeft), Response::Ignored);
    assert_eq!(session.rotation(), RotationState::origin());
    assert_eq!(dir_names(dir.path()), BTreeSet::from(["packed.ssm".to_string()]));
}

#[test]
fn test_failed_reload_keeps_current_archive() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_archive(dir.path(), "good", ArchiveVariant::Plain, &[]);
    let mut session = ViewerSession::new(config(StoreMode::Memory));
    session.load(&good).unwrap();
    session.handle(Command::RotateRollCw);
    session.handle(Command::ZoomIn);

    let err = session.load(&dir.path().join("missing.ssm")).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(session.source(), Some(good.as_path()));
    assert_eq!(session.rotation(), state(0, 0, 45));
    assert_eq!(session.zoom().steps(), 1);
}

#[test]
fn test_reload_resets_state_and_releases_old_store() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_archive(dir.path(), "first", ArchiveVariant::Plain, &[]);
    let second = write_archive(dir.path(), "second", ArchiveVariant::Compressed, &[]);
    let mut session = ViewerSession::new(config(StoreMode::BesideArchive));

    session.load(&first).unwrap();
    let first_dir = extraction_dir(&session);
    assert!(first_dir.is_dir());
    session.handle(Command::RotatePitchDown);
    session.handle(Command::ZoomIn);

    let frame = expect_frame(session.load(&second).unwrap());
    assert_eq!(frame.state, RotationState::origin());
    assert!(frame.zoom.is_original_size());
    assert!(!first_dir.exists());
    assert!(extraction_dir(&session).is_dir());
    assert_eq!(session.store().map(|s| s.variant()), Some(ArchiveVariant::Compressed));
}

#[test]
fn test_reloading_the_same_archive_keeps_working() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "again", ArchiveVariant::Plain, &[]);
    let mut session = ViewerSession::new(config(StoreMode::BesideArchive));

    session.load(&path).unwrap();
    let old_dir = extraction_dir(&session);
    session.handle(Command::RotateRollCw);

    let frame = expect_frame(session.load(&path).unwrap());
    assert_eq!(frame.key.as_str(), "tmpModel_000000000.png");
    let new_dir = extraction_dir(&session);
    assert_ne!(new_dir, old_dir);
    assert!(!old_dir.exists());
    assert_eq!(fs::read_dir(&new_dir).unwrap().count(), 512);

    let frame = expect_frame(session.handle(Command::RotateYawLeft));
    assert_eq!(frame.key.as_str(), "tmpModel_000045000.png");
    assert_eq!(dir_names(dir.path()).len(), 2);
}

#[test]
fn test_folder_named_like_the_archive_survives() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "model", ArchiveVariant::Plain, &[]);
    let own = dir.path().join("model");
    fs::create_dir(&own).unwrap();
    fs::write(own.join("thesis.txt"), b"chapter one").unwrap();
    let mut session = ViewerSession::new(config(StoreMode::BesideArchive));

    expect_frame(session.load(&path).unwrap());
    assert_ne!(extraction_dir(&session), own);
    session.close().unwrap();

    assert_eq!(fs::read(own.join("thesis.txt")).unwrap(), b"chapter one");
    assert_eq!(
        dir_names(dir.path()),
        BTreeSet::from(["model".to_string(), "model.ssm".to_string()])
    );
}

#[test]
fn test_close_removes_extracted_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "closing", ArchiveVariant::Plain, &[]);
    let mut app = ViewerApp::new(
        config(StoreMode::BesideArchive),
        CanvasDisplay::new(CANVAS.0, CANVAS.1, [0, 0, 0]),
    );
    app.open(&path).unwrap();
    let extracted = extraction_dir(app.session());
    assert_eq!(fs::read_dir(&extracted).unwrap().count(), 512);

    assert_eq!(app.dispatch(InputEvent::Key(Key::Escape)), Response::Closed);
    assert!(!app.is_running());
    assert!(!extracted.exists());
    assert!(path.is_file());

    // Nothing reacts after close
    assert_eq!(app.dispatch(InputEvent::Key(Key::Left)), Response::Ignored);
}

#[test]
fn test_scripted_run_writes_frames() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_archive(dir.path(), "scripted", ArchiveVariant::Plain, &[]);
    let frame_out = dir.path().join("frame.png");
    let display = CanvasDisplay::new(CANVAS.0, CANVAS.1, [0, 0, 0]).with_output(&frame_out);
    let mut app = ViewerApp::new(config(StoreMode::Temporary), display);
    app.open(&path).unwrap();

    for event in parse_script("left,left,w,+,q").unwrap() {
        app.dispatch(event);
    }

    assert!(!app.is_running());
    assert_eq!(app.display().presented(), 5);
    assert_eq!(app.display().title(), "Secure Share Model - X:0 / Y:90 / Z:45");
    let written = image::open(&frame_out).unwrap();
    assert_eq!((written.width(), written.height()), CANVAS);
}

#[test]
fn test_open_missing_file_reports_and_keeps_running() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = ViewerApp::new(
        config(StoreMode::Temporary),
        CanvasDisplay::new(CANVAS.0, CANVAS.1, [0, 0, 0]),
    );

    let err = app.open(&dir.path().join("nope.ssm")).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(app.is_running());
    assert_eq!(app.display().messages().len(), 1);
    assert_eq!(app.dispatch(InputEvent::Wheel { delta: 1.0 }), Response::Ignored);
}
