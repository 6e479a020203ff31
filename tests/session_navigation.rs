//! Integration tests for directory sessions: navigation, save-then-load and
//! dirty tracking.

use std::fs;
use std::path::Path;

use yolomark::categories::CategoryNames;
use yolomark::geom::{ImageSize, Rect};
use yolomark::report::summarize;
use yolomark::sample::SampleId;
use yolomark::session::{
    EditEvent, EventOutcome, Position, SaveOutcome, SavePolicy, Session, SessionOptions,
};
use yolomark::YolomarkError;

mod common;
use common::{create_image_dir, read};

fn open(root: &Path, options: SessionOptions) -> Session {
    Session::open(root, &root.join("obj.names"), options).expect("open session")
}

fn seeded() -> SessionOptions {
    SessionOptions {
        color_seed: Some(11),
        ..Default::default()
    }
}

#[test]
fn navigation_walks_start_images_end_and_back() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());
    let mut session = open(temp.path(), seeded());

    assert_eq!(session.images().len(), 3);
    assert_eq!(session.position(), Position::Start);
    assert_eq!(session.progress(), "");

    assert_eq!(session.next().expect("next"), Position::Image(0));
    let current = session.current().expect("image loaded");
    assert_eq!(current.entry.file_name(), "a.png");
    assert_eq!(current.size, ImageSize::new(1000, 800));
    assert_eq!(current.grouper.len(), 2);
    assert_eq!(session.progress(), "0/3");

    assert_eq!(session.next().expect("next"), Position::Image(1));
    assert_eq!(session.next().expect("next"), Position::Image(2));
    assert!(session.current().expect("image loaded").grouper.is_empty());

    assert_eq!(session.next().expect("next"), Position::End);
    assert!(session.current().is_none());
    assert_eq!(session.next().expect("next"), Position::End);

    assert_eq!(session.previous().expect("previous"), Position::Image(2));
    assert_eq!(session.go_to(0).expect("go to"), Position::Image(0));
    assert_eq!(session.previous().expect("previous"), Position::Start);
    assert!(session.current().is_none());
    assert_eq!(session.previous().expect("previous"), Position::Start);
}

#[test]
fn untouched_label_files_are_not_rewritten() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());
    let before = read(&temp.path().join("a.txt"));

    let mut session = open(temp.path(), seeded());
    session.next().expect("load a");
    session
        .apply(EditEvent::SetGroupVisibility {
            category: 2,
            visible: false,
        })
        .expect("hide group");
    assert_eq!(session.save_current().expect("save"), SaveOutcome::Unchanged);
    session.next().expect("load b");

    assert_eq!(read(&temp.path().join("a.txt")), before);
}

#[test]
fn leaving_an_edited_image_saves_it() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());

    let mut session = open(temp.path(), seeded());
    session.next().expect("load a");
    session
        .apply(EditEvent::EditCategory {
            sample: SampleId::new(0),
            input: "0".to_string(),
        })
        .expect("reassign");
    session
        .apply(EditEvent::SetSampleDeleted {
            sample: SampleId::new(1),
            deleted: true,
        })
        .expect("delete");
    session.next().expect("load b");

    assert_eq!(
        read(&temp.path().join("a.txt")),
        "0 0.500000 0.500000 0.200000 0.400000\n"
    );

    session.previous().expect("reload a");
    let current = session.current().expect("image loaded");
    assert_eq!(current.grouper.len(), 1);
    assert_eq!(current.grouper.samples()[0].category_index(), 0);
}

#[test]
fn save_commits_the_grouper() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());

    let mut session = open(temp.path(), seeded());
    session.next().expect("load a");
    session
        .apply(EditEvent::SetSampleDeleted {
            sample: SampleId::new(0),
            deleted: true,
        })
        .expect("delete");

    assert_eq!(
        session.save_current().expect("save"),
        SaveOutcome::Written { lines: 1 }
    );
    let current = session.current().expect("image loaded");
    assert_eq!(current.grouper.len(), 1);
    assert!(!current.grouper.needs_save());
    assert_eq!(
        read(&temp.path().join("a.txt")),
        "0 0.100000 0.100000 0.100000 0.100000\n"
    );
}

#[test]
fn drawn_boxes_are_saved() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());

    let mut session = open(temp.path(), seeded());
    session.go_to(2).expect("load c");
    let outcome = session
        .apply(EditEvent::DrawBox {
            category: 1,
            corners: Rect::new(10.0, 10.0, 40.0, 30.0),
        })
        .expect("draw");
    assert_eq!(outcome, EventOutcome::Added(SampleId::new(0)));
    session.next().expect("leave c");

    assert_eq!(
        read(&temp.path().join("c.txt")),
        "1 0.500000 0.400000 0.600000 0.400000\n"
    );
}

#[test]
fn always_policy_normalizes_on_leave() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());

    let mut session = open(
        temp.path(),
        SessionOptions {
            save_policy: SavePolicy::Always,
            ..seeded()
        },
    );
    session.next().expect("load a");
    session.next().expect("load b");

    assert_eq!(
        read(&temp.path().join("a.txt")),
        "0 0.100000 0.100000 0.100000 0.100000\n2 0.500000 0.500000 0.200000 0.400000\n"
    );
}

#[test]
fn dry_run_never_writes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());
    let before = read(&temp.path().join("a.txt"));

    let mut session = open(
        temp.path(),
        SessionOptions {
            dry_run: true,
            ..seeded()
        },
    );
    session.next().expect("load a");
    session
        .apply(EditEvent::SetSampleDeleted {
            sample: SampleId::new(1),
            deleted: true,
        })
        .expect("delete");

    match session.save_current().expect("save") {
        SaveOutcome::DryRun { content } => {
            assert_eq!(content, "2 0.500000 0.500000 0.200000 0.400000\n")
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    session.next().expect("load b");
    assert_eq!(read(&temp.path().join("a.txt")), before);
}

#[test]
fn display_height_cap_scales_pixels_but_not_labels() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());

    let mut session = open(
        temp.path(),
        SessionOptions {
            max_display_height: Some(400),
            save_policy: SavePolicy::Always,
            ..seeded()
        },
    );
    session.next().expect("load a");
    let current = session.current().expect("image loaded");
    assert_eq!(current.size, ImageSize::new(500, 400));
    let bbox = current.grouper.samples()[0].bbox();
    assert!((bbox.left - 200.0).abs() < 1e-9);
    assert!((bbox.bottom - 280.0).abs() < 1e-9);

    session.next().expect("load b");
    assert_eq!(
        read(&temp.path().join("a.txt")),
        "0 0.100000 0.100000 0.100000 0.100000\n2 0.500000 0.500000 0.200000 0.400000\n"
    );
}

#[test]
fn malformed_label_file_aborts_load() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());
    fs::write(temp.path().join("b.txt"), "1 0.25 0.25 0.1\n").expect("break b labels");

    let mut session = open(temp.path(), seeded());
    session.next().expect("load a");
    let err = session.next().unwrap_err();
    match err {
        YolomarkError::LabelParse { path, line, .. } => {
            assert_eq!(path, temp.path().join("b.txt"));
            assert_eq!(line, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(session.current().is_none());
    assert_eq!(session.position(), Position::Image(1));
    assert_eq!(session.progress(), "1/3");

    assert_eq!(session.next().expect("skip past b"), Position::Image(2));
    assert_eq!(session.previous().unwrap_err().to_string(), err_text(&temp));
    assert_eq!(session.position(), Position::Image(1));
    assert_eq!(session.previous().expect("back to a"), Position::Image(0));
    assert_eq!(
        session.current().expect("image loaded").entry.file_name(),
        "a.png"
    );
}

fn err_text(temp: &tempfile::TempDir) -> String {
    format!(
        "Invalid label file {} at line 1: expected 5 elements, found 4",
        temp.path().join("b.txt").display()
    )
}

#[test]
fn display_height_cap_keeps_thin_images_at_one_pixel() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_png(&temp.path().join("tall.png"), 1, 3000);
    fs::write(temp.path().join("tall.txt"), "0 0.5 0.5 1.0 0.2\n").expect("write labels");
    common::write_names(&temp.path().join("obj.names"));

    let mut session = open(
        temp.path(),
        SessionOptions {
            max_display_height: Some(800),
            save_policy: SavePolicy::Always,
            ..seeded()
        },
    );
    session.next().expect("load tall");
    assert_eq!(
        session.current().expect("image loaded").size,
        ImageSize::new(1, 800)
    );
    session.next().expect("leave tall");

    assert_eq!(
        read(&temp.path().join("tall.txt")),
        "0 0.500000 0.500000 1.000000 0.200000\n"
    );
}

#[test]
fn unknown_category_in_label_file_aborts_load() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());
    fs::write(temp.path().join("a.txt"), "0 0.5 0.5 0.1 0.1\n3 0.5 0.5 0.1 0.1\n")
        .expect("write a labels");

    let mut session = open(temp.path(), seeded());
    let err = session.next().unwrap_err();
    assert!(matches!(
        err,
        YolomarkError::UnknownCategory {
            index: 3,
            line: 2,
            ..
        }
    ));
}

#[test]
fn events_need_a_loaded_image() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());

    let mut session = open(temp.path(), seeded());
    let err = session
        .apply(EditEvent::SetGroupVisibility {
            category: 0,
            visible: false,
        })
        .unwrap_err();
    assert!(matches!(err, YolomarkError::NoImageLoaded));
}

#[test]
fn for_image_requires_a_label_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());

    let err = Session::for_image(
        &temp.path().join("d.png"),
        CategoryNames::parse(common::NAMES),
        SessionOptions::default(),
    )
    .err()
    .expect("missing label file");
    assert!(matches!(err, YolomarkError::MissingLabelFile { .. }));
}

#[test]
fn summarize_counts_boxes_per_category() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_image_dir(temp.path());
    let before = read(&temp.path().join("a.txt"));

    let mut session = open(temp.path(), seeded());
    let report = summarize(&mut session).expect("summarize");

    assert_eq!(report.images, 3);
    assert_eq!(report.skipped_images, 1);
    assert_eq!(report.empty_images, 1);
    assert_eq!(report.boxes, 3);
    let counts: Vec<(usize, &str, usize)> = report
        .categories
        .iter()
        .map(|c| (c.category, c.name.as_str(), c.boxes))
        .collect();
    assert_eq!(counts, vec![(0, "person", 1), (1, "bicycle", 1), (2, "car", 1)]);
    assert_eq!(read(&temp.path().join("a.txt")), before);
}
