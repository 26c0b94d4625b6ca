mod common;

use common::{FakeWindowSystem, RecordingPhoto, Request, ROOT};
use csdkit::config::packages::CMD_CAPTURE;
use csdkit::host::{CompositeRule, PhotoImage};
use csdkit::{
    capture_region, CaptureRect, CommandContext, CommandTable, ErrorKind, StandaloneHost, WindowRef,
};

fn capture(
    ws: &FakeWindowSystem,
    host: &mut StandaloneHost,
    args: &[&str],
) -> csdkit::error::Result<()> {
    let mut ctx = CommandContext::new(ws, host);
    CommandTable::with_all().invoke(&mut ctx, CMD_CAPTURE, args)
}

#[test]
fn four_by_two_capture_produces_expected_rgba_bytes() {
    let ws = FakeWindowSystem::with_pixels(
        4,
        vec![
            0x112233, 0xFF0000, 0x00FF00, 0x0000FF, //
            0xFFFFFF, 0x000000, 0xAB123456, 0x7F7F7F,
        ],
    );
    let mut photo = RecordingPhoto::default();
    capture_region(&ws, &mut photo, WindowRef::Root, CaptureRect::new(0, 0, 4, 2)).unwrap();

    #[rustfmt::skip]
    let expected: Vec<u8> = vec![
        0x11, 0x22, 0x33, 255,  255, 0, 0, 255,  0, 255, 0, 255,  0, 0, 255, 255,
        255, 255, 255, 255,     0, 0, 0, 255,    0x12, 0x34, 0x56, 255,  0x7F, 0x7F, 0x7F, 255,
    ];
    assert_eq!(photo.last_block.len(), 32);
    assert_eq!(photo.last_block, expected);
    assert_eq!(photo.last_rule, Some(CompositeRule::Set));
}

#[test]
fn photo_is_resized_before_pixels_are_written() {
    let ws = FakeWindowSystem::new();
    let mut photo = RecordingPhoto {
        size: (640, 480),
        ..Default::default()
    };
    capture_region(&ws, &mut photo, WindowRef::Id(0x400001), CaptureRect::new(10, 20, 4, 2))
        .unwrap();

    assert_eq!(
        photo.ops,
        vec![
            "set_size 4x2".to_string(),
            "put_block 4x2 at 0,0 region 4x2 pitch 16 pixel_size 4 offsets [0, 1, 2, 3] against 4x2"
                .to_string(),
        ]
    );
}

#[test]
fn root_sentinel_reads_the_root_window() {
    let ws = FakeWindowSystem::new();
    let mut host = StandaloneHost::new();
    host.create_photo("shot");

    capture(&ws, &mut host, &["shot", "root", "5", "-3", "2", "2"]).unwrap();
    capture(&ws, &mut host, &["shot", "0x2a00007", "0", "0", "1", "1"]).unwrap();

    let reads: Vec<_> = ws
        .requests()
        .into_iter()
        .filter_map(|r| match r {
            Request::GetImage { window, rect } => Some((window, rect)),
            _ => None,
        })
        .collect();
    assert_eq!(
        reads,
        vec![
            (ROOT, CaptureRect::new(5, -3, 2, 2)),
            (0x2a00007, CaptureRect::new(0, 0, 1, 1)),
        ]
    );
}

#[test]
fn unsigned_coordinates_wrap_like_toolkit_integers() {
    let ws = FakeWindowSystem::new();
    let mut host = StandaloneHost::new();
    host.create_photo("shot");

    capture(&ws, &mut host, &["shot", "root", "4294967295", "0", "1", "1"]).unwrap();

    assert!(ws.requests().contains(&Request::GetImage {
        window: ROOT,
        rect: CaptureRect::new(-1, 0, 1, 1),
    }));
}

#[test]
fn capture_fills_the_named_photo() {
    let ws = FakeWindowSystem::with_pixels(1, vec![0x204060]);
    let mut host = StandaloneHost::new();
    host.create_photo("shot");

    capture(&ws, &mut host, &["shot", "root", "0", "0", "3", "2"]).unwrap();

    let photo = host.photo("shot").unwrap();
    assert_eq!(photo.size(), (3, 2));
    assert!(photo.pixels().chunks(4).all(|px| px == [0x20, 0x40, 0x60, 255]));
}

#[test]
fn missing_photo_fails_before_touching_the_window_system() {
    let ws = FakeWindowSystem::new();
    let mut host = StandaloneHost::new();

    let err = capture(&ws, &mut host, &["nope", "root", "0", "0", "4", "4"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "photo \"nope\" not found");
    assert!(ws.requests().is_empty());
}

#[test]
fn zero_area_capture_is_not_an_error() {
    let ws = FakeWindowSystem::new();
    let mut host = StandaloneHost::new();
    host.create_photo("shot");

    capture(&ws, &mut host, &["shot", "root", "0", "0", "0", "2"]).unwrap();

    assert_eq!(host.photo("shot").unwrap().size(), (0, 2));
    assert!(host.photo("shot").unwrap().pixels().is_empty());
    assert_eq!(ws.snapshots_released(), 1);
}

#[test]
fn window_system_refusal_is_a_capture_error_and_leaves_photo_alone() {
    let mut ws = FakeWindowSystem::new();
    ws.fail_get_image = true;
    let mut photo = RecordingPhoto {
        size: (8, 8),
        ..Default::default()
    };

    let err = capture_region(&ws, &mut photo, WindowRef::Id(42), CaptureRect::new(0, 0, 4, 4))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Capture);
    assert!(err.message.starts_with("XGetImage failed"));
    assert!(photo.ops.is_empty());
    assert_eq!(photo.size(), (8, 8));
}

#[test]
fn allocation_failure_releases_the_snapshot() {
    let ws = FakeWindowSystem::new();
    let mut photo = RecordingPhoto::default();

    let err = capture_region(
        &ws,
        &mut photo,
        WindowRef::Root,
        CaptureRect::new(0, 0, i32::MAX as u32, i32::MAX as u32),
    )
    .unwrap_err();

    assert_eq!(err.kind, ErrorKind::OutOfMemory);
    assert_eq!(err.message, "Memory allocation failed");
    assert_eq!(ws.get_image_count(), 1);
    assert_eq!(ws.snapshots_released(), 1);
    assert!(photo.ops.is_empty());
}

#[test]
fn snapshot_is_released_once_per_capture() {
    let ws = FakeWindowSystem::new();
    let mut photo = RecordingPhoto::default();
    for _ in 0..3 {
        capture_region(&ws, &mut photo, WindowRef::Root, CaptureRect::new(0, 0, 2, 2)).unwrap();
    }
    assert_eq!(ws.snapshots_released(), 3);
}

#[test]
fn bad_arguments_fail_without_reading_pixels() {
    let ws = FakeWindowSystem::new();
    let mut host = StandaloneHost::new();
    host.create_photo("shot");

    let err = capture(&ws, &mut host, &["shot", "desktop", "0", "0", "1", "1"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resolution);
    assert_eq!(err.message, "expected integer but got \"desktop\"");

    let err = capture(&ws, &mut host, &["shot", "root", "0", "1.5", "1", "1"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert_eq!(err.message, "expected integer but got \"1.5\"");

    let err = capture(&ws, &mut host, &["shot", "root", "0", "0", "-4", "1"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    let err = capture(&ws, &mut host, &["shot", "root", "0", "0", "1"]).unwrap_err();
    assert_eq!(
        err.message,
        "wrong # args: should be \"xgetimage::capture photo root|window x y width height\""
    );

    assert_eq!(ws.get_image_count(), 0);
}

#[test]
fn capture_without_display_is_refused() {
    let ws = FakeWindowSystem::new();
    let mut host = StandaloneHost::new();
    host.create_photo("shot");
    host.set_display_available(false);

    let err = capture(&ws, &mut host, &["shot", "root", "0", "0", "1", "1"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resolution);
    assert!(ws.requests().is_empty());
}
