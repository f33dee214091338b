use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::{DAffine3, DVec3};
use viewer_session::bookmarks::Bookmarks;
use viewer_session::camera::centering_translation;
use viewer_session::canvas::RecordingCanvas;
use viewer_session::config::{ViewerConfig, ViewerConfigOverrides};
use viewer_session::logger::StatusLogger;
use viewer_session::model::{Spot, SpotId};
use viewer_session::{ModelView, ViewContext, ViewerWindow};

fn viewer() -> ViewerWindow {
    ViewerWindow::new(&ViewContext::default(), ViewerConfig::default())
}

#[test]
fn centering_on_screen_center_only_moves_depth() {
    let window = viewer();
    let center = DVec3::new(400.0, 300.0, 5.0);
    let target = centering_translation(&window.transform(), center, 800, 600);
    assert_eq!((target.x, target.y), (0.0, 0.0));

    let t0 = Instant::now();
    window.center_on_at(center, t0);
    assert!(window.is_animating());
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    window.paint_at(&mut canvas, t0 + Duration::from_millis(300));
    assert!(!window.is_animating());
    assert_eq!(window.transform(), DAffine3 { matrix3: DAffine3::IDENTITY.matrix3, translation: target });
}

#[test]
fn newest_center_request_wins() {
    let window = viewer();
    let t0 = Instant::now();
    window.center_on_at(DVec3::new(0.0, 0.0, 0.0), t0);
    window.center_on_at(DVec3::new(100.0, 100.0, 0.0), t0);
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    window.paint_at(&mut canvas, t0 + Duration::from_secs(1));
    assert_eq!(window.transform().translation, DVec3::new(300.0, 200.0, 0.0));
}

#[test]
fn center_view_on_spot_uses_its_position() {
    let window = viewer();
    let spot = Spot::new(SpotId(3), 0, DVec3::new(50.0, 60.0, 2.0), 1.5);
    window.center_view_on(&spot);
    assert!(window.is_animating());
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    window.paint_at(&mut canvas, Instant::now() + Duration::from_secs(1));
    assert_eq!(window.transform().translation, DVec3::new(350.0, 240.0, -2.0));
}

#[test]
fn configured_duration_is_used() {
    let mut config = ViewerConfig::default();
    let applied =
        config.apply_overrides(&ViewerConfigOverrides { center_duration_ms: Some(50), ..Default::default() });
    assert_eq!(applied, vec!["center_duration_ms"]);
    let window = ViewerWindow::new(&ViewContext::default(), config);
    let t0 = Instant::now();
    window.center_on_at(DVec3::ZERO, t0);
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    assert!(!window.paint_at(&mut canvas, t0 + Duration::from_millis(50)).animating);
    assert!(!window.is_animating());
}

#[test]
fn odd_sized_frame_centers_on_whole_pixels() {
    let mut config = ViewerConfig::default();
    config.apply_overrides(&ViewerConfigOverrides { width: Some(801), height: Some(601), ..Default::default() });
    let window = ViewerWindow::new(&ViewContext::default(), config);
    let t0 = Instant::now();
    window.center_on_at(DVec3::ZERO, t0);
    let mut canvas = RecordingCanvas::new(801.0, 601.0);
    window.paint_at(&mut canvas, t0 + Duration::from_secs(1));
    assert_eq!(window.transform().translation, DVec3::new(400.0, 300.0, 0.0));
}

#[test]
fn listeners_follow_the_animation() {
    let window = viewer();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    window.add_transform_listener(Arc::new(move |_: &DAffine3| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let t0 = Instant::now();
    window.center_on_at(DVec3::ZERO, t0);
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    window.paint_at(&mut canvas, t0 + Duration::from_millis(150));
    window.paint_at(&mut canvas, t0 + Duration::from_millis(300));
    window.paint_at(&mut canvas, t0 + Duration::from_millis(450));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn bookmark_jump_animates_full_pose() {
    let window = viewer();
    let mut bookmarks = Bookmarks::new();
    let pose = DAffine3::from_scale(DVec3::splat(2.0));
    bookmarks.insert("zoomed", pose);
    assert!(window.go_to_bookmark(&bookmarks, "zoomed"));
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    window.paint_at(&mut canvas, Instant::now() + Duration::from_secs(1));
    assert_eq!(window.transform(), pose);
}

#[test]
fn concurrent_centering_while_painting_ends_idle() {
    let _ = env_logger::builder().is_test(true).try_init();
    let window = Arc::new(viewer());
    let producer = {
        let window = Arc::clone(&window);
        let logger = window.logger();
        thread::spawn(move || {
            for i in 0..200 {
                window.center_on(DVec3::new(f64::from(i), f64::from(i) * 2.0, 0.0));
                logger.set_progress(f64::from(i) / 200.0);
            }
        })
    };
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    while !producer.is_finished() {
        window.paint(&mut canvas);
        canvas.clear();
    }
    producer.join().expect("producer thread");

    let late = Instant::now() + Duration::from_secs(10);
    window.paint_at(&mut canvas, late);
    assert!(!window.is_animating());
    assert_eq!(window.transform().translation, DVec3::new(400.0 - 199.0, 300.0 - 398.0, 0.0));
}
