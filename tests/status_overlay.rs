use std::sync::Arc;
use std::time::Duration;

use glam::DVec3;
use viewer_session::canvas::{DrawCommand, RecordingCanvas};
use viewer_session::config::ViewerConfig;
use viewer_session::display::DisplaySettings;
use viewer_session::logger::StatusLogger;
use viewer_session::model::{Model, SelectionModel, Settings, Spot, SpotId};
use viewer_session::{ModelView, ViewContext, ViewerWindow};

fn viewer() -> ViewerWindow {
    ViewerWindow::new(&ViewContext::default(), ViewerConfig::default())
}

#[test]
fn newest_progress_replaces_older_one() {
    let window = viewer();
    let logger = window.logger();
    logger.set_progress(0.10);
    logger.set_progress(0.20);
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    for _ in 0..3 {
        let report = window.paint(&mut canvas);
        assert_eq!(report.status_text.as_deref(), Some("20%"));
    }
    assert!(canvas.texts().all(|text| text == "20%"));
}

#[test]
fn progress_is_rounded_to_a_percentage() {
    let window = viewer();
    window.logger().set_progress(0.456);
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    assert_eq!(window.paint(&mut canvas).status_text.as_deref(), Some("46%"));
}

#[test]
fn text_kinds_show_verbatim() {
    let window = viewer();
    let logger = window.logger();
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    logger.set_status("Tracking");
    assert_eq!(window.paint(&mut canvas).status_text.as_deref(), Some("Tracking"));
    logger.log("Found 12 spots");
    assert_eq!(window.paint(&mut canvas).status_text.as_deref(), Some("Found 12 spots"));
    logger.error("Detection failed");
    assert_eq!(window.paint(&mut canvas).status_text.as_deref(), Some("Detection failed"));
}

#[test]
fn overlay_expires_after_display_time() {
    let window = viewer();
    window.logger().set_status("Saving");
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    window.paint(&mut canvas);
    let overlay = window.text_overlay().expect("overlay installed");
    assert!(window.take_repaint_request());

    let expired = overlay.created_at() + Duration::from_millis(3_000);
    canvas.clear();
    let report = window.paint_at(&mut canvas, expired);
    assert_eq!(report.status_text, None);
    assert!(window.text_overlay().is_none());
    assert_eq!(canvas.texts().count(), 0);
    assert!(window.take_repaint_request());

    window.paint_at(&mut canvas, expired + Duration::from_millis(16));
    assert!(!window.take_repaint_request());
}

#[test]
fn messages_to_a_closed_window_are_dropped() {
    let window = viewer();
    let logger = window.logger();
    drop(window);
    logger.set_status("still running");
    logger.set_progress(1.0);
}

#[test]
fn persistent_overlay_tracks_model_and_timepoint() {
    let model = Arc::new(Model::new());
    model.add_spot(Spot::new(SpotId(1), 0, DVec3::new(100.0, 100.0, 0.0), 5.0));
    model.add_spot(Spot::new(SpotId(2), 1, DVec3::new(200.0, 100.0, 0.0), 5.0));
    model.add_spot(Spot::new(SpotId(3), 1, DVec3::new(300.0, 100.0, 1.0), 5.0));
    let selection = Arc::new(SelectionModel::new());
    selection.select(SpotId(3));
    let display = Arc::new(DisplaySettings::default());
    let settings = Arc::new(Settings { n_timepoints: 2, ..Settings::default() });
    let context = ViewContext::new(Arc::clone(&model), settings, selection, Arc::clone(&display));
    let window = ViewerWindow::new(&context, ViewerConfig::default());

    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    assert_eq!(window.paint(&mut canvas).spots_drawn, 0);

    window.render();
    assert_eq!(window.paint(&mut canvas).spots_drawn, 1);
    window.set_timepoint(1);
    canvas.clear();
    assert_eq!(window.paint(&mut canvas).spots_drawn, 2);
    let colors: Vec<_> = canvas
        .commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Circle { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert!(colors.contains(&display.selection_color));
    assert!(colors.contains(&display.spot_color));

    model.add_spot(Spot::new(SpotId(4), 1, DVec3::new(400.0, 100.0, 0.0), 5.0));
    assert_eq!(window.paint(&mut canvas).spots_drawn, 3);

    window.clear();
    assert_eq!(window.paint(&mut canvas).spots_drawn, 0);
}
