//! Viewer window: camera transform, model overlay, transient status text and
//! the "center on spot" animation, all driven by the host's paint ticks.
//!
//! The host render thread calls [`ViewerWindow::paint`] repeatedly. Any other
//! thread may call [`ViewerWindow::center_on`] or push status messages through
//! a [`ViewerLogger`] at the same time.

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use anyhow::Result;
use glam::{DAffine3, DVec3};
use uuid::Uuid;

use crate::bookmarks::Bookmarks;
use crate::camera::{centering_translation, TransformAnimator};
use crate::canvas::Canvas;
use crate::config::ViewerConfig;
use crate::display::DisplaySettings;
use crate::logger::{StatusMailbox, ViewerLogger};
use crate::model::{Model, SelectionModel, Settings, Spot};
use crate::overlay::{ModelOverlay, TextOverlay};
use crate::registry::ViewFactory;
use crate::view::{ModelView, Positionable, ViewContext, WindowBounds};

pub const VIEWER_KEY: &str = "VIEWER";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Observer of the live camera transform.
pub trait TransformListener: Send + Sync {
    fn transform_changed(&self, transform: &DAffine3);
}

impl<F> TransformListener for F
where
    F: Fn(&DAffine3) + Send + Sync,
{
    fn transform_changed(&self, transform: &DAffine3) {
        self(transform)
    }
}

/// Top-level window hosting a viewer. Owns the on-screen placement.
#[derive(Debug)]
pub struct ViewerFrame {
    title: String,
    bounds: Mutex<WindowBounds>,
}

impl ViewerFrame {
    pub fn new(title: impl Into<String>, bounds: WindowBounds) -> Self {
        Self { title: title.into(), bounds: Mutex::new(bounds) }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> i32 {
        lock(&self.bounds).width
    }

    pub fn height(&self) -> i32 {
        lock(&self.bounds).height
    }
}

impl Positionable for ViewerFrame {
    fn set_location(&self, x: i32, y: i32) {
        let mut bounds = lock(&self.bounds);
        bounds.x = x;
        bounds.y = y;
    }

    fn set_size(&self, width: i32, height: i32) {
        let mut bounds = lock(&self.bounds);
        bounds.width = width;
        bounds.height = height;
    }

    fn bounds(&self) -> WindowBounds {
        *lock(&self.bounds)
    }
}

/// What a single paint tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaintReport {
    pub animating: bool,
    pub spots_drawn: usize,
    pub status_text: Option<String>,
}

pub struct ViewerWindow {
    id: Uuid,
    frame: Arc<ViewerFrame>,
    model: Arc<Model>,
    selection: Arc<SelectionModel>,
    display: Arc<DisplaySettings>,
    settings: Arc<Settings>,
    config: ViewerConfig,
    transform: Mutex<DAffine3>,
    animation: Mutex<Option<TransformAnimator>>,
    model_overlay: Mutex<Option<ModelOverlay>>,
    text_overlay: Mutex<Option<Arc<TextOverlay>>>,
    status: Arc<StatusMailbox>,
    timepoint: AtomicUsize,
    repaint_requested: Arc<AtomicBool>,
    listeners: Mutex<Vec<Arc<dyn TransformListener>>>,
}

impl ViewerWindow {
    pub fn new(context: &ViewContext, config: ViewerConfig) -> Self {
        let bounds =
            WindowBounds { x: 0, y: 0, width: config.window.width, height: config.window.height };
        let repaint_requested = Arc::new(AtomicBool::new(false));
        let status = Arc::new(StatusMailbox::new(Arc::clone(&repaint_requested)));
        Self {
            id: Uuid::new_v4(),
            frame: Arc::new(ViewerFrame::new(config.window.title.clone(), bounds)),
            model: Arc::clone(&context.model),
            selection: Arc::clone(&context.selection),
            display: Arc::clone(&context.display_settings),
            settings: Arc::clone(&context.settings),
            config,
            transform: Mutex::new(DAffine3::IDENTITY),
            animation: Mutex::new(None),
            model_overlay: Mutex::new(None),
            text_overlay: Mutex::new(None),
            status,
            timepoint: AtomicUsize::new(0),
            repaint_requested,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn frame(&self) -> &Arc<ViewerFrame> {
        &self.frame
    }

    /// Logger echoing every status input to this window's transient overlay.
    pub fn logger(&self) -> ViewerLogger {
        ViewerLogger::new(&self.status)
    }

    pub fn transform(&self) -> DAffine3 {
        *lock(&self.transform)
    }

    /// Replaces the camera transform, e.g. after user interaction.
    pub fn set_transform(&self, transform: DAffine3) {
        *lock(&self.transform) = transform;
        self.notify_transform_changed(&transform);
        self.request_repaint();
    }

    pub fn add_transform_listener(&self, listener: Arc<dyn TransformListener>) {
        lock(&self.listeners).push(listener);
    }

    pub fn current_timepoint(&self) -> usize {
        self.timepoint.load(Ordering::Acquire)
    }

    /// Moves to `timepoint`, clamped to the timepoints of the source.
    pub fn set_timepoint(&self, timepoint: usize) {
        let last = self.settings.n_timepoints.saturating_sub(1);
        self.timepoint.store(timepoint.min(last), Ordering::Release);
        self.request_repaint();
    }

    pub fn is_animating(&self) -> bool {
        lock(&self.animation).is_some()
    }

    pub fn has_model_overlay(&self) -> bool {
        lock(&self.model_overlay).is_some()
    }

    /// Transient overlay currently installed, if any.
    pub fn text_overlay(&self) -> Option<Arc<TextOverlay>> {
        lock(&self.text_overlay).clone()
    }

    pub fn request_repaint(&self) {
        self.repaint_requested.store(true, Ordering::Release);
    }

    /// Consumes a pending repaint request. Event-driven hosts poll this after each tick.
    pub fn take_repaint_request(&self) -> bool {
        self.repaint_requested.swap(false, Ordering::AcqRel)
    }

    pub fn center_on(&self, point: DVec3) {
        self.center_on_at(point, Instant::now());
    }

    /// Starts animating the camera so that `point` ends up in the middle of the frame.
    ///
    /// Replaces any animation still in flight.
    pub fn center_on_at(&self, point: DVec3, now: Instant) {
        let (width, height) = (self.frame.width(), self.frame.height());
        let duration = self.config.animation.center_duration();
        let current = {
            let mut animation = lock(&self.animation);
            let current = *lock(&self.transform);
            let target = centering_translation(&current, point, width, height);
            *animation = Some(TransformAnimator::translation(current, target, now, duration));
            current
        };
        self.notify_transform_changed(&current);
        self.request_repaint();
    }

    /// Animates toward the bookmarked transform. Returns `false` for an unknown key.
    pub fn go_to_bookmark(&self, bookmarks: &Bookmarks, key: &str) -> bool {
        let Some(target) = bookmarks.get(key).copied() else {
            log::warn!("[viewer] unknown bookmark '{key}'");
            return false;
        };
        let duration = self.config.animation.center_duration();
        {
            let mut animation = lock(&self.animation);
            let current = *lock(&self.transform);
            *animation = Some(TransformAnimator::new(current, target, Instant::now(), duration));
        }
        self.request_repaint();
        true
    }

    pub fn paint(&self, canvas: &mut dyn Canvas) -> PaintReport {
        self.paint_at(canvas, Instant::now())
    }

    /// One render tick at time `now`.
    pub fn paint_at(&self, canvas: &mut dyn Canvas, now: Instant) -> PaintReport {
        let mut report = PaintReport::default();

        let animated = {
            let mut animation = lock(&self.animation);
            animation.take().map(|animator| {
                let transform = animator.sample(now);
                *lock(&self.transform) = transform;
                let complete = animator.is_complete(now);
                if !complete {
                    *animation = Some(animator);
                }
                (transform, complete)
            })
        };
        if let Some((transform, complete)) = animated {
            self.notify_transform_changed(&transform);
            report.animating = !complete;
            if !complete {
                self.request_repaint();
            }
        }

        self.install_pending_status();

        let model_overlay = lock(&self.model_overlay).clone();
        if let Some(overlay) = model_overlay {
            report.spots_drawn = overlay.paint(canvas, &self.transform(), self.current_timepoint());
        }

        let text_overlay = self.text_overlay();
        if let Some(overlay) = text_overlay {
            if overlay.is_complete(now) {
                let mut slot = lock(&self.text_overlay);
                if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &overlay)) {
                    *slot = None;
                }
            } else {
                overlay.paint(canvas, now, self.config.overlay.font_size, self.display.text_color);
                report.status_text = Some(overlay.text().to_string());
            }
            self.request_repaint();
        }

        report
    }

    /// Moves the pending status message, if any, into the transient overlay slot.
    fn install_pending_status(&self) {
        let Some(latest) = self.status.take() else {
            return;
        };
        let overlay = TextOverlay::new(
            latest.overlay_text(),
            latest.created_at,
            self.config.overlay.text_display_duration(),
        );
        *lock(&self.text_overlay) = Some(Arc::new(overlay));
    }

    fn notify_transform_changed(&self, transform: &DAffine3) {
        let listeners = lock(&self.listeners).clone();
        for listener in listeners {
            listener.transform_changed(transform);
        }
    }
}

impl ModelView for ViewerWindow {
    fn key(&self) -> &str {
        VIEWER_KEY
    }

    fn render(&self) {
        let overlay = ModelOverlay::new(
            Arc::clone(&self.model),
            Arc::clone(&self.selection),
            Arc::clone(&self.display),
        );
        *lock(&self.model_overlay) = Some(overlay);
        self.request_repaint();
    }

    fn refresh(&self) {
        self.request_repaint();
    }

    fn clear(&self) {
        *lock(&self.model_overlay) = None;
        self.request_repaint();
    }

    fn center_view_on(&self, spot: &Spot) {
        self.center_on(spot.position());
    }

    fn model(&self) -> &Arc<Model> {
        &self.model
    }

    fn as_positionable(&self) -> Option<&dyn Positionable> {
        Some(self.frame.as_ref())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds [`ViewerWindow`]s sized from the viewer configuration.
#[derive(Debug, Clone, Default)]
pub struct ViewerWindowFactory {
    config: ViewerConfig,
}

impl ViewerWindowFactory {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }
}

impl ViewFactory for ViewerWindowFactory {
    fn key(&self) -> &str {
        VIEWER_KEY
    }

    fn create(
        &self,
        model: &Arc<Model>,
        settings: &Arc<Settings>,
        selection: &Arc<SelectionModel>,
        display_settings: &Arc<DisplaySettings>,
    ) -> Result<Arc<dyn ModelView>> {
        let context = ViewContext::new(
            Arc::clone(model),
            Arc::clone(settings),
            Arc::clone(selection),
            Arc::clone(display_settings),
        );
        let window = ViewerWindow::new(&context, self.config.clone());
        log::debug!("[viewer] created window {}", window.id());
        Ok(Arc::new(window))
    }
}
