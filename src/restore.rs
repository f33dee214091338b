//! Reconstruction of the windows listed in a session's GUI state.
//!
//! Windows are created synchronously and in document order. Their saved
//! screen bounds are applied by one short-lived worker per window; the
//! returned [`PendingPlacements`] is the join point for those workers.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::{PlacementError, RestoreError};
use crate::registry::ViewFactoryRegistry;
use crate::session::{SessionDocument, ViewDescriptor};
use crate::view::{ModelView, ViewContext, WindowBounds};

/// Aggregate outcome of reopening the windows of a session.
pub struct RestorationResult {
    windows: Vec<Arc<dyn ModelView>>,
    ok: bool,
    diagnostics: Vec<RestoreError>,
}

impl RestorationResult {
    fn failed(error: RestoreError) -> Self {
        Self { windows: Vec::new(), ok: false, diagnostics: vec![error] }
    }

    /// Created windows, in document order.
    pub fn windows(&self) -> &[Arc<dyn ModelView>] {
        &self.windows
    }

    /// `false` as soon as one descriptor could not be turned into a window.
    /// Placement problems do not count.
    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn diagnostics(&self) -> &[RestoreError] {
        &self.diagnostics
    }

    pub fn into_windows(self) -> Vec<Arc<dyn ModelView>> {
        self.windows
    }
}

impl std::fmt::Debug for RestorationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestorationResult")
            .field("windows", &self.windows.iter().map(|w| w.key().to_string()).collect::<Vec<_>>())
            .field("ok", &self.ok)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementResult {
    Applied(WindowBounds),
    /// The descriptor carried no bounds at all.
    Skipped,
    Failed(PlacementError),
}

/// Result of one placement task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    /// Index of the view element in the document.
    pub index: usize,
    pub kind: String,
    pub result: PlacementResult,
}

/// Outstanding placement tasks of one restoration.
///
/// Dropping the handle detaches the workers; they still run to completion.
#[derive(Debug)]
pub struct PendingPlacements {
    rx: Receiver<PlacementOutcome>,
    remaining: usize,
}

impl PendingPlacements {
    fn none() -> Self {
        let (_, rx) = crossbeam_channel::bounded(0);
        Self { rx, remaining: 0 }
    }

    /// Placement tasks whose outcome has not been collected yet.
    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Collects the outcomes that arrive before `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Vec<PlacementOutcome> {
        let deadline = Instant::now() + timeout;
        let mut outcomes = Vec::new();
        while self.remaining > 0 {
            match self.rx.recv_deadline(deadline) {
                Ok(outcome) => {
                    self.remaining -= 1;
                    outcomes.push(outcome);
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    log::warn!("[restore] {} placement task(s) ended without reporting", self.remaining);
                    self.remaining = 0;
                }
            }
        }
        outcomes
    }

    /// Blocks until every placement task has reported.
    pub fn wait_all(mut self) -> Vec<PlacementOutcome> {
        let mut outcomes = Vec::with_capacity(self.remaining);
        while self.remaining > 0 {
            match self.rx.recv() {
                Ok(outcome) => {
                    self.remaining -= 1;
                    outcomes.push(outcome);
                }
                Err(_) => {
                    log::warn!("[restore] {} placement task(s) ended without reporting", self.remaining);
                    break;
                }
            }
        }
        outcomes
    }
}

pub struct ViewRestorer;

impl ViewRestorer {
    /// Reopens every view of `document` through `registry`.
    ///
    /// Never fails as a whole: per-view problems end up in the diagnostics of
    /// the returned result and processing moves on to the next view.
    pub fn restore(
        document: &SessionDocument,
        registry: &ViewFactoryRegistry,
        context: &ViewContext,
    ) -> (RestorationResult, PendingPlacements) {
        let Some(descriptors) = document.view_descriptors() else {
            let error = RestoreError::MissingGuiState;
            log::error!("[restore] {error}");
            return (RestorationResult::failed(error), PendingPlacements::none());
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        let (windows, diagnostics, scheduled) = descriptors
            .into_iter()
            .map(|descriptor| Self::open_view(descriptor, registry, context))
            .fold((Vec::new(), Vec::new(), 0usize), |(mut windows, mut diagnostics, scheduled), opened| {
                match opened {
                    Ok((descriptor, kind, window)) => {
                        schedule_placement(descriptor, kind, Arc::clone(&window), &tx);
                        windows.push(window);
                        (windows, diagnostics, scheduled + 1)
                    }
                    Err(error) => {
                        log::error!("[restore] {error}");
                        diagnostics.push(error);
                        (windows, diagnostics, scheduled)
                    }
                }
            });
        drop(tx);

        log::info!(
            "[restore] reopened {} window(s), {} diagnostic(s), {} placement task(s)",
            windows.len(),
            diagnostics.len(),
            scheduled
        );
        let ok = diagnostics.is_empty();
        (RestorationResult { windows, ok, diagnostics }, PendingPlacements { rx, remaining: scheduled })
    }

    fn open_view(
        descriptor: ViewDescriptor,
        registry: &ViewFactoryRegistry,
        context: &ViewContext,
    ) -> Result<(ViewDescriptor, String, Arc<dyn ModelView>), RestoreError> {
        let kind = descriptor
            .kind
            .clone()
            .ok_or(RestoreError::MissingViewKind { index: descriptor.index })?;
        let factory =
            registry.factory(&kind).ok_or_else(|| RestoreError::UnknownViewKind { kind: kind.clone() })?;
        let window = factory
            .create(&context.model, &context.settings, &context.selection, &context.display_settings)
            .map_err(|source| RestoreError::FactoryFailed { kind: kind.clone(), source })?;
        Ok((descriptor, kind, window))
    }
}

fn schedule_placement(
    descriptor: ViewDescriptor,
    kind: String,
    window: Arc<dyn ModelView>,
    tx: &Sender<PlacementOutcome>,
) {
    let index = descriptor.index;
    let worker_tx = tx.clone();
    // The closure is moved into the builder; keep what the inline fallback needs.
    let fallback = (descriptor.clone(), kind.clone(), Arc::clone(&window));
    let spawned = thread::Builder::new().name(format!("view-placement-{index}")).spawn(move || {
        let outcome = place(&descriptor, kind, window.as_ref());
        let _ = worker_tx.send(outcome);
    });
    if let Err(err) = spawned {
        log::warn!("[restore] failed to spawn placement worker for view #{index}: {err}; placing inline");
        let (descriptor, kind, window) = fallback;
        let _ = tx.send(place(&descriptor, kind, window.as_ref()));
    }
}

fn place(descriptor: &ViewDescriptor, kind: String, window: &dyn ModelView) -> PlacementOutcome {
    let result = match apply_saved_bounds(descriptor, &kind, window) {
        Ok(Some(bounds)) => PlacementResult::Applied(bounds),
        Ok(None) => PlacementResult::Skipped,
        Err(err) => {
            log::warn!("[restore] could not restore bounds of view #{} ({kind}): {err}", descriptor.index);
            PlacementResult::Failed(err)
        }
    };
    PlacementOutcome { index: descriptor.index, kind, result }
}

fn apply_saved_bounds(
    descriptor: &ViewDescriptor,
    kind: &str,
    window: &dyn ModelView,
) -> Result<Option<WindowBounds>, PlacementError> {
    let Some(bounds) = descriptor.bounds()? else {
        return Ok(None);
    };
    let positionable =
        window.as_positionable().ok_or_else(|| PlacementError::NotPositionable { kind: kind.to_string() })?;
    positionable.apply_bounds(bounds);
    Ok(Some(bounds))
}
