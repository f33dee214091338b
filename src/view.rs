use std::any::Any;
use std::sync::Arc;

use crate::display::DisplaySettings;
use crate::model::{Model, SelectionModel, Settings, Spot};

/// Screen placement of a top-level window, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Capability of a window whose location and size can be set from outside.
///
/// Session restoration only talks to windows through this trait.
pub trait Positionable: Send + Sync {
    fn set_location(&self, x: i32, y: i32);
    fn set_size(&self, width: i32, height: i32);
    fn bounds(&self) -> WindowBounds;

    fn apply_bounds(&self, bounds: WindowBounds) {
        self.set_location(bounds.x, bounds.y);
        self.set_size(bounds.width, bounds.height);
    }
}

/// A live view of the shared model, as created by a view factory.
pub trait ModelView: Send + Sync {
    /// Kind identifier the view was registered under.
    fn key(&self) -> &str;

    /// Start drawing the model in this view.
    fn render(&self);

    /// Ask for a redraw with the current model content.
    fn refresh(&self);

    /// Stop drawing the model.
    fn clear(&self);

    fn center_view_on(&self, spot: &Spot);

    fn model(&self) -> &Arc<Model>;

    /// The placement capability, for views that own a positionable window.
    fn as_positionable(&self) -> Option<&dyn Positionable> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Everything a factory needs to build a view bound to the current session.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub model: Arc<Model>,
    pub settings: Arc<Settings>,
    pub selection: Arc<SelectionModel>,
    pub display_settings: Arc<DisplaySettings>,
}

impl ViewContext {
    pub fn new(
        model: Arc<Model>,
        settings: Arc<Settings>,
        selection: Arc<SelectionModel>,
        display_settings: Arc<DisplaySettings>,
    ) -> Self {
        Self { model, settings, selection, display_settings }
    }
}
