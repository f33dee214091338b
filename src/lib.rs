pub mod bookmarks;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod logger;
pub mod model;
pub mod overlay;
pub mod registry;
pub mod restore;
pub mod session;
pub mod setup_assignments;
pub mod view;
pub mod viewer;

pub use error::{PlacementError, RestoreError, SessionError};
pub use registry::{ViewFactory, ViewFactoryRegistry};
pub use restore::{PendingPlacements, PlacementOutcome, PlacementResult, RestorationResult, ViewRestorer};
pub use session::SessionDocument;
pub use view::{ModelView, Positionable, ViewContext, WindowBounds};
pub use viewer::{ViewerWindow, ViewerWindowFactory, VIEWER_KEY};
