//! Shared analysis model read by every viewer window.
//!
//! The tracking algorithms that populate it live elsewhere; this module only
//! exposes what the viewers need: spots grouped by timepoint, feature lookup,
//! and the current selection.

use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

pub const POSITION_X: &str = "POSITION_X";
pub const POSITION_Y: &str = "POSITION_Y";
pub const POSITION_Z: &str = "POSITION_Z";
pub const RADIUS: &str = "RADIUS";
pub const QUALITY: &str = "QUALITY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpotId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
    pub frame: usize,
    features: BTreeMap<String, f64>,
}

impl Spot {
    pub fn new(id: SpotId, frame: usize, position: DVec3, radius: f64) -> Self {
        let mut features = BTreeMap::new();
        features.insert(POSITION_X.to_string(), position.x);
        features.insert(POSITION_Y.to_string(), position.y);
        features.insert(POSITION_Z.to_string(), position.z);
        features.insert(RADIUS.to_string(), radius);
        Self { id, name: format!("ID{}", id.0), frame, features }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn feature(&self, key: &str) -> Option<f64> {
        self.features.get(key).copied()
    }

    pub fn set_feature(&mut self, key: impl Into<String>, value: f64) {
        self.features.insert(key.into(), value);
    }

    pub fn position(&self) -> DVec3 {
        DVec3::new(
            self.feature(POSITION_X).unwrap_or_default(),
            self.feature(POSITION_Y).unwrap_or_default(),
            self.feature(POSITION_Z).unwrap_or_default(),
        )
    }

    pub fn radius(&self) -> f64 {
        self.feature(RADIUS).unwrap_or_default()
    }
}

/// Thread-safe spot store. Writers are analysis threads, readers are render ticks.
#[derive(Debug, Default)]
pub struct Model {
    spots: RwLock<BTreeMap<SpotId, Spot>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_spot(&self, spot: Spot) -> Option<Spot> {
        self.spots.write().unwrap_or_else(PoisonError::into_inner).insert(spot.id, spot)
    }

    pub fn remove_spot(&self, id: SpotId) -> Option<Spot> {
        self.spots.write().unwrap_or_else(PoisonError::into_inner).remove(&id)
    }

    pub fn spot(&self, id: SpotId) -> Option<Spot> {
        self.spots.read().unwrap_or_else(PoisonError::into_inner).get(&id).cloned()
    }

    pub fn spots_in_frame(&self, frame: usize) -> Vec<Spot> {
        self.spots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|spot| spot.frame == frame)
            .cloned()
            .collect()
    }

    pub fn spot_count(&self) -> usize {
        self.spots.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[derive(Debug, Default)]
pub struct SelectionModel {
    selected: RwLock<BTreeSet<SpotId>>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, id: SpotId) {
        self.selected.write().unwrap_or_else(PoisonError::into_inner).insert(id);
    }

    pub fn deselect(&self, id: SpotId) {
        self.selected.write().unwrap_or_else(PoisonError::into_inner).remove(&id);
    }

    pub fn clear(&self) {
        self.selected.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn is_selected(&self, id: SpotId) -> bool {
        self.selected.read().unwrap_or_else(PoisonError::into_inner).contains(&id)
    }
}

/// Acquisition settings of the image source the model was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source_name: String,
    pub n_timepoints: usize,
    pub calibration: DVec3,
}

impl Default for Settings {
    fn default() -> Self {
        Self { source_name: String::new(), n_timepoints: 1, calibration: DVec3::ONE }
    }
}
