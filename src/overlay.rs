use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{DAffine3, DVec2};

use crate::canvas::Canvas;
use crate::display::DisplaySettings;
use crate::model::{Model, SelectionModel};

/// Portion of a text overlay's life spent fading out.
const FADE_FRACTION: f64 = 0.2;

/// Short-lived status text drawn over the view until it expires.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    text: String,
    created_at: Instant,
    duration: Duration,
}

impl TextOverlay {
    pub fn new(text: impl Into<String>, created_at: Instant, duration: Duration) -> Self {
        Self { text: text.into(), created_at, duration }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }

    /// Opacity at `now`: opaque, then a linear fade over the last part of its life.
    pub fn alpha(&self, now: Instant) -> f32 {
        if self.duration.is_zero() || self.is_complete(now) {
            return 0.0;
        }
        let t = now.saturating_duration_since(self.created_at).as_secs_f64() / self.duration.as_secs_f64();
        let fade_start = 1.0 - FADE_FRACTION;
        if t <= fade_start {
            1.0
        } else {
            ((1.0 - t) / FADE_FRACTION) as f32
        }
    }

    pub fn paint(&self, canvas: &mut dyn Canvas, now: Instant, font_size: f32, color: [f32; 4]) {
        let size = canvas.size();
        let anchor = DVec2::new(size.x / 2.0, size.y - f64::from(font_size) * 2.0);
        let [r, g, b, a] = color;
        canvas.draw_text(anchor, &self.text, font_size, [r, g, b, a * self.alpha(now)]);
    }
}

/// Overlay bound to the shared model: draws the spots of the current timepoint.
#[derive(Debug, Clone)]
pub struct ModelOverlay {
    model: Arc<Model>,
    selection: Arc<SelectionModel>,
    display: Arc<DisplaySettings>,
}

impl ModelOverlay {
    pub fn new(model: Arc<Model>, selection: Arc<SelectionModel>, display: Arc<DisplaySettings>) -> Self {
        Self { model, selection, display }
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Draws every spot of `timepoint` that intersects the displayed slice.
    ///
    /// Returns the number of spots drawn.
    pub fn paint(&self, canvas: &mut dyn Canvas, transform: &DAffine3, timepoint: usize) -> usize {
        let scale = transform.matrix3.determinant().abs().cbrt();
        let mut drawn = 0;
        for spot in self.model.spots_in_frame(timepoint) {
            let projected = transform.transform_point3(spot.position());
            let radius = spot.radius() * self.display.radius_ratio * scale;
            let depth = projected.z.abs();
            if depth >= radius {
                continue;
            }
            let slice_radius = (radius * radius - depth * depth).sqrt();
            let center = DVec2::new(projected.x, projected.y);
            let color = if self.selection.is_selected(spot.id) {
                self.display.selection_color
            } else {
                self.display.spot_color
            };
            canvas.draw_circle(center, slice_radius, color);
            if self.display.show_labels {
                let anchor = center + DVec2::new(slice_radius, -slice_radius);
                canvas.draw_text(anchor, &spot.name, 12.0, self.display.text_color);
            }
            drawn += 1;
        }
        drawn
    }
}
