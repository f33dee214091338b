use glam::DVec2;

/// 2D drawing surface the host hands to a window's paint tick.
pub trait Canvas {
    fn size(&self) -> DVec2;
    fn draw_circle(&mut self, center: DVec2, radius: f64, color: [f32; 4]);
    fn draw_text(&mut self, anchor: DVec2, text: &str, size: f32, color: [f32; 4]);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle { center: DVec2, radius: f64, color: [f32; 4] },
    Text { anchor: DVec2, text: String, size: f32, color: [f32; 4] },
}

/// Canvas that records draw calls instead of rasterizing them.
///
/// Used by headless hosts and tests to inspect what a frame contained.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: DVec2,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { size: DVec2::new(width, height), commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            DrawCommand::Circle { .. } => None,
        })
    }

    pub fn circle_count(&self) -> usize {
        self.commands.iter().filter(|command| matches!(command, DrawCommand::Circle { .. })).count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> DVec2 {
        self.size
    }

    fn draw_circle(&mut self, center: DVec2, radius: f64, color: [f32; 4]) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn draw_text(&mut self, anchor: DVec2, text: &str, size: f32, color: [f32; 4]) {
        self.commands.push(DrawCommand::Text { anchor, text: text.to_string(), size, color });
    }
}
