use serde::{Deserialize, Serialize};

use crate::{Color, ColumnField, Result, WaveConfig};

/// Axis-aligned rectangle in pixels, `top < bottom` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Drawing backend used by [`WaveRenderer`].
pub trait Canvas {
    fn draw_round_rect(&mut self, rect: Rect, radius: f32, color: Color) -> Result<()>;
}

/// One bar ready to be painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub rect: Rect,
    pub highlighted: bool,
}

/// Stateless painter for a [`ColumnField`].
///
/// Bars are centred on the horizontal midline of the field; highlighted bars
/// are painted first, then the rest.
#[derive(Debug, Clone)]
pub struct WaveRenderer {
    highlight_color: Color,
    base_color: Color,
    corner_radius: f32,
}

impl Default for WaveRenderer {
    fn default() -> Self {
        Self::new(&WaveConfig::default())
    }
}

impl WaveRenderer {
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            highlight_color: config.highlight_color,
            base_color: config.base_color,
            corner_radius: config.corner_radius,
        }
    }

    pub fn highlight_color(&self) -> Color {
        self.highlight_color
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    /// Geometry of every bar, left to right.
    pub fn bars<'a>(&self, field: &'a ColumnField) -> impl Iterator<Item = Bar> + 'a {
        let pitch = field.bar_width() + field.bar_offset();
        let bar_width = field.bar_width();
        let mid = field.height() * 0.5;

        (0..field.column_count()).map(move |index| {
            let left = index as f32 * pitch;
            let half = field.height_at(index) * 0.5;
            Bar {
                rect: Rect {
                    left,
                    top: mid - half,
                    right: left + bar_width,
                    bottom: mid + half,
                },
                highlighted: field.is_highlighted(index),
            }
        })
    }

    pub fn draw<C: Canvas + ?Sized>(&self, field: &ColumnField, canvas: &mut C) -> Result<()> {
        for bar in self.bars(field).filter(|bar| bar.highlighted) {
            canvas.draw_round_rect(bar.rect, self.corner_radius, self.highlight_color)?;
        }
        for bar in self.bars(field).filter(|bar| !bar.highlighted) {
            canvas.draw_round_rect(bar.rect, self.corner_radius, self.base_color)?;
        }
        Ok(())
    }
}
