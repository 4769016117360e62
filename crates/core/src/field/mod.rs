use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Column;

/// Ordered row of oscillating columns, left to right.
///
/// The field is sized from the drawing width and rebuilt from scratch on
/// every resize. It also remembers how many of the leftmost columns are
/// highlighted for the current volume.
#[derive(Debug, Clone, Default)]
pub struct ColumnField {
    columns: Vec<Column>,
    height: f32,
    bar_width: f32,
    bar_offset: f32,
    highlight_count: usize,
}

/// Serializable copy of the field state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub heights: Vec<f32>,
    pub highlight_count: usize,
}

impl ColumnField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns that fit `width` pixels, counting a partially
    /// visible trailing column.
    pub fn column_count_for(width: f32, bar_width: f32, bar_offset: f32) -> usize {
        let pitch = f64::from(bar_width) + f64::from(bar_offset);
        if !(width > 0.0) || !(pitch > 0.0) {
            return 0;
        }
        (f64::from(width) / pitch).ceil() as usize
    }

    /// Rebuilds the field for a new drawing area.
    ///
    /// Every column is replaced with a freshly randomized one, so two calls
    /// with identical arguments only agree in distribution. The highlight
    /// count is clamped into the new range and should be refreshed from the
    /// volume source afterwards.
    pub fn resize<R: Rng + ?Sized>(
        &mut self,
        width: f32,
        height: f32,
        bar_width: f32,
        bar_offset: f32,
        rng: &mut R,
    ) {
        let count = Self::column_count_for(width, bar_width, bar_offset);
        let height = height.max(0.0);

        self.columns.clear();
        self.columns
            .extend((0..count).map(|_| Column::new(height, rng)));
        self.height = height;
        self.bar_width = bar_width;
        self.bar_offset = bar_offset;
        self.highlight_count = self.highlight_count.min(count);

        tracing::debug!(width, height, columns = count, "column field resized");
    }

    /// Recomputes how many leftmost columns are highlighted for the given
    /// volume reading. Returns `true` when the count changed.
    pub fn refresh_highlight(&mut self, current_volume: i32, max_volume: i32) -> bool {
        let count = highlight_count_for(self.columns.len(), current_volume, max_volume);
        let changed = count != self.highlight_count;
        self.highlight_count = count;
        changed
    }

    /// Advances every column by one step, in index order.
    pub fn tick(&mut self) {
        for column in &mut self.columns {
            column.advance();
        }
    }

    /// Height of column `index` in pixels.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.column_count()`.
    pub fn height_at(&self, index: usize) -> f32 {
        self.columns[index].current()
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        index < self.highlight_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn highlight_count(&self) -> usize {
        self.highlight_count
    }

    /// Pixel height of the field the columns were built for.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn bar_width(&self) -> f32 {
        self.bar_width
    }

    pub fn bar_offset(&self) -> f32 {
        self.bar_offset
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            heights: self.columns.iter().map(Column::current).collect(),
            highlight_count: self.highlight_count,
        }
    }
}

/// `floor(columns * current / max)`, with a non-positive `max` meaning no
/// highlight and out-of-range readings clamped to the field.
pub fn highlight_count_for(columns: usize, current_volume: i32, max_volume: i32) -> usize {
    if max_volume <= 0 || current_volume <= 0 {
        return 0;
    }
    let scaled = columns as i64 * i64::from(current_volume) / i64::from(max_volume);
    (scaled as usize).min(columns)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn field(width: f32, height: f32, seed: u64) -> ColumnField {
        let mut field = ColumnField::new();
        field.resize(width, height, 4.0, 8.0, &mut StdRng::seed_from_u64(seed));
        field
    }

    #[test]
    fn column_count_covers_partial_columns() {
        assert_eq!(field(100.0, 50.0, 0).column_count(), 9);
        assert_eq!(field(96.0, 50.0, 0).column_count(), 8);
        assert_eq!(field(1.0, 50.0, 0).column_count(), 1);
        assert_eq!(field(0.0, 50.0, 0).column_count(), 0);
    }

    #[test]
    fn degenerate_pitch_yields_empty_field() {
        assert_eq!(ColumnField::column_count_for(100.0, 0.0, 0.0), 0);
        assert_eq!(ColumnField::column_count_for(-5.0, 4.0, 8.0), 0);
        assert_eq!(ColumnField::column_count_for(f32::NAN, 4.0, 8.0), 0);
    }

    #[test]
    fn highlight_tracks_volume() {
        let mut field = field(100.0, 50.0, 1);

        assert!(field.refresh_highlight(3, 10));
        assert_eq!(field.highlight_count(), 2);
        assert!(field.is_highlighted(1));
        assert!(!field.is_highlighted(2));

        assert!(!field.refresh_highlight(3, 10));

        field.refresh_highlight(10, 10);
        assert_eq!(field.highlight_count(), 9);
        assert!(field.is_highlighted(8));
    }

    #[test]
    fn zero_max_volume_disables_highlight() {
        let mut field = field(100.0, 50.0, 2);
        field.refresh_highlight(5, 10);
        for volume in [0, 3, 15, i32::MAX] {
            field.refresh_highlight(volume, 0);
            assert_eq!(field.highlight_count(), 0);
        }
    }

    #[test]
    fn out_of_range_volume_is_clamped() {
        assert_eq!(highlight_count_for(9, 20, 10), 9);
        assert_eq!(highlight_count_for(9, -4, 10), 0);
        assert_eq!(highlight_count_for(9, 7, -1), 0);
        assert_eq!(highlight_count_for(0, 7, 10), 0);
    }

    #[test]
    fn resize_rebuilds_and_clamps_highlight() {
        let mut field = field(240.0, 50.0, 3);
        field.refresh_highlight(15, 15);
        assert_eq!(field.highlight_count(), 20);

        field.resize(60.0, 30.0, 4.0, 8.0, &mut StdRng::seed_from_u64(4));
        assert_eq!(field.column_count(), 5);
        assert_eq!(field.highlight_count(), 5);
        assert_eq!(field.height(), 30.0);
        assert!(field.columns().iter().all(|c| c.max() <= 30.0));
    }

    #[test]
    fn seeded_resize_is_reproducible() {
        assert_eq!(field(100.0, 80.0, 9).snapshot(), field(100.0, 80.0, 9).snapshot());
        assert_ne!(field(100.0, 80.0, 9).snapshot(), field(100.0, 80.0, 10).snapshot());
    }

    #[test]
    fn tick_advances_every_column() {
        let mut field = field(100.0, 80.0, 5);
        let mut expected: Vec<Column> = field.columns().to_vec();

        field.tick();
        for column in &mut expected {
            column.advance();
        }

        assert_eq!(field.columns(), expected.as_slice());
        for (index, column) in expected.iter().enumerate() {
            assert_eq!(field.height_at(index), column.current());
        }
    }

    #[test]
    #[should_panic]
    fn height_outside_field_is_a_contract_violation() {
        let field = field(100.0, 80.0, 6);
        field.height_at(9);
    }
}
