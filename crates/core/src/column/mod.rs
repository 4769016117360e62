use rand::Rng;

/// Lowest point of the oscillation range, as a share of the field height.
const MIN_SHARE: f32 = 0.4;
/// Base of the upper oscillation bound; a random share up to
/// [`MAX_SPREAD`] is added on top.
const MAX_BASE: f32 = 0.6;
const MAX_SPREAD: f32 = 0.4;
/// Per-tick step as a share of the oscillation range.
const STEP_SHARE: f32 = 0.05;

/// A single bar bouncing between two randomly chosen heights.
///
/// The bar moves by a fixed `step` every tick. Reaching either bound snaps the
/// height onto that bound and reverses direction; any overshoot is discarded
/// rather than reflected.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    min: f32,
    max: f32,
    current: f32,
    step: f32,
}

impl Column {
    /// Builds a column for a field that is `height` pixels tall.
    pub fn new<R: Rng + ?Sized>(height: f32, rng: &mut R) -> Self {
        let min = height * rng.random::<f32>() * MIN_SHARE;
        let max = height * (MAX_BASE + rng.random::<f32>() * MAX_SPREAD);
        let current = min + (max - min) * rng.random::<f32>();
        let step = (max - min) * STEP_SHARE * random_direction(rng);

        Self {
            min,
            max,
            current,
            step,
        }
    }

    /// Builds a column from explicit parameters. `current` is clamped into
    /// `[min, max]`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max` or either bound is NaN.
    pub fn with_bounds(min: f32, max: f32, current: f32, step: f32) -> Self {
        Self {
            min,
            max,
            current: current.clamp(min, max),
            step,
        }
    }

    /// Moves the column one step, bouncing off the bounds.
    pub fn advance(&mut self) {
        let next = self.current + self.step;
        if next >= self.max {
            self.current = self.max;
            self.step = -self.step;
        } else if next <= self.min {
            self.current = self.min;
            self.step = -self.step;
        } else {
            self.current = next;
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Current bar height in pixels.
    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

/// Uniformly picks `1.0` or `-1.0`; the midpoint draw goes up.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random::<f64>() < 0.5 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn random_columns_respect_height_shares() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let column = Column::new(200.0, &mut rng);
            assert!(column.min() >= 0.0 && column.min() < 80.0);
            assert!(column.max() >= 120.0 && column.max() <= 200.0);
            assert!(column.min() < column.max());
            assert!(column.current() >= column.min() && column.current() <= column.max());

            let expected_step = (column.max() - column.min()) * 0.05;
            assert!((column.step().abs() - expected_step).abs() < 1e-4);
        }
    }

    #[test]
    fn both_directions_are_drawn() {
        let mut rng = StdRng::seed_from_u64(11);
        let steps: Vec<f32> = (0..64)
            .map(|_| Column::new(100.0, &mut rng).step())
            .collect();
        assert!(steps.iter().any(|step| *step > 0.0));
        assert!(steps.iter().any(|step| *step < 0.0));
    }

    #[test]
    fn same_seed_builds_same_column() {
        let a = Column::new(64.0, &mut StdRng::seed_from_u64(3));
        let b = Column::new(64.0, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn clamps_to_max_and_turns_around() {
        let mut column = Column::with_bounds(10.0, 20.0, 19.0, 3.0);
        column.advance();
        assert_eq!(column.current(), 20.0);
        assert_eq!(column.step(), -3.0);

        column.advance();
        assert_eq!(column.current(), 17.0);
        assert_eq!(column.step(), -3.0);
    }

    #[test]
    fn clamps_to_min_and_turns_around() {
        let mut column = Column::with_bounds(10.0, 20.0, 11.0, -2.5);
        column.advance();
        assert_eq!(column.current(), 10.0);
        assert_eq!(column.step(), 2.5);
    }

    #[test]
    fn landing_exactly_on_a_bound_turns_around() {
        let mut column = Column::with_bounds(0.0, 10.0, 8.0, 2.0);
        column.advance();
        assert_eq!(column.current(), 10.0);
        assert_eq!(column.step(), -2.0);
    }

    #[test]
    fn never_leaves_bounds_and_keeps_step_magnitude() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut column = Column::new(120.0, &mut rng);
            let magnitude = column.step().abs();
            for _ in 0..400 {
                let before = column.step();
                column.advance();
                assert!(column.current() >= column.min());
                assert!(column.current() <= column.max());
                assert_eq!(column.step().abs(), magnitude);

                let clamped =
                    column.current() == column.min() || column.current() == column.max();
                if before != column.step() {
                    assert!(clamped, "direction changed without hitting a bound");
                }
            }
        }
    }

    #[test]
    fn flat_field_stays_flat() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut column = Column::new(0.0, &mut rng);
        for _ in 0..10 {
            column.advance();
            assert_eq!(column.current(), 0.0);
        }
    }
}
