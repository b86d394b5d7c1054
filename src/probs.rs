//! Utilities for working with probabilities.

/// Probabilities below this are treated as this value when taking logarithms.
pub const MIN_LOG_PROB: f64 = 1e-12;

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn normalise(&mut self, target: f64) -> f64;
    fn scale(&mut self, factor: f64);
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Rescales the elements so that they sum to `target`, returning the sum prior to rescaling.
    fn normalise(&mut self, target: f64) -> f64 {
        let sum = self.sum();
        self.scale(target / sum);
        sum
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }
}

/// Negative natural log of `prob`, clamped to `[MIN_LOG_PROB, 1]`.
pub fn log_loss(prob: f64) -> f64 {
    -prob.clamp(MIN_LOG_PROB, 1.0).ln()
}
