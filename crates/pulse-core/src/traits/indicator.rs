//! Indicator trait definitions.

/// Trait for indicators computed over a price slice.
///
/// Indicators process price data and produce derived values; the first
/// value corresponds to input position [`Indicator::warmup`].
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closes)
    ///
    /// # Returns
    /// `data.len() - warmup()` values, or none when there is not enough data
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the number of input points one output depends on.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Leading input positions that have no output.
    fn warmup(&self) -> usize {
        self.period().saturating_sub(1)
    }

    /// Calculate and align the result with the input, padding the warmup
    /// positions with `None`.
    fn aligned(&self, data: &[f64]) -> Vec<Option<Self::Output>> {
        let warmup = self.warmup().min(data.len());
        let mut values = self.calculate(data).into_iter();
        (0..data.len())
            .map(|i| if i < warmup { None } else { values.next() })
            .collect()
    }
}
