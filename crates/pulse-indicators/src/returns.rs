//! Return indicators.

use pulse_core::traits::Indicator;

/// Relative close-to-close change, `close[i] / close[i-1] - 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyReturn;

impl Indicator for DailyReturn {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        data.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
    }

    fn period(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "DailyReturn"
    }
}
