//! Raw series to processed series.

use pulse_core::error::TransformError;
use pulse_core::traits::Indicator;
use pulse_core::types::{ProcessedObservation, ProcessedSeries, RawObservation, RawSeries};
use tracing::debug;

use crate::{DailyReturn, Sma};

/// Observations averaged by `sma_20`.
pub const SMA_WINDOW: usize = 20;

/// Derive `daily_return` and `sma_20` for every complete observation.
///
/// Observations with a missing (or `NaN`) field are dropped first; both
/// metrics are then computed over the compacted sequence, so a dropped day
/// never leaves a hole inside a window. An input with nothing left after the
/// drop produces an empty series.
pub fn transform(raw: &RawSeries) -> Result<ProcessedSeries, TransformError> {
    let rows: Vec<ProcessedObservation> = raw.iter().filter_map(complete).collect();
    let dropped = raw.len() - rows.len();

    validate(&rows)?;

    let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
    let returns = DailyReturn.aligned(&closes);
    let sma = Sma::new(SMA_WINDOW).aligned(&closes);

    let observations: Vec<ProcessedObservation> = rows
        .into_iter()
        .zip(returns.into_iter().zip(sma))
        .map(|(row, (daily_return, sma_20))| ProcessedObservation {
            daily_return,
            sma_20,
            ..row
        })
        .collect();

    debug!(
        symbol = %raw.symbol,
        rows = observations.len(),
        dropped,
        "Transformed series"
    );

    Ok(ProcessedSeries::new(observations))
}

fn complete(obs: &RawObservation) -> Option<ProcessedObservation> {
    if !obs.is_complete() {
        return None;
    }
    Some(ProcessedObservation {
        date: obs.date,
        open: obs.open?,
        high: obs.high?,
        low: obs.low?,
        close: obs.close?,
        volume: obs.volume?,
        daily_return: None,
        sma_20: None,
    })
}

fn validate(rows: &[ProcessedObservation]) -> Result<(), TransformError> {
    for row in rows {
        let fields = [
            ("open", row.open),
            ("high", row.high),
            ("low", row.low),
            ("close", row.close),
            ("volume", row.volume),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TransformError::NonFinite {
                    date: row.date,
                    field,
                });
            }
            if value < 0.0 {
                return Err(TransformError::Negative {
                    date: row.date,
                    field,
                    value,
                });
            }
        }
        if row.close == 0.0 {
            return Err(TransformError::ZeroClose(row.date));
        }
    }

    for pair in rows.windows(2) {
        let (previous, current) = (pair[0].date, pair[1].date);
        if current == previous {
            return Err(TransformError::DuplicateDate(current));
        }
        if current < previous {
            return Err(TransformError::OutOfOrder { previous, current });
        }
    }

    Ok(())
}
