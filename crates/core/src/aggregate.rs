//! Average price over the records that carry a numeric price.

use crate::store::Document;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceAggregate {
    /// Mean of the numeric prices, or `None` when there are none.
    pub average: Option<f64>,
    /// Number of records that contributed to the mean.
    pub count: usize,
}

/// Computes the mean price over all records whose price is a JSON number.
///
/// Strings, booleans, nulls and missing prices are skipped rather than treated as errors.
/// The mean is accumulated incrementally so large prices cannot overflow an intermediate sum.
pub fn average(document: &Document) -> PriceAggregate {
    let (mean, count) = document
        .medicines
        .iter()
        .filter_map(|m| m.numeric_price())
        .fold((0.0_f64, 0_usize), |(mean, count), price| {
            let count = count + 1;
            (mean + (price - mean) / count as f64, count)
        });

    PriceAggregate {
        average: (count > 0).then_some(mean),
        count,
    }
}
