//! Weighted reductions used by the aggregation functions
//!
//! An [`Aggregator`] collapses a flat list of values, optionally weighted, to one value.
//! [`Statistic`] provides the common reductions; other reductions can be plugged into
//! [`spaceagg`](crate::aggregation::spaceagg) and friends by implementing the trait.

use crate::dimensions::FloatValue;
use crate::errors::{ClimError, ClimResult};
use log::warn;
use serde::{Deserialize, Serialize};

/// A reduction of many values to one
pub trait Aggregator {
    /// Name used when annotating results
    fn name(&self) -> &str;

    /// Reduces `values`, weighting each by the matching entry of `weights` when given.
    ///
    /// # Errors
    ///
    /// Returns [`ClimError::WeightLengthMismatch`] if `weights` and `values` differ in length.
    fn aggregate(&self, values: &[FloatValue], weights: Option<&[FloatValue]>)
        -> ClimResult<FloatValue>;
}

impl<A: Aggregator + ?Sized> Aggregator for &A {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn aggregate(
        &self,
        values: &[FloatValue],
        weights: Option<&[FloatValue]>,
    ) -> ClimResult<FloatValue> {
        (**self).aggregate(values, weights)
    }
}

/// Common reductions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    /// Arithmetic mean; weighted mean `Σwx / Σw` when weighted
    Mean,
    /// Sum; `Σwx` when weighted
    Sum,
    /// Population variance, weighted by `w / Σw`
    Var,
    /// Square root of [`Statistic::Var`]
    Std,
    /// Minimum; weights are ignored
    Min,
    /// Maximum; weights are ignored
    Max,
}

impl Statistic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Var => "var",
            Self::Std => "std",
            Self::Min => "minimum",
            Self::Max => "maximum",
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn weighted_mean(values: &[FloatValue], weights: Option<&[FloatValue]>) -> FloatValue {
    match weights {
        Some(w) => {
            let total: FloatValue = w.iter().sum();
            if total == 0.0 {
                warn!("weights sum to zero, mean is undefined");
                return FloatValue::NAN;
            }
            values.iter().zip(w).map(|(x, w)| x * w).sum::<FloatValue>() / total
        }
        None => {
            if values.is_empty() {
                return FloatValue::NAN;
            }
            values.iter().sum::<FloatValue>() / values.len() as FloatValue
        }
    }
}

fn weighted_var(values: &[FloatValue], weights: Option<&[FloatValue]>) -> FloatValue {
    let mu = weighted_mean(values, weights);
    if mu.is_nan() {
        return FloatValue::NAN;
    }
    let squares: Vec<FloatValue> = values.iter().map(|x| (x - mu).powi(2)).collect();
    weighted_mean(&squares, weights)
}

impl Aggregator for Statistic {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn aggregate(
        &self,
        values: &[FloatValue],
        weights: Option<&[FloatValue]>,
    ) -> ClimResult<FloatValue> {
        if let Some(w) = weights {
            if w.len() != values.len() {
                return Err(ClimError::WeightLengthMismatch {
                    expected: values.len(),
                    got: w.len(),
                });
            }
        }

        let result = match self {
            Statistic::Mean => weighted_mean(values, weights),
            Statistic::Sum => match weights {
                Some(w) => values.iter().zip(w).map(|(x, w)| x * w).sum(),
                None => values.iter().sum(),
            },
            Statistic::Var => weighted_var(values, weights),
            Statistic::Std => weighted_var(values, weights).sqrt(),
            Statistic::Min => values
                .iter()
                .copied()
                .reduce(FloatValue::min)
                .unwrap_or(FloatValue::NAN),
            Statistic::Max => values
                .iter()
                .copied()
                .reduce(FloatValue::max)
                .unwrap_or(FloatValue::NAN),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn unweighted() {
        let values = [1.0, 2.0, 3.0, 6.0];
        assert_eq!(Statistic::Mean.aggregate(&values, None).unwrap(), 3.0);
        assert_eq!(Statistic::Sum.aggregate(&values, None).unwrap(), 12.0);
        assert_eq!(Statistic::Var.aggregate(&values, None).unwrap(), 3.5);
        assert!(is_close!(
            Statistic::Std.aggregate(&values, None).unwrap(),
            3.5_f64.sqrt()
        ));
        assert_eq!(Statistic::Min.aggregate(&values, None).unwrap(), 1.0);
        assert_eq!(Statistic::Max.aggregate(&values, None).unwrap(), 6.0);
    }

    #[test]
    fn weighted() {
        let values = [10.0, 20.0];
        let weights = [3.0, 1.0];
        // (30 + 20) / 4
        let mean = Statistic::Mean.aggregate(&values, Some(weights.as_slice())).unwrap();
        assert!(is_close!(mean, 12.5), "Expected 12.5, got {}", mean);
        let sum = Statistic::Sum.aggregate(&values, Some(weights.as_slice())).unwrap();
        assert!(is_close!(sum, 50.0));
        // 0.75 * 2.5^2 + 0.25 * 7.5^2
        let var = Statistic::Var.aggregate(&values, Some(weights.as_slice())).unwrap();
        assert!(is_close!(var, 18.75), "Expected 18.75, got {}", var);
        assert_eq!(
            Statistic::Max.aggregate(&values, Some(weights.as_slice())).unwrap(),
            20.0
        );
    }

    #[test]
    fn weighted_mean_is_scale_invariant() {
        let values = [1.0, 1.0, 1.0];
        for weights in [[1.0, 1.0, 1.0], [0.1, 5.0, 2.0], [1e-6, 1e-6, 3.0]] {
            let mean = Statistic::Mean.aggregate(&values, Some(weights.as_slice())).unwrap();
            assert!(is_close!(mean, 1.0));
        }
    }

    #[test]
    fn empty_values() {
        assert!(Statistic::Mean.aggregate(&[], None).unwrap().is_nan());
        assert_eq!(Statistic::Sum.aggregate(&[], None).unwrap(), 0.0);
        assert!(Statistic::Max.aggregate(&[], None).unwrap().is_nan());
    }

    #[test]
    fn zero_weights_give_nan() {
        let mean = Statistic::Mean
            .aggregate(&[1.0, 2.0], Some([0.0, 0.0].as_slice()))
            .unwrap();
        assert!(mean.is_nan());
    }

    #[test]
    fn weight_length_mismatch() {
        let result = Statistic::Mean.aggregate(&[1.0, 2.0], Some([1.0].as_slice()));
        assert_eq!(
            result,
            Err(ClimError::WeightLengthMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn names() {
        assert_eq!(Statistic::Mean.name(), "mean");
        assert_eq!(Statistic::Max.to_string(), "maximum");
        let by_ref: &dyn Aggregator = &Statistic::Sum;
        assert_eq!(by_ref.name(), "sum");
    }
}
