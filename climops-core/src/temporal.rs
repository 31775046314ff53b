//! Reductions over the time axis
//!
//! Time values are fractional years, so `2000.0` is the start of 2000 and `2000.5` is
//! roughly mid-year.

use crate::aggregation::dropagg;
use crate::array::{annotated_name, ClimArray, Reduced};
use crate::dimensions::{Axis, Dim, FloatValue};
use crate::errors::{ClimError, ClimResult};
use crate::stats::{Aggregator, Statistic};
use log::debug;

/// Unweighted mean over the time axis
pub fn timemean(a: &ClimArray) -> ClimResult<Reduced> {
    timeagg(&Statistic::Mean, a, None)
}

/// Reduces `a` over its time axis with `f`.
///
/// `weights`, when given, holds one weight per time step and is shared by every series.
/// Results that keep other axes are named `"<name>, temporally aggregated with <f>"`.
pub fn timeagg<F: Aggregator + ?Sized>(
    f: &F,
    a: &ClimArray,
    weights: Option<&[FloatValue]>,
) -> ClimResult<Reduced> {
    let ntime = a.size(Dim::Time)?;
    if let Some(w) = weights {
        if w.len() != ntime {
            return Err(ClimError::WeightLengthMismatch {
                expected: ntime,
                got: w.len(),
            });
        }
    }

    let reduced = a.reduce_dims(&[Dim::Time], |view, _| {
        let values: Vec<FloatValue> = view.iter().copied().collect();
        f.aggregate(&values, weights)
    })?;
    Ok(match reduced {
        Reduced::Array(r) => {
            let name = annotated_name(a.name(), &format!("temporally aggregated with {}", f.name()));
            Reduced::Array(r.with_name(name))
        }
        value => value,
    })
}

/// Aggregates consecutive time steps falling in the same calendar year.
///
/// The time axis must be sorted ascending. The result keeps every axis in place, with the
/// time axis replaced by the distinct years (`floor` of the time values).
///
/// ```rust
/// use climops_core::array::ClimArray;
/// use climops_core::dimensions::{Axis, Dim};
/// use climops_core::stats::Statistic;
/// use climops_core::temporal::yearly_agg;
/// use ndarray::{Array, IxDyn};
///
/// let monthly = ClimArray::new(
///     Array::from_shape_vec(IxDyn(&[4]), vec![1.0, 3.0, 10.0, 20.0]).unwrap(),
///     vec![Axis::time(vec![2000.0, 2000.5, 2001.0, 2001.5])],
/// )
/// .unwrap();
///
/// let yearly = yearly_agg(&Statistic::Sum, &monthly).unwrap();
/// assert_eq!(yearly.values(Dim::Time).unwrap(), &[2000.0, 2001.0]);
/// assert_eq!(yearly.get(&[1]), Some(30.0));
/// ```
pub fn yearly_agg<F: Aggregator + ?Sized>(f: &F, a: &ClimArray) -> ClimResult<ClimArray> {
    let time = a.values(Dim::Time)?;
    let in_order = |w: &[FloatValue]| w[0] <= w[1];
    if let Some(i) = time.windows(2).position(|w| !in_order(w)) {
        return Err(ClimError::Error(format!(
            "time axis must be sorted ascending; order breaks at index {}",
            i + 1
        )));
    }

    let mut years: Vec<FloatValue> = vec![];
    let mut groups: Vec<Vec<usize>> = vec![];
    for (i, t) in time.iter().enumerate() {
        let year = t.floor();
        match years.last() {
            Some(&last) if last == year => {
                if let Some(group) = groups.last_mut() {
                    group.push(i)
                }
            }
            _ => {
                years.push(year);
                groups.push(vec![i]);
            }
        }
    }
    debug!("yearly_agg: {} time steps in {} years", time.len(), years.len());

    let pos = a.dim_index(Dim::Time)?;
    let mut parts = Vec::with_capacity(groups.len());
    for indices in &groups {
        let part = dropagg(f, &a.select_indices(Dim::Time, indices)?, Dim::Time)?;
        parts.push(part.into_data().insert_axis(ndarray::Axis(pos)));
    }
    let views: Vec<_> = parts.iter().map(|p| p.view()).collect();
    let data = ndarray::concatenate(ndarray::Axis(pos), &views)
        .map_err(|e| ClimError::Error(e.to_string()))?;

    let mut axes = a.axes().to_vec();
    axes[pos] = Axis::time(years);

    let name = annotated_name(a.name(), &format!("yearly aggregated with {}", f.name()));
    let mut result = ClimArray::new(data, axes)?
        .with_name(name)
        .with_refdims(a.refdims().to_vec());
    if let Some(attrs) = a.attrs() {
        result = result.with_attrs(attrs.clone());
    }
    Ok(result)
}
