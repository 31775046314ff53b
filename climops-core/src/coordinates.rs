//! Utilities for unstructured `(lon, lat)` coordinate lists.
//!
//! Equal-area arrays keep their points sorted by latitude (ascending). Grouping by latitude
//! and splitting into hemispheres both depend on that order, so the functions here check it
//! and fail with [`ClimError::UnsortedCoordinates`] instead of silently regrouping. Points are
//! never re-sorted on the caller's behalf.

use crate::array::ClimArray;
use crate::dimensions::{Coordinate, FloatValue};
use crate::errors::{ClimError, ClimResult};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::ops::Range;

/// Contiguous runs of equal latitude in a sorted coordinate list
#[derive(Clone, Debug, PartialEq)]
pub struct LatitudeGroups {
    /// Index range of each run, in increasing latitude order
    pub ranges: Vec<Range<usize>>,
    /// The latitude shared by each run
    pub latitudes: Vec<FloatValue>,
}

impl LatitudeGroups {
    pub fn len(&self) -> usize {
        self.latitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitudes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Range<usize>, FloatValue)> {
        self.ranges.iter().zip(self.latitudes.iter().copied())
    }
}

/// Checks that `coords` is sorted by latitude, ascending.
///
/// NaN latitudes compare as out of order, so any NaN among several points is rejected.
pub fn check_sorted(coords: &[Coordinate]) -> ClimResult<()> {
    let in_order = |a: FloatValue, b: FloatValue| {
        matches!(a.partial_cmp(&b), Some(Ordering::Less | Ordering::Equal))
    };
    match coords.windows(2).position(|w| !in_order(w[0].lat, w[1].lat)) {
        Some(i) => Err(ClimError::UnsortedCoordinates { index: i + 1 }),
        None => Ok(()),
    }
}

/// Groups a latitude-sorted coordinate list into runs of equal latitude.
///
/// ```rust
/// use climops_core::coordinates::uniquelats;
/// use climops_core::dimensions::Coordinate;
///
/// let coords: Vec<Coordinate> = [1.0, 1.0, 2.0, 2.0, 2.0, 3.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &lat)| Coordinate::new(i as f64 * 10.0, lat))
///     .collect();
/// let groups = uniquelats(&coords).unwrap();
/// assert_eq!(groups.ranges, vec![0..2, 2..5, 5..6]);
/// assert_eq!(groups.latitudes, vec![1.0, 2.0, 3.0]);
/// ```
pub fn uniquelats(coords: &[Coordinate]) -> ClimResult<LatitudeGroups> {
    check_sorted(coords)?;

    let mut groups = LatitudeGroups {
        ranges: vec![],
        latitudes: vec![],
    };
    let Some(first) = coords.first() else {
        return Ok(groups);
    };

    let mut start = 0;
    let mut current = first.lat;
    for (i, c) in coords.iter().enumerate().skip(1) {
        if c.lat != current {
            groups.ranges.push(start..i);
            groups.latitudes.push(current);
            start = i;
            current = c.lat;
        }
    }
    groups.ranges.push(start..coords.len());
    groups.latitudes.push(current);

    Ok(groups)
}

/// [`uniquelats`] applied to the coordinate axis of `a`
pub fn array_uniquelats(a: &ClimArray) -> ClimResult<LatitudeGroups> {
    uniquelats(a.coordinates()?)
}

/// Distinct latitudes of `coords`, in order of first appearance. No ordering is required.
pub fn unique_latitudes(coords: &[Coordinate]) -> Vec<FloatValue> {
    let mut seen = HashSet::new();
    coords
        .iter()
        .map(|c| c.lat)
        // -0.0 and 0.0 are the same latitude
        .filter(|&lat| seen.insert(if lat == 0.0 { 0.0_f64.to_bits() } else { lat.to_bits() }))
        .collect()
}

/// Splits a latitude-sorted coordinate list at the equator.
///
/// Returns `(southern, northern)` index lists: points with latitude below zero, then points
/// with latitude at or above zero. Both lists are ascending.
pub fn hemisphere_indices(coords: &[Coordinate]) -> ClimResult<(Vec<usize>, Vec<usize>)> {
    check_sorted(coords)?;
    let split = coords.partition_point(|c| c.lat < 0.0);
    Ok(((0..split).collect(), (split..coords.len()).collect()))
}
