//! Spatial aggregation of labelled arrays
//!
//! All functions dispatch on [`SpatialStructure`], so the same call works for regular
//! longitude/latitude grids and for equal-area coordinate lists:
//!
//! - [`latmean`]/[`latmean_in`]: cosine-of-latitude weighted mean over latitude
//! - [`zonalmean`]: mean over longitude at fixed latitude
//! - [`spaceagg`]/[`spacemean`]: area-weighted aggregation over all spatial locations
//! - [`dropagg`]: unweighted reduction along any single dimension
//!
//! Grid cells shrink towards the poles, so grid aggregations weight each latitude row by
//! `cos(lat)`. Equal-area points need no such weighting.
//!
//! # Examples
//!
//! ```rust
//! use climops_core::aggregation::spacemean;
//! use climops_core::array::ClimArray;
//! use climops_core::dimensions::Axis;
//! use ndarray::{ArrayD, IxDyn};
//!
//! let field = ClimArray::new(
//!     ArrayD::from_elem(IxDyn(&[4, 3]), 288.0),
//!     vec![
//!         Axis::lon(vec![0.0, 90.0, 180.0, 270.0]),
//!         Axis::lat(vec![-60.0, 0.0, 60.0]),
//!     ],
//! )
//! .unwrap();
//!
//! let mean = spacemean(&field, None).unwrap();
//! assert!((mean.as_value().unwrap() - 288.0).abs() < 1e-12);
//! ```

use crate::array::{annotated_name, index_other_axes, ClimArray, Reduced};
use crate::coordinates::uniquelats;
use crate::dimensions::{Axis, Dim, FloatValue};
use crate::errors::{ClimError, ClimResult};
use crate::spatial::SpatialStructure;
use crate::stats::{Aggregator, Statistic};
use log::debug;
use ndarray::{ArrayD, ArrayViewD};
use std::ops::RangeInclusive;

/// Suffix appended to the name of zonally averaged arrays
pub const ZONAL_ANNOTATION: &str = "zonally averaged";

fn cosd(deg: FloatValue) -> FloatValue {
    deg.to_radians().cos()
}

fn flatten(view: &ArrayViewD<'_, FloatValue>) -> Vec<FloatValue> {
    view.iter().copied().collect()
}

fn rename(reduced: Reduced, name: String) -> Reduced {
    match reduced {
        Reduced::Array(a) => Reduced::Array(a.with_name(name)),
        value => value,
    }
}

/// Reduces `a` along `dim` with `f`, unweighted, dropping `dim`.
pub fn dropagg<F: Aggregator + ?Sized>(f: &F, a: &ClimArray, dim: Dim) -> ClimResult<Reduced> {
    a.reduce_dims(&[dim], |view, _| f.aggregate(&flatten(&view), None))
}

/// Cosine-of-latitude weighted mean over the whole latitude axis.
///
/// See [`latmean_in`].
pub fn latmean(a: &ClimArray) -> ClimResult<Reduced> {
    latmean_in(a, -90.0..=90.0)
}

/// Cosine-of-latitude weighted mean over the latitudes in `range` (inclusive).
///
/// The weights are normalised over the selected latitudes, so a uniform field averages to
/// its own value. The latitude axis is dropped; if it was the only axis the result is a
/// [`Reduced::Value`].
///
/// # Errors
///
/// Fails if `a` has no latitude axis or no latitude lies in `range`.
pub fn latmean_in(a: &ClimArray, range: RangeInclusive<FloatValue>) -> ClimResult<Reduced> {
    let selected = a.select_range(Dim::Lat, range)?;
    let mut weights: Vec<FloatValue> = selected.values(Dim::Lat)?.iter().map(|&l| cosd(l)).collect();
    let total: FloatValue = weights.iter().sum();
    weights.iter_mut().for_each(|w| *w /= total);

    selected.reduce_dims(&[Dim::Lat], |view, _| {
        Ok(view.iter().zip(weights.iter()).map(|(x, w)| x * w).sum())
    })
}

/// Mean over longitude at fixed latitude.
///
/// * Grid: unweighted mean over the longitude axis, which is dropped.
/// * EqArea: points sharing a latitude are averaged together. The result has a latitude axis
///   of the distinct latitudes first, followed by the remaining axes in their original
///   order. The coordinate points must be sorted by latitude.
///
/// Named inputs produce results named `"<name>, zonally averaged"`.
pub fn zonalmean(a: &ClimArray) -> ClimResult<Reduced> {
    let name = annotated_name(a.name(), ZONAL_ANNOTATION);
    match a.spatial_structure() {
        SpatialStructure::Grid => {
            debug!("zonalmean: averaging over the longitude axis");
            Ok(rename(dropagg(&Statistic::Mean, a, Dim::Lon)?, name))
        }
        SpatialStructure::EqArea => {
            debug!("zonalmean: grouping equal-area points by latitude");
            eqarea_zonalmean(a).map(|z| Reduced::Array(z.with_name(name)))
        }
        SpatialStructure::None => Err(ClimError::NoSpatialStructure(format!("{:?}", a.dims()))),
    }
}

fn eqarea_zonalmean(a: &ClimArray) -> ClimResult<ClimArray> {
    let groups = uniquelats(a.coordinates()?)?;

    let mut bands = Vec::with_capacity(groups.len());
    for range in &groups.ranges {
        let indices: Vec<usize> = range.clone().collect();
        let band = dropagg(&Statistic::Mean, &a.select_indices(Dim::Coord, &indices)?, Dim::Coord)?;
        bands.push(band.into_data().insert_axis(ndarray::Axis(0)));
    }

    let views: Vec<_> = bands.iter().map(|b| b.view()).collect();
    let data = ndarray::concatenate(ndarray::Axis(0), &views)
        .map_err(|e| ClimError::Error(e.to_string()))?;

    let mut axes = vec![Axis::lat(groups.latitudes)];
    axes.extend(a.axes().iter().filter(|ax| ax.dim != Dim::Coord).cloned());

    let mut refdims = a.refdims().to_vec();
    refdims.push(a.axis(Dim::Coord)?.clone());

    let mut result = ClimArray::new(data, axes)?.with_refdims(refdims);
    if let Some(attrs) = a.attrs() {
        result = result.with_attrs(attrs.clone());
    }
    Ok(result)
}

/// Mean over all spatial locations: [`spaceagg`] with [`Statistic::Mean`].
pub fn spacemean(a: &ClimArray, weights: Option<&ArrayD<FloatValue>>) -> ClimResult<Reduced> {
    spaceagg(&Statistic::Mean, a, weights)
}

/// Aggregates `a` over all spatial locations with `f`.
///
/// * Grid: each location is weighted by `cos(lat)`. The longitude axis must come before the
///   latitude axis. Optional `weights` multiply the base weights and must have either the
///   spatial shape `(nlon, nlat)`, applied to every slice, or the full shape of `a`, applied
///   slice by slice.
/// * EqArea: plain reduction over the coordinate axis. External weights are not supported
///   for equal-area data.
///
/// A purely spatial array reduces to a [`Reduced::Value`]. Otherwise the result spans the
/// remaining axes and, when `a` is named, is named
/// `"<name>, spatially aggregated with <f>"`.
///
/// # Errors
///
/// * [`ClimError::DimensionOrder`] if latitude precedes longitude
/// * [`ClimError::WeightShapeMismatch`] if `weights` has neither accepted shape
/// * [`ClimError::NotImplemented`] for weighted equal-area aggregation
/// * [`ClimError::NoSpatialStructure`] if `a` has no spatial axis
pub fn spaceagg<F: Aggregator + ?Sized>(
    f: &F,
    a: &ClimArray,
    weights: Option<&ArrayD<FloatValue>>,
) -> ClimResult<Reduced> {
    let name = annotated_name(a.name(), &format!("spatially aggregated with {}", f.name()));
    let reduced = match a.spatial_structure() {
        SpatialStructure::Grid => grid_spaceagg(f, a, weights)?,
        SpatialStructure::EqArea => {
            if weights.is_some() {
                return Err(ClimError::NotImplemented(
                    "weighted spatial aggregation of equal-area data".to_string(),
                ));
            }
            debug!("spaceagg: plain {} over the coordinate axis", f.name());
            dropagg(f, a, Dim::Coord)?
        }
        SpatialStructure::None => {
            return Err(ClimError::NoSpatialStructure(format!("{:?}", a.dims())))
        }
    };
    Ok(rename(reduced, name))
}

enum GridWeights<'a> {
    /// Flattened `(lon, lat)` weights shared by every slice
    Spatial(Vec<FloatValue>),
    /// External weights over the full array, combined slice by slice
    Full(&'a ArrayD<FloatValue>),
}

fn grid_spaceagg<F: Aggregator + ?Sized>(
    f: &F,
    a: &ClimArray,
    weights: Option<&ArrayD<FloatValue>>,
) -> ClimResult<Reduced> {
    let lon_pos = a.dim_index(Dim::Lon)?;
    let lat_pos = a.dim_index(Dim::Lat)?;
    if lon_pos > lat_pos {
        return Err(ClimError::DimensionOrder {
            first: Dim::Lon.to_string(),
            second: Dim::Lat.to_string(),
            first_pos: lon_pos,
            second_pos: lat_pos,
        });
    }

    let nlon = a.shape()[lon_pos];
    let lat_weights: Vec<FloatValue> = a.values(Dim::Lat)?.iter().map(|&l| cosd(l)).collect();
    // Row-major over (lon, lat), matching the iteration order of a (lon, lat) view
    let base: Vec<FloatValue> = (0..nlon).flat_map(|_| lat_weights.iter().copied()).collect();

    let spatial_shape = [nlon, lat_weights.len()];
    let mode = match weights {
        None => GridWeights::Spatial(base.clone()),
        Some(w) if w.shape() == spatial_shape => {
            debug!("spaceagg: combining spatial weights once for all slices");
            GridWeights::Spatial(base.iter().zip(w.iter()).map(|(b, w)| b * w).collect())
        }
        Some(w) if w.shape() == a.shape() => {
            debug!("spaceagg: combining full-shape weights slice by slice");
            GridWeights::Full(w)
        }
        Some(w) => {
            return Err(ClimError::WeightShapeMismatch {
                spatial: spatial_shape.to_vec(),
                full: a.shape().to_vec(),
                got: w.shape().to_vec(),
            })
        }
    };

    let other_positions: Vec<usize> = (0..a.ndim())
        .filter(|&p| p != lon_pos && p != lat_pos)
        .collect();

    a.reduce_dims(&[Dim::Lon, Dim::Lat], |view, index| {
        let values = flatten(&view);
        match &mode {
            GridWeights::Spatial(w) => f.aggregate(&values, Some(w.as_slice())),
            GridWeights::Full(full) => {
                let slice = index_other_axes(full.view(), &other_positions, index);
                let w: Vec<FloatValue> = base.iter().zip(slice.iter()).map(|(b, w)| b * w).collect();
                f.aggregate(&values, Some(w.as_slice()))
            }
        }
    })
}
