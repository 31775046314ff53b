//! Splitting arrays into northern and southern hemispheres
//!
//! Both halves come back with the same latitude labels, running from the equator towards
//! the pole, so that a value in the southern half sits at the same position as the value at
//! the mirrored latitude in the northern half. This makes hemispheric differences and
//! asymmetry indices plain element-wise operations.

use crate::aggregation::{dropagg, latmean_in, zonalmean};
use crate::array::{ClimArray, Reduced};
use crate::coordinates::hemisphere_indices;
use crate::dimensions::{Axis, Coordinate, Dim};
use crate::errors::{ClimError, ClimResult};
use crate::spatial::SpatialStructure;
use crate::stats::Statistic;
use log::debug;

/// A pair of values, one per hemisphere
#[derive(Clone, Debug, PartialEq)]
pub struct Hemispheres<T> {
    pub north: T,
    pub south: T,
}

impl<T> Hemispheres<T> {
    /// Applies `f` to both hemispheres.
    pub fn try_map<U, F>(self, mut f: F) -> ClimResult<Hemispheres<U>>
    where
        F: FnMut(T) -> ClimResult<U>,
    {
        Ok(Hemispheres {
            north: f(self.north)?,
            south: f(self.south)?,
        })
    }
}

/// Splits `a` into hemispheres with aligned latitudes.
///
/// * Grid: the northern half covers latitudes in `[0, 90]` and the southern half those in
///   `[-90, 0]`, a latitude of exactly zero landing in both. The southern half is reversed
///   along latitude and relabelled with the northern latitudes, which requires both halves
///   to hold the same number of latitudes.
/// * EqArea: the coordinate points, which must be sorted by latitude, are split at the
///   equator (south below zero, north at or above zero). The southern points are reversed
///   together with their data and carry the absolute value of their latitude. A hemisphere
///   without points comes back with a zero-length coordinate axis.
///
/// # Errors
///
/// * [`ClimError::ShapeMismatch`] if the grid hemispheres differ in size
/// * [`ClimError::EmptySelection`] if a grid has no latitude in one hemisphere
/// * [`ClimError::UnsortedCoordinates`] for unsorted equal-area points
/// * [`ClimError::NoSpatialStructure`] if `a` has no spatial axis
pub fn hemispheric_functions(a: &ClimArray) -> ClimResult<Hemispheres<ClimArray>> {
    match a.spatial_structure() {
        SpatialStructure::Grid => {
            debug!("hemispheric_functions: splitting the latitude axis");
            let north = a.select_range(Dim::Lat, 0.0..=90.0)?;
            let south = a.select_range(Dim::Lat, -90.0..=0.0)?;
            let (nn, ns) = (north.size(Dim::Lat)?, south.size(Dim::Lat)?);
            if nn != ns {
                return Err(ClimError::ShapeMismatch {
                    expected: vec![nn],
                    got: vec![ns],
                });
            }
            let south = south
                .reverse_dim(Dim::Lat)?
                .with_axis(north.axis(Dim::Lat)?.clone())?;
            Ok(Hemispheres { north, south })
        }
        SpatialStructure::EqArea => {
            debug!("hemispheric_functions: splitting equal-area points at the equator");
            let (south_idx, north_idx) = hemisphere_indices(a.coordinates()?)?;
            let north = a.take_indices(Dim::Coord, &north_idx)?;
            let south = a
                .take_indices(Dim::Coord, &south_idx)?
                .reverse_dim(Dim::Coord)?;
            let mirrored = south
                .coordinates()?
                .iter()
                .map(|c| Coordinate::new(c.lon, c.lat.abs()))
                .collect();
            let south = south.with_axis(Axis::coord(mirrored))?;
            Ok(Hemispheres { north, south })
        }
        SpatialStructure::None => Err(ClimError::NoSpatialStructure(format!("{:?}", a.dims()))),
    }
}

/// Mean of each hemisphere.
///
/// Grid arrays are averaged over longitude first (when they have a longitude axis) and
/// then cosine-weighted over latitude. Equal-area points are averaged without weights,
/// since every point already represents the same area.
pub fn hemispheric_means(a: &ClimArray) -> ClimResult<Hemispheres<Reduced>> {
    match a.spatial_structure() {
        SpatialStructure::Grid => {
            a.dim_index(Dim::Lat)?;
            let zonal;
            let base = if a.has_dim(Dim::Lon) {
                zonal = zonalmean(a)?
                    .into_array()
                    .ok_or_else(|| ClimError::MissingDimension(Dim::Lat.name().to_string()))?;
                &zonal
            } else {
                a
            };
            Ok(Hemispheres {
                north: latmean_in(base, 0.0..=90.0)?,
                south: latmean_in(base, -90.0..=0.0)?,
            })
        }
        SpatialStructure::EqArea => hemispheric_functions(a)?
            .try_map(|half| dropagg(&Statistic::Mean, &half, Dim::Coord)),
        SpatialStructure::None => Err(ClimError::NoSpatialStructure(format!("{:?}", a.dims()))),
    }
}
