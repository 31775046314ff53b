//! Spatial structure of labelled arrays
//!
//! Two horizontal representations are supported:
//!
//! - [`SpatialStructure::Grid`]: separate longitude and latitude axes
//! - [`SpatialStructure::EqArea`]: a single [`Dim::Coord`] axis of `(lon, lat)` points,
//!   typically from an equal-area discretisation
//!
//! The structure is never stored on an array. It is recomputed from the axis tags whenever an
//! algorithm needs to choose its implementation, so dispatch is a pure function of shape.
//!
//! # Examples
//!
//! ```rust
//! use climops_core::dimensions::Dim;
//! use climops_core::spatial::{spatial_structure, SpatialStructure};
//!
//! assert_eq!(spatial_structure(&[Dim::Lon, Dim::Lat, Dim::Time]), SpatialStructure::Grid);
//! assert_eq!(spatial_structure(&[Dim::Coord, Dim::Time]), SpatialStructure::EqArea);
//! assert_eq!(spatial_structure(&[Dim::Time]), SpatialStructure::None);
//! ```

use crate::array::ClimArray;
use crate::coordinates::unique_latitudes;
use crate::dimensions::{Dim, FloatValue};
use crate::errors::{ClimError, ClimResult};
use serde::{Deserialize, Serialize};

/// Horizontal layout of an array, derived from its dimension tags
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialStructure {
    /// Independent longitude and/or latitude axes
    Grid,
    /// Unstructured list of `(lon, lat)` points
    EqArea,
    /// No horizontal axis at all
    None,
}

impl std::fmt::Display for SpatialStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpatialStructure::Grid => write!(f, "Grid"),
            SpatialStructure::EqArea => write!(f, "EqArea"),
            SpatialStructure::None => write!(f, "None"),
        }
    }
}

/// Classifies a set of dimension tags.
///
/// A [`Dim::Coord`] axis takes precedence; otherwise any longitude or latitude axis makes
/// the array a grid.
pub fn spatial_structure(dims: &[Dim]) -> SpatialStructure {
    if dims.contains(&Dim::Coord) {
        SpatialStructure::EqArea
    } else if dims.contains(&Dim::Lon) || dims.contains(&Dim::Lat) {
        SpatialStructure::Grid
    } else {
        SpatialStructure::None
    }
}

impl ClimArray {
    pub fn spatial_structure(&self) -> SpatialStructure {
        spatial_structure(&self.dims())
    }

    /// Extracts the non-spatial remainder at one spatial location.
    ///
    /// The spatial axes are dropped and recorded in `refdims`. A purely spatial array yields
    /// a zero-dimensional array; use [`ClimArray::scalar`] to read it.
    pub fn at_spatial(&self, index: SpatialIndex) -> ClimResult<ClimArray> {
        match index {
            SpatialIndex::Grid { lon, lat } => {
                self.index_dim(Dim::Lon, lon)?.index_dim(Dim::Lat, lat)
            }
            SpatialIndex::EqArea { coord } => self.index_dim(Dim::Coord, coord),
        }
    }
}

/// Position of one spatial location
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpatialIndex {
    Grid { lon: usize, lat: usize },
    EqArea { coord: usize },
}

/// Iterator over every spatial location of an array
///
/// Grid locations are visited longitude-major: all latitudes of the first longitude, then all
/// latitudes of the second, and so on. Equal-area locations follow the coordinate order.
/// The iterator is cheap to clone, so a traversal can be restarted from a saved copy.
#[derive(Clone, Debug)]
pub struct SpatialIndices {
    structure: SpatialStructure,
    inner: usize,
    total: usize,
    next: usize,
}

impl Iterator for SpatialIndices {
    type Item = SpatialIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let k = self.next;
        self.next += 1;
        match self.structure {
            SpatialStructure::Grid => Some(SpatialIndex::Grid {
                lon: k / self.inner,
                lat: k % self.inner,
            }),
            SpatialStructure::EqArea => Some(SpatialIndex::EqArea { coord: k }),
            SpatialStructure::None => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SpatialIndices {}

/// Creates an iterator over all spatial locations of `a`.
///
/// # Errors
///
/// A grid array must carry both a longitude and a latitude axis.
pub fn spatialidxs(a: &ClimArray) -> ClimResult<SpatialIndices> {
    let structure = a.spatial_structure();
    let (inner, total) = match structure {
        SpatialStructure::Grid => {
            let nlon = a.size(Dim::Lon)?;
            let nlat = a.size(Dim::Lat)?;
            (nlat, nlon * nlat)
        }
        SpatialStructure::EqArea => (1, a.size(Dim::Coord)?),
        SpatialStructure::None => (1, 0),
    };
    Ok(SpatialIndices {
        structure,
        inner,
        total,
        next: 0,
    })
}

/// Latitudes present in `a`.
///
/// For a grid these are the latitude axis values. For an equal-area array these are the
/// distinct latitude components of the coordinate points, in order of first appearance.
pub fn latitudes(a: &ClimArray) -> ClimResult<Vec<FloatValue>> {
    match a.spatial_structure() {
        SpatialStructure::Grid => Ok(a.values(Dim::Lat)?.to_vec()),
        SpatialStructure::EqArea => Ok(unique_latitudes(a.coordinates()?)),
        SpatialStructure::None => Err(ClimError::NoSpatialStructure(format!("{:?}", a.dims()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::{Axis, Coordinate};
    use ndarray::{Array, ArrayD, IxDyn};

    fn grid() -> ClimArray {
        let data = Array::from_shape_fn(IxDyn(&[3, 2, 2]), |ix| {
            (ix[0] * 100 + ix[1] * 10 + ix[2]) as f64
        });
        ClimArray::new(
            data,
            vec![
                Axis::lon(vec![0.0, 120.0, 240.0]),
                Axis::lat(vec![-45.0, 45.0]),
                Axis::time(vec![2000.0, 2001.0]),
            ],
        )
        .unwrap()
    }

    fn eqarea() -> ClimArray {
        let coords = vec![
            Coordinate::new(0.0, -45.0),
            Coordinate::new(180.0, -45.0),
            Coordinate::new(90.0, 45.0),
        ];
        let data = Array::from_shape_vec(IxDyn(&[2, 3]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        ClimArray::new(
            data,
            vec![Axis::time(vec![2000.0, 2001.0]), Axis::coord(coords)],
        )
        .unwrap()
    }

    #[test]
    fn classify() {
        assert_eq!(spatial_structure(&[Dim::Lat]), SpatialStructure::Grid);
        assert_eq!(spatial_structure(&[Dim::Time, Dim::Lon]), SpatialStructure::Grid);
        assert_eq!(
            spatial_structure(&[Dim::Lon, Dim::Coord]),
            SpatialStructure::EqArea
        );
        assert_eq!(spatial_structure(&[]), SpatialStructure::None);
        assert_eq!(grid().spatial_structure(), SpatialStructure::Grid);
        assert_eq!(eqarea().spatial_structure(), SpatialStructure::EqArea);
    }

    #[test]
    fn grid_indices_are_lon_major() {
        let idxs: Vec<SpatialIndex> = spatialidxs(&grid()).unwrap().collect();
        assert_eq!(idxs.len(), 6);
        assert_eq!(idxs[0], SpatialIndex::Grid { lon: 0, lat: 0 });
        assert_eq!(idxs[1], SpatialIndex::Grid { lon: 0, lat: 1 });
        assert_eq!(idxs[2], SpatialIndex::Grid { lon: 1, lat: 0 });
        assert_eq!(idxs[5], SpatialIndex::Grid { lon: 2, lat: 1 });
    }

    #[test]
    fn eqarea_indices_follow_coordinates() {
        let idxs: Vec<SpatialIndex> = spatialidxs(&eqarea()).unwrap().collect();
        assert_eq!(
            idxs,
            vec![
                SpatialIndex::EqArea { coord: 0 },
                SpatialIndex::EqArea { coord: 1 },
                SpatialIndex::EqArea { coord: 2 },
            ]
        );
    }

    #[test]
    fn indices_restart_from_clone() {
        let a = grid();
        let idxs = spatialidxs(&a).unwrap();
        assert_eq!(idxs.len(), 6);
        let first: Vec<_> = idxs.clone().collect();
        let second: Vec<_> = idxs.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn indices_without_spatial_axes() {
        let a = ClimArray::new(ArrayD::zeros(IxDyn(&[2])), vec![Axis::time(vec![0.0, 1.0])])
            .unwrap();
        assert_eq!(spatialidxs(&a).unwrap().count(), 0);
    }

    #[test]
    fn grid_indices_need_both_axes() {
        let a = ClimArray::new(ArrayD::zeros(IxDyn(&[2])), vec![Axis::lat(vec![0.0, 1.0])])
            .unwrap();
        assert!(matches!(
            spatialidxs(&a),
            Err(ClimError::MissingDimension(_))
        ));
    }

    #[test]
    fn at_spatial_extracts_remainder() {
        let a = grid();
        let series = a.at_spatial(SpatialIndex::Grid { lon: 2, lat: 1 }).unwrap();
        assert_eq!(series.dims(), vec![Dim::Time]);
        assert_eq!(series.get(&[1]), Some(211.0));
        assert_eq!(series.refdims().len(), 2);

        let b = eqarea();
        let series = b.at_spatial(SpatialIndex::EqArea { coord: 2 }).unwrap();
        assert_eq!(series.data().iter().copied().collect::<Vec<_>>(), vec![3.0, 6.0]);
    }

    #[test]
    fn at_spatial_on_pure_field_is_scalar() {
        let a = grid().index_dim(Dim::Time, 0).unwrap();
        let point = a.at_spatial(SpatialIndex::Grid { lon: 1, lat: 0 }).unwrap();
        assert_eq!(point.scalar(), Some(100.0));
    }

    #[test]
    fn latitudes_per_structure() {
        assert_eq!(latitudes(&grid()).unwrap(), vec![-45.0, 45.0]);
        assert_eq!(latitudes(&eqarea()).unwrap(), vec![-45.0, 45.0]);
    }
}
