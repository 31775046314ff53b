//! Hemisphere splitting on realistic grids.
//!
//! These tests check that the two halves returned by `hemispheric_functions` line up
//! latitude by latitude and that together they cover every value of the input.

use climops_core::array::ClimArray;
use climops_core::dimensions::{Axis, Coordinate, Dim};
use climops_core::hemispheres::{hemispheric_functions, hemispheric_means};
use climops_core::spatial::{spatialidxs, SpatialIndex};
use is_close::is_close;
use ndarray::{Array, IxDyn};

/// Field on a 4 x 7 grid from -90 to 90 with three time steps
fn grid_series() -> ClimArray {
    let lats: Vec<f64> = (0..7).map(|j| -90.0 + 30.0 * j as f64).collect();
    let data = Array::from_shape_fn(IxDyn(&[4, 7, 3]), |ix| {
        lats[ix[1]] * 100.0 + ix[0] as f64 * 10.0 + ix[2] as f64
    });
    ClimArray::new(
        data,
        vec![
            Axis::lon(vec![0.0, 90.0, 180.0, 270.0]),
            Axis::lat(lats),
            Axis::time(vec![2000.0, 2001.0, 2002.0]),
        ],
    )
    .unwrap()
    .with_name("tas")
}

/// Equal-area points sorted by latitude, one value per point
fn eqarea_field() -> ClimArray {
    let coords: Vec<Coordinate> = [
        (0.0, -75.0),
        (120.0, -75.0),
        (240.0, -75.0),
        (45.0, -25.0),
        (135.0, -25.0),
        (0.0, 25.0),
        (90.0, 25.0),
        (180.0, 25.0),
        (60.0, 75.0),
    ]
    .into_iter()
    .map(Coordinate::from)
    .collect();
    let values: Vec<f64> = coords.iter().map(|c| c.lat + c.lon / 1000.0).collect();
    ClimArray::new(
        Array::from_shape_vec(IxDyn(&[coords.len()]), values).unwrap(),
        vec![Axis::coord(coords)],
    )
    .unwrap()
}

mod grid {
    use super::*;

    #[test]
    fn test_latitude_axes_match() {
        let h = hemispheric_functions(&grid_series()).unwrap();
        let north = h.north.values(Dim::Lat).unwrap();
        assert_eq!(north, &[0.0, 30.0, 60.0, 90.0]);
        assert_eq!(h.south.values(Dim::Lat).unwrap(), north);
        assert_eq!(h.south.dims(), vec![Dim::Lon, Dim::Lat, Dim::Time]);
        assert_eq!(h.north.name(), "tas");
    }

    #[test]
    fn test_southern_value_at_60_comes_from_minus_60() {
        let a = grid_series();
        let h = hemispheric_functions(&a).unwrap();
        let orig_j = a.values(Dim::Lat).unwrap().iter().position(|&l| l == -60.0).unwrap();
        let south_j = h.south.values(Dim::Lat).unwrap().iter().position(|&l| l == 60.0).unwrap();
        for lon in 0..4 {
            for t in 0..3 {
                assert_eq!(h.south.get(&[lon, south_j, t]), a.get(&[lon, orig_j, t]));
            }
        }
    }

    #[test]
    fn test_halves_cover_original() {
        let a = grid_series();
        let h = hemispheric_functions(&a).unwrap();
        let north_lats = h.north.values(Dim::Lat).unwrap();

        for (j, &lat) in a.values(Dim::Lat).unwrap().iter().enumerate() {
            let (half, k) = if lat >= 0.0 {
                (&h.north, north_lats.iter().position(|&l| l == lat).unwrap())
            } else {
                (&h.south, north_lats.iter().position(|&l| l == -lat).unwrap())
            };
            for lon in 0..4 {
                for t in 0..3 {
                    assert_eq!(half.get(&[lon, k, t]), a.get(&[lon, j, t]), "lat {}", lat);
                }
            }
        }
    }

    #[test]
    fn test_means_of_antisymmetric_field() {
        // value depends on latitude only and changes sign across the equator
        let a = grid_series().index_dim(Dim::Time, 0).unwrap();
        let lon_free = ClimArray::new(
            Array::from_shape_fn(IxDyn(&[4, 7]), |ix| a.values(Dim::Lat).unwrap()[ix[1]]),
            a.axes().to_vec(),
        )
        .unwrap();
        let means = hemispheric_means(&lon_free).unwrap();
        let north = means.north.as_value().unwrap();
        let south = means.south.as_value().unwrap();
        assert!(is_close!(north, -south), "north {} south {}", north, south);
        assert!(north > 0.0);
    }
}

mod eqarea {
    use super::*;

    #[test]
    fn test_split_at_equator() {
        let h = hemispheric_functions(&eqarea_field()).unwrap();
        assert_eq!(h.north.size(Dim::Coord).unwrap(), 4);
        assert_eq!(h.south.size(Dim::Coord).unwrap(), 5);
        assert!(h.south.coordinates().unwrap().iter().all(|c| c.lat > 0.0));
        // southern points run from the equator towards the pole
        let south_lats: Vec<f64> = h.south.coordinates().unwrap().iter().map(|c| c.lat).collect();
        assert_eq!(south_lats, vec![25.0, 25.0, 75.0, 75.0, 75.0]);
    }

    #[test]
    fn test_halves_cover_original() {
        let a = eqarea_field();
        let h = hemispheric_functions(&a).unwrap();

        let mut seen = 0;
        for (half, sign) in [(&h.north, 1.0), (&h.south, -1.0)] {
            for idx in spatialidxs(half).unwrap() {
                let SpatialIndex::EqArea { coord } = idx else {
                    panic!("expected an equal-area index, got {:?}", idx);
                };
                let c = half.coordinates().unwrap()[coord];
                let value = half.get(&[coord]).unwrap();
                assert!(is_close!(value, sign * c.lat + c.lon / 1000.0));
                seen += 1;
            }
        }
        assert_eq!(seen, a.size(Dim::Coord).unwrap());
    }

    #[test]
    fn test_means() {
        let means = hemispheric_means(&eqarea_field()).unwrap();
        // (25 * 3 + 75) / 4 plus the longitude offsets
        let north = means.north.as_value().unwrap();
        assert!(is_close!(north, 37.5 + 0.33 / 4.0), "north {}", north);
    }
}
