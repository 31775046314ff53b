//! Climate-science operations over dimension-labelled arrays.
//!
//! This crate re-exports [`climops_core`]. Most users only need the [`prelude`]:
//!
//! ```rust
//! use climops::prelude::*;
//! use climops::ndarray::{ArrayD, IxDyn};
//!
//! let field = ClimArray::new(
//!     ArrayD::from_elem(IxDyn(&[2, 2]), 1.0),
//!     vec![Axis::lon(vec![0.0, 180.0]), Axis::lat(vec![-45.0, 45.0])],
//! )
//! .unwrap();
//!
//! let halves = hemispheric_means(&field).unwrap();
//! assert_eq!(halves.north, Reduced::Value(1.0));
//! ```

pub use climops_core::*;

pub mod prelude {
    pub use climops_core::aggregation::{dropagg, latmean, latmean_in, spaceagg, spacemean, zonalmean};
    pub use climops_core::array::{AttrValue, Attributes, ClimArray, Reduced};
    pub use climops_core::config::ClimopsConfig;
    pub use climops_core::coordinates::{hemisphere_indices, uniquelats, LatitudeGroups};
    pub use climops_core::dimensions::{Axis, Coordinate, Dim, DIMENSION_REGISTRY};
    pub use climops_core::errors::{ClimError, ClimResult};
    pub use climops_core::hemispheres::{hemispheric_functions, hemispheric_means, Hemispheres};
    pub use climops_core::longitude::{lon_distance, wrap_lon};
    pub use climops_core::spatial::{latitudes, spatial_structure, spatialidxs, SpatialIndex, SpatialStructure};
    pub use climops_core::stats::{Aggregator, Statistic};
    pub use climops_core::temporal::{timeagg, timemean, yearly_agg};
}
