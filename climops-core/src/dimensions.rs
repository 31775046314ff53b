//! Dimension tags and axes for labelled geophysical arrays
//!
//! Every axis of a [`ClimArray`](crate::array::ClimArray) is tagged with a [`Dim`]. The set of
//! tags is closed:
//!
//! - [`Dim::Lon`]: longitude, in degrees east
//! - [`Dim::Lat`]: latitude, in degrees north
//! - [`Dim::Time`]: time, as fractional years
//! - [`Dim::Hei`]: height above the surface
//! - [`Dim::Pre`]: pressure level
//! - [`Dim::Coord`]: unstructured list of `(lon, lat)` points (equal-area grids)
//!
//! The vocabulary of *names* mapping onto these tags is open. The global
//! [`DIMENSION_REGISTRY`] knows the common spellings (`"lat"`, `"latitude"`, `"plev"`, ...) and
//! further aliases can be registered at start-up, usually through
//! [`ClimopsConfig`](crate::config::ClimopsConfig).
//!
//! # Examples
//!
//! ```rust
//! use climops_core::dimensions::Dim;
//!
//! let dim: Dim = "latitude".parse().unwrap();
//! assert_eq!(dim, Dim::Lat);
//! assert_eq!(dim.code(), "Lat");
//! assert_eq!(dim.name(), "Latitude");
//! ```

use crate::errors::{ClimError, ClimResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{LazyLock, RwLock};

/// Floating point type used for all field values and coordinates
pub type FloatValue = f64;

/// Tag identifying the meaning of an array axis
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dim {
    /// Longitude (degrees east)
    Lon,
    /// Latitude (degrees north)
    Lat,
    /// Time (fractional years)
    Time,
    /// Height
    Hei,
    /// Pressure level
    Pre,
    /// Unstructured spatial coordinate holding `(lon, lat)` points
    Coord,
}

impl Dim {
    /// All dimension tags, in declaration order
    pub const ALL: [Dim; 6] = [Dim::Lon, Dim::Lat, Dim::Time, Dim::Hei, Dim::Pre, Dim::Coord];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Dim::Lon => "Longitude",
            Dim::Lat => "Latitude",
            Dim::Time => "Time",
            Dim::Hei => "Height",
            Dim::Pre => "Pressure",
            Dim::Coord => "Coordinates",
        }
    }

    /// Short code used in display and error messages
    pub fn code(&self) -> &'static str {
        match self {
            Dim::Lon => "Lon",
            Dim::Lat => "Lat",
            Dim::Time => "Ti",
            Dim::Hei => "Hei",
            Dim::Pre => "Pre",
            Dim::Coord => "Coord",
        }
    }

    /// Whether this tag describes horizontal position
    pub fn is_spatial(&self) -> bool {
        matches!(self, Dim::Lon | Dim::Lat | Dim::Coord)
    }

    /// Look up a tag by any name known to the global [`DIMENSION_REGISTRY`]
    pub fn from_name(name: &str) -> ClimResult<Dim> {
        DIMENSION_REGISTRY
            .lookup(name)
            .ok_or_else(|| ClimError::UnknownDimension(name.to_string()))
    }
}

impl std::fmt::Display for Dim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Dim {
    type Err = ClimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dim::from_name(s)
    }
}

/// A point of an unstructured spatial coordinate axis
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees east
    pub lon: FloatValue,
    /// Latitude in degrees north
    pub lat: FloatValue,
}

impl Coordinate {
    pub fn new(lon: FloatValue, lat: FloatValue) -> Self {
        Self { lon, lat }
    }
}

impl From<(FloatValue, FloatValue)> for Coordinate {
    fn from((lon, lat): (FloatValue, FloatValue)) -> Self {
        Self { lon, lat }
    }
}

/// Values labelling the positions along an axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AxisValues {
    /// Scalar coordinate values (longitudes, latitudes, times, levels)
    Numeric(Vec<FloatValue>),
    /// `(lon, lat)` points of a [`Dim::Coord`] axis
    Points(Vec<Coordinate>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Numeric(v) => v.len(),
            AxisValues::Points(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<FloatValue>> for AxisValues {
    fn from(values: Vec<FloatValue>) -> Self {
        AxisValues::Numeric(values)
    }
}

impl From<Vec<Coordinate>> for AxisValues {
    fn from(points: Vec<Coordinate>) -> Self {
        AxisValues::Points(points)
    }
}

/// A tagged axis together with its coordinate values
///
/// [`Dim::Coord`] axes hold [`AxisValues::Points`]; every other tag holds
/// [`AxisValues::Numeric`]. The pairing is checked when the axis is attached to a
/// [`ClimArray`](crate::array::ClimArray).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub dim: Dim,
    pub values: AxisValues,
}

impl Axis {
    pub fn new(dim: Dim, values: impl Into<AxisValues>) -> Self {
        Self {
            dim,
            values: values.into(),
        }
    }

    pub fn lon(values: Vec<FloatValue>) -> Self {
        Self::new(Dim::Lon, values)
    }

    pub fn lat(values: Vec<FloatValue>) -> Self {
        Self::new(Dim::Lat, values)
    }

    pub fn time(values: Vec<FloatValue>) -> Self {
        Self::new(Dim::Time, values)
    }

    pub fn height(values: Vec<FloatValue>) -> Self {
        Self::new(Dim::Hei, values)
    }

    pub fn pressure(values: Vec<FloatValue>) -> Self {
        Self::new(Dim::Pre, values)
    }

    pub fn coord(points: Vec<Coordinate>) -> Self {
        Self::new(Dim::Coord, points)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric values, or `None` for a coordinate-point axis
    pub fn numeric(&self) -> Option<&[FloatValue]> {
        match &self.values {
            AxisValues::Numeric(v) => Some(v),
            AxisValues::Points(_) => None,
        }
    }

    /// Coordinate points, or `None` for a numeric axis
    pub fn points(&self) -> Option<&[Coordinate]> {
        match &self.values {
            AxisValues::Points(p) => Some(p),
            AxisValues::Numeric(_) => None,
        }
    }

    /// True when the value kind matches the tag
    pub(crate) fn is_consistent(&self) -> bool {
        match self.values {
            AxisValues::Points(_) => self.dim == Dim::Coord,
            AxisValues::Numeric(_) => self.dim != Dim::Coord,
        }
    }

    /// New axis holding the values at `indices`, in that order
    ///
    /// Indices must be in bounds.
    pub(crate) fn select(&self, indices: &[usize]) -> Axis {
        let values = match &self.values {
            AxisValues::Numeric(v) => AxisValues::Numeric(indices.iter().map(|&i| v[i]).collect()),
            AxisValues::Points(p) => AxisValues::Points(indices.iter().map(|&i| p[i]).collect()),
        };
        Axis {
            dim: self.dim,
            values,
        }
    }

    pub(crate) fn reversed(&self) -> Axis {
        let values = match &self.values {
            AxisValues::Numeric(v) => AxisValues::Numeric(v.iter().rev().copied().collect()),
            AxisValues::Points(p) => AxisValues::Points(p.iter().rev().copied().collect()),
        };
        Axis {
            dim: self.dim,
            values,
        }
    }
}

/// The global dimension-name registry.
pub static DIMENSION_REGISTRY: LazyLock<DimensionRegistry> =
    LazyLock::new(DimensionRegistry::new);

/// Case-insensitive mapping from dimension names to [`Dim`] tags.
///
/// Lookups and registrations may happen from any thread; the alias table is behind a
/// `RwLock`. Aliases can be added but never removed or redirected to another tag.
#[derive(Debug)]
pub struct DimensionRegistry {
    aliases: RwLock<HashMap<String, Dim>>,
}

impl Default for DimensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRegistry {
    /// Creates a registry populated with the standard spellings of every tag.
    pub fn new() -> Self {
        let standard: [(Dim, &[&str]); 6] = [
            (Dim::Lon, &["lon", "long", "longitude", "x", "xc"]),
            (Dim::Lat, &["lat", "latitude", "y", "yc"]),
            (Dim::Time, &["ti", "time", "t"]),
            (Dim::Hei, &["hei", "height", "z", "level", "lev", "altitude"]),
            (Dim::Pre, &["pre", "pressure", "plev", "pres", "press"]),
            (Dim::Coord, &["coord", "coords", "coordinates", "cell", "ncells"]),
        ];

        let mut aliases = HashMap::new();
        for (dim, names) in standard {
            for name in names {
                aliases.insert(name.to_string(), dim);
            }
        }

        Self {
            aliases: RwLock::new(aliases),
        }
    }

    /// Looks up the tag for `name`, ignoring case and surrounding whitespace.
    pub fn lookup(&self, name: &str) -> Option<Dim> {
        let key = name.trim().to_lowercase();
        let aliases = self.aliases.read().expect("Registry lock poisoned");
        aliases.get(&key).copied()
    }

    /// Registers `alias` as a further name for `dim`.
    ///
    /// Re-registering an alias for the same tag is a no-op. Registering an alias that
    /// already points at a different tag is an error.
    pub fn register_alias(&self, alias: &str, dim: Dim) -> ClimResult<()> {
        let key = alias.trim().to_lowercase();
        if key.is_empty() {
            return Err(ClimError::Config(
                "dimension alias must not be empty".to_string(),
            ));
        }

        let mut aliases = self.aliases.write().expect("Registry lock poisoned");
        match aliases.get(&key) {
            Some(existing) if *existing == dim => Ok(()),
            Some(existing) => Err(ClimError::Config(format!(
                "alias '{}' already refers to {}, cannot redirect it to {}",
                key, existing, dim
            ))),
            None => {
                debug!("registering dimension alias '{}' for {}", key, dim);
                aliases.insert(key, dim);
                Ok(())
            }
        }
    }

    /// All names known for `dim`, sorted.
    pub fn aliases_for(&self, dim: Dim) -> Vec<String> {
        let aliases = self.aliases.read().expect("Registry lock poisoned");
        let mut names: Vec<String> = aliases
            .iter()
            .filter(|(_, d)| **d == dim)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_names() {
        assert_eq!(Dim::Time.code(), "Ti");
        assert_eq!(Dim::Coord.name(), "Coordinates");
        assert_eq!(format!("{}", Dim::Hei), "Hei");
    }

    #[test]
    fn spatial_tags() {
        let spatial: Vec<Dim> = Dim::ALL.into_iter().filter(Dim::is_spatial).collect();
        assert_eq!(spatial, vec![Dim::Lon, Dim::Lat, Dim::Coord]);
    }

    #[test]
    fn lookup_standard_names() {
        let registry = DimensionRegistry::new();
        assert_eq!(registry.lookup("lat"), Some(Dim::Lat));
        assert_eq!(registry.lookup("Latitude"), Some(Dim::Lat));
        assert_eq!(registry.lookup(" LON "), Some(Dim::Lon));
        assert_eq!(registry.lookup("plev"), Some(Dim::Pre));
        assert_eq!(registry.lookup("time"), Some(Dim::Time));
        assert_eq!(registry.lookup("wavelength"), None);
    }

    #[test]
    fn every_code_is_a_known_name() {
        let registry = DimensionRegistry::new();
        for dim in Dim::ALL {
            assert_eq!(registry.lookup(dim.code()), Some(dim));
        }
    }

    #[test]
    fn from_str_unknown_name() {
        let result = "wavelength".parse::<Dim>();
        assert_eq!(
            result,
            Err(ClimError::UnknownDimension("wavelength".to_string()))
        );
    }

    #[test]
    fn register_alias() {
        let registry = DimensionRegistry::new();
        registry.register_alias("rlat", Dim::Lat).unwrap();
        assert_eq!(registry.lookup("RLAT"), Some(Dim::Lat));
        // Same target again is fine
        registry.register_alias("rlat", Dim::Lat).unwrap();
        assert!(registry.aliases_for(Dim::Lat).contains(&"rlat".to_string()));
    }

    #[test]
    fn register_conflicting_alias() {
        let registry = DimensionRegistry::new();
        let result = registry.register_alias("lat", Dim::Lon);
        assert!(matches!(result, Err(ClimError::Config(_))));
        assert_eq!(registry.lookup("lat"), Some(Dim::Lat));
    }

    #[test]
    fn axis_select_and_reverse() {
        let axis = Axis::lat(vec![-60.0, -30.0, 0.0, 30.0]);
        assert_eq!(axis.select(&[3, 1]).numeric(), Some(&[30.0, -30.0][..]));
        assert_eq!(
            axis.reversed().numeric(),
            Some(&[30.0, 0.0, -30.0, -60.0][..])
        );

        let coords = Axis::coord(vec![Coordinate::new(0.0, -45.0), Coordinate::new(90.0, 45.0)]);
        assert_eq!(
            coords.reversed().points().unwrap()[0],
            Coordinate::new(90.0, 45.0)
        );
    }

    #[test]
    fn axis_consistency() {
        assert!(Axis::lon(vec![0.0]).is_consistent());
        assert!(Axis::coord(vec![Coordinate::new(0.0, 0.0)]).is_consistent());
        assert!(!Axis::new(Dim::Coord, vec![0.0]).is_consistent());
        assert!(!Axis::new(Dim::Lat, vec![Coordinate::new(0.0, 0.0)]).is_consistent());
    }
}
