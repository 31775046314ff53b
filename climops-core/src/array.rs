//! Dimension-labelled arrays
//!
//! [`ClimArray`] couples an `ndarray::ArrayD<f64>` with one tagged [`Axis`] per array
//! dimension, a display name, free-form attributes and a list of *reference axes*.
//! Reference axes record provenance: reducing over latitude, for example, leaves the
//! latitude axis in `refdims` so that later readers can tell what the value was averaged over.
//!
//! Selections and reductions never mutate `self`; they return new arrays. The only in-place
//! operation is element assignment through [`ClimArray::set`].
//!
//! # Examples
//!
//! ```rust
//! use climops_core::array::ClimArray;
//! use climops_core::dimensions::{Axis, Dim};
//! use ndarray::{Array, IxDyn};
//!
//! let data = Array::from_shape_vec(IxDyn(&[2, 3]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! let field = ClimArray::new(
//!     data,
//!     vec![Axis::lon(vec![0.0, 180.0]), Axis::lat(vec![-45.0, 0.0, 45.0])],
//! )
//! .unwrap()
//! .with_name("tas");
//!
//! assert_eq!(field.dims(), vec![Dim::Lon, Dim::Lat]);
//! assert_eq!(field.size(Dim::Lat).unwrap(), 3);
//!
//! let north = field.select_range(Dim::Lat, 0.0..=90.0).unwrap();
//! assert_eq!(north.shape(), &[2, 2]);
//! ```

use crate::dimensions::{Axis, Coordinate, Dim, FloatValue};
use crate::errors::{ClimError, ClimResult};
use ndarray::{ArrayD, ArrayViewD, Dimension, IxDyn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Value stored in a [`ClimArray`]'s attribute map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

/// Free-form metadata attached to an array (units, long names, history, ...)
pub type Attributes = BTreeMap<String, AttrValue>;

/// A named, attributed array whose dimensions are labelled by [`Dim`] tags
///
/// Deserialisation goes through [`ClimArray::new`], so a payload whose axes disagree with
/// its data is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClimArray")]
pub struct ClimArray {
    data: ArrayD<FloatValue>,
    axes: Vec<Axis>,
    refdims: Vec<Axis>,
    name: String,
    attrs: Option<Attributes>,
}

/// Unvalidated serialised form of a [`ClimArray`]
#[derive(Deserialize)]
struct RawClimArray {
    data: ArrayD<FloatValue>,
    axes: Vec<Axis>,
    #[serde(default)]
    refdims: Vec<Axis>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    attrs: Option<Attributes>,
}

impl TryFrom<RawClimArray> for ClimArray {
    type Error = ClimError;

    fn try_from(raw: RawClimArray) -> Result<Self, Self::Error> {
        if let Some(axis) = raw.refdims.iter().find(|a| !a.is_consistent()) {
            return Err(ClimError::Error(format!(
                "reference axis {} holds the wrong kind of values",
                axis.dim
            )));
        }
        let mut array = ClimArray::new(raw.data, raw.axes)?
            .with_name(raw.name)
            .with_refdims(raw.refdims);
        array.attrs = raw.attrs;
        Ok(array)
    }
}

/// Result of a reduction that may collapse every dimension
#[derive(Clone, Debug, PartialEq)]
pub enum Reduced {
    /// All dimensions were reduced away
    Value(FloatValue),
    /// Some dimensions remain
    Array(ClimArray),
}

impl Reduced {
    pub fn as_value(&self) -> Option<FloatValue> {
        match self {
            Reduced::Value(v) => Some(*v),
            Reduced::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&ClimArray> {
        match self {
            Reduced::Array(a) => Some(a),
            Reduced::Value(_) => None,
        }
    }

    pub fn into_array(self) -> Option<ClimArray> {
        match self {
            Reduced::Array(a) => Some(a),
            Reduced::Value(_) => None,
        }
    }

    /// The reduced values as a (possibly zero-dimensional) ndarray
    pub(crate) fn into_data(self) -> ArrayD<FloatValue> {
        match self {
            Reduced::Value(v) => ndarray::arr0(v).into_dyn(),
            Reduced::Array(a) => a.data,
        }
    }
}

/// Appends `annotation` to a non-empty display name
pub(crate) fn annotated_name(name: &str, annotation: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("{}, {}", name, annotation)
    }
}

/// Fixes the axes at `positions` (ascending) to the entries of `index`
///
/// Axes are removed from the highest position down so that the lower positions stay valid.
pub(crate) fn index_other_axes<'a>(
    view: ArrayViewD<'a, FloatValue>,
    positions: &[usize],
    index: &[usize],
) -> ArrayViewD<'a, FloatValue> {
    positions
        .iter()
        .zip(index.iter())
        .rev()
        .fold(view, |v, (&pos, &i)| v.index_axis_move(ndarray::Axis(pos), i))
}

impl ClimArray {
    /// Creates an array from its data and one axis per dimension.
    ///
    /// # Errors
    ///
    /// * [`ClimError::ShapeMismatch`] if the number of axes differs from the rank or an axis
    ///   length differs from the corresponding extent
    /// * [`ClimError::DuplicateDimension`] if a tag appears twice
    /// * [`ClimError::Error`] if a [`Dim::Coord`] axis holds numeric values (or the reverse)
    pub fn new(data: ArrayD<FloatValue>, axes: Vec<Axis>) -> ClimResult<Self> {
        let axis_lengths: Vec<usize> = axes.iter().map(Axis::len).collect();
        if axis_lengths.as_slice() != data.shape() {
            return Err(ClimError::ShapeMismatch {
                expected: data.shape().to_vec(),
                got: axis_lengths,
            });
        }

        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|a| a.dim == axis.dim) {
                return Err(ClimError::DuplicateDimension(axis.dim.to_string()));
            }
            if !axis.is_consistent() {
                return Err(ClimError::Error(format!(
                    "axis {} holds the wrong kind of values",
                    axis.dim
                )));
            }
        }

        Ok(Self {
            data,
            axes,
            refdims: vec![],
            name: String::new(),
            attrs: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn with_refdims(mut self, refdims: Vec<Axis>) -> Self {
        self.refdims = refdims;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> Option<&Attributes> {
        self.attrs.as_ref()
    }

    pub fn refdims(&self) -> &[Axis] {
        &self.refdims
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn data(&self) -> &ArrayD<FloatValue> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<FloatValue> {
        self.data
    }

    /// Dimension tags in axis order
    pub fn dims(&self) -> Vec<Dim> {
        self.axes.iter().map(|a| a.dim).collect()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn has_dim(&self, dim: Dim) -> bool {
        self.axes.iter().any(|a| a.dim == dim)
    }

    /// Position of `dim` among the array's axes
    pub fn dim_index(&self, dim: Dim) -> ClimResult<usize> {
        self.axes
            .iter()
            .position(|a| a.dim == dim)
            .ok_or_else(|| ClimError::MissingDimension(dim.name().to_string()))
    }

    pub fn axis(&self, dim: Dim) -> ClimResult<&Axis> {
        let i = self.dim_index(dim)?;
        Ok(&self.axes[i])
    }

    /// Length of the `dim` axis
    pub fn size(&self, dim: Dim) -> ClimResult<usize> {
        Ok(self.axis(dim)?.len())
    }

    /// Numeric coordinate values of a non-[`Dim::Coord`] axis
    pub fn values(&self, dim: Dim) -> ClimResult<&[FloatValue]> {
        self.axis(dim)?.numeric().ok_or_else(|| {
            ClimError::Error(format!("axis {} does not hold numeric values", dim))
        })
    }

    /// Points of the [`Dim::Coord`] axis
    pub fn coordinates(&self) -> ClimResult<&[Coordinate]> {
        self.axis(Dim::Coord)?
            .points()
            .ok_or_else(|| ClimError::Error("Coord axis does not hold points".to_string()))
    }

    /// Tags of all axes except those in `exclude`, in axis order
    pub fn other_dims(&self, exclude: &[Dim]) -> Vec<Dim> {
        self.axes
            .iter()
            .map(|a| a.dim)
            .filter(|d| !exclude.contains(d))
            .collect()
    }

    /// Value at a full multi-index, or `None` when out of bounds
    pub fn get(&self, index: &[usize]) -> Option<FloatValue> {
        if index.len() != self.ndim() {
            return None;
        }
        self.data.get(IxDyn(index)).copied()
    }

    /// Assigns `value` at a full multi-index, in place.
    pub fn set(&mut self, index: &[usize], value: FloatValue) -> ClimResult<()> {
        let shape = self.shape().to_vec();
        if index.len() != shape.len() {
            return Err(ClimError::ShapeMismatch {
                expected: shape,
                got: index.to_vec(),
            });
        }
        match self.data.get_mut(IxDyn(index)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ClimError::Error(format!(
                "index {:?} out of bounds for shape {:?}",
                index, shape
            ))),
        }
    }

    /// The value of a zero-dimensional array
    pub fn scalar(&self) -> Option<FloatValue> {
        if self.ndim() == 0 {
            self.data.first().copied()
        } else {
            None
        }
    }

    /// New array keeping only the positions `indices` (in that order) along `dim`.
    ///
    /// # Errors
    ///
    /// Fails if `dim` is missing, `indices` is empty or any index is out of bounds.
    pub fn select_indices(&self, dim: Dim, indices: &[usize]) -> ClimResult<ClimArray> {
        self.dim_index(dim)?;
        if indices.is_empty() {
            return Err(ClimError::EmptySelection(format!("{} indices", dim)));
        }
        self.take_indices(dim, indices)
    }

    /// Like [`ClimArray::select_indices`], but an empty `indices` gives a zero-length axis.
    pub(crate) fn take_indices(&self, dim: Dim, indices: &[usize]) -> ClimResult<ClimArray> {
        let pos = self.dim_index(dim)?;
        let len = self.shape()[pos];
        if let Some(bad) = indices.iter().find(|&&i| i >= len) {
            return Err(ClimError::Error(format!(
                "index {} out of bounds for {} axis of length {}",
                bad, dim, len
            )));
        }

        let mut axes = self.axes.clone();
        axes[pos] = self.axes[pos].select(indices);
        Ok(ClimArray {
            data: self.data.select(ndarray::Axis(pos), indices),
            axes,
            refdims: self.refdims.clone(),
            name: self.name.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// New array keeping the positions whose `dim` value lies in `range` (inclusive).
    ///
    /// The original ordering along `dim` is preserved, whether ascending or descending.
    pub fn select_range(
        &self,
        dim: Dim,
        range: RangeInclusive<FloatValue>,
    ) -> ClimResult<ClimArray> {
        let indices: Vec<usize> = self
            .values(dim)?
            .iter()
            .enumerate()
            .filter(|(_, v)| range.contains(*v))
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            return Err(ClimError::EmptySelection(format!(
                "{} in [{}, {}]",
                dim,
                range.start(),
                range.end()
            )));
        }
        self.select_indices(dim, &indices)
    }

    /// New array with `dim` fixed at position `index` and dropped.
    ///
    /// The dropped axis, reduced to the selected value, is appended to `refdims`.
    pub fn index_dim(&self, dim: Dim, index: usize) -> ClimResult<ClimArray> {
        let pos = self.dim_index(dim)?;
        let len = self.shape()[pos];
        if index >= len {
            return Err(ClimError::Error(format!(
                "index {} out of bounds for {} axis of length {}",
                index, dim, len
            )));
        }

        let mut axes = self.axes.clone();
        let dropped = axes.remove(pos);
        let mut refdims = self.refdims.clone();
        refdims.push(dropped.select(&[index]));

        Ok(ClimArray {
            data: self.data.index_axis(ndarray::Axis(pos), index).to_owned(),
            axes,
            refdims,
            name: self.name.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// New array with the data and the axis values of `dim` reversed
    pub fn reverse_dim(&self, dim: Dim) -> ClimResult<ClimArray> {
        let pos = self.dim_index(dim)?;
        let mut data = self.data.clone();
        data.invert_axis(ndarray::Axis(pos));

        let mut axes = self.axes.clone();
        axes[pos] = self.axes[pos].reversed();
        Ok(ClimArray {
            data: data.as_standard_layout().into_owned(),
            axes,
            refdims: self.refdims.clone(),
            name: self.name.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// Replaces the axis carrying `axis.dim` with `axis`, keeping the data untouched.
    ///
    /// # Errors
    ///
    /// Fails if the array has no such axis or the lengths differ.
    pub fn with_axis(mut self, axis: Axis) -> ClimResult<ClimArray> {
        let pos = self.dim_index(axis.dim)?;
        if axis.len() != self.axes[pos].len() {
            return Err(ClimError::ShapeMismatch {
                expected: vec![self.axes[pos].len()],
                got: vec![axis.len()],
            });
        }
        if !axis.is_consistent() {
            return Err(ClimError::Error(format!(
                "axis {} holds the wrong kind of values",
                axis.dim
            )));
        }
        self.axes[pos] = axis;
        Ok(self)
    }

    /// Applies `f` to every combination of the axes not listed in `dims`.
    ///
    /// `f` receives a view over the `dims` axes (in the array's axis order) together with
    /// the multi-index of the remaining axes, and returns one value per call. The results
    /// form a new array over the remaining axes, with the reduced axes appended to
    /// `refdims`. When no axis remains the single result is returned as
    /// [`Reduced::Value`].
    pub fn reduce_dims<F>(&self, dims: &[Dim], mut f: F) -> ClimResult<Reduced>
    where
        F: FnMut(ArrayViewD<'_, FloatValue>, &[usize]) -> ClimResult<FloatValue>,
    {
        for dim in dims {
            self.dim_index(*dim)?;
        }

        let other_positions: Vec<usize> = (0..self.ndim())
            .filter(|&p| !dims.contains(&self.axes[p].dim))
            .collect();
        let other_shape: Vec<usize> = other_positions.iter().map(|&p| self.shape()[p]).collect();

        let mut values = Vec::with_capacity(other_shape.iter().product());
        for index in ndarray::indices(IxDyn(&other_shape)) {
            let index = index.slice();
            let view = index_other_axes(self.data.view(), &other_positions, index);
            values.push(f(view, index)?);
        }

        if other_positions.is_empty() {
            return Ok(Reduced::Value(values[0]));
        }

        let data = ArrayD::from_shape_vec(IxDyn(&other_shape), values)
            .map_err(|e| ClimError::Error(e.to_string()))?;
        let axes = other_positions
            .iter()
            .map(|&p| self.axes[p].clone())
            .collect();
        let mut refdims = self.refdims.clone();
        refdims.extend(
            self.axes
                .iter()
                .filter(|a| dims.contains(&a.dim))
                .cloned(),
        );

        Ok(Reduced::Array(ClimArray {
            data,
            axes,
            refdims,
            name: self.name.clone(),
            attrs: self.attrs.clone(),
        }))
    }
}
