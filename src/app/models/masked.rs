//! Masked numeric arrays
//!
//! A [`MaskedArray`] pairs an `ndarray` array of values with a boolean array of
//! identical shape in which `true` marks an entry as absent. Every operation
//! consults the mask explicitly; a masked entry never contributes to a sum or a
//! count, and arithmetic with a masked operand yields a masked result.

use crate::error::{ClimateError, Result};
use ndarray::{Array, Axis, Dimension, NdIndex, RemoveAxis, Zip};

/// Numeric array with a parallel validity mask
#[derive(Debug, Clone)]
pub struct MaskedArray<D: Dimension> {
    data: Array<f64, D>,
    mask: Array<bool, D>,
}

impl<D: Dimension> MaskedArray<D> {
    /// Pair values with a mask, rejecting mismatched shapes
    pub fn new(data: Array<f64, D>, mask: Array<bool, D>) -> Result<Self> {
        if data.shape() != mask.shape() {
            return Err(ClimateError::axis_mismatch(format!(
                "mask shape {:?} does not match data shape {:?}",
                mask.shape(),
                data.shape()
            )));
        }
        Ok(Self { data, mask })
    }

    /// Wrap values that are all present
    pub fn unmasked(data: Array<f64, D>) -> Self {
        let mask = Array::from_elem(data.raw_dim(), false);
        Self { data, mask }
    }

    /// Mask the entries for which `predicate` holds
    pub fn masked_where<F: Fn(f64) -> bool>(data: Array<f64, D>, predicate: F) -> Self {
        let mask = data.mapv(predicate);
        Self { data, mask }
    }

    /// An array of the given shape with every entry absent
    pub fn fully_masked(dim: D) -> Self {
        Self {
            data: Array::from_elem(dim.clone(), f64::NAN),
            mask: Array::from_elem(dim, true),
        }
    }

    /// Raw values, including whatever sits underneath masked entries
    pub fn data(&self) -> &Array<f64, D> {
        &self.data
    }

    /// Mask array; `true` marks an absent entry
    pub fn mask(&self) -> &Array<bool, D> {
        &self.mask
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn raw_dim(&self) -> D {
        self.data.raw_dim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `index`, or `None` when masked or out of bounds
    pub fn get<I: NdIndex<D> + Copy>(&self, index: I) -> Option<f64> {
        match (self.data.get(index), self.mask.get(index)) {
            (Some(&value), Some(&false)) => Some(value),
            _ => None,
        }
    }

    /// True when `index` is masked (out-of-bounds indices count as masked)
    pub fn is_masked<I: NdIndex<D> + Copy>(&self, index: I) -> bool {
        self.mask.get(index).copied().unwrap_or(true)
    }

    pub fn count_valid(&self) -> usize {
        self.mask.iter().filter(|&&masked| !masked).count()
    }

    pub fn count_masked(&self) -> usize {
        self.mask.iter().filter(|&&masked| masked).count()
    }

    /// Additionally mask every entry where `condition` is true
    pub fn mask_where(&mut self, condition: &Array<bool, D>) -> Result<()> {
        if condition.shape() != self.mask.shape() {
            return Err(ClimateError::axis_mismatch(format!(
                "condition shape {:?} does not match mask shape {:?}",
                condition.shape(),
                self.mask.shape()
            )));
        }
        Zip::from(&mut self.mask)
            .and(condition)
            .for_each(|masked, &extra| *masked = *masked || extra);
        Ok(())
    }

    /// Combine two arrays entry by entry; the result is masked where either operand is
    pub fn zip_with<F>(&self, other: &Self, op: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != other.shape() {
            return Err(ClimateError::axis_mismatch(format!(
                "operand shapes differ: {:?} vs {:?}",
                self.shape(),
                other.shape()
            )));
        }
        let mask = Zip::from(&self.mask)
            .and(&other.mask)
            .map_collect(|&a, &b| a || b);
        let data = Zip::from(&self.data)
            .and(&other.data)
            .and(&mask)
            .map_collect(|&a, &b, &masked| if masked { f64::NAN } else { op(a, b) });
        Ok(Self { data, mask })
    }

    /// Values with masked entries replaced by `fill`
    pub fn filled(&self, fill: f64) -> Array<f64, D> {
        Zip::from(&self.data)
            .and(&self.mask)
            .map_collect(|&value, &masked| if masked { fill } else { value })
    }

    /// Split into raw values and mask
    pub fn into_parts(self) -> (Array<f64, D>, Array<bool, D>) {
        (self.data, self.mask)
    }
}

impl<D: Dimension + RemoveAxis> MaskedArray<D> {
    /// Pick entries along `axis`; indices may repeat
    pub fn select(&self, axis: Axis, indices: &[usize]) -> Self {
        Self {
            data: self.data.select(axis, indices),
            mask: self.mask.select(axis, indices),
        }
    }

    /// Mean over the leading axis together with the number of contributing entries
    ///
    /// Masked entries are excluded from both the sum and the count. Positions
    /// with no contributing entry come back masked with a count of zero.
    pub fn mean_axis0(&self) -> (MaskedArray<D::Smaller>, Array<usize, D::Smaller>) {
        let inner = self.data.raw_dim().remove_axis(Axis(0));
        let mut sum = Array::<f64, _>::zeros(inner.clone());
        let mut count = Array::<usize, _>::zeros(inner);

        for (values, masked) in self
            .data
            .axis_iter(Axis(0))
            .zip(self.mask.axis_iter(Axis(0)))
        {
            Zip::from(&mut sum)
                .and(&mut count)
                .and(&values)
                .and(&masked)
                .for_each(|total, n, &value, &is_masked| {
                    if !is_masked {
                        *total += value;
                        *n += 1;
                    }
                });
        }

        let mean = Zip::from(&sum)
            .and(&count)
            .map_collect(|&total, &n| if n == 0 { f64::NAN } else { total / n as f64 });
        let mask = count.mapv(|n| n == 0);

        (MaskedArray { data: mean, mask }, count)
    }
}
