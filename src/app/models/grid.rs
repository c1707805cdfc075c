//! Gridded fields and monthly grid series
//!
//! [`GridAxes`] describes a latitude/longitude grid, [`Grid2D`] is a single
//! masked field over it and [`GridSeries`] is a chronologically ordered stack of
//! fields sharing one pair of axes, timestamped as day offsets from an epoch.

use super::calendar::{Cadence, days_since};
use super::masked::MaskedArray;
use crate::error::{ClimateError, Result};
use chrono::{Days, NaiveDate};
use ndarray::{Array2, ArrayView2, Axis, Ix2, Ix3, s};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Direction of the latitude axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatitudeOrder {
    Ascending,
    Descending,
}

/// Longitude labelling convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LongitudeConvention {
    /// Longitudes in `[0, 360)`
    ZeroTo360,
    /// Longitudes in `[-180, 180)`
    Centred,
}

/// Latitude and longitude coordinates of a rectangular grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
}

impl GridAxes {
    /// Build axes, requiring strictly monotonic latitudes and strictly ascending longitudes
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>) -> Result<Self> {
        if latitudes.is_empty() || longitudes.is_empty() {
            return Err(ClimateError::axis_mismatch("grid axes must not be empty"));
        }
        let ascending = latitudes.windows(2).all(|w| w[0] < w[1]);
        let descending = latitudes.windows(2).all(|w| w[0] > w[1]);
        if !ascending && !descending {
            return Err(ClimateError::axis_mismatch(
                "latitudes must be strictly ascending or strictly descending",
            ));
        }
        if !longitudes.windows(2).all(|w| w[0] < w[1]) {
            return Err(ClimateError::axis_mismatch(
                "longitudes must be strictly ascending",
            ));
        }
        Ok(Self {
            latitudes,
            longitudes,
        })
    }

    /// Evenly spaced axes from a start coordinate, a step and a count
    pub fn regular(
        latitude_start: f64,
        latitude_step: f64,
        latitude_count: usize,
        longitude_start: f64,
        longitude_step: f64,
        longitude_count: usize,
    ) -> Result<Self> {
        let latitudes = (0..latitude_count)
            .map(|i| latitude_start + i as f64 * latitude_step)
            .collect();
        let longitudes = (0..longitude_count)
            .map(|i| longitude_start + i as f64 * longitude_step)
            .collect();
        Self::new(latitudes, longitudes)
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// `(n_lat, n_lon)`
    pub fn shape(&self) -> (usize, usize) {
        (self.latitudes.len(), self.longitudes.len())
    }

    pub fn latitude_order(&self) -> LatitudeOrder {
        if self.latitudes.len() < 2 || self.latitudes[0] < self.latitudes[1] {
            LatitudeOrder::Ascending
        } else {
            LatitudeOrder::Descending
        }
    }

    pub fn longitude_convention(&self) -> LongitudeConvention {
        if self.longitudes[0] < 0.0 {
            LongitudeConvention::Centred
        } else {
            LongitudeConvention::ZeroTo360
        }
    }

    /// Same grid with the latitude axis flipped
    pub fn reversed_latitudes(&self) -> Self {
        Self {
            latitudes: self.latitudes.iter().rev().copied().collect(),
            longitudes: self.longitudes.clone(),
        }
    }

    /// Indices of latitudes inside `[min, max]`, which are always contiguous
    fn latitude_band(&self, min: f64, max: f64) -> Result<(usize, usize)> {
        let inside: Vec<usize> = self
            .latitudes
            .iter()
            .enumerate()
            .filter(|&(_, &lat)| lat >= min && lat <= max)
            .map(|(i, _)| i)
            .collect();
        match (inside.first(), inside.last()) {
            (Some(&first), Some(&last)) => Ok((first, last + 1)),
            _ => Err(ClimateError::axis_mismatch(format!(
                "no latitudes between {} and {}",
                min, max
            ))),
        }
    }

    fn with_latitude_slice(&self, start: usize, end: usize) -> Self {
        Self {
            latitudes: self.latitudes[start..end].to_vec(),
            longitudes: self.longitudes.clone(),
        }
    }
}

/// A single masked field over a latitude/longitude grid
#[derive(Debug, Clone)]
pub struct Grid2D {
    axes: GridAxes,
    values: MaskedArray<Ix2>,
}

impl Grid2D {
    pub fn new(axes: GridAxes, values: MaskedArray<Ix2>) -> Result<Self> {
        let (n_lat, n_lon) = axes.shape();
        if values.shape() != [n_lat, n_lon] {
            return Err(ClimateError::axis_mismatch(format!(
                "grid values shape {:?} does not match axes ({}, {})",
                values.shape(),
                n_lat,
                n_lon
            )));
        }
        Ok(Self { axes, values })
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn values(&self) -> &MaskedArray<Ix2> {
        &self.values
    }

    pub fn shape(&self) -> (usize, usize) {
        self.axes.shape()
    }

    pub fn is_masked(&self, lat_index: usize, lon_index: usize) -> bool {
        self.values.is_masked((lat_index, lon_index))
    }

    pub fn get(&self, lat_index: usize, lon_index: usize) -> Option<f64> {
        self.values.get((lat_index, lon_index))
    }

    /// Latitude bands inside `[min, max]`
    pub fn restrict_latitudes(&self, min: f64, max: f64) -> Result<Self> {
        let (start, end) = self.axes.latitude_band(min, max)?;
        let (data, mask) = (self.values.data(), self.values.mask());
        Ok(Self {
            axes: self.axes.with_latitude_slice(start, end),
            values: MaskedArray::new(
                data.slice(s![start..end, ..]).to_owned(),
                mask.slice(s![start..end, ..]).to_owned(),
            )?,
        })
    }
}

/// Chronological stack of grids sharing one pair of axes
///
/// Timestamps are whole days since `epoch`, strictly increasing.
#[derive(Debug, Clone)]
pub struct GridSeries {
    axes: GridAxes,
    cadence: Cadence,
    epoch: NaiveDate,
    offsets: Vec<i64>,
    values: MaskedArray<Ix3>,
}

impl GridSeries {
    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    /// Day offsets from the epoch
    pub fn times(&self) -> &[i64] {
        &self.offsets
    }

    /// Values indexed `(time, lat, lon)`
    pub fn values(&self) -> &MaskedArray<Ix3> {
        &self.values
    }

    pub fn mask(&self) -> &ndarray::Array3<bool> {
        self.values.mask()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn is_masked(&self, time_index: usize, lat_index: usize, lon_index: usize) -> bool {
        self.values.is_masked((time_index, lat_index, lon_index))
    }

    /// CF-style time units string, e.g. `days since 2015-12-01 00:00:00`
    pub fn time_units(&self) -> String {
        format!("days since {} 00:00:00", self.epoch.format("%Y-%m-%d"))
    }

    /// Calendar date of every timestamp
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.offsets
            .iter()
            .map(|&offset| offset_date(self.epoch, offset))
            .collect()
    }

    /// Owned copy of the field at `index`
    pub fn grid(&self, index: usize) -> Option<Grid2D> {
        if index >= self.len() {
            return None;
        }
        let values = MaskedArray::new(
            self.values.data().index_axis(Axis(0), index).to_owned(),
            self.values.mask().index_axis(Axis(0), index).to_owned(),
        )
        .ok()?;
        Some(Grid2D {
            axes: self.axes.clone(),
            values,
        })
    }

    /// Timestamps inside `[start, end)`, keeping the original epoch
    pub fn restrict(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let indices: Vec<usize> = self
            .dates()
            .into_iter()
            .enumerate()
            .filter(|&(_, date)| start <= date && date < end)
            .map(|(i, _)| i)
            .collect();
        debug!(
            "Restricted grid series to {}..{}: {} of {} steps",
            start,
            end,
            indices.len(),
            self.len()
        );
        Self {
            axes: self.axes.clone(),
            cadence: self.cadence,
            epoch: self.epoch,
            offsets: indices.iter().map(|&i| self.offsets[i]).collect(),
            values: self.values.select(Axis(0), &indices),
        }
    }

    /// Latitude bands inside `[min, max]` for every timestamp
    pub fn restrict_latitudes(&self, min: f64, max: f64) -> Result<Self> {
        let (start, end) = self.axes.latitude_band(min, max)?;
        let (data, mask) = (self.values.data(), self.values.mask());
        Ok(Self {
            axes: self.axes.with_latitude_slice(start, end),
            cadence: self.cadence,
            epoch: self.epoch,
            offsets: self.offsets.clone(),
            values: MaskedArray::new(
                data.slice(s![.., start..end, ..]).to_owned(),
                mask.slice(s![.., start..end, ..]).to_owned(),
            )?,
        })
    }
}

fn offset_date(epoch: NaiveDate, offset: i64) -> NaiveDate {
    if offset >= 0 {
        epoch
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(NaiveDate::MAX)
    } else {
        epoch
            .checked_sub_days(Days::new(offset.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Incremental constructor for a [`GridSeries`]
///
/// The first pushed date becomes the epoch; later dates must be strictly later.
#[derive(Debug)]
pub struct GridSeriesBuilder {
    axes: GridAxes,
    cadence: Cadence,
    epoch: Option<NaiveDate>,
    last: Option<NaiveDate>,
    offsets: Vec<i64>,
    data: Vec<Array2<f64>>,
    mask: Vec<Array2<bool>>,
}

impl GridSeriesBuilder {
    pub fn new(axes: GridAxes, cadence: Cadence) -> Self {
        Self {
            axes,
            cadence,
            epoch: None,
            last: None,
            offsets: Vec::new(),
            data: Vec::new(),
            mask: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Date of the most recently pushed field
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last
    }

    /// Append one field, rejecting shape mismatches and non-increasing dates
    pub fn push(&mut self, date: NaiveDate, field: MaskedArray<Ix2>) -> Result<()> {
        let (n_lat, n_lon) = self.axes.shape();
        if field.shape() != [n_lat, n_lon] {
            return Err(ClimateError::axis_mismatch(format!(
                "field for {} has shape {:?}, expected ({}, {})",
                date,
                field.shape(),
                n_lat,
                n_lon
            )));
        }
        if let Some(last) = self.last {
            if date <= last {
                return Err(ClimateError::axis_mismatch(format!(
                    "field for {} does not follow {}",
                    date, last
                )));
            }
        }
        let epoch = *self.epoch.get_or_insert(date);
        self.offsets.push(days_since(epoch, date));
        self.last = Some(date);

        let (data, mask) = field.into_parts();
        self.data.push(data);
        self.mask.push(mask);
        Ok(())
    }

    /// Freeze the accumulated fields into a series
    pub fn finish(self) -> Result<GridSeries> {
        let epoch = self
            .epoch
            .ok_or_else(|| ClimateError::insufficient_data("grid series has no fields"))?;

        let data_views: Vec<ArrayView2<f64>> = self.data.iter().map(|a| a.view()).collect();
        let mask_views: Vec<ArrayView2<bool>> = self.mask.iter().map(|a| a.view()).collect();
        let data = ndarray::stack(Axis(0), &data_views)
            .map_err(|e| ClimateError::axis_mismatch(e.to_string()))?;
        let mask = ndarray::stack(Axis(0), &mask_views)
            .map_err(|e| ClimateError::axis_mismatch(e.to_string()))?;

        Ok(GridSeries {
            axes: self.axes,
            cadence: self.cadence,
            epoch,
            offsets: self.offsets,
            values: MaskedArray::new(data, mask)?,
        })
    }
}
