//! Cropping operations for spectra.
//!
//! Value-based crops locate the index window with a binary search that follows the axis
//! orientation, so descending frequency axes are searched in place with reversed comparisons.
//! Every crop records its parameters in the result's history.

use std::ops::Range;

use ndarray::{ArrayView1, Axis, Slice};
use tracing::trace;

use super::traits::SpectrumCropping;
use super::types::{IndexSlice, ValueRange};
use crate::meta::{TransformRecord, with_history};
use crate::{AxisKind, AxisOrientation, Spectrum, SpectrumError, SpectrumResult, SpectrumSample};

/// Number of leading elements for which `pred` holds, on an axis partitioned by `pred`.
fn partition_point(axis: ArrayView1<'_, f64>, pred: impl Fn(f64) -> bool) -> usize {
    let (mut lo, mut hi) = (0, axis.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(axis[mid]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Index window of the samples whose value lies in the closed interval `[min, max]`.
pub(crate) fn value_window(
    axis: ArrayView1<'_, f64>,
    orientation: AxisOrientation,
    kind: AxisKind,
    min: f64,
    max: f64,
) -> SpectrumResult<Range<usize>> {
    if min.is_nan() || max.is_nan() {
        return Err(SpectrumError::range(kind, min, max, "bounds must not be NaN"));
    }
    if min > max {
        return Err(SpectrumError::range(
            kind,
            min,
            max,
            "lower bound exceeds upper bound",
        ));
    }

    let window = match orientation {
        AxisOrientation::Ascending => {
            partition_point(axis, |v| v < min)..partition_point(axis, |v| v <= max)
        }
        AxisOrientation::Descending => {
            partition_point(axis, |v| v > max)..partition_point(axis, |v| v >= min)
        }
    };

    if window.is_empty() {
        let first = axis.first().copied().unwrap_or(f64::NAN);
        let last = axis.last().copied().unwrap_or(f64::NAN);
        return Err(SpectrumError::range(
            kind,
            min,
            max,
            format!("no samples inside the range; axis spans {first} to {last}"),
        ));
    }
    Ok(window)
}

impl<T: SpectrumSample> SpectrumCropping<T> for Spectrum<T> {
    fn crop_frequency(&self, f_min: f64, f_max: f64) -> SpectrumResult<Spectrum<T>> {
        let rows = value_window(
            self.freqs(),
            self.freq_orientation(),
            AxisKind::Frequency,
            f_min,
            f_max,
        )?;
        trace!(?rows, f_min, f_max, "crop_frequency window");

        let record = TransformRecord::new("crop_frequency")
            .param("f_min", f_min)
            .param("f_max", f_max);
        self.derive(
            self.data().slice_axis(Axis(0), Slice::from(rows.clone())).to_owned(),
            self.freqs().slice_axis(Axis(0), Slice::from(rows)).to_owned(),
            self.time().to_owned(),
            with_history(self.meta(), record),
        )
    }

    fn crop_time(&self, t_min: f64, t_max: f64) -> SpectrumResult<Spectrum<T>> {
        let cols = value_window(
            self.time(),
            AxisOrientation::Ascending,
            AxisKind::Time,
            t_min,
            t_max,
        )?;
        trace!(?cols, t_min, t_max, "crop_time window");

        let record = TransformRecord::new("crop_time")
            .param("t_min", t_min)
            .param("t_max", t_max);
        self.derive(
            self.data().slice_axis(Axis(1), Slice::from(cols.clone())).to_owned(),
            self.freqs().to_owned(),
            self.time().slice_axis(Axis(0), Slice::from(cols)).to_owned(),
            with_history(self.meta(), record),
        )
    }

    fn crop(
        &self,
        freq_range: Option<ValueRange>,
        time_range: Option<ValueRange>,
    ) -> SpectrumResult<Spectrum<T>> {
        match (freq_range, time_range) {
            (None, None) => Ok(self.clone()),
            (Some((f_min, f_max)), None) => self.crop_frequency(f_min, f_max),
            (None, Some((t_min, t_max))) => self.crop_time(t_min, t_max),
            (Some((f_min, f_max)), Some((t_min, t_max))) => {
                let rows = value_window(
                    self.freqs(),
                    self.freq_orientation(),
                    AxisKind::Frequency,
                    f_min,
                    f_max,
                )?;
                let cols = value_window(
                    self.time(),
                    AxisOrientation::Ascending,
                    AxisKind::Time,
                    t_min,
                    t_max,
                )?;
                trace!(?rows, ?cols, "crop window");

                let record = TransformRecord::new("crop")
                    .param("f_min", f_min)
                    .param("f_max", f_max)
                    .param("t_min", t_min)
                    .param("t_max", t_max);
                let data = self
                    .data()
                    .slice_axis(Axis(0), Slice::from(rows.clone()))
                    .slice_axis(Axis(1), Slice::from(cols.clone()))
                    .to_owned();
                self.derive(
                    data,
                    self.freqs().slice_axis(Axis(0), Slice::from(rows)).to_owned(),
                    self.time().slice_axis(Axis(0), Slice::from(cols)).to_owned(),
                    with_history(self.meta(), record),
                )
            }
        }
    }

    fn slice_by_index(
        &self,
        freq_slice: Option<IndexSlice>,
        time_slice: Option<IndexSlice>,
    ) -> SpectrumResult<Spectrum<T>> {
        let rows = freq_slice.unwrap_or_else(|| IndexSlice::new(0, self.n_freqs()));
        let cols = time_slice.unwrap_or_else(|| IndexSlice::new(0, self.n_times()));
        rows.validate(AxisKind::Frequency, self.n_freqs())?;
        cols.validate(AxisKind::Time, self.n_times())?;

        let row_slice = rows.to_slice();
        let col_slice = cols.to_slice();

        let record = TransformRecord::new("slice_by_index")
            .param("freq_start", rows.start)
            .param("freq_stop", rows.stop)
            .param("freq_step", rows.step)
            .param("time_start", cols.start)
            .param("time_stop", cols.stop)
            .param("time_step", cols.step);
        let data = self
            .data()
            .slice_axis(Axis(0), row_slice)
            .slice_axis(Axis(1), col_slice)
            .to_owned();
        self.derive(
            data,
            self.freqs().slice_axis(Axis(0), row_slice).to_owned(),
            self.time().slice_axis(Axis(0), col_slice).to_owned(),
            with_history(self.meta(), record),
        )
    }
}

/// Free-function form of [`SpectrumCropping::crop_frequency`].
pub fn crop_frequency<T: SpectrumSample>(
    spectrum: &Spectrum<T>,
    f_min: f64,
    f_max: f64,
) -> SpectrumResult<Spectrum<T>> {
    spectrum.crop_frequency(f_min, f_max)
}

/// Free-function form of [`SpectrumCropping::crop_time`].
pub fn crop_time<T: SpectrumSample>(
    spectrum: &Spectrum<T>,
    t_min: f64,
    t_max: f64,
) -> SpectrumResult<Spectrum<T>> {
    spectrum.crop_time(t_min, t_max)
}

/// Free-function form of [`SpectrumCropping::crop`].
pub fn crop<T: SpectrumSample>(
    spectrum: &Spectrum<T>,
    freq_range: Option<ValueRange>,
    time_range: Option<ValueRange>,
) -> SpectrumResult<Spectrum<T>> {
    spectrum.crop(freq_range, time_range)
}

/// Free-function form of [`SpectrumCropping::slice_by_index`].
pub fn slice_by_index<T: SpectrumSample>(
    spectrum: &Spectrum<T>,
    freq_slice: Option<IndexSlice>,
    time_slice: Option<IndexSlice>,
) -> SpectrumResult<Spectrum<T>> {
    spectrum.slice_by_index(freq_slice, time_slice)
}
