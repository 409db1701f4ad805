//! Core trait definitions for spectrum operations.
//!
//! Each trait covers one concern and is implemented for [`Spectrum`]. All methods are pure: they
//! read their inputs and return a freshly allocated spectrum.

use super::types::{IndexSlice, NoiseReduction, ValueRange};
use crate::{Spectrum, SpectrumResult, SpectrumSample};

/// Restricting a spectrum to a contiguous part of its axes, without resampling.
///
/// Value-based crops are closed intervals: every sample whose axis value lies in `[min, max]` is
/// kept.
pub trait SpectrumCropping<T: SpectrumSample> {
    /// Keeps the frequency channels within `[f_min, f_max]` MHz.
    ///
    /// Works on ascending and descending frequency axes alike; the channel order is preserved.
    ///
    /// # Errors
    /// [`SpectrumError::Range`](crate::SpectrumError::Range) if `f_min > f_max`, a bound is NaN,
    /// or no channel falls inside the range.
    fn crop_frequency(&self, f_min: f64, f_max: f64) -> SpectrumResult<Spectrum<T>>;

    /// Keeps the time samples within `[t_min, t_max]` seconds.
    ///
    /// # Errors
    /// [`SpectrumError::Range`](crate::SpectrumError::Range) if `t_min > t_max`, a bound is NaN,
    /// or no sample falls inside the range.
    fn crop_time(&self, t_min: f64, t_max: f64) -> SpectrumResult<Spectrum<T>>;

    /// Applies [`crop_frequency`](Self::crop_frequency) and/or [`crop_time`](Self::crop_time).
    /// An omitted range leaves that axis untouched.
    fn crop(
        &self,
        freq_range: Option<ValueRange>,
        time_range: Option<ValueRange>,
    ) -> SpectrumResult<Spectrum<T>>;

    /// Positional variant taking index windows directly.
    ///
    /// # Errors
    /// [`SpectrumError::Index`](crate::SpectrumError::Index) if a window reaches past the axis,
    /// selects nothing, or has a zero step.
    fn slice_by_index(
        &self,
        freq_slice: Option<IndexSlice>,
        time_slice: Option<IndexSlice>,
    ) -> SpectrumResult<Spectrum<T>>;
}

/// Merging several compatible spectra into one.
pub trait SpectrumCombining<T: SpectrumSample> {
    /// Stacks spectra that share a time axis into one spanning the union of their bands.
    ///
    /// # Errors
    /// [`SpectrumError::Combine`](crate::SpectrumError::Combine) if the list is empty or the inputs
    /// fail [`can_combine_frequency`](super::can_combine_frequency).
    fn combine_frequency(spectra: &[Self], tol: f64) -> SpectrumResult<Spectrum<T>>
    where
        Self: Sized;

    /// Joins spectra that share a frequency axis into one spanning the union of their time spans.
    ///
    /// # Errors
    /// [`SpectrumError::Combine`](crate::SpectrumError::Combine) if the list is empty, the inputs
    /// fail [`can_combine_time`](super::can_combine_time), or consecutive spans leave a gap.
    fn combine_time(spectra: &[Self], tol: f64) -> SpectrumResult<Spectrum<T>>
    where
        Self: Sized;
}

/// Elementwise intensity transforms.
pub trait SpectrumProcessing<T: SpectrumSample> {
    /// Subtracts each channel's mean over time, clips, then optionally scales.
    ///
    /// The parameters are recorded under `noise_reduction` in the result's metadata.
    ///
    /// # Errors
    /// [`SpectrumError::InvalidParameter`](crate::SpectrumError::InvalidParameter) for inverted or
    /// non-finite parameters.
    fn noise_reduce_mean_clip(&self, params: NoiseReduction) -> SpectrumResult<Spectrum<T>>;
}
