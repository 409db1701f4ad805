//! Batch forms of the cropping and noise-reduction operations.

use super::BatchOperation;
use crate::operations::{NoiseReduction, SpectrumCropping, SpectrumProcessing, ValueRange};
use crate::{Spectrum, SpectrumResult, SpectrumSample};

/// Crops every spectrum to the same frequency and/or time window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchCrop {
    /// Inclusive frequency window in MHz, `None` keeps every channel.
    pub freq_range: Option<ValueRange>,
    /// Inclusive time window in seconds, `None` keeps every sample.
    pub time_range: Option<ValueRange>,
}

impl BatchCrop {
    /// Create a crop over both axes.
    pub const fn new(freq_range: Option<ValueRange>, time_range: Option<ValueRange>) -> Self {
        Self {
            freq_range,
            time_range,
        }
    }

    /// Crop along frequency only.
    pub const fn frequency(f_min: f64, f_max: f64) -> Self {
        Self::new(Some((f_min, f_max)), None)
    }

    /// Crop along time only.
    pub const fn time(t_min: f64, t_max: f64) -> Self {
        Self::new(None, Some((t_min, t_max)))
    }
}

impl<T: SpectrumSample> BatchOperation<T> for BatchCrop {
    fn apply_to_item(&self, item: &Spectrum<T>) -> SpectrumResult<Spectrum<T>> {
        item.crop(self.freq_range, self.time_range)
    }

    fn description(&self) -> &str {
        "crop"
    }
}

/// Mean-subtract-and-clip noise reduction over every spectrum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchNoiseReduce {
    /// Parameters shared by every item.
    pub params: NoiseReduction,
}

impl BatchNoiseReduce {
    /// Create a batch noise reduction with the given parameters.
    pub const fn new(params: NoiseReduction) -> Self {
        Self { params }
    }
}

impl<T: SpectrumSample> BatchOperation<T> for BatchNoiseReduce {
    fn apply_to_item(&self, item: &Spectrum<T>) -> SpectrumResult<Spectrum<T>> {
        item.noise_reduce_mean_clip(self.params)
    }

    fn description(&self) -> &str {
        "noise_reduce_mean_clip"
    }
}
