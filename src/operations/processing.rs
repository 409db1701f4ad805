//! Noise reduction for spectra.
//!
//! The background of a CALLISTO spectrum is dominated by a per-channel offset; subtracting each
//! channel's mean over time and clipping the residual makes bursts stand out.

use ndarray::Axis;
use num_traits::NumCast;

use super::traits::SpectrumProcessing;
use super::types::NoiseReduction;
use crate::meta::{MetaValue, TransformRecord, with_history};
use crate::{Spectrum, SpectrumError, SpectrumResult, SpectrumSample};

/// Meta key holding the parameters of the last noise reduction.
pub const NOISE_REDUCTION_KEY: &str = "noise_reduction";

fn to_sample<T: SpectrumSample>(value: f64, name: &str) -> SpectrumResult<T> {
    <T as NumCast>::from(value).ok_or_else(|| {
        SpectrumError::invalid_parameter(format!(
            "{name} ({value}) is not representable as {}",
            T::DTYPE
        ))
    })
}

impl<T: SpectrumSample> SpectrumProcessing<T> for Spectrum<T> {
    fn noise_reduce_mean_clip(&self, params: NoiseReduction) -> SpectrumResult<Spectrum<T>> {
        params.validate()?;
        let low: T = to_sample(params.clip_low, "clip_low")?;
        let high: T = to_sample(params.clip_high, "clip_high")?;
        let scale: Option<T> = params
            .scale
            .map(|s| to_sample(s, "scale"))
            .transpose()?;

        let means = self
            .data()
            .mean_axis(Axis(1))
            .ok_or_else(|| SpectrumError::shape("cannot average a spectrum without samples"))?;

        let mut data = self.data().to_owned();
        for (mut row, &mean) in data.axis_iter_mut(Axis(0)).zip(means.iter()) {
            row.mapv_inplace(|x| {
                let clipped = (x - mean).max(low).min(high);
                match scale {
                    Some(factor) => clipped * factor,
                    None => clipped,
                }
            });
        }

        let record = TransformRecord::new("mean_subtract_clip")
            .param("clip_low", params.clip_low)
            .param("clip_high", params.clip_high)
            .param("scale", params.scale);
        let mut meta = self.meta().clone();
        meta.insert(
            NOISE_REDUCTION_KEY.to_string(),
            MetaValue::Map(record.clone().into_meta()),
        );

        self.derive(
            data,
            self.freqs().to_owned(),
            self.time().to_owned(),
            with_history(&meta, record),
        )
    }
}

/// Free-function form of [`SpectrumProcessing::noise_reduce_mean_clip`].
pub fn noise_reduce_mean_clip<T: SpectrumSample>(
    spectrum: &Spectrum<T>,
    params: NoiseReduction,
) -> SpectrumResult<Spectrum<T>> {
    spectrum.noise_reduce_mean_clip(params)
}
