//! Synthetic e-CALLISTO spectra for tests, demos and benchmarks.
//!
//! The generated grid resembles a real recording: Gaussian receiver noise around a background that
//! rises linearly across the channels, with an optional Type III burst drifting from high to low
//! frequency. Values are clipped to the 8-bit range the instrument produces.

use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::io::file_meta;
use crate::meta::MetaValue;
use crate::{Spectrum, SpectrumError, SpectrumResult, SpectrumSample};

const NOISE_MEAN: f64 = 50.0;
const NOISE_STD: f64 = 5.0;
const BACKGROUND_LOW: f64 = 5.0;
const BACKGROUND_HIGH: f64 = 15.0;
const BURST_AMPLITUDE: f64 = 30.0;
const BURST_WIDTH: f64 = 20.0;
/// Delay in samples between the burst reaching the top and the bottom channel.
const BURST_DRIFT: f64 = 100.0;

/// Parameters of a synthetic spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSpectrum {
    /// Number of frequency channels.
    pub n_freq: usize,
    /// Number of time samples.
    pub n_time: usize,
    /// First channel frequency in MHz.
    pub freq_start: f64,
    /// Last channel frequency in MHz.
    pub freq_end: f64,
    /// Time of the last sample in seconds; the first is at 0.
    pub duration_s: f64,
    /// Station name recorded in the metadata.
    pub station: String,
    /// Whether to add a drifting burst around the middle of the recording.
    pub burst: bool,
    /// Seed for the noise generator.
    pub seed: u64,
}

impl Default for SyntheticSpectrum {
    fn default() -> Self {
        Self {
            n_freq: 200,
            n_time: 3600,
            freq_start: 45.0,
            freq_end: 870.0,
            duration_s: 900.0,
            station: "SAMPLE".to_string(),
            burst: true,
            seed: 42,
        }
    }
}

impl SyntheticSpectrum {
    /// Quiet-sun variant of `self`.
    pub fn without_burst(mut self) -> Self {
        self.burst = false;
        self
    }

    /// Filename this spectrum would carry in the archive, for a given date, start and focus code.
    pub fn file_name(&self, date_yyyymmdd: &str, time_hhmmss: &str, focus: &str) -> String {
        format!(
            "{}_{}_{}_{}.fit.gz",
            self.station, date_yyyymmdd, time_hhmmss, focus
        )
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Array1<f64> {
    if n == 1 {
        return Array1::from(vec![start]);
    }
    let step = (end - start) / (n - 1) as f64;
    Array1::from_iter((0..n).map(|i| if i == n - 1 { end } else { start + step * i as f64 }))
}

/// Generates a spectrum from `config`.
///
/// The same configuration always produces the same samples.
///
/// # Errors
/// [`SpectrumError::InvalidParameter`] for empty dimensions, non-finite or degenerate axis
/// bounds (the axes must be strictly monotonic).
pub fn synthetic_spectrum<T: SpectrumSample>(
    config: &SyntheticSpectrum,
) -> SpectrumResult<Spectrum<T>> {
    let SyntheticSpectrum {
        n_freq,
        n_time,
        freq_start,
        freq_end,
        duration_s,
        ..
    } = *config;

    if n_freq == 0 || n_time == 0 {
        return Err(SpectrumError::invalid_parameter(format!(
            "synthetic spectrum needs at least one channel and one sample, got {n_freq} x {n_time}"
        )));
    }
    if !(freq_start.is_finite() && freq_end.is_finite() && duration_s.is_finite()) {
        return Err(SpectrumError::invalid_parameter(
            "synthetic spectrum bounds must be finite",
        ));
    }
    if (n_freq > 1 && freq_start == freq_end) || (n_time > 1 && duration_s <= 0.0) {
        return Err(SpectrumError::invalid_parameter(format!(
            "degenerate axes: {freq_start}..{freq_end} MHz over {duration_s} s"
        )));
    }

    let freqs = linspace(freq_start, freq_end, n_freq);
    let time = linspace(0.0, duration_s, n_time);

    let noise = Normal::new(NOISE_MEAN, NOISE_STD)
        .map_err(|e| SpectrumError::invalid_parameter(format!("receiver noise: {e}")))?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let background = linspace(BACKGROUND_LOW, BACKGROUND_HIGH, n_freq);
    let mut grid = Array2::<f64>::zeros((n_freq, n_time));
    for ((f, _), value) in grid.indexed_iter_mut() {
        *value = noise.sample(&mut rng) + background[f];
    }

    if config.burst {
        let t_center = (n_time / 2) as f64;
        let span = freq_end - freq_start;
        for (f, mut row) in grid.rows_mut().into_iter().enumerate() {
            // higher frequencies are reached first
            let delay = if span == 0.0 {
                0.0
            } else {
                ((freq_end - freqs[f]) / span * BURST_DRIFT).trunc()
            };
            let t_burst = t_center + delay;
            if t_burst >= n_time as f64 {
                continue;
            }
            for (t, value) in row.iter_mut().enumerate() {
                let z = (t as f64 - t_burst) / BURST_WIDTH;
                *value += BURST_AMPLITUDE * (-0.5 * z * z).exp();
            }
        }
    }

    let data = grid.mapv(|v| T::from_f64(v.clamp(0.0, 255.0)).unwrap_or_else(T::zero));

    let name = config.file_name("20240101", "120000", "01");
    let mut meta = file_meta(&name, Some(12.0 * 3600.0));
    meta.insert("synthetic".to_string(), MetaValue::Bool(true));
    meta.insert("seed".to_string(), MetaValue::Integer(config.seed as i64));

    Ok(Spectrum::new(data, freqs, time)?.with_meta(meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::SpectrumCropping;

    fn small() -> SyntheticSpectrum {
        SyntheticSpectrum {
            n_freq: 20,
            n_time: 400,
            duration_s: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_shape_and_axes() {
        let s: Spectrum<f32> = synthetic_spectrum(&SyntheticSpectrum::default()).unwrap();
        assert_eq!(s.shape(), (200, 3600));
        assert_eq!(s.first_freq(), 45.0);
        assert_eq!(s.last_freq(), 870.0);
        assert_eq!(s.time_bounds(), (0.0, 900.0));
        assert_eq!(s.meta()["station"].as_str(), Some("SAMPLE"));
        assert_eq!(s.ut_start_sec(), Some(43200.0));
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let a: Spectrum<f64> = synthetic_spectrum(&small()).unwrap();
        let b: Spectrum<f64> = synthetic_spectrum(&small()).unwrap();
        assert!(a.same_samples(&b));

        let c: Spectrum<f64> = synthetic_spectrum(&SyntheticSpectrum {
            seed: 7,
            ..small()
        })
        .unwrap();
        assert!(!a.same_samples(&c));
    }

    #[test]
    fn test_values_clipped_to_byte_range() {
        let s: Spectrum<f64> = synthetic_spectrum(&small()).unwrap();
        assert!(s.data().iter().all(|&v| (0.0..=255.0).contains(&v)));
    }

    #[test]
    fn test_burst_raises_intensity_at_center() {
        let config = small();
        let with: Spectrum<f64> = synthetic_spectrum(&config).unwrap();
        let without: Spectrum<f64> = synthetic_spectrum(&config.clone().without_burst()).unwrap();

        // top channel peaks at the center sample, same noise realisation
        let top = with.n_freqs() - 1;
        let center = with.n_times() / 2;
        let diff = with.data()[[top, center]] - without.data()[[top, center]];
        assert!((diff - BURST_AMPLITUDE).abs() < 1e-9);

        let mean_with = with.crop_time(40.0, 60.0).unwrap().data().mean().unwrap();
        let mean_without = without.crop_time(40.0, 60.0).unwrap().data().mean().unwrap();
        assert!(mean_with > mean_without);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        for config in [
            SyntheticSpectrum {
                n_freq: 0,
                ..small()
            },
            SyntheticSpectrum {
                freq_end: 45.0,
                ..small()
            },
            SyntheticSpectrum {
                duration_s: f64::NAN,
                ..small()
            },
        ] {
            assert!(matches!(
                synthetic_spectrum::<f32>(&config),
                Err(SpectrumError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_noise_centred_on_background() {
        let s: Spectrum<f64> = synthetic_spectrum(&small().without_burst()).unwrap();
        let rows = s.data().mean_axis(ndarray::Axis(1)).unwrap();
        let background = linspace(BACKGROUND_LOW, BACKGROUND_HIGH, s.n_freqs());
        for (mean, bg) in rows.iter().zip(background.iter()) {
            // 400 samples at sigma 5 put the row mean well within 1.5 of its centre
            assert!((mean - (NOISE_MEAN + bg)).abs() < 1.5, "row mean {mean}");
        }
        let spread = s.data().std(0.0);
        assert!(spread > 0.5 * NOISE_STD && spread < 2.0 * NOISE_STD);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            small().file_name("20240101", "121500", "02"),
            "SAMPLE_20240101_121500_02.fit.gz"
        );
    }
}
