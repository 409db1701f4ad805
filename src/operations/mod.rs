//! Spectrum operations: cropping, compatibility checks, combination and noise reduction.
//!
//! ## Module Organization
//!
//! - [`traits`] - Trait definitions
//! - [`cropping`] - Value and index based crops
//! - [`compatibility`] - Predicates gating the combiners
//! - [`combining`] - Frequency and time combination
//! - [`processing`] - Noise reduction
//! - [`types`] - Supporting types
//!
//! The algebra is closed: every operation returns a [`Spectrum`](crate::Spectrum) that can be fed
//! back into any other.
//!
//! ```rust
//! use callisto_spectra::operations::*;
//! use callisto_spectra::Spectrum;
//! use ndarray::{Array1, Array2};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let time = Array1::linspace(0.0, 9.0, 10);
//! let low = Spectrum::new(Array2::<f64>::zeros((3, 10)), Array1::from(vec![45.0, 70.0, 100.0]), time.clone())?;
//! let high = Spectrum::new(Array2::<f64>::ones((3, 10)), Array1::from(vec![100.0, 150.0, 200.0]), time)?;
//!
//! assert!(can_combine_frequency(&[low.clone(), high.clone()], 1e-3));
//! let merged = Spectrum::combine_frequency(&[high, low], 1e-3)?;
//! assert_eq!(merged.n_freqs(), 5);
//!
//! let band = merged.crop_frequency(60.0, 160.0)?;
//! assert_eq!(band.freqs().to_vec(), vec![70.0, 100.0, 150.0]);
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod types;

pub mod combining;
pub mod compatibility;
pub mod cropping;
pub mod processing;

pub use traits::{SpectrumCombining, SpectrumCropping, SpectrumProcessing};

pub use types::{DEFAULT_TOLERANCE, IndexSlice, NoiseReduction, ValueRange};

pub use combining::{combine_frequency, combine_time};
pub use compatibility::{
    can_combine_frequency, can_combine_time, check_frequency_compatibility,
    check_time_compatibility,
};
pub use cropping::{crop, crop_frequency, crop_time, slice_by_index};
pub use processing::noise_reduce_mean_clip;
