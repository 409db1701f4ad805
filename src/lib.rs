// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![deny(missing_docs)] // Documentation is a must for release

//! # CallistoSpectra
//!
//! Typed dynamic spectra from e-CALLISTO solar radio spectrometers: a frequency × time intensity
//! grid with its axes and metadata, and the structural operations used to prepare such data for
//! analysis.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! callisto_spectra = "0.1.0"
//! ```
//!
//! Optional functionality is behind features:
//!
//! - `serialization`: serde support for metadata and option types
//! - `parallel-processing`: rayon-backed batch transforms
//! - `random-generation`: synthetic spectra with drifting bursts
//! - `download`: listing and fetching files from the e-CALLISTO archive
//! - `full`: everything above
//!
//! ## Quick Start
//!
//! ```rust
//! use callisto_spectra::{Spectrum, SpectrumCropping, SpectrumProcessing, NoiseReduction};
//! use ndarray::{Array1, Array2};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = Array2::from_shape_fn((4, 6), |(f, t)| (f * 10 + t) as f32);
//! let freqs = Array1::from(vec![400.0, 300.0, 200.0, 100.0]);
//! let time = Array1::from(vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.25]);
//! let spectrum = Spectrum::new(data, freqs, time)?;
//!
//! let band = spectrum.crop_frequency(150.0, 350.0)?;
//! assert_eq!(band.freqs().to_vec(), vec![300.0, 200.0]);
//!
//! let cleaned = band.noise_reduce_mean_clip(NoiseReduction::default().without_scale())?;
//! assert_eq!(cleaned.shape(), (2, 6));
//! # Ok(())
//! # }
//! ```
//!
//! ## Combining
//!
//! Spectra recorded by different sub-bands of one station share a time axis and are stacked along
//! frequency with [`combine_frequency`]; consecutive files from one sub-band share a frequency axis
//! and are joined along time with [`combine_time`]. Both check compatibility first and report the
//! offending pair through [`CombineError`].
//!
//! ## Logging
//!
//! Operations emit `tracing` events at `debug` and `trace` level. No subscriber is installed by the
//! library.

mod error;
pub mod io;
pub mod meta;
pub mod operations;
mod repr;
/// Sample type bound for spectrum intensities.
pub mod traits;

#[cfg(feature = "parallel-processing")]
pub mod batch;
#[cfg(feature = "download")]
pub mod download;
#[cfg(feature = "random-generation")]
pub mod generation;

pub use crate::error::{AxisKind, CombineError, SpectrumError, SpectrumResult};
pub use crate::meta::{Meta, MetaValue, TransformRecord};
pub use crate::operations::{
    DEFAULT_TOLERANCE, IndexSlice, NoiseReduction, SpectrumCombining, SpectrumCropping,
    SpectrumProcessing, ValueRange, can_combine_frequency, can_combine_time,
    check_frequency_compatibility, check_time_compatibility, combine_frequency, combine_time,
    crop, crop_frequency, crop_time, noise_reduce_mean_clip, slice_by_index,
};
pub use crate::repr::{AxisOrientation, Spectrum};
pub use crate::traits::SpectrumSample;

/// Array of supported sample data types as string identifiers
pub const SUPPORTED_DTYPES: [&str; 2] = ["f32", "f64"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_dtypes_match_impls() {
        assert!(SUPPORTED_DTYPES.contains(&<f32 as SpectrumSample>::DTYPE));
        assert!(SUPPORTED_DTYPES.contains(&<f64 as SpectrumSample>::DTYPE));
    }
}
