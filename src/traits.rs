//! Core traits for spectrum sample types.

use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Numeric type of the intensities stored in a [`Spectrum`](crate::Spectrum).
///
/// Implemented for `f32` and `f64`. Spectra with different sample types cannot be mixed in one
/// combine call; the compiler rejects it rather than converting silently.
pub trait SpectrumSample:
    Float + FromPrimitive + Debug + Display + Default + Send + Sync + 'static
{
    /// Short name used in summaries and provenance records.
    const DTYPE: &'static str;
}

impl SpectrumSample for f32 {
    const DTYPE: &'static str = "f32";
}

impl SpectrumSample for f64 {
    const DTYPE: &'static str = "f64";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dtype_of<T: SpectrumSample>() -> &'static str {
        T::DTYPE
    }

    #[test]
    fn test_dtype_names() {
        assert_eq!(dtype_of::<f32>(), "f32");
        assert_eq!(dtype_of::<f64>(), "f64");
    }
}
