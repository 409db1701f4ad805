//! Supporting types for spectrum operations.
//!
//! Configuration structs, index windows and the default combine tolerance used by the
//! operation traits.

use ndarray::Slice;

use crate::{AxisKind, SpectrumError, SpectrumResult};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Absolute tolerance (in axis units) for callers without an instrument-specific value.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// A closed value range `[min, max]` on one axis.
pub type ValueRange = (f64, f64);

/// Positional window `start..stop` with a step, as used by
/// [`SpectrumCropping::slice_by_index`](super::SpectrumCropping::slice_by_index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct IndexSlice {
    /// First index (inclusive).
    pub start: usize,
    /// End index (exclusive).
    pub stop: usize,
    /// Stride between selected indices; must be at least 1.
    pub step: usize,
}

impl IndexSlice {
    /// Contiguous window `start..stop`.
    pub const fn new(start: usize, stop: usize) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    /// Same window with a different step.
    pub const fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Number of indices selected.
    pub const fn len(&self) -> usize {
        if self.stop <= self.start || self.step == 0 {
            0
        } else {
            (self.stop - self.start).div_ceil(self.step)
        }
    }

    /// Whether the window selects nothing.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ndarray slice selecting the window. Call after [`Self::validate`].
    ///
    /// A step wider than the window selects only `start`, so it is capped at the window width
    /// before the signed conversion.
    pub(crate) fn to_slice(self) -> Slice {
        let step = self.step.min(self.stop - self.start);
        Slice::new(self.start as isize, Some(self.stop as isize), step as isize)
    }

    /// Checks the window against an axis of length `len`. Out-of-bounds windows are never clamped.
    pub(crate) fn validate(&self, axis: AxisKind, len: usize) -> SpectrumResult<()> {
        if self.step == 0 || self.start >= self.stop || self.stop > len {
            return Err(SpectrumError::Index {
                axis,
                start: self.start,
                stop: self.stop,
                step: self.step,
                len,
            });
        }
        Ok(())
    }
}

impl From<std::ops::Range<usize>> for IndexSlice {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Parameters of the mean-subtract-and-clip noise reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct NoiseReduction {
    /// Lower clip bound applied after mean subtraction.
    pub clip_low: f64,
    /// Upper clip bound applied after mean subtraction.
    pub clip_high: f64,
    /// Optional factor applied after clipping.
    pub scale: Option<f64>,
}

impl NoiseReduction {
    /// Default scale, converting digitizer units to dB for the CALLISTO receivers
    /// (2500 mV over 255 steps at 25.4 mV/dB).
    pub const DEFAULT_SCALE: f64 = 2500.0 / 255.0 / 25.4;

    /// Same parameters without scaling.
    pub const fn without_scale(mut self) -> Self {
        self.scale = None;
        self
    }

    pub(crate) fn validate(&self) -> SpectrumResult<()> {
        if !self.clip_low.is_finite() || !self.clip_high.is_finite() {
            return Err(SpectrumError::invalid_parameter(format!(
                "clip bounds must be finite, got [{}, {}]",
                self.clip_low, self.clip_high
            )));
        }
        if self.clip_low > self.clip_high {
            return Err(SpectrumError::invalid_parameter(format!(
                "clip_low ({}) must not exceed clip_high ({})",
                self.clip_low, self.clip_high
            )));
        }
        if let Some(scale) = self.scale {
            if !scale.is_finite() {
                return Err(SpectrumError::invalid_parameter(format!(
                    "scale must be finite, got {scale}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for NoiseReduction {
    fn default() -> Self {
        Self {
            clip_low: -5.0,
            clip_high: 20.0,
            scale: Some(Self::DEFAULT_SCALE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_slice_len() {
        assert_eq!(IndexSlice::new(0, 10).len(), 10);
        assert_eq!(IndexSlice::new(0, 10).with_step(3).len(), 4);
        assert!(IndexSlice::new(4, 4).is_empty());
        assert_eq!(IndexSlice::from(2..5), IndexSlice::new(2, 5));
    }

    #[test]
    fn test_index_slice_validation() {
        assert!(IndexSlice::new(0, 5).validate(AxisKind::Time, 5).is_ok());
        assert!(IndexSlice::new(0, 6).validate(AxisKind::Time, 5).is_err());
        assert!(IndexSlice::new(3, 3).validate(AxisKind::Time, 5).is_err());
        assert!(
            IndexSlice::new(0, 5)
                .with_step(0)
                .validate(AxisKind::Frequency, 5)
                .is_err()
        );
    }

    #[test]
    fn test_noise_reduction_validation() {
        assert!(NoiseReduction::default().validate().is_ok());
        let inverted = NoiseReduction {
            clip_low: 2.0,
            clip_high: 1.0,
            scale: None,
        };
        assert!(matches!(
            inverted.validate(),
            Err(SpectrumError::InvalidParameter(_))
        ));
    }
}
