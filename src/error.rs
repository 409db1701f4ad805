//! Error types and result utilities for spectrum operations.

use thiserror::Error;

/// Convenience type alias for results that may contain a [`SpectrumError`].
pub type SpectrumResult<T> = Result<T, SpectrumError>;

/// Which axis of a dynamic spectrum an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Frequency axis (rows of the data grid).
    Frequency,
    /// Time axis (columns of the data grid).
    Time,
}

impl std::fmt::Display for AxisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisKind::Frequency => write!(f, "frequency"),
            AxisKind::Time => write!(f, "time"),
        }
    }
}

/// Error types that can occur while building, cropping or combining spectra.
#[derive(Error, Debug)]
pub enum SpectrumError {
    /// The data grid and its axes disagree, or an axis is not strictly monotonic.
    ///
    /// Raised at construction and after every derived copy; never auto-corrected.
    #[error("Data shape error: {0}")]
    Shape(String),

    /// A crop range is inverted, not finite, or misses the axis entirely.
    #[error("Range error on {axis} axis [{min}, {max}]: {reason}")]
    Range {
        /// Axis being cropped.
        axis: AxisKind,
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
        /// What went wrong.
        reason: String,
    },

    /// A positional window lies outside the axis, or selects nothing.
    #[error("Index error on {axis} axis: window {start}..{stop} (step {step}) is invalid for length {len}")]
    Index {
        /// Axis being sliced.
        axis: AxisKind,
        /// Window start (inclusive).
        start: usize,
        /// Window stop (exclusive).
        stop: usize,
        /// Window step.
        step: usize,
        /// Axis length.
        len: usize,
    },

    /// Spectra could not be combined.
    #[error("Combine error: {0}")]
    Combine(#[from] CombineError),

    /// Error that occurs when invalid parameters are provided to an operation.
    #[error("Invalid parameter error: {0}")]
    InvalidParameter(String),

    /// A filename does not follow the `STATION_YYYYMMDD_HHMMSS_FOCUS` convention.
    #[error("Invalid filename '{name}': {reason}")]
    InvalidFilename {
        /// Base name that failed to parse.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// A single item of a batch failed.
    #[error("Error processing item {index}: {source}")]
    Item {
        /// Index of the failing item in the batch.
        index: usize,
        /// The underlying error.
        source: Box<SpectrumError>,
    },

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Listing or downloading from the remote archive failed.
    #[cfg(feature = "download")]
    #[error("Download error: {0}")]
    Download(String),
}

impl SpectrumError {
    /// Create a shape error.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    /// Create a range error.
    pub fn range(axis: AxisKind, min: f64, max: f64, reason: impl Into<String>) -> Self {
        Self::Range {
            axis,
            min,
            max,
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Wrap an error as the failure of batch item `index`.
    pub fn item(index: usize, source: SpectrumError) -> Self {
        Self::Item {
            index,
            source: Box::new(source),
        }
    }
}

/// Reasons a set of spectra cannot be merged into one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombineError {
    /// Nothing to combine.
    #[error("cannot combine an empty list of spectra")]
    Empty,

    /// Two inputs fail the compatibility check. Indices refer to the caller's list.
    #[error("spectra {first} and {second} are incompatible: {reason}")]
    Incompatible {
        /// Index of the first spectrum of the offending pair.
        first: usize,
        /// Index of the second spectrum of the offending pair.
        second: usize,
        /// Why the pair cannot be combined.
        reason: String,
    },

    /// Consecutive inputs leave an unrecorded interval on the time axis.
    #[error(
        "gap of {gap_seconds:.3} s between spectrum {before} and spectrum {after} exceeds tolerance {tolerance}"
    )]
    Gap {
        /// Index of the spectrum before the gap.
        before: usize,
        /// Index of the spectrum after the gap.
        after: usize,
        /// Size of the gap in seconds.
        gap_seconds: f64,
        /// Tolerance the gap was checked against.
        tolerance: f64,
    },
}
