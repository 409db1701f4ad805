//! Core dynamic spectrum representation.
//!
//! A [`Spectrum`] pairs a 2-D intensity grid of shape `(F, T)` with its frequency axis (MHz, one
//! value per row), its time axis (seconds, one value per column), an optional provenance path and
//! open [`Meta`]data.
//!
//! # Invariants
//!
//! Checked on every construction and on every derived copy:
//!
//! - `data.shape() == (freqs.len(), time.len())`, both axes non-empty
//! - `freqs` strictly monotonic (ascending or descending), finite
//! - `time` strictly ascending, finite
//!
//! A violation is a [`SpectrumError::Shape`]; values are never coerced. A `Spectrum` has no
//! mutating methods: cropping, combining and noise reduction all allocate a new value.
//!
//! ```rust
//! use callisto_spectra::{AxisOrientation, Spectrum};
//! use ndarray::array;
//!
//! let spectrum = Spectrum::new(
//!     array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]],
//!     array![200.0, 100.0],
//!     array![0.0, 0.25, 0.5],
//! )
//! .unwrap();
//!
//! assert_eq!(spectrum.shape(), (2, 3));
//! assert_eq!(spectrum.freq_orientation(), AxisOrientation::Descending);
//! assert_eq!(spectrum.freq_bounds(), (100.0, 200.0));
//! ```

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::meta::{Meta, MetaValue};
use crate::{AxisKind, SpectrumError, SpectrumResult, SpectrumSample};

/// Direction in which an axis' values progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisOrientation {
    /// Values strictly increase with index.
    Ascending,
    /// Values strictly decrease with index.
    Descending,
}

impl AxisOrientation {
    /// Whether `a` comes strictly before `b` along this orientation.
    #[inline]
    pub fn precedes(self, a: f64, b: f64) -> bool {
        match self {
            AxisOrientation::Ascending => a < b,
            AxisOrientation::Descending => a > b,
        }
    }
}

impl Display for AxisOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisOrientation::Ascending => write!(f, "ascending"),
            AxisOrientation::Descending => write!(f, "descending"),
        }
    }
}

/// Checks that an axis is non-empty, finite and strictly monotonic, returning its orientation.
///
/// Single-sample axes are reported as ascending.
pub(crate) fn validate_axis(
    values: ArrayView1<'_, f64>,
    kind: AxisKind,
) -> SpectrumResult<AxisOrientation> {
    if values.is_empty() {
        return Err(SpectrumError::shape(format!("{kind} axis is empty")));
    }
    if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SpectrumError::shape(format!(
            "{kind} axis value at index {i} is not finite: {v}"
        )));
    }
    if values.len() == 1 {
        return Ok(AxisOrientation::Ascending);
    }

    let orientation = if values[1] > values[0] {
        AxisOrientation::Ascending
    } else if values[1] < values[0] {
        AxisOrientation::Descending
    } else {
        return Err(SpectrumError::shape(format!(
            "{kind} axis has duplicate value {} at indices 0 and 1",
            values[0]
        )));
    };

    for i in 1..values.len() {
        let (prev, next) = (values[i - 1], values[i]);
        if !orientation.precedes(prev, next) {
            return Err(SpectrumError::shape(format!(
                "{kind} axis is not strictly {orientation}: {prev} at index {} followed by {next} at index {i}",
                i - 1
            )));
        }
    }
    Ok(orientation)
}

/// One dynamic spectrum: intensities indexed by frequency channel (rows) and time sample (columns).
#[derive(Debug, Clone)]
pub struct Spectrum<T: SpectrumSample> {
    data: Array2<T>,
    freqs: Array1<f64>,
    time: Array1<f64>,
    freq_orientation: AxisOrientation,
    source: Option<PathBuf>,
    meta: Meta,
}

impl<T: SpectrumSample> Spectrum<T> {
    /// Creates a spectrum after checking all invariants.
    ///
    /// # Errors
    /// [`SpectrumError::Shape`] if the grid does not match the axes, an axis is empty or contains
    /// non-finite values, `freqs` is not strictly monotonic, or `time` is not strictly ascending.
    pub fn new(data: Array2<T>, freqs: Array1<f64>, time: Array1<f64>) -> SpectrumResult<Self> {
        let freq_orientation = validate_axis(freqs.view(), AxisKind::Frequency)?;
        if validate_axis(time.view(), AxisKind::Time)? == AxisOrientation::Descending {
            return Err(SpectrumError::shape(
                "time axis must be strictly ascending, found descending values",
            ));
        }
        if data.dim() != (freqs.len(), time.len()) {
            return Err(SpectrumError::shape(format!(
                "data shape {:?} does not match (len(freqs), len(time)) = ({}, {})",
                data.dim(),
                freqs.len(),
                time.len()
            )));
        }
        Ok(Self {
            data,
            freqs,
            time,
            freq_orientation,
            source: None,
            meta: Meta::new(),
        })
    }

    /// Sets the provenance path (e.g. the file the spectrum was read from).
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Replaces the metadata.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Builds a new spectrum from replacement buffers, keeping this spectrum's source.
    ///
    /// The replacement goes through the same validation as [`Spectrum::new`].
    pub(crate) fn derive(
        &self,
        data: Array2<T>,
        freqs: Array1<f64>,
        time: Array1<f64>,
        meta: Meta,
    ) -> SpectrumResult<Self> {
        let mut out = Self::new(data, freqs, time)?.with_meta(meta);
        out.source = self.source.clone();
        Ok(out)
    }

    /// Intensity grid, shape `(n_freqs, n_times)`.
    pub fn data(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Frequency axis in MHz.
    pub fn freqs(&self) -> ArrayView1<'_, f64> {
        self.freqs.view()
    }

    /// Time axis in seconds relative to the observation epoch.
    pub fn time(&self) -> ArrayView1<'_, f64> {
        self.time.view()
    }

    /// Provenance path, if any. Informational only.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Metadata.
    pub const fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Number of frequency channels.
    pub fn n_freqs(&self) -> usize {
        self.freqs.len()
    }

    /// Number of time samples.
    pub fn n_times(&self) -> usize {
        self.time.len()
    }

    /// `(n_freqs, n_times)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Orientation of the frequency axis.
    pub const fn freq_orientation(&self) -> AxisOrientation {
        self.freq_orientation
    }

    /// First frequency value (highest for descending axes).
    pub fn first_freq(&self) -> f64 {
        self.freqs[0]
    }

    /// Last frequency value.
    pub fn last_freq(&self) -> f64 {
        self.freqs[self.freqs.len() - 1]
    }

    /// First time value.
    pub fn first_time(&self) -> f64 {
        self.time[0]
    }

    /// Last time value.
    pub fn last_time(&self) -> f64 {
        self.time[self.time.len() - 1]
    }

    /// `(min, max)` of the frequency axis regardless of orientation.
    pub fn freq_bounds(&self) -> (f64, f64) {
        let (a, b) = (self.first_freq(), self.last_freq());
        (a.min(b), a.max(b))
    }

    /// `(first, last)` of the time axis.
    pub fn time_bounds(&self) -> (f64, f64) {
        (self.first_time(), self.last_time())
    }

    /// Image extent `[t_first, t_last, f_last, f_first]` for renderers drawing row 0 at the top.
    pub fn extent(&self) -> [f64; 4] {
        [
            self.first_time(),
            self.last_time(),
            self.last_freq(),
            self.first_freq(),
        ]
    }

    /// Observation start in seconds since 00:00 UT, when the reader recorded it.
    pub fn ut_start_sec(&self) -> Option<f64> {
        self.meta.get("ut_start_sec").and_then(MetaValue::as_f64)
    }

    /// Whether both spectra hold exactly the same grid and axes. Source and metadata are ignored.
    pub fn same_samples(&self, other: &Self) -> bool {
        self.freqs == other.freqs && self.time == other.time && self.data == other.data
    }

    /// Consumes the spectrum, returning `(data, freqs, time, meta)`.
    pub fn into_parts(self) -> (Array2<T>, Array1<f64>, Array1<f64>, Meta) {
        (self.data, self.freqs, self.time, self.meta)
    }
}

/// Equality over samples, axes and metadata; the source path never takes part in comparisons.
impl<T: SpectrumSample> PartialEq for Spectrum<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_samples(other) && self.meta == other.meta
    }
}

impl<T: SpectrumSample> Display for Spectrum<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (f_lo, f_hi) = self.freq_bounds();
        let (t0, t1) = self.time_bounds();
        write!(
            f,
            "Spectrum<{}>: {} ch × {} samples, {:.3}–{:.3} MHz ({}), {:.3}–{:.3} s",
            T::DTYPE,
            self.n_freqs(),
            self.n_times(),
            f_lo,
            f_hi,
            self.freq_orientation,
            t0,
            t1
        )?;
        if f.alternate() {
            if let Some(source) = &self.source {
                write!(f, "\n  source: {}", source.display())?;
            }
            for (key, value) in &self.meta {
                write!(f, "\n  {key}: {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn test_new_accepts_descending_freqs() {
        let s = Spectrum::new(
            Array2::<f64>::zeros((3, 2)),
            array![300.0, 200.0, 100.0],
            array![0.0, 1.0],
        )
        .unwrap();
        assert_eq!(s.freq_orientation(), AxisOrientation::Descending);
        assert_eq!(s.extent(), [0.0, 1.0, 100.0, 300.0]);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let err = Spectrum::new(
            Array2::<f32>::zeros((2, 3)),
            array![1.0, 2.0, 3.0],
            array![0.0, 1.0],
        )
        .unwrap_err();
        assert!(matches!(err, SpectrumError::Shape(_)));
    }

    #[test]
    fn test_non_monotonic_freqs_rejected() {
        let err = Spectrum::new(
            Array2::<f64>::zeros((3, 1)),
            array![1.0, 3.0, 2.0],
            array![0.0],
        )
        .unwrap_err();
        assert!(err.to_string().contains("index 2"), "{err}");
    }

    #[test]
    fn test_duplicate_and_nan_rejected() {
        assert!(
            Spectrum::new(Array2::<f64>::zeros((2, 1)), array![5.0, 5.0], array![0.0]).is_err()
        );
        assert!(
            Spectrum::new(
                Array2::<f64>::zeros((2, 1)),
                array![5.0, f64::NAN],
                array![0.0]
            )
            .is_err()
        );
    }

    #[test]
    fn test_descending_time_rejected() {
        let err = Spectrum::new(
            Array2::<f64>::zeros((1, 2)),
            array![10.0],
            array![1.0, 0.0],
        )
        .unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn test_empty_axis_rejected() {
        let err = Spectrum::new(
            Array2::<f64>::zeros((0, 2)),
            Array1::from_vec(vec![]),
            array![0.0, 1.0],
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_source_ignored_in_equality() {
        let a = Spectrum::new(array![[1.0f64]], array![10.0], array![0.0]).unwrap();
        let b = a.clone().with_source("/tmp/other.fit.gz");
        assert_eq!(a, b);
        assert_eq!(b.source(), Some(Path::new("/tmp/other.fit.gz")));
    }

    #[test]
    fn test_display_summary() {
        let s = Spectrum::new(array![[1.0f32, 2.0]], array![45.0], array![0.0, 0.25])
            .unwrap()
            .with_meta(Meta::from([(
                "station".to_string(),
                MetaValue::from("GLASGOW"),
            )]));
        let compact = format!("{s}");
        assert!(compact.starts_with("Spectrum<f32>: 1 ch × 2 samples"));
        let full = format!("{s:#}");
        assert!(full.contains("station: GLASGOW"));
    }
}
