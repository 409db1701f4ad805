//! File layer: CALLISTO naming conventions and the reader contract.
//!
//! Decoding the FITS container is left to an implementation of [`SpectrumReader`]; this module
//! provides the pieces every reader shares. Files are named
//! `STATION_YYYYMMDD_HHMMSS_FOCUS.fit.gz`, and the primary header carries the observation start as
//! `TIME-OBS = 'HH:MM:SS.sss'`.

use std::path::{Path, PathBuf};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::meta::{Meta, MetaValue};
use crate::{Spectrum, SpectrumError, SpectrumResult};

/// Components of a CALLISTO filename.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CallistoFileParts {
    /// Station identifier, e.g. `ALASKA-COHOE`.
    pub station: String,
    /// Observation date as `YYYYMMDD`.
    pub date_yyyymmdd: String,
    /// Observation start as `HHMMSS`.
    pub time_hhmmss: String,
    /// Instrument sub-band (focus code), e.g. `01`.
    pub focus: String,
}

/// Parses `STATION_YYYYMMDD_HHMMSS_FOCUS[.ext…]` from the final path component.
///
/// ```rust
/// use callisto_spectra::io::parse_callisto_filename;
///
/// let parts = parse_callisto_filename("data/ALASKA-COHOE_20240101_123000_01.fit.gz").unwrap();
/// assert_eq!(parts.station, "ALASKA-COHOE");
/// assert_eq!(parts.focus, "01");
/// ```
///
/// # Errors
/// [`SpectrumError::InvalidFilename`] when the name has fewer than four `_`-separated parts.
pub fn parse_callisto_filename(path: impl AsRef<Path>) -> SpectrumResult<CallistoFileParts> {
    let path = path.as_ref();
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SpectrumError::InvalidFilename {
            name: path.display().to_string(),
            reason: "path has no file name".to_string(),
        })?;

    let parts: Vec<&str> = base.split('_').collect();
    if parts.len() < 4 {
        return Err(SpectrumError::InvalidFilename {
            name: base.clone(),
            reason: format!(
                "expected STATION_YYYYMMDD_HHMMSS_FOCUS, found {} part(s)",
                parts.len()
            ),
        });
    }

    let focus = parts[3].split('.').next().unwrap_or_default();
    Ok(CallistoFileParts {
        station: parts[0].to_string(),
        date_yyyymmdd: parts[1].to_string(),
        time_hhmmss: parts[2].to_string(),
        focus: focus.to_string(),
    })
}

/// Seconds since 00:00 for a `TIME-OBS` header value `HH:MM:SS[.fff]`.
///
/// Returns `None` for anything that does not parse; a missing start time is not an error.
pub fn parse_time_obs(value: &str) -> Option<f64> {
    let mut fields = value.trim().trim_matches('\'').trim().split(':');
    let hours: u32 = fields.next()?.trim().parse().ok()?;
    let minutes: u32 = fields.next()?.trim().parse().ok()?;
    let seconds: f64 = fields.next()?.trim().parse().ok()?;
    if fields.next().is_some() || !seconds.is_finite() {
        return None;
    }
    Some(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds)
}

/// Standard metadata for a spectrum read from `path`.
///
/// Always carries `ut_start_sec` (null when unknown); adds `station`, `date`, `time` and `focus`
/// when the filename follows the CALLISTO convention.
pub fn file_meta(path: impl AsRef<Path>, ut_start_sec: Option<f64>) -> Meta {
    let mut meta = Meta::new();
    meta.insert("ut_start_sec".to_string(), MetaValue::from(ut_start_sec));
    if let Ok(parts) = parse_callisto_filename(path) {
        meta.insert("station".to_string(), parts.station.into());
        meta.insert("date".to_string(), parts.date_yyyymmdd.into());
        meta.insert("time".to_string(), parts.time_hhmmss.into());
        meta.insert("focus".to_string(), parts.focus.into());
    }
    meta
}

/// Produces spectra from files on disk.
///
/// Implementations must return spectra satisfying the [`Spectrum`] invariants (which
/// [`Spectrum::new`] enforces) and should attach [`file_meta`] and the source path.
pub trait SpectrumReader {
    /// Reads one file.
    fn read_spectrum(&self, path: &Path) -> SpectrumResult<Spectrum<f64>>;

    /// Reads several files in order, reporting the first failure with its position.
    fn read_many(&self, paths: &[PathBuf]) -> SpectrumResult<Vec<Spectrum<f64>>> {
        paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                self.read_spectrum(p)
                    .map_err(|e| SpectrumError::item(i, e))
            })
            .collect()
    }
}
