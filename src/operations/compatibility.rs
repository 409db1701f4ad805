//! Compatibility checks gating the combiners.
//!
//! The `check_*` functions report the first offending pair (indices into the caller's list);
//! the `can_combine_*` predicates wrap them and never fail. Axis values are compared with an
//! absolute tolerance because independently recorded clocks and channel tables carry jitter.

use ndarray::ArrayView1;

use crate::{
    AxisOrientation, CombineError, Spectrum, SpectrumError, SpectrumResult, SpectrumSample,
};

pub(crate) fn validate_tolerance(tol: f64) -> SpectrumResult<()> {
    if !tol.is_finite() || tol < 0.0 {
        return Err(SpectrumError::invalid_parameter(format!(
            "tolerance must be finite and non-negative, got {tol}"
        )));
    }
    Ok(())
}

/// Elementwise comparison of two axes within `tol`; describes the first mismatch.
pub(crate) fn axes_match(
    a: ArrayView1<'_, f64>,
    b: ArrayView1<'_, f64>,
    tol: f64,
) -> Result<(), String> {
    if a.len() != b.len() {
        return Err(format!("lengths differ ({} vs {})", a.len(), b.len()));
    }
    match a
        .iter()
        .zip(b.iter())
        .enumerate()
        .find(|(_, (x, y))| (*x - *y).abs() > tol)
    {
        Some((i, (x, y))) => Err(format!("values differ at index {i} ({x} vs {y})")),
        None => Ok(()),
    }
}

/// Mean sample interval of a time axis, `None` for a single sample.
pub(crate) fn nominal_step(time: ArrayView1<'_, f64>) -> Option<f64> {
    let n = time.len();
    if n < 2 {
        return None;
    }
    Some((time[n - 1] - time[0]) / (n - 1) as f64)
}

/// Shared frequency orientation of a compatible set: that of any multi-channel input.
pub(crate) fn shared_orientation<T: SpectrumSample>(spectra: &[Spectrum<T>]) -> AxisOrientation {
    spectra
        .iter()
        .find(|s| s.n_freqs() > 1)
        .map_or(AxisOrientation::Ascending, Spectrum::freq_orientation)
}

/// Input indices ordered by first time sample, ties kept in caller order.
pub(crate) fn time_order<T: SpectrumSample>(spectra: &[Spectrum<T>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..spectra.len()).collect();
    order.sort_by(|&a, &b| spectra[a].first_time().total_cmp(&spectra[b].first_time()));
    order
}

/// Walks the inputs in time order and reports the first interval not covered by any of them.
///
/// Coverage of a spectrum extends one nominal sample step past its last sample, so back-to-back
/// recordings (`0..=9` then `10..=19` at 1 s) are contiguous.
fn find_time_gap<T: SpectrumSample>(spectra: &[Spectrum<T>], tol: f64) -> Option<CombineError> {
    let order = time_order(spectra);
    let (&head, rest) = order.split_first()?;

    let mut covered_end = spectra[head].last_time();
    let mut step = nominal_step(spectra[head].time());
    let mut owner = head;

    for &idx in rest {
        let s = &spectra[idx];
        let expected_next = covered_end + step.or_else(|| nominal_step(s.time())).unwrap_or(0.0);
        let gap = s.first_time() - expected_next;
        if gap > tol {
            return Some(CombineError::Gap {
                before: owner,
                after: idx,
                gap_seconds: gap,
                tolerance: tol,
            });
        }
        if s.last_time() > covered_end {
            covered_end = s.last_time();
            step = nominal_step(s.time()).or(step);
            owner = idx;
        }
    }
    None
}

/// Checks that `spectra` can be stacked along the frequency axis.
///
/// Every pair must share the time axis within `tol`, have the same frequency orientation, and
/// occupy disjoint bands; bands may touch or overlap by at most `tol` (a shared boundary channel).
/// A single-channel spectrum has no orientation of its own and fits either direction.
///
/// # Errors
/// [`CombineError::Empty`] for an empty list, [`CombineError::Incompatible`] naming the first
/// failing pair, or [`SpectrumError::InvalidParameter`] for a negative or non-finite `tol`.
pub fn check_frequency_compatibility<T: SpectrumSample>(
    spectra: &[Spectrum<T>],
    tol: f64,
) -> SpectrumResult<()> {
    validate_tolerance(tol)?;
    if spectra.is_empty() {
        return Err(CombineError::Empty.into());
    }

    for (i, a) in spectra.iter().enumerate() {
        for (j, b) in spectra.iter().enumerate().skip(i + 1) {
            let incompatible = |reason: String| -> SpectrumError {
                CombineError::Incompatible {
                    first: i,
                    second: j,
                    reason,
                }
                .into()
            };

            if a.n_freqs() > 1 && b.n_freqs() > 1 && a.freq_orientation() != b.freq_orientation()
            {
                return Err(incompatible(format!(
                    "frequency orientations differ ({} vs {})",
                    a.freq_orientation(),
                    b.freq_orientation()
                )));
            }
            axes_match(a.time(), b.time(), tol)
                .map_err(|detail| incompatible(format!("time axes differ: {detail}")))?;

            let (a_lo, a_hi) = a.freq_bounds();
            let (b_lo, b_hi) = b.freq_bounds();
            let disjoint = a_hi <= b_lo + tol || b_hi <= a_lo + tol;
            if !disjoint {
                return Err(incompatible(format!(
                    "frequency bands overlap: [{a_lo}, {a_hi}] and [{b_lo}, {b_hi}] MHz"
                )));
            }
        }
    }
    Ok(())
}

/// Checks that `spectra` can be joined along the time axis.
///
/// Every pair must share the frequency axis within `tol`, and the time spans, taken in start
/// order, must be contiguous or overlapping with no gap larger than `tol`.
///
/// # Errors
/// [`CombineError::Empty`], [`CombineError::Incompatible`] naming the first failing pair,
/// [`CombineError::Gap`] for the first uncovered interval, or
/// [`SpectrumError::InvalidParameter`] for a negative or non-finite `tol`.
pub fn check_time_compatibility<T: SpectrumSample>(
    spectra: &[Spectrum<T>],
    tol: f64,
) -> SpectrumResult<()> {
    validate_tolerance(tol)?;
    if spectra.is_empty() {
        return Err(CombineError::Empty.into());
    }

    for (i, a) in spectra.iter().enumerate() {
        for (j, b) in spectra.iter().enumerate().skip(i + 1) {
            axes_match(a.freqs(), b.freqs(), tol).map_err(|detail| {
                SpectrumError::from(CombineError::Incompatible {
                    first: i,
                    second: j,
                    reason: format!("frequency axes differ: {detail}"),
                })
            })?;
        }
    }

    match find_time_gap(spectra, tol) {
        Some(gap) => Err(gap.into()),
        None => Ok(()),
    }
}

/// Whether [`combine_frequency`](super::combine_frequency) would accept `spectra`.
///
/// Returns `false` (never fails) for empty or mismatched inputs and for an invalid tolerance.
pub fn can_combine_frequency<T: SpectrumSample>(spectra: &[Spectrum<T>], tol: f64) -> bool {
    check_frequency_compatibility(spectra, tol).is_ok()
}

/// Whether [`combine_time`](super::combine_time) would accept `spectra`.
///
/// Returns `false` (never fails) for empty or mismatched inputs, gaps, and an invalid tolerance.
pub fn can_combine_time<T: SpectrumSample>(spectra: &[Spectrum<T>], tol: f64) -> bool {
    check_time_compatibility(spectra, tol).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn spectrum(freqs: Vec<f64>, time: Array1<f64>) -> Spectrum<f32> {
        let data = Array2::<f32>::zeros((freqs.len(), time.len()));
        Spectrum::new(data, Array1::from(freqs), time).unwrap()
    }

    fn seconds(start: f64, n: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|i| start + i as f64))
    }

    #[test]
    fn test_disjoint_bands_are_compatible() {
        let a = spectrum(vec![45.0, 70.0, 100.0], seconds(0.0, 10));
        let b = spectrum(vec![100.0, 150.0, 200.0], seconds(0.0, 10));
        assert!(can_combine_frequency(&[a.clone(), b.clone()], 0.01));
        assert!(can_combine_frequency(&[b, a], 0.01));
    }

    #[test]
    fn test_time_length_mismatch_blocks_frequency_combine() {
        let a = spectrum(vec![45.0, 70.0], seconds(0.0, 100));
        let b = spectrum(vec![100.0, 150.0], seconds(0.0, 101));
        assert!(!can_combine_frequency(&[a.clone(), b.clone()], 0.01));
        let err = check_frequency_compatibility(&[a, b], 0.01).unwrap_err();
        assert!(err.to_string().contains("lengths differ (100 vs 101)"), "{err}");
    }

    #[test]
    fn test_time_jitter_within_tolerance() {
        let a = spectrum(vec![45.0], seconds(0.0, 5));
        let b = spectrum(vec![90.0], seconds(0.0, 5).mapv(|t| t + 0.001));
        assert!(can_combine_frequency(&[a.clone(), b.clone()], 0.01));
        assert!(!can_combine_frequency(&[a, b], 0.0001));
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let a = spectrum(vec![45.0, 70.0, 100.0], seconds(0.0, 4));
        let b = spectrum(vec![90.0, 150.0], seconds(0.0, 4));
        assert!(!can_combine_frequency(&[a, b], 0.01));
    }

    #[test]
    fn test_interleaved_band_rejected() {
        let a = spectrum(vec![10.0, 30.0], seconds(0.0, 4));
        let b = spectrum(vec![20.0], seconds(0.0, 4));
        assert!(!can_combine_frequency(&[a, b], 0.01));
    }

    #[test]
    fn test_mixed_orientation_rejected() {
        let a = spectrum(vec![100.0, 45.0], seconds(0.0, 4));
        let b = spectrum(vec![150.0, 200.0], seconds(0.0, 4));
        let err = check_frequency_compatibility(&[a, b], 0.01).unwrap_err();
        assert!(err.to_string().contains("orientations differ"));
    }

    #[test]
    fn test_single_channel_fits_descending_set() {
        let a = spectrum(vec![100.0, 45.0], seconds(0.0, 4));
        let b = spectrum(vec![200.0], seconds(0.0, 4));
        assert!(can_combine_frequency(&[a.clone(), b.clone()], 0.01));
        assert_eq!(shared_orientation(&[b, a]), AxisOrientation::Descending);
    }

    #[test]
    fn test_first_offending_pair_is_named() {
        let a = spectrum(vec![10.0], seconds(0.0, 4));
        let b = spectrum(vec![20.0], seconds(0.0, 4));
        let c = spectrum(vec![30.0], seconds(0.0, 5));
        match check_frequency_compatibility(&[a, b, c], 0.01) {
            Err(SpectrumError::Combine(CombineError::Incompatible { first, second, .. })) => {
                assert_eq!((first, second), (0, 2));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_time_contiguous_and_overlapping() {
        let freqs = vec![45.0, 50.0, 55.0];
        let a = spectrum(freqs.clone(), seconds(0.0, 10));
        let b = spectrum(freqs.clone(), seconds(10.0, 10));
        let c = spectrum(freqs, seconds(8.0, 12));
        assert!(can_combine_time(&[a.clone(), b], 0.01));
        assert!(can_combine_time(&[c, a], 0.01));
    }

    #[test]
    fn test_time_gap_reported() {
        let freqs = vec![45.0, 50.0, 55.0];
        let a = spectrum(freqs.clone(), seconds(0.0, 10));
        let b = spectrum(freqs, seconds(15.0, 5));
        assert!(!can_combine_time(&[a.clone(), b.clone()], 0.01));
        match check_time_compatibility(&[b, a], 0.01) {
            Err(SpectrumError::Combine(CombineError::Gap {
                before,
                after,
                gap_seconds,
                ..
            })) => {
                assert_eq!((before, after), (1, 0));
                assert!((gap_seconds - 5.0).abs() < 1e-9);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_time_combine_needs_same_channels() {
        let a = spectrum(vec![45.0, 50.0], seconds(0.0, 10));
        let b = spectrum(vec![45.0, 51.0], seconds(10.0, 10));
        assert!(!can_combine_time(&[a, b], 0.01));
    }

    #[test]
    fn test_degenerate_inputs() {
        let a = spectrum(vec![45.0], seconds(0.0, 3));
        assert!(can_combine_frequency(&[a.clone()], 0.01));
        assert!(can_combine_time(&[a.clone()], 0.01));
        assert!(!can_combine_frequency::<f32>(&[], 0.01));
        assert!(!can_combine_time::<f32>(&[], 0.01));
        assert!(!can_combine_time(&[a], f64::NAN));
    }
}
