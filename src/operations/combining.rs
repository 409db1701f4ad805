//! Frequency and time combination of spectra.
//!
//! Both combiners gate on the compatibility checks, order their inputs along the merge axis and
//! concatenate the grids. Where neighbouring inputs overlap within the tolerance the input that
//! comes first in merge order keeps its samples and the later duplicates are dropped; overlapping
//! samples are never summed or averaged, since they come from distinct receivers or recordings.

use ndarray::{Array1, Array2, ArrayView2, Axis, concatenate};
use tracing::debug;

use super::compatibility::{
    check_frequency_compatibility, check_time_compatibility, shared_orientation, time_order,
};
use super::traits::SpectrumCombining;
use crate::meta::{Meta, MetaValue, TransformRecord, with_history};
use crate::{AxisOrientation, Spectrum, SpectrumError, SpectrumResult, SpectrumSample};

/// Key of the per-source metadata in a combined spectrum.
///
/// The value is a [`MetaValue::List`] with one [`MetaValue::Map`] per input, in merge order. Each
/// map is a copy of that input's metadata plus `input_index` (its position in the slice passed to
/// the combiner) and `source` (its path, or [`MetaValue::Null`]).
pub const SOURCES_KEY: &str = "sources";
/// Key of the combine record in a combined spectrum.
pub const COMBINE_KEY: &str = "combine";

/// Whether `value` lies strictly beyond `last` along `orientation`, by more than `tol`.
#[inline]
fn beyond(orientation: AxisOrientation, last: f64, value: f64, tol: f64) -> bool {
    match orientation {
        AxisOrientation::Ascending => value > last + tol,
        AxisOrientation::Descending => value < last - tol,
    }
}

/// Metadata of a combined spectrum.
///
/// Starts from the primary input's metadata (first in merge order), lists every input's metadata
/// under [`SOURCES_KEY`] in merge order, and adds a [`COMBINE_KEY`] record.
fn combined_meta<T: SpectrumSample>(
    spectra: &[Spectrum<T>],
    order: &[usize],
    method: &str,
    tol: f64,
) -> Meta {
    let sources: Vec<MetaValue> = order
        .iter()
        .map(|&idx| {
            let s = &spectra[idx];
            let mut entry = s.meta().clone();
            entry.insert("input_index".to_string(), MetaValue::from(idx));
            entry.insert(
                "source".to_string(),
                MetaValue::from(s.source().map(|p| p.display().to_string())),
            );
            MetaValue::Map(entry)
        })
        .collect();

    let record = TransformRecord::new(method)
        .param("count", spectra.len())
        .param("tolerance", tol);

    let mut meta = spectra[order[0]].meta().clone();
    meta.insert(SOURCES_KEY.to_string(), MetaValue::List(sources));
    meta.insert(COMBINE_KEY.to_string(), MetaValue::Map(record.clone().into_meta()));
    with_history(&meta, record)
}

fn concat<T: SpectrumSample>(axis: Axis, parts: &[Array2<T>]) -> SpectrumResult<Array2<T>> {
    let views: Vec<ArrayView2<'_, T>> = parts.iter().map(Array2::view).collect();
    concatenate(axis, &views)
        .map_err(|e| SpectrumError::shape(format!("concatenation failed: {e}")))
}

/// Stacks spectra sharing a time axis into one spanning the union of their bands.
///
/// Inputs are ordered by first frequency along the shared orientation. A boundary channel that
/// two neighbours share within `tol` is taken from the earlier one. The time axis is the first
/// ordered input's, unchanged. A single input is returned as is.
///
/// # Errors
/// Whatever [`check_frequency_compatibility`] reports:
/// - [`SpectrumError::Combine`] for empty or incompatible inputs.
/// - [`SpectrumError::InvalidParameter`] if `tol` is negative or not finite.
pub fn combine_frequency<T: SpectrumSample>(
    spectra: &[Spectrum<T>],
    tol: f64,
) -> SpectrumResult<Spectrum<T>> {
    check_frequency_compatibility(spectra, tol)?;
    if let [single] = spectra {
        return Ok(single.clone());
    }

    let orientation = shared_orientation(spectra);
    let mut order: Vec<usize> = (0..spectra.len()).collect();
    order.sort_by(|&a, &b| {
        let (fa, fb) = (spectra[a].first_freq(), spectra[b].first_freq());
        match orientation {
            AxisOrientation::Ascending => fa.total_cmp(&fb),
            AxisOrientation::Descending => fb.total_cmp(&fa),
        }
    });
    debug!(?order, %orientation, "combine_frequency order");

    let mut blocks = Vec::with_capacity(order.len());
    let mut freqs: Vec<f64> = Vec::new();
    let mut dropped = 0usize;
    for &idx in &order {
        let s = &spectra[idx];
        let keep: Vec<usize> = s
            .freqs()
            .iter()
            .enumerate()
            .filter(|&(_, &f)| freqs.last().is_none_or(|&last| beyond(orientation, last, f, tol)))
            .map(|(row, _)| row)
            .collect();
        dropped += s.n_freqs() - keep.len();
        freqs.extend(keep.iter().map(|&row| s.freqs()[row]));
        blocks.push(s.data().select(Axis(0), &keep));
    }
    if dropped > 0 {
        debug!(dropped, "combine_frequency dropped shared boundary channels");
    }

    let data = concat(Axis(0), &blocks)?;
    let time = spectra[order[0]].time().to_owned();
    let meta = combined_meta(spectra, &order, "combine_frequency", tol);
    Ok(Spectrum::new(data, Array1::from(freqs), time)?.with_meta(meta))
}

/// Joins spectra sharing a frequency axis into one spanning the union of their time spans.
///
/// Inputs are ordered by first time sample. Samples of a later input that do not lie beyond the
/// already merged time axis by more than `tol` are dropped (first writer wins), so the result has
/// no duplicate timestamps. Gaps are never filled. The frequency axis is the first ordered input's,
/// unchanged. A single input is returned as is.
///
/// # Errors
/// Whatever [`check_time_compatibility`] reports:
/// - [`SpectrumError::Combine`] for empty or incompatible inputs, including
///   [`CombineError::Gap`] for unrecorded intervals.
/// - [`SpectrumError::InvalidParameter`] if `tol` is negative or not finite.
///
/// [`CombineError::Gap`]: crate::CombineError::Gap
pub fn combine_time<T: SpectrumSample>(
    spectra: &[Spectrum<T>],
    tol: f64,
) -> SpectrumResult<Spectrum<T>> {
    check_time_compatibility(spectra, tol)?;
    if let [single] = spectra {
        return Ok(single.clone());
    }

    let order = time_order(spectra);
    debug!(?order, "combine_time order");

    let mut blocks = Vec::with_capacity(order.len());
    let mut time: Vec<f64> = Vec::new();
    let mut dropped = 0usize;
    for &idx in &order {
        let s = &spectra[idx];
        let keep: Vec<usize> = s
            .time()
            .iter()
            .enumerate()
            .filter(|&(_, &t)| time.last().is_none_or(|&last| t > last + tol))
            .map(|(col, _)| col)
            .collect();
        dropped += s.n_times() - keep.len();
        time.extend(keep.iter().map(|&col| s.time()[col]));
        blocks.push(s.data().select(Axis(1), &keep));
    }
    if dropped > 0 {
        debug!(dropped, "combine_time dropped overlapping samples");
    }

    let data = concat(Axis(1), &blocks)?;
    let freqs = spectra[order[0]].freqs().to_owned();
    let meta = combined_meta(spectra, &order, "combine_time", tol);
    Ok(Spectrum::new(data, freqs, Array1::from(time))?.with_meta(meta))
}

impl<T: SpectrumSample> SpectrumCombining<T> for Spectrum<T> {
    fn combine_frequency(spectra: &[Self], tol: f64) -> SpectrumResult<Spectrum<T>> {
        combine_frequency(spectra, tol)
    }

    fn combine_time(spectra: &[Self], tol: f64) -> SpectrumResult<Spectrum<T>> {
        combine_time(spectra, tol)
    }
}
