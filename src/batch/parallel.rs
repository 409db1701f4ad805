//! Parallel processing utilities for batch operations.
//!
//! Items are independent, so each one is transformed on the rayon pool and the results are
//! collected back in input order.

use rayon::prelude::*;
use tracing::debug;

use super::{BatchCrop, BatchNoiseReduce, BatchOperation};
use crate::operations::{NoiseReduction, ValueRange};
use crate::{Spectrum, SpectrumError, SpectrumResult, SpectrumSample};

/// Parallel batch processor for applying operations to many spectra concurrently.
pub struct ParallelProcessor;

impl ParallelProcessor {
    /// Process spectra in parallel using the provided operation.
    ///
    /// Output order matches input order.
    ///
    /// # Errors
    /// [`SpectrumError::Item`] wrapping the failure of the lowest-indexed failing item.
    pub fn process_parallel<T, Op>(
        items: &[Spectrum<T>],
        operation: &Op,
    ) -> SpectrumResult<Vec<Spectrum<T>>>
    where
        T: SpectrumSample,
        Op: BatchOperation<T> + ?Sized,
    {
        debug!(
            operation = operation.description(),
            items = items.len(),
            "running batch in parallel"
        );
        // Collect per-item results first so the reported failure does not depend on scheduling.
        let results: Vec<SpectrumResult<Spectrum<T>>> = items
            .par_iter()
            .map(|item| operation.apply_to_item(item))
            .collect();

        results
            .into_iter()
            .enumerate()
            .map(|(index, result)| result.map_err(|e| SpectrumError::item(index, e)))
            .collect()
    }

    /// Process items in parallel chunks of `chunk_size`, bounding how many results are in
    /// flight at once.
    ///
    /// # Errors
    /// [`SpectrumError::InvalidParameter`] for a zero chunk size, otherwise as
    /// [`process_parallel`](Self::process_parallel).
    pub fn process_chunked<T, Op>(
        items: &[Spectrum<T>],
        operation: &Op,
        chunk_size: usize,
    ) -> SpectrumResult<Vec<Spectrum<T>>>
    where
        T: SpectrumSample,
        Op: BatchOperation<T> + ?Sized,
    {
        if chunk_size == 0 {
            return Err(SpectrumError::invalid_parameter(
                "chunk size must be greater than zero",
            ));
        }

        let mut results = Vec::with_capacity(items.len());
        for (chunk_index, chunk) in items.chunks(chunk_size).enumerate() {
            let offset = chunk_index * chunk_size;
            let processed = Self::process_parallel(chunk, operation).map_err(|e| match e {
                SpectrumError::Item { index, source } => SpectrumError::Item {
                    index: index + offset,
                    source,
                },
                other => other,
            })?;
            results.extend(processed);
        }
        Ok(results)
    }

    /// Process items on a dedicated pool with `thread_count` threads (`None` for rayon's default).
    ///
    /// # Errors
    /// [`SpectrumError::InvalidParameter`] if the pool cannot be built, otherwise as
    /// [`process_parallel`](Self::process_parallel).
    pub fn process_with_threads<T, Op>(
        items: &[Spectrum<T>],
        operation: &Op,
        thread_count: Option<usize>,
    ) -> SpectrumResult<Vec<Spectrum<T>>>
    where
        T: SpectrumSample,
        Op: BatchOperation<T> + ?Sized,
    {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = thread_count {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build().map_err(|e| {
            SpectrumError::invalid_parameter(format!("thread pool creation failed: {e}"))
        })?;

        pool.install(|| Self::process_parallel(items, operation))
    }

    /// Crop every spectrum to the same windows.
    ///
    /// # Errors
    /// [`SpectrumError::Item`] for the first spectrum the windows do not fit.
    pub fn crop_all<T: SpectrumSample>(
        spectra: &[Spectrum<T>],
        freq_range: Option<ValueRange>,
        time_range: Option<ValueRange>,
    ) -> SpectrumResult<Vec<Spectrum<T>>> {
        Self::process_parallel(spectra, &BatchCrop::new(freq_range, time_range))
    }

    /// Noise-reduce every spectrum with the same parameters.
    ///
    /// # Errors
    /// [`SpectrumError::Item`] wrapping the first failure; invalid parameters fail on item 0.
    pub fn noise_reduce_all<T: SpectrumSample>(
        spectra: &[Spectrum<T>],
        params: NoiseReduction,
    ) -> SpectrumResult<Vec<Spectrum<T>>> {
        Self::process_parallel(spectra, &BatchNoiseReduce::new(params))
    }
}
