//! Core trait for batch operations.

use crate::{Spectrum, SpectrumResult, SpectrumSample};

/// A single-spectrum transform that can be applied to every item of a batch.
///
/// Implementations must be independent per item: the processor may call
/// [`apply_to_item`](Self::apply_to_item) from several threads at once.
pub trait BatchOperation<T: SpectrumSample>: Send + Sync {
    /// Apply this operation to one spectrum, producing a new one.
    fn apply_to_item(&self, item: &Spectrum<T>) -> SpectrumResult<Spectrum<T>>;

    /// Short human-readable name used in logs.
    fn description(&self) -> &str;
}
