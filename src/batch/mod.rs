//! Applying spectrum operations to many spectra at once.
//!
//! Any transform that maps one spectrum to another can be run over a batch through
//! [`BatchOperation`]; [`ParallelProcessor`] spreads the items over a rayon pool and reports the
//! first failure with its position in the input.

pub mod operations;
pub mod parallel;
pub mod traits;

pub use operations::{BatchCrop, BatchNoiseReduce};
pub use parallel::ParallelProcessor;
pub use traits::BatchOperation;
