//! Class-balanced partitioning of the training samples into mini-batches.
//!
//! Samples are first grouped by label.
//! Each class is then recursively bisected --- a random 50/50 split at each of
//! `log2(batch_count)` levels, building a full binary split tree --- and batch
//! *i* is the concatenation of leaf *i* across the classes.
//! Every batch thereby receives an (approximately) stratified sample of every
//! class, independent of class imbalance: per-class proportions deviate from
//! the global ones by at most the rounding of one bisection, and the batches
//! together hold every sample exactly once.
//!
//! Bisection defines the procedure only for power-of-two batch counts; any
//! other request is a configuration error, raised before anything is encoded.

use rand::{seq::SliceRandom, Rng};

use crate::{
    config::BatchCount,
    misc::log::targets::{self},
    types::err::{self},
};

/// The samples each batch should (approximately) receive under the automatic
/// batch count.
const AUTO_BATCH_TARGET: usize = 32;

/// The concrete batch count for a request over the given sample count.
///
/// A fixed request must be a power of two.
/// An automatic request resolves to the largest power of two not exceeding
/// `samples / 32`, floored at one batch.
pub fn resolve_batch_count(
    request: BatchCount,
    samples: usize,
) -> Result<usize, err::ConfigError> {
    match request {
        BatchCount::Auto => {
            let target = samples / AUTO_BATCH_TARGET;
            match target {
                0 => Ok(1),
                _ => Ok(1 << target.ilog2()),
            }
        }

        BatchCount::Fixed(0) => Err(err::ConfigError::ZeroBatchCount),

        BatchCount::Fixed(count) => match count.is_power_of_two() {
            true => Ok(count),
            false => Err(err::ConfigError::BatchCountNotPowerOfTwo(count)),
        },
    }
}

/// Partition sample indices into `batch_count` class-balanced batches.
///
/// `batch_count` must be a power of two, as produced by
/// [resolve_batch_count].
pub fn partition(
    labels: &[bool],
    batch_count: usize,
    rng: &mut impl Rng,
) -> Vec<Vec<usize>> {
    debug_assert!(batch_count.is_power_of_two());
    let level = batch_count.trailing_zeros();

    let mut batches = vec![Vec::new(); batch_count];

    for class in [false, true] {
        let members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter_map(|(index, &label)| (label == class).then_some(index))
            .collect();

        let mut leaves = vec![members];
        for _ in 0..level {
            leaves = leaves
                .into_iter()
                .flat_map(|leaf| bisect(leaf, rng))
                .collect();
        }

        for (batch, leaf) in batches.iter_mut().zip(leaves) {
            batch.extend(leaf);
        }
    }

    log::debug!(target: targets::PARTITION,
        "{} samples over {} batches: {:?}",
        labels.len(), batch_count,
        batches.iter().map(Vec::len).collect::<Vec<_>>());

    batches
}

/// A random 50/50 split, the larger half second when the count is odd.
fn bisect(mut leaf: Vec<usize>, rng: &mut impl Rng) -> [Vec<usize>; 2] {
    leaf.shuffle(rng);
    let second = leaf.split_off(leaf.len() / 2);
    [leaf, second]
}
