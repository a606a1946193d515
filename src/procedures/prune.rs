//! Removal of redundant threshold literals from a decoded assignment.
//!
//! Within a [LowerBound](crate::structures::feature::GroupKind::LowerBound)
//! group the columns are nested `<=` thresholds in increasing order, so any
//! two asserted in the same clause are redundant: the one with the higher
//! threshold decides, and the others are dropped by negating their slots.
//! Symmetrically for [UpperBound](crate::structures::feature::GroupKind::UpperBound)
//! groups of `>` thresholds, where the lowest threshold decides.
//! Binary and categorical groups are already mutually exclusive by
//! construction and are left untouched.
//!
//! The rewrite is pure post-processing of the assignment --- no solver call
//! --- and idempotent: once no group holds more than one asserted literal per
//! clause, a second pass changes nothing.

use crate::{
    builder::VariableLayout,
    misc::log::targets::{self},
    structures::{
        feature::{FeatureSchema, GroupKind},
        literal::SignedLiteral,
    },
};

/// Negate the redundant threshold literals of each clause, in place.
pub fn prune(assignment: &mut [SignedLiteral], layout: &VariableLayout, schema: &FeatureSchema) {
    debug_assert_eq!(assignment.len(), layout.feature_slots());

    for clause in 0..layout.clause_count() {
        for group in schema.groups() {
            let keep_last = match group.kind {
                GroupKind::LowerBound => true,
                GroupKind::UpperBound => false,
                GroupKind::Binary | GroupKind::Categorical => continue,
            };

            let asserted: Vec<usize> = group
                .columns
                .iter()
                .map(|&column| clause * layout.feature_count() + column)
                .filter(|&slot| assignment[slot].polarity())
                .collect();

            if asserted.len() < 2 {
                continue;
            }

            let kept = match keep_last {
                true => asserted[asserted.len() - 1],
                false => asserted[0],
            };

            for &slot in &asserted {
                if slot != kept {
                    assignment[slot] = assignment[slot].negate();
                }
            }

            log::trace!(target: targets::PRUNE,
                "clause {clause}: kept slot {kept} of {asserted:?}");
        }
    }
}
