/*!
Construction of the weighted CNF problem for one sample block.

The encoding casts "find a `k`-clause rule which balances sparsity against
misclassification" as partial weighted MaxSAT:

- Each feature slot `(clause, feature)` is a variable; a true slot puts that
  feature's literal into that clause of the rule.
- Each sample has a noise variable; a true noise variable excuses the sample
  from classification at the cost of [data_fidelity](crate::config::Config::data_fidelity).
- Hard clauses tie the two together per sample, with Tseitin auxiliaries for
  the samples a rule must reject.

The soft clauses are where incrementality lives.
On the first batch every feature slot carries a unit soft clause against
inclusion, favouring sparse rules.
On later batches the previous batch's assignment is re-asserted slot by slot
instead, so the solver pays to *change* the rule rather than to *have* one,
and structure carries over unless the current batch's evidence overrides it.
In the test phase the carried assignment hardens into constraints: the rule is
frozen, and only the noise variables are left to optimize, measuring residual
error.

A rule of the DNF family is learnt by encoding against flipped labels; the
[fit procedure](crate::procedures::fit) flips before calling into the builder,
and rendering swaps operators afterwards.
*/

mod layout;
pub use layout::VariableLayout;

use crate::{
    misc::log::targets::{self},
    model::ModelState,
    structures::{
        formula::{ClauseWeight, WcnfFormula},
        literal::SignedLiteral,
        matrix::FeatureMatrix,
    },
    types::err::{self},
};

/// Whether an encoding trains the rule or scores it frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Rule search: the carried assignment, if any, is soft bias.
    Train,

    /// Scoring: the carried assignment is hard, only noise is optimized.
    Test,
}

/// Builds weighted CNF problems for sample blocks, under fixed weights.
#[derive(Clone, Copy, Debug)]
pub struct EncodingBuilder {
    clause_count: usize,
    data_fidelity: ClauseWeight,
    feature_weight: ClauseWeight,
}

impl EncodingBuilder {
    /// A builder for rules of `clause_count` clauses under the given weights.
    pub fn new(
        clause_count: usize,
        data_fidelity: ClauseWeight,
        feature_weight: ClauseWeight,
    ) -> Self {
        EncodingBuilder {
            clause_count,
            data_fidelity,
            feature_weight,
        }
    }

    /// Encode the given sample block against the carried assignment.
    ///
    /// `rows` indexes the matrix and `labels` runs parallel to `rows`, already
    /// flipped if a DNF rule is being learnt.
    /// The carry must be empty or hold one literal per feature slot.
    pub fn encode(
        &self,
        matrix: &FeatureMatrix,
        rows: &[usize],
        labels: &[bool],
        carry: &ModelState,
        phase: Phase,
    ) -> Result<WcnfFormula, err::EncodingError> {
        if matrix.width() == 0 {
            return Err(err::EncodingError::EmptyFeatureBlock);
        }
        if rows.is_empty() {
            return Err(err::EncodingError::EmptySampleBlock);
        }
        if rows.len() != labels.len() {
            return Err(err::EncodingError::LengthMismatch {
                samples: rows.len(),
                labels: labels.len(),
            });
        }
        debug_assert!(
            carry.is_empty() || carry.literals().len() == self.clause_count * matrix.width()
        );

        let layout = VariableLayout::new(self.clause_count, matrix.width(), rows.len());
        let rejected = labels.iter().filter(|&&label| !label).count();
        let variable_count =
            layout.feature_slots() + layout.sample_count() + self.clause_count * rejected;

        let top_weight = self.top_weight(&layout);
        let mut formula = WcnfFormula::new(variable_count, top_weight);

        self.soft_clauses(&mut formula, &layout, carry, phase);
        self.hard_clauses(&mut formula, &layout, matrix, rows, labels);

        log::debug!(target: targets::ENCODING,
            "{} variables, {} clauses, top weight {} ({} samples, {} rejected)",
            variable_count, formula.clause_count(), top_weight, rows.len(), rejected);

        Ok(formula)
    }

    /// The top weight: strictly above the summed weight of every soft clause,
    /// so no combination of soft violations outweighs a hard clause.
    ///
    /// A non-empty carry holds exactly one literal per feature slot, each
    /// re-asserted at the feature weight, so the value is
    /// `data_fidelity·n + 1 + feature_weight·slots` in every phase.
    fn top_weight(&self, layout: &VariableLayout) -> ClauseWeight {
        self.data_fidelity * layout.sample_count() as ClauseWeight
            + 1
            + self.feature_weight * layout.feature_slots() as ClauseWeight
    }

    /// The soft clauses of the problem, and the hard carry in the test phase.
    fn soft_clauses(
        &self,
        formula: &mut WcnfFormula,
        layout: &VariableLayout,
        carry: &ModelState,
        phase: Phase,
    ) {
        match phase {
            Phase::Test => {
                for slot in 1..=layout.feature_slots() {
                    formula.add_soft(
                        self.feature_weight,
                        vec![SignedLiteral::negative(slot as u32)],
                    );
                }
                for position in 0..layout.sample_count() {
                    formula.add_soft(
                        self.data_fidelity,
                        vec![SignedLiteral::negative(layout.noise_variable(position))],
                    );
                }
                // The frozen rule: the carried assignment is not open to revision.
                for literal in carry.literals() {
                    formula.add_hard(vec![*literal]);
                }
            }

            Phase::Train => {
                for literal in carry.literals() {
                    formula.add_soft(self.feature_weight, vec![*literal]);
                }
                for position in 0..layout.sample_count() {
                    formula.add_soft(
                        self.data_fidelity,
                        vec![SignedLiteral::negative(layout.noise_variable(position))],
                    );
                }
                // The first batch: no structure to carry, bias against every slot.
                if carry.is_empty() {
                    for slot in 1..=layout.feature_slots() {
                        formula.add_soft(
                            self.feature_weight,
                            vec![SignedLiteral::negative(slot as u32)],
                        );
                    }
                }
            }
        }
    }

    /// The hard clauses tying each sample's classification to the feature
    /// slots of every clause level.
    fn hard_clauses(
        &self,
        formula: &mut WcnfFormula,
        layout: &VariableLayout,
        matrix: &FeatureMatrix,
        rows: &[usize],
        labels: &[bool],
    ) {
        let mut aux_cursor = layout.aux_base();

        for (position, &row) in rows.iter().enumerate() {
            let noise = layout.noise_variable(position);

            if labels[position] {
                // Accepted sample: each clause level must contain one of the
                // sample's active features, or the sample is noise.
                for level in 0..self.clause_count {
                    let mut clause = vec![SignedLiteral::positive(noise)];
                    for column in matrix.active_columns(row) {
                        clause.push(SignedLiteral::positive(
                            layout.feature_variable(level, column),
                        ));
                    }
                    formula.add_hard(clause);
                }
            } else {
                // Rejected sample: some clause level must miss every active
                // feature, witnessed by that level's auxiliary, or the sample
                // is noise.
                let mut witness = vec![SignedLiteral::positive(noise)];
                for level in 0..self.clause_count {
                    witness.push(SignedLiteral::positive(aux_cursor + level as u32));
                }
                formula.add_hard(witness);

                for level in 0..self.clause_count {
                    let aux = aux_cursor + level as u32;
                    for column in matrix.active_columns(row) {
                        formula.add_hard(vec![
                            SignedLiteral::negative(aux),
                            SignedLiteral::negative(layout.feature_variable(level, column)),
                        ]);
                    }
                }
                aux_cursor += self.clause_count as u32;
            }
        }
    }
}
