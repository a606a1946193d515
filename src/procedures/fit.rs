//! The sequential batch loop of a fit.
//!
//! # Overview
//!
//! A fit partitions the training samples into class-balanced batches and
//! solves them strictly in order, since the encoding of batch *b* consumes the
//! assignment decoded from batch *b-1*:
//!
//! ```none
//!             +-----------+     +-------+     +--------+     +-------+
//!  batch b -->| encode    |---->| solve |---->| decode |---->| prune |
//!             | (carry)   |     +-------+     +--------+     +-------+
//!             +-----------+                        |              |
//!                   ⌃                         no solution         |
//!                   |                         line: abort         ⌄
//!                   +----------- carried assignment --------------+
//! ```
//!
//! The carried assignment is replaced only after a batch decodes and prunes
//! successfully.
//! Any failure --- encoding, solving, decoding --- aborts the fit with an
//! error naming the batch, and the learner keeps the model it held before
//! that batch; there is no automatic retry, as a retry policy (say, a larger
//! time budget) is a caller's decision.
//!
//! The total time budget is divided evenly across the batches, floored at one
//! second per batch, and handed to the solver as its CPU limit.

use std::time::Duration;

use crate::{
    builder::{EncodingBuilder, Phase, VariableLayout},
    config::RuleKind,
    context::{FitReport, GenericLearner, LearnerState},
    misc::log::targets::{self},
    model::ModelState,
    procedures::{
        decode::decode,
        partition::{partition, resolve_batch_count},
        prune::prune,
    },
    solvers::MaxSatSolver,
    structures::matrix::FeatureMatrix,
    types::err::{self},
};

/// The solve budget of one batch: an even share of the total, at least a second.
pub(crate) fn per_batch_budget(time_out: u64, batches: usize) -> Duration {
    Duration::from_secs(time_out.div_ceil(batches.max(1) as u64).max(1))
}

impl<S: MaxSatSolver> GenericLearner<S> {
    /// Fit a rule to the given matrix and labels, batch by batch.
    ///
    /// Refitting starts over from an empty carry; the learner's model is
    /// replaced as batches complete, so a failure leaves it as it was before
    /// the failing batch.
    pub fn fit(
        &mut self,
        matrix: &FeatureMatrix,
        labels: &[bool],
    ) -> Result<FitReport, err::ErrorKind> {
        if matrix.sample_count() != labels.len() {
            return Err(err::EncodingError::LengthMismatch {
                samples: matrix.sample_count(),
                labels: labels.len(),
            }
            .into());
        }
        if matrix.width() != self.schema.feature_count() {
            return Err(err::EncodingError::SchemaWidth {
                matrix: matrix.width(),
                schema: self.schema.feature_count(),
            }
            .into());
        }
        if !self.solver.available() {
            return Err(err::ConfigError::MissingSolver(self.config.solver.clone()).into());
        }

        let batch_count = resolve_batch_count(self.config.batches, labels.len())?;
        let budget = per_batch_budget(self.config.time_out, batch_count);
        let batches = partition(labels, batch_count, &mut self.rng);

        let builder = EncodingBuilder::new(
            self.config.clauses,
            self.config.data_fidelity,
            self.config.feature_weight,
        );

        // The carry is local until a batch commits: a failed batch leaves the
        // learner holding whatever model it held before that batch.
        let mut carry = ModelState::empty();

        let mut final_batch_errors = 0;
        let mut final_batch_samples = 0;

        for (index, rows) in batches.iter().enumerate() {
            log::info!(target: targets::FIT,
                "batch {} of {batch_count}: {} samples", index + 1, rows.len());

            let (model, errors) = self
                .fit_batch(&builder, matrix, labels, rows, &carry, budget)
                .map_err(|e| e.in_batch(index))?;

            log::info!(target: targets::FIT,
                "batch {} complete: {} rule literals, {errors} of {} misclassified",
                index + 1,
                model.selected_columns().iter().map(Vec::len).sum::<usize>(),
                rows.len());

            final_batch_errors = errors;
            final_batch_samples = rows.len();
            carry = model;
            self.model = carry.clone();
            self.state = LearnerState::Partial {
                complete: index + 1,
                total: batch_count,
            };
        }

        self.state = LearnerState::Trained;
        self.fitted_batches = batch_count;

        Ok(FitReport {
            batches: batch_count,
            rule_literal_count: self
                .model
                .literals()
                .iter()
                .filter(|literal| literal.polarity())
                .count(),
            final_batch_errors,
            final_batch_samples,
        })
    }

    /// Encode, solve, decode, and prune one batch against the carried model.
    fn fit_batch(
        &self,
        builder: &EncodingBuilder,
        matrix: &FeatureMatrix,
        labels: &[bool],
        rows: &[usize],
        carry: &ModelState,
        budget: Duration,
    ) -> Result<(ModelState, usize), err::ErrorKind> {
        // DNF rules are learnt by solving the CNF encoding on flipped labels.
        let flip = self.config.rule == RuleKind::Dnf;
        let block_labels: Vec<bool> = rows.iter().map(|&row| labels[row] != flip).collect();

        let problem = builder.encode(matrix, rows, &block_labels, carry, Phase::Train)?;
        let output = self.solver.solve(&problem, budget)?;

        let layout = VariableLayout::new(self.config.clauses, matrix.width(), rows.len());
        let decoded = decode(&output, &layout)?;
        let errors = decoded.error_count();

        let mut assignment = decoded.into_rule_literals();
        prune(&mut assignment, &layout, &self.schema);

        Ok((ModelState::from_assignment(assignment, matrix.width()), errors))
    }
}
