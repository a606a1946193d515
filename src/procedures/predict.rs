//! Prediction against the frozen model, through the same encoding.
//!
//! Scoring reuses the MaxSAT formulation rather than evaluating the rule
//! directly: the held-out block is encoded in the [test
//! phase](crate::builder::Phase::Test), where the carried assignment hardens
//! into constraints and only the noise variables remain soft.
//! The solver then has nothing to decide but which samples the frozen rule
//! misclassifies, and each prediction is the sample's label flipped by its
//! noise flag.

use crate::{
    builder::{EncodingBuilder, Phase, VariableLayout},
    config::RuleKind,
    context::GenericLearner,
    misc::log::targets::{self},
    procedures::{decode::decode, fit::per_batch_budget},
    solvers::MaxSatSolver,
    structures::matrix::FeatureMatrix,
    types::err::{self},
};

impl<S: MaxSatSolver> GenericLearner<S> {
    /// Predict the labels of the given matrix, scoring against its true labels.
    ///
    /// The model is read, never revised: predictions may be requested any
    /// number of times after a fit.
    pub fn predict(
        &self,
        matrix: &FeatureMatrix,
        labels: &[bool],
    ) -> Result<Vec<bool>, err::ErrorKind> {
        if self.model.is_empty() {
            return Err(err::ErrorKind::UntrainedModel);
        }
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

        let rows: Vec<usize> = (0..labels.len()).collect();
        let flip = self.config.rule == RuleKind::Dnf;
        let block_labels: Vec<bool> = labels.iter().map(|&label| label != flip).collect();

        let builder = EncodingBuilder::new(
            self.config.clauses,
            self.config.data_fidelity,
            self.config.feature_weight,
        );
        let problem = builder.encode(matrix, &rows, &block_labels, &self.model, Phase::Test)?;

        let budget = per_batch_budget(self.config.time_out, self.fitted_batches);
        let output = self.solver.solve(&problem, budget)?;

        let layout = VariableLayout::new(self.config.clauses, matrix.width(), rows.len());
        let decoded = decode(&output, &layout)?;

        log::info!(target: targets::FIT,
            "scored {} samples, {} residual errors", labels.len(), decoded.error_count());

        // A noisy sample is one the frozen rule misclassifies.
        Ok(labels
            .iter()
            .zip(decoded.noise())
            .map(|(&label, &noisy)| label != noisy)
            .collect())
    }
}
