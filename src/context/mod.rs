/*!
The learner --- which owns the configuration, schema, and carried model, and
on which fits and predictions take place.

Strictly, a [GenericLearner] and a [Learner].

The generic learner is generic over the solver, which keeps the solver an
explicit capability: the shipped [Learner] reaches an
[external binary](crate::solvers::ExternalSolver), while tests substitute a
stub returning fixed solution lines.
[from_config](Learner::from_config) is implemented for a learner rather than
a generic learner so that the common case does not require a solver to be
supplied alongside a config.

A learner moves through the states of [LearnerState]: empty, partially
trained while batches remain, and trained once the last batch has been
decoded.
The trained state is terminal and reusable --- any number of predictions may
be made against the frozen model --- while batches can neither be replayed
nor reordered, as each consumes the assignment its predecessor produced.
*/

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::Config,
    model::{ModelState, Rule},
    solvers::{ExternalSolver, MaxSatSolver},
    structures::feature::FeatureSchema,
    types::err::{self},
};

/// The state of a learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LearnerState {
    /// No batch has been solved.
    Empty,

    /// Some, though not all, batches have been solved.
    Partial { complete: usize, total: usize },

    /// Every batch has been solved; the model is frozen.
    Trained,
}

impl std::fmt::Display for LearnerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Partial { complete, total } => write!(f, "Partial ({complete}/{total})"),
            Self::Trained => write!(f, "Trained"),
        }
    }
}

/// A summary of a completed fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitReport {
    /// The batch count the training data was partitioned into.
    pub batches: usize,

    /// The count of literals in the learnt rule, over all clauses.
    pub rule_literal_count: usize,

    /// Misclassified samples in the final batch.
    pub final_batch_errors: usize,

    /// The sample count of the final batch.
    pub final_batch_samples: usize,
}

/// A learner generic over its solver.
pub struct GenericLearner<S: MaxSatSolver> {
    /// The configuration of the learner.
    pub(crate) config: Config,

    /// The schema of the discretized matrix the learner consumes.
    pub(crate) schema: FeatureSchema,

    /// The solver reached for each batch.
    pub(crate) solver: S,

    /// The source of randomness for partitioning.
    pub(crate) rng: StdRng,

    /// The carried assignment; the trained model once every batch is solved.
    pub(crate) model: ModelState,

    /// The state of the learner.
    pub(crate) state: LearnerState,

    /// The batch count of the last completed fit, for the prediction budget.
    pub(crate) fitted_batches: usize,
}

/// The learner of external solver binaries.
pub type Learner = GenericLearner<ExternalSolver>;

impl Learner {
    /// A learner from a configuration and schema, solving with the configured
    /// external binary.
    pub fn from_config(config: Config, schema: FeatureSchema) -> Result<Self, err::ConfigError> {
        let solver = ExternalSolver::new(
            config.solver.clone(),
            config.solver_kind,
            config.work_dir.clone(),
        );
        Self::with_solver(config, schema, solver)
    }
}

impl<S: MaxSatSolver> GenericLearner<S> {
    /// A learner from a configuration, schema, and solver.
    pub fn with_solver(
        config: Config,
        schema: FeatureSchema,
        solver: S,
    ) -> Result<Self, err::ConfigError> {
        if config.clauses == 0 {
            return Err(err::ConfigError::ZeroClauseCount);
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(GenericLearner {
            config,
            schema,
            solver,
            rng,
            model: ModelState::empty(),
            state: LearnerState::Empty,
            fitted_batches: 1,
        })
    }

    /// The configuration of the learner.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The schema of the matrix the learner consumes.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// The state of the learner.
    pub fn state(&self) -> LearnerState {
        self.state
    }

    /// The carried model.
    pub fn model(&self) -> &ModelState {
        &self.model
    }

    /// The solver the learner reaches for each batch.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Per clause, the feature columns selected into the rule.
    pub fn selected_columns(&self) -> Vec<Vec<usize>> {
        self.model.selected_columns()
    }

    /// The learnt rule, rendered against the schema.
    pub fn rule(&self) -> Result<Rule, err::ErrorKind> {
        match self.model.is_empty() {
            true => Err(err::ErrorKind::UntrainedModel),
            false => Ok(self.model.rule(&self.schema, self.config.rule)),
        }
    }
}

impl<S: MaxSatSolver> std::fmt::Display for GenericLearner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "rulesat learner ({})", self.state)?;
        writeln!(f, " - rule: {} of {} clause(s)", self.config.rule, self.config.clauses)?;
        writeln!(f, " - batches: {:?}", self.config.batches)?;
        writeln!(
            f,
            " - weights: data fidelity {}, feature {}",
            self.config.data_fidelity, self.config.feature_weight
        )?;
        write!(f, " - solver: {}", self.config.solver.display())
    }
}
