/*!
Configuration of a learner.

All configuration for a learner is fixed when the learner is built and holds
for the whole of a fit --- in particular the clause count, as the carried
assignment of one batch must line up with the encoding of the next.

The defaults favour interpretability on modest tabular data: a single-clause
CNF rule, a misclassification weight an order of magnitude above the sparsity
weight, and an automatic batch count targeting about thirty-two samples per
batch.
*/

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::structures::formula::ClauseWeight;

/// How many mini-batches a fit partitions the training data into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchCount {
    /// The largest power of two with about thirty-two samples per batch,
    /// floored at one.
    Auto,

    /// A fixed count, required to be a power of two.
    Fixed(usize),
}

/// The connective family of the learnt rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    /// A conjunction of disjunctive clauses.
    Cnf,

    /// A disjunction of conjunctive clauses, learnt by solving the CNF
    /// encoding against flipped labels.
    Dnf,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cnf => write!(f, "CNF"),
            Self::Dnf => write!(f, "DNF"),
        }
    }
}

/// The family of the external solver binary, fixing its command line.
///
/// Solver binaries differ in how a CPU-time limit is passed, so the family is
/// named explicitly rather than guessed from the binary's name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverKind {
    /// The open-wbo family, which accepts `-cpu-lim=<seconds>`.
    OpenWbo,

    /// The MaxHS family, which accepts the same CPU-limit flag.
    MaxHs,

    /// Any other WCNF solver, invoked with the problem file alone.
    Generic,
}

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// The mini-batch count used by a fit.
    pub batches: BatchCount,

    /// The clause count of the learnt rule.
    pub clauses: usize,

    /// The soft weight on each noise variable --- the cost of one
    /// misclassified sample.
    pub data_fidelity: ClauseWeight,

    /// The soft weight on each feature slot --- the cost of keeping a literal
    /// in the rule.
    pub feature_weight: ClauseWeight,

    /// The connective family of the rule.
    pub rule: RuleKind,

    /// The external solver binary, as a bare name resolved on the path or as
    /// a path to the executable.
    pub solver: PathBuf,

    /// The family of the solver binary.
    pub solver_kind: SolverKind,

    /// The scratch directory for transient problem files.
    pub work_dir: PathBuf,

    /// The total solve-time budget in seconds, divided evenly across batches
    /// and floored at one second per batch.
    pub time_out: u64,

    /// A seed for the partitioner's randomness; fresh entropy when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            batches: BatchCount::Auto,
            clauses: 1,
            data_fidelity: 10,
            feature_weight: 1,
            rule: RuleKind::Cnf,
            solver: PathBuf::from("open-wbo"),
            solver_kind: SolverKind::OpenWbo,
            work_dir: PathBuf::from("."),
            time_out: 1024,
            seed: None,
        }
    }
}
