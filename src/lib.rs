//! A library for learning interpretable CNF/DNF classification rules by incremental mini-batch MaxSAT solving.
//!
//! rulesat casts rule learning as partial weighted MaxSAT: a rule of `k` clauses over discretized Boolean features is encoded, sample by sample, as a weighted CNF problem whose optimum balances rule sparsity against misclassification, and an off-the-shelf weighted MaxSAT solver is reached over the WCNF exchange format to find that optimum.
//! Training scales to large datasets by partitioning the samples into class-balanced mini-batches and carrying each batch's learnt assignment into the next batch's objective, so structure accumulates across batches without any batch seeing the whole dataset.
//!
//! # Orientation
//!
//! The library is designed around the core structure of a [learner](context).
//!
//! Learners are built from a [configuration](config) and a [feature schema](structures::feature) describing the discretized matrix --- discretization itself is a collaborator, not a concern of this library.
//! At a high level, a fit is a strictly sequential loop over the batches, and each batch is a pipeline through a handful of parts:
//!
//! - The [partitioner](procedures::partition) splits the samples so every batch is an approximately stratified sample of every class.
//! - The [builder](builder) emits one transient [weighted formula](structures::formula) per batch, threading the carried assignment through the soft clauses.
//! - A [solver](solvers) --- normally an external binary --- optimizes the formula under a per-batch time budget.
//! - The [decoder](procedures::decode) turns the solution line into a typed assignment, and the [pruner](procedures::prune) drops redundant threshold literals from it.
//! - The surviving assignment becomes the [model](model) carried into the next batch, and, after the last batch, the learnt rule.
//!
//! Useful starting points, then, may be:
//! - The high-level [fit procedure](procedures::fit) to inspect the dynamics of a fit.
//! - The [builder](builder) for the encoding and its incremental soft-clause weighting.
//! - The [structures] to familiarise yourself with the elements of the encoding (literals, groups, formulas, etc.)
//! - The [configuration](config) to see what is adjustable.
//!
//! # Example
//!
//! A single-clause CNF rule over one two-valued feature, with the solver
//! substituted by a stub returning a fixed solution line:
//!
//! ```rust
//! # use rulesat::config::{BatchCount, Config};
//! # use rulesat::context::GenericLearner;
//! # use rulesat::solvers::{MaxSatSolver, SolverOutput};
//! # use rulesat::structures::feature::{FeatureGroup, FeatureLabel, FeatureSchema, GroupKind, Operator};
//! # use rulesat::structures::formula::WcnfFormula;
//! # use rulesat::structures::matrix::FeatureMatrix;
//! # use rulesat::types::err;
//! # use std::time::Duration;
//! struct Fixed(&'static str);
//!
//! impl MaxSatSolver for Fixed {
//!     fn solve(
//!         &self,
//!         _problem: &WcnfFormula,
//!         _budget: Duration,
//!     ) -> Result<SolverOutput, err::SolverError> {
//!         Ok(SolverOutput::from_text(self.0.to_string()))
//!     }
//! }
//!
//! let schema = FeatureSchema::new(
//!     vec![FeatureGroup { kind: GroupKind::Binary, columns: vec![0, 1] }],
//!     vec![
//!         FeatureLabel { name: "sunny".to_string(), operator: Operator::Is, value: None },
//!         FeatureLabel { name: "sunny".to_string(), operator: Operator::IsNot, value: None },
//!     ],
//! )
//! .unwrap();
//!
//! let matrix = FeatureMatrix::from_rows(vec![
//!     vec![true, false],
//!     vec![true, false],
//!     vec![true, false],
//!     vec![true, false],
//!     vec![false, true],
//!     vec![false, true],
//!     vec![false, true],
//!     vec![false, true],
//! ])
//! .unwrap();
//! let labels = vec![true, true, true, true, false, false, false, false];
//!
//! let config = Config {
//!     batches: BatchCount::Fixed(1),
//!     seed: Some(0),
//!     ..Config::default()
//! };
//!
//! // One clause over two features against eight samples: variables 1..=2 are
//! // the feature slots, 3..=10 the noise block, and 11..=14 the auxiliaries
//! // of the four rejected samples.
//! let solution = "v 1 -2 -3 -4 -5 -6 -7 -8 -9 -10 -11 -12 -13 -14";
//!
//! let mut learner = GenericLearner::with_solver(config, schema, Fixed(solution)).unwrap();
//!
//! let report = learner.fit(&matrix, &labels).unwrap();
//! assert_eq!(report.rule_literal_count, 1);
//! assert_eq!(report.final_batch_errors, 0);
//!
//! assert_eq!(learner.selected_columns(), vec![vec![0]]);
//! assert_eq!(learner.rule().unwrap().to_string(), "( sunny is )");
//! ```
//!
//! # Guiding principles
//!
//! ## Delegation
//!
//!   + The hard combinatorics are someone else's: the library's own work is the encoding, the batching, and the decoding, and the solver behind the [solvers] seam is interchangeable.
//!     Anything speaking WCNF and printing a `v` line will do.
//!
//! ## Explicit structure
//!
//!   + Things carried implicitly by position elsewhere are carried by structure here: literals are typed pairs rather than signed strings, column groups are declared [metadata](structures::feature) rather than index arithmetic, and the [variable layout](builder::VariableLayout) is one value shared by the builder and the decoder.
//!
//! ## Honest failure
//!
//!   + A solver which times out or crashes produces a typed [error](types::err) naming the batch, never an empty assignment; a failed batch leaves the carried model exactly as it was.
//!
//! # Logs
//!
//! To help diagnose issues (somewhat) detailed calls to [log!](log) are made, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
//!
//! The targets are listed in [misc::log].
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - Logs related to [the encoding](builder) can be filtered with `RUST_LOG=encoding …` or,
//! - Logs of batch progress without per-batch detail can be found with `RUST_LOG=fit=info …`

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod builder;
pub mod procedures;

pub mod config;
pub mod context;
pub mod structures;
pub mod types;

pub mod model;
pub mod solvers;

pub mod misc;
