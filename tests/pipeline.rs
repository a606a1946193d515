use std::{cell::Cell, rc::Rc, time::Duration};

use rulesat::{
    builder::VariableLayout,
    config::{BatchCount, Config, RuleKind},
    context::{GenericLearner, LearnerState},
    procedures::decode::decode,
    solvers::{MaxSatSolver, SolverOutput},
    structures::{
        feature::{FeatureGroup, FeatureLabel, FeatureSchema, GroupKind, Operator},
        formula::WcnfFormula,
        matrix::FeatureMatrix,
    },
    types::err::{ConfigError, DecodeError, ErrorKind, SolverError},
};

/// A solver returning a fixed solution line, counting its invocations.
struct StubSolver {
    line: String,
    calls: Rc<Cell<usize>>,
}

impl StubSolver {
    fn new(line: &str) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            StubSolver {
                line: line.to_string(),
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl MaxSatSolver for StubSolver {
    fn solve(
        &self,
        _problem: &WcnfFormula,
        _budget: Duration,
    ) -> Result<SolverOutput, SolverError> {
        self.calls.set(self.calls.get() + 1);
        Ok(SolverOutput::from_text(self.line.clone()))
    }
}

/// One two-valued feature: column 0 asserts it, column 1 denies it.
fn binary_schema() -> FeatureSchema {
    FeatureSchema::new(
        vec![FeatureGroup { kind: GroupKind::Binary, columns: vec![0, 1] }],
        vec![
            FeatureLabel { name: "sunny".to_string(), operator: Operator::Is, value: None },
            FeatureLabel { name: "sunny".to_string(), operator: Operator::IsNot, value: None },
        ],
    )
    .unwrap()
}

/// Eight samples over the binary schema, positives exactly the sunny ones.
fn eight_samples() -> (FeatureMatrix, Vec<bool>) {
    let matrix = FeatureMatrix::from_rows(vec![
        vec![true, false],
        vec![true, false],
        vec![true, false],
        vec![true, false],
        vec![false, true],
        vec![false, true],
        vec![false, true],
        vec![false, true],
    ])
    .unwrap();
    let labels = vec![true, true, true, true, false, false, false, false];
    (matrix, labels)
}

fn config_one_batch() -> Config {
    Config {
        batches: BatchCount::Fixed(1),
        seed: Some(0),
        ..Config::default()
    }
}

/// A single clause over two features against eight samples, four rejected:
/// slots 1..=2, noise 3..=10, auxiliaries 11..=14, no sample noisy.
const CLEAN_SOLUTION: &str = "v 1 -2 -3 -4 -5 -6 -7 -8 -9 -10 -11 -12 -13 -14";

mod fitting {
    use super::*;

    #[test]
    fn a_fixed_solution_becomes_a_rule() {
        let (matrix, labels) = eight_samples();
        let (solver, calls) = StubSolver::new(CLEAN_SOLUTION);
        let mut learner =
            GenericLearner::with_solver(config_one_batch(), binary_schema(), solver).unwrap();

        let report = learner.fit(&matrix, &labels).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(report.batches, 1);
        assert_eq!(report.rule_literal_count, 1);
        assert_eq!(report.final_batch_errors, 0);

        assert_eq!(learner.state(), LearnerState::Trained);
        assert_eq!(learner.selected_columns(), vec![vec![0]]);
        assert_eq!(learner.rule().unwrap().to_string(), "( sunny is )");
    }

    #[test]
    fn a_solver_without_a_solution_line_aborts_the_batch() {
        let (matrix, labels) = eight_samples();
        let (solver, _) = StubSolver::new("c all quiet\no 42\ns UNKNOWN");
        let mut learner =
            GenericLearner::with_solver(config_one_batch(), binary_schema(), solver).unwrap();

        let outcome = learner.fit(&matrix, &labels);

        match outcome.unwrap_err() {
            ErrorKind::Batch { index, source } => {
                assert_eq!(index, 0);
                assert_eq!(*source, ErrorKind::Solver(SolverError::NoSolutionLine));
            }
            other => panic!("unexpected error {other:?}"),
        }

        // The failed call left the model exactly as it was.
        assert!(learner.model().is_empty());
        assert_eq!(learner.state(), LearnerState::Empty);
    }

    #[test]
    fn a_bad_batch_count_is_rejected_before_any_encoding() {
        let (matrix, labels) = eight_samples();
        let (solver, calls) = StubSolver::new(CLEAN_SOLUTION);
        let config = Config {
            batches: BatchCount::Fixed(3),
            ..Config::default()
        };
        let mut learner =
            GenericLearner::with_solver(config, binary_schema(), solver).unwrap();

        let outcome = learner.fit(&matrix, &labels);

        assert_eq!(
            outcome.unwrap_err(),
            ErrorKind::Config(ConfigError::BatchCountNotPowerOfTwo(3))
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn a_zero_clause_rule_is_rejected_at_construction() {
        let (solver, _) = StubSolver::new(CLEAN_SOLUTION);
        let config = Config {
            clauses: 0,
            ..Config::default()
        };

        let outcome = GenericLearner::with_solver(config, binary_schema(), solver);

        assert!(matches!(outcome, Err(ConfigError::ZeroClauseCount)));
    }
}

mod prediction {
    use super::*;

    #[test]
    fn a_trained_model_scores_held_out_data() {
        let (matrix, labels) = eight_samples();
        let (solver, calls) = StubSolver::new(CLEAN_SOLUTION);
        let mut learner =
            GenericLearner::with_solver(config_one_batch(), binary_schema(), solver).unwrap();

        learner.fit(&matrix, &labels).unwrap();
        let predictions = learner.predict(&matrix, &labels).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(predictions, labels);
    }

    #[test]
    fn noisy_samples_flip_their_predicted_label() {
        let (matrix, labels) = eight_samples();
        // Noise variable 3 is sample 0 of the block.
        let noisy = "v 1 -2 3 -4 -5 -6 -7 -8 -9 -10 -11 -12 -13 -14";
        let (solver, _) = StubSolver::new(noisy);
        let mut learner =
            GenericLearner::with_solver(config_one_batch(), binary_schema(), solver).unwrap();

        learner.fit(&matrix, &labels).unwrap();
        let predictions = learner.predict(&matrix, &labels).unwrap();

        assert_eq!(predictions[0], !labels[0]);
        assert_eq!(&predictions[1..], &labels[1..]);
    }

    #[test]
    fn prediction_requires_a_trained_model() {
        let (matrix, labels) = eight_samples();
        let (solver, _) = StubSolver::new(CLEAN_SOLUTION);
        let learner =
            GenericLearner::with_solver(config_one_batch(), binary_schema(), solver).unwrap();

        assert_eq!(
            learner.predict(&matrix, &labels).unwrap_err(),
            ErrorKind::UntrainedModel
        );
    }
}

mod rendering {
    use super::*;

    #[test]
    fn operator_swapping_is_an_involution() {
        let operators = [
            Operator::Is,
            Operator::IsNot,
            Operator::Eq,
            Operator::Neq,
            Operator::Leq,
            Operator::Gt,
        ];
        for operator in operators {
            assert_ne!(operator.swap(), operator);
            assert_eq!(operator.swap().swap(), operator);
        }
    }

    #[test]
    fn dnf_rules_render_with_swapped_operators() {
        let schema = FeatureSchema::new(
            vec![FeatureGroup { kind: GroupKind::LowerBound, columns: vec![0, 1] }],
            vec![
                FeatureLabel {
                    name: "age".to_string(),
                    operator: Operator::Leq,
                    value: Some("30".to_string()),
                },
                FeatureLabel {
                    name: "age".to_string(),
                    operator: Operator::Leq,
                    value: Some("50".to_string()),
                },
            ],
        )
        .unwrap();
        let (matrix, labels) = eight_samples();

        let (solver, _) = StubSolver::new(CLEAN_SOLUTION);
        let config = Config {
            rule: RuleKind::Dnf,
            ..config_one_batch()
        };
        let mut learner = GenericLearner::with_solver(config, schema, solver).unwrap();

        learner.fit(&matrix, &labels).unwrap();

        assert_eq!(learner.rule().unwrap().to_string(), "( age > 30 )");
    }
}

mod decoding {
    use super::*;

    fn layout_1_2_8() -> VariableLayout {
        VariableLayout::new(1, 2, 8)
    }

    #[test]
    fn the_reference_solution_decodes_as_expected() {
        let output = SolverOutput::from_text(CLEAN_SOLUTION.to_string());

        let decoded = decode(&output, &layout_1_2_8()).unwrap();

        assert_eq!(decoded.true_rules(), vec![1]);
        assert_eq!(decoded.error_count(), 0);
        assert_eq!(decoded.zero_one()[..2], [1, 0]);
    }

    #[test]
    fn a_missing_solution_line_is_a_solver_failure() {
        let output = SolverOutput::from_text("s UNSATISFIABLE".to_string());

        assert_eq!(
            decode(&output, &layout_1_2_8()).unwrap_err(),
            ErrorKind::Solver(SolverError::NoSolutionLine)
        );
    }

    #[test]
    fn a_short_solution_line_is_a_decode_failure() {
        let output = SolverOutput::from_text("v 1 -2 -3".to_string());

        assert_eq!(
            decode(&output, &layout_1_2_8()).unwrap_err(),
            ErrorKind::Decode(DecodeError::TokenCount { expected: 10, found: 3 })
        );
    }

    #[test]
    fn an_unreadable_token_is_a_decode_failure() {
        let output = SolverOutput::from_text("v 1 -2 x -4".to_string());

        assert_eq!(
            decode(&output, &layout_1_2_8()).unwrap_err(),
            ErrorKind::Decode(DecodeError::Token("x".to_string()))
        );
    }

    #[test]
    fn tokens_out_of_variable_order_are_a_decode_failure() {
        let output =
            SolverOutput::from_text("v 1 -2 -3 -4 -5 -7 -6 -8 -9 -10".to_string());

        assert_eq!(
            decode(&output, &layout_1_2_8()).unwrap_err(),
            ErrorKind::Decode(DecodeError::VariableOrder { position: 5 })
        );
    }
}
