use rulesat::{
    builder::{EncodingBuilder, Phase},
    model::ModelState,
    structures::{formula::WcnfFormula, literal::SignedLiteral, matrix::FeatureMatrix},
    types::err::EncodingError,
};

fn matrix_4x3() -> FeatureMatrix {
    FeatureMatrix::from_rows(vec![
        vec![true, false, true],
        vec![false, true, false],
        vec![true, true, false],
        vec![false, false, true],
    ])
    .unwrap()
}

fn labels_4() -> Vec<bool> {
    vec![true, false, true, false]
}

fn builder_k2() -> EncodingBuilder {
    EncodingBuilder::new(2, 10, 1)
}

fn carry_6() -> ModelState {
    ModelState::from_assignment(
        vec![
            SignedLiteral::positive(1),
            SignedLiteral::negative(2),
            SignedLiteral::negative(3),
            SignedLiteral::negative(4),
            SignedLiteral::positive(5),
            SignedLiteral::negative(6),
        ],
        3,
    )
}

fn has_clause(formula: &WcnfFormula, weight: u64, literals: &[i64]) -> bool {
    formula.clauses().iter().any(|clause| {
        clause.weight == weight
            && clause.literals.iter().map(|l| l.as_int()).collect::<Vec<_>>() == literals
    })
}

mod header {
    use super::*;

    #[test]
    fn counts_match_the_emitted_lines() {
        let formula = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &ModelState::empty(), Phase::Train)
            .unwrap();

        let dimacs = formula.as_dimacs();
        let mut lines = dimacs.lines();
        let header: Vec<&str> = lines.next().unwrap().split_whitespace().collect();

        assert_eq!(header[0], "p");
        assert_eq!(header[1], "wcnf");
        assert_eq!(header[2].parse::<usize>().unwrap(), formula.variable_count());
        assert_eq!(header[3].parse::<usize>().unwrap(), formula.clause_count());
        assert_eq!(header[4].parse::<u64>().unwrap(), formula.top_weight());

        assert_eq!(lines.count(), formula.clause_count());
    }

    #[test]
    fn declared_variables_equal_the_highest_referenced() {
        let formula = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &ModelState::empty(), Phase::Train)
            .unwrap();

        // Two clauses over three features, four samples, two rejected:
        // 6 slots + 4 noise + 4 auxiliaries.
        assert_eq!(formula.variable_count(), 14);
        assert_eq!(formula.max_variable() as usize, formula.variable_count());
    }
}

mod weights {
    use super::*;

    #[test]
    fn top_weight_exceeds_the_soft_sum_in_every_phase() {
        let matrix = matrix_4x3();
        let rows = [0, 1, 2, 3];
        let labels = labels_4();

        for (carry, phase) in [
            (ModelState::empty(), Phase::Train),
            (carry_6(), Phase::Train),
            (carry_6(), Phase::Test),
        ] {
            let formula = builder_k2()
                .encode(&matrix, &rows, &labels, &carry, phase)
                .unwrap();
            assert!(formula.top_weight() > formula.soft_weight_sum());
        }
    }

    #[test]
    fn first_batch_penalizes_every_slot_and_noise_variable() {
        let formula = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &ModelState::empty(), Phase::Train)
            .unwrap();

        for slot in 1..=6_i64 {
            assert!(has_clause(&formula, 1, &[-slot]));
        }
        for noise in 7..=10_i64 {
            assert!(has_clause(&formula, 10, &[-noise]));
        }

        // dataFidelity · n + 1 + weightFeature · slots
        assert_eq!(formula.top_weight(), 10 * 4 + 1 + 6);
        assert_eq!(formula.soft_weight_sum(), formula.top_weight() - 1);
    }

    #[test]
    fn later_batches_reassert_the_carry_softly() {
        let formula = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &carry_6(), Phase::Train)
            .unwrap();

        // Carried polarities are favoured, not forced.
        assert!(has_clause(&formula, 1, &[1]));
        assert!(has_clause(&formula, 1, &[-2]));
        assert!(has_clause(&formula, 1, &[5]));
        assert!(!has_clause(&formula, formula.top_weight(), &[1]));

        // No blanket penalty on the slots once a carry exists.
        assert!(!has_clause(&formula, 1, &[-1]));
    }

    #[test]
    fn testing_freezes_the_carry_as_hard_clauses() {
        let formula = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &carry_6(), Phase::Test)
            .unwrap();

        let top = formula.top_weight();
        assert!(has_clause(&formula, top, &[1]));
        assert!(has_clause(&formula, top, &[-2]));
        assert!(has_clause(&formula, top, &[-6]));

        // Noise stays soft: residual error is measured, not forbidden.
        assert!(has_clause(&formula, 10, &[-7]));
    }

    #[test]
    fn training_and_testing_agree_on_the_top_weight() {
        let train = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &ModelState::empty(), Phase::Train)
            .unwrap();
        let carried = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &carry_6(), Phase::Train)
            .unwrap();
        let test = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &carry_6(), Phase::Test)
            .unwrap();

        assert_eq!(train.top_weight(), carried.top_weight());
        assert_eq!(train.top_weight(), test.top_weight());
    }
}

mod linkage {
    use super::*;

    #[test]
    fn accepted_samples_demand_an_active_slot_per_level() {
        let formula = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &ModelState::empty(), Phase::Train)
            .unwrap();
        let top = formula.top_weight();

        // Sample 0 is accepted with active features 0 and 2; its noise
        // variable is 7.
        assert!(has_clause(&formula, top, &[7, 1, 3]));
        assert!(has_clause(&formula, top, &[7, 4, 6]));
    }

    #[test]
    fn rejected_samples_are_witnessed_by_auxiliaries() {
        let formula = builder_k2()
            .encode(&matrix_4x3(), &[0, 1, 2, 3], &labels_4(), &ModelState::empty(), Phase::Train)
            .unwrap();
        let top = formula.top_weight();

        // Sample 1 is the first rejected sample: noise 8, auxiliaries 11 and
        // 12, one per clause level, and its only active feature is 1.
        assert!(has_clause(&formula, top, &[8, 11, 12]));
        assert!(has_clause(&formula, top, &[-11, -2]));
        assert!(has_clause(&formula, top, &[-12, -5]));
    }
}

mod errors {
    use super::*;

    #[test]
    fn an_empty_sample_block_is_rejected() {
        let outcome = builder_k2().encode(
            &matrix_4x3(),
            &[],
            &[],
            &ModelState::empty(),
            Phase::Train,
        );
        assert_eq!(outcome.unwrap_err(), EncodingError::EmptySampleBlock);
    }

    #[test]
    fn a_matrix_without_columns_is_rejected() {
        let matrix = FeatureMatrix::from_rows(vec![vec![], vec![]]).unwrap();
        let outcome = builder_k2().encode(
            &matrix,
            &[0, 1],
            &[true, false],
            &ModelState::empty(),
            Phase::Train,
        );
        assert_eq!(outcome.unwrap_err(), EncodingError::EmptyFeatureBlock);
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let outcome = builder_k2().encode(
            &matrix_4x3(),
            &[0, 1, 2],
            &[true, false],
            &ModelState::empty(),
            Phase::Train,
        );
        assert_eq!(
            outcome.unwrap_err(),
            EncodingError::LengthMismatch { samples: 3, labels: 2 }
        );
    }
}
