use rand::{rngs::StdRng, SeedableRng};

use rulesat::{
    config::BatchCount,
    procedures::partition::{partition, resolve_batch_count},
    types::err::ConfigError,
};

mod resolution {
    use super::*;

    #[test]
    fn a_fixed_count_must_be_a_power_of_two() {
        assert_eq!(
            resolve_batch_count(BatchCount::Fixed(3), 96),
            Err(ConfigError::BatchCountNotPowerOfTwo(3))
        );
        assert_eq!(
            resolve_batch_count(BatchCount::Fixed(0), 96),
            Err(ConfigError::ZeroBatchCount)
        );
        assert_eq!(resolve_batch_count(BatchCount::Fixed(8), 96), Ok(8));
    }

    #[test]
    fn auto_targets_thirty_two_samples_per_batch() {
        assert_eq!(resolve_batch_count(BatchCount::Auto, 1000), Ok(16));
        assert_eq!(resolve_batch_count(BatchCount::Auto, 2048), Ok(64));
        assert_eq!(resolve_batch_count(BatchCount::Auto, 95), Ok(2));
        assert_eq!(resolve_batch_count(BatchCount::Auto, 64), Ok(2));
    }

    #[test]
    fn auto_floors_at_a_single_batch() {
        assert_eq!(resolve_batch_count(BatchCount::Auto, 20), Ok(1));
        assert_eq!(resolve_batch_count(BatchCount::Auto, 0), Ok(1));
    }
}

mod balance {
    use super::*;

    #[test]
    fn batches_preserve_class_proportions_exactly_when_counts_divide() {
        // 32 of each class over four batches: eight of each class per batch.
        let labels: Vec<bool> = std::iter::repeat(false)
            .take(32)
            .chain(std::iter::repeat(true).take(32))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);

        let batches = partition(&labels, 4, &mut rng);

        assert_eq!(batches.len(), 4);
        for batch in &batches {
            assert_eq!(batch.len(), 16);
            assert_eq!(batch.iter().filter(|&&index| labels[index]).count(), 8);
        }
    }

    #[test]
    fn every_sample_lands_in_exactly_one_batch() {
        // Odd class counts: the remainders drift by at most one per bisection.
        let labels: Vec<bool> = (0..23).map(|index| index % 3 == 0).collect();
        let mut rng = StdRng::seed_from_u64(99);

        let batches = partition(&labels, 4, &mut rng);

        let mut seen: Vec<usize> = batches.iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn a_single_batch_holds_everything() {
        let labels = vec![true, false, true, false, true];
        let mut rng = StdRng::seed_from_u64(0);

        let batches = partition(&labels, 1, &mut rng);

        assert_eq!(batches.len(), 1);
        let mut seen = batches[0].clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }
}
