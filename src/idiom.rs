//! Idiom character shuffling and landing-column selection for Idiom mode.

use iter_tools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;

/// Fisher–Yates shuffle retried up to ten times against the identity
/// permutation. Highly repetitive idioms may still come back unchanged after
/// the retries run out; that residual chance is accepted.
pub fn shuffle_distinct(chars: &[char], rng: &mut impl Rng) -> Vec<char> {
    let mut out = chars.to_vec();
    for _ in 0..10 {
        out.shuffle(rng);
        if out != chars {
            break;
        }
    }
    out
}

/// Up to `count` distinct grid columns drawn without replacement and sorted
/// ascending, so the shuffled characters land in a stable left-to-right
/// visual order.
pub fn landing_columns(cols: usize, count: usize, rng: &mut impl Rng) -> Vec<usize> {
    rand::seq::index::sample(rng, cols, count.min(cols))
        .into_iter()
        .sorted()
        .collect()
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn shuffle_differs_for_distinct_idioms() {
        let original: Vec<char> = "一心一意".chars().collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut changed = 0;
        for _ in 0..10 {
            let shuffled = shuffle_distinct(&original, &mut rng);
            assert_eq!(shuffled.iter().sorted().collect::<Vec<_>>(), original.iter().sorted().collect::<Vec<_>>());
            if shuffled != original {
                changed += 1;
            }
        }
        // the 10-retry cap makes an unchanged order vanishingly rare
        assert!(changed >= 9, "only {changed} of 10 trials differed");
    }

    #[test]
    fn shuffle_accepts_degenerate_idioms() {
        let original: Vec<char> = "一一一一".chars().collect();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(shuffle_distinct(&original, &mut rng), original);
        assert_eq!(shuffle_distinct(&[], &mut rng), Vec::<char>::new());
    }

    #[test]
    fn columns_are_distinct_sorted_and_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let cols = landing_columns(14, 4, &mut rng);
            assert_eq!(cols.len(), 4);
            assert!(cols.windows(2).all(|w| w[0] < w[1]));
            assert!(cols.iter().all(|&c| c < 14));
        }
    }

    #[test]
    fn columns_clamp_to_narrow_grids() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(landing_columns(2, 4, &mut rng).len(), 2);
        assert_eq!(landing_columns(0, 4, &mut rng).len(), 0);
    }
}
