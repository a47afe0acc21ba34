//! Stratified train/test partitioning
//!
//! The test partition holds `ceil(n * test_ratio)` rows. Each class gets its
//! proportional share of that total, with leftover rows assigned by largest
//! remainder (ties to the lower class index). Rows within a class are picked
//! after a seeded shuffle.

use healthguard_core::RiskLabel;

use crate::deterministic::LcgRng;
use crate::errors::TrainerError;

/// Row indices of the two partitions, each sorted ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

pub fn stratified_split(
    labels: &[RiskLabel],
    test_ratio: f64,
    seed: u64,
) -> Result<SplitIndices, TrainerError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(TrainerError::Config(format!(
            "test ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }

    let n = labels.len();
    let n_test = (n as f64 * test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(TrainerError::Dataset(format!(
            "cannot split {} rows with test ratio {}",
            n, test_ratio
        )));
    }

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); RiskLabel::ALL.len()];
    for (idx, label) in labels.iter().enumerate() {
        by_class[label.index()].push(idx);
    }

    let allocation = allocate(&by_class.iter().map(Vec::len).collect::<Vec<_>>(), n_test);

    let mut rng = LcgRng::new(seed as i64);
    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);

    for (members, take) in by_class.iter_mut().zip(allocation) {
        rng.shuffle(members);
        test.extend_from_slice(&members[..take]);
        train.extend_from_slice(&members[take..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    Ok(SplitIndices { train, test })
}

/// Largest-remainder apportionment of `total` across classes sized `counts`
fn allocate(counts: &[usize], total: usize) -> Vec<usize> {
    let n: usize = counts.iter().sum();
    let mut shares: Vec<usize> = counts.iter().map(|&c| c * total / n).collect();
    let assigned: usize = shares.iter().sum();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    // descending remainder, then ascending class index
    order.sort_by_key(|&c| (std::cmp::Reverse(counts[c] * total % n), c));

    for &c in order.iter().take(total - assigned) {
        shares[c] += 1;
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(low: usize, alert: usize) -> Vec<RiskLabel> {
        let mut v = vec![RiskLabel::Low; low];
        v.extend(vec![RiskLabel::Alert; alert]);
        v
    }

    #[test]
    fn test_sizes_and_disjointness() {
        let y = labels(80, 20);
        let split = stratified_split(&y, 0.2, 42).unwrap();

        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_exact_stratification() {
        let y = labels(80, 20);
        let split = stratified_split(&y, 0.2, 42).unwrap();
        let test_alerts = split.test.iter().filter(|&&i| y[i].is_alert()).count();
        assert_eq!(test_alerts, 4);
    }

    #[test]
    fn test_seed_determinism() {
        let y = labels(70, 33);
        assert_eq!(
            stratified_split(&y, 0.2, 42).unwrap(),
            stratified_split(&y, 0.2, 42).unwrap()
        );
        assert_ne!(
            stratified_split(&y, 0.2, 42).unwrap(),
            stratified_split(&y, 0.2, 43).unwrap()
        );
    }

    #[test]
    fn test_allocate_largest_remainder() {
        // 7 * 3 / 10 = 2.1, 3 * 3 / 10 = 0.9
        assert_eq!(allocate(&[7, 3], 3), vec![2, 1]);
        // equal remainders go to the lower class index
        assert_eq!(allocate(&[5, 5], 3), vec![2, 1]);
        assert_eq!(allocate(&[10, 0], 2), vec![2, 0]);
    }

    #[test]
    fn test_invalid_ratio() {
        let y = labels(5, 5);
        assert!(stratified_split(&y, 0.0, 1).is_err());
        assert!(stratified_split(&y, 1.0, 1).is_err());
        assert!(stratified_split(&[RiskLabel::Low], 0.2, 1).is_err());
    }

    proptest! {
        #[test]
        fn split_preserves_class_proportions(
            low in 5usize..400,
            alert in 5usize..400,
            seed in any::<u32>()
        ) {
            let y = labels(low, alert);
            let split = stratified_split(&y, 0.2, seed as u64).unwrap();

            let frac = |idx: &[usize]| {
                idx.iter().filter(|&&i| y[i].is_alert()).count() as f64 / idx.len() as f64
            };
            let overall = alert as f64 / (low + alert) as f64;

            prop_assert!((frac(&split.test) - overall).abs() <= 1.0 / split.test.len() as f64);
            prop_assert!((frac(&split.train) - overall).abs() <= 1.0 / split.train.len() as f64);
        }
    }
}
