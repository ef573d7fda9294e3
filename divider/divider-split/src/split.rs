//! Train/validation/test splitting.
//!
//! A split is two draws over row indices:
//!
//! 1. **Initial**: all rows into train (60%) and holdout (40%)
//! 2. **Holdout**: the holdout into validation and test (50/50)
//!
//! For a draw over `n` rows with held-out fraction `f`, the held-out side
//! gets `ceil(f * n)` rows and the kept side the rest. Each draw seeds its
//! own `ChaCha8Rng` from the configured seed, so the result depends only on
//! the table and the config.
//!
//! # Stratification
//!
//! Rows are grouped by the value of the stratify column (null is a class of
//! its own). Each class contributes `floor(c * n_kept / n)` rows to the kept
//! side, and leftover slots go to the classes with the largest remainders
//! (ties: larger class, then earlier class). A draw is stratified only if
//! every class has at least 2 members and both sides hold at least one row
//! per class; otherwise that draw falls back to an unstratified partition
//! and the fallback is reported on the result.

use divider_types::{Table, ValueKey};
use hashbrown::HashMap;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::{SplitConfig, HOLDOUT_FRACTION, TEST_FRACTION_OF_HOLDOUT};
use crate::error::{Result, SplitError};
use crate::result::{
    FallbackReason, SplitResult, SplitStage, StratificationFallback, StratifyOutcome,
};

/// Splits a table into train, validation and test subsets.
///
/// Identical `(table, config)` always yields identical subsets, row for row.
/// A stratify column that does not exist is treated as no stratification
/// and reported as [`StratifyOutcome::ColumnMissing`].
///
/// # Errors
///
/// Returns [`SplitError::EmptyDataset`] if the table has no rows or no
/// columns.
///
/// # Example
///
/// ```
/// use divider_split::{split, SplitConfig};
/// use divider_types::{TableBuilder, Value};
///
/// let mut builder = TableBuilder::new(["id", "label"]);
/// for (i, label) in ["A", "A", "A", "A", "A", "A", "B", "B", "B", "B"].iter().enumerate() {
///     builder.push_row(vec![Value::from(i as f64), Value::from(*label)]);
/// }
/// let table = builder.build().unwrap();
///
/// let config = SplitConfig::default().with_stratify_column("label");
/// let result = split(&table, &config).unwrap();
///
/// assert_eq!(result.train.row_count(), 6);
/// assert_eq!(result.validation.row_count(), 2);
/// assert_eq!(result.test.row_count(), 2);
/// assert!(!result.fell_back());
/// ```
pub fn split(table: &Table, config: &SplitConfig) -> Result<SplitResult> {
    if table.row_count() == 0 || table.column_count() == 0 {
        return Err(SplitError::empty_dataset(
            table.row_count(),
            table.column_count(),
        ));
    }

    let stratify = resolve_stratify_column(table, config);
    let keys: Option<Vec<ValueKey>> =
        stratify.map(|idx| table.column_values(idx).map(|v| v.key()).collect());

    let all_rows: Vec<usize> = (0..table.row_count()).collect();
    let first = draw(
        &all_rows,
        HOLDOUT_FRACTION,
        keys.as_deref(),
        config,
        SplitStage::Initial,
    );
    let second = draw(
        &first.held,
        TEST_FRACTION_OF_HOLDOUT,
        keys.as_deref(),
        config,
        SplitStage::Holdout,
    );

    let fallbacks: Vec<StratificationFallback> = [first.fallback, second.fallback]
        .into_iter()
        .flatten()
        .collect();

    let stratification = match (&config.stratify_column, stratify) {
        (None, _) => StratifyOutcome::NotRequested,
        (Some(name), None) => StratifyOutcome::ColumnMissing {
            column: name.clone(),
        },
        (Some(name), Some(_)) if fallbacks.is_empty() => StratifyOutcome::Stratified {
            column: name.clone(),
        },
        (Some(name), Some(_)) => StratifyOutcome::FellBack {
            column: name.clone(),
            fallbacks,
        },
    };

    let result = SplitResult {
        train: table.select_rows(&first.kept)?,
        validation: table.select_rows(&second.kept)?,
        test: table.select_rows(&second.held)?,
        stratification,
        random_seed: config.random_seed,
        shuffle: config.shuffle,
    };

    info!(
        rows = table.row_count(),
        train = result.train.row_count(),
        validation = result.validation.row_count(),
        test = result.test.row_count(),
        seed = config.random_seed,
        shuffle = config.shuffle,
        stratification = %result.stratification,
        "split dataset"
    );

    Ok(result)
}

/// Rows held out by a draw over `n` rows: `ceil(fraction * n)`, clamped to `n`.
///
/// Products within float noise of an integer are taken as that integer, so
/// `0.4 * 15` holds out 6 rather than 7.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn held_out_count(n: usize, fraction: f64) -> usize {
    let exact = fraction * n as f64;
    let nearest = exact.round();
    let held = if (exact - nearest).abs() < 1e-9 {
        nearest
    } else {
        exact.ceil()
    };
    (held.max(0.0) as usize).min(n)
}

fn resolve_stratify_column(table: &Table, config: &SplitConfig) -> Option<usize> {
    let name = config.stratify_column.as_deref()?;
    let idx = table.column_index(name);
    if idx.is_none() {
        warn!(
            column = name,
            "stratify column not found; splitting without stratification"
        );
    }
    idx
}

/// Row indices on each side of one draw.
struct Draw {
    kept: Vec<usize>,
    held: Vec<usize>,
    fallback: Option<StratificationFallback>,
}

fn draw(
    rows: &[usize],
    held_fraction: f64,
    keys: Option<&[ValueKey]>,
    config: &SplitConfig,
    stage: SplitStage,
) -> Draw {
    let n = rows.len();
    let n_held = held_out_count(n, held_fraction);
    let n_kept = n - n_held;
    let mut rng = ChaCha8Rng::seed_from_u64(config.random_seed);

    let mut fallback = None;
    let (kept, held) = match keys {
        Some(keys) if n > 0 => {
            let classes = group_by_class(rows, keys);
            let counts: Vec<usize> = classes.iter().map(Vec::len).collect();
            match infeasibility(&counts, n_kept, n_held) {
                None => stratified_partition(rows, classes, n_kept, config.shuffle, &mut rng),
                Some(reason) => {
                    warn!(
                        %stage,
                        column = config.stratify_column.as_deref().unwrap_or_default(),
                        %reason,
                        "stratification infeasible; falling back to unstratified draw"
                    );
                    fallback = Some(StratificationFallback { stage, reason });
                    simple_partition(rows, n_kept, config.shuffle, &mut rng)
                }
            }
        }
        _ => simple_partition(rows, n_kept, config.shuffle, &mut rng),
    };

    debug!(
        %stage,
        rows = n,
        kept = kept.len(),
        held = held.len(),
        stratified = keys.is_some() && fallback.is_none(),
        "partition draw"
    );

    Draw {
        kept,
        held,
        fallback,
    }
}

/// Groups draw positions by class, classes in first-appearance order.
fn group_by_class(rows: &[usize], keys: &[ValueKey]) -> Vec<Vec<usize>> {
    let mut slots: HashMap<&ValueKey, usize> = HashMap::new();
    let mut classes: Vec<Vec<usize>> = Vec::new();
    for (pos, &row) in rows.iter().enumerate() {
        let slot = *slots.entry(&keys[row]).or_insert_with(|| {
            classes.push(Vec::new());
            classes.len() - 1
        });
        classes[slot].push(pos);
    }
    classes
}

/// Why a draw cannot be stratified. A single class always can: every
/// partition preserves its proportion.
fn infeasibility(counts: &[usize], n_kept: usize, n_held: usize) -> Option<FallbackReason> {
    if counts.len() <= 1 {
        return None;
    }
    let members = counts.iter().copied().min().unwrap_or(0);
    if members < 2 {
        return Some(FallbackReason::LeastPopulatedClass { members });
    }
    let classes = counts.len();
    if n_kept < classes || n_held < classes {
        return Some(FallbackReason::TooFewRowsForClasses {
            rows: n_kept.min(n_held),
            classes,
        });
    }
    None
}

/// Unstratified draw. Shuffled: the first `n_held` of a permutation are held
/// out. Unshuffled: the leading `n_kept` rows are kept.
fn simple_partition(
    rows: &[usize],
    n_kept: usize,
    shuffle: bool,
    rng: &mut ChaCha8Rng,
) -> (Vec<usize>, Vec<usize>) {
    let mut order = rows.to_vec();
    if shuffle {
        order.shuffle(rng);
        let kept = order.split_off(rows.len() - n_kept);
        (kept, order)
    } else {
        let held = order.split_off(n_kept);
        (order, held)
    }
}

/// Stratified draw over class groups holding positions into `rows`.
fn stratified_partition(
    rows: &[usize],
    mut classes: Vec<Vec<usize>>,
    n_kept: usize,
    shuffle: bool,
    rng: &mut ChaCha8Rng,
) -> (Vec<usize>, Vec<usize>) {
    let counts: Vec<usize> = classes.iter().map(Vec::len).collect();
    let allocation = allocate(&counts, rows.len(), n_kept);

    let mut kept = Vec::with_capacity(n_kept);
    let mut held = Vec::with_capacity(rows.len() - n_kept);
    for (members, &take) in classes.iter_mut().zip(&allocation) {
        if shuffle {
            members.shuffle(rng);
        }
        kept.extend_from_slice(&members[..take]);
        held.extend_from_slice(&members[take..]);
    }

    if shuffle {
        kept.shuffle(rng);
        held.shuffle(rng);
    } else {
        kept.sort_unstable();
        held.sort_unstable();
    }

    let to_rows =
        |positions: Vec<usize>| -> Vec<usize> { positions.into_iter().map(|p| rows[p]).collect() };
    (to_rows(kept), to_rows(held))
}

/// Splits `target` slots across classes in proportion to their sizes.
///
/// Floors first, then one extra slot each for the largest remainders.
/// Never gives a class more slots than it has members.
fn allocate(counts: &[usize], total: usize, target: usize) -> Vec<usize> {
    if total == 0 {
        return vec![0; counts.len()];
    }

    let mut allocation: Vec<usize> = counts.iter().map(|&c| c * target / total).collect();
    let assigned: usize = allocation.iter().sum();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let rem_a = counts[a] * target % total;
        let rem_b = counts[b] * target % total;
        rem_b
            .cmp(&rem_a)
            .then(counts[b].cmp(&counts[a]))
            .then(a.cmp(&b))
    });

    for &slot in order.iter().take(target.saturating_sub(assigned)) {
        allocation[slot] += 1;
    }
    allocation
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
mod tests {
    use super::*;
    use divider_types::{TableBuilder, Value};
    use hashbrown::HashSet;

    /// Table with an `id` column (row identity) and a `label` column.
    fn labeled(labels: &[&str]) -> Table {
        let mut builder = TableBuilder::new(["id", "label"]);
        for (i, label) in labels.iter().enumerate() {
            builder.push_row(vec![Value::from(i as f64), Value::from(*label)]);
        }
        builder.build().unwrap()
    }

    fn ids(table: &Table) -> Vec<usize> {
        table
            .column_values(0)
            .map(|v| v.as_number().unwrap() as usize)
            .collect()
    }

    fn label_count(table: &Table, label: &str) -> usize {
        table
            .column_values(1)
            .filter(|v| v.as_text() == Some(label))
            .count()
    }

    fn scenario() -> Table {
        labeled(&["A", "A", "A", "A", "A", "A", "B", "B", "B", "B"])
    }

    fn assert_partition(table: &Table, result: &SplitResult) {
        let mut all: Vec<usize> = ids(&result.train);
        all.extend(ids(&result.validation));
        all.extend(ids(&result.test));
        assert_eq!(all.len(), table.row_count(), "completeness");

        let unique: HashSet<usize> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len(), "disjointness");
    }

    #[test]
    fn held_out_counts() {
        assert_eq!(held_out_count(10, HOLDOUT_FRACTION), 4);
        assert_eq!(held_out_count(15, HOLDOUT_FRACTION), 6);
        assert_eq!(held_out_count(4, TEST_FRACTION_OF_HOLDOUT), 2);
        assert_eq!(held_out_count(3, TEST_FRACTION_OF_HOLDOUT), 2);
        assert_eq!(held_out_count(1, HOLDOUT_FRACTION), 1);
        assert_eq!(held_out_count(0, HOLDOUT_FRACTION), 0);
    }

    #[test]
    fn allocate_proportional() {
        assert_eq!(allocate(&[6, 4], 10, 6), vec![4, 2]);
        assert_eq!(allocate(&[2, 2], 4, 2), vec![1, 1]);
        assert_eq!(allocate(&[5, 5], 10, 5), vec![3, 2]);
        assert_eq!(allocate(&[3], 3, 0), vec![0]);
    }

    #[test]
    fn allocate_ties_prefer_larger_class() {
        // Equal remainders and equal sizes: the earlier class wins.
        assert_eq!(allocate(&[3, 3], 6, 3), vec![2, 1]);
        // Remainders 2*3%7=6, 5*3%7=1: the larger remainder wins.
        assert_eq!(allocate(&[2, 5], 7, 3), vec![1, 2]);
    }

    #[test]
    fn scenario_sizes_and_ratio() {
        let table = scenario();
        let config = SplitConfig::default().with_stratify_column("label");
        let result = split(&table, &config).unwrap();

        assert_eq!(result.train.row_count(), 6);
        assert_eq!(result.validation.row_count(), 2);
        assert_eq!(result.test.row_count(), 2);
        assert_partition(&table, &result);

        assert_eq!(label_count(&result.train, "A"), 4);
        assert_eq!(label_count(&result.train, "B"), 2);
        assert_eq!(label_count(&result.validation, "A"), 1);
        assert_eq!(label_count(&result.test, "B"), 1);
        assert_eq!(
            result.stratification,
            StratifyOutcome::Stratified {
                column: "label".to_string()
            }
        );
    }

    #[test]
    fn scenario_is_deterministic() {
        let table = scenario();
        let config = SplitConfig::default().with_stratify_column("label");
        let first = split(&table, &config).unwrap();
        let second = split(&table, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_still_partition() {
        let table = scenario();
        let config = SplitConfig::default()
            .with_seed(7)
            .with_stratify_column("label");
        let result = split(&table, &config).unwrap();
        assert_partition(&table, &result);
        assert_eq!(result.train.row_count(), 6);
    }

    #[test]
    fn seeds_change_assignment() {
        let labels: Vec<&str> = (0..100).map(|i| if i % 3 == 0 { "x" } else { "y" }).collect();
        let table = labeled(&labels);
        let a = split(&table, &SplitConfig::default().with_seed(1)).unwrap();
        let b = split(&table, &SplitConfig::default().with_seed(2)).unwrap();
        assert_ne!(ids(&a.train), ids(&b.train));
    }

    #[test]
    fn unstratified_sizes() {
        let labels = vec!["x"; 10];
        let table = labeled(&labels);
        let result = split(&table, &SplitConfig::default()).unwrap();

        assert_eq!(result.train.row_count(), 6);
        assert_eq!(result.validation.row_count(), 2);
        assert_eq!(result.test.row_count(), 2);
        assert_eq!(result.stratification, StratifyOutcome::NotRequested);
        assert_partition(&table, &result);
    }

    #[test]
    fn no_shuffle_keeps_leading_rows() {
        let labels = vec!["x"; 10];
        let table = labeled(&labels);
        let result = split(&table, &SplitConfig::default().without_shuffle()).unwrap();

        assert_eq!(ids(&result.train), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(ids(&result.validation), vec![6, 7]);
        assert_eq!(ids(&result.test), vec![8, 9]);
    }

    #[test]
    fn no_shuffle_stratified_keeps_row_order() {
        let table = scenario();
        let config = SplitConfig::default()
            .without_shuffle()
            .with_stratify_column("label");
        let result = split(&table, &config).unwrap();

        assert_eq!(ids(&result.train), vec![0, 1, 2, 3, 6, 7]);
        assert_eq!(ids(&result.validation), vec![4, 8]);
        assert_eq!(ids(&result.test), vec![5, 9]);
        assert!(!result.fell_back());
    }

    #[test]
    fn stratification_preserves_frequencies() {
        // 30 x A, 20 x B, 10 x C: every class well above 4 members.
        let mut labels = vec!["A"; 30];
        labels.extend(vec!["B"; 20]);
        labels.extend(vec!["C"; 10]);
        let table = labeled(&labels);

        let result = split(&table, &SplitConfig::default().with_stratify_column("label")).unwrap();
        assert!(!result.fell_back());
        assert_partition(&table, &result);

        for subset in [&result.train, &result.validation, &result.test] {
            let n = subset.row_count() as f64;
            for (label, share) in [("A", 0.5), ("B", 1.0 / 3.0), ("C", 1.0 / 6.0)] {
                let observed = label_count(subset, label) as f64 / n;
                assert!(
                    (observed - share).abs() <= 1.0 / n,
                    "{label}: {observed} vs {share}"
                );
            }
        }
        assert_eq!(label_count(&result.train, "A"), 18);
        assert_eq!(label_count(&result.train, "B"), 12);
        assert_eq!(label_count(&result.train, "C"), 6);
    }

    #[test]
    fn singleton_class_falls_back() {
        let table = labeled(&["A", "A", "A", "A", "A", "B", "B", "B", "B", "C"]);
        let result = split(&table, &SplitConfig::default().with_stratify_column("label")).unwrap();

        assert!(result.fell_back());
        assert_partition(&table, &result);
        let first = &result.stratification.fallbacks()[0];
        assert_eq!(first.stage, SplitStage::Initial);
        assert_eq!(
            first.reason,
            FallbackReason::LeastPopulatedClass { members: 1 }
        );
        assert!(result.record().stratification_fell_back);
    }

    #[test]
    fn too_few_rows_for_classes_falls_back() {
        // Five classes of two: the 4-row holdout cannot hold five classes.
        let table = labeled(&["a", "a", "b", "b", "c", "c", "d", "d", "e", "e"]);
        let result = split(&table, &SplitConfig::default().with_stratify_column("label")).unwrap();

        assert_eq!(
            result.stratification.fallbacks()[0].reason,
            FallbackReason::TooFewRowsForClasses {
                rows: 4,
                classes: 5
            }
        );
        assert_partition(&table, &result);
    }

    #[test]
    fn single_class_is_a_noop() {
        let labels = vec!["only"; 10];
        let table = labeled(&labels);
        let result = split(&table, &SplitConfig::default().with_stratify_column("label")).unwrap();

        assert!(!result.fell_back());
        assert_eq!(result.train.row_count(), 6);
        assert_partition(&table, &result);
    }

    #[test]
    fn single_class_tiny_tables_do_not_fall_back() {
        for n in 1..=2 {
            let labels = vec!["only"; n];
            let table = labeled(&labels);
            for config in [
                SplitConfig::default().with_stratify_column("label"),
                SplitConfig::default()
                    .with_stratify_column("label")
                    .without_shuffle(),
            ] {
                let result = split(&table, &config).unwrap();
                assert!(!result.fell_back(), "n = {n}");
                assert_eq!(
                    result.stratification,
                    StratifyOutcome::Stratified {
                        column: "label".to_string()
                    }
                );
                assert_eq!(result.total_rows(), n);
                assert_partition(&table, &result);
            }
        }
    }

    #[test]
    fn null_is_its_own_class() {
        let mut builder = TableBuilder::new(["id", "label"]);
        for i in 0..10 {
            let label = if i < 5 { Value::Null } else { Value::from("x") };
            builder.push_row(vec![Value::from(f64::from(i)), label]);
        }
        let table = builder.build().unwrap();

        let result = split(&table, &SplitConfig::default().with_stratify_column("label")).unwrap();
        assert!(!result.fell_back());
        assert_eq!(result.train.null_count(1), 3);
    }

    #[test]
    fn missing_column_is_reported() {
        let table = scenario();
        let config = SplitConfig::default().with_stratify_column("nope");
        let result = split(&table, &config).unwrap();

        assert_eq!(
            result.stratification,
            StratifyOutcome::ColumnMissing {
                column: "nope".to_string()
            }
        );
        assert_eq!(result.record().stratify_column, "none");
        assert_partition(&table, &result);
    }

    #[test]
    fn empty_table_is_an_error() {
        let table = Table::empty(vec!["id".to_string()]).unwrap();
        let err = split(&table, &SplitConfig::default()).unwrap_err();
        assert!(err.is_empty_dataset());

        let no_columns = Table::empty(Vec::new()).unwrap();
        assert!(split(&no_columns, &SplitConfig::default())
            .unwrap_err()
            .is_empty_dataset());
    }

    #[test]
    fn tiny_tables_stay_well_formed() {
        for n in 1..=5 {
            let labels = vec!["x"; n];
            let table = labeled(&labels);
            for config in [
                SplitConfig::default(),
                SplitConfig::default().without_shuffle(),
                SplitConfig::default().with_stratify_column("label"),
            ] {
                let result = split(&table, &config).unwrap();
                assert_eq!(result.total_rows(), n);
                assert_partition(&table, &result);
                assert_eq!(result.train.columns(), table.columns());
            }
        }

        let one = labeled(&["x"]);
        let result = split(&one, &SplitConfig::default()).unwrap();
        assert_eq!(result.train.row_count(), 0);
        assert_eq!(result.validation.row_count(), 0);
        assert_eq!(result.test.row_count(), 1);
    }

    #[test]
    fn input_is_untouched() {
        let table = scenario();
        let before = table.clone();
        let _ = split(&table, &SplitConfig::default()).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn record_reflects_config() {
        let table = scenario();
        let config = SplitConfig::default()
            .with_seed(9)
            .without_shuffle()
            .with_stratify_column("label");
        let record = split(&table, &config).unwrap().record();

        assert_eq!(record.train_rows, 6);
        assert_eq!(record.validation_rows, 2);
        assert_eq!(record.test_rows, 2);
        assert_eq!(record.stratify_column, "label");
        assert_eq!(record.random_seed, 9);
        assert!(!record.shuffle);
        assert!(!record.stratification_fell_back);
    }
}
