use tracing::{debug, trace};

use crate::{sse_for_buckets, BucketList, Coordinate, Result};

/// Why a bucket optimization run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Every iteration allowed by the budget was spent.
    BudgetExhausted,
    /// No splittable interior bucket has a positive SSE.
    NoSplitCandidate,
    /// No adjacent pair is far enough from the bucket being split.
    NoMergeCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optimization {
    pub budget: usize,
    /// Split/merge moves applied to the bucket list.
    pub moves: usize,
    pub stop: Stop,
}

/// Heuristic iteration budget, `floor(len * factor / threshold)`.
pub fn iteration_budget(len: usize, threshold: usize, factor: usize) -> usize {
    if threshold == 0 {
        return 0;
    }
    len.saturating_mul(factor) / threshold
}

/// Interior bucket with the strictly highest positive SSE. Buckets that
/// cannot be split into two regressable halves, single points included,
/// are skipped.
pub fn highest_sse_bucket<X: Coordinate, Y: Coordinate>(
    buckets: &BucketList<X, Y>,
    sse: &[f64],
) -> Option<usize> {
    let mut max_sse = 0.0;
    let mut found = None;
    for i in 1..sse.len().saturating_sub(1) {
        if buckets[i].can_split() && sse[i] > max_sse {
            max_sse = sse[i];
            found = Some(i);
        }
    }
    found
}

/// Start index of the adjacent interior pair `(i, i + 1)` with the lowest
/// summed SSE. Pairs containing `split`, or directly next to it on either
/// side, are not eligible.
pub fn lowest_sse_adjacent_pair(sse: &[f64], split: usize) -> Option<usize> {
    let mut min_sum = f64::INFINITY;
    let mut found = None;
    for i in 1..sse.len().saturating_sub(2) {
        if i + 2 >= split && i <= split + 1 {
            continue;
        }
        let sum = sse[i] + sse[i + 1];
        if found.is_none() || sum < min_sum {
            min_sum = sum;
            found = Some(i);
        }
    }
    found
}

/// Runs the split/merge local search on `buckets` for at most `budget`
/// iterations. The bucket count never changes: every split is paired with
/// a merge.
pub fn optimize<X: Coordinate, Y: Coordinate>(
    buckets: &mut BucketList<X, Y>,
    budget: usize,
) -> Result<Optimization> {
    let mut outcome = Optimization {
        budget,
        moves: 0,
        stop: Stop::BudgetExhausted,
    };

    while outcome.moves < budget {
        let sse = sse_for_buckets(buckets)?;

        let Some(split) = highest_sse_bucket(buckets, &sse) else {
            outcome.stop = Stop::NoSplitCandidate;
            break;
        };
        let Some(mut merge) = lowest_sse_adjacent_pair(&sse, split) else {
            outcome.stop = Stop::NoMergeCandidate;
            break;
        };

        let did_split = buckets.split_at(split);
        debug_assert!(did_split);
        if merge > split {
            merge += 1;
        }
        let did_merge = buckets.merge_at(merge);
        debug_assert!(did_merge);

        trace!(
            iteration = outcome.moves,
            split,
            merge,
            sse = sse[split],
            "moved bucket boundary"
        );
        outcome.moves += 1;
    }

    debug!(
        budget,
        moves = outcome.moves,
        stop = ?outcome.stop,
        buckets = buckets.len(),
        "bucket optimization finished"
    );
    Ok(outcome)
}
