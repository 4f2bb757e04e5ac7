use serde::{Deserialize, Serialize};

use crate::lttb::should_sample;
use crate::{
    iteration_budget, lttb_for_buckets, optimize, BucketList, Coordinate, Optimization, Point,
    Result,
};

/// Largest Triangle Dynamic (LTD) downsampling.
///
/// Starts from the equal-width buckets used by LTTB, then repeatedly splits
/// the bucket that a straight line fits worst and merges the quietest pair
/// of neighbouring buckets, so busy stretches of the series end up with more,
/// narrower buckets. LTTB selection runs on the resulting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ltd {
    /// Multiplier of the optimizer budget `len * factor / threshold`, see
    /// [`iteration_budget`]. A tuning knob, not a convergence bound.
    pub iteration_factor: usize,
}

impl Default for Ltd {
    fn default() -> Self {
        Ltd {
            iteration_factor: 10,
        }
    }
}

impl Ltd {
    pub fn with_iteration_factor(mut self, factor: usize) -> Self {
        self.iteration_factor = factor;
        self
    }

    /// Bucket configuration LTD samples from for `data`.
    pub fn buckets<X: Coordinate, Y: Coordinate>(
        &self,
        data: &[Point<X, Y>],
        threshold: usize,
    ) -> Result<BucketList<X, Y>> {
        self.buckets_with_report(data, threshold)
            .map(|(buckets, _)| buckets)
    }

    /// Like [`Ltd::buckets`], also returning how the optimizer run went.
    pub fn buckets_with_report<X: Coordinate, Y: Coordinate>(
        &self,
        data: &[Point<X, Y>],
        threshold: usize,
    ) -> Result<(BucketList<X, Y>, Optimization)> {
        let mut buckets = BucketList::split_data(data, threshold)?;
        let budget = iteration_budget(data.len(), threshold, self.iteration_factor);
        let report = optimize(&mut buckets, budget)?;
        Ok((buckets, report))
    }

    /// Reduces `data` to `threshold` points. Returns the original data
    /// unchanged if `threshold >= data.len()` or `threshold == 0`.
    pub fn downsample<X: Coordinate, Y: Coordinate>(
        &self,
        data: &[Point<X, Y>],
        threshold: usize,
    ) -> Result<Vec<Point<X, Y>>> {
        if !should_sample(data.len(), threshold)? {
            return Ok(data.to_vec());
        }
        let buckets = self.buckets(data, threshold)?;
        lttb_for_buckets(&buckets)
    }
}

/// [`Ltd::downsample`] with the default iteration factor.
pub fn ltd<X: Coordinate, Y: Coordinate>(
    data: &[Point<X, Y>],
    threshold: usize,
) -> Result<Vec<Point<X, Y>>> {
    Ltd::default().downsample(data, threshold)
}
