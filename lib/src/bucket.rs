use std::ops::Index;

use crate::{Coordinate, DownsampleError, Point, Result};

/// Equal-width schedule over the interior points of a series of `len`
/// points split into `threshold` buckets. The first and last point are
/// excluded; they always form their own buckets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EqualWidth {
    interior: usize,
    count: usize,
}

impl EqualWidth {
    pub(crate) fn new(len: usize, threshold: usize) -> Self {
        EqualWidth {
            interior: len - 2,
            count: threshold - 2,
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// Offset into the interior range at which bucket `i` starts, that is
    /// `floor(i * interior / count)`. The bucket spans `start(i)..start(i + 1)`
    /// and `start(count)` is the end of the interior, so the last bucket
    /// absorbs any remainder.
    pub(crate) fn start(&self, i: usize) -> usize {
        if i >= self.count {
            return self.interior;
        }
        i * self.interior / self.count
    }
}

/// A contiguous, non-empty run of points owned by a [`BucketList`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<X, Y> {
    points: Vec<Point<X, Y>>,
    // First point is also the last point of the preceding bucket.
    shares_first: bool,
}

impl<X: Coordinate, Y: Coordinate> Bucket<X, Y> {
    fn new(points: Vec<Point<X, Y>>) -> Self {
        debug_assert!(!points.is_empty(), "buckets are never empty");
        Bucket {
            points,
            shares_first: false,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point<X, Y>] {
        &self.points
    }

    pub fn first(&self) -> &Point<X, Y> {
        &self.points[0]
    }

    pub fn last(&self) -> &Point<X, Y> {
        &self.points[self.points.len() - 1]
    }

    /// Whether the first point is the boundary point left behind by a split,
    /// i.e. the same input point as the last point of the preceding bucket.
    pub fn shares_first(&self) -> bool {
        self.shares_first
    }

    /// Splits the bucket in two around its midpoint. The left half keeps
    /// `ceil(len / 2)` points and the boundary point is shared by both
    /// halves, so the sizes add up to `len + 1`. Single-point buckets
    /// cannot be split.
    pub fn split(&self) -> Option<(Bucket<X, Y>, Bucket<X, Y>)> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        let left = (n + 1) / 2;
        Some((
            Bucket {
                points: self.points[..left].to_vec(),
                shares_first: self.shares_first,
            },
            Bucket {
                points: self.points[left - 1..].to_vec(),
                shares_first: true,
            },
        ))
    }

    /// Whether [`split`](Self::split) yields two halves that each span more
    /// than one x value, so both can still be scored by regression.
    pub fn can_split(&self) -> bool {
        let n = self.points.len();
        if n < 2 {
            return false;
        }
        let left = (n + 1) / 2;
        spans_x(&self.points[..left]) && spans_x(&self.points[left - 1..])
    }

    /// Concatenates `self` and `next`, preserving order. A boundary point
    /// the two share after a split is kept once.
    pub fn merge(mut self, next: Bucket<X, Y>) -> Bucket<X, Y> {
        let skip = usize::from(next.shares_first);
        self.points.extend(next.points.into_iter().skip(skip));
        self
    }
}

fn spans_x<X: Coordinate, Y: Coordinate>(points: &[Point<X, Y>]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first.x_f64() != last.x_f64(),
        _ => false,
    }
}

/// Ordered buckets covering a whole series. The first and the last bucket
/// hold exactly the first and the last point and are never split or merged.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketList<X, Y> {
    buckets: Vec<Bucket<X, Y>>,
}

impl<X: Coordinate, Y: Coordinate> BucketList<X, Y> {
    /// Partitions `data` into exactly `threshold` buckets: two single-point
    /// endpoint buckets and `threshold - 2` equal-width interior buckets.
    pub fn split_data(data: &[Point<X, Y>], threshold: usize) -> Result<Self> {
        let n = data.len();
        if n == 0 {
            return Err(DownsampleError::EmptyInput);
        }
        if threshold < 3 {
            return Err(DownsampleError::ThresholdTooSmall { threshold });
        }
        if threshold > n {
            return Err(DownsampleError::ThresholdExceedsLength { threshold, len: n });
        }

        let interior = &data[1..n - 1];
        let schedule = EqualWidth::new(n, threshold);

        let mut buckets = Vec::with_capacity(threshold);
        buckets.push(Bucket::new(vec![data[0]]));
        for i in 0..schedule.count() {
            let range = schedule.start(i)..schedule.start(i + 1);
            buckets.push(Bucket::new(interior[range].to_vec()));
        }
        buckets.push(Bucket::new(vec![data[n - 1]]));

        Ok(BucketList { buckets })
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket<X, Y>> {
        self.buckets.iter()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.buckets.iter().map(Bucket::len).collect()
    }

    /// Replaces the interior bucket at `index` by its two halves, shifting
    /// every later bucket one position right. Returns false, leaving the
    /// list untouched, when the bucket is an endpoint or has a single point.
    pub fn split_at(&mut self, index: usize) -> bool {
        if index == 0 || index + 1 >= self.buckets.len() {
            return false;
        }
        let Some((left, right)) = self.buckets[index].split() else {
            return false;
        };
        self.buckets[index] = left;
        self.buckets.insert(index + 1, right);
        true
    }

    /// Merges the interior buckets at `index` and `index + 1` into one.
    /// Returns false when either of them is an endpoint bucket.
    pub fn merge_at(&mut self, index: usize) -> bool {
        if index == 0 || index + 2 >= self.buckets.len() {
            return false;
        }
        let next = self.buckets.remove(index + 1);
        let current = self.buckets.remove(index);
        self.buckets.insert(index, current.merge(next));
        true
    }
}

impl<X, Y> Index<usize> for BucketList<X, Y> {
    type Output = Bucket<X, Y>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buckets[index]
    }
}

impl<'a, X: Coordinate, Y: Coordinate> IntoIterator for &'a BucketList<X, Y> {
    type Item = &'a Bucket<X, Y>;
    type IntoIter = std::slice::Iter<'a, Bucket<X, Y>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> Vec<Point<usize, f64>> {
        (0..n).map(|i| Point::new(i, (i * i) as f64)).collect()
    }

    fn xs(bucket: &Bucket<usize, f64>) -> Vec<usize> {
        bucket.points().iter().map(|p| p.x).collect()
    }

    #[test]
    fn endpoints_get_their_own_buckets() {
        let data = series(10);
        let buckets = BucketList::split_data(&data, 5).unwrap();
        assert_eq!(buckets.len(), 5);
        assert_eq!(xs(&buckets[0]), vec![0]);
        assert_eq!(xs(&buckets[4]), vec![9]);
    }

    #[test]
    fn interior_uses_floor_boundaries() {
        // 8 interior points over 3 buckets, width 8/3.
        let data = series(10);
        let buckets = BucketList::split_data(&data, 5).unwrap();
        assert_eq!(xs(&buckets[1]), vec![1, 2]);
        assert_eq!(xs(&buckets[2]), vec![3, 4, 5]);
        assert_eq!(xs(&buckets[3]), vec![6, 7, 8]);
    }

    #[test]
    fn every_point_lands_in_exactly_one_bucket() {
        for n in 3..60 {
            let data = series(n);
            for threshold in 3..=n {
                let buckets = BucketList::split_data(&data, threshold).unwrap();
                assert_eq!(buckets.len(), threshold);
                let flat: Vec<usize> = buckets.iter().flat_map(xs).collect();
                assert_eq!(flat, (0..n).collect::<Vec<_>>(), "n={n} threshold={threshold}");

                let interior = &buckets.sizes()[1..threshold - 1];
                let min = *interior.iter().min().unwrap();
                let max = *interior[..interior.len() - 1].iter().max().unwrap_or(&min);
                assert!(min >= 1);
                assert!(max - min <= 1, "n={n} threshold={threshold} sizes={interior:?}");
            }
        }
    }

    #[test]
    fn invalid_thresholds() {
        let data = series(10);
        assert_eq!(
            BucketList::split_data(&data, 2),
            Err(DownsampleError::ThresholdTooSmall { threshold: 2 })
        );
        assert_eq!(
            BucketList::split_data(&data, 11),
            Err(DownsampleError::ThresholdExceedsLength { threshold: 11, len: 10 })
        );
        assert_eq!(
            BucketList::split_data(&series(0), 3),
            Err(DownsampleError::EmptyInput)
        );
    }

    #[test]
    fn split_shares_the_boundary_point() {
        let data = series(14);
        let mut buckets = BucketList::split_data(&data, 4).unwrap();
        assert_eq!(buckets.sizes(), vec![1, 6, 6, 1]);

        assert!(buckets.split_at(1));
        assert_eq!(buckets.sizes(), vec![1, 3, 4, 6, 1]);
        assert_eq!(xs(&buckets[1]), vec![1, 2, 3]);
        assert_eq!(xs(&buckets[2]), vec![3, 4, 5, 6]);

        // Odd sizes: the left half gets the larger share.
        assert!(buckets.split_at(1));
        assert_eq!(buckets.sizes(), vec![1, 2, 2, 4, 6, 1]);
        assert_eq!(xs(&buckets[1]), vec![1, 2]);
        assert_eq!(xs(&buckets[2]), vec![2, 3]);
    }

    #[test]
    fn split_marks_the_shared_boundary() {
        let data = series(14);
        let mut buckets = BucketList::split_data(&data, 4).unwrap();
        assert!(buckets.iter().all(|b| !b.shares_first()));

        assert!(buckets.split_at(1));
        assert!(!buckets[1].shares_first());
        assert!(buckets[2].shares_first());
        assert_eq!(buckets[2].first(), buckets[1].last());

        // Splitting the right half again keeps the mark on its left part.
        assert!(buckets.split_at(2));
        assert!(buckets[2].shares_first());
        assert!(buckets[3].shares_first());

        // A merge keeps the mark of its leading bucket.
        assert!(buckets.merge_at(2));
        assert!(buckets[2].shares_first());
        assert!(!buckets[3].shares_first());
    }

    #[test]
    fn merging_split_halves_keeps_the_boundary_once() {
        let data = series(14);
        let mut buckets = BucketList::split_data(&data, 4).unwrap();
        let original = buckets.clone();

        assert!(buckets.split_at(1));
        assert_eq!(buckets.sizes(), vec![1, 3, 4, 6, 1]);
        assert!(buckets.merge_at(1));
        assert_eq!(buckets.sizes(), vec![1, 6, 6, 1]);
        assert_eq!(xs(&buckets[1]), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(buckets, original);
    }

    #[test]
    fn merge_concatenates() {
        let data = series(14);
        let mut buckets = BucketList::split_data(&data, 5).unwrap();
        let (p, q) = (buckets[1].len(), buckets[2].len());
        assert!(buckets.merge_at(1));
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[1].len(), p + q);
        assert_eq!(xs(&buckets[1]), (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn endpoints_are_never_touched() {
        let data = series(10);
        let mut buckets = BucketList::split_data(&data, 5).unwrap();
        let before = buckets.clone();
        assert!(!buckets.split_at(0));
        assert!(!buckets.split_at(4));
        assert!(!buckets.merge_at(0));
        assert!(!buckets.merge_at(3));
        assert_eq!(buckets, before);
    }

    #[test]
    fn splittable_only_when_both_halves_span_x() {
        let data = series(8);
        let buckets = BucketList::split_data(&data, 5).unwrap();
        assert_eq!(buckets.sizes(), vec![1, 2, 2, 2, 1]);
        // [a, b] would leave [a] on its own.
        assert!(!buckets[1].can_split());

        let buckets = BucketList::split_data(&data, 4).unwrap();
        assert_eq!(buckets.sizes(), vec![1, 3, 3, 1]);
        assert!(buckets[1].can_split());

        let flat = vec![
            Point::new(0, 0.0),
            Point::new(1, 1.0),
            Point::new(1, 2.0),
            Point::new(1, 3.0),
            Point::new(2, 4.0),
        ];
        let buckets = BucketList::split_data(&flat, 3).unwrap();
        assert!(!buckets[1].can_split());
    }

    #[test]
    fn single_point_bucket_does_not_split() {
        let data = series(5);
        let mut buckets = BucketList::split_data(&data, 5).unwrap();
        assert!(!buckets.split_at(2));
        assert_eq!(buckets.len(), 5);
    }
}
