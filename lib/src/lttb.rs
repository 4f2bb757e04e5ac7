use crate::bucket::EqualWidth;
use crate::{average_point, triangle_area, BucketList, Coordinate, DownsampleError, Point, Result};

/// Guards shared by the entry points. `Ok(false)` means the input is
/// passed through unchanged.
pub(crate) fn should_sample(len: usize, threshold: usize) -> Result<bool> {
    if len == 0 {
        return Err(DownsampleError::EmptyInput);
    }
    if threshold == 0 || threshold >= len {
        return Ok(false);
    }
    if threshold < 3 {
        return Err(DownsampleError::ThresholdTooSmall { threshold });
    }
    Ok(true)
}

/// Largest Triangle Three Buckets (LTTB) downsampling algorithm.
///
/// Reduces a sorted slice of points to exactly `threshold` points while
/// preserving the visual shape of the data. Interior buckets have equal
/// width and are never materialized: three moving indices track the
/// current bucket (`low..middle`) and the next one (`middle..high`).
///
/// Returns the original data unchanged if `threshold >= data.len()` or
/// `threshold == 0`.
pub fn lttb<X: Coordinate, Y: Coordinate>(
    data: &[Point<X, Y>],
    threshold: usize,
) -> Result<Vec<Point<X, Y>>> {
    if !should_sample(data.len(), threshold)? {
        return Ok(data.to_vec());
    }

    let n = data.len();
    let schedule = EqualWidth::new(n, threshold);

    let mut sampled = Vec::with_capacity(threshold);
    sampled.push(data[0]);

    let mut a_idx = 0usize;
    let mut low = 1;
    let mut middle = 1 + schedule.start(1);

    for i in 0..schedule.count() {
        // The bucket after the last interior one is the final point alone.
        let high = if i + 1 < schedule.count() {
            1 + schedule.start(i + 2)
        } else {
            n
        };

        let avg = average_point(&data[middle..high])?;

        let a = &data[a_idx];
        let mut max_area = -1.0f64;
        let mut max_idx = low;
        for (j, item) in data.iter().enumerate().take(middle).skip(low) {
            let area = triangle_area(a, avg, item);
            if area > max_area {
                max_area = area;
                max_idx = j;
            }
        }

        sampled.push(data[max_idx]);
        a_idx = max_idx;

        low = middle;
        middle = high;
    }

    sampled.push(data[n - 1]);
    Ok(sampled)
}

/// Selects one point per bucket of an explicit, possibly uneven, bucket
/// configuration. The endpoint buckets contribute their single point; every
/// interior bucket contributes the point forming the largest triangle with
/// the previously selected point and the centroid of the next bucket. A
/// boundary point shared by two neighbouring buckets is selected at most once.
pub fn lttb_for_buckets<X: Coordinate, Y: Coordinate>(
    buckets: &BucketList<X, Y>,
) -> Result<Vec<Point<X, Y>>> {
    let count = buckets.len();
    if count == 0 {
        return Err(DownsampleError::EmptyInput);
    }
    if count < 3 {
        return Err(DownsampleError::ThresholdTooSmall { threshold: count });
    }

    let mut sampled = Vec::with_capacity(count);
    let mut anchor = *buckets[0].first();
    sampled.push(anchor);

    for i in 1..count - 1 {
        let avg = average_point(buckets[i + 1].points())?;

        // The boundary point shared with the previous bucket may already
        // have been selected there.
        let bucket = &buckets[i];
        let candidates = if bucket.shares_first() && *bucket.first() == anchor {
            &bucket.points()[1..]
        } else {
            bucket.points()
        };
        let Some(mut selected) = candidates.first() else {
            return Err(DownsampleError::EmptyInput);
        };

        let mut max_area = -1.0f64;
        for point in candidates {
            let area = triangle_area(&anchor, avg, point);
            if area > max_area {
                max_area = area;
                selected = point;
            }
        }

        anchor = *selected;
        sampled.push(anchor);
    }

    sampled.push(*buckets[count - 1].first());
    Ok(sampled)
}

/// LTTB over a materialized equal-width bucket list. Picks the same points
/// as [`lttb`].
pub fn lttb_buckets<X: Coordinate, Y: Coordinate>(
    data: &[Point<X, Y>],
    threshold: usize,
) -> Result<Vec<Point<X, Y>>> {
    if !should_sample(data.len(), threshold)? {
        return Ok(data.to_vec());
    }
    let buckets = BucketList::split_data(data, threshold)?;
    lttb_for_buckets(&buckets)
}
