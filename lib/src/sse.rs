use crate::{average_point, BucketList, Coordinate, DownsampleError, Point, Result};

/// Least-squares line `y = slope * x + intercept` through `points`.
///
/// Returns `None` when every x is the same and the slope is undefined.
pub fn linear_regression<X: Coordinate, Y: Coordinate>(
    points: &[&Point<X, Y>],
) -> Result<Option<(f64, f64)>> {
    let (avg_x, avg_y) = average_point(points.iter().copied())?;

    let mut numerator = 0.0f64;
    let mut denominator = 0.0f64;
    for p in points {
        let dx = p.x_f64() - avg_x;
        numerator += dx * (p.y_f64() - avg_y);
        denominator += dx * dx;
    }
    if denominator == 0.0 {
        return Ok(None);
    }

    let slope = numerator / denominator;
    Ok(Some((slope, avg_y - slope * avg_x)))
}

/// Sum of squared residuals of `points` around their regression line.
pub fn sum_squared_errors<X: Coordinate, Y: Coordinate>(
    points: &[&Point<X, Y>],
) -> Result<Option<f64>> {
    let Some((slope, intercept)) = linear_regression(points)? else {
        return Ok(None);
    };
    let sse: f64 = points
        .iter()
        .map(|p| {
            let residual = p.y_f64() - (slope * p.x_f64() + intercept);
            residual * residual
        })
        .sum();
    Ok(Some(sse))
}

/// Scores every interior bucket by the SSE of its points extended with
/// the last point of the previous bucket and the first point of the next.
///
/// The table is indexed like the bucket list; the two endpoint buckets are
/// never candidates and score `0.0`.
pub fn sse_for_buckets<X: Coordinate, Y: Coordinate>(
    buckets: &BucketList<X, Y>,
) -> Result<Vec<f64>> {
    let mut table = vec![0.0; buckets.len()];
    let mut extended = Vec::new();

    for i in 1..buckets.len().saturating_sub(1) {
        extended.clear();
        extended.push(buckets[i - 1].last());
        extended.extend(buckets[i].points());
        extended.push(buckets[i + 1].first());

        table[i] = sum_squared_errors(&extended)?
            .ok_or(DownsampleError::DegenerateBucket { index: i })?;
    }

    Ok(table)
}
