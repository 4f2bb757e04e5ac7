use crate::{Coordinate, DownsampleError, Point, Result};

/// Absolute area of the triangle spanned by `a`, the virtual point
/// `(avg_x, avg_y)` and `c`.
#[inline]
pub fn triangle_area<X: Coordinate, Y: Coordinate>(
    a: &Point<X, Y>,
    (avg_x, avg_y): (f64, f64),
    c: &Point<X, Y>,
) -> f64 {
    let (ax, ay) = (a.x_f64(), a.y_f64());
    let (cx, cy) = (c.x_f64(), c.y_f64());
    ((ax - cx) * (avg_y - ay) - (ax - avg_x) * (cy - ay)).abs() * 0.5
}

/// Mean x and y of `points`, accumulated in `f64`.
pub fn average_point<'a, X, Y, I>(points: I) -> Result<(f64, f64)>
where
    X: Coordinate + 'a,
    Y: Coordinate + 'a,
    I: IntoIterator<Item = &'a Point<X, Y>>,
{
    let mut n = 0usize;
    let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);
    for p in points {
        sum_x += p.x_f64();
        sum_y += p.y_f64();
        n += 1;
    }
    if n == 0 {
        return Err(DownsampleError::EmptyInput);
    }
    Ok((sum_x / n as f64, sum_y / n as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_triangle_area() {
        let a = Point::new(0.0, 0.0);
        let c = Point::new(4.0, 0.0);
        assert_eq!(triangle_area(&a, (0.0, 3.0), &c), 6.0);
        // Orientation does not matter.
        assert_eq!(triangle_area(&c, (0.0, 3.0), &a), 6.0);
    }

    #[test]
    fn collinear_points_have_no_area() {
        let a = Point::new(0i32, 0i32);
        let c = Point::new(2i32, 2i32);
        assert_eq!(triangle_area(&a, (1.0, 1.0), &c), 0.0);
    }

    #[test]
    fn average_of_integer_points() {
        let pts = [Point::new(1u8, 10u8), Point::new(2, 20), Point::new(4, 255)];
        let (x, y) = average_point(&pts).unwrap();
        assert!((x - 7.0 / 3.0).abs() < 1e-12);
        // Accumulating in u8 would overflow here.
        assert!((y - 285.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn average_of_nothing_is_an_error() {
        let pts: [Point<f64, f64>; 0] = [];
        assert_eq!(average_point(&pts), Err(DownsampleError::EmptyInput));
    }
}
