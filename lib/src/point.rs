use std::fmt::Debug;

use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

/// Numeric representation usable for either axis of a [`Point`].
///
/// Any primitive integer or float qualifies. Values are only ever widened
/// to `f64` at the point of computation; stored coordinates are untouched.
pub trait Coordinate: Copy + PartialOrd + Debug + AsPrimitive<f64> {}

impl<T> Coordinate for T where T: Copy + PartialOrd + Debug + AsPrimitive<f64> {}

// Point is a single sample of a series: x is the independent axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<X, Y> {
    pub x: X,
    pub y: Y,
}

impl<X: Coordinate, Y: Coordinate> Point<X, Y> {
    pub fn new(x: X, y: Y) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn x_f64(&self) -> f64 {
        self.x.as_()
    }

    #[inline]
    pub fn y_f64(&self) -> f64 {
        self.y.as_()
    }
}

impl<X, Y> From<(X, Y)> for Point<X, Y> {
    fn from((x, y): (X, Y)) -> Self {
        Point { x, y }
    }
}
