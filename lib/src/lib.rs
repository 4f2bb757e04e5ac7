//! Shape-preserving downsampling of ordered 2-D series.
//!
//! [`lttb()`] implements Largest Triangle Three Buckets over equal-width
//! buckets. [`ltd()`] implements Largest Triangle Dynamic, which first
//! reshapes the buckets by linear-regression error and then applies the
//! same triangle selection.

mod bucket;
mod codec;
mod error;
mod geometry;
mod ltd;
mod lttb;
mod optimizer;
mod point;
mod sse;

pub use bucket::{Bucket, BucketList};
pub use codec::*;
pub use error::*;
pub use geometry::*;
pub use ltd::*;
pub use lttb::{lttb, lttb_buckets, lttb_for_buckets};
pub use optimizer::*;
pub use point::*;
pub use sse::*;
