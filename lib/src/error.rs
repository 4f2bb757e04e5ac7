use thiserror::Error;

/// Failures reported by the downsampling algorithms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DownsampleError {
    #[error("input series is empty")]
    EmptyInput,

    #[error("threshold {threshold} is too small, at least 3 buckets are required")]
    ThresholdTooSmall { threshold: usize },

    #[error("threshold {threshold} exceeds the series length {len}")]
    ThresholdExceedsLength { threshold: usize, len: usize },

    // All x values of the extended scoring set are equal, so the
    // regression slope has a zero denominator.
    #[error("bucket {index} has no spread along x, regression is undefined")]
    DegenerateBucket { index: usize },
}

pub type Result<T> = std::result::Result<T, DownsampleError>;
