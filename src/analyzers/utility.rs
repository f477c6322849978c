/// Computes the arithmetic mean of a running sum over `count` values. Returns 0.0 when `count` is zero.
pub fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

/// Divides `numerator` by `denominator`, returning 0.0 when the denominator is exactly zero.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
