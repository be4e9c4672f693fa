use std::f64::consts::PI;

/// Precompute a Hamming window of the given size.
///
/// `scale` is folded into the coefficients so that windowing and sample
/// normalization happen in a single multiply per sample.
pub fn hamming_window(size: usize, scale: f64) -> Vec<f64> {
    assert!(size > 1, "window size must be at least 2");
    (0..size)
        .map(|i| scale * (0.54 - 0.46 * (2.0 * PI * i as f64 / (size - 1) as f64).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_symmetric() {
        let w = hamming_window(64, 1.0);
        for i in 0..32 {
            assert!((w[i] - w[63 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn window_endpoints_and_peak() {
        let w = hamming_window(65, 1.0);
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[32] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scale_is_applied() {
        let unscaled = hamming_window(16, 1.0);
        let scaled = hamming_window(16, 0.5);
        for (a, b) in unscaled.iter().zip(scaled.iter()) {
            assert!((a * 0.5 - b).abs() < 1e-15);
        }
    }
}
