use crate::chroma::NUM_BANDS;

/// Ring capacity; must cover the longest coefficient set.
const BUFFER_SIZE: usize = 8;

/// FIR filter applied along the time axis of the chroma stream.
///
/// Output starts once `coefficients.len()` vectors have been seen; each
/// output is the coefficient-weighted sum of the last N vectors, oldest
/// coefficient first.
pub struct ChromaFilter {
    coefficients: &'static [f64],
    buffer: [[f64; NUM_BANDS]; BUFFER_SIZE],
    offset: usize,
    seen: usize,
}

impl ChromaFilter {
    pub fn new(coefficients: &'static [f64]) -> Self {
        assert!(coefficients.len() <= BUFFER_SIZE);
        assert!(!coefficients.is_empty());
        Self {
            coefficients,
            buffer: [[0.0; NUM_BANDS]; BUFFER_SIZE],
            offset: 0,
            seen: 0,
        }
    }

    pub fn consume(&mut self, features: &[f64; NUM_BANDS]) -> Option<[f64; NUM_BANDS]> {
        self.buffer[self.offset] = *features;
        self.offset = (self.offset + 1) % BUFFER_SIZE;
        self.seen += 1;

        let length = self.coefficients.len();
        if self.seen < length {
            return None;
        }
        let start = (self.offset + BUFFER_SIZE - length) % BUFFER_SIZE;
        let mut result = [0.0; NUM_BANDS];
        for (i, &coeff) in self.coefficients.iter().enumerate() {
            let row = &self.buffer[(start + i) % BUFFER_SIZE];
            for (out, &value) in result.iter_mut().zip(row.iter()) {
                *out += value * coeff;
            }
        }
        Some(result)
    }

    pub fn reset(&mut self) {
        self.buffer = [[0.0; NUM_BANDS]; BUFFER_SIZE];
        self.offset = 0;
        self.seen = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static IDENTITY: &[f64] = &[1.0];
    static PAIR: &[f64] = &[0.5, 0.5];
    static TRIPLE: &[f64] = &[0.25, 0.5, 0.25];

    fn row(value: f64) -> [f64; NUM_BANDS] {
        [value; NUM_BANDS]
    }

    #[test]
    fn identity_filter_passes_through() {
        let mut filter = ChromaFilter::new(IDENTITY);
        let out = filter.consume(&row(3.0)).expect("immediate output");
        assert_eq!(out, row(3.0));
    }

    #[test]
    fn output_starts_after_warmup() {
        let mut filter = ChromaFilter::new(TRIPLE);
        assert!(filter.consume(&row(1.0)).is_none());
        assert!(filter.consume(&row(2.0)).is_none());
        let out = filter.consume(&row(3.0)).expect("third vector completes the window");
        // 0.25*1 + 0.5*2 + 0.25*3 = 2.0
        assert!((out[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn coefficients_apply_oldest_first() {
        static RAMP: &[f64] = &[1.0, 0.0];
        let mut filter = ChromaFilter::new(RAMP);
        filter.consume(&row(7.0));
        let out = filter.consume(&row(9.0)).unwrap();
        // Weight 1.0 sits on the older vector.
        assert_eq!(out, row(7.0));
    }

    #[test]
    fn sliding_window_advances() {
        let mut filter = ChromaFilter::new(PAIR);
        filter.consume(&row(2.0));
        let first = filter.consume(&row(4.0)).unwrap();
        let second = filter.consume(&row(6.0)).unwrap();
        assert!((first[0] - 3.0).abs() < 1e-12);
        assert!((second[0] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn survives_ring_wraparound() {
        let mut filter = ChromaFilter::new(TRIPLE);
        let mut last = None;
        for i in 0..50 {
            last = filter.consume(&row(i as f64)).or(last);
        }
        // 0.25*47 + 0.5*48 + 0.25*49 = 48
        assert!((last.unwrap()[0] - 48.0).abs() < 1e-12);
    }
}
