use dsp::RollingIntegralImage;

use crate::chroma::NUM_BANDS;
use crate::classifier::Classifier;

/// Two-bit gray code, indexed by quantizer output.
const GRAY_CODE: [u32; 4] = [0, 1, 3, 2];

/// Turns the stream of chroma feature rows into 32-bit sub-fingerprints.
///
/// Rows accumulate in a rolling integral image; once the image holds the
/// widest classifier footprint, one word is emitted per row, evaluated at
/// the trailing edge of the window.
pub struct FingerprintCalculator {
    classifiers: &'static [Classifier],
    max_filter_width: usize,
    image: RollingIntegralImage,
}

impl FingerprintCalculator {
    pub fn new(classifiers: &'static [Classifier]) -> Self {
        let max_filter_width = classifiers
            .iter()
            .map(Classifier::width)
            .max()
            .expect("classifier table is never empty");
        Self {
            classifiers,
            max_filter_width,
            // One guard row beyond the footprint for the integral lookup
            // at the window's left edge.
            image: RollingIntegralImage::new(NUM_BANDS, max_filter_width + 1),
        }
    }

    pub fn consume(&mut self, features: &[f64; NUM_BANDS]) -> Option<u32> {
        self.image.add_row(features);
        if self.image.rows() >= self.max_filter_width {
            Some(self.subfingerprint(self.image.rows() - self.max_filter_width))
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.image.reset();
    }

    fn subfingerprint(&self, offset: usize) -> u32 {
        let mut bits = 0u32;
        for classifier in self.classifiers {
            bits = (bits << 2) | GRAY_CODE[classifier.classify(&self.image, offset) as usize];
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Algorithm, FingerprintConfig};

    fn calculator() -> FingerprintCalculator {
        FingerprintCalculator::new(FingerprintConfig::for_algorithm(Algorithm::V2).classifiers)
    }

    #[test]
    fn warmup_consumes_filter_width_rows() {
        let mut calc = calculator();
        let row = [0.1; NUM_BANDS];
        for i in 0..15 {
            assert!(calc.consume(&row).is_none(), "row {i} emitted too early");
        }
        assert!(calc.consume(&row).is_some());
    }

    #[test]
    fn one_word_per_row_after_warmup() {
        let mut calc = calculator();
        let row = [0.2; NUM_BANDS];
        let mut words = 0;
        for _ in 0..100 {
            if calc.consume(&row).is_some() {
                words += 1;
            }
        }
        assert_eq!(words, 100 - 15);
    }

    #[test]
    fn constant_input_repeats_the_same_word() {
        let mut calc = calculator();
        let row = [0.5; NUM_BANDS];
        let mut words = Vec::new();
        for _ in 0..40 {
            if let Some(word) = calc.consume(&row) {
                words.push(word);
            }
        }
        assert!(words.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn different_content_changes_the_word() {
        let mut flat = calculator();
        let mut tilted = calculator();
        let mut flat_word = None;
        let mut tilted_word = None;
        for i in 0..20 {
            flat_word = flat.consume(&[0.3; NUM_BANDS]).or(flat_word);
            let mut row = [0.0; NUM_BANDS];
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (i % 7) as f64 * 0.1 + j as f64 * 0.05;
            }
            tilted_word = tilted.consume(&row).or(tilted_word);
        }
        assert_ne!(flat_word.unwrap(), tilted_word.unwrap());
    }

    #[test]
    fn reset_restarts_warmup() {
        let mut calc = calculator();
        let row = [0.4; NUM_BANDS];
        for _ in 0..20 {
            calc.consume(&row);
        }
        calc.reset();
        assert!(calc.consume(&row).is_none());
    }

    #[test]
    fn deterministic_word_stream() {
        let rows: Vec<[f64; NUM_BANDS]> = (0..64)
            .map(|i| {
                let mut row = [0.0; NUM_BANDS];
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = ((i * 31 + j * 17) % 97) as f64 / 97.0;
                }
                row
            })
            .collect();
        let run = |rows: &[[f64; NUM_BANDS]]| {
            let mut calc = calculator();
            rows.iter().filter_map(|r| calc.consume(r)).collect::<Vec<u32>>()
        };
        assert_eq!(run(&rows), run(&rows));
    }
}
