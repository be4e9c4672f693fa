use dsp::RollingIntegralImage;

/// Haar-like rectangle arrangement evaluated over the rolling feature image.
///
/// Rows of the image are time frames, columns are the 12 pitch classes.
/// Each kind compares the energy of one region against another via
/// `ln(1+a) - ln(1+b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Whole rectangle against nothing.
    F0,
    /// Upper pitch half against lower pitch half.
    F1,
    /// Later time half against earlier time half.
    F2,
    /// Checkerboard of the four quadrants.
    F3,
    /// Middle pitch third against the outer thirds.
    F4,
    /// Middle time third against the outer thirds.
    F5,
}

/// A positioned filter: `y`/`height` span pitch classes, `width` spans
/// time frames starting at the evaluation offset.
#[derive(Debug, Clone, Copy)]
pub struct Filter {
    kind: FilterKind,
    y: usize,
    height: usize,
    width: usize,
}

impl Filter {
    pub const fn new(kind: FilterKind, y: usize, height: usize, width: usize) -> Self {
        Self {
            kind,
            y,
            height,
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Evaluate at time offset `x` (an absolute row index of the image).
    pub fn apply(&self, image: &RollingIntegralImage, x: usize) -> f64 {
        let (y, w, h) = (self.y, self.width, self.height);
        match self.kind {
            FilterKind::F0 => subtract_log(image.area(x, y, x + w - 1, y + h - 1), 0.0),
            FilterKind::F1 => {
                let h2 = h / 2;
                let a = image.area(x, y + h2, x + w - 1, y + h - 1);
                let b = image.area(x, y, x + w - 1, y + h2 - 1);
                subtract_log(a, b)
            }
            FilterKind::F2 => {
                let w2 = w / 2;
                let a = image.area(x + w2, y, x + w - 1, y + h - 1);
                let b = image.area(x, y, x + w2 - 1, y + h - 1);
                subtract_log(a, b)
            }
            FilterKind::F3 => {
                let w2 = w / 2;
                let h2 = h / 2;
                let a = image.area(x, y + h2, x + w2 - 1, y + h - 1)
                    + image.area(x + w2, y, x + w - 1, y + h2 - 1);
                let b = image.area(x, y, x + w2 - 1, y + h2 - 1)
                    + image.area(x + w2, y + h2, x + w - 1, y + h - 1);
                subtract_log(a, b)
            }
            FilterKind::F4 => {
                let h3 = h / 3;
                let a = image.area(x, y + h3, x + w - 1, y + 2 * h3 - 1);
                let b = image.area(x, y, x + w - 1, y + h3 - 1)
                    + image.area(x, y + 2 * h3, x + w - 1, y + h - 1);
                subtract_log(a, b)
            }
            FilterKind::F5 => {
                let w3 = w / 3;
                let a = image.area(x + w3, y, x + 2 * w3 - 1, y + h - 1);
                let b = image.area(x, y, x + w3 - 1, y + h - 1)
                    + image.area(x + 2 * w3, y, x + w - 1, y + h - 1);
                subtract_log(a, b)
            }
        }
    }
}

fn subtract_log(a: f64, b: f64) -> f64 {
    (1.0 + a).ln() - (1.0 + b).ln()
}

/// Four-level quantizer with three ordered thresholds.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer(pub f64, pub f64, pub f64);

impl Quantizer {
    pub fn quantize(&self, value: f64) -> u32 {
        debug_assert!(self.0 <= self.1 && self.1 <= self.2);
        if value < self.1 {
            if value < self.0 {
                0
            } else {
                1
            }
        } else if value < self.2 {
            2
        } else {
            3
        }
    }
}

/// A filter paired with its trained quantizer, producing 2 bits per frame.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    filter: Filter,
    quantizer: Quantizer,
}

impl Classifier {
    pub const fn new(filter: Filter, quantizer: Quantizer) -> Self {
        Self { filter, quantizer }
    }

    pub fn width(&self) -> usize {
        self.filter.width()
    }

    pub fn classify(&self, image: &RollingIntegralImage, offset: usize) -> u32 {
        self.quantizer.quantize(self.filter.apply(image, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_image(rows: usize, value: f64) -> RollingIntegralImage {
        let mut image = RollingIntegralImage::new(12, rows + 1);
        for _ in 0..rows {
            image.add_row(&[value; 12]);
        }
        image
    }

    #[test]
    fn quantizer_maps_intervals() {
        let q = Quantizer(-0.5, 0.0, 0.5);
        assert_eq!(q.quantize(-1.0), 0);
        assert_eq!(q.quantize(-0.5), 1);
        assert_eq!(q.quantize(-0.1), 1);
        assert_eq!(q.quantize(0.0), 2);
        assert_eq!(q.quantize(0.4), 2);
        assert_eq!(q.quantize(0.5), 3);
        assert_eq!(q.quantize(10.0), 3);
    }

    #[test]
    fn balanced_filters_vanish_on_uniform_input() {
        // Symmetric region pairs cancel when every cell holds the same value.
        let image = uniform_image(16, 0.3);
        for filter in [
            Filter::new(FilterKind::F1, 0, 4, 8),
            Filter::new(FilterKind::F2, 0, 4, 8),
            Filter::new(FilterKind::F3, 0, 4, 8),
        ] {
            let value = filter.apply(&image, 0);
            assert!(value.abs() < 1e-9, "{filter:?} gave {value}");
        }
    }

    #[test]
    fn f0_grows_with_energy() {
        let quiet = uniform_image(8, 0.1);
        let loud = uniform_image(8, 0.9);
        let filter = Filter::new(FilterKind::F0, 0, 3, 8);
        assert!(filter.apply(&loud, 0) > filter.apply(&quiet, 0));
    }

    #[test]
    fn f1_detects_pitch_imbalance() {
        // Energy only in the upper pitch half of the band.
        let mut image = RollingIntegralImage::new(12, 10);
        let mut row = [0.0; 12];
        for cell in row.iter_mut().skip(6) {
            *cell = 1.0;
        }
        for _ in 0..8 {
            image.add_row(&row);
        }
        let filter = Filter::new(FilterKind::F1, 0, 12, 8);
        assert!(filter.apply(&image, 0) > 0.0);
    }

    #[test]
    fn f2_detects_temporal_change() {
        // Quiet first half, loud second half.
        let mut image = RollingIntegralImage::new(12, 10);
        for _ in 0..4 {
            image.add_row(&[0.0; 12]);
        }
        for _ in 0..4 {
            image.add_row(&[1.0; 12]);
        }
        let filter = Filter::new(FilterKind::F2, 0, 12, 8);
        assert!(filter.apply(&image, 0) > 0.0);
    }
}
