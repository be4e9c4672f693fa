use crate::moving_average::MovingAverage;

/// Level-detector window, ~5 ms at the 11025 Hz internal rate.
const SILENCE_WINDOW: usize = 55;

/// Strips the leading silent run of a sample stream.
///
/// A short moving average of `|sample|` is tracked while the stream is
/// still silent; output begins at the first sample whose windowed average
/// exceeds the threshold. The state is monotone: once the stream has
/// opened it never closes again, so a quiet passage later on is passed
/// through untouched.
pub struct SilenceRemover {
    threshold: f64,
    average: MovingAverage,
    open: bool,
}

impl SilenceRemover {
    /// `threshold` is an absolute sample level in `0..=32767`.
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold: threshold as f64,
            average: MovingAverage::new(SILENCE_WINDOW),
            open: false,
        }
    }

    /// Append the non-silent part of `input` to `output`.
    pub fn process(&mut self, input: &[i16], output: &mut Vec<i16>) {
        if self.open {
            output.extend_from_slice(input);
            return;
        }
        for (i, &sample) in input.iter().enumerate() {
            self.average.push((sample as f64).abs());
            if self.average.average() > self.threshold {
                self.open = true;
                output.extend_from_slice(&input[i..]);
                return;
            }
        }
    }

    pub fn reset(&mut self) {
        self.average.reset();
        self.open = false;
    }
}
