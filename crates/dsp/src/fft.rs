use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft as RustFft, FftPlanner};

use crate::window::hamming_window;

/// Windowed forward transform of fixed-size i16 frames.
///
/// The window coefficients carry the `1/32768` normalization for 16-bit
/// input, so callers feed raw PCM frames and read back per-bin energies
/// (`re^2 + im^2`) for the `frame_size / 2 + 1` non-redundant bins.
pub struct Fft {
    frame_size: usize,
    window: Vec<f64>,
    plan: Arc<dyn RustFft<f64>>,
    buffer: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl Fft {
    pub fn new(frame_size: usize) -> Self {
        let plan = FftPlanner::new().plan_fft_forward(frame_size);
        let scratch_len = plan.get_inplace_scratch_len();
        Self {
            frame_size,
            window: hamming_window(frame_size, 1.0 / 32768.0),
            plan,
            buffer: vec![Complex::new(0.0, 0.0); frame_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Number of output bins (`frame_size / 2 + 1`).
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Transform one frame and write per-bin energies into `output`.
    pub fn compute(&mut self, frame: &[i16], output: &mut [f64]) {
        assert_eq!(frame.len(), self.frame_size, "frame size mismatch");
        assert_eq!(output.len(), self.num_bins(), "output bin count mismatch");
        for (slot, (&sample, &coeff)) in
            self.buffer.iter_mut().zip(frame.iter().zip(self.window.iter()))
        {
            *slot = Complex::new(sample as f64 * coeff, 0.0);
        }
        self.plan
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        for (bin, out) in output.iter_mut().enumerate() {
            let c = self.buffer[bin];
            *out = c.re * c.re + c.im * c.im;
        }
    }
}
