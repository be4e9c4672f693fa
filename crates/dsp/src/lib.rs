//! AUFP DSP Primitives
//!
//! This crate holds the signal-processing building blocks the fingerprinting
//! pipeline is assembled from. Everything here is streaming-friendly and
//! deterministic: same input, same output, on every run and every platform.
//!
//! ## What you need to know
//!
//! - All buffers are sized up front; steady-state processing does not
//!   allocate.
//! - No I/O, no threads, no randomness. State lives in the structs.
//!
//! ## The pieces
//!
//! - [`Fft`] - windowed real-input transform producing per-bin energies.
//! - [`MovingAverage`] - causal ring-buffered mean, used by the silence
//!   detector and the matcher's error smoothing.
//! - [`RollingIntegralImage`] - O(1) rectangle sums over a sliding window of
//!   feature rows.
//! - [`Resampler`] - rational-ratio polyphase resampler with a windowed-sinc
//!   anti-alias filter.
//! - [`SilenceRemover`] - drops the leading silent run of a stream.
//! - [`AudioProcessor`] - the audio front-end: channel mixdown plus
//!   resampling to the internal rate.

mod audio_processor;
mod fft;
mod integral_image;
mod moving_average;
mod resampler;
mod silence;
mod window;

pub use crate::audio_processor::{AudioProcessor, DspError, MAX_SAMPLE_RATE};
pub use crate::fft::Fft;
pub use crate::integral_image::RollingIntegralImage;
pub use crate::moving_average::MovingAverage;
pub use crate::resampler::Resampler;
pub use crate::silence::SilenceRemover;
pub use crate::window::hamming_window;
