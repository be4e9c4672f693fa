//! AUFP Fingerprint Extraction
//!
//! This crate turns PCM audio into a compact acoustic fingerprint: a
//! sequence of 32-bit sub-fingerprints, one per overlapped analysis frame.
//! Audio that sounds the same hashes the same, within a few bits, across
//! mild distortion, lossy encoding, and resampling.
//!
//! ## What you need to know
//!
//! - Deterministic: same PCM + same algorithm id = bit-identical output.
//!   No I/O, no randomness, no wall-clock dependence.
//! - Streaming: feed samples in chunks of any size; chunking never changes
//!   the result.
//! - Every tunable is bound to the [`Algorithm`] id. The only runtime
//!   option is `silence_threshold`.
//!
//! ## The pipeline (per frame)
//!
//! 1. **Front-end** - mix down to mono, resample to 11025 Hz, optionally
//!    strip leading silence.
//! 2. **Spectral analysis** - Hamming-windowed 4096-point FFT every 1365
//!    samples, keeping per-bin energies.
//! 3. **Chroma folding** - collapse bins between 28 and 3520 Hz onto 12
//!    pitch classes, smooth along time, normalize.
//! 4. **Classification** - 16 trained Haar-like filters over a rolling
//!    integral image of the chroma rows; each output is quantized to 2
//!    bits, gray-coded, and packed into one `u32`.
//!
//! ## Quick example
//!
//! ```no_run
//! use fingerprint::{Algorithm, Fingerprinter};
//!
//! let mut printer = Fingerprinter::new(Algorithm::V2);
//! printer.start(44100, 2).unwrap();
//! printer.consume(&[0i16; 8192]).unwrap();
//! printer.finish().unwrap();
//! let fp = printer.take_fingerprint();
//! println!("{} items", fp.len());
//! ```

mod calculator;
mod chroma;
mod chroma_filter;
pub mod classifier;
pub mod config;
mod error;
mod fingerprinter;
mod types;

pub use crate::calculator::FingerprintCalculator;
pub use crate::chroma::{normalize_features, Chroma, NORM_FLOOR, NUM_BANDS};
pub use crate::chroma_filter::ChromaFilter;
pub use crate::classifier::{Classifier, Filter, FilterKind, Quantizer};
pub use crate::config::{Algorithm, FingerprintConfig, FRAME_SIZE, SAMPLE_RATE};
pub use crate::error::FingerprintError;
pub use crate::fingerprinter::Fingerprinter;
pub use crate::types::Fingerprint;
