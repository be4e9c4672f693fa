use std::mem;

use dsp::{AudioProcessor, Fft, SilenceRemover};

use crate::calculator::FingerprintCalculator;
use crate::chroma::{normalize_features, Chroma, NORM_FLOOR};
use crate::chroma_filter::ChromaFilter;
use crate::config::{Algorithm, FingerprintConfig};
use crate::error::FingerprintError;
use crate::types::Fingerprint;

/// Streaming fingerprint extractor.
///
/// Drives the whole pipeline: audio front-end, optional silence removal,
/// overlapped framing, FFT, chroma folding and smoothing, classifier
/// evaluation. Feed PCM with [`consume`](Fingerprinter::consume), then
/// [`finish`](Fingerprinter::finish) to flush the tail.
///
/// All buffers are sized at [`start`](Fingerprinter::start); the
/// steady-state path reuses them and does not allocate.
pub struct Fingerprinter {
    config: FingerprintConfig,
    processor: AudioProcessor,
    silence: Option<SilenceRemover>,
    fft: Fft,
    chroma: Chroma,
    chroma_filter: ChromaFilter,
    calculator: FingerprintCalculator,
    frame: Vec<i16>,
    energies: Vec<f64>,
    resampled: Vec<i16>,
    unsilenced: Vec<i16>,
    fingerprint: Vec<u32>,
    fresh: usize,
    started: bool,
}

impl Fingerprinter {
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_config(FingerprintConfig::for_algorithm(algorithm))
    }

    pub fn with_config(config: FingerprintConfig) -> Self {
        let fft = Fft::new(config.frame_size);
        let chroma = Chroma::new(
            config.min_freq,
            config.max_freq,
            config.frame_size,
            config.sample_rate,
            config.interpolate,
        );
        let chroma_filter = ChromaFilter::new(config.filter_coefficients);
        let calculator = FingerprintCalculator::new(config.classifiers);
        let num_bins = fft.num_bins();
        Self {
            processor: AudioProcessor::new(config.sample_rate),
            silence: None,
            fft,
            chroma,
            chroma_filter,
            calculator,
            frame: Vec::with_capacity(config.frame_size),
            energies: vec![0.0; num_bins],
            resampled: Vec::new(),
            unsilenced: Vec::new(),
            fingerprint: Vec::new(),
            fresh: 0,
            started: false,
            config,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Set a named option. Recognized: `silence_threshold` (0..=32767).
    pub fn set_option(&mut self, name: &str, value: i32) -> Result<(), FingerprintError> {
        match name {
            "silence_threshold" => {
                if !(0..=32767).contains(&value) {
                    return Err(FingerprintError::OptionOutOfRange {
                        name: "silence_threshold",
                        value,
                        min: 0,
                        max: 32767,
                    });
                }
                self.config.silence_threshold = value as u16;
                self.config.remove_silence = true;
                Ok(())
            }
            other => Err(FingerprintError::UnknownOption(other.to_string())),
        }
    }

    /// Prepare for a new stream, resetting all DSP state and the output.
    pub fn start(&mut self, sample_rate: u32, channels: u32) -> Result<(), FingerprintError> {
        self.processor.start(sample_rate, channels)?;
        self.silence = if self.config.remove_silence {
            Some(SilenceRemover::new(self.config.silence_threshold))
        } else {
            None
        };
        self.chroma_filter.reset();
        self.calculator.reset();
        self.frame.clear();
        self.fingerprint.clear();
        self.fresh = 0;
        self.started = true;
        Ok(())
    }

    /// Feed interleaved PCM at the rate and channel count given to `start`.
    pub fn consume(&mut self, samples: &[i16]) -> Result<(), FingerprintError> {
        if !self.started {
            return Err(FingerprintError::NotStarted);
        }
        let mut resampled = mem::take(&mut self.resampled);
        resampled.clear();
        self.processor.process(samples, &mut resampled);
        self.feed_clean(&resampled);
        self.resampled = resampled;
        Ok(())
    }

    /// Flush every stage; call once after the last `consume`.
    pub fn finish(&mut self) -> Result<(), FingerprintError> {
        if !self.started {
            return Err(FingerprintError::NotStarted);
        }
        let mut resampled = mem::take(&mut self.resampled);
        resampled.clear();
        self.processor.flush(&mut resampled);
        self.feed_clean(&resampled);
        self.resampled = resampled;

        // Zero-pad a trailing partial frame, but only if it carries
        // samples no emitted frame has seen.
        if self.fresh > 0 && !self.frame.is_empty() {
            self.frame.resize(self.config.frame_size, 0);
            self.process_frame();
            self.frame.clear();
            self.fresh = 0;
        }
        Ok(())
    }

    /// The items produced so far; complete once `finish` has run.
    pub fn fingerprint(&self) -> &[u32] {
        &self.fingerprint
    }

    pub fn take_fingerprint(&mut self) -> Fingerprint {
        Fingerprint::new(self.config.algorithm, mem::take(&mut self.fingerprint))
    }

    /// Drop the collected items without touching the DSP state. Reusing
    /// the context for a new stream still requires `start`.
    pub fn clear_fingerprint(&mut self) {
        self.fingerprint.clear();
    }

    fn feed_clean(&mut self, resampled: &[i16]) {
        if self.silence.is_some() {
            let mut unsilenced = mem::take(&mut self.unsilenced);
            unsilenced.clear();
            if let Some(remover) = self.silence.as_mut() {
                remover.process(resampled, &mut unsilenced);
            }
            self.feed_frames(&unsilenced);
            self.unsilenced = unsilenced;
        } else {
            self.feed_frames(resampled);
        }
    }

    fn feed_frames(&mut self, samples: &[i16]) {
        let mut remaining = samples;
        while !remaining.is_empty() {
            let need = self.config.frame_size - self.frame.len();
            let take = need.min(remaining.len());
            self.frame.extend_from_slice(&remaining[..take]);
            self.fresh += take;
            remaining = &remaining[take..];
            if self.frame.len() == self.config.frame_size {
                self.process_frame();
                self.frame.drain(..self.config.item_duration());
                self.fresh = 0;
            }
        }
    }

    fn process_frame(&mut self) {
        self.fft.compute(&self.frame, &mut self.energies);
        let features = self.chroma.consume(&self.energies);
        if let Some(mut row) = self.chroma_filter.consume(&features) {
            normalize_features(&mut row, NORM_FLOOR);
            if let Some(word) = self.calculator.consume(&row) {
                self.fingerprint.push(word);
            }
        }
    }
}
