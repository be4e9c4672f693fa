use thiserror::Error;

use crate::resampler::Resampler;

/// Highest input sample rate the front-end accepts.
pub const MAX_SAMPLE_RATE: u32 = 96000;

/// Errors produced by the audio front-end.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DspError {
    #[error("unsupported sample rate {rate}; supported range is {min}..={max} Hz")]
    UnsupportedSampleRate { rate: u32, min: u32, max: u32 },
    #[error("audio must have at least one channel")]
    NoChannels,
}

/// Audio front-end: interleaved multi-channel i16 in, mono i16 at the
/// target rate out.
///
/// Channels are mixed down by arithmetic mean, then the mono stream is
/// resampled to `target_rate`. A partial interleaved frame at the end of a
/// chunk is carried over to the next call, so arbitrary chunk sizes are
/// fine.
pub struct AudioProcessor {
    target_rate: u32,
    channels: u32,
    resampler: Resampler,
    carry: Vec<i16>,
    mono: Vec<i16>,
}

impl AudioProcessor {
    pub fn new(target_rate: u32) -> Self {
        Self {
            target_rate,
            channels: 1,
            resampler: Resampler::new(target_rate, target_rate),
            carry: Vec::new(),
            mono: Vec::new(),
        }
    }

    /// Configure the front-end for a new stream. Rejects rates the
    /// resampler cannot sensibly bring to the target rate.
    pub fn start(&mut self, sample_rate: u32, channels: u32) -> Result<(), DspError> {
        let min = self.target_rate.div_ceil(2);
        if sample_rate < min || sample_rate > MAX_SAMPLE_RATE {
            return Err(DspError::UnsupportedSampleRate {
                rate: sample_rate,
                min,
                max: MAX_SAMPLE_RATE,
            });
        }
        if channels == 0 {
            return Err(DspError::NoChannels);
        }
        self.channels = channels;
        self.resampler = Resampler::new(sample_rate, self.target_rate);
        self.carry.clear();
        self.mono.clear();
        Ok(())
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Mix down and resample `input`, appending ready samples to `output`.
    pub fn process(&mut self, input: &[i16], output: &mut Vec<i16>) {
        let channels = self.channels as usize;
        self.mono.clear();

        if channels == 1 {
            if !self.resampler.is_passthrough() {
                self.resampler.resample(input, output);
                return;
            }
            output.extend_from_slice(input);
            return;
        }

        // Stitch the carried partial frame with the new chunk.
        let mut samples = input;
        if !self.carry.is_empty() {
            let need = channels - self.carry.len();
            let take = need.min(samples.len());
            self.carry.extend_from_slice(&samples[..take]);
            samples = &samples[take..];
            if self.carry.len() == channels {
                self.mono.push(mix_frame(&self.carry));
                self.carry.clear();
            }
        }

        let mut frames = samples.chunks_exact(channels);
        for frame in &mut frames {
            self.mono.push(mix_frame(frame));
        }
        self.carry.extend_from_slice(frames.remainder());

        self.resampler.resample(&self.mono, output);
    }

    /// Drain the resampler tail; call once at end of stream.
    pub fn flush(&mut self, output: &mut Vec<i16>) {
        // An incomplete trailing frame is dropped rather than guessed at.
        self.carry.clear();
        self.resampler.flush(output);
    }
}

fn mix_frame(frame: &[i16]) -> i16 {
    let sum: i64 = frame.iter().map(|&s| s as i64).sum();
    (sum / frame.len() as i64) as i16
}
