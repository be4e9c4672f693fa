//! Stateful context façade.
//!
//! These value types mirror the classic C-style lifecycle of the library:
//! an opaque handle, explicit `start`/`feed`/`finish` calls, and accessors
//! that only become valid once the stream is finished. All buffers are
//! owned by the context; dropping it releases everything.

use thiserror::Error;

use codec::{decode_base64, CodecError};
use fingerprint::{Algorithm, Fingerprint, FingerprintError, Fingerprinter};
use matcher::{MatchError, Matcher, MatcherConfig, Segment};

use crate::{compress_fingerprint, hash_fingerprint, PipelineError};

/// Errors surfaced by the context façade.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContextError {
    #[error("operation invoked out of lifecycle order: {0}")]
    InvalidState(&'static str),
    #[error("fingerprint slot index must be 0 or 1 (got {0})")]
    InvalidSlot(usize),
    #[error("segment index {index} out of range ({count} segments)")]
    InvalidSegment { index: usize, count: usize },
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Match(#[from] MatchError),
}

impl From<PipelineError> for ContextError {
    fn from(value: PipelineError) -> Self {
        match value {
            PipelineError::Fingerprint(err) => ContextError::Fingerprint(err),
            PipelineError::Codec(err) => ContextError::Codec(err),
            PipelineError::Match(err) => ContextError::Match(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Created,
    Started,
    Finished,
}

/// Streaming fingerprinting context.
///
/// Lifecycle: `new → [set_option]* → start → feed* → finish →
/// {fingerprint, raw_fingerprint, fingerprint_hash} → clear_fingerprint →
/// (start again)`.
pub struct FingerprintContext {
    printer: Fingerprinter,
    state: StreamState,
}

impl FingerprintContext {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            printer: Fingerprinter::new(algorithm),
            state: StreamState::Created,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.printer.algorithm()
    }

    /// The mono channel count the pipeline works in.
    pub fn num_channels(&self) -> u32 {
        1
    }

    /// Internal sample rate of the analysis pipeline.
    pub fn sample_rate(&self) -> u32 {
        self.printer.config().sample_rate
    }

    /// Samples of fresh audio per fingerprint item.
    pub fn item_duration(&self) -> usize {
        self.printer.config().item_duration()
    }

    pub fn item_duration_ms(&self) -> u32 {
        (self.printer.config().item_duration_in_seconds() * 1000.0).round() as u32
    }

    /// Lead-in samples consumed before the first item appears.
    pub fn delay(&self) -> usize {
        self.printer.config().delay()
    }

    pub fn delay_ms(&self) -> u32 {
        (self.printer.config().delay_in_seconds() * 1000.0).round() as u32
    }

    /// Set a named option; must be called before `start`.
    pub fn set_option(&mut self, name: &str, value: i32) -> Result<(), ContextError> {
        if self.state == StreamState::Started {
            return Err(ContextError::InvalidState(
                "set_option is not allowed while a stream is in progress",
            ));
        }
        Ok(self.printer.set_option(name, value)?)
    }

    pub fn start(&mut self, sample_rate: u32, channels: u32) -> Result<(), ContextError> {
        self.printer.start(sample_rate, channels)?;
        self.state = StreamState::Started;
        Ok(())
    }

    pub fn feed(&mut self, samples: &[i16]) -> Result<(), ContextError> {
        if self.state != StreamState::Started {
            return Err(ContextError::InvalidState("feed requires start"));
        }
        Ok(self.printer.consume(samples)?)
    }

    pub fn finish(&mut self) -> Result<(), ContextError> {
        if self.state != StreamState::Started {
            return Err(ContextError::InvalidState("finish requires start"));
        }
        self.printer.finish()?;
        self.state = StreamState::Finished;
        Ok(())
    }

    /// Compressed, base64-encoded fingerprint of the finished stream.
    pub fn fingerprint(&self) -> Result<String, ContextError> {
        let fp = self.finished_fingerprint()?;
        let blob = compress_fingerprint(&fp)?;
        Ok(codec::encode_base64(&blob))
    }

    /// Raw 32-bit items of the finished stream. The returned buffer is
    /// owned by the caller.
    pub fn raw_fingerprint(&self) -> Result<Vec<u32>, ContextError> {
        Ok(self.finished_fingerprint()?.items)
    }

    pub fn raw_fingerprint_size(&self) -> Result<usize, ContextError> {
        self.ensure_finished()?;
        Ok(self.printer.fingerprint().len())
    }

    /// SimHash of the finished stream.
    pub fn fingerprint_hash(&self) -> Result<u32, ContextError> {
        Ok(hash_fingerprint(&self.finished_fingerprint()?))
    }

    /// Drop the collected items; DSP state is untouched, so reusing the
    /// context for another stream still requires `start`.
    pub fn clear_fingerprint(&mut self) {
        self.printer.clear_fingerprint();
    }

    fn ensure_finished(&self) -> Result<(), ContextError> {
        if self.state != StreamState::Finished {
            return Err(ContextError::InvalidState(
                "fingerprint access requires finish",
            ));
        }
        Ok(())
    }

    fn finished_fingerprint(&self) -> Result<Fingerprint, ContextError> {
        self.ensure_finished()?;
        Ok(Fingerprint::new(
            self.printer.algorithm(),
            self.printer.fingerprint().to_vec(),
        ))
    }
}

/// Two-fingerprint matching context.
///
/// Lifecycle: `new → set_fingerprint(0, ..) → set_fingerprint(1, ..) →
/// run → {num_segments, segment, segment_ms}`. Both fingerprints must
/// carry the same algorithm id.
pub struct MatcherContext {
    config: MatcherConfig,
    slots: [Option<Fingerprint>; 2],
    segments: Option<Vec<Segment>>,
}

impl MatcherContext {
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            config,
            slots: [None, None],
            segments: None,
        }
    }

    /// Load slot `index` from a base64-encoded compressed fingerprint.
    pub fn set_fingerprint(&mut self, index: usize, encoded: &str) -> Result<(), ContextError> {
        let bytes = decode_base64(encoded)?;
        self.set_compressed_fingerprint(index, &bytes)
    }

    /// Load slot `index` from a binary compressed fingerprint.
    pub fn set_compressed_fingerprint(
        &mut self,
        index: usize,
        data: &[u8],
    ) -> Result<(), ContextError> {
        let fp = crate::decompress_fingerprint(data)?;
        self.set_raw_fingerprint(index, fp)
    }

    /// Load slot `index` from raw items.
    pub fn set_raw_fingerprint(
        &mut self,
        index: usize,
        fp: Fingerprint,
    ) -> Result<(), ContextError> {
        if index > 1 {
            return Err(ContextError::InvalidSlot(index));
        }
        if let Some(other) = self.slots[1 - index].as_ref() {
            if other.algorithm != fp.algorithm {
                return Err(ContextError::Match(MatchError::AlgorithmMismatch(
                    fp.algorithm.id(),
                    other.algorithm.id(),
                )));
            }
        }
        self.slots[index] = Some(fp);
        self.segments = None;
        Ok(())
    }

    /// Run the matcher. Returns `true` when at least one segment was
    /// found.
    pub fn run(&mut self) -> Result<bool, ContextError> {
        let a = self.slots[0]
            .as_ref()
            .ok_or(ContextError::InvalidState("fingerprint 0 is not set"))?;
        let b = self.slots[1]
            .as_ref()
            .ok_or(ContextError::InvalidState("fingerprint 1 is not set"))?;
        let matcher = Matcher::new(self.config.clone())?;
        let segments = matcher.match_fingerprints(a, b)?;
        let found = !segments.is_empty();
        self.segments = Some(segments);
        Ok(found)
    }

    pub fn num_segments(&self) -> Result<usize, ContextError> {
        Ok(self.segments()?.len())
    }

    pub fn segment(&self, index: usize) -> Result<Segment, ContextError> {
        let segments = self.segments()?;
        segments
            .get(index)
            .copied()
            .ok_or(ContextError::InvalidSegment {
                index,
                count: segments.len(),
            })
    }

    /// Segment positions and duration converted to milliseconds.
    pub fn segment_ms(&self, index: usize) -> Result<(u32, u32, u32), ContextError> {
        let segment = self.segment(index)?;
        let algorithm = self.slots[0]
            .as_ref()
            .expect("segments imply both fingerprints are set")
            .algorithm;
        let to_ms = |items: usize| (1000.0 * Matcher::hash_time(algorithm, items)).round() as u32;
        Ok((
            to_ms(segment.pos1),
            to_ms(segment.pos2),
            to_ms(segment.duration),
        ))
    }

    pub fn segment_score(&self, index: usize) -> Result<u32, ContextError> {
        Ok(self.segment(index)?.public_score())
    }

    fn segments(&self) -> Result<&Vec<Segment>, ContextError> {
        self.segments
            .as_ref()
            .ok_or(ContextError::InvalidState("segment access requires run"))
    }
}

impl Default for MatcherContext {
    fn default() -> Self {
        Self::new()
    }
}
