//! Workspace umbrella crate for Audio Universal Fingerprinting (AUFP).
//!
//! The `aufp` crate re-exports the dsp, fingerprint, codec, and matcher
//! layers so applications can drive the full pipeline through a single
//! dependency. Helpers such as [`fingerprint_audio`],
//! [`encode_fingerprint`], [`decode_fingerprint`], and
//! [`match_fingerprints`] orchestrate the stages end-to-end, while the
//! [`FingerprintContext`] and [`MatcherContext`] value types expose the
//! classic stateful lifecycle (`new → set_option → start → feed → finish`)
//! for callers that stream audio incrementally.
//!
//! ## Quick start
//!
//! ```no_run
//! use aufp::{fingerprint_audio, encode_fingerprint, Algorithm};
//!
//! # fn demo(pcm: &[i16]) -> Result<(), aufp::PipelineError> {
//! let fp = fingerprint_audio(pcm, 44100, 2, Algorithm::V2, Some(100))?;
//! let encoded = encode_fingerprint(&fp)?;
//! println!("{} items -> {} chars", fp.len(), encoded.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability
//!
//! Metrics and structured logs can be captured by installing a
//! [`PipelineMetrics`] recorder via [`set_pipeline_metrics`] and/or a
//! [`PipelineEventLogger`] with [`set_pipeline_logger`]. Both hooks
//! receive the stage, the outcome, and the latency of every helper call,
//! so deployments can correlate fingerprinting work with upstream
//! systems. `PipelineMetrics` is best suited for latency histograms;
//! `PipelineEventLogger` provides structured events for centralized
//! logging ([`KeyValueLogger`] writes `key="value"` lines to any writer).
//!
//! These hooks observe the pipeline helpers in this crate; code that
//! drives the member crates directly is not instrumented.
//!
//! ## Errors
//!
//! Failures produced by any layer converge on [`PipelineError`], which
//! preserves the source error so callers can distinguish configuration
//! mistakes, codec corruption, and matcher misuse without depending on
//! the individual workspace crates.

pub use codec::{compress, decode_base64, decompress, encode_base64, simhash, CodecError};
pub use dsp::DspError;
pub use fingerprint::{
    Algorithm, Fingerprint, FingerprintConfig, FingerprintError, Fingerprinter,
};
pub use matcher::{MatchError, Matcher, MatcherConfig, Segment};

pub mod config;
mod context;

pub use crate::context::{ContextError, FingerprintContext, MatcherContext};

use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that can occur while running the pipeline helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Fingerprint(FingerprintError),
    Codec(CodecError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Fingerprint(err) => write!(f, "fingerprinting failed: {err}"),
            PipelineError::Codec(err) => write!(f, "fingerprint codec failed: {err}"),
            PipelineError::Match(err) => write!(f, "matching failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Fingerprint(err) => Some(err),
            PipelineError::Codec(err) => Some(err),
            PipelineError::Match(err) => Some(err),
        }
    }
}

impl From<FingerprintError> for PipelineError {
    fn from(value: FingerprintError) -> Self {
        PipelineError::Fingerprint(value)
    }
}

impl From<CodecError> for PipelineError {
    fn from(value: CodecError) -> Self {
        PipelineError::Codec(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_fingerprint(&self, latency: Duration, result: Result<(), FingerprintError>);
    fn record_encode(&self, latency: Duration, result: Result<(), CodecError>);
    fn record_decode(&self, latency: Duration, result: Result<(), CodecError>);
    fn record_match(&self, latency: Duration, result: Result<(), MatchError>);
}

/// Processing stage captured in observability events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Fingerprint,
    Encode,
    Decode,
    Match,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Fingerprint => "fingerprint",
            PipelineStage::Encode => "encode",
            PipelineStage::Decode => "decode",
            PipelineStage::Match => "match",
        };
        f.write_str(name)
    }
}

/// Outcome of a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEventStatus {
    Success,
    Failure,
}

impl fmt::Display for PipelineEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineEventStatus::Success => "success",
            PipelineEventStatus::Failure => "failure",
        };
        f.write_str(label)
    }
}

/// Structured observation describing the outcome of a pipeline stage.
#[derive(Debug, Clone)]
pub struct PipelineEvent {
    pub stage: PipelineStage,
    pub status: PipelineEventStatus,
    pub latency: Duration,
    pub algorithm: Option<u8>,
    pub items: Option<usize>,
    pub error: Option<String>,
}

impl PipelineEvent {
    fn from_outcome(
        stage: PipelineStage,
        context: &StageContext,
        latency: Duration,
        error: Option<String>,
    ) -> Self {
        let status = if error.is_some() {
            PipelineEventStatus::Failure
        } else {
            PipelineEventStatus::Success
        };
        Self {
            stage,
            status,
            latency,
            algorithm: context.algorithm,
            items: context.items,
            error,
        }
    }

    fn format_key_values(&self, include_timestamp: bool) -> String {
        let mut parts = Vec::new();
        if include_timestamp {
            let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            parts.push(format!("timestamp=\"{ts}\""));
        }
        let stage = self.stage;
        parts.push(format!("stage={stage}"));
        let status = self.status;
        parts.push(format!("status={status}"));
        let latency_us = self.latency.as_micros();
        parts.push(format!("latency_us={latency_us}"));
        if let Some(algorithm) = self.algorithm {
            parts.push(format!("algorithm={algorithm}"));
        }
        if let Some(items) = self.items {
            parts.push(format!("items={items}"));
        }
        if let Some(error) = &self.error {
            let error = escape_kv(error);
            parts.push(format!("error=\"{error}\""));
        }
        parts.join(" ")
    }
}

fn escape_kv(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Hook for emitting structured events per pipeline stage.
pub trait PipelineEventLogger: Send + Sync {
    fn log(&self, event: &PipelineEvent);
}

/// Simple key-value logger that writes structured events to any writer.
pub struct KeyValueLogger {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    include_timestamp: bool,
}

impl KeyValueLogger {
    /// Create a logger that writes to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Create a logger backed by the provided writer.
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            include_timestamp: true,
        }
    }

    /// Toggle timestamp emission for the structured log line.
    pub fn with_timestamps(mut self, include_timestamp: bool) -> Self {
        self.include_timestamp = include_timestamp;
        self
    }
}

impl PipelineEventLogger for KeyValueLogger {
    fn log(&self, event: &PipelineEvent) {
        if let Ok(mut writer) = self.writer.lock() {
            let line = event.format_key_values(self.include_timestamp);
            let _ = writeln!(writer, "{line}");
        }
    }
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("pipeline metrics lock poisoned");
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the structured pipeline event logger.
pub fn set_pipeline_logger(logger: Option<Arc<dyn PipelineEventLogger>>) {
    let lock = logger_lock();
    let mut guard = lock.write().expect("pipeline logger lock poisoned");
    *guard = logger;
}

fn logger_lock() -> &'static RwLock<Option<Arc<dyn PipelineEventLogger>>> {
    static LOGGER: OnceLock<RwLock<Option<Arc<dyn PipelineEventLogger>>>> = OnceLock::new();
    LOGGER.get_or_init(|| RwLock::new(None))
}

fn pipeline_logger() -> Option<Arc<dyn PipelineEventLogger>> {
    let guard = logger_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

#[derive(Debug, Clone, Default)]
struct StageContext {
    algorithm: Option<u8>,
    items: Option<usize>,
}

impl StageContext {
    fn new(algorithm: Option<u8>, items: Option<usize>) -> Self {
        Self { algorithm, items }
    }
}

struct MetricsSpan {
    recorder: Option<Arc<dyn PipelineMetrics>>,
    logger: Option<Arc<dyn PipelineEventLogger>>,
    stage: PipelineStage,
    context: StageContext,
    start: Instant,
}

impl MetricsSpan {
    fn start(stage: PipelineStage, context: StageContext) -> Option<Self> {
        let recorder = metrics_recorder();
        let logger = pipeline_logger();
        if recorder.is_none() && logger.is_none() {
            return None;
        }
        Some(Self {
            recorder,
            logger,
            stage,
            context,
            start: Instant::now(),
        })
    }

    fn update_context<F>(&mut self, update: F)
    where
        F: FnOnce(&mut StageContext),
    {
        update(&mut self.context);
    }

    fn record_fingerprint(self, result: Result<(), FingerprintError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_fingerprint(latency, result);
        }
    }

    fn record_encode(self, result: Result<(), CodecError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_encode(latency, result);
        }
    }

    fn record_decode(self, result: Result<(), CodecError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_decode(latency, result);
        }
    }

    fn record_match(self, result: Result<(), MatchError>) {
        let latency = self.start.elapsed();
        self.emit_event(latency, result.as_ref().err().map(|e| e.to_string()));
        if let Some(recorder) = self.recorder {
            recorder.record_match(latency, result);
        }
    }

    fn emit_event(&self, latency: Duration, error: Option<String>) {
        if let Some(logger) = self.logger.as_ref() {
            let event = PipelineEvent::from_outcome(self.stage, &self.context, latency, error);
            logger.log(&event);
        }
    }
}

/// Fingerprint a complete PCM buffer in one call.
///
/// `samples` is interleaved i16 PCM; `silence_threshold` enables leading
/// silence removal when set. Streaming callers should use
/// [`FingerprintContext`] instead.
pub fn fingerprint_audio(
    samples: &[i16],
    sample_rate: u32,
    channels: u32,
    algorithm: Algorithm,
    silence_threshold: Option<u16>,
) -> Result<Fingerprint, PipelineError> {
    let mut span = MetricsSpan::start(
        PipelineStage::Fingerprint,
        StageContext::new(Some(algorithm.id()), None),
    );
    let result: Result<Fingerprint, FingerprintError> = (|| {
        let mut printer = Fingerprinter::new(algorithm);
        if let Some(threshold) = silence_threshold {
            printer.set_option("silence_threshold", threshold as i32)?;
        }
        printer.start(sample_rate, channels)?;
        printer.consume(samples)?;
        printer.finish()?;
        Ok(printer.take_fingerprint())
    })();
    match &result {
        Ok(fp) => {
            let items = fp.len();
            if let Some(span) = span.as_mut() {
                span.update_context(|ctx| ctx.items = Some(items));
            }
            if let Some(span) = span.take() {
                span.record_fingerprint(Ok(()));
            }
        }
        Err(err) => {
            if let Some(span) = span.take() {
                span.record_fingerprint(Err(err.clone()));
            }
        }
    }
    result.map_err(PipelineError::Fingerprint)
}

/// Compress a fingerprint into the binary wire format.
pub fn compress_fingerprint(fp: &Fingerprint) -> Result<Vec<u8>, PipelineError> {
    let span = MetricsSpan::start(
        PipelineStage::Encode,
        StageContext::new(Some(fp.algorithm.id()), Some(fp.len())),
    );
    let result = compress(&fp.items, fp.algorithm.id());
    if let Some(span) = span {
        span.record_encode(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    }
    result.map_err(PipelineError::Codec)
}

/// Compress a fingerprint and wrap it in base64 for text transport.
pub fn encode_fingerprint(fp: &Fingerprint) -> Result<String, PipelineError> {
    Ok(encode_base64(&compress_fingerprint(fp)?))
}

/// Decode a binary compressed fingerprint.
pub fn decompress_fingerprint(data: &[u8]) -> Result<Fingerprint, PipelineError> {
    let span = MetricsSpan::start(PipelineStage::Decode, StageContext::default());
    let result = decompress(data);
    if let Some(span) = span {
        span.record_decode(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    }
    let (items, algorithm_id) = result.map_err(PipelineError::Codec)?;
    let algorithm = Algorithm::from_id(algorithm_id).map_err(PipelineError::Fingerprint)?;
    Ok(Fingerprint::new(algorithm, items))
}

/// Decode a base64-wrapped compressed fingerprint.
pub fn decode_fingerprint(encoded: &str) -> Result<Fingerprint, PipelineError> {
    let bytes = decode_base64(encoded).map_err(PipelineError::Codec)?;
    decompress_fingerprint(&bytes)
}

/// SimHash of a fingerprint for coarse bucketing.
pub fn hash_fingerprint(fp: &Fingerprint) -> u32 {
    simhash(&fp.items)
}

/// Align two fingerprints and return their matching segments best-first.
pub fn match_fingerprints(
    a: &Fingerprint,
    b: &Fingerprint,
    config: &MatcherConfig,
) -> Result<Vec<Segment>, PipelineError> {
    let span = MetricsSpan::start(
        PipelineStage::Match,
        StageContext::new(Some(a.algorithm.id()), Some(a.len().max(b.len()))),
    );
    let result = Matcher::new(config.clone())
        .and_then(|matcher| matcher.match_fingerprints(a, b));
    if let Some(span) = span {
        span.record_match(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    }
    result.map_err(PipelineError::Match)
}
