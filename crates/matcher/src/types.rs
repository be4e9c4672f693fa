use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bits per sub-fingerprint; scores are expressed as bit-error out of 32.
pub const ITEM_BITS: f64 = 32.0;

/// Tuning knobs for fingerprint alignment.
///
/// `MatcherConfig` is cheap to clone and serde-friendly so it can be
/// embedded in service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherConfig {
    /// Minimum overlap, in items, for an alignment offset to be
    /// considered at all.
    #[serde(default = "MatcherConfig::default_min_overlap")]
    pub min_overlap: usize,
    /// Mean bit-error ceiling for an offset to become a candidate.
    #[serde(default = "MatcherConfig::default_max_offset_error")]
    pub max_offset_error: f64,
    /// Smoothed bit-error ceiling while carving segments out of a
    /// candidate offset.
    #[serde(default = "MatcherConfig::default_segment_threshold")]
    pub segment_threshold: f64,
    /// Length of the moving average applied to the per-item bit error.
    #[serde(default = "MatcherConfig::default_smoothing_window")]
    pub smoothing_window: usize,
}

impl MatcherConfig {
    pub(crate) fn default_min_overlap() -> usize {
        80
    }

    pub(crate) fn default_max_offset_error() -> f64 {
        0.45 * ITEM_BITS
    }

    pub(crate) fn default_segment_threshold() -> f64 {
        0.25 * ITEM_BITS
    }

    pub(crate) fn default_smoothing_window() -> usize {
        8
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.min_overlap == 0 {
            return Err(MatchError::InvalidConfig(
                "min_overlap must be greater than zero".into(),
            ));
        }
        if !(self.max_offset_error > 0.0 && self.max_offset_error <= ITEM_BITS) {
            return Err(MatchError::InvalidConfig(
                "max_offset_error must be in (0, 32]".into(),
            ));
        }
        if !(self.segment_threshold > 0.0 && self.segment_threshold <= ITEM_BITS) {
            return Err(MatchError::InvalidConfig(
                "segment_threshold must be in (0, 32]".into(),
            ));
        }
        if self.smoothing_window == 0 {
            return Err(MatchError::InvalidConfig(
                "smoothing_window must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_overlap: Self::default_min_overlap(),
            max_offset_error: Self::default_max_offset_error(),
            segment_threshold: Self::default_segment_threshold(),
            smoothing_window: Self::default_smoothing_window(),
        }
    }
}

/// A contiguous aligned region of two fingerprints.
///
/// `pos1`/`pos2` are item indices into the first and second fingerprint,
/// `duration` counts items, and `score` is the mean per-item bit error
/// over the region (lower is better).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub pos1: usize,
    pub pos2: usize,
    pub duration: usize,
    pub score: f64,
}

impl Segment {
    pub fn new(pos1: usize, pos2: usize, duration: usize, score: f64) -> Self {
        Self {
            pos1,
            pos2,
            duration,
            score,
        }
    }

    /// Public 0..=100 score: 100 is identical, lower is worse.
    pub fn public_score(&self) -> u32 {
        let score = (100.0 * (1.0 - self.score / ITEM_BITS)).round();
        score.clamp(0.0, 100.0) as u32
    }

    /// End index (exclusive) on the first fingerprint's axis.
    pub fn end1(&self) -> usize {
        self.pos1 + self.duration
    }

    /// End index (exclusive) on the second fingerprint's axis.
    pub fn end2(&self) -> usize {
        self.pos2 + self.duration
    }

    /// Mirror of this segment with the fingerprint roles swapped.
    pub fn swapped(&self) -> Self {
        Self {
            pos1: self.pos2,
            pos2: self.pos1,
            duration: self.duration,
            score: self.score,
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("fingerprints use different algorithms ({0} vs {1})")]
    AlgorithmMismatch(u8, u8),
    #[error("fingerprint {0} is empty")]
    EmptyFingerprint(usize),
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_overlap, 80);
        assert!((config.max_offset_error - 14.4).abs() < 1e-12);
        assert_eq!(config.smoothing_window, 8);
    }

    #[test]
    fn zero_min_overlap_rejected() {
        let config = MatcherConfig {
            min_overlap: 0,
            ..Default::default()
        };
        let err = config.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("min_overlap")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_thresholds_rejected() {
        let config = MatcherConfig {
            max_offset_error: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = MatcherConfig {
            segment_threshold: 40.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = MatcherConfig {
            min_overlap: 120,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: MatcherConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn config_serde_fills_defaults() {
        let config: MatcherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MatcherConfig::default());
    }

    #[test]
    fn public_score_mapping() {
        assert_eq!(Segment::new(0, 0, 10, 0.0).public_score(), 100);
        assert_eq!(Segment::new(0, 0, 10, 32.0).public_score(), 0);
        assert_eq!(Segment::new(0, 0, 10, 16.0).public_score(), 50);
        assert_eq!(Segment::new(0, 0, 10, 2.0).public_score(), 94);
    }

    #[test]
    fn swapped_exchanges_positions() {
        let segment = Segment::new(5, 9, 40, 1.5);
        let mirrored = segment.swapped();
        assert_eq!(mirrored.pos1, 9);
        assert_eq!(mirrored.pos2, 5);
        assert_eq!(mirrored.duration, 40);
        assert_eq!(mirrored.score, 1.5);
    }
}
