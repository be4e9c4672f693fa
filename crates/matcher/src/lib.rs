//! # AUFP Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the `fingerprint` crate and answers the
//! question "do these two recordings share audio, and where?". Given two
//! fingerprints of the same algorithm, it scans all alignment offsets by
//! Hamming distance, carves the good offsets into contiguous low-error
//! runs, and returns them as scored [`Segment`]s.
//!
//! ## Core Types
//!
//! - [`MatcherConfig`]: alignment tuning (minimum overlap, offset and
//!   segment bit-error ceilings, smoothing window).
//! - [`Segment`]: `(pos1, pos2, duration, score)` in item units, with a
//!   public 0..=100 score.
//! - [`Matcher`]: the engine.
//!
//! ## Example Usage
//!
//! ```
//! use fingerprint::{Algorithm, Fingerprint};
//! use matcher::Matcher;
//!
//! let items: Vec<u32> = (0..200u32).map(|i| i.wrapping_mul(2654435761)).collect();
//! let a = Fingerprint::new(Algorithm::V2, items.clone());
//! let b = Fingerprint::new(Algorithm::V2, items);
//!
//! let matcher = Matcher::with_defaults();
//! let segments = matcher.match_fingerprints(&a, &b).expect("compatible fingerprints");
//! assert_eq!(segments[0].public_score(), 100);
//! ```
//!
//! Positions and durations count items; use [`Matcher::hash_time`] to
//! convert to seconds for a given algorithm.

pub mod engine;
pub mod types;

pub use crate::engine::Matcher;
pub use crate::types::{MatchError, MatcherConfig, Segment, ITEM_BITS};
