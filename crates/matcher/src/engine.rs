use dsp::MovingAverage;
use fingerprint::{Algorithm, Fingerprint, FingerprintConfig};

use crate::types::{MatchError, MatcherConfig, Segment};


/// Aligns two fingerprints and extracts scored matching segments.
///
/// The search is exhaustive over alignment offsets: every offset with at
/// least `min_overlap` items of overlap gets a mean Hamming-distance
/// score, the promising ones are walked item by item with a smoothed
/// error, and contiguous low-error runs become [`Segment`]s. Direct
/// evaluation is quadratic in the fingerprint lengths, which is perfectly
/// adequate below ~10k items.
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: MatcherConfig::default(),
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Stream time, in seconds, covered by `items` items of `algorithm`.
    pub fn hash_time(algorithm: Algorithm, items: usize) -> f64 {
        FingerprintConfig::for_algorithm(algorithm).hash_time(items)
    }

    /// Find aligned matching segments between `a` and `b`.
    ///
    /// Returns the surviving segments best-first; an empty vector means
    /// the fingerprints do not match anywhere.
    pub fn match_fingerprints(
        &self,
        a: &Fingerprint,
        b: &Fingerprint,
    ) -> Result<Vec<Segment>, MatchError> {
        if a.algorithm != b.algorithm {
            return Err(MatchError::AlgorithmMismatch(
                a.algorithm.id(),
                b.algorithm.id(),
            ));
        }
        if a.is_empty() {
            return Err(MatchError::EmptyFingerprint(0));
        }
        if b.is_empty() {
            return Err(MatchError::EmptyFingerprint(1));
        }

        let mut segments = Vec::new();
        for (offset, _) in self.candidate_offsets(&a.items, &b.items) {
            self.carve_segments(&a.items, &b.items, offset, &mut segments);
        }
        Ok(dedupe_segments(segments))
    }

    /// Score every admissible alignment offset and keep the promising
    /// ones, longest overlap first.
    fn candidate_offsets(&self, a: &[u32], b: &[u32]) -> Vec<(isize, usize)> {
        let m = self.config.min_overlap as isize;
        let n_a = a.len() as isize;
        let n_b = b.len() as isize;
        let mut candidates = Vec::new();
        if n_a < m || n_b < m {
            return candidates;
        }
        for offset in (m - n_b)..=(n_a - m) {
            let start = offset.max(0);
            let end = n_a.min(n_b + offset);
            let len = (end - start) as usize;
            let mut total = 0u64;
            for i in start..end {
                let j = (i - offset) as usize;
                total += (a[i as usize] ^ b[j]).count_ones() as u64;
            }
            let mean = total as f64 / len as f64;
            if mean < self.config.max_offset_error {
                candidates.push((offset, len));
            }
        }
        candidates.sort_by(|x, y| {
            y.1.cmp(&x.1)
                .then_with(|| x.0.abs().cmp(&y.0.abs()))
                .then_with(|| x.0.cmp(&y.0))
        });
        candidates
    }

    /// Walk one aligned region and emit every run whose smoothed bit
    /// error stays under the segment threshold.
    fn carve_segments(&self, a: &[u32], b: &[u32], offset: isize, out: &mut Vec<Segment>) {
        let start = offset.max(0) as usize;
        let end = (a.len() as isize).min(b.len() as isize + offset) as usize;

        let mut smoother = MovingAverage::new(self.config.smoothing_window);
        let mut run_start: Option<usize> = None;
        let mut run_error = 0.0;
        let mut run_len = 0usize;

        let mut close_run = |run_start: &mut Option<usize>, run_error: &mut f64, run_len: &mut usize| {
            if let Some(first) = run_start.take() {
                out.push(Segment::new(
                    first,
                    (first as isize - offset) as usize,
                    *run_len,
                    *run_error / *run_len as f64,
                ));
                *run_error = 0.0;
                *run_len = 0;
            }
        };

        for i in start..end {
            let j = (i as isize - offset) as usize;
            let error = (a[i] ^ b[j]).count_ones() as f64;
            smoother.push(error);
            if smoother.average() < self.config.segment_threshold {
                if run_start.is_none() {
                    run_start = Some(i);
                }
                run_error += error;
                run_len += 1;
            } else {
                close_run(&mut run_start, &mut run_error, &mut run_len);
            }
        }
        close_run(&mut run_start, &mut run_error, &mut run_len);
    }
}

/// Keep the best-scoring segments, suppressing any later one that
/// overlaps a kept segment on either fingerprint's axis.
fn dedupe_segments(mut segments: Vec<Segment>) -> Vec<Segment> {
    segments.sort_by(|x, y| {
        x.score
            .partial_cmp(&y.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| y.duration.cmp(&x.duration))
            .then_with(|| x.pos1.cmp(&y.pos1))
    });
    let mut kept: Vec<Segment> = Vec::new();
    for segment in segments {
        if !kept.iter().any(|k| overlaps(k, &segment)) {
            kept.push(segment);
        }
    }
    kept
}

fn overlaps(x: &Segment, y: &Segment) -> bool {
    ranges_intersect(x.pos1, x.end1(), y.pos1, y.end1())
        || ranges_intersect(x.pos2, x.end2(), y.pos2, y.end2())
}

fn ranges_intersect(start_a: usize, end_a: usize, start_b: usize, end_b: usize) -> bool {
    start_a < end_b && start_b < end_a
}
