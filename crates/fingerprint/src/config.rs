//! Algorithm parameter packs.
//!
//! Every tunable of the extraction pipeline is a pure function of the
//! algorithm id: frame geometry, chroma range, the trained classifier
//! tables, and the silence handling defaults. Adding an algorithm means
//! adding a table and a match arm here; nothing is configured at runtime
//! beyond picking the id and (optionally) a silence threshold.

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, Filter, FilterKind, Quantizer};
use crate::error::FingerprintError;

/// Internal sample rate every stream is brought to before analysis.
pub const SAMPLE_RATE: u32 = 11025;

/// Analysis frame length in samples.
pub const FRAME_SIZE: usize = 4096;

/// Default overlap between consecutive frames (hop of 1365 samples).
pub const FRAME_OVERLAP: usize = FRAME_SIZE - FRAME_SIZE / 3;

/// Lowest frequency folded into the chroma vector.
pub const MIN_FREQ: u32 = 28;

/// Highest frequency folded into the chroma vector.
pub const MAX_FREQ: u32 = 3520;

/// Temporal smoothing applied to the chroma stream.
pub const CHROMA_FILTER_COEFFICIENTS: &[f64] = &[0.25, 0.75, 1.0, 0.75, 0.25];

/// Fingerprint algorithm identifier.
///
/// Ids are stable wire values (0..=4) and each binds a complete
/// [`FingerprintConfig`]. `V1` is the legacy pack kept for decoding old
/// fingerprints; `V2` is the production default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    V1,
    V2,
    V3,
    V4,
    V5,
}

impl Algorithm {
    pub fn from_id(id: u8) -> Result<Self, FingerprintError> {
        match id {
            0 => Ok(Algorithm::V1),
            1 => Ok(Algorithm::V2),
            2 => Ok(Algorithm::V3),
            3 => Ok(Algorithm::V4),
            4 => Ok(Algorithm::V5),
            other => Err(FingerprintError::UnknownAlgorithm(other)),
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            Algorithm::V1 => 0,
            Algorithm::V2 => 1,
            Algorithm::V3 => 2,
            Algorithm::V4 => 3,
            Algorithm::V5 => 4,
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::V2
    }
}

/// Immutable parameter pack selected by [`Algorithm`].
#[derive(Clone)]
pub struct FingerprintConfig {
    pub algorithm: Algorithm,
    pub classifiers: &'static [Classifier],
    pub filter_coefficients: &'static [f64],
    pub interpolate: bool,
    pub remove_silence: bool,
    pub silence_threshold: u16,
    pub frame_size: usize,
    pub frame_overlap: usize,
    pub sample_rate: u32,
    pub min_freq: u32,
    pub max_freq: u32,
}

impl FingerprintConfig {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        let base = Self {
            algorithm,
            classifiers: CLASSIFIERS_V2,
            filter_coefficients: CHROMA_FILTER_COEFFICIENTS,
            interpolate: false,
            remove_silence: false,
            silence_threshold: 0,
            frame_size: FRAME_SIZE,
            frame_overlap: FRAME_OVERLAP,
            sample_rate: SAMPLE_RATE,
            min_freq: MIN_FREQ,
            max_freq: MAX_FREQ,
        };
        match algorithm {
            Algorithm::V1 => Self {
                classifiers: CLASSIFIERS_V1,
                ..base
            },
            Algorithm::V2 => base,
            Algorithm::V3 => Self {
                classifiers: CLASSIFIERS_V3,
                interpolate: true,
                ..base
            },
            Algorithm::V4 => Self {
                remove_silence: true,
                silence_threshold: 50,
                ..base
            },
            Algorithm::V5 => Self {
                frame_overlap: FRAME_SIZE - FRAME_SIZE / 2,
                ..base
            },
        }
    }

    /// Samples of fresh audio consumed per emitted item.
    pub fn item_duration(&self) -> usize {
        self.frame_size - self.frame_overlap
    }

    pub fn item_duration_in_seconds(&self) -> f64 {
        self.item_duration() as f64 / self.sample_rate as f64
    }

    /// Stream time covered by item index `items`.
    pub fn hash_time(&self, items: usize) -> f64 {
        items as f64 * self.item_duration_in_seconds()
    }

    /// Widest classifier footprint along the time axis.
    pub fn max_filter_width(&self) -> usize {
        self.classifiers
            .iter()
            .map(Classifier::width)
            .max()
            .expect("classifier table is never empty")
    }

    /// Samples of lead-in consumed before the first item appears.
    pub fn delay(&self) -> usize {
        ((self.filter_coefficients.len() - 1) + (self.max_filter_width() - 1))
            * self.item_duration()
            + self.frame_overlap
    }

    pub fn delay_in_seconds(&self) -> f64 {
        self.delay() as f64 / self.sample_rate as f64
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self::for_algorithm(Algorithm::default())
    }
}

// Trained on 10k pairs; kept for decoding legacy fingerprints.
static CLASSIFIERS_V1: &[Classifier] = &[
    Classifier::new(Filter::new(FilterKind::F0, 0, 3, 15), Quantizer(2.10543, 2.45354, 2.69414)),
    Classifier::new(Filter::new(FilterKind::F1, 0, 4, 14), Quantizer(-0.345922, 0.0463746, 0.446251)),
    Classifier::new(Filter::new(FilterKind::F1, 4, 4, 11), Quantizer(-0.392132, 0.0291077, 0.443391)),
    Classifier::new(Filter::new(FilterKind::F3, 0, 4, 14), Quantizer(-0.192851, 0.00583535, 0.204053)),
    Classifier::new(Filter::new(FilterKind::F2, 8, 2, 4), Quantizer(-0.0771619, -0.00991999, 0.0575406)),
    Classifier::new(Filter::new(FilterKind::F5, 6, 2, 15), Quantizer(-0.710437, -0.518954, -0.330402)),
    Classifier::new(Filter::new(FilterKind::F1, 9, 2, 16), Quantizer(-0.353724, -0.0189719, 0.289768)),
    Classifier::new(Filter::new(FilterKind::F3, 4, 2, 10), Quantizer(-0.128418, -0.0285697, 0.0591791)),
    Classifier::new(Filter::new(FilterKind::F3, 9, 2, 16), Quantizer(-0.139052, -0.0228468, 0.0879723)),
    Classifier::new(Filter::new(FilterKind::F2, 1, 3, 6), Quantizer(-0.133562, 0.00669205, 0.155012)),
    Classifier::new(Filter::new(FilterKind::F3, 3, 6, 2), Quantizer(-0.0267, 0.00804829, 0.0459773)),
    Classifier::new(Filter::new(FilterKind::F2, 8, 1, 10), Quantizer(-0.0972417, 0.0152227, 0.129003)),
    Classifier::new(Filter::new(FilterKind::F3, 4, 4, 14), Quantizer(-0.141434, 0.00374515, 0.149935)),
    Classifier::new(Filter::new(FilterKind::F5, 4, 2, 15), Quantizer(-0.64035, -0.466999, -0.285493)),
    Classifier::new(Filter::new(FilterKind::F5, 9, 2, 3), Quantizer(-0.322792, -0.254258, -0.174278)),
    Classifier::new(Filter::new(FilterKind::F2, 1, 8, 4), Quantizer(-0.0741375, -0.00590933, 0.0600357)),
];

// Trained on 60k pairs based on eMusic samples (mp3).
static CLASSIFIERS_V2: &[Classifier] = &[
    Classifier::new(Filter::new(FilterKind::F0, 4, 3, 15), Quantizer(1.98215, 2.35817, 2.63523)),
    Classifier::new(Filter::new(FilterKind::F4, 4, 6, 15), Quantizer(-1.03809, -0.651211, -0.282167)),
    Classifier::new(Filter::new(FilterKind::F1, 0, 4, 16), Quantizer(-0.298702, 0.119262, 0.558497)),
    Classifier::new(Filter::new(FilterKind::F3, 8, 2, 12), Quantizer(-0.105439, 0.0153946, 0.135898)),
    Classifier::new(Filter::new(FilterKind::F3, 4, 4, 8), Quantizer(-0.142891, 0.0258736, 0.200632)),
    Classifier::new(Filter::new(FilterKind::F4, 0, 3, 5), Quantizer(-0.826319, -0.590612, -0.368214)),
    Classifier::new(Filter::new(FilterKind::F1, 2, 2, 9), Quantizer(-0.557409, -0.233035, 0.0534525)),
    Classifier::new(Filter::new(FilterKind::F2, 7, 3, 4), Quantizer(-0.0646826, 0.00620476, 0.0784847)),
    Classifier::new(Filter::new(FilterKind::F2, 6, 2, 16), Quantizer(-0.192387, -0.029699, 0.215855)),
    Classifier::new(Filter::new(FilterKind::F2, 1, 3, 2), Quantizer(-0.0397818, -0.00568076, 0.0292026)),
    Classifier::new(Filter::new(FilterKind::F5, 10, 1, 15), Quantizer(-0.53823, -0.369934, -0.190235)),
    Classifier::new(Filter::new(FilterKind::F3, 6, 2, 10), Quantizer(-0.124877, 0.0296483, 0.139239)),
    Classifier::new(Filter::new(FilterKind::F2, 1, 1, 14), Quantizer(-0.101475, 0.0225617, 0.231971)),
    Classifier::new(Filter::new(FilterKind::F3, 5, 6, 4), Quantizer(-0.0799915, -0.00729616, 0.063262)),
    Classifier::new(Filter::new(FilterKind::F1, 9, 2, 12), Quantizer(-0.272556, 0.019424, 0.302559)),
    Classifier::new(Filter::new(FilterKind::F3, 4, 2, 14), Quantizer(-0.164292, -0.0321188, 0.0846339)),
];

// Retrained variant of the V2 pack with chroma interpolation enabled.
static CLASSIFIERS_V3: &[Classifier] = &[
    Classifier::new(Filter::new(FilterKind::F0, 1, 2, 15), Quantizer(1.95152, 2.36023, 2.61912)),
    Classifier::new(Filter::new(FilterKind::F4, 4, 6, 15), Quantizer(-1.25394, -0.939837, -0.527649)),
    Classifier::new(Filter::new(FilterKind::F1, 0, 4, 16), Quantizer(-0.14279, 0.278177, 0.739299)),
    Classifier::new(Filter::new(FilterKind::F3, 8, 2, 12), Quantizer(-0.153609, 0.0165633, 0.186579)),
    Classifier::new(Filter::new(FilterKind::F3, 4, 4, 8), Quantizer(-0.194023, 0.0354094, 0.2677)),
    Classifier::new(Filter::new(FilterKind::F4, 0, 3, 5), Quantizer(-1.01791, -0.668911, -0.346934)),
    Classifier::new(Filter::new(FilterKind::F1, 2, 2, 9), Quantizer(-0.630444, -0.267913, 0.0807388)),
    Classifier::new(Filter::new(FilterKind::F2, 7, 3, 4), Quantizer(-0.0816399, 0.00281007, 0.0876605)),
    Classifier::new(Filter::new(FilterKind::F2, 6, 2, 16), Quantizer(-0.235452, -0.0465606, 0.230439)),
    Classifier::new(Filter::new(FilterKind::F2, 1, 3, 2), Quantizer(-0.0595306, -0.00631046, 0.0427804)),
    Classifier::new(Filter::new(FilterKind::F5, 10, 1, 15), Quantizer(-0.692317, -0.432968, -0.195894)),
    Classifier::new(Filter::new(FilterKind::F3, 6, 2, 10), Quantizer(-0.180833, 0.00349955, 0.191883)),
    Classifier::new(Filter::new(FilterKind::F2, 1, 1, 14), Quantizer(-0.154479, 0.00246342, 0.30326)),
    Classifier::new(Filter::new(FilterKind::F3, 5, 6, 4), Quantizer(-0.0950028, -0.00861966, 0.0969559)),
    Classifier::new(Filter::new(FilterKind::F1, 9, 2, 12), Quantizer(-0.371349, -0.0566945, 0.269258)),
    Classifier::new(Filter::new(FilterKind::F3, 4, 2, 14), Quantizer(-0.196054, -0.0180561, 0.140277)),
];
