/// Number of pitch classes in a chroma vector.
pub const NUM_BANDS: usize = 12;

/// Reference frequency for pitch-class assignment, four octaves below A4.
const BASE_FREQ: f64 = 440.0 / 16.0;

/// Norm floor below which a chroma vector is considered empty.
pub const NORM_FLOOR: f64 = 0.01;

/// Folds linear FFT bins into the 12 pitch classes.
///
/// The bin-to-class table is computed once from the frame geometry; per
/// frame, folding is a single pass over the in-range bins. With
/// `interpolate` set, a bin's energy is split linearly between its class
/// and the neighbor its fractional pitch leans toward.
pub struct Chroma {
    interpolate: bool,
    notes: Vec<u8>,
    notes_frac: Vec<f64>,
    min_index: usize,
    max_index: usize,
}

impl Chroma {
    pub fn new(
        min_freq: u32,
        max_freq: u32,
        frame_size: usize,
        sample_rate: u32,
        interpolate: bool,
    ) -> Self {
        let mut notes = vec![0u8; frame_size];
        let mut notes_frac = vec![0.0; frame_size];
        let min_index = freq_to_index(min_freq as f64, frame_size, sample_rate).max(1);
        let max_index =
            freq_to_index(max_freq as f64, frame_size, sample_rate).min(frame_size / 2);
        for i in min_index..max_index {
            let freq = index_to_freq(i, frame_size, sample_rate);
            let octave = (freq / BASE_FREQ).log2();
            let note = NUM_BANDS as f64 * (octave - octave.floor());
            notes[i] = note as u8;
            notes_frac[i] = note - notes[i] as f64;
        }
        Self {
            interpolate,
            notes,
            notes_frac,
            min_index,
            max_index,
        }
    }

    /// Fold one frame of per-bin energies into a chroma vector.
    pub fn consume(&self, energies: &[f64]) -> [f64; NUM_BANDS] {
        let mut features = [0.0; NUM_BANDS];
        for i in self.min_index..self.max_index {
            let energy = energies[i];
            let note = self.notes[i] as usize;
            if self.interpolate {
                let frac = self.notes_frac[i];
                let (other, weight) = if frac < 0.5 {
                    ((note + NUM_BANDS - 1) % NUM_BANDS, 0.5 + frac)
                } else if frac > 0.5 {
                    ((note + 1) % NUM_BANDS, 1.5 - frac)
                } else {
                    (note, 1.0)
                };
                features[note] += energy * weight;
                features[other] += energy * (1.0 - weight);
            } else {
                features[note] += energy;
            }
        }
        features
    }
}

/// Scale a chroma vector to unit Euclidean norm; vectors below the floor
/// are zeroed instead of amplified.
pub fn normalize_features(features: &mut [f64; NUM_BANDS], floor: f64) {
    let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm < floor {
        features.fill(0.0);
    } else {
        for value in features.iter_mut() {
            *value /= norm;
        }
    }
}

fn freq_to_index(freq: f64, frame_size: usize, sample_rate: u32) -> usize {
    (frame_size as f64 * freq / sample_rate as f64).round() as usize
}

fn index_to_freq(index: usize, frame_size: usize, sample_rate: u32) -> f64 {
    index as f64 * sample_rate as f64 / frame_size as f64
}
