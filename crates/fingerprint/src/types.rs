use serde::{Deserialize, Serialize};

use crate::config::Algorithm;

/// A finished acoustic fingerprint: the algorithm that produced it plus
/// the ordered 32-bit sub-fingerprints, one per feature frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub algorithm: Algorithm,
    pub items: Vec<u32>,
}

impl Fingerprint {
    pub fn new(algorithm: Algorithm, items: Vec<u32>) -> Self {
        Self { algorithm, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
