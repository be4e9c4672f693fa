//! AUFP Fingerprint Codec
//!
//! Wire format and hashing for fingerprints. Two concerns live here:
//!
//! - **Compression** - a bit-packed differential encoding of the 32-bit
//!   item stream, framed with a 1-byte algorithm id and a 24-bit
//!   big-endian item count. [`compress`] and [`decompress`] are exact
//!   inverses for every `(items, algorithm)` pair.
//! - **SimHash** - a 32-bit sign-of-sum summary of a fingerprint for
//!   coarse bucketing.
//!
//! The base64 transport wrapper ([`encode_base64`]/[`decode_base64`])
//! uses the URL-safe alphabet without padding and applies to the whole
//! compressed blob.
//!
//! ```
//! use codec::{compress, decompress};
//!
//! let items = vec![0x1234_5678u32, 0x1234_567A, 0x1234_567B];
//! let blob = compress(&items, 1).unwrap();
//! let (decoded, algorithm) = decompress(&blob).unwrap();
//! assert_eq!(decoded, items);
//! assert_eq!(algorithm, 1);
//! ```

mod bits;
mod compress;
mod decompress;
mod error;
mod simhash;
mod transport;

pub use crate::compress::compress;
pub use crate::decompress::decompress;
pub use crate::error::CodecError;
pub use crate::simhash::simhash;
pub use crate::transport::{decode_base64, encode_base64};
