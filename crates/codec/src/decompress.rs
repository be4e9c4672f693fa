use crate::bits::BitReader;
use crate::compress::{EXCEPTION_BITS, MAX_NORMAL_SYMBOL, NORMAL_BITS};
use crate::error::CodecError;

/// Decode a framed compressed fingerprint back into items + algorithm id.
///
/// The declared item count is enforced: a payload that runs out of symbols
/// before producing that many items is rejected, as is any delta whose
/// set-bit positions overrun the 32-bit word.
pub fn decompress(data: &[u8]) -> Result<(Vec<u32>, u8), CodecError> {
    if data.len() < 4 {
        return Err(CodecError::TruncatedHeader);
    }
    let algorithm = data[0];
    let count = u32::from_be_bytes([0, data[1], data[2], data[3]]) as usize;
    let body = &data[4..];

    // First pass: pull 3-bit symbols until `count` terminators have been
    // seen, remembering which slots need an exception value.
    let mut reader = BitReader::new(body);
    let mut symbols: Vec<u8> = Vec::with_capacity(count * 2);
    let mut found = 0usize;
    while found < count {
        let symbol = reader
            .read(NORMAL_BITS)
            .ok_or(CodecError::TruncatedNormalStream(count))? as u8;
        symbols.push(symbol);
        if symbol == 0 {
            found += 1;
        }
    }

    // Second pass: resolve escaped symbols from the 5-bit stream, which
    // starts at the next byte boundary.
    let normal_bytes = reader.position().div_ceil(8);
    let mut exceptions = BitReader::new(&body[normal_bytes..]);
    for symbol in symbols.iter_mut() {
        if *symbol == MAX_NORMAL_SYMBOL {
            let extra = exceptions
                .read(EXCEPTION_BITS)
                .ok_or(CodecError::TruncatedExceptionStream)?;
            *symbol += extra as u8;
        }
    }

    // Third pass: rebuild deltas from bit-position gaps and undo the XOR.
    let mut items: Vec<u32> = Vec::with_capacity(count);
    let mut value = 0u32;
    let mut last_bit = 0u32;
    for &symbol in &symbols {
        if symbol == 0 {
            let previous = items.last().copied().unwrap_or(0);
            items.push(value ^ previous);
            value = 0;
            last_bit = 0;
        } else {
            let bit = last_bit + symbol as u32;
            if bit > 32 {
                return Err(CodecError::SymbolOutOfRange);
            }
            value |= 1 << (bit - 1);
            last_bit = bit;
        }
    }
    Ok((items, algorithm))
}
