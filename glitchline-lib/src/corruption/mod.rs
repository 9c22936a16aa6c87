//! Bit-level corruption primitives applied to completed reply datagrams.
//!
//! Both transforms work directly on the byte buffer with bit arithmetic
//! rather than materialising a per-bit character string, since the buffer
//! can be as large as the 2048-byte read limit.

use rand::Rng;

/// Independently complements each bit of `buf` with probability `p`.
///
/// `p` is expected to already be clamped to `[0, 1]` by the settings store;
/// `flip(buf, 0.0)` is the identity and `flip(buf, 1.0)` is the bitwise NOT.
pub fn bit_flip<R: Rng + ?Sized>(buf: &[u8], p: f64, rng: &mut R) -> Vec<u8> {
    let mut out = buf.to_vec();
    for byte in out.iter_mut() {
        for bit_pos in 0..8u8 {
            if rng.gen_bool(p) {
                *byte ^= 0x80u8 >> bit_pos;
            }
        }
    }
    out
}

/// Overwrites `len` consecutive bits of `buf`, starting at a uniformly
/// chosen offset, with a single uniformly chosen fill bit.
///
/// If `len` covers the whole buffer (or more), the result is all-zeros or
/// all-ones.
pub fn burst<R: Rng + ?Sized>(buf: &[u8], len: u64, rng: &mut R) -> Vec<u8> {
    let mut out = buf.to_vec();
    let total_bits = 8 * out.len();
    if total_bits == 0 {
        return out;
    }
    let fill_one = rng.gen_bool(0.5);

    if total_bits as u64 <= len {
        let fill_byte = if fill_one { 0xFFu8 } else { 0x00u8 };
        out.iter_mut().for_each(|b| *b = fill_byte);
        return out;
    }

    let len = len as usize;
    let max_offset = total_bits - len;
    let offset = rng.gen_range(0..=max_offset);
    for global_bit in offset..offset + len {
        let byte_idx = global_bit / 8;
        let mask = 0x80u8 >> (global_bit % 8);
        if fill_one {
            out[byte_idx] |= mask;
        } else {
            out[byte_idx] &= !mask;
        }
    }
    out
}
