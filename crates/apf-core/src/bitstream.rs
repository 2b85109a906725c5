//! Bit-reversal of FPGA bitstreams.
//!
//! The Pocket loader shifts configuration data into the FPGA least
//! significant bit first, so every byte of an `.rbf` is stored with its bit
//! order reversed (`.rbf_r`). The transform is its own inverse.

/// Reverse the bit order of every byte of `raw`.
pub fn encode(raw: &[u8]) -> Vec<u8> {
    let mut out = raw.to_vec();
    encode_in_place(&mut out);
    out
}

/// [`encode`] without allocating.
pub fn encode_in_place(bytes: &mut [u8]) {
    for b in bytes {
        *b = b.reverse_bits();
    }
}
