//! RFC 1951 constants. The retrieved teacher pack referenced an equivalent
//! `deflate_constants.rs` that was not itself part of the retrieved files;
//! these are reconstructed directly from RFC 1951 section 3.2.5/3.2.6.

pub(crate) const NUM_LITLEN_SYMS: usize = 288;
pub(crate) const NUM_OFFSET_SYMS: usize = 32;
pub(crate) const NUM_PRECODE_SYMS: usize = 19;

/// HLIT's transmitted count (257 + up to 31) must not exceed 286: symbols
/// 286 and 287 are reserved and never actually occur in compressed data.
pub(crate) const MAX_HLIT: usize = 286;
/// HDIST's transmitted count (1 + up to 31) must not exceed 30: distance
/// symbols 30 and 31 are reserved and never actually occur.
pub(crate) const MAX_HDIST: usize = 30;

pub(crate) const MAX_PRECODE_CODEWORD_LEN: usize = 7;
pub(crate) const MAX_LITLEN_CODEWORD_LEN: usize = 15;
pub(crate) const MAX_OFFSET_CODEWORD_LEN: usize = 15;

pub(crate) const MIN_MATCH_LEN: usize = 3;
pub(crate) const MAX_MATCH_LEN: usize = 258;

pub(crate) const BLOCKTYPE_STORED: u32 = 0;
pub(crate) const BLOCKTYPE_STATIC: u32 = 1;
pub(crate) const BLOCKTYPE_DYNAMIC: u32 = 2;
pub(crate) const BLOCKTYPE_RESERVED: u32 = 3;

/// Order in which HCLEN code-length-alphabet lengths are transmitted.
pub(crate) const PRECODE_LENS_ORDER: [u8; NUM_PRECODE_SYMS] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Base length and extra-bit count per length symbol 257..285 (RFC 1951 3.2.5).
pub(crate) const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];
pub(crate) const LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base distance and extra-bit count per distance symbol 0..29 (RFC 1951 3.2.5).
pub(crate) const DIST_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
pub(crate) const DIST_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

static_assertions::const_assert_eq!(LENGTH_BASE.len(), LENGTH_EXTRA_BITS.len());
static_assertions::const_assert_eq!(DIST_BASE.len(), DIST_EXTRA_BITS.len());
static_assertions::const_assert_eq!(PRECODE_LENS_ORDER.len(), NUM_PRECODE_SYMS);
