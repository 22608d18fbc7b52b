//! Block-kind constants. These are part of the bitstream
//! contract: changing them changes the stream produced by the encoder, so
//! they are compile-time constants rather than runtime configuration.

/// Fixed span length for a LINEAR block.
pub const LINEAR_LEN: usize = 20;

/// Per-channel tolerance for the LINEAR fit test.
pub const LINEAR_TOLERANCE: i32 = 6;

/// Fixed span length for a LOOKUP block.
pub const LOOKUP_LEN: usize = 30;

/// Only consider LOOKUP when some pixel differs from its reference by more
/// than this, in any channel.
pub const LOOKUP_GATE_DIFF: u8 = 32;

/// Squared-distance threshold for first-fit clustering in `freq_cluster`.
pub const LOOKUP_CLUSTER_THRESHOLD: u32 = 8 * 8 * 3;

/// Palette size for a LOOKUP block.
pub const LOOKUP_PALETTE_SIZE: usize = 4;

/// Span length for a QUANT block (the last block in a span may be shorter).
pub const QUANT_LEN: usize = 8;

/// Largest length value the 12-bit length field can carry.
pub const MAX_BLOCK_LEN: usize = 0x0FFF;

/// One 2-bit bit-plane position, most-significant pair first. `mask` selects
/// the plane's bits, `shift` right-aligns them, `high_mask` is the set of
/// bits strictly more significant than the plane (preserved from the
/// reference on decode).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantPlane {
  pub mask: u8,
  pub shift: u32,
  pub high_mask: u8,
}

pub const QUANT_PLANES: [QuantPlane; 4] = [
  QuantPlane { mask: 0xC0, shift: 6, high_mask: 0x00 }, // bits 7..6
  QuantPlane { mask: 0x30, shift: 4, high_mask: 0xC0 }, // bits 5..4
  QuantPlane { mask: 0x0C, shift: 2, high_mask: 0xF0 }, // bits 3..2
  QuantPlane { mask: 0x03, shift: 0, high_mask: 0xFC }, // bits 1..0
];
