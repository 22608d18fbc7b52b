//! The six block kinds: selection tests and payload
//! encode/decode for each. `driver.rs` owns the greedy priority ladder and
//! header framing; these functions are small per-kind leaves it calls into
//! from one encode loop.

use crate::analysis::freq_cluster;
use crate::bitcursor::{BitReader, BitWriter};
use crate::consts::{
  LINEAR_LEN, LINEAR_TOLERANCE, LOOKUP_GATE_DIFF, LOOKUP_LEN, LOOKUP_PALETTE_SIZE, QUANT_PLANES,
};
use crate::error::Codec21Error;
use crate::pixel::Pixel;

/// Length of the leading run of `input` pixels that match `reference`
/// exactly, capped at `cap` (the length-field maximum or remaining span,
/// whichever the caller passes in).
pub fn skip_run_length(input: &[Pixel], reference: &[Pixel], cap: usize) -> usize {
  input.iter().zip(reference).take(cap).take_while(|(a, b)| a == b).count()
}

/// Selection test for a LINEAR block: does the fixed-length span ahead pass
/// the per-channel linear-fit test?
pub fn try_select_linear(input: &[Pixel], reference: &[Pixel]) -> Option<(Pixel, Pixel)> {
  let _ = reference;
  if input.len() < LINEAR_LEN {
    return None;
  }
  let span = &input[..LINEAR_LEN];
  if crate::analysis::linear_fit(span, LINEAR_TOLERANCE) {
    Some((span[0], span[LINEAR_LEN - 1]))
  } else {
    None
  }
}

/// Selection test for a LOOKUP block: gated on a large-enough difference
/// from the reference, then requires the top-4 clusters to cover the whole
/// span. Returns the 4-entry palette (padded by repeating the most frequent
/// cluster if fewer than 4 distinct clusters were found).
pub fn try_select_lookup(input: &[Pixel], reference: &[Pixel]) -> Option<[Pixel; LOOKUP_PALETTE_SIZE]> {
  if input.len() < LOOKUP_LEN {
    return None;
  }
  let in_span = &input[..LOOKUP_LEN];
  let ref_span = &reference[..LOOKUP_LEN];

  let gated = in_span.iter().zip(ref_span).any(|(&a, &b)| {
    let (dx, dy, dz) = Pixel::abs_diff(a, b);
    dx > LOOKUP_GATE_DIFF || dy > LOOKUP_GATE_DIFF || dz > LOOKUP_GATE_DIFF
  });
  if !gated {
    return None;
  }

  let (clusters, coverage) = freq_cluster(in_span, LOOKUP_PALETTE_SIZE);
  if coverage != LOOKUP_LEN {
    return None;
  }

  let mut palette = [clusters[0].0; LOOKUP_PALETTE_SIZE];
  for (slot, (centroid, _)) in palette.iter_mut().zip(clusters.iter()) {
    *slot = *centroid;
  }
  Some(palette)
}

/// Reconstruct a LINEAR block's pixels by interpolating between `start` and
/// `end`. Single-precision float intermediate, rounded then truncated to
/// `u8`, so encoder and decoder agree bit-exactly.
pub fn decode_linear(start: Pixel, end: Pixel, length: usize, output: &mut [Pixel]) {
  if length <= 1 {
    if let Some(first) = output.first_mut() {
      *first = start;
    }
    return;
  }

  let start_c = start.components();
  let end_c = end.components();

  for i in 0..length {
    let t = i as f32 / (length - 1) as f32;
    let mut out = [0u8; 3];
    for c in 0..3 {
      let s = start_c[c] as f32;
      let e = end_c[c] as f32;
      out[c] = (s + t * (e - s)).round().clamp(0.0, 255.0) as u8;
    }
    output[i] = Pixel::from_components(out);
  }
}

fn nearest_palette_index(pixel: Pixel, palette: &[Pixel; LOOKUP_PALETTE_SIZE]) -> u8 {
  let mut best_index = 0u8;
  let mut best_dist = u32::MAX;
  for (i, &candidate) in palette.iter().enumerate() {
    let dist = Pixel::squared_distance(pixel, candidate);
    if dist < best_dist {
      best_dist = dist;
      best_index = i as u8;
    }
  }
  best_index
}

/// Encode a LOOKUP block's index stream: the palette entry nearest each
/// input pixel, packed as 2-bit indices LSB-first.
pub fn encode_lookup_indices(input: &[Pixel], palette: &[Pixel; LOOKUP_PALETTE_SIZE]) -> Vec<u8> {
  let mut w = BitWriter::new();
  for &pixel in input {
    w.write_bits_lsb(nearest_palette_index(pixel, palette), 2);
  }
  w.finish()
}

/// Decode a LOOKUP block's payload into `output`.
pub fn decode_lookup(
  palette: [Pixel; LOOKUP_PALETTE_SIZE],
  length: usize,
  payload: &[u8],
  output: &mut [Pixel],
  offset: usize,
) -> Result<(), Codec21Error> {
  let mut r = BitReader::new(payload);
  for i in 0..length {
    let index = r
      .read_bits_lsb(2)
      .ok_or(Codec21Error::Truncated { context: "LOOKUP index stream", offset })?;
    output[i] = palette[index as usize];
  }
  Ok(())
}

/// Picks the first bit-plane (most-significant pair first) at which some
/// pixel in the span differs from its reference, or `None` if every plane
/// is identical (the driver falls back to SKIP in that case).
pub fn select_quant_plane(input: &[Pixel], reference: &[Pixel]) -> Option<usize> {
  for (plane_idx, plane) in QUANT_PLANES.iter().enumerate() {
    let differs = input.iter().zip(reference).any(|(&a, &b)| {
      let xa = (a.x ^ b.x) & plane.mask;
      let ya = (a.y ^ b.y) & plane.mask;
      let za = (a.z ^ b.z) & plane.mask;
      xa != 0 || ya != 0 || za != 0
    });
    if differs {
      return Some(plane_idx);
    }
  }
  None
}

/// Encode a QUANT block's payload: the selected plane's 2-bit field of
/// each channel, pixel by pixel, packed LSB-first.
pub fn encode_quant_payload(input: &[Pixel], plane_idx: usize) -> Vec<u8> {
  let plane = QUANT_PLANES[plane_idx];
  let mut w = BitWriter::new();
  for &pixel in input {
    for component in pixel.components() {
      w.write_bits_lsb((component & plane.mask) >> plane.shift, 2);
    }
  }
  w.finish()
}

/// Decode a QUANT block's payload into `output`, applying the dither
/// pattern required for progressive-refinement convergence: the decoded
/// pixel's bits below the plane are filled with an alternating `0xAA`/`0x55`
/// pattern selected by the parity of the absolute output position, masked to
/// just the bits below the plane.
pub fn decode_quant(
  plane_idx: usize,
  length: usize,
  payload: &[u8],
  reference: &[Pixel],
  output: &mut [Pixel],
  out_pos_start: usize,
  offset: usize,
) -> Result<(), Codec21Error> {
  let plane = QUANT_PLANES[plane_idx];
  let mut r = BitReader::new(payload);

  for i in 0..length {
    let out_pos = out_pos_start + i;
    let dither_pattern = if out_pos % 2 == 0 { 0xAAu8 } else { 0x55u8 };
    let dither = !(plane.high_mask | plane.mask) & dither_pattern;

    let mut channel_out = [0u8; 3];
    for c in channel_out.iter_mut() {
      let bits = r
        .read_bits_lsb(2)
        .ok_or(Codec21Error::Truncated { context: "QUANT plane bits", offset })?;
      *c = bits << plane.shift;
    }

    let reference_components = reference[i].components();
    let mut decoded = [0u8; 3];
    for c in 0..3 {
      decoded[c] = (reference_components[c] & plane.high_mask) | channel_out[c] | dither;
    }
    output[i] = Pixel::from_components(decoded);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn skip_run_stops_at_first_mismatch() {
    let input = [Pixel::ZERO, Pixel::ZERO, Pixel::new(1, 0, 0), Pixel::ZERO];
    let reference = [Pixel::ZERO; 4];
    assert_eq!(skip_run_length(&input, &reference, 10), 2);
  }

  #[test]
  fn skip_run_is_capped() {
    let input = [Pixel::ZERO; 10];
    let reference = [Pixel::ZERO; 10];
    assert_eq!(skip_run_length(&input, &reference, 4), 4);
  }

  #[test]
  fn linear_selection_rejects_short_span() {
    let input = vec![Pixel::ZERO; 5];
    let reference = vec![Pixel::ZERO; 5];
    assert_eq!(try_select_linear(&input, &reference), None);
  }

  #[test]
  fn lookup_round_trip_with_exact_palette() {
    let palette = [
      Pixel::new(255, 0, 0),
      Pixel::new(0, 255, 0),
      Pixel::new(0, 0, 255),
      Pixel::new(255, 255, 0),
    ];
    let input: Vec<Pixel> = (0..LOOKUP_LEN).map(|i| palette[i % 4]).collect();
    let reference = vec![Pixel::ZERO; LOOKUP_LEN];

    let selected = try_select_lookup(&input, &reference).expect("should select LOOKUP");
    let payload = encode_lookup_indices(&input, &selected);

    let mut output = vec![Pixel::ZERO; LOOKUP_LEN];
    decode_lookup(selected, LOOKUP_LEN, &payload, &mut output, 0).unwrap();
    assert_eq!(output, input);
  }

  #[test]
  fn quant_preserves_high_bits() {
    let input = [Pixel::new(0xC0, 0x00, 0x00); 8];
    let reference = [Pixel::new(0x00, 0x00, 0x00); 8];

    let plane_idx = select_quant_plane(&input, &reference).unwrap();
    assert_eq!(plane_idx, 0); // bits 7..6 differ first

    let payload = encode_quant_payload(&input, plane_idx);
    let mut output = [Pixel::ZERO; 8];
    decode_quant(plane_idx, 8, &payload, &reference, &mut output, 0, 0).unwrap();

    let plane = QUANT_PLANES[plane_idx];
    for (o, r) in output.iter().zip(reference.iter()) {
      assert_eq!(o.x & plane.high_mask, r.x & plane.high_mask);
      assert_eq!(o.x & plane.mask, input[0].x & plane.mask);
    }
  }

  #[test]
  fn linear_decode_hits_endpoints_exactly() {
    let start = Pixel::new(0x10, 0x10, 0x10);
    let end = Pixel::new(0xA0, 0xA0, 0xA0);
    let mut output = vec![Pixel::ZERO; LINEAR_LEN];
    decode_linear(start, end, LINEAR_LEN, &mut output);
    assert_eq!(output[0], start);
    assert_eq!(output[LINEAR_LEN - 1], end);
  }

  #[test]
  fn quant_plane_select_falls_through_when_identical() {
    let input = [Pixel::new(5, 5, 5); 4];
    let reference = [Pixel::new(5, 5, 5); 4];
    assert_eq!(select_quant_plane(&input, &reference), None);
  }
}
