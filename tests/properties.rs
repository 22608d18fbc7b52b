//! Property-based checks of quantified properties, using
//! `proptest` to generate a variety of input/reference pairs the way
//! `h264-parser`'s `tests/proptests.rs` fuzzes NAL unit boundaries.

use proptest::prelude::*;

use codec21::pixel::Pixel;

fn arb_pixel() -> impl Strategy<Value = Pixel> {
  (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(x, y, z)| Pixel::new(x, y, z))
}

fn arb_span(max_len: usize) -> impl Strategy<Value = (Vec<Pixel>, Vec<Pixel>)> {
  (1..=max_len).prop_flat_map(|len| {
    (prop::collection::vec(arb_pixel(), len), prop::collection::vec(arb_pixel(), len))
  })
}

proptest! {
  /// Property 1: sum of block lengths equals the number of pixels decoded.
  #[test]
  fn length_conservation((input, reference) in arb_span(200)) {
    let mut compressed = vec![0u8; input.len() * 6 + 64];
    let bytes_written = codec21::encode_block(&input, &reference, &mut compressed);

    let mut output = vec![Pixel::default(); input.len()];
    let pixels_written =
      codec21::decode_blocks(&compressed[..bytes_written], &mut output, &reference).unwrap();

    // With ample capacity the whole span is always describable.
    prop_assert_eq!(pixels_written, input.len());
  }

  /// Property 2: an all-equal span encodes to SKIP block(s) and decodes
  /// back to the input bit-exactly.
  #[test]
  fn reference_echo(reference in prop::collection::vec(arb_pixel(), 1..200)) {
    let input = reference.clone();
    let mut compressed = vec![0u8; input.len() * 6 + 64];
    let bytes_written = codec21::encode_block(&input, &reference, &mut compressed);

    let mut pos = 0usize;
    while pos < bytes_written {
      let header = codec21::header::BlockHeader::read(&compressed, &mut pos).unwrap();
      prop_assert_eq!(header.verb, codec21::header::Verb::Skip);
    }

    let mut output = vec![Pixel::default(); input.len()];
    codec21::decode_blocks(&compressed[..bytes_written], &mut output, &reference).unwrap();
    prop_assert_eq!(output, input);
  }

  /// Property 8: encoding the same input/reference pair twice produces
  /// byte-identical output (no hidden nondeterminism in the selector).
  #[test]
  fn determinism((input, reference) in arb_span(200)) {
    let mut a = vec![0u8; input.len() * 6 + 64];
    let mut b = vec![0u8; input.len() * 6 + 64];
    let na = codec21::encode_block(&input, &reference, &mut a);
    let nb = codec21::encode_block(&input, &reference, &mut b);
    prop_assert_eq!(na, nb);
    prop_assert_eq!(&a[..na], &b[..nb]);
  }

  /// Property 7: bounded bitstream growth — at most 2 bytes per pixel (the
  /// worst case, QUANT's 6 bits/pixel rounds up to under a byte per pixel,
  /// but header overhead on tiny spans can approach this bound) plus a
  /// small constant for header overhead.
  #[test]
  fn bounded_growth((input, reference) in arb_span(200)) {
    let n = input.len();
    let mut compressed = vec![0u8; n * 2 * 3 + 64];
    let bytes_written = codec21::encode_block(&input, &reference, &mut compressed);
    prop_assert!(bytes_written <= n * 2 * 3 + 64);
  }
}
