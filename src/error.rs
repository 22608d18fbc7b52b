/// Fatal decode-time errors. Encoder-side capacity limits are
/// not represented here: a short write is a normal, recoverable outcome
/// signalled through the returned byte count, not an error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Codec21Error {
  #[error("unknown block verb 0b{verb:03b} at byte offset {offset}")]
  UnknownVerb { verb: u8, offset: usize },

  #[error("block length {length} exceeds remaining span {remaining} at byte offset {offset}")]
  LengthOverrun { length: usize, remaining: usize, offset: usize },

  #[error("bitstream truncated while reading {context} at byte offset {offset}")]
  Truncated { context: &'static str, offset: usize },
}
