//! Demonstration/benchmark CLI for the Codec21 library: runs the
//! progressive-refinement loop of property 6 — encode, decode,
//! adopt the decoded frame as the next reference, repeat — and reports
//! compression ratio and mean squared error per iteration, in the spirit of
//! the original `codec21.c`'s `tests()` driver.
//!
//! Not part of the codec's bitstream contract; this binary
//! is demonstration tooling only.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use codec21::pixel::Pixel;
use codec21::rawrgb::RawRgbReader;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pattern {
  /// All pixels black.
  Zero,
  /// A smooth grayscale ramp.
  Ramp,
  /// Alternating black/white stripes of random width.
  Stripes,
  /// A uniform mid-grey fill.
  Grey,
  /// Independent uniform-random pixels (worst case for every block kind).
  Random,
}

#[derive(Parser, Debug)]
#[command(about = "Run Codec21's progressive-refinement loop over a synthetic or loaded frame")]
struct Args {
  /// Raw-RGB input frame (CODEC21RGB container). If omitted, a synthetic
  /// pattern is generated instead.
  #[arg(long)]
  input: Option<PathBuf>,

  /// Width of the synthetic test frame (ignored when --input is given).
  #[arg(long, default_value_t = 1920)]
  width: usize,

  /// Height of the synthetic test frame (ignored when --input is given).
  #[arg(long, default_value_t = 1080)]
  height: usize,

  /// Synthetic test pattern to generate when --input is not given.
  #[arg(long, value_enum, default_value_t = Pattern::Grey)]
  pattern: Pattern,

  /// Number of progressive-refinement iterations to run.
  #[arg(long, default_value_t = 6)]
  iterations: usize,
}

fn generate_pattern(pattern: Pattern, n: usize) -> Vec<Pixel> {
  match pattern {
    Pattern::Zero => vec![Pixel::ZERO; n],

    Pattern::Ramp => {
      let start = 0x10 as f32;
      let end = 0xA0 as f32;
      let step = if n > 1 { (end - start) / (n - 1) as f32 } else { 0.0 };
      (0..n)
        .map(|i| {
          let v = (start + step * i as f32) as u8;
          Pixel::new(v, v, v)
        })
        .collect()
    }

    Pattern::Stripes => {
      let mut out = Vec::with_capacity(n);
      let mut pos = 0usize;
      let mut white = true;
      // Deterministic pseudo-random run lengths (no RNG dependency in the core crate).
      let mut state = 0x2545F4914F6CDD1Du64;
      while pos < n {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let run = 5 + (state % 120) as usize;
        let run = run.min(n - pos);
        let value = if white { 0xFF } else { 0x00 };
        out.extend(std::iter::repeat(Pixel::new(value, value, value)).take(run));
        pos += run;
        white = !white;
      }
      out
    }

    Pattern::Grey => vec![Pixel::new(0x3F, 0x3D, 0x3E); n],

    Pattern::Random => {
      let mut state = 0x9E3779B97F4A7C15u64;
      (0..n)
        .map(|_| {
          state ^= state << 13;
          state ^= state >> 7;
          state ^= state << 17;
          let bytes = state.to_le_bytes();
          Pixel::new(bytes[0], bytes[1], bytes[2])
        })
        .collect()
    }
  }
}

fn mean_squared_error(a: &[Pixel], b: &[Pixel]) -> f64 {
  let mut sum = 0.0f64;
  for (p, q) in a.iter().zip(b) {
    sum += f64::from(Pixel::squared_distance(*p, *q));
  }
  sum / (a.len().max(1) as f64 * 3.0)
}

fn main() -> std::io::Result<()> {
  env_logger::init();
  let args = Args::parse();

  let (input, width, height) = if let Some(path) = &args.input {
    let file = std::fs::File::open(path)?;
    let mut reader = RawRgbReader::new(file)?;
    let frame = reader.read_frame()?;
    (frame, reader.width(), reader.height())
  } else {
    let n = args.width * args.height;
    (generate_pattern(args.pattern, n), args.width, args.height)
  };

  let n = input.len();
  log::info!("loaded frame: {width}x{height} ({n} pixels)");

  let mut reference = vec![Pixel::ZERO; n];
  let max_compressed = n * 2 * 3 + n / 4 + 64; // property 7's bound, plus header slack

  for iteration in 0..args.iterations {
    let mut compressed = vec![0u8; max_compressed];
    let bytes_written = codec21::encode_block(&input, &reference, &mut compressed);

    let mut decompressed = vec![Pixel::ZERO; n];
    let pixels_written = match codec21::decode_blocks(&compressed[..bytes_written], &mut decompressed, &reference) {
      Ok(count) => count,
      Err(err) => {
        log::error!("iteration {iteration}: corrupt stream: {err}");
        break;
      }
    };

    if pixels_written < n {
      log::warn!("iteration {iteration}: short decode ({pixels_written} of {n} pixels) — dropping frame");
      break;
    }

    let mse = mean_squared_error(&input, &decompressed);
    let ratio = 100.0 * bytes_written as f64 / (n * 3) as f64;
    log::info!("iteration {iteration}: {bytes_written} bytes ({ratio:.4}% of raw), mse={mse:.6}");

    reference = decompressed;
  }

  Ok(())
}
