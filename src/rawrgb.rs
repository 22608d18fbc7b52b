//! A minimal framed raw-RGB container, used by the `codec21-bench` binary to
//! load and save test frames: a short text header line followed by one or
//! more `FRAME` records, each carrying flat packed 24-bit RGB pixels.

use std::io::prelude::*;

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::pixel::Pixel;

const FILE_MAGIC: &str = "CODEC21RGB ";
const FRAME_MAGIC: &str = "FRAME";

pub struct RawRgbReader<R> {
  inner: R,
  width: usize,
  height: usize,
}

pub struct RawRgbWriter<W> {
  inner: W,
  width: usize,
  height: usize,
}

fn read_decimal<R: Read>(r: &mut R) -> std::io::Result<usize> {
  let mut v = 0usize;
  loop {
    let byte = r.read_u8()?;
    match byte {
      b'0'..=b'9' => v = 10 * v + (byte - b'0') as usize,
      _ => return Ok(v),
    }
  }
}

impl<R: Read> RawRgbReader<R> {
  pub fn new(mut inner: R) -> std::io::Result<Self> {
    let mut file_magic = [0u8; FILE_MAGIC.len()];
    inner.read_exact(&mut file_magic)?;
    if file_magic != FILE_MAGIC.as_bytes() {
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "invalid raw-RGB file header"));
    }

    if inner.read_u8()? != b'W' {
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "expected width field"));
    }
    let width = read_decimal(&mut inner)?;
    if inner.read_u8()? != b'H' {
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "expected height field"));
    }
    let height = read_decimal(&mut inner)?;

    if width == 0 || height == 0 {
      return Err(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("invalid raw-RGB size {width}x{height}"),
      ));
    }

    Ok(Self { inner, width, height })
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  /// Reads the next frame's pixels, in row-major order.
  pub fn read_frame(&mut self) -> std::io::Result<Vec<Pixel>> {
    let mut frame_magic = [0u8; FRAME_MAGIC.len()];
    self.inner.read_exact(&mut frame_magic)?;
    if frame_magic != FRAME_MAGIC.as_bytes() {
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "invalid frame header"));
    }
    while self.inner.read_u8()? != b'\n' {}

    let n = self.width * self.height;
    let mut bytes = vec![0u8; n * 3];
    self.inner.read_exact(&mut bytes)?;

    Ok(bytes.chunks_exact(3).map(|c| Pixel::new(c[0], c[1], c[2])).collect())
  }
}

impl<W: Write> RawRgbWriter<W> {
  pub fn new(mut inner: W, width: usize, height: usize) -> std::io::Result<Self> {
    inner.write_all(FILE_MAGIC.as_bytes())?;
    write!(inner, "W{width} H{height}\n")?;
    Ok(Self { inner, width, height })
  }

  pub fn write_frame(&mut self, frame: &[Pixel]) -> std::io::Result<()> {
    assert_eq!(frame.len(), self.width * self.height);

    self.inner.write_all(FRAME_MAGIC.as_bytes())?;
    self.inner.write_u8(b'\n')?;

    let mut bytes = Vec::with_capacity(frame.len() * 3);
    for pixel in frame {
      bytes.extend_from_slice(&pixel.components());
    }
    self.inner.write_all(&bytes)
  }
}
