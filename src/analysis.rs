//! Predicate and analysis helpers shared by the block encoders. None of
//! these functions touch the bitstream directly; they only classify spans so
//! `driver::encode_block` can decide which block kind to try next.

use crate::consts::LOOKUP_CLUSTER_THRESHOLD;
use crate::pixel::Pixel;

/// Per-channel difference classification, used historically to gate block
/// selection. Not part of the bitstream contract — kept as
/// an internal helper only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DiffRange {
  Small,
  Medium,
  Large,
}

pub(crate) fn diff_range(input: &[Pixel], reference: &[Pixel]) -> DiffRange {
  debug_assert_eq!(input.len(), reference.len());

  let mut has_medium = false;
  for (&a, &b) in input.iter().zip(reference) {
    let (dx, dy, dz) = Pixel::abs_diff(a, b);
    if dx >= 16 || dy >= 16 || dz >= 16 {
      return DiffRange::Large;
    }
    if dx >= 4 || dy >= 4 || dz >= 4 {
      has_medium = true;
    }
  }
  if has_medium {
    DiffRange::Medium
  } else {
    DiffRange::Small
  }
}

/// Checks that every intermediate pixel of `points` lies within `tolerance`
/// of the straight line from `points[0]` to `points[last]`, per channel,
/// using double-precision intermediates.
pub fn linear_fit(points: &[Pixel], tolerance: i32) -> bool {
  let len = points.len();
  if len < 2 {
    return true;
  }

  let first = points[0].components();
  let last = points[len - 1].components();

  for channel in 0..3 {
    let start = first[channel] as f64;
    let end = last[channel] as f64;
    let slope = (end - start) / ((len - 1) as f64);

    for i in 1..len - 1 {
      let expected = start + slope * (i as f64);
      let actual = points[i].components()[channel] as f64;
      if (actual - expected).abs() > tolerance as f64 {
        return false;
      }
    }
  }
  true
}

/// Single-pass first-fit clustering: each pixel joins the first existing
/// cluster whose squared distance to its centroid (the cluster's
/// first-seen representative) is strictly less than `threshold`, or starts
/// a new cluster. Returns
/// all clusters found, stably sorted by count descending (ties keep
/// insertion order), along with the coverage (sum of counts) of the first
/// `k` clusters.
pub fn freq_cluster(data: &[Pixel], k: usize) -> (Vec<(Pixel, usize)>, usize) {
  let mut clusters: Vec<(Pixel, usize)> = Vec::new();

  for &pixel in data {
    match clusters
      .iter_mut()
      .find(|(centroid, _)| Pixel::squared_distance(pixel, *centroid) < LOOKUP_CLUSTER_THRESHOLD)
    {
      Some((_, count)) => *count += 1,
      None => clusters.push((pixel, 1)),
    }
  }

  // Stable sort: equal-count clusters retain insertion order.
  clusters.sort_by(|a, b| b.1.cmp(&a.1));

  let coverage = clusters.iter().take(k).map(|(_, count)| *count).sum();
  (clusters, coverage)
}
