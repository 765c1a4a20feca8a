//! Numeric reconstruction helpers: running-sum delta decoding and the
//! nano-degree / millisecond scaling applied to decoded sums.

const NANO: f64 = 1e-9;

/// Running sum for a delta-encoded column. Each stored value is the
/// difference from the previous absolute value; the first delta is applied
/// to an implicit zero. Wrapping arithmetic so corrupt deltas cannot panic.
pub(crate) struct DeltaSum {
  sum: i64,
}

impl DeltaSum {
  pub fn new() -> Self {
    Self { sum: 0 }
  }
  pub fn add(&mut self, delta: i64) -> i64 {
    self.sum = self.sum.wrapping_add(delta);
    self.sum
  }
}

/// Converts coordinate units into decimal degrees:
/// `offset + granularity_nanodegrees * units`.
pub(crate) struct CoordScale {
  scale: f64,
  offset: f64,
}

impl CoordScale {
  pub fn new(granularity: i32, offset_nanodeg: i64) -> Self {
    Self {
      scale: NANO * granularity as f64,
      offset: NANO * offset_nanodeg as f64,
    }
  }
  pub fn apply(&self, units: i64) -> f64 {
    self.offset + self.scale * units as f64
  }
}

/// Scales a timestamp in date-granularity units to absolute milliseconds.
pub(crate) fn date_millis(date_granularity: i32, units: i64) -> i64 {
  (date_granularity as i64).wrapping_mul(units)
}
