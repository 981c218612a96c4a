#![forbid(unsafe_code)]

//! Pseudo-random sources.
//!
//! Effects that need randomness take a [`RandomSource`] so tests can pin
//! the sequence. [`Lcg64`] is the default generator; [`ReplaySource`]
//! replays a fixed list of values.

/// Uniform pseudo-random source in `[0, 1)`.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Next value in `[lo, hi)`. Returns `lo` when the range is empty.
    #[inline]
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

const LCG_MULTIPLIER: u64 = 6364136223846793005;

/// 64-bit linear congruential generator (Knuth's MMIX multiplier).
///
/// Output uses the top 31 bits of the state, which have the longest
/// period in a power-of-two LCG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg64 {
    state: u64,
}

impl Lcg64 {
    /// Seeded generator. Equal seeds yield equal sequences.
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generator seeded from the wall clock.
    pub fn from_time() -> Self {
        let nanos = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self::new(nanos as u64 ^ (nanos >> 64) as u64)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(1);
        self.state
    }
}

impl Default for Lcg64 {
    fn default() -> Self {
        Self::new(0x5EED)
    }
}

impl RandomSource for Lcg64 {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 33) as f64 / (1u64 << 31) as f64
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`. An empty list always yields `0.0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplaySource {
    values: Vec<f64>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ReplaySource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        if v.is_nan() {
            0.0
        } else {
            v.clamp(0.0, 1.0 - f64::EPSILON)
        }
    }
}
