//! Uniform random source used by tree growth.
//!
//! Growth only ever needs uniform floats, so the trait is tiny and easy to
//! script in tests.

use rand::rngs::StdRng;
use rand::Rng;

/// A source of uniform random numbers in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform value in `[lo, hi)`.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        let v = lo + (hi - lo) * self.next_f32();
        // Unit values just below 1 can round the product up to `hi`.
        if v < hi || hi <= lo {
            v
        } else {
            next_below(hi)
        }
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

/// Largest `f32` strictly less than `x`.
fn next_below(x: f32) -> f32 {
    if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else if x < 0.0 {
        f32::from_bits(x.to_bits() + 1)
    } else {
        -f32::from_bits(1)
    }
}

impl RandomSource for StdRng {
    fn next_f32(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Seeds from the wall clock when no explicit seed was given.
pub fn seed_or_now(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0) // Fallback seed for misconfigured system clocks
    })
}

/// Replays a fixed list of values, cycling when exhausted.
#[cfg(test)]
pub struct Scripted {
    values: Vec<f32>,
    pos: usize,
}

#[cfg(test)]
impl Scripted {
    pub fn new(values: &[f32]) -> Self {
        assert!(!values.is_empty(), "scripted source needs at least one value");
        Self {
            values: values.to_vec(),
            pos: 0,
        }
    }

    /// Always yields the same value.
    pub fn constant(value: f32) -> Self {
        Self::new(&[value])
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn next_f32(&mut self) -> f32 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
