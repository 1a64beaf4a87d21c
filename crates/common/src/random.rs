use rand::Rng;
use rand::rngs::ThreadRng;

/// Source of uniformly distributed random numbers.
///
/// Motion code draws every random value through this trait so tests can
/// substitute a scripted sequence for the unseeded runtime generator.
pub trait RandomSource {
    /// Draw a value uniformly from `[min, max)`.
    ///
    /// An empty or inverted range yields `min`.
    fn uniform(&mut self, min: f32, max: f32) -> f32;
}

/// Unseeded generator backed by the thread-local `rand` RNG.
#[derive(Debug, Clone)]
pub struct ThreadRandom {
    rng: ThreadRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if min.is_nan() || max.is_nan() || min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }
}

/// Replays a fixed list of unit fractions, cycling when exhausted.
///
/// Each fraction `u` maps to `min + u * (max - min)`. Fractions are clamped
/// to `[0, 1)` so the result always stays inside the requested range.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    fractions: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(fractions: impl IntoIterator<Item = f32>) -> Self {
        let fractions: Vec<f32> = fractions
            .into_iter()
            .map(|u| if u.is_nan() { 0.0 } else { u.clamp(0.0, LARGEST_UNIT) })
            .collect();
        Self {
            fractions,
            cursor: 0,
        }
    }

    /// Always draws the same fraction.
    pub fn constant(fraction: f32) -> Self {
        Self::new([fraction])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }

    fn next_fraction(&mut self) -> f32 {
        if self.fractions.is_empty() {
            return 0.0;
        }
        let u = self.fractions[self.cursor % self.fractions.len()];
        self.cursor += 1;
        u
    }
}

/// Largest `f32` strictly below one.
const LARGEST_UNIT: f32 = 1.0 - f32::EPSILON / 2.0;

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        let u = self.next_fraction();
        if min.is_nan() || max.is_nan() || min >= max {
            return min;
        }
        let v = min + u * (max - min);
        // Rounding can land exactly on `max` for fractions close to one.
        if v >= max {
            next_below(max).max(min)
        } else {
            v
        }
    }
}

fn next_below(x: f32) -> f32 {
    if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else if x == 0.0 {
        -f32::from_bits(1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}
