//! Seed handling and the single pseudo-random stream behind every
//! stochastic choice in a simulation.

use crate::error::SimError;
use ovel_data::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// Validated simulation seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u64);

impl Seed {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Self(u64::from(value))
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        // Two's complement keeps negative seeds distinct from positive ones.
        Self(value as u64)
    }
}

impl TryFrom<f64> for Seed {
    type Error = SimError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(SimError::invalid_seed(format!("{value} is not finite")));
        }
        if value.fract() != 0.0 {
            return Err(SimError::invalid_seed(format!("{value} is not an integer")));
        }
        if value.abs() > MAX_EXACT_F64 {
            return Err(SimError::invalid_seed(format!(
                "{value} exceeds the exactly representable range"
            )));
        }
        Ok(Self::from(value as i64))
    }
}

impl FromStr for Seed {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(v) = trimmed.parse::<u64>() {
            return Ok(Self(v));
        }
        trimmed
            .parse::<i64>()
            .map(Self::from)
            .map_err(|_| SimError::invalid_seed(format!("'{trimmed}' is not an integer")))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic stream seeded once at construction.
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed.value()),
        }
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform in `[-1, 1)`.
    pub fn signed(&mut self) -> f64 {
        self.inner.gen_range(-1.0..1.0)
    }

    /// Uniform over the area of a disk centered at the origin.
    pub fn in_disk(&mut self, radius: f64) -> Vec2 {
        let r = radius * self.unit().sqrt();
        let theta = self.unit() * std::f64::consts::TAU;
        Vec2::new(r * theta.cos(), r * theta.sin())
    }

    /// Independent components in `[-1, 1)`.
    pub fn signed_vec(&mut self) -> Vec2 {
        let x = self.signed();
        let y = self.signed();
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_rejects_non_finite() {
        assert!(Seed::try_from(f64::NAN).is_err());
        assert!(Seed::try_from(f64::INFINITY).is_err());
        assert!(Seed::try_from(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_seed_rejects_fractional_and_huge() {
        assert!(Seed::try_from(1.5).is_err());
        assert!(Seed::try_from(1e300).is_err());
    }

    #[test]
    fn test_seed_accepts_integral_float() {
        assert_eq!(Seed::try_from(424_242.0).unwrap(), Seed::new(424_242));
    }

    #[test]
    fn test_seed_parse() {
        assert_eq!("42".parse::<Seed>().unwrap(), Seed::new(42));
        assert_eq!("-1".parse::<Seed>().unwrap(), Seed::new(u64::MAX));
        assert!("forty".parse::<Seed>().is_err());
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SimRng::new(Seed::new(7));
        let mut b = SimRng::new(Seed::new(7));
        for _ in 0..32 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn test_in_disk_stays_inside() {
        let mut rng = SimRng::new(Seed::new(3));
        for _ in 0..1000 {
            assert!(rng.in_disk(0.5).length() <= 0.5);
        }
    }
}
