//! Box-shaped observation and action spaces.
use crate::error::SoloError;
use anyhow::Result;
use ndarray::{concatenate, Array1, ArrayView1, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A space bounded per dimension by `low[i] <= x[i] <= high[i]`.
///
/// Bounds may be infinite, e.g. for velocities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    low: Array1<f64>,
    high: Array1<f64>,
}

impl BoxSpace {
    /// Constructs a space from lower and upper bounds.
    ///
    /// Fails if the bounds have different lengths or if `low[i] > high[i]`.
    pub fn new(low: impl Into<Array1<f64>>, high: impl Into<Array1<f64>>) -> Result<Self> {
        let low = low.into();
        let high = high.into();

        if low.len() != high.len() {
            return Err(SoloError::Validation(format!(
                "Lower bound has length {} != upper bound length {}",
                low.len(),
                high.len()
            ))
            .into());
        }
        if let Some(i) = (0..low.len()).find(|&i| low[i] > high[i] || low[i].is_nan() || high[i].is_nan()) {
            return Err(SoloError::Validation(format!(
                "Invalid bounds at dimension {}: [{}, {}]",
                i, low[i], high[i]
            ))
            .into());
        }

        Ok(Self { low, high })
    }

    /// A space of `n` dimensions sharing the same bounds.
    pub fn uniform(n: usize, low: f64, high: f64) -> Result<Self> {
        Self::new(Array1::from_elem(n, low), Array1::from_elem(n, high))
    }

    /// Lower bounds.
    pub fn low(&self) -> ArrayView1<f64> {
        self.low.view()
    }

    /// Upper bounds.
    pub fn high(&self) -> ArrayView1<f64> {
        self.high.view()
    }

    /// The number of dimensions.
    pub fn len(&self) -> usize {
        self.low.len()
    }

    /// Returns `true` if the space has no dimension.
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    /// Concatenates spaces in the given order.
    pub fn concat<'a>(spaces: impl IntoIterator<Item = &'a BoxSpace>) -> Self {
        let (lows, highs): (Vec<_>, Vec<_>) = spaces
            .into_iter()
            .map(|s| (s.low.view(), s.high.view()))
            .unzip();

        // Views are all one dimensional, so concatenation cannot fail on shape.
        let low = concatenate(Axis(0), &lows).unwrap_or_else(|_| Array1::zeros(0));
        let high = concatenate(Axis(0), &highs).unwrap_or_else(|_| Array1::zeros(0));
        Self { low, high }
    }

    /// Returns `true` if `x` has the right length and lies within the bounds.
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.len()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (l, h))| l <= v && v <= h)
    }

    /// Draws a random element of the space.
    ///
    /// Unbounded dimensions are drawn from `[-1, 1]` and half-bounded ones are
    /// offset from the finite bound by at most one. A dimension whose width
    /// overflows `f64` is drawn from `[-1, 1]` clamped to the bounds.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Array1<f64> {
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(&l, &h)| match (l.is_finite(), h.is_finite()) {
                (true, true) if l == h => l,
                (true, true) if (h - l).is_infinite() => rng.gen_range(-1.0..1.0_f64).clamp(l, h),
                (true, true) => rng.gen_range(l..h),
                (true, false) => l + rng.gen::<f64>(),
                (false, true) => h - rng.gen::<f64>(),
                (false, false) => rng.gen_range(-1.0..1.0),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_mismatched_bounds() {
        let err = BoxSpace::new(vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SoloError>(),
            Some(SoloError::Validation(_))
        ));
        assert!(BoxSpace::new(vec![2.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_concat_keeps_order() {
        let a = BoxSpace::new(vec![0.0], vec![1.0]).unwrap();
        let b = BoxSpace::new(vec![-2.0, f64::NEG_INFINITY], vec![2.0, f64::INFINITY]).unwrap();
        let c = BoxSpace::concat([&a, &b]);

        assert_eq!(c.len(), 3);
        assert_eq!(c.low().to_vec(), vec![0.0, -2.0, f64::NEG_INFINITY]);
        assert_eq!(c.high().to_vec(), vec![1.0, 2.0, f64::INFINITY]);
    }

    #[test]
    fn test_sample_within_bounds() {
        let space = BoxSpace::new(
            vec![-1.0, 0.0, f64::NEG_INFINITY, f64::NEG_INFINITY],
            vec![1.0, f64::INFINITY, 5.0, f64::INFINITY],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let x = space.sample(&mut rng);
            assert!(space.contains(x.as_slice().unwrap()));
        }
    }

    #[test]
    fn test_sample_overflowing_width() {
        let space = BoxSpace::new(vec![-f64::MAX, 0.0], vec![f64::MAX, f64::MAX]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..100 {
            let x = space.sample(&mut rng);
            assert!(x.iter().all(|v| v.is_finite()));
            assert!(space.contains(x.as_slice().unwrap()));
        }
    }
}
