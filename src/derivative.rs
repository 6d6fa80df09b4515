//! Finite difference approximations of the slope and curvature of a signal.
//!
//! The difference operator treats the signal as if it were preceded by a single
//! zero sample, so the output has the same length as the input and the first
//! element is the first sample itself:
//!
//! ```
//! use chromint::derivative::finite_difference;
//!
//! let dy = finite_difference(&[1.0f32, 3.0, 2.0, 2.0]);
//! assert_eq!(dy, vec![1.0, 2.0, -1.0, 0.0]);
//! ```
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::signal::{ChromatogramError, MINIMUM_SIGNAL_LENGTH};

/// Compute `values[i] - values[i - 1]`, using `0` in place of `values[-1]`.
pub fn finite_difference<F: Float>(values: &[F]) -> Vec<F> {
    let mut last = F::zero();
    values
        .iter()
        .map(|v| {
            let delta = *v - last;
            last = *v;
            delta
        })
        .collect()
}

/// The first and second finite differences of a signal, each the same length
/// as the signal they were computed from.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Derivatives {
    pub first: Vec<f32>,
    pub second: Vec<f32>,
}

impl Derivatives {
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// The absolute slope at `index`
    #[inline]
    pub fn slope_at(&self, index: usize) -> f32 {
        self.first[index].abs()
    }
}

/// Compute the first and second derivatives of `intensity_array`.
///
/// Fails if there are fewer than [`MINIMUM_SIGNAL_LENGTH`] points.
pub fn compute_derivatives(intensity_array: &[f32]) -> Result<Derivatives, ChromatogramError> {
    if intensity_array.len() < MINIMUM_SIGNAL_LENGTH {
        return Err(ChromatogramError::SignalTooShort(intensity_array.len()));
    }
    let first = finite_difference(intensity_array);
    let second = finite_difference(&first);
    log::trace!("Computed derivatives over {} points", first.len());
    Ok(Derivatives { first, second })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::{gaussian_chromatogram, ramp};
    use rstest::rstest;

    #[rstest]
    #[case(&[])]
    #[case(&[5.0])]
    #[case(&[5.0, 1.0])]
    fn test_rejects_short(#[case] values: &[f32]) {
        assert_eq!(
            compute_derivatives(values),
            Err(ChromatogramError::SignalTooShort(values.len()))
        );
    }

    #[test]
    fn test_spike() {
        let mut y = vec![0.0f32; 8];
        y[3] = 10.0;
        let d = compute_derivatives(&y).unwrap();
        assert_eq!(d.first, vec![0.0, 0.0, 0.0, 10.0, -10.0, 0.0, 0.0, 0.0]);
        assert_eq!(d.second, vec![0.0, 0.0, 0.0, 10.0, -20.0, 10.0, 0.0, 0.0]);
        assert_eq!(d.slope_at(4), 10.0);
    }

    #[test]
    fn test_leading_boundary() {
        let d = compute_derivatives(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(d.first, vec![4.0, 0.0, 0.0]);
        assert_eq!(d.second, vec![4.0, -4.0, 0.0]);
    }

    #[test]
    fn test_ramp_is_constant_slope() {
        let y = ramp(20, 2.0);
        let d = compute_derivatives(&y).unwrap();
        assert!(d.first[1..].iter().all(|v| *v == 2.0));
        assert!(d.second[2..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_idempotent() {
        let y = gaussian_chromatogram();
        let a = compute_derivatives(&y).unwrap();
        let b = compute_derivatives(&y).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), y.len());
        assert_eq!(a.second.len(), y.len());
    }

    #[test]
    fn test_generic_difference() {
        let dy = finite_difference(&[1.0f64, 0.5, 0.25]);
        assert_eq!(dy, vec![1.0, -0.5, -0.25]);
        assert!(finite_difference::<f64>(&[]).is_empty());
    }
}
