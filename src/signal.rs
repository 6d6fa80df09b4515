//! The chromatogram signal container and the input validation errors shared
//! by every stage of the pipeline.
use std::borrow::Cow;
use std::ops::Index;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::derivative::{compute_derivatives, Derivatives};

/// The smallest number of samples that has both a left and a right neighbor
/// for at least one point.
pub const MINIMUM_SIGNAL_LENGTH: usize = 3;

/// All the ways the pipeline can reject its input before doing any work
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ChromatogramError {
    #[error("The signal must contain at least 3 points, received {0}")]
    SignalTooShort(usize),
    #[error("The intensity at index {0} is not a finite number")]
    NonFiniteIntensity(usize),
    #[error("The interval [{start}, {end}] is empty, its start must be less than its end")]
    EmptyInterval { start: usize, end: usize },
}

/// An equally spaced intensity trace where the sample index stands in for time.
///
/// The intensity array may be borrowed from the caller, the pipeline never
/// writes to it. A [`Signal`] can only be built through [`Signal::new`] or one
/// of the `TryFrom` conversions, so every instance has passed [`Signal::validate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<f32>", into = "Vec<f32>")
)]
pub struct Signal<'a> {
    intensity: Cow<'a, [f32]>,
}

impl<'a> Signal<'a> {
    /// Wrap `intensity`, checking that it is long enough to differentiate
    /// and that every sample is finite.
    pub fn new(intensity: Cow<'a, [f32]>) -> Result<Self, ChromatogramError> {
        let signal = Self { intensity };
        signal.validate()?;
        Ok(signal)
    }

    /// Check that the signal has at least [`MINIMUM_SIGNAL_LENGTH`] points
    /// and that none of them are `NaN` or infinite.
    pub fn validate(&self) -> Result<(), ChromatogramError> {
        if self.intensity.len() < MINIMUM_SIGNAL_LENGTH {
            return Err(ChromatogramError::SignalTooShort(self.intensity.len()));
        }
        if let Some(i) = self.intensity.iter().position(|y| !y.is_finite()) {
            return Err(ChromatogramError::NonFiniteIntensity(i));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(intensity: Vec<f32>) -> Signal<'static> {
        Signal {
            intensity: Cow::Owned(intensity),
        }
    }

    pub fn intensity(&self) -> &Cow<'a, [f32]> {
        &self.intensity
    }

    pub fn len(&self) -> usize {
        self.intensity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensity.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.intensity
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, f32>> {
        self.intensity.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.intensity.get(index).copied()
    }

    /// Compute the first and second finite differences of this signal.
    pub fn derivatives(&self) -> Result<Derivatives, ChromatogramError> {
        compute_derivatives(&self.intensity)
    }

    /// Create a [`Signal`] that borrows from this one
    pub fn borrow(&self) -> Signal<'_> {
        Signal {
            intensity: Cow::Borrowed(self.intensity.as_ref()),
        }
    }

    /// Copy the intensity data if it is borrowed
    pub fn into_owned(self) -> Signal<'static> {
        Signal {
            intensity: Cow::Owned(self.intensity.into_owned()),
        }
    }
}

impl<'a> Index<usize> for Signal<'a> {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.intensity[index]
    }
}

impl<'a> TryFrom<&'a [f32]> for Signal<'a> {
    type Error = ChromatogramError;

    fn try_from(value: &'a [f32]) -> Result<Self, Self::Error> {
        Self::new(Cow::Borrowed(value))
    }
}

impl<'a> TryFrom<Vec<f32>> for Signal<'a> {
    type Error = ChromatogramError;

    fn try_from(value: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(Cow::Owned(value))
    }
}

impl<'a> From<Signal<'a>> for Vec<f32> {
    fn from(value: Signal<'a>) -> Self {
        value.intensity.into_owned()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![1.0], 1)]
    #[case(vec![1.0, 2.0], 2)]
    fn test_too_short(#[case] values: Vec<f32>, #[case] n: usize) {
        let err = Signal::try_from(values).unwrap_err();
        assert_eq!(err, ChromatogramError::SignalTooShort(n));
    }

    #[test]
    fn test_non_finite() {
        let values = vec![0.0, 1.0, f32::NAN, 1.0];
        let err = Signal::try_from(values).unwrap_err();
        assert_eq!(err, ChromatogramError::NonFiniteIntensity(2));

        let values = vec![0.0, f32::INFINITY, 1.0];
        assert!(Signal::try_from(values).is_err());
    }

    #[test]
    fn test_borrowed_signal() {
        let values = [0.0f32, 3.0, 1.0];
        let signal = Signal::try_from(&values[..]).unwrap();
        assert_eq!(signal.len(), 3);
        assert_eq!(signal[1], 3.0);
        assert_eq!(signal.get(3), None);
        assert!(matches!(signal.intensity(), Cow::Borrowed(_)));
        let owned = signal.borrow().into_owned();
        assert!(matches!(owned.intensity(), Cow::Owned(_)));
        assert_eq!(owned, signal);
    }

    #[test]
    fn test_validate_unchecked() {
        assert_eq!(
            Signal::new_unchecked(vec![1.0, 2.0]).validate(),
            Err(ChromatogramError::SignalTooShort(2))
        );
        let signal = Signal::new_unchecked(vec![1.0, 2.0]);
        assert_eq!(signal.derivatives(), Err(ChromatogramError::SignalTooShort(2)));
        let signal = Signal::new_unchecked(vec![1.0, f32::NAN, 2.0]);
        assert_eq!(signal.validate(), Err(ChromatogramError::NonFiniteIntensity(1)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let signal: Signal<'static> = serde_json::from_str("[0.0, 4.0, 1.0]").unwrap();
        assert_eq!(signal.as_slice(), &[0.0, 4.0, 1.0]);
        assert_eq!(serde_json::to_string(&signal).unwrap(), "[0.0,4.0,1.0]");
        assert!(serde_json::from_str::<Signal<'static>>("[0.0, 4.0]").is_err());
    }
}
