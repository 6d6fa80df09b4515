//! Peak records produced by each stage of the pipeline.
//!
//! Every stage layers more information on the record it received instead of
//! modifying it: [`Peak`] → [`BoundedPeak`] → [`IntegratedPeak`].
use std::fmt;
use std::ops::RangeInclusive;

use mzpeaks::{CoordinateLike, IntensityMeasurement, Time};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A local maximum of the signal, located by its sample index.
pub struct Peak {
    pub index: usize,
    /// The signal intensity at `index`
    pub height: f32,
}

impl Peak {
    pub fn new(index: usize, height: f32) -> Self {
        Self { index, height }
    }
}

/// The sample index doubles as the retention time
impl CoordinateLike<Time> for Peak {
    fn coordinate(&self) -> f64 {
        self.index as f64
    }
}

impl IntensityMeasurement for Peak {
    #[inline]
    fn intensity(&self) -> f32 {
        self.height
    }
}

impl fmt::Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Peak({}, {})", self.index, self.height)
    }
}

/// A point on the signal where a peak's slope returned to baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundaryPoint {
    pub index: usize,
    pub value: f32,
}

impl BoundaryPoint {
    pub fn new(index: usize, value: f32) -> Self {
        Self { index, value }
    }
}

/// One side of a peak's extent.
///
/// [`Boundary::Unresolved`] means the slope never dropped below the noise
/// threshold before the scan ran off the end of the signal. It is a normal
/// outcome, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Boundary {
    Resolved(BoundaryPoint),
    #[default]
    Unresolved,
}

impl Boundary {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn point(&self) -> Option<BoundaryPoint> {
        match self {
            Self::Resolved(point) => Some(*point),
            Self::Unresolved => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.point().map(|p| p.index)
    }

    pub fn value(&self) -> Option<f32> {
        self.point().map(|p| p.value)
    }
}

impl From<Option<BoundaryPoint>> for Boundary {
    fn from(value: Option<BoundaryPoint>) -> Self {
        match value {
            Some(point) => Self::Resolved(point),
            None => Self::Unresolved,
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Resolved(point) => write!(f, "({}, {})", point.index, point.value),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// The left and right extent of a peak
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakBoundary {
    pub left: Boundary,
    pub right: Boundary,
}

impl PeakBoundary {
    pub fn new(left: Boundary, right: Boundary) -> Self {
        Self { left, right }
    }

    /// Whether both sides were resolved
    pub fn is_resolved(&self) -> bool {
        self.left.is_resolved() && self.right.is_resolved()
    }

    /// The inclusive range of sample indices covered, if both sides were resolved
    pub fn span(&self) -> Option<RangeInclusive<usize>> {
        match (self.left, self.right) {
            (Boundary::Resolved(left), Boundary::Resolved(right)) => {
                Some(left.index..=right.index)
            }
            _ => None,
        }
    }

    /// Whether the resolved spans of `self` and `other` share any sample
    pub fn overlaps(&self, other: &PeakBoundary) -> bool {
        match (self.span(), other.span()) {
            (Some(a), Some(b)) => a.start() <= b.end() && b.start() <= a.end(),
            _ => false,
        }
    }
}

/// A [`Peak`] with its extent resolved by [`BoundaryResolver`](crate::boundary::BoundaryResolver)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundedPeak {
    pub peak: Peak,
    pub boundary: PeakBoundary,
}

impl BoundedPeak {
    pub fn new(peak: Peak, boundary: PeakBoundary) -> Self {
        Self { peak, boundary }
    }
}

impl fmt::Display for BoundedPeak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "BoundedPeak({}, {}, {}, {})",
            self.peak.index, self.peak.height, self.boundary.left, self.boundary.right
        )
    }
}

/// A [`BoundedPeak`] with its area.
///
/// `area` is `None` when either side of the boundary is unresolved, such
/// peaks are excluded from integration but kept for inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegratedPeak {
    pub peak: Peak,
    pub boundary: PeakBoundary,
    pub area: Option<f64>,
}

impl IntegratedPeak {
    pub fn new(peak: Peak, boundary: PeakBoundary, area: Option<f64>) -> Self {
        Self {
            peak,
            boundary,
            area,
        }
    }

    pub fn index(&self) -> usize {
        self.peak.index
    }

    pub fn height(&self) -> f32 {
        self.peak.height
    }

    pub fn is_integrated(&self) -> bool {
        self.area.is_some()
    }
}

impl From<IntegratedPeak> for Peak {
    fn from(value: IntegratedPeak) -> Self {
        value.peak
    }
}

impl From<BoundedPeak> for Peak {
    fn from(value: BoundedPeak) -> Self {
        value.peak
    }
}

impl fmt::Display for IntegratedPeak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let area = match self.area {
            Some(area) => area.to_string(),
            None => "excluded".to_string(),
        };
        write!(
            f,
            "IntegratedPeak({}, {}, {}, {}, {})",
            self.peak.index, self.peak.height, self.boundary.left, self.boundary.right, area
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unresolved_is_not_zero() {
        let zero = Boundary::Resolved(BoundaryPoint::new(0, 0.0));
        assert_ne!(zero, Boundary::Unresolved);
        assert_eq!(zero.index(), Some(0));
        assert_eq!(Boundary::Unresolved.index(), None);
        assert_eq!(Boundary::from(None), Boundary::Unresolved);
    }

    #[test]
    fn test_span_and_overlap() {
        let a = PeakBoundary::new(
            Boundary::Resolved(BoundaryPoint::new(2, 1.0)),
            Boundary::Resolved(BoundaryPoint::new(10, 0.5)),
        );
        let b = PeakBoundary::new(
            Boundary::Resolved(BoundaryPoint::new(8, 3.0)),
            Boundary::Resolved(BoundaryPoint::new(14, 0.5)),
        );
        let c = PeakBoundary::new(
            Boundary::Resolved(BoundaryPoint::new(11, 0.5)),
            Boundary::Unresolved,
        );
        assert_eq!(a.span(), Some(2..=10));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.is_resolved());
        assert_eq!(c.span(), None);
    }

    #[test]
    fn test_coordinates() {
        let peak = Peak::new(42, 1500.0);
        assert_eq!(CoordinateLike::<Time>::coordinate(&peak), 42.0);
        assert_eq!(peak.intensity(), 1500.0);
        let integrated = IntegratedPeak::new(peak, PeakBoundary::default(), None);
        assert!(!integrated.is_integrated());
        assert_eq!(Peak::from(integrated), peak);
        assert_eq!(
            integrated.to_string(),
            "IntegratedPeak(42, 1500, unresolved, unresolved, excluded)"
        );
    }
}
